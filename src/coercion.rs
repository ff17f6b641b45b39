use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

const TRUE_LITERALS: [&str; 4] = ["true", "on", "1", "yes"];
const FALSE_LITERALS: [&str; 5] = ["false", "off", "0", "no", ""];

pub fn parse_flag(value: &Value) -> Result<bool, String> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::Null => Ok(false),
        Value::Number(number) => match number.as_i64() {
            Some(1) => Ok(true),
            Some(0) => Ok(false),
            _ => Err(format!("{} is not a boolean value", number)),
        },
        Value::String(text) => {
            let normalized = text.trim().to_ascii_lowercase();
            if TRUE_LITERALS.contains(&normalized.as_str()) {
                Ok(true)
            } else if FALSE_LITERALS.contains(&normalized.as_str()) {
                Ok(false)
            } else {
                Err(format!("\"{}\" is not a boolean value", text))
            }
        }
        other => Err(format!("{} is not a boolean value", other)),
    }
}

fn parse_integer(value: &Value) -> Result<Option<i32>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| format!("{} is not a valid integer", number)),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => text
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| format!("\"{}\" is not a valid integer", text)),
        other => Err(format!("{} is not a valid integer", other)),
    }
}

fn parse_text(value: &Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => Ok(Some(text.trim().to_string())),
        Value::Number(number) => Ok(Some(number.to_string())),
        other => Err(format!("{} is not a text value", other)),
    }
}

pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    parse_flag(&value).map_err(de::Error::custom)
}

pub fn optional_integer<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<i32>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    parse_integer(&value).map_err(de::Error::custom)
}

pub fn optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    parse_text(&value).map_err(de::Error::custom)
}

pub fn optional_choice<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    use serde::de::IntoDeserializer;

    match parse_text(&Value::deserialize(deserializer)?).map_err(de::Error::custom)? {
        None => Ok(None),
        Some(text) => {
            let choice: de::value::StringDeserializer<D::Error> = text.into_deserializer();
            T::deserialize(choice).map(Some)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "flag")]
        active: bool,
        #[serde(default, deserialize_with = "optional_integer")]
        order: Option<i32>,
        #[serde(default, deserialize_with = "optional_text")]
        note: Option<String>,
    }

    #[test]
    fn accepts_every_truthy_literal() {
        for value in [json!(true), json!(1), json!("true"), json!("on"), json!("1"), json!(" ON ")] {
            assert_eq!(parse_flag(&value), Ok(true), "{} should be true", value);
        }
    }

    #[test]
    fn accepts_every_falsy_literal() {
        for value in [json!(false), json!(0), json!("false"), json!("off"), json!("0"), json!(""), Value::Null] {
            assert_eq!(parse_flag(&value), Ok(false), "{} should be false", value);
        }
    }

    #[test]
    fn rejects_unknown_flag_literals() {
        assert!(parse_flag(&json!("maybe")).is_err());
        assert!(parse_flag(&json!(2)).is_err());
        assert!(parse_flag(&json!([true])).is_err());
    }

    #[test]
    fn csv_style_row_is_coerced() {
        let row: Row = serde_json::from_value(json!({
            "active": "1",
            "order": "3",
            "note": "  ",
        }))
        .expect("row should deserialize");

        assert!(row.active);
        assert_eq!(row.order, Some(3));
        assert_eq!(row.note, None);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let row: Row = serde_json::from_value(json!({})).expect("row should deserialize");

        assert!(!row.active);
        assert_eq!(row.order, None);
        assert_eq!(row.note, None);
    }

    #[test]
    fn non_numeric_integer_is_rejected() {
        let result = serde_json::from_value::<Row>(json!({ "order": "first" }));

        assert!(result.is_err());
    }
}
