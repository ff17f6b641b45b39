use regex::Regex;
use rocket::serde::Serialize;
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{([^{}\s]+)\}").expect("placeholder regex is valid"))
}

pub fn placeholders(pattern: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for capture in placeholder_regex().captures_iter(pattern) {
        let name = &capture[1];
        if !names.iter().any(|known| known == name) {
            names.push(name.to_string());
        }
    }

    names
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Token {
    pub display: String,
}

#[derive(Debug, PartialEq)]
pub struct Composition {
    pub sentence: String,
    pub tokens: Vec<Token>,
}

/// Replaces every `{slot}` with its display value. Placeholders without a
/// value stay as they are.
pub fn compose<'a, I>(pattern: &str, values: I) -> Composition
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let sentence = values
        .into_iter()
        .fold(pattern.to_string(), |sentence, (slot_name, value)| {
            sentence.replace(&format!("{{{}}}", slot_name), value)
        });
    let tokens = tokenize(&sentence);

    Composition { sentence, tokens }
}

pub fn tokenize(sentence: &str) -> Vec<Token> {
    sentence
        .split_whitespace()
        .map(|fragment| Token {
            display: fragment.to_string(),
        })
        .collect()
}
