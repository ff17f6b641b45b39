use crate::env::{get_default_page_size, get_maximum_page_size};
use diesel::prelude::*;
use diesel::result::Error;
use serde::de::DeserializeOwned;
use rocket::serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

#[derive(Serialize, Debug)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
}

pub fn page_bounds(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let maximum = get_maximum_page_size().max(1);
    let limit = limit
        .filter(|limit| *limit > 0)
        .unwrap_or_else(get_default_page_size)
        .clamp(1, maximum);

    (limit, offset.unwrap_or(0).max(0))
}

#[derive(Serialize, Debug)]
pub struct Created {
    pub id: i32,
}

#[derive(Deserialize, Validate, Debug)]
pub struct ImportRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub rows: Vec<Value>,
}

#[derive(Serialize, Debug, Default, PartialEq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
}

impl ImportRequest {
    /// Decodes and inserts every row in one transaction. Rows that fail to
    /// decode, or that `insert` declines by returning `false`, are skipped.
    pub fn import<T, F>(
        self,
        database_connection: &mut SqliteConnection,
        mut insert: F,
    ) -> Result<ImportSummary, Error>
    where
        T: DeserializeOwned,
        F: FnMut(&mut SqliteConnection, T) -> Result<bool, Error>,
    {
        let rows = self.rows;
        database_connection.transaction(|connection| {
            let mut summary = ImportSummary::default();
            for row in rows {
                let inserted = match serde_json::from_value::<T>(row) {
                    Ok(row) => insert(connection, row)?,
                    Err(error) => {
                        tracing::debug!(error = %error, "skipping undecodable import row");
                        false
                    }
                };
                if inserted {
                    summary.inserted += 1;
                } else {
                    summary.skipped += 1;
                }
            }

            Ok(summary)
        })
    }
}

#[derive(Deserialize, Validate, Debug)]
pub struct BulkDeleteRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub ids: Vec<i32>,
}

#[derive(Serialize, Debug)]
pub struct DeleteSummary {
    pub deleted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_bounds_apply_defaults() {
        assert_eq!(page_bounds(None, None), (20, 0));
        assert_eq!(page_bounds(Some(0), Some(-4)), (20, 0));
    }

    #[test]
    fn page_bounds_cap_the_limit() {
        assert_eq!(page_bounds(Some(5), Some(10)), (5, 10));
        assert_eq!(page_bounds(Some(100_000), None), (200, 0));
    }
}
