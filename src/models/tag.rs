use crate::coercion::{optional_integer, optional_text};
use crate::schema::tags;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::result::Error;
use rocket::serde::{Deserialize, Serialize};

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Tag {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub tag_type: Option<String>,
    pub parent_tag_id: Option<i32>,
    pub description: Option<String>,
    #[serde(skip_serializing)]
    pub created_at: NaiveDateTime,
    #[serde(skip_serializing)]
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Debug, Default)]
#[diesel(table_name = tags)]
pub struct NewTag {
    #[serde(default, deserialize_with = "optional_text")]
    pub name: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "optional_text")]
    pub tag_type: Option<String>,
    #[serde(default, deserialize_with = "optional_integer")]
    pub parent_tag_id: Option<i32>,
    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<String>,
}

impl Tag {
    pub fn find(database_connection: &mut SqliteConnection, tag_id: i32) -> Result<Option<Tag>, Error> {
        tags::table.find(tag_id).first(database_connection).optional()
    }

    pub fn find_by_name(
        database_connection: &mut SqliteConnection,
        name: &str,
    ) -> Result<Option<Tag>, Error> {
        tags::table
            .filter(tags::name.eq(name))
            .order(tags::id.asc())
            .first(database_connection)
            .optional()
    }

    pub fn all(database_connection: &mut SqliteConnection) -> Result<Vec<Tag>, Error> {
        tags::table
            .order((tags::name.asc(), tags::id.asc()))
            .load(database_connection)
    }

    pub fn add(database_connection: &mut SqliteConnection, new_tag: &NewTag) -> Result<i32, Error> {
        diesel::insert_into(tags::table)
            .values(new_tag)
            .returning(tags::id)
            .get_result(database_connection)
    }
}
