use crate::models::tag::Tag;
use crate::schema::taggings;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::result::Error;
use rocket::serde::Serialize;

pub const TEMPLATE_TARGET: &str = "template";

#[derive(Queryable, Selectable, Identifiable, Associations, Serialize, Debug, PartialEq)]
#[diesel(belongs_to(Tag))]
#[diesel(table_name = taggings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Tagging {
    pub id: i32,
    pub tag_id: i32,
    pub target_type: String,
    pub target_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = taggings)]
struct NewTagging<'a> {
    tag_id: i32,
    target_type: &'a str,
    target_id: i32,
}

impl Tagging {
    pub fn attach(
        database_connection: &mut SqliteConnection,
        tag_id: i32,
        target_type: &str,
        target_id: i32,
    ) -> Result<i32, Error> {
        database_connection.transaction(|connection| {
            let existing = taggings::table
                .filter(taggings::tag_id.eq(tag_id))
                .filter(taggings::target_type.eq(target_type))
                .filter(taggings::target_id.eq(target_id))
                .select(taggings::id)
                .first::<i32>(connection)
                .optional()?;

            match existing {
                Some(id) => Ok(id),
                None => diesel::insert_into(taggings::table)
                    .values(NewTagging {
                        tag_id,
                        target_type,
                        target_id,
                    })
                    .returning(taggings::id)
                    .get_result(connection),
            }
        })
    }

    pub fn for_tag(database_connection: &mut SqliteConnection, tag_id: i32) -> Result<Vec<Tagging>, Error> {
        taggings::table
            .filter(taggings::tag_id.eq(tag_id))
            .order(taggings::id.asc())
            .load(database_connection)
    }

    pub fn detach_targets(
        database_connection: &mut SqliteConnection,
        target_type: &str,
        target_ids: &[i32],
    ) -> Result<usize, Error> {
        diesel::delete(
            taggings::table
                .filter(taggings::target_type.eq(target_type))
                .filter(taggings::target_id.eq_any(target_ids.to_vec())),
        )
        .execute(database_connection)
    }

    pub fn delete_many(database_connection: &mut SqliteConnection, ids: &[i32]) -> Result<usize, Error> {
        diesel::delete(taggings::table.filter(taggings::id.eq_any(ids.to_vec())))
            .execute(database_connection)
    }
}
