use crate::coercion::{flag, optional_text};
use crate::composer::placeholders;
use crate::models::tagging::{Tagging, TEMPLATE_TARGET};
use crate::schema::{sentence_templates, taggings};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::result::Error;
use diesel::sqlite::Sqlite;
use rocket::serde::{Deserialize, Serialize};

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = sentence_templates)]
#[diesel(check_for_backend(Sqlite))]
pub struct SentenceTemplate {
    pub id: i32,
    pub template_pattern: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Debug, Default)]
#[diesel(table_name = sentence_templates)]
pub struct NewSentenceTemplate {
    #[serde(default, deserialize_with = "optional_text")]
    pub template_pattern: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_active: bool,
}

fn tagged_with(tag_id: i32) -> sentence_templates::BoxedQuery<'static, Sqlite> {
    let tagged_template_ids = taggings::table
        .filter(taggings::tag_id.eq(tag_id))
        .filter(taggings::target_type.eq(TEMPLATE_TARGET))
        .select(taggings::target_id);

    sentence_templates::table
        .filter(sentence_templates::id.eq_any(tagged_template_ids))
        .into_boxed()
}

fn filtered(tag_id: Option<i32>) -> sentence_templates::BoxedQuery<'static, Sqlite> {
    match tag_id {
        Some(tag_id) => tagged_with(tag_id),
        None => sentence_templates::table.into_boxed(),
    }
}

impl SentenceTemplate {
    pub fn placeholders(&self) -> Vec<String> {
        placeholders(&self.template_pattern)
    }

    pub fn find(
        database_connection: &mut SqliteConnection,
        template_id: i32,
    ) -> Result<Option<SentenceTemplate>, Error> {
        sentence_templates::table
            .find(template_id)
            .first(database_connection)
            .optional()
    }

    pub fn active_for_tag(
        database_connection: &mut SqliteConnection,
        tag_id: i32,
    ) -> Result<Vec<SentenceTemplate>, Error> {
        tagged_with(tag_id)
            .filter(sentence_templates::is_active.eq(true))
            .order(sentence_templates::id.asc())
            .load(database_connection)
    }

    pub fn page(
        database_connection: &mut SqliteConnection,
        tag_id: Option<i32>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<SentenceTemplate>, i64), Error> {
        let total = filtered(tag_id).count().get_result(database_connection)?;
        let items = filtered(tag_id)
            .order((
                sentence_templates::updated_at.desc(),
                sentence_templates::id.desc(),
            ))
            .limit(limit)
            .offset(offset)
            .load(database_connection)?;

        Ok((items, total))
    }

    pub fn add(
        database_connection: &mut SqliteConnection,
        new_template: &NewSentenceTemplate,
    ) -> Result<SentenceTemplate, Error> {
        diesel::insert_into(sentence_templates::table)
            .values(new_template)
            .returning(SentenceTemplate::as_returning())
            .get_result(database_connection)
    }

    pub fn delete_many(database_connection: &mut SqliteConnection, ids: &[i32]) -> Result<usize, Error> {
        database_connection.transaction(|connection| {
            Tagging::detach_targets(connection, TEMPLATE_TARGET, ids)?;
            diesel::delete(sentence_templates::table.filter(sentence_templates::id.eq_any(ids.to_vec())))
                .execute(connection)
        })
    }
}
