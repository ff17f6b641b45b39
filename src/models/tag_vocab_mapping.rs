use crate::models::tag::Tag;
use crate::schema::{tag_vocab_mapping, tags};
use diesel::prelude::*;
use diesel::result::Error;
use rocket::serde::Serialize;
use std::collections::HashMap;

#[derive(Queryable, Selectable, Identifiable, Associations, Serialize, Debug, Clone, PartialEq)]
#[diesel(belongs_to(Tag))]
#[diesel(table_name = tag_vocab_mapping)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TagVocabMapping {
    pub id: i32,
    pub tag_id: i32,
    pub vocab_topic: String,
    pub vocab_subtopic: Option<String>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = tag_vocab_mapping)]
pub struct NewTagVocabMapping {
    pub tag_id: i32,
    pub vocab_topic: String,
    pub vocab_subtopic: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct TagMappingEntry {
    pub mapping_id: i32,
    pub tag_id: i32,
    pub tag_name: String,
    pub parent_tag_name: Option<String>,
    pub vocab_topic: String,
    pub vocab_subtopic: Option<String>,
    pub description: Option<String>,
}

impl TagVocabMapping {
    pub fn for_tag(
        database_connection: &mut SqliteConnection,
        tag_id: i32,
    ) -> Result<Vec<TagVocabMapping>, Error> {
        tag_vocab_mapping::table
            .filter(tag_vocab_mapping::tag_id.eq(tag_id))
            .order(tag_vocab_mapping::id.asc())
            .load(database_connection)
    }

    pub fn add(
        database_connection: &mut SqliteConnection,
        new_mapping: &NewTagVocabMapping,
    ) -> Result<i32, Error> {
        diesel::insert_into(tag_vocab_mapping::table)
            .values(new_mapping)
            .returning(tag_vocab_mapping::id)
            .get_result(database_connection)
    }

    pub fn entries(database_connection: &mut SqliteConnection) -> Result<Vec<TagMappingEntry>, Error> {
        let rows: Vec<(TagVocabMapping, Tag)> = tag_vocab_mapping::table
            .inner_join(tags::table)
            .select((TagVocabMapping::as_select(), Tag::as_select()))
            .order((tags::name.asc(), tag_vocab_mapping::id.asc()))
            .load(database_connection)?;

        let parent_ids = rows
            .iter()
            .filter_map(|(_, tag)| tag.parent_tag_id)
            .collect::<Vec<i32>>();
        let parent_names: HashMap<i32, String> = tags::table
            .filter(tags::id.eq_any(parent_ids))
            .select((tags::id, tags::name))
            .load::<(i32, String)>(database_connection)?
            .into_iter()
            .collect();

        Ok(rows
            .into_iter()
            .map(|(mapping, tag)| TagMappingEntry {
                mapping_id: mapping.id,
                tag_id: tag.id,
                parent_tag_name: tag
                    .parent_tag_id
                    .and_then(|parent_id| parent_names.get(&parent_id).cloned()),
                tag_name: tag.name,
                vocab_topic: mapping.vocab_topic,
                vocab_subtopic: mapping.vocab_subtopic,
                description: tag.description,
            })
            .collect())
    }

    pub fn delete_many(database_connection: &mut SqliteConnection, ids: &[i32]) -> Result<usize, Error> {
        diesel::delete(tag_vocab_mapping::table.filter(tag_vocab_mapping::id.eq_any(ids.to_vec())))
            .execute(database_connection)
    }
}
