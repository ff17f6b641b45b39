use crate::coercion::{flag, optional_integer, optional_text};
use crate::models::non_blank;
use crate::models::vocabulary::Vocabulary;
use crate::schema::{generated_sentence_vocabulary, generated_sentences, tags, vocabulary};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::result::Error;
use diesel::sqlite::Sqlite;
use rocket::serde::{Deserialize, Serialize};
use rocket::FromForm;

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = generated_sentences)]
#[diesel(check_for_backend(Sqlite))]
pub struct GeneratedSentence {
    pub id: i32,
    pub template_id: Option<i32>,
    pub japanese_sentence: String,
    pub english_sentence: Option<String>,
    pub politeness_level: Option<String>,
    pub jlpt_level: Option<String>,
    pub difficulty: Option<String>,
    pub source_tag_id: Option<i32>,
    pub is_favorite: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Debug, Default, Clone, PartialEq)]
#[diesel(table_name = generated_sentences)]
pub struct NewGeneratedSentence {
    #[serde(default, deserialize_with = "optional_integer")]
    pub template_id: Option<i32>,
    #[serde(default, deserialize_with = "optional_text")]
    pub japanese_sentence: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub english_sentence: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub politeness_level: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub jlpt_level: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "optional_integer")]
    pub source_tag_id: Option<i32>,
    #[serde(default, deserialize_with = "flag")]
    pub is_favorite: bool,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Serialize, Debug, Clone, PartialEq)]
#[diesel(belongs_to(GeneratedSentence))]
#[diesel(belongs_to(Vocabulary))]
#[diesel(table_name = generated_sentence_vocabulary)]
#[diesel(check_for_backend(Sqlite))]
pub struct GeneratedSentenceVocabulary {
    pub id: i32,
    pub generated_sentence_id: i32,
    pub vocabulary_id: i32,
    pub slot_name: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotFilling {
    pub slot_name: String,
    pub vocabulary_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = generated_sentence_vocabulary)]
struct NewGeneratedSentenceVocabulary<'a> {
    generated_sentence_id: i32,
    vocabulary_id: i32,
    slot_name: &'a str,
}

#[derive(FromForm, Default, Debug)]
pub struct GeneratedSentenceFilter {
    pub tag_id: Option<i32>,
    pub politeness: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct GeneratedSentenceEntry {
    #[serde(flatten)]
    pub sentence: GeneratedSentence,
    pub tag_name: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct SlotProvenance {
    pub slot_name: String,
    pub vocabulary: Vocabulary,
}

type FilteredSentences<'a> = diesel::dsl::IntoBoxed<
    'a,
    diesel::dsl::LeftJoin<generated_sentences::table, tags::table>,
    Sqlite,
>;

fn filtered(filter: &GeneratedSentenceFilter) -> FilteredSentences<'_> {
    let mut query = generated_sentences::table.left_join(tags::table).into_boxed();

    if let Some(tag_id) = filter.tag_id {
        query = query.filter(generated_sentences::source_tag_id.eq(tag_id));
    }
    if let Some(politeness) = non_blank(&filter.politeness) {
        query = query.filter(generated_sentences::politeness_level.eq(politeness));
    }
    if let Some(difficulty) = non_blank(&filter.difficulty) {
        query = query.filter(generated_sentences::difficulty.eq(difficulty));
    }

    query
}

impl GeneratedSentence {
    pub fn add(
        database_connection: &mut SqliteConnection,
        new_sentence: &NewGeneratedSentence,
    ) -> Result<i32, Error> {
        diesel::insert_into(generated_sentences::table)
            .values(new_sentence)
            .returning(generated_sentences::id)
            .get_result(database_connection)
    }

    pub fn record(
        database_connection: &mut SqliteConnection,
        new_sentence: &NewGeneratedSentence,
        fillings: &[SlotFilling],
    ) -> Result<i32, Error> {
        database_connection.transaction(|connection| {
            let sentence_id = GeneratedSentence::add(connection, new_sentence)?;

            for filling in fillings {
                diesel::insert_into(generated_sentence_vocabulary::table)
                    .values(NewGeneratedSentenceVocabulary {
                        generated_sentence_id: sentence_id,
                        vocabulary_id: filling.vocabulary_id,
                        slot_name: &filling.slot_name,
                    })
                    .execute(connection)?;
            }

            Ok(sentence_id)
        })
    }

    pub fn find(
        database_connection: &mut SqliteConnection,
        sentence_id: i32,
    ) -> Result<Option<GeneratedSentence>, Error> {
        generated_sentences::table
            .find(sentence_id)
            .first(database_connection)
            .optional()
    }

    pub fn page(
        database_connection: &mut SqliteConnection,
        filter: &GeneratedSentenceFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<GeneratedSentenceEntry>, i64), Error> {
        let total = filtered(filter).count().get_result(database_connection)?;
        let rows: Vec<(GeneratedSentence, Option<String>)> = filtered(filter)
            .select((GeneratedSentence::as_select(), tags::name.nullable()))
            .order((
                generated_sentences::created_at.desc(),
                generated_sentences::id.desc(),
            ))
            .limit(limit)
            .offset(offset)
            .load(database_connection)?;

        Ok((
            rows.into_iter()
                .map(|(sentence, tag_name)| GeneratedSentenceEntry { sentence, tag_name })
                .collect(),
            total,
        ))
    }

    pub fn set_favorite(
        database_connection: &mut SqliteConnection,
        sentence_id: i32,
        is_favorite: bool,
    ) -> Result<bool, Error> {
        let updated = diesel::update(generated_sentences::table.find(sentence_id))
            .set(generated_sentences::is_favorite.eq(is_favorite))
            .execute(database_connection)?;

        Ok(updated > 0)
    }

    pub fn provenance(
        &self,
        database_connection: &mut SqliteConnection,
    ) -> Result<Vec<SlotProvenance>, Error> {
        let rows: Vec<(GeneratedSentenceVocabulary, Vocabulary)> =
            GeneratedSentenceVocabulary::belonging_to(self)
                .inner_join(vocabulary::table)
                .select((
                    GeneratedSentenceVocabulary::as_select(),
                    Vocabulary::as_select(),
                ))
                .order(generated_sentence_vocabulary::id.asc())
                .load(database_connection)?;

        Ok(rows
            .into_iter()
            .map(|(link, vocabulary)| SlotProvenance {
                slot_name: link.slot_name,
                vocabulary,
            })
            .collect())
    }

    pub fn delete_many(database_connection: &mut SqliteConnection, ids: &[i32]) -> Result<usize, Error> {
        diesel::delete(generated_sentences::table.filter(generated_sentences::id.eq_any(ids.to_vec())))
            .execute(database_connection)
    }
}
