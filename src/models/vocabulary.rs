use crate::coercion::optional_text;
use crate::levels::DisplayField;
use crate::models::tag_vocab_mapping::TagVocabMapping;
use crate::models::non_blank;
use crate::schema::vocabulary;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::result::Error;
use diesel::sql_types::{Bool, Nullable};
use diesel::sqlite::Sqlite;
use rocket::serde::{Deserialize, Serialize};
use rocket::FromForm;

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = vocabulary)]
#[diesel(check_for_backend(Sqlite))]
pub struct Vocabulary {
    pub id: i32,
    pub kanji: Option<String>,
    pub furigana: Option<String>,
    pub romaji: Option<String>,
    pub meaning: Option<String>,
    pub part_of_speech: Option<String>,
    pub topic: Option<String>,
    pub subtopic: Option<String>,
    pub politeness_level: Option<String>,
    pub jlpt_level: Option<String>,
    pub difficulty: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Deserialize, Debug, Default)]
#[diesel(table_name = vocabulary)]
pub struct NewVocabulary {
    #[serde(default, deserialize_with = "optional_text")]
    pub kanji: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub furigana: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub romaji: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub meaning: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub part_of_speech: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub topic: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub subtopic: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub politeness_level: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub jlpt_level: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub notes: Option<String>,
}

impl NewVocabulary {
    pub fn has_display_form(&self) -> bool {
        self.kanji.is_some() || self.furigana.is_some() || self.romaji.is_some() || self.meaning.is_some()
    }
}

#[derive(FromForm, Default, Debug)]
pub struct VocabularyFilter {
    pub topic: Option<String>,
    pub subtopic: Option<String>,
    pub politeness: Option<String>,
    pub jlpt: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VocabularyCriteria {
    pub part_of_speech: String,
    pub difficulty: Option<String>,
    pub jlpt_level: Option<String>,
    pub politeness_level: Option<String>,
    pub topics: Vec<TagVocabMapping>,
}

type TopicClause = Box<dyn BoxableExpression<vocabulary::table, Sqlite, SqlType = Nullable<Bool>>>;

fn topic_clause(mapping: &TagVocabMapping) -> TopicClause {
    let topic = vocabulary::topic.eq(mapping.vocab_topic.clone());
    match &mapping.vocab_subtopic {
        Some(subtopic) => Box::new(topic.and(vocabulary::subtopic.eq(subtopic.clone()))),
        None => Box::new(topic),
    }
}

fn filtered(filter: &VocabularyFilter) -> vocabulary::BoxedQuery<'_, Sqlite> {
    let mut query = vocabulary::table.into_boxed();

    if let Some(topic) = non_blank(&filter.topic) {
        query = query.filter(vocabulary::topic.eq(topic));
    }
    if let Some(subtopic) = non_blank(&filter.subtopic) {
        query = query.filter(vocabulary::subtopic.eq(subtopic));
    }
    if let Some(politeness) = non_blank(&filter.politeness) {
        query = query.filter(vocabulary::politeness_level.eq(politeness));
    }
    if let Some(jlpt) = non_blank(&filter.jlpt) {
        query = query.filter(vocabulary::jlpt_level.eq(jlpt));
    }
    if let Some(difficulty) = non_blank(&filter.difficulty) {
        query = query.filter(vocabulary::difficulty.eq(difficulty));
    }

    query
}

impl Vocabulary {
    /// The written form shown for this word: the requested field when it is
    /// filled in, otherwise kanji, romaji, furigana, meaning, then nothing.
    pub fn display_form(&self, field: DisplayField) -> &str {
        let requested = match field {
            DisplayField::Kanji => &self.kanji,
            DisplayField::Furigana => &self.furigana,
            DisplayField::Romaji => &self.romaji,
            DisplayField::Meaning => &self.meaning,
        };

        [requested, &self.kanji, &self.romaji, &self.furigana, &self.meaning]
            .into_iter()
            .filter_map(|form| form.as_deref())
            .find(|form| !form.is_empty())
            .unwrap_or("")
    }

    pub fn add(
        database_connection: &mut SqliteConnection,
        new_vocabulary: &NewVocabulary,
    ) -> Result<i32, Error> {
        diesel::insert_into(vocabulary::table)
            .values(new_vocabulary)
            .returning(vocabulary::id)
            .get_result(database_connection)
    }

    pub fn page(
        database_connection: &mut SqliteConnection,
        filter: &VocabularyFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Vocabulary>, i64), Error> {
        let total = filtered(filter).count().get_result(database_connection)?;
        let items = filtered(filter)
            .order((vocabulary::updated_at.desc(), vocabulary::id.desc()))
            .limit(limit)
            .offset(offset)
            .load(database_connection)?;

        Ok((items, total))
    }

    pub fn matching(
        database_connection: &mut SqliteConnection,
        criteria: &VocabularyCriteria,
    ) -> Result<Vec<Vocabulary>, Error> {
        let mut query = vocabulary::table
            .into_boxed()
            .filter(vocabulary::part_of_speech.eq(criteria.part_of_speech.clone()));

        if let Some(difficulty) = &criteria.difficulty {
            query = query.filter(vocabulary::difficulty.eq(difficulty.clone()));
        }
        if let Some(jlpt_level) = &criteria.jlpt_level {
            query = query.filter(vocabulary::jlpt_level.eq(jlpt_level.clone()));
        }
        if let Some(politeness_level) = &criteria.politeness_level {
            query = query.filter(vocabulary::politeness_level.eq(politeness_level.clone()));
        }

        let mut clauses = criteria.topics.iter().map(topic_clause);
        if let Some(first) = clauses.next() {
            let any_topic = clauses.fold(first, |group, clause| -> TopicClause {
                Box::new(group.or(clause))
            });
            query = query.filter(any_topic);
        }

        query.order(vocabulary::id.asc()).load(database_connection)
    }

    pub fn delete_many(database_connection: &mut SqliteConnection, ids: &[i32]) -> Result<usize, Error> {
        diesel::delete(vocabulary::table.filter(vocabulary::id.eq_any(ids.to_vec())))
            .execute(database_connection)
    }
}
