use crate::coercion::{flag, optional_integer, optional_text};
use crate::models::sentence_template::SentenceTemplate;
use crate::schema::template_slots;
use diesel::prelude::*;
use diesel::result::Error;
use rocket::serde::{Deserialize, Serialize};

pub const DEFAULT_PART_OF_SPEECH: &str = "noun";

#[derive(Queryable, Selectable, Identifiable, Associations, Serialize, Debug, Clone, PartialEq)]
#[diesel(belongs_to(SentenceTemplate, foreign_key = template_id))]
#[diesel(table_name = template_slots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TemplateSlot {
    pub id: i32,
    pub template_id: i32,
    pub slot_name: String,
    pub grammatical_role: Option<String>,
    pub part_of_speech: Option<String>,
    pub is_required: bool,
    pub order_index: i32,
    pub notes: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct NewTemplateSlotData {
    #[serde(default, deserialize_with = "optional_integer")]
    pub template_id: Option<i32>,
    #[serde(default, deserialize_with = "optional_text")]
    pub slot_name: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub grammatical_role: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub part_of_speech: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_required: bool,
    #[serde(default, deserialize_with = "optional_integer")]
    pub order_index: Option<i32>,
    #[serde(default, deserialize_with = "optional_text")]
    pub notes: Option<String>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = template_slots)]
pub struct NewTemplateSlot {
    pub template_id: i32,
    pub slot_name: String,
    pub grammatical_role: Option<String>,
    pub part_of_speech: Option<String>,
    pub is_required: bool,
    pub order_index: i32,
    pub notes: Option<String>,
}

#[derive(Debug)]
pub enum SlotRejection {
    MissingFields,
    UnknownTemplate,
    NotInPattern,
    DuplicateName,
    Store(Error),
}

impl From<Error> for SlotRejection {
    fn from(error: Error) -> SlotRejection {
        SlotRejection::Store(error)
    }
}

impl TemplateSlot {
    pub fn required_part_of_speech(&self) -> &str {
        self.part_of_speech
            .as_deref()
            .filter(|part_of_speech| !part_of_speech.is_empty())
            .unwrap_or(DEFAULT_PART_OF_SPEECH)
    }

    pub fn for_template(
        database_connection: &mut SqliteConnection,
        template_id: i32,
    ) -> Result<Vec<TemplateSlot>, Error> {
        template_slots::table
            .filter(template_slots::template_id.eq(template_id))
            .order((template_slots::order_index.asc(), template_slots::id.asc()))
            .load(database_connection)
    }

    pub fn prepare(
        database_connection: &mut SqliteConnection,
        data: NewTemplateSlotData,
    ) -> Result<NewTemplateSlot, SlotRejection> {
        let (template_id, slot_name) = match (data.template_id, data.slot_name) {
            (Some(template_id), Some(slot_name)) => (template_id, slot_name),
            _ => return Err(SlotRejection::MissingFields),
        };

        let template = match SentenceTemplate::find(database_connection, template_id)? {
            Some(template) => template,
            None => return Err(SlotRejection::UnknownTemplate),
        };
        if !template.placeholders().contains(&slot_name) {
            return Err(SlotRejection::NotInPattern);
        }

        let name_taken = template_slots::table
            .filter(template_slots::template_id.eq(template_id))
            .filter(template_slots::slot_name.eq(slot_name.as_str()))
            .count()
            .get_result::<i64>(database_connection)?
            > 0;
        if name_taken {
            return Err(SlotRejection::DuplicateName);
        }

        Ok(NewTemplateSlot {
            template_id,
            slot_name,
            grammatical_role: data.grammatical_role,
            part_of_speech: data.part_of_speech,
            is_required: data.is_required,
            order_index: data.order_index.unwrap_or(0),
            notes: data.notes,
        })
    }

    pub fn add(
        database_connection: &mut SqliteConnection,
        new_slot: &NewTemplateSlot,
    ) -> Result<i32, Error> {
        diesel::insert_into(template_slots::table)
            .values(new_slot)
            .returning(template_slots::id)
            .get_result(database_connection)
    }

    pub fn delete_many(database_connection: &mut SqliteConnection, ids: &[i32]) -> Result<usize, Error> {
        diesel::delete(template_slots::table.filter(template_slots::id.eq_any(ids.to_vec())))
            .execute(database_connection)
    }
}
