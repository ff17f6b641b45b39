use crate::coercion::{optional_integer, optional_text};
use crate::database::DbConnection;
use crate::field_validator::validate;
use crate::models::tag::{NewTag, Tag};
use crate::models::tag_vocab_mapping::{NewTagVocabMapping, TagMappingEntry, TagVocabMapping};
use crate::payloads::{BulkDeleteRequest, DeleteSummary, ImportRequest, ImportSummary};
use crate::responses::{ErrorResponse, ResponseResult, SuccessResponse};
use diesel::result::Error;
use diesel::{Connection, SqliteConnection};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use validator::Validate;

#[get("/api/tags")]
pub fn list(mut database_connection: DbConnection) -> ResponseResult<Vec<Tag>> {
    Ok(SuccessResponse::new(Tag::all(&mut database_connection)?))
}

#[get("/api/tag-mappings")]
pub fn mappings(mut database_connection: DbConnection) -> ResponseResult<Vec<TagMappingEntry>> {
    Ok(SuccessResponse::new(TagVocabMapping::entries(
        &mut database_connection,
    )?))
}

#[derive(Validate, Deserialize)]
pub struct TagWithMappingRequest {
    #[serde(default, deserialize_with = "optional_text")]
    #[validate(required)]
    name: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "optional_text")]
    tag_type: Option<String>,
    #[serde(default, deserialize_with = "optional_integer")]
    parent_tag_id: Option<i32>,
    #[serde(default, deserialize_with = "optional_text")]
    description: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    #[validate(required)]
    vocab_topic: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    vocab_subtopic: Option<String>,
}

#[derive(Serialize)]
pub struct TagCreated {
    tag_id: i32,
    mapping_id: i32,
}

#[post("/api/tags-with-mapping", format = "json", data = "<tag_request>")]
pub fn create_with_mapping(
    tag_request: Json<TagWithMappingRequest>,
    mut database_connection: DbConnection,
) -> ResponseResult<TagCreated> {
    let tag_data = validate(tag_request)?;

    if let Some(parent_tag_id) = tag_data.parent_tag_id {
        if Tag::find(&mut database_connection, parent_tag_id)?.is_none() {
            return Err(ErrorResponse::validation(vec![format!(
                "parent tag {} does not exist",
                parent_tag_id
            )]));
        }
    }

    let created = database_connection.transaction::<_, Error, _>(|connection| {
        let tag_id = Tag::add(
            connection,
            &NewTag {
                name: tag_data.name,
                tag_type: tag_data.tag_type,
                parent_tag_id: tag_data.parent_tag_id,
                description: tag_data.description,
            },
        )?;
        let mapping_id = TagVocabMapping::add(
            connection,
            &NewTagVocabMapping {
                tag_id,
                vocab_topic: tag_data.vocab_topic.unwrap_or_default(),
                vocab_subtopic: tag_data.vocab_subtopic,
            },
        )?;

        Ok(TagCreated { tag_id, mapping_id })
    })?;

    Ok(SuccessResponse::new(created))
}

#[derive(Deserialize)]
struct TagMappingRow {
    #[serde(default, deserialize_with = "optional_text")]
    tag_name: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    name: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "optional_text")]
    tag_type: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    description: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    parent_tag_name: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    vocab_topic: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    vocab_subtopic: Option<String>,
}

fn import_mapping_row(connection: &mut SqliteConnection, row: TagMappingRow) -> Result<bool, Error> {
    let (tag_name, vocab_topic) = match (row.tag_name.or(row.name), row.vocab_topic) {
        (Some(tag_name), Some(vocab_topic)) => (tag_name, vocab_topic),
        _ => return Ok(false),
    };

    let tag_id = match Tag::find_by_name(connection, &tag_name)? {
        Some(tag) => tag.id,
        None => {
            let parent_tag_id = match &row.parent_tag_name {
                Some(parent_name) => Tag::find_by_name(connection, parent_name)?.map(|parent| parent.id),
                None => None,
            };
            Tag::add(
                connection,
                &NewTag {
                    name: Some(tag_name),
                    tag_type: row.tag_type,
                    parent_tag_id,
                    description: row.description,
                },
            )?
        }
    };

    TagVocabMapping::add(
        connection,
        &NewTagVocabMapping {
            tag_id,
            vocab_topic,
            vocab_subtopic: row.vocab_subtopic,
        },
    )?;

    Ok(true)
}

#[post("/api/tag-mappings/import", format = "json", data = "<import_request>")]
pub fn import_mappings(
    import_request: Json<ImportRequest>,
    mut database_connection: DbConnection,
) -> ResponseResult<ImportSummary> {
    let import_data = validate(import_request)?;

    Ok(SuccessResponse::new(
        import_data.import(&mut database_connection, import_mapping_row)?,
    ))
}

#[post("/api/tag-mappings/delete-bulk", format = "json", data = "<delete_request>")]
pub fn delete_mappings(
    delete_request: Json<BulkDeleteRequest>,
    mut database_connection: DbConnection,
) -> ResponseResult<DeleteSummary> {
    let delete_data = validate(delete_request)?;

    Ok(SuccessResponse::new(DeleteSummary {
        deleted: TagVocabMapping::delete_many(&mut database_connection, &delete_data.ids)?,
    }))
}
