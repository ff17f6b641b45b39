use crate::coercion::{optional_integer, optional_text};
use crate::database::DbConnection;
use crate::field_validator::validate;
use crate::models::sentence_template::SentenceTemplate;
use crate::models::tag::Tag;
use crate::models::tagging::{Tagging, TEMPLATE_TARGET};
use crate::payloads::{BulkDeleteRequest, Created, DeleteSummary};
use crate::responses::{ErrorResponse, ResponseResult, SuccessResponse};
use rocket::serde::json::Json;
use rocket::serde::Deserialize;
use validator::Validate;

#[derive(Validate, Deserialize)]
pub struct TaggingRequest {
    #[serde(default, deserialize_with = "optional_integer")]
    #[validate(required)]
    tag_id: Option<i32>,
    #[serde(default, deserialize_with = "optional_text")]
    target_type: Option<String>,
    #[serde(default, deserialize_with = "optional_integer")]
    #[validate(required)]
    target_id: Option<i32>,
}

#[get("/api/taggings?<tag_id>")]
pub fn list(tag_id: i32, mut database_connection: DbConnection) -> ResponseResult<Vec<Tagging>> {
    Ok(SuccessResponse::new(Tagging::for_tag(
        &mut database_connection,
        tag_id,
    )?))
}

#[post("/api/taggings", format = "json", data = "<tagging_request>")]
pub fn create(
    tagging_request: Json<TaggingRequest>,
    mut database_connection: DbConnection,
) -> ResponseResult<Created> {
    let tagging_data = validate(tagging_request)?;
    let (tag_id, target_id) = match (tagging_data.tag_id, tagging_data.target_id) {
        (Some(tag_id), Some(target_id)) => (tag_id, target_id),
        _ => {
            return Err(ErrorResponse::validation(vec![
                "tag_id and target_id are required".to_string(),
            ]))
        }
    };

    let target_type = tagging_data
        .target_type
        .unwrap_or_else(|| TEMPLATE_TARGET.to_string());
    if target_type != TEMPLATE_TARGET {
        return Err(ErrorResponse::validation(vec![format!(
            "unsupported target_type \"{}\"",
            target_type
        )]));
    }

    if Tag::find(&mut database_connection, tag_id)?.is_none() {
        return Err(ErrorResponse::not_found("Tag"));
    }
    if SentenceTemplate::find(&mut database_connection, target_id)?.is_none() {
        return Err(ErrorResponse::not_found("Template"));
    }

    let id = Tagging::attach(&mut database_connection, tag_id, &target_type, target_id)?;

    Ok(SuccessResponse::new(Created { id }))
}

#[post("/api/taggings/delete-bulk", format = "json", data = "<delete_request>")]
pub fn delete_bulk(
    delete_request: Json<BulkDeleteRequest>,
    mut database_connection: DbConnection,
) -> ResponseResult<DeleteSummary> {
    let delete_data = validate(delete_request)?;

    Ok(SuccessResponse::new(DeleteSummary {
        deleted: Tagging::delete_many(&mut database_connection, &delete_data.ids)?,
    }))
}
