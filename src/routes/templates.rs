use crate::database::DbConnection;
use crate::field_validator::validate;
use crate::models::sentence_template::{NewSentenceTemplate, SentenceTemplate};
use crate::models::template_slot::{NewTemplateSlotData, SlotRejection, TemplateSlot};
use crate::payloads::{page_bounds, BulkDeleteRequest, Created, DeleteSummary, ImportRequest, ImportSummary, Page};
use crate::responses::{ErrorResponse, ResponseResult, SuccessResponse};
use diesel::result::Error;
use diesel::SqliteConnection;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::serde::Serialize;

#[derive(Serialize)]
pub struct TemplateCreated {
    id: i32,
    placeholders: Vec<String>,
}

#[get("/api/sentence-templates?<limit>&<offset>&<tag_id>")]
pub fn list(
    limit: Option<i64>,
    offset: Option<i64>,
    tag_id: Option<i32>,
    mut database_connection: DbConnection,
) -> ResponseResult<Page<SentenceTemplate>> {
    let (limit, offset) = page_bounds(limit, offset);
    let (items, total) = SentenceTemplate::page(&mut database_connection, tag_id, limit, offset)?;

    Ok(SuccessResponse::new(Page { items, total }))
}

#[post("/api/sentence-templates", format = "json", data = "<template_request>")]
pub fn create(
    template_request: Json<NewSentenceTemplate>,
    mut database_connection: DbConnection,
) -> ResponseResult<TemplateCreated> {
    let new_template = template_request.into_inner();
    if new_template.template_pattern.is_none() {
        return Err(ErrorResponse::validation(vec![
            "template_pattern is required".to_string(),
        ]));
    }

    let template = SentenceTemplate::add(&mut database_connection, &new_template)?;

    Ok(SuccessResponse::new(TemplateCreated {
        id: template.id,
        placeholders: template.placeholders(),
    }))
}

fn import_template_row(connection: &mut SqliteConnection, row: NewSentenceTemplate) -> Result<bool, Error> {
    if row.template_pattern.is_none() {
        return Ok(false);
    }
    SentenceTemplate::add(connection, &row)?;

    Ok(true)
}

#[post("/api/sentence-templates/import", format = "json", data = "<import_request>")]
pub fn import(
    import_request: Json<ImportRequest>,
    mut database_connection: DbConnection,
) -> ResponseResult<ImportSummary> {
    let import_data = validate(import_request)?;

    Ok(SuccessResponse::new(
        import_data.import(&mut database_connection, import_template_row)?,
    ))
}

#[post("/api/sentence-templates/delete-bulk", format = "json", data = "<delete_request>")]
pub fn delete_bulk(
    delete_request: Json<BulkDeleteRequest>,
    mut database_connection: DbConnection,
) -> ResponseResult<DeleteSummary> {
    let delete_data = validate(delete_request)?;

    Ok(SuccessResponse::new(DeleteSummary {
        deleted: SentenceTemplate::delete_many(&mut database_connection, &delete_data.ids)?,
    }))
}

impl From<SlotRejection> for ErrorResponse {
    fn from(rejection: SlotRejection) -> ErrorResponse {
        match rejection {
            SlotRejection::MissingFields => ErrorResponse::validation(vec![
                "template_id and slot_name are required".to_string(),
            ]),
            SlotRejection::UnknownTemplate => ErrorResponse::not_found("Template"),
            SlotRejection::NotInPattern => ErrorResponse::validation(vec![
                "slot_name must appear as a placeholder in the template pattern".to_string(),
            ]),
            SlotRejection::DuplicateName => ErrorResponse::fail(
                "Slot Already Defined For Template".to_string(),
                Status::Conflict,
            ),
            SlotRejection::Store(error) => error.into(),
        }
    }
}

#[get("/api/template-slots?<template_id>")]
pub fn slots(
    template_id: Option<i32>,
    mut database_connection: DbConnection,
) -> ResponseResult<Vec<TemplateSlot>> {
    let template_id = template_id
        .ok_or_else(|| ErrorResponse::validation(vec!["template_id is required".to_string()]))?;

    Ok(SuccessResponse::new(TemplateSlot::for_template(
        &mut database_connection,
        template_id,
    )?))
}

#[post("/api/template-slots", format = "json", data = "<slot_request>")]
pub fn create_slot(
    slot_request: Json<NewTemplateSlotData>,
    mut database_connection: DbConnection,
) -> ResponseResult<Created> {
    let new_slot = TemplateSlot::prepare(&mut database_connection, slot_request.into_inner())?;
    let id = TemplateSlot::add(&mut database_connection, &new_slot)?;

    Ok(SuccessResponse::new(Created { id }))
}

fn import_slot_row(connection: &mut SqliteConnection, row: NewTemplateSlotData) -> Result<bool, Error> {
    let new_slot = match TemplateSlot::prepare(connection, row) {
        Ok(new_slot) => new_slot,
        Err(SlotRejection::Store(error)) => return Err(error),
        Err(rejection) => {
            tracing::debug!(?rejection, "skipping template slot row");
            return Ok(false);
        }
    };
    TemplateSlot::add(connection, &new_slot)?;

    Ok(true)
}

#[post("/api/template-slots/import", format = "json", data = "<import_request>")]
pub fn import_slots(
    import_request: Json<ImportRequest>,
    mut database_connection: DbConnection,
) -> ResponseResult<ImportSummary> {
    let import_data = validate(import_request)?;

    Ok(SuccessResponse::new(
        import_data.import(&mut database_connection, import_slot_row)?,
    ))
}

#[post("/api/template-slots/delete-bulk", format = "json", data = "<delete_request>")]
pub fn delete_slots(
    delete_request: Json<BulkDeleteRequest>,
    mut database_connection: DbConnection,
) -> ResponseResult<DeleteSummary> {
    let delete_data = validate(delete_request)?;

    Ok(SuccessResponse::new(DeleteSummary {
        deleted: TemplateSlot::delete_many(&mut database_connection, &delete_data.ids)?,
    }))
}
