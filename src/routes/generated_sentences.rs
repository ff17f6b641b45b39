use crate::coercion::{flag, optional_text};
use crate::database::DbConnection;
use crate::field_validator::validate;
use crate::models::generated_sentence::{
    GeneratedSentence, GeneratedSentenceEntry, GeneratedSentenceFilter, NewGeneratedSentence, SlotProvenance,
};
use crate::models::sentence_template::SentenceTemplate;
use crate::models::tag::Tag;
use crate::payloads::{page_bounds, BulkDeleteRequest, Created, DeleteSummary, ImportRequest, ImportSummary, Page};
use crate::responses::{ErrorResponse, ResponseResult, SuccessResponse};
use diesel::result::Error;
use diesel::SqliteConnection;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};

#[get("/api/generated-sentences?<limit>&<offset>&<filter..>")]
pub fn list(
    limit: Option<i64>,
    offset: Option<i64>,
    filter: GeneratedSentenceFilter,
    mut database_connection: DbConnection,
) -> ResponseResult<Page<GeneratedSentenceEntry>> {
    let (limit, offset) = page_bounds(limit, offset);
    let (items, total) = GeneratedSentence::page(&mut database_connection, &filter, limit, offset)?;

    Ok(SuccessResponse::new(Page { items, total }))
}

fn missing_reference(
    connection: &mut SqliteConnection,
    sentence: &NewGeneratedSentence,
) -> Result<Option<String>, Error> {
    if let Some(template_id) = sentence.template_id {
        if SentenceTemplate::find(connection, template_id)?.is_none() {
            return Ok(Some(format!("template {} does not exist", template_id)));
        }
    }
    if let Some(source_tag_id) = sentence.source_tag_id {
        if Tag::find(connection, source_tag_id)?.is_none() {
            return Ok(Some(format!("source tag {} does not exist", source_tag_id)));
        }
    }

    Ok(None)
}

#[post("/api/generated-sentences", format = "json", data = "<sentence_request>")]
pub fn create(
    sentence_request: Json<NewGeneratedSentence>,
    mut database_connection: DbConnection,
) -> ResponseResult<Created> {
    let new_sentence = sentence_request.into_inner();
    if new_sentence.japanese_sentence.is_none() {
        return Err(ErrorResponse::validation(vec![
            "japanese_sentence is required".to_string(),
        ]));
    }
    if let Some(reason) = missing_reference(&mut database_connection, &new_sentence)? {
        return Err(ErrorResponse::validation(vec![reason]));
    }

    let id = GeneratedSentence::add(&mut database_connection, &new_sentence)?;

    Ok(SuccessResponse::new(Created { id }))
}

#[derive(Deserialize)]
struct SentenceRow {
    #[serde(flatten)]
    sentence: NewGeneratedSentence,
    #[serde(default, deserialize_with = "optional_text")]
    tag_name: Option<String>,
}

// Unknown tag names leave the sentence without a source tag.
fn import_sentence_row(connection: &mut SqliteConnection, row: SentenceRow) -> Result<bool, Error> {
    let mut sentence = row.sentence;
    if sentence.japanese_sentence.is_none() {
        return Ok(false);
    }

    if sentence.source_tag_id.is_none() {
        if let Some(tag_name) = &row.tag_name {
            sentence.source_tag_id = Tag::find_by_name(connection, tag_name)?.map(|tag| tag.id);
        }
    }
    if let Some(reason) = missing_reference(connection, &sentence)? {
        tracing::debug!(reason = %reason, "skipping generated sentence row");
        return Ok(false);
    }
    GeneratedSentence::add(connection, &sentence)?;

    Ok(true)
}

#[post("/api/generated-sentences/import", format = "json", data = "<import_request>")]
pub fn import(
    import_request: Json<ImportRequest>,
    mut database_connection: DbConnection,
) -> ResponseResult<ImportSummary> {
    let import_data = validate(import_request)?;

    Ok(SuccessResponse::new(
        import_data.import(&mut database_connection, import_sentence_row)?,
    ))
}

#[post("/api/generated-sentences/delete-bulk", format = "json", data = "<delete_request>")]
pub fn delete_bulk(
    delete_request: Json<BulkDeleteRequest>,
    mut database_connection: DbConnection,
) -> ResponseResult<DeleteSummary> {
    let delete_data = validate(delete_request)?;

    Ok(SuccessResponse::new(DeleteSummary {
        deleted: GeneratedSentence::delete_many(&mut database_connection, &delete_data.ids)?,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    #[serde(default, deserialize_with = "flag")]
    is_favorite: bool,
}

#[derive(Serialize)]
pub struct FavoriteState {
    id: i32,
    is_favorite: bool,
}

#[post("/api/generated-sentences/<id>/favorite", format = "json", data = "<favorite_request>")]
pub fn favorite(
    id: i32,
    favorite_request: Json<FavoriteRequest>,
    mut database_connection: DbConnection,
) -> ResponseResult<FavoriteState> {
    let is_favorite = favorite_request.is_favorite;
    if !GeneratedSentence::set_favorite(&mut database_connection, id, is_favorite)? {
        return Err(ErrorResponse::not_found("Sentence"));
    }

    Ok(SuccessResponse::new(FavoriteState { id, is_favorite }))
}

#[get("/api/generated-sentences/<id>/vocabulary")]
pub fn vocabulary(id: i32, mut database_connection: DbConnection) -> ResponseResult<Vec<SlotProvenance>> {
    let sentence = GeneratedSentence::find(&mut database_connection, id)?
        .ok_or_else(|| ErrorResponse::not_found("Sentence"))?;

    Ok(SuccessResponse::new(sentence.provenance(&mut database_connection)?))
}
