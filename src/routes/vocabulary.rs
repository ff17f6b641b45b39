use crate::database::DbConnection;
use crate::models::vocabulary::{NewVocabulary, Vocabulary, VocabularyFilter};
use crate::payloads::{page_bounds, BulkDeleteRequest, Created, DeleteSummary, ImportRequest, ImportSummary, Page};
use crate::field_validator::validate;
use crate::responses::{ErrorResponse, ResponseResult, SuccessResponse};
use diesel::result::Error;
use diesel::SqliteConnection;
use rocket::serde::json::Json;

#[get("/api/vocabulary?<limit>&<offset>&<filter..>")]
pub fn list(
    limit: Option<i64>,
    offset: Option<i64>,
    filter: VocabularyFilter,
    mut database_connection: DbConnection,
) -> ResponseResult<Page<Vocabulary>> {
    let (limit, offset) = page_bounds(limit, offset);
    let (items, total) = Vocabulary::page(&mut database_connection, &filter, limit, offset)?;

    Ok(SuccessResponse::new(Page { items, total }))
}

#[post("/api/vocabulary", format = "json", data = "<vocabulary_request>")]
pub fn create(
    vocabulary_request: Json<NewVocabulary>,
    mut database_connection: DbConnection,
) -> ResponseResult<Created> {
    let new_vocabulary = vocabulary_request.into_inner();
    if !new_vocabulary.has_display_form() {
        return Err(ErrorResponse::validation(vec![
            "one of kanji, furigana, romaji or meaning is required".to_string(),
        ]));
    }

    let id = Vocabulary::add(&mut database_connection, &new_vocabulary)?;

    Ok(SuccessResponse::new(Created { id }))
}

fn import_row(connection: &mut SqliteConnection, row: NewVocabulary) -> Result<bool, Error> {
    if !row.has_display_form() {
        return Ok(false);
    }
    Vocabulary::add(connection, &row)?;

    Ok(true)
}

#[post("/api/vocabulary/import", format = "json", data = "<import_request>")]
pub fn import(
    import_request: Json<ImportRequest>,
    mut database_connection: DbConnection,
) -> ResponseResult<ImportSummary> {
    let import_data = validate(import_request)?;

    Ok(SuccessResponse::new(
        import_data.import(&mut database_connection, import_row)?,
    ))
}

#[post("/api/vocabulary/delete-bulk", format = "json", data = "<delete_request>")]
pub fn delete_bulk(
    delete_request: Json<BulkDeleteRequest>,
    mut database_connection: DbConnection,
) -> ResponseResult<DeleteSummary> {
    let delete_data = validate(delete_request)?;

    Ok(SuccessResponse::new(DeleteSummary {
        deleted: Vocabulary::delete_many(&mut database_connection, &delete_data.ids)?,
    }))
}
