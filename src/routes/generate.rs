use crate::coercion::{optional_choice, optional_integer};
use crate::database::DbConnection;
use crate::field_validator::validate;
use crate::generator::{self, Generation, GenerationError, GenerationRequest, VocabularyFilters};
use crate::levels::{Difficulty, DisplayField, JlptLevel, PolitenessLevel};
use crate::responses::{ErrorResponse, ResponseResult, SuccessResponse};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::serde::Deserialize;
use validator::Validate;

#[derive(Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default, deserialize_with = "optional_integer")]
    #[validate(required, range(min = 1))]
    tag_id: Option<i32>,
    #[serde(default, deserialize_with = "optional_choice")]
    difficulty: Option<Difficulty>,
    #[serde(default, deserialize_with = "optional_choice")]
    jlpt_level: Option<JlptLevel>,
    #[serde(default, deserialize_with = "optional_choice")]
    politeness_level: Option<PolitenessLevel>,
    #[serde(default, deserialize_with = "optional_choice")]
    display_field: Option<DisplayField>,
}

impl From<GenerationError> for ErrorResponse {
    fn from(error: GenerationError) -> ErrorResponse {
        match error {
            GenerationError::Store(store_error) => store_error.into(),
            GenerationError::UnknownTag(_) => {
                tracing::debug!(error = %error, "generation rejected");
                ErrorResponse::fail(error.to_string(), Status::NotFound)
            }
            _ => {
                tracing::debug!(error = %error, "generation rejected");
                ErrorResponse::fail(error.to_string(), Status::BadRequest)
            }
        }
    }
}

#[post("/api/generate", format = "json", data = "<generate_request>")]
pub fn generate(
    generate_request: Json<GenerateRequest>,
    mut database_connection: DbConnection,
) -> ResponseResult<Generation> {
    let generate_data = validate(generate_request)?;
    let tag_id = generate_data
        .tag_id
        .ok_or_else(|| ErrorResponse::validation(vec!["tagId is required".to_string()]))?;

    let request = GenerationRequest {
        tag_id,
        filters: VocabularyFilters {
            difficulty: generate_data.difficulty,
            jlpt_level: generate_data.jlpt_level,
            politeness_level: generate_data.politeness_level,
        },
        display_field: generate_data.display_field.unwrap_or_default(),
    };

    let generation = generator::generate(&mut *database_connection, &mut rand::thread_rng(), &request)?;

    Ok(SuccessResponse::new(generation))
}
