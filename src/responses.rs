use std::io::Cursor;

use diesel::result::{DatabaseErrorKind, Error};
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use rocket::serde::Serialize;

#[derive(Serialize)]
#[serde(tag = "status", rename = "success")]
pub struct SuccessResponse<T: Serialize> {
    data: T,
    #[serde(skip_serializing)]
    http_status: Status,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> SuccessResponse<T> {
        SuccessResponse {
            data,
            http_status: Status::Ok,
        }
    }
}

fn json_response<S: Serialize>(body: &S, http_status: Status) -> response::Result<'static> {
    let json = serde_json::to_string(body).map_err(|error| {
        tracing::error!(error = %error, "response serialization failed");
        Status::InternalServerError
    })?;

    Response::build()
        .sized_body(json.len(), Cursor::new(json))
        .header(ContentType::new("application", "json"))
        .status(http_status)
        .ok()
}

impl<'r, T: Serialize> Responder<'r, 'static> for SuccessResponse<T> {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        json_response(&self, self.http_status)
    }
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Fail,
    Error,
}

#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    status: ErrorType,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasons: Option<Vec<String>>,
    #[serde(skip_serializing)]
    http_status: Status,
}

impl ErrorResponse {
    pub fn error(message: String, http_status: Status) -> ErrorResponse {
        ErrorResponse {
            status: ErrorType::Error,
            message,
            reasons: None,
            http_status,
        }
    }

    pub fn fail(message: String, http_status: Status) -> ErrorResponse {
        ErrorResponse {
            status: ErrorType::Fail,
            message,
            reasons: None,
            http_status,
        }
    }

    pub fn fail_with_reasons(
        message: String,
        reasons: Vec<String>,
        http_status: Status,
    ) -> ErrorResponse {
        ErrorResponse {
            status: ErrorType::Fail,
            message,
            reasons: Some(reasons),
            http_status,
        }
    }

    pub fn validation(reasons: Vec<String>) -> ErrorResponse {
        ErrorResponse::fail_with_reasons(
            "Validation Error".to_string(),
            reasons,
            Status::UnprocessableEntity,
        )
    }

    pub fn not_found(what: &str) -> ErrorResponse {
        ErrorResponse::fail(format!("{} Not Found", what), Status::NotFound)
    }

    #[cfg(test)]
    pub fn http_status(&self) -> Status {
        self.http_status
    }

    #[cfg(test)]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<Error> for ErrorResponse {
    fn from(error: Error) -> ErrorResponse {
        match &error {
            Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                tracing::debug!(details = info.message(), "foreign key conflict");
                ErrorResponse::fail("Referenced By Other Records".to_string(), Status::Conflict)
            }
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                tracing::debug!(details = info.message(), "unique conflict");
                ErrorResponse::fail("Duplicate Record".to_string(), Status::Conflict)
            }
            _ => {
                tracing::error!(error = %error, "store failure");
                ErrorResponse::error("Unexpected Error".to_string(), Status::InternalServerError)
            }
        }
    }
}

impl<'r> Responder<'r, 'static> for ErrorResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        json_response(&self, self.http_status)
    }
}

pub type ResponseResult<T = ()> = Result<SuccessResponse<T>, ErrorResponse>;
