use crate::responses::ErrorResponse;
use rocket::serde::json::Json;
use validator::{Validate, ValidationErrors};

fn describe(errors: &ValidationErrors) -> Vec<String> {
    let mut reasons = errors
        .field_errors()
        .iter()
        .flat_map(|(field_name, field_errs)| {
            field_errs.iter().map(move |fe| {
                format!(
                    "field \"{}\" does not satisfy the \"{}\" rule: {:?}",
                    field_name, fe.code, fe.params
                )
            })
        })
        .collect::<Vec<String>>();
    reasons.sort();

    reasons
}

pub fn validate<T: Validate>(data: Json<T>) -> Result<T, ErrorResponse> {
    let data = data.into_inner();
    match data.validate() {
        Ok(_) => Ok(data),
        Err(err) => Err(ErrorResponse::validation(describe(&err))),
    }
}
