use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use forms::{BoundForm, Echo, ErrorKind, Form, ValidationErrors};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

pub const CONFLICT_MESSAGE: &str =
    "Another submission used the same value at the same time. Please resubmit.";
pub const CREDENTIALS_MESSAGE: &str = "Invalid username/password";
pub const TOO_LARGE_MESSAGE: &str = "The request body is larger than the server accepts.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Invalid {form} submission")]
    Invalid {
        form: &'static str,
        values: Vec<(&'static str, Echo)>,
        errors: ValidationErrors,
    },

    #[error("Persistence conflict on {field}")]
    PersistenceConflict { field: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl AppError {
    pub fn internal(e: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        AppError::InternalError(e.into())
    }

    /// Re-render of a rejected form: what was submitted, minus secrets and files, plus the errors.
    pub fn invalid<F: Form>(bound: &BoundForm<F>, errors: ValidationErrors) -> Self {
        AppError::Invalid {
            form: F::NAME,
            values: bound.echo(),
            errors,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict { field } => AppError::PersistenceConflict { field },
            e => AppError::internal(e),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::internal(e)
    }
}

fn codes(errors: &ValidationErrors) -> BTreeMap<&'static str, Vec<ErrorKind>> {
    let mut codes: BTreeMap<&'static str, Vec<ErrorKind>> = BTreeMap::new();
    for e in errors.iter() {
        codes.entry(e.field).or_default().push(e.kind);
    }
    codes
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PersistenceConflict { .. } => StatusCode::CONFLICT,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match self {
            AppError::Invalid {
                form,
                values,
                errors,
            } => {
                let codes = codes(&errors);
                json!({
                    "form": form,
                    "values": values.into_iter().collect::<BTreeMap<_, _>>(),
                    "errors": errors,
                    "codes": codes,
                })
            }
            AppError::PersistenceConflict { field } => json!({
                "error": "PersistenceConflict",
                "field": field,
                "message": CONFLICT_MESSAGE,
            }),
            AppError::PayloadTooLarge => json!({
                "error": "PayloadTooLarge",
                "message": TOO_LARGE_MESSAGE,
            }),
            AppError::InvalidCredentials => json!({
                "error": "InvalidCredentials",
                "message": CREDENTIALS_MESSAGE,
            }),
            AppError::InternalError(e) => {
                error!("Internal error: {e}");
                json!({ "error": "InternalError" })
            }
            e => json!({ "error": e.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use forms::ValidationError;

    use super::*;

    #[test]
    fn test_store_conflict_maps_to_persistence_conflict() {
        let e = AppError::from(StoreError::Conflict {
            field: "email".to_string(),
        });
        assert!(matches!(e, AppError::PersistenceConflict { field } if field == "email"));
    }

    #[test]
    fn test_statuses() {
        let status = |e: AppError| e.into_response().status();

        assert_eq!(status(AppError::MalformedPayload), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(AppError::PayloadTooLarge),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(status(AppError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AppError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status(AppError::PersistenceConflict {
                field: "email".to_string()
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(AppError::internal("boom")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(AppError::Invalid {
                form: "note",
                values: Vec::new(),
                errors: ValidationError::new("title", ErrorKind::MissingField, "x").into(),
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_codes_group_kinds_by_field() {
        let mut errors = ValidationErrors::default();
        errors.push(ValidationError::new("email", ErrorKind::PatternMismatch, "a"));
        errors.push(ValidationError::new("email", ErrorKind::DuplicateValue, "b"));

        let codes = codes(&errors);
        assert_eq!(
            codes["email"],
            vec![ErrorKind::PatternMismatch, ErrorKind::DuplicateValue]
        );
    }
}
