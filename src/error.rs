//! Application error type.
//!
//! `AppError` is the single error currency of the crate. Every fallible
//! handler returns `Result<_, AppError>` and actix converts the error into
//! the matching HTTP status and JSON body through the `ResponseError` impl.
//! Each error is scoped to its request; nothing here is retried or fatal.

use std::collections::BTreeMap;
use std::fmt;

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use validator::ValidationErrors;

/// All error conditions the API can answer with.
#[derive(Debug)]
pub enum AppError {
    /// Missing or unresolvable bearer token (HTTP 401).
    Unauthenticated(String),
    /// Login failure. Deliberately carries no detail so unknown email and
    /// wrong password are indistinguishable to the caller (HTTP 401).
    InvalidCredentials,
    /// Malformed request outside the field validation rules (HTTP 400).
    BadRequest(String),
    /// Unknown resource id, or a resource the caller does not own (HTTP 404).
    NotFound(String),
    /// Field validation failure, rendered as per-field message lists
    /// (HTTP 422).
    Validation(ValidationErrors),
    /// Database failure (HTTP 500). The detail is logged, not returned.
    Database(String),
    /// Any other unexpected server-side failure (HTTP 500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation failed: {}", errors),
            AppError::Database(msg) => write!(f, "Database Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Flattens `ValidationErrors` into `{field: [messages...]}` with the fields
/// in a stable order.
fn error_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("The {} field is invalid.", field))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthenticated(msg) => HttpResponse::Unauthorized().json(json!({
                "message": msg
            })),
            AppError::InvalidCredentials => HttpResponse::Unauthorized().json(json!({
                "message": "Invalid credentials"
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "message": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "message": msg
            })),
            AppError::Validation(errors) => HttpResponse::UnprocessableEntity().json(json!({
                "message": "The given data was invalid.",
                "errors": error_messages(errors)
            })),
            AppError::Database(msg) => {
                log::error!("database error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "message": "Internal server error"
                }))
            }
            AppError::Internal(msg) => {
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "message": "Internal server error"
                }))
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::Database(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        AppError::Validation(errors)
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}
