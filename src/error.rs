use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

use crate::response::ApiResponse;

/// Field name to the list of messages reported for it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Unauthenticated: {0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("The given data was invalid")]
    Validation(FieldErrors),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Validation failure on a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        AppError::Validation(errors)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::OrmError(err) if constraint_violation(err).is_some() => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            let messages = errs
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("The {field} field is invalid ({}).", err.code),
                })
                .collect();
            fields.insert(field.to_string(), messages);
        }
        AppError::Validation(fields)
    }
}

/// Unique and foreign-key violations are reported as validation failures;
/// they back the read-then-write checks done in the services.
fn constraint_violation(err: &DbErr) -> Option<&'static str> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Some("The record already exists."),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            Some("The record is linked to other records.")
        }
        _ => None,
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    errors: FieldErrors,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, errors) = match &self {
            AppError::Validation(fields) => {
                let first = fields
                    .values()
                    .flatten()
                    .next()
                    .cloned()
                    .unwrap_or_else(|| self.to_string());
                (first, fields.clone())
            }
            AppError::OrmError(err) => match constraint_violation(err) {
                Some(msg) => {
                    let mut fields = FieldErrors::new();
                    fields.insert("record".into(), vec![msg.to_string()]);
                    (msg.to_string(), fields)
                }
                None => {
                    tracing::error!(error = %err, "orm error");
                    (self.to_string(), FieldErrors::new())
                }
            },
            AppError::DbError(err) => {
                tracing::error!(error = %err, "database error");
                (self.to_string(), FieldErrors::new())
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (self.to_string(), FieldErrors::new())
            }
            _ => (self.to_string(), FieldErrors::new()),
        };

        let body = ApiResponse {
            success: false,
            message,
            data: Some(ErrorData {
                error: self.to_string(),
                errors,
            }),
            meta: None,
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "The name field is required."))]
        name: String,
    }

    #[test]
    fn maps_causes_to_status_codes() {
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::field("name", "taken").status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validator_errors_keep_field_messages() {
        let err: AppError = Payload { name: String::new() }
            .validate()
            .unwrap_err()
            .into();
        match err {
            AppError::Validation(fields) => {
                assert_eq!(fields["name"], vec!["The name field is required.".to_string()]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn validation_body_nests_field_errors_under_data() {
        let response = AppError::field("name", "The name has already been taken.").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "The name has already been taken.");
        assert_eq!(body["data"]["error"], "The given data was invalid");
        assert_eq!(body["data"]["errors"]["name"][0], "The name has already been taken.");
        assert!(body.get("errors").is_none());
    }
}
