//! Represents all possible errors in the application

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::database::DbError;

pub const VALIDATION_ERROR: &str = "Validation failed";

pub const LOGIN_ERROR: &str = "Invalid username or password";

pub const LOGIN_SUCCESS: &str = "Login successful";

pub const OLD_PASSWORD_ERROR: &str = "Old password is incorrect.";

pub const NO_CHANGES_ERROR: &str = "No fields to update";

pub const EMPTY_LIST_ERROR: &str = "No records found";

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input, detected before touching the database
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Unknown username and wrong password are deliberately the same error
    #[error("{}", LOGIN_ERROR)]
    InvalidCredentials,

    #[error("{}", OLD_PASSWORD_ERROR)]
    WrongOldPassword,

    #[error(transparent)]
    Database(#[from] DbError),
}

impl AppError {
    /// A field was absent from the request
    pub fn missing(field: &str) -> Self {
        AppError::BadRequest(format!("Missing required field: {field}"))
    }

    /// A field was present but did not pass validation
    pub fn invalid(field: &str, reason: impl std::fmt::Display) -> Self {
        AppError::BadRequest(format!("{VALIDATION_ERROR} for {field}: {reason}"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials | AppError::WrongOldPassword => StatusCode::UNAUTHORIZED,
            AppError::Database(DbError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Database(DbError::Duplicate(_)) => StatusCode::CONFLICT,
            AppError::Database(DbError::NoMedicalHistory(_)) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::missing("patient_id").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::from(DbError::NotFound("Patient P404".to_string())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(DbError::Duplicate("Patient P001".to_string())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(DbError::NoMedicalHistory("P001".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(DbError::Sqlx(sqlx::Error::PoolTimedOut)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            AppError::missing("patient_id").to_string(),
            "Missing required field: patient_id"
        );
        assert_eq!(AppError::InvalidCredentials.to_string(), LOGIN_ERROR);
        assert_eq!(AppError::WrongOldPassword.to_string(), OLD_PASSWORD_ERROR);
    }
}
