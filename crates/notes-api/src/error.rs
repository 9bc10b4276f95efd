//! HTTP error mapping.
//!
//! Every failure leaves the API as one of three envelopes:
//! - `422 {"detail":"Validation failed","errors":[..],"code":"VALIDATION_ERROR"}`
//! - `4xx {"detail":<message>,"code":"HTTP_ERROR"}`
//! - `500 {"detail":"Internal server error","code":"INTERNAL_SERVER_ERROR"}`

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use notes_core::ValidationIssue;

pub const HTTP_ERROR: &str = "HTTP_ERROR";
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

/// Body of a 4xx or 500 response.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Human-readable error message
    pub detail: String,
    /// Stable error code for programmatic handling
    pub code: String,
}

/// Body of a 422 response.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ValidationErrorBody {
    pub detail: String,
    pub errors: Vec<ValidationIssue>,
    pub code: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<ValidationIssue>),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("{0}")]
    PayloadTooLarge(String),
    /// Details are logged, never returned to the caller.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// The 404 returned for notes that are missing or not visible to the caller.
    pub fn note_not_found() -> Self {
        ApiError::NotFound("Note not found".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn single(field: &str, message: String) -> Self {
        ApiError::Validation(vec![ValidationIssue::new(field, message)])
    }
}

impl From<notes_core::Error> for ApiError {
    fn from(err: notes_core::Error) -> Self {
        match err {
            notes_core::Error::Validation(issues) => ApiError::Validation(issues),
            notes_core::Error::Forbidden(msg) => ApiError::Forbidden(msg),
            notes_core::Error::NoteNotFound(_) => ApiError::note_not_found(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge("Request body too large".to_string());
        }
        ApiError::single("body", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::single("path", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::single("query", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(errors) => {
                warn!(errors = ?errors, "Validation error");
                let body = ValidationErrorBody {
                    detail: "Validation failed".to_string(),
                    errors,
                    code: VALIDATION_ERROR.to_string(),
                };
                (status, Json(body)).into_response()
            }
            ApiError::Internal(detail) => {
                error!(error = %detail, "Unhandled error");
                let body = ErrorBody {
                    detail: "Internal server error".to_string(),
                    code: INTERNAL_SERVER_ERROR.to_string(),
                };
                (status, Json(body)).into_response()
            }
            other => {
                let detail = other.to_string();
                warn!(status = status.as_u16(), detail = %detail, "HTTP error");
                let body = ErrorBody {
                    detail,
                    code: HTTP_ERROR.to_string(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}
