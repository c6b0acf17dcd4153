//! JSON error responses.

use super::metrics::record_error;
use crate::document_store::CatalogError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    Generic,
    Validation,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

/// Error returned by every route handler, rendered as `{"error": {code, type, message}}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error_type: ErrorType,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: ErrorType, message: impl Into<String>) -> Self {
        ApiError {
            status,
            error_type,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorType::Validation, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, ErrorType::Generic, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ErrorType::Internal, message)
    }

    /// Maps a persistence failure. Store failures only expose their cause in debug mode.
    pub fn catalog(err: CatalogError, debug: bool) -> Self {
        match err {
            CatalogError::InvalidId(_) | CatalogError::BadFilter(_) => {
                Self::validation(err.to_string())
            }
            CatalogError::NotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, ErrorType::Generic, err.to_string())
            }
            CatalogError::Store(_) | CatalogError::Document(_) => {
                error!("Store failure: {}", err);
                if debug {
                    Self::internal(err.to_string())
                } else {
                    Self::internal("Internal server error")
                }
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.status.as_u16(),
            error_type: self.error_type,
            message: self.message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let type_label = match self.error_type {
            ErrorType::Generic => "generic",
            ErrorType::Validation => "validation",
            ErrorType::Internal => "internal",
        };
        record_error(type_label, self.status.as_str());

        (self.status, Json(ErrorResponse { error: self.body() })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_catalog_errors_to_statuses() {
        let cases = [
            (CatalogError::InvalidId("x".into()), StatusCode::BAD_REQUEST),
            (CatalogError::BadFilter("x".into()), StatusCode::BAD_REQUEST),
            (CatalogError::NotFound("music_tracks"), StatusCode::NOT_FOUND),
            (
                CatalogError::Store(rusqlite::Error::InvalidQuery),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::catalog(err, false).status(), status);
        }
    }

    #[test]
    fn hides_store_failure_unless_debug() {
        let hidden = ApiError::catalog(CatalogError::Store(rusqlite::Error::InvalidQuery), false);
        assert_eq!(hidden.body().message, "Internal server error");
        assert_eq!(hidden.body().error_type, ErrorType::Internal);

        let shown = ApiError::catalog(CatalogError::Store(rusqlite::Error::InvalidQuery), true);
        assert!(shown.body().message.starts_with("store error"));
    }

    #[test]
    fn serializes_error_envelope() {
        let body = ApiError::validation("limit must be at most 300").body();
        assert_eq!(
            serde_json::to_value(ErrorResponse { error: body }).unwrap(),
            serde_json::json!({
                "error": {
                    "code": 400,
                    "type": "VALIDATION",
                    "message": "limit must be at most 300"
                }
            })
        );
    }
}
