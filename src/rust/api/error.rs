use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::classifier::ClassifierError;

/// Errors returned by the HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request carried no usable text
    #[error("No text provided")]
    NoText,

    /// The body was not valid JSON for the endpoint
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    /// The body was refused before it could be parsed (size limit, content type)
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    /// Anything the client cannot fix
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoText | ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body. Internal details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::NoText => "No text provided",
            ApiError::InvalidJson(_) => "Invalid JSON body",
            ApiError::Rejected { status, .. } => {
                status.canonical_reason().unwrap_or("Invalid request")
            }
            ApiError::Internal(_) => "Internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        } else {
            log::debug!("Rejected request: {}", self);
        }

        let body = Json(json!({ "error": self.public_message() }));
        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
                ApiError::InvalidJson(rejection.body_text())
            }
            // Oversized bodies and a missing content type keep axum's status
            other => ApiError::Rejected {
                status: other.status(),
                message: other.body_text(),
            },
        }
    }
}

impl From<ClassifierError> for ApiError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::ValidationError(_) => ApiError::NoText,
            other => ApiError::Internal(other.to_string()),
        }
    }
}
