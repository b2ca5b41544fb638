use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

/// Errors surfaced by the verification service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum VerifyError {
    /// Bad request body: missing or malformed address, unusable constructor arguments
    Validation(String),

    /// The verification tool ran and failed, could not be started, or timed out
    Verification { error: String, details: Option<String> },
}

impl VerifyError {
    pub fn validation(message: impl Into<String>) -> Self {
        VerifyError::Validation(message.into())
    }

    pub fn verification(error: impl Into<String>, details: Option<String>) -> Self {
        VerifyError::Verification { error: error.into(), details }
    }
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::Validation(msg) => write!(f, "{msg}"),
            VerifyError::Verification { error, .. } => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for VerifyError {}

impl ResponseError for VerifyError {
    fn status_code(&self) -> StatusCode {
        match self {
            VerifyError::Validation(_) => StatusCode::BAD_REQUEST,
            VerifyError::Verification { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            VerifyError::Validation(msg) => serde_json::json!({ "error": msg }),
            VerifyError::Verification { error, details } => serde_json::json!({
                "success": false,
                "error": error,
                "details": details,
            }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
