use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub const NO_FILE_PROVIDED: &str = "No file provided";
pub const ANALYSIS_FAILED: &str = "Analysis failed";

/// JSON body returned for every relay failure.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Analysis failed")]
    pub error: String,
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("no `file` field in the upload")]
    MissingFile,

    #[error("malformed multipart upload: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("unreadable multipart request: {0}")]
    MultipartRejected(#[from] axum::extract::multipart::MultipartRejection),

    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend responded with status {0}")]
    BackendStatus(u16),

    #[error("backend returned malformed JSON: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingFile => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to callers. Internal detail stays in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            RelayError::MissingFile => NO_FILE_PROVIDED,
            _ => ANALYSIS_FAILED,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.public_message().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
