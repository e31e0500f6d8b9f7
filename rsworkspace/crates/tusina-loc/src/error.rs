//! Failure outcomes of a lookup and their wire form.
//!
//! Every variant renders as `{"error":"<code>"}`. Internal detail stays in
//! the logs.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tusina_store::TokenError;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("no lookup token in query")]
    MissingToken,

    #[error("malformed lookup token: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("malformed request: {0}")]
    BadRequest(String),

    #[error("no such route or record")]
    NotFound,

    #[error("record store failure: {0}")]
    Storage(String),

    #[error("stored value is not valid JSON: {0}")]
    BadPayload(#[source] serde_json::Error),

    #[error("stored record has invalid fields: {0}")]
    InvalidFields(&'static str),
}

impl LookupError {
    /// Machine-readable code sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::InvalidToken(_) => "invalid_token",
            Self::BadRequest(_) => "bad_request",
            Self::NotFound => "not_found",
            Self::Storage(_) => "storage_error",
            Self::BadPayload(_) => "bad_payload",
            Self::InvalidFields(_) => "invalid_fields",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingToken | Self::InvalidToken(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::BAD_GATEWAY,
            Self::BadPayload(_) | Self::InvalidFields(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(outcome = self.code(), error = %self, "Location lookup failed");
        } else {
            tracing::info!(outcome = self.code(), error = %self, "Location lookup rejected");
        }

        (status, Json(ErrorBody { error: self.code() })).into_response()
    }
}
