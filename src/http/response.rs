//! Response bodies and error mapping.
//!
//! # Responsibilities
//! - JSON bodies returned by the handlers
//! - Map feed, lookup and reload failures to HTTP status codes
//!
//! # Design Decisions
//! - Every error body is `{"error": "<message>"}`
//! - 5xx responses are logged at error level, 4xx at warn

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::changes::ChangeRecord;
use crate::channel::LookupError;
use crate::feeds::FeedError;
use crate::reload::ReloadError;

/// Success body of mutating endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Body of `GET /changelog`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangelogResponse {
    pub pending: Vec<ChangeRecord>,
    pub messages: Vec<String>,
}

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("failed to fetch channel info: {0}")]
    Lookup(#[from] LookupError),

    #[error("failed to reload service: {0}")]
    Reload(#[from] ReloadError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Feed(FeedError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Feed(FeedError::InvalidKey(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Feed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Lookup(LookupError::InvalidUrl(_)) => StatusCode::BAD_REQUEST,
            ApiError::Lookup(_) => StatusCode::BAD_GATEWAY,
            ApiError::Reload(ReloadError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Reload(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %message, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %message, "Request rejected");
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
