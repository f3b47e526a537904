//! Error types for the item service
//!
//! One error enum for every request path, mapped onto HTTP responses.
//! Server-side failures carry their detail for logging only; the client
//! always sees a generic message.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;
use crate::validation::ValidationErrors;

pub const NOT_FOUND_MESSAGE: &str = "Item not found";
pub const INTERNAL_MESSAGE: &str = "Internal server error";

// == Service Error Enum ==
#[derive(Error, Debug)]
pub enum ServiceError {
    /// One or more payload fields are out of bounds
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Body is not JSON or does not match the payload schema
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// Query string violates the list query policy
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// No item with this id
    #[error("Item not found: {0}")]
    NotFound(String),

    /// Document store or transaction failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedBody(_) | Self::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidQuery(rejection.body_text())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation(errors) => json!({
                "error": "Validation failed",
                "errors": errors,
            }),
            Self::MalformedBody(msg) | Self::InvalidQuery(msg) => json!({ "error": msg }),
            Self::NotFound(_) => json!({ "error": NOT_FOUND_MESSAGE }),
            Self::Store(_) | Self::Internal(_) => json!({ "error": INTERNAL_MESSAGE }),
        };

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
pub type Result<T> = std::result::Result<T, ServiceError>;
