//! REST API module.
//!
//! Handlers translate requests into store calls and store results into
//! response envelopes. Errors other than the explicit not-found cases fall
//! through to the `IntoResponse` impl on [`AppError`](crate::errors::AppError).

mod bugs;

pub use bugs::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Success response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            count: None,
            data,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Envelope for a collection, carrying its length in `count`.
    pub fn collection(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(data.len()),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Payload of a successful delete, serialized as `{}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Empty {}

/// Response type for handlers that only rely on the generic error stage.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::AppError>;
