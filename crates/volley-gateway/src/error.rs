// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Uniform JSON error envelope for every gateway endpoint.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use volley_core::VolleyError;

/// Error response body: `{ "error": "..." }`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Wrapper mapping engine errors onto HTTP status codes.
#[derive(Debug)]
pub struct ApiError(pub VolleyError);

impl From<VolleyError> for ApiError {
    fn from(err: VolleyError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            VolleyError::Config(_)
            | VolleyError::InvalidRequest(_)
            | VolleyError::InvalidTransition { .. }
            | VolleyError::NotDispatchable { .. } => StatusCode::BAD_REQUEST,
            VolleyError::NotFound { .. } => StatusCode::NOT_FOUND,
            VolleyError::Storage { .. }
            | VolleyError::Carrier { .. }
            | VolleyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
