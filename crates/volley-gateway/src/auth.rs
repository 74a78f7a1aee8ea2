// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! API-key authentication middleware.
//!
//! Clients send `Authorization: Bearer <raw key>`. The raw key is SHA-256
//! hashed and matched against the active `api_keys` rows; only the hash is
//! ever stored or compared. Requests with no match are rejected
//! (fail-closed). On success the key's account id is attached to the
//! request for handlers, and `last_used_at` is stamped.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use sha2::{Digest, Sha256};

use volley_core::types::now_iso;
use volley_storage::SqliteStore;

use crate::error::ErrorResponse;

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    pub store: Arc<SqliteStore>,
}

/// The authenticated caller's account, attached as a request extension.
#[derive(Debug, Clone)]
pub struct AccountId(pub String);

/// SHA-256 hex digest of a raw API key.
pub fn hash_key(raw_key: &str) -> String {
    hex::encode(Sha256::digest(raw_key.as_bytes()))
}

/// Middleware validating the bearer API key against the key store.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let raw_key = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(raw_key) = raw_key else {
        return unauthorized("missing API key");
    };

    let key = match auth.store.find_api_key_by_hash(&hash_key(raw_key)).await {
        Ok(Some(key)) => key,
        Ok(None) => return unauthorized("invalid API key"),
        Err(e) => {
            tracing::error!(error = %e, "API key lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "authentication backend unavailable".into(),
                }),
            )
                .into_response();
        }
    };

    if let Err(e) = auth.store.touch_api_key(key.id, &now_iso()).await {
        tracing::warn!(error = %e, "failed to stamp api key last_used_at");
    }

    request.extensions_mut().insert(AccountId(key.account_id));
    next.run(request).await
}

fn unauthorized(reason: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: reason.to_string(),
        }),
    )
        .into_response()
}
