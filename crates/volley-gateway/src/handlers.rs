// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the dispatch API.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use serde::{Deserialize, Serialize};

use volley_core::VolleyError;
use volley_core::carrier::CarrierAdapter;
use volley_core::types::{Campaign, CarrierKind, DeliveryReceipt, SmsLog};
use volley_dispatch::{AdvanceOutcome, SendRequest};

use crate::auth::AccountId;
use crate::error::ApiError;
use crate::server::GatewayState;

/// Request body for `POST /v1/send`.
#[derive(Debug, Deserialize)]
pub struct SendBody {
    /// One phone number, or a comma-joined list.
    pub to: String,
    pub message: String,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<String>,
}

/// Response body for `POST /v1/send`.
///
/// `message_ids` is aligned to the request's destination order; entries are
/// `null` where the carrier assigned no id.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
    pub message_ids: Vec<Option<String>>,
    pub sent_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response body for `GET /v1/balance`.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: String,
    pub gift: String,
}

/// Query parameters for `GET /v1/logs`.
#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Delivery receipts arrive singly or as an array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReceiptPayload {
    Batch(Vec<DeliveryReceipt>),
    Single(DeliveryReceipt),
}

/// Acknowledgement for `POST /webhooks/delivery`.
#[derive(Debug, Serialize)]
pub struct ReceiptAck {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed: Option<usize>,
}

/// POST /v1/send
///
/// Dispatches one carrier call for the destination set and returns the
/// aggregate outcome. Carrier-level failure is reported in the body, not
/// as an HTTP error; only configuration and request errors reject.
pub async fn post_send(
    State(state): State<GatewayState>,
    Extension(account): Extension<AccountId>,
    Json(body): Json<SendBody>,
) -> Result<Json<SendResponse>, ApiError> {
    let carrier = match body.provider.as_deref() {
        Some(name) => Some(CarrierKind::from_str(name).map_err(|_| {
            VolleyError::InvalidRequest(format!("Unknown provider: {name}"))
        })?),
        None => None,
    };

    let summary = state
        .dispatch
        .dispatch(&SendRequest {
            account_id: account.0,
            to: body.to,
            message: body.message,
            carrier,
            sender_id: body.sender_id,
            campaign_id: body.campaign_id,
        })
        .await?;

    Ok(Json(SendResponse {
        success: summary.success,
        message_ids: summary.message_ids,
        sent_count: summary.sent_count,
        error: summary.error,
    }))
}

/// POST /v1/campaigns/{id}/advance
///
/// Progresses one campaign by one bounded dispatcher run.
pub async fn post_advance(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<AdvanceOutcome>, ApiError> {
    let outcome = state.batcher.advance(&id).await?;
    Ok(Json(outcome))
}

/// POST /v1/campaigns/{id}/start
pub async fn post_start(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<Campaign>, ApiError> {
    Ok(Json(state.control.start(&id).await?))
}

/// POST /v1/campaigns/{id}/pause
pub async fn post_pause(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<Campaign>, ApiError> {
    Ok(Json(state.control.pause(&id).await?))
}

/// POST /v1/campaigns/{id}/resume
pub async fn post_resume(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<Campaign>, ApiError> {
    Ok(Json(state.control.resume(&id).await?))
}

/// POST /webhooks/delivery
///
/// Inbound delivery receipts from upstream carriers. Unknown message ids
/// are acknowledged and ignored.
pub async fn post_delivery_receipt(
    State(state): State<GatewayState>,
    Json(payload): Json<ReceiptPayload>,
) -> Result<Json<ReceiptAck>, ApiError> {
    match payload {
        ReceiptPayload::Single(receipt) => {
            state.reconciler.apply(&receipt).await?;
            Ok(Json(ReceiptAck {
                success: true,
                processed: None,
            }))
        }
        ReceiptPayload::Batch(receipts) => {
            state.reconciler.apply_all(&receipts).await?;
            Ok(Json(ReceiptAck {
                success: true,
                processed: Some(receipts.len()),
            }))
        }
    }
}

/// GET /v1/status/{message_id}
///
/// Public status lookup over the send ledger.
pub async fn get_status(
    State(state): State<GatewayState>,
    Path(message_id): Path<String>,
) -> Result<Json<SmsLog>, ApiError> {
    let log = state
        .store
        .get_log_by_message_id(&message_id)
        .await?
        .ok_or(VolleyError::NotFound {
            entity: "message",
            id: message_id,
        })?;
    Ok(Json(log))
}

/// GET /v1/balance
///
/// Onbuka account balance, using the same signing discipline as sends.
pub async fn get_balance(
    State(state): State<GatewayState>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let adapter = state.registry.adapter_for(CarrierKind::Onbuka)?;
    let balance = adapter.balance().await?;
    Ok(Json(BalanceResponse {
        balance: balance.balance,
        gift: balance.gift,
    }))
}

/// GET /v1/logs?limit=N
///
/// Recent send-ledger rows for the authenticated account.
pub async fn get_logs(
    State(state): State<GatewayState>,
    Extension(account): Extension<AccountId>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Vec<SmsLog>>, ApiError> {
    let limit = query.limit.unwrap_or(100).clamp(1, 1000);
    let logs = state.store.list_recent_logs(&account.0, limit).await?;
    Ok(Json(logs))
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
