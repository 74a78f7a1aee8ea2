// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Onbuka v3 API.

use serde::{Deserialize, Serialize};

/// Body of `POST /sendSms`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsRequest {
    pub app_id: String,
    /// Comma-joined destination list, up to the carrier's per-call ceiling.
    pub numbers: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
}

/// Envelope shared by the send and balance endpoints. `status` is `"0"` on
/// success; anything else carries an upstream error code in `status` and a
/// human-readable `reason`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnbukaResponse {
    pub status: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub balance: Option<String>,
    #[serde(default)]
    pub gift: Option<String>,
    #[serde(default)]
    pub array: Option<Vec<OnbukaMessage>>,
}

/// One accepted message in the send response, positionally aligned with
/// the submitted numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnbukaMessage {
    pub msg_id: String,
    #[serde(default)]
    pub number: String,
}
