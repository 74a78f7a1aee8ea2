// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Volley workspace.
//!
//! The status enums carry the forward-only transition rules for campaigns
//! and recipients; everything that mutates persisted state goes through
//! these helpers rather than comparing raw strings.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Campaign lifecycle status.
///
/// `draft -> running -> {paused <-> running} -> completed`, with `failed`
/// reachable from any state as an administrative action. Only `running`
/// campaigns are dispatchable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Running,
    Paused,
    Completed,
    Failed,
}

impl CampaignStatus {
    /// Whether the batch dispatcher may process a campaign in this status.
    pub fn is_dispatchable(self) -> bool {
        matches!(self, CampaignStatus::Running)
    }

    /// Whether an explicit or automatic transition to `next` is legal.
    pub fn can_transition_to(self, next: CampaignStatus) -> bool {
        use CampaignStatus::*;
        match (self, next) {
            (Draft, Running) => true,
            (Running, Paused) => true,
            (Paused, Running) => true,
            (Running, Completed) => true,
            (_, Failed) => true,
            _ => false,
        }
    }
}

/// Per-recipient (and per-ledger-row) delivery status.
///
/// A recipient only ever moves forward: `pending -> sent -> {delivered |
/// failed}`, or straight to `failed`/`rejected` when the page never reaches
/// an upstream.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecipientStatus {
    Pending,
    Sent,
    Delivered,
    Failed,
    Rejected,
}

impl RecipientStatus {
    /// Whether moving from `self` to `next` respects the forward-only rule.
    pub fn can_advance_to(self, next: RecipientStatus) -> bool {
        use RecipientStatus::*;
        match (self, next) {
            (Pending, Sent) | (Pending, Failed) | (Pending, Rejected) => true,
            (Sent, Delivered) | (Sent, Failed) => true,
            _ => false,
        }
    }

    /// Terminal statuses are written exactly once.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RecipientStatus::Delivered | RecipientStatus::Failed | RecipientStatus::Rejected
        )
    }
}

/// Selects which upstream carrier handles a send.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum CarrierKind {
    #[strum(serialize = "onbuka")]
    #[serde(rename = "onbuka")]
    Onbuka,
    #[strum(serialize = "eims_1")]
    #[serde(rename = "eims_1")]
    Eims1,
    #[strum(serialize = "eims_2")]
    #[serde(rename = "eims_2")]
    Eims2,
    #[strum(serialize = "eims_3")]
    #[serde(rename = "eims_3")]
    Eims3,
    #[strum(serialize = "smpp")]
    #[serde(rename = "smpp")]
    Smpp,
}

/// A bulk-send job targeting a fixed recipient list with one message body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub account_id: String,
    pub message: String,
    pub sender_id: Option<String>,
    pub carrier: CarrierKind,
    pub status: CampaignStatus,
    /// Fixed at creation from the selected recipient list size.
    pub total_recipients: i64,
    pub sent_count: i64,
    pub delivered_count: i64,
    pub failed_count: i64,
    pub created_at: String,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
}

/// One (campaign, destination phone) pair tracked through the
/// send/delivery lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignRecipient {
    pub id: i64,
    pub campaign_id: String,
    pub phone: String,
    pub contact_id: Option<String>,
    pub status: RecipientStatus,
    /// Populated once an upstream accepts the send. Unique per carrier.
    pub message_id: Option<String>,
    pub sent_at: Option<String>,
    pub delivered_at: Option<String>,
    pub error_message: Option<String>,
}

/// One row per individual send attempt, campaign or not. The durable send
/// ledger behind cross-campaign reporting and the public status lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsLog {
    pub id: i64,
    pub account_id: String,
    pub campaign_id: Option<String>,
    pub phone: String,
    pub message: String,
    pub carrier: CarrierKind,
    pub message_id: Option<String>,
    pub status: RecipientStatus,
    pub error_message: Option<String>,
    pub sent_at: String,
    pub delivered_at: Option<String>,
}

/// An inbound-auth API key record. The engine treats a verified key as an
/// opaque "caller is authorized as account X" fact.
#[derive(Debug, Clone)]
pub struct ApiKey {
    pub id: i64,
    pub account_id: String,
    /// SHA-256 hex digest of the raw key. The raw key is never stored.
    pub key_hash: String,
    pub label: String,
    pub is_active: bool,
    pub created_at: String,
    pub last_used_at: Option<String>,
}

/// An asynchronous delivery receipt pushed by an upstream carrier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    #[serde(rename = "msgId")]
    pub msg_id: String,
    /// Provider status code. `"0"` means delivered; anything else is a
    /// failure, with the raw code preserved for diagnostics.
    pub status: String,
}

impl DeliveryReceipt {
    /// Maps the provider status code onto the local status vocabulary.
    pub fn resolved_status(&self) -> RecipientStatus {
        if self.status == "0" {
            RecipientStatus::Delivered
        } else {
            RecipientStatus::Failed
        }
    }
}

/// Current wall-clock time as an ISO 8601 string, the storage timestamp
/// format used across all tables.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
