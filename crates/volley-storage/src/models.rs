// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical read models are defined in `volley-core::types` for use
//! across crate boundaries; this module re-exports them and adds the write
//! models used at insert time.

pub use volley_core::types::{ApiKey, Campaign, CampaignRecipient, SmsLog};

use volley_core::types::{CarrierKind, RecipientStatus};

/// A recipient row to be inserted when a campaign is authored.
#[derive(Debug, Clone)]
pub struct NewRecipient {
    pub phone: String,
    /// Optional reference to the source contact record.
    pub contact_id: Option<String>,
}

impl NewRecipient {
    pub fn from_phone(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            contact_id: None,
        }
    }
}

/// A send-ledger row to be appended by the dispatch gateway.
#[derive(Debug, Clone)]
pub struct NewSmsLog {
    pub account_id: String,
    pub campaign_id: Option<String>,
    pub phone: String,
    pub message: String,
    pub carrier: CarrierKind,
    pub message_id: Option<String>,
    pub status: RecipientStatus,
    pub error_message: Option<String>,
    pub sent_at: String,
}

/// Result of applying a delivery receipt to a campaign recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptApplication {
    /// Campaign the matched recipient belongs to.
    pub campaign_id: String,
    /// Whether the guarded update actually advanced the row. False means
    /// the recipient had already left `sent` (e.g. a duplicate receipt).
    pub transitioned: bool,
}
