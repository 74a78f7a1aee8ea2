// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The delivery reconciler: folds asynchronous carrier receipts back onto
//! the send ledger, the campaign recipients, and the campaign counters.
//!
//! Receipts have no ordering relationship with the dispatcher; ids this
//! deployment never logged are accepted and ignored. Both row updates are
//! guarded on the row still being `sent`, which makes the campaign
//! `delivered_count` increment idempotent per message id rather than per
//! receipt.

use std::sync::Arc;

use tracing::debug;

use volley_core::error::VolleyError;
use volley_core::types::{DeliveryReceipt, RecipientStatus, now_iso};
use volley_storage::SqliteStore;

/// Consumes delivery receipts pushed by upstream carriers.
pub struct DeliveryReconciler {
    store: Arc<SqliteStore>,
}

impl DeliveryReconciler {
    pub fn new(store: Arc<SqliteStore>) -> Self {
        Self { store }
    }

    /// Apply one receipt. Returns whether any local row matched the
    /// message id; an unknown id is a benign no-op, never an error.
    pub async fn apply(&self, receipt: &DeliveryReceipt) -> Result<bool, VolleyError> {
        let status = receipt.resolved_status();
        let error = match status {
            RecipientStatus::Failed => Some(format!("Delivery failed: {}", receipt.status)),
            _ => None,
        };
        let now = now_iso();

        let log_matched = self
            .store
            .apply_log_receipt(&receipt.msg_id, status, &now, error.clone())
            .await?;

        let application = self
            .store
            .apply_recipient_receipt(&receipt.msg_id, status, &now, error)
            .await?;

        let mut matched = log_matched;
        if let Some(application) = application {
            matched = true;
            if application.transitioned && status == RecipientStatus::Delivered {
                self.store
                    .increment_campaign_delivered(&application.campaign_id)
                    .await?;
            }
        }

        if matched {
            debug!(msg_id = %receipt.msg_id, status = %status, "receipt applied");
        } else {
            debug!(msg_id = %receipt.msg_id, "receipt for unknown message id ignored");
        }
        Ok(matched)
    }

    /// Apply a batched receipt array. Returns how many receipts matched a
    /// local row.
    pub async fn apply_all(&self, receipts: &[DeliveryReceipt]) -> Result<usize, VolleyError> {
        let mut applied = 0;
        for receipt in receipts {
            if self.apply(receipt).await? {
                applied += 1;
            }
        }
        Ok(applied)
    }
}
