// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dispatch gateway: the single entry point for one-off sends and
//! campaign pages.
//!
//! One invocation makes exactly one carrier call and writes exactly one
//! ledger row per destination, unconditionally, even on total failure. The
//! destination list and the returned message-id list are positionally
//! aligned and equal length.

use std::sync::Arc;

use tracing::{info, warn};

use volley_core::carrier::{CarrierAdapter, SendBatch};
use volley_core::error::VolleyError;
use volley_core::types::{CarrierKind, RecipientStatus, now_iso};
use volley_storage::SqliteStore;
use volley_storage::models::NewSmsLog;

use crate::registry::CarrierRegistry;

/// One dispatch call: a destination set, a body, and routing hints.
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub account_id: String,
    /// One phone number, or a comma-joined list up to the carrier ceiling.
    pub to: String,
    pub message: String,
    /// Explicit carrier; falls back to the configured default.
    pub carrier: Option<CarrierKind>,
    pub sender_id: Option<String>,
    pub campaign_id: Option<String>,
}

/// Aggregate outcome of one dispatch call.
#[derive(Debug, Clone)]
pub struct DispatchSummary {
    pub success: bool,
    pub carrier: CarrierKind,
    /// Aligned to the parsed destination list; `None` where the upstream
    /// assigned no id.
    pub message_ids: Vec<Option<String>>,
    pub sent_count: i64,
    pub error: Option<String>,
}

/// Single entry point used by both one-off sends and campaign batches.
pub struct DispatchGateway {
    registry: Arc<CarrierRegistry>,
    store: Arc<SqliteStore>,
}

impl DispatchGateway {
    pub fn new(registry: Arc<CarrierRegistry>, store: Arc<SqliteStore>) -> Self {
        Self { registry, store }
    }

    /// Resolve the carrier, make one adapter call, and append one ledger
    /// row per destination reflecting that destination's outcome.
    ///
    /// Configuration errors (missing credentials, empty request) surface as
    /// `Err` before any send attempt or ledger write. Carrier failures do
    /// not: they land in the summary and in `failed` ledger rows.
    pub async fn dispatch(&self, request: &SendRequest) -> Result<DispatchSummary, VolleyError> {
        let destinations = split_destinations(&request.to);
        if destinations.is_empty() {
            return Err(VolleyError::InvalidRequest(
                "no destination numbers provided".into(),
            ));
        }
        if request.message.trim().is_empty() {
            return Err(VolleyError::InvalidRequest("message must not be empty".into()));
        }

        let kind = request
            .carrier
            .unwrap_or_else(|| self.registry.default_carrier());
        let adapter = self.registry.adapter_for(kind)?;

        let batch = SendBatch {
            destinations: destinations.clone(),
            body: request.message.clone(),
            sender_id: request.sender_id.clone(),
        };
        let outcome = adapter.send(&batch).await;

        let sent_at = now_iso();
        let status = if outcome.accepted {
            RecipientStatus::Sent
        } else {
            RecipientStatus::Failed
        };

        let logs: Vec<NewSmsLog> = destinations
            .iter()
            .enumerate()
            .map(|(i, phone)| NewSmsLog {
                account_id: request.account_id.clone(),
                campaign_id: request.campaign_id.clone(),
                phone: phone.clone(),
                message: request.message.clone(),
                carrier: kind,
                message_id: outcome.message_ids.get(i).cloned().flatten(),
                status,
                error_message: outcome.error.clone(),
                sent_at: sent_at.clone(),
            })
            .collect();
        self.store.insert_logs(logs).await?;

        if outcome.accepted {
            info!(
                carrier = %kind,
                destinations = destinations.len(),
                campaign = request.campaign_id.as_deref().unwrap_or("-"),
                "dispatch accepted"
            );
        } else {
            warn!(
                carrier = %kind,
                destinations = destinations.len(),
                error = outcome.error.as_deref().unwrap_or("unknown"),
                "dispatch failed"
            );
        }

        let sent_count = if outcome.accepted {
            destinations.len() as i64
        } else {
            0
        };
        Ok(DispatchSummary {
            success: outcome.accepted,
            carrier: kind,
            message_ids: outcome.message_ids,
            sent_count,
            error: outcome.error,
        })
    }
}

/// Parse a comma-joined destination field into trimmed, non-empty numbers.
pub fn split_destinations(to: &str) -> Vec<String> {
    to.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_handles_single_and_joined_lists() {
        assert_eq!(split_destinations("5511111111111"), vec!["5511111111111"]);
        assert_eq!(
            split_destinations(" 111 ,222,, 333 "),
            vec!["111", "222", "333"]
        );
        assert!(split_destinations("  ,, ").is_empty());
        assert!(split_destinations("").is_empty());
    }
}
