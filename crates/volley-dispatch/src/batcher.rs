// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The batch dispatcher: drives a running campaign through pages of
//! pending recipients.
//!
//! Pages are processed strictly sequentially with a configurable pacing
//! delay between them, up to a bounded pages-per-invocation budget. A
//! recipient is claimed by its `pending` status: once a page outcome is
//! applied the rows have advanced, so re-invocation (concurrent or after a
//! crash) never double-sends. Campaign counters are bumped by the deltas
//! observed in this invocation only, as atomic increments.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use volley_config::model::DispatchConfig;
use volley_core::error::VolleyError;
use volley_core::types::{CampaignStatus, now_iso};
use volley_storage::SqliteStore;

use crate::gateway::{DispatchGateway, SendRequest};

/// What one bounded dispatcher invocation observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceStatus {
    /// Pending recipients remain (or may remain); invoke again to resume.
    Processing,
    /// The campaign has no pending recipients and is completed.
    Completed,
}

/// Outcome of one dispatcher invocation.
#[derive(Debug, Clone, Serialize)]
pub struct AdvanceOutcome {
    pub status: AdvanceStatus,
    pub sent: i64,
    pub failed: i64,
}

/// Drives one campaign forward by one bounded run.
pub struct BatchDispatcher {
    gateway: Arc<DispatchGateway>,
    store: Arc<SqliteStore>,
    config: DispatchConfig,
}

impl BatchDispatcher {
    pub fn new(
        gateway: Arc<DispatchGateway>,
        store: Arc<SqliteStore>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            gateway,
            store,
            config,
        }
    }

    /// Advance the campaign by up to `max_pages_per_run` pages.
    ///
    /// Refuses campaigns that are not `running`, except that an
    /// already-completed campaign is a no-op (so repeated advance calls are
    /// idempotent). Zero pending recipients at invocation start triggers
    /// the sole automatic transition, `running -> completed`.
    pub async fn advance(&self, campaign_id: &str) -> Result<AdvanceOutcome, VolleyError> {
        let campaign = self
            .store
            .get_campaign(campaign_id)
            .await?
            .ok_or_else(|| VolleyError::NotFound {
                entity: "campaign",
                id: campaign_id.to_string(),
            })?;

        match campaign.status {
            CampaignStatus::Running => {}
            CampaignStatus::Completed => {
                return Ok(AdvanceOutcome {
                    status: AdvanceStatus::Completed,
                    sent: 0,
                    failed: 0,
                });
            }
            status => {
                return Err(VolleyError::NotDispatchable {
                    id: campaign_id.to_string(),
                    status,
                });
            }
        }

        let mut sent: i64 = 0;
        let mut failed: i64 = 0;
        let mut run_error: Option<VolleyError> = None;

        for page_index in 0..self.config.max_pages_per_run {
            let page = self
                .store
                .fetch_pending_recipients(campaign_id, self.config.page_size)
                .await?;

            if page.is_empty() {
                if page_index == 0 {
                    self.store.complete_campaign(campaign_id, &now_iso()).await?;
                    info!(campaign = campaign_id, "campaign completed");
                    return Ok(AdvanceOutcome {
                        status: AdvanceStatus::Completed,
                        sent: 0,
                        failed: 0,
                    });
                }
                break;
            }

            if page_index > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.page_delay_ms)).await;
            }

            let request = SendRequest {
                account_id: campaign.account_id.clone(),
                to: page
                    .iter()
                    .map(|r| r.phone.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
                message: campaign.message.clone(),
                carrier: Some(campaign.carrier),
                sender_id: campaign.sender_id.clone(),
                campaign_id: Some(campaign.id.clone()),
            };

            let summary = match self.gateway.dispatch(&request).await {
                Ok(summary) => summary,
                Err(e) => {
                    // Nothing was attempted for this page; its recipients
                    // stay pending for the next invocation. Counters for
                    // pages already processed are still applied below.
                    run_error = Some(e);
                    break;
                }
            };

            if summary.success {
                let assignments: Vec<(i64, Option<String>)> = page
                    .iter()
                    .enumerate()
                    .map(|(i, r)| (r.id, summary.message_ids.get(i).cloned().flatten()))
                    .collect();
                self.store
                    .mark_recipients_sent(assignments, &now_iso())
                    .await?;
                sent += page.len() as i64;
            } else {
                let reason = summary.error.as_deref().unwrap_or("send failed");
                self.store
                    .mark_recipients_failed(page.iter().map(|r| r.id).collect(), reason)
                    .await?;
                failed += page.len() as i64;
            }

            debug!(
                campaign = campaign_id,
                page_index,
                recipients = page.len(),
                success = summary.success,
                "page processed"
            );
        }

        if sent > 0 || failed > 0 {
            self.store
                .increment_campaign_counters(campaign_id, sent, failed)
                .await?;
        }

        if let Some(e) = run_error {
            return Err(e);
        }

        info!(campaign = campaign_id, sent, failed, "dispatcher run finished");
        Ok(AdvanceOutcome {
            status: AdvanceStatus::Processing,
            sent,
            failed,
        })
    }
}
