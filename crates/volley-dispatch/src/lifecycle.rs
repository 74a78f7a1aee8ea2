// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Explicit campaign lifecycle actions: start, pause, resume.
//!
//! Each action is a guarded single-statement UPDATE; when the campaign is
//! not in the expected source state the update affects zero rows and the
//! action reports an illegal transition instead of overwriting state.
//! The `running -> completed` transition is not here: it belongs to the
//! batch dispatcher alone.

use std::sync::Arc;

use tracing::info;

use volley_core::error::VolleyError;
use volley_core::types::{Campaign, CampaignStatus, now_iso};
use volley_storage::SqliteStore;

/// Administrative campaign state control.
pub struct CampaignControl {
    store: Arc<SqliteStore>,
}

impl CampaignControl {
    pub fn new(store: Arc<SqliteStore>) -> Self {
        Self { store }
    }

    async fn load(&self, id: &str) -> Result<Campaign, VolleyError> {
        self.store
            .get_campaign(id)
            .await?
            .ok_or_else(|| VolleyError::NotFound {
                entity: "campaign",
                id: id.to_string(),
            })
    }

    /// `draft -> running`; stamps `started_at`.
    pub async fn start(&self, id: &str) -> Result<Campaign, VolleyError> {
        let campaign = self.load(id).await?;
        if !self.store.start_campaign(id, &now_iso()).await? {
            return Err(VolleyError::InvalidTransition {
                from: campaign.status,
                to: CampaignStatus::Running,
            });
        }
        info!(campaign = id, "campaign started");
        self.load(id).await
    }

    /// `running -> paused`. Does not cancel a page already in flight; it
    /// only makes the campaign ineligible for further invocations.
    pub async fn pause(&self, id: &str) -> Result<Campaign, VolleyError> {
        let campaign = self.load(id).await?;
        if !self.store.pause_campaign(id).await? {
            return Err(VolleyError::InvalidTransition {
                from: campaign.status,
                to: CampaignStatus::Paused,
            });
        }
        info!(campaign = id, "campaign paused");
        self.load(id).await
    }

    /// `paused -> running`; `started_at` is untouched.
    pub async fn resume(&self, id: &str) -> Result<Campaign, VolleyError> {
        let campaign = self.load(id).await?;
        if !self.store.resume_campaign(id).await? {
            return Err(VolleyError::InvalidTransition {
                from: campaign.status,
                to: CampaignStatus::Running,
            });
        }
        info!(campaign = id, "campaign resumed");
        self.load(id).await
    }
}
