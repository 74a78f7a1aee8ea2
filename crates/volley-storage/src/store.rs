// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! High-level storage facade over the typed query modules.

use tracing::debug;

use volley_config::model::StorageConfig;
use volley_core::VolleyError;
use volley_core::types::RecipientStatus;

use crate::database::Database;
use crate::models::{
    ApiKey, Campaign, CampaignRecipient, NewRecipient, NewSmsLog, ReceiptApplication, SmsLog,
};
use crate::queries;

/// SQLite-backed store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. All writes funnel through the single async
/// connection, so callers may be freely concurrent.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open the configured database, applying migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, VolleyError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite store opened");
        Ok(Self { db })
    }

    /// Checkpoint and release.
    pub async fn close(&self) -> Result<(), VolleyError> {
        self.db.close().await
    }

    /// Direct database access for maintenance tooling and tests.
    pub fn database(&self) -> &Database {
        &self.db
    }

    // --- Campaigns ---

    pub async fn create_campaign(&self, campaign: &Campaign) -> Result<(), VolleyError> {
        queries::campaigns::create_campaign(&self.db, campaign).await
    }

    pub async fn get_campaign(&self, id: &str) -> Result<Option<Campaign>, VolleyError> {
        queries::campaigns::get_campaign(&self.db, id).await
    }

    pub async fn start_campaign(&self, id: &str, now: &str) -> Result<bool, VolleyError> {
        queries::campaigns::start_campaign(&self.db, id, now).await
    }

    pub async fn pause_campaign(&self, id: &str) -> Result<bool, VolleyError> {
        queries::campaigns::pause_campaign(&self.db, id).await
    }

    pub async fn resume_campaign(&self, id: &str) -> Result<bool, VolleyError> {
        queries::campaigns::resume_campaign(&self.db, id).await
    }

    pub async fn complete_campaign(&self, id: &str, now: &str) -> Result<bool, VolleyError> {
        queries::campaigns::complete_campaign(&self.db, id, now).await
    }

    pub async fn increment_campaign_counters(
        &self,
        id: &str,
        sent_delta: i64,
        failed_delta: i64,
    ) -> Result<(), VolleyError> {
        queries::campaigns::increment_counters(&self.db, id, sent_delta, failed_delta).await
    }

    pub async fn increment_campaign_delivered(&self, id: &str) -> Result<(), VolleyError> {
        queries::campaigns::increment_delivered(&self.db, id).await
    }

    // --- Recipients ---

    pub async fn insert_recipients(
        &self,
        campaign_id: &str,
        recipients: &[NewRecipient],
    ) -> Result<(), VolleyError> {
        queries::recipients::insert_recipients(&self.db, campaign_id, recipients).await
    }

    pub async fn fetch_pending_recipients(
        &self,
        campaign_id: &str,
        limit: i64,
    ) -> Result<Vec<CampaignRecipient>, VolleyError> {
        queries::recipients::fetch_pending(&self.db, campaign_id, limit).await
    }

    pub async fn mark_recipients_sent(
        &self,
        assignments: Vec<(i64, Option<String>)>,
        sent_at: &str,
    ) -> Result<(), VolleyError> {
        queries::recipients::mark_page_sent(&self.db, assignments, sent_at).await
    }

    pub async fn mark_recipients_failed(
        &self,
        ids: Vec<i64>,
        error: &str,
    ) -> Result<(), VolleyError> {
        queries::recipients::mark_page_failed(&self.db, ids, error).await
    }

    pub async fn apply_recipient_receipt(
        &self,
        message_id: &str,
        status: RecipientStatus,
        now: &str,
        error: Option<String>,
    ) -> Result<Option<ReceiptApplication>, VolleyError> {
        queries::recipients::apply_receipt(&self.db, message_id, status, now, error).await
    }

    pub async fn get_recipient_by_message_id(
        &self,
        message_id: &str,
    ) -> Result<Option<CampaignRecipient>, VolleyError> {
        queries::recipients::get_by_message_id(&self.db, message_id).await
    }

    pub async fn list_campaign_recipients(
        &self,
        campaign_id: &str,
    ) -> Result<Vec<CampaignRecipient>, VolleyError> {
        queries::recipients::list_for_campaign(&self.db, campaign_id).await
    }

    // --- Send ledger ---

    pub async fn insert_logs(&self, logs: Vec<NewSmsLog>) -> Result<(), VolleyError> {
        queries::logs::insert_logs(&self.db, logs).await
    }

    pub async fn get_log_by_message_id(
        &self,
        message_id: &str,
    ) -> Result<Option<SmsLog>, VolleyError> {
        queries::logs::get_by_message_id(&self.db, message_id).await
    }

    pub async fn apply_log_receipt(
        &self,
        message_id: &str,
        status: RecipientStatus,
        now: &str,
        error: Option<String>,
    ) -> Result<bool, VolleyError> {
        queries::logs::apply_receipt(&self.db, message_id, status, now, error).await
    }

    pub async fn list_recent_logs(
        &self,
        account_id: &str,
        limit: i64,
    ) -> Result<Vec<SmsLog>, VolleyError> {
        queries::logs::list_recent(&self.db, account_id, limit).await
    }

    // --- API keys ---

    pub async fn insert_api_key(
        &self,
        account_id: &str,
        key_hash: &str,
        label: &str,
    ) -> Result<i64, VolleyError> {
        queries::api_keys::insert_key(&self.db, account_id, key_hash, label).await
    }

    pub async fn find_api_key_by_hash(
        &self,
        key_hash: &str,
    ) -> Result<Option<ApiKey>, VolleyError> {
        queries::api_keys::find_active_by_hash(&self.db, key_hash).await
    }

    pub async fn touch_api_key(&self, id: i64, now: &str) -> Result<(), VolleyError> {
        queries::api_keys::touch_last_used(&self.db, id, now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use volley_core::types::{CampaignStatus, CarrierKind, now_iso};

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn open_creates_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("store.db");
        let store = SqliteStore::open(&make_config(db_path.to_str().unwrap()))
            .await
            .unwrap();
        assert!(db_path.exists(), "database file should be created");
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn full_campaign_lifecycle_through_store() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let store = SqliteStore::open(&make_config(db_path.to_str().unwrap()))
            .await
            .unwrap();

        let campaign = Campaign {
            id: "c-1".to_string(),
            account_id: "acct-1".to_string(),
            message: "launch".to_string(),
            sender_id: None,
            carrier: CarrierKind::Eims1,
            status: CampaignStatus::Draft,
            total_recipients: 2,
            sent_count: 0,
            delivered_count: 0,
            failed_count: 0,
            created_at: now_iso(),
            started_at: None,
            completed_at: None,
        };
        store.create_campaign(&campaign).await.unwrap();
        store
            .insert_recipients(
                "c-1",
                &[
                    NewRecipient::from_phone("5511111111111"),
                    NewRecipient::from_phone("5511222222222"),
                ],
            )
            .await
            .unwrap();

        assert!(store.start_campaign("c-1", &now_iso()).await.unwrap());

        let page = store.fetch_pending_recipients("c-1", 100).await.unwrap();
        assert_eq!(page.len(), 2);

        store
            .mark_recipients_sent(
                page.iter()
                    .enumerate()
                    .map(|(i, r)| (r.id, Some(format!("m{}", i + 1))))
                    .collect(),
                &now_iso(),
            )
            .await
            .unwrap();
        store.increment_campaign_counters("c-1", 2, 0).await.unwrap();

        assert!(store.complete_campaign("c-1", &now_iso()).await.unwrap());

        let done = store.get_campaign("c-1").await.unwrap().unwrap();
        assert_eq!(done.status, CampaignStatus::Completed);
        assert_eq!(done.sent_count, 2);
        assert!(done.completed_at.is_some());

        store.close().await.unwrap();
    }
}
