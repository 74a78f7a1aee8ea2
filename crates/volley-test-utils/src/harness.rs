// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared storage fixtures for integration tests.

use std::sync::Arc;

use tempfile::TempDir;

use volley_config::model::StorageConfig;
use volley_core::types::{Campaign, CampaignStatus, CarrierKind, now_iso};
use volley_storage::models::NewRecipient;
use volley_storage::SqliteStore;

/// Open a store on a throwaway database. Keep the returned `TempDir` alive
/// for the duration of the test.
pub async fn temp_store() -> (Arc<SqliteStore>, TempDir) {
    let dir = TempDir::new().expect("create temp dir");
    let config = StorageConfig {
        database_path: dir
            .path()
            .join("volley-test.db")
            .to_string_lossy()
            .into_owned(),
        wal_mode: true,
    };
    let store = SqliteStore::open(&config).await.expect("open temp store");
    (Arc::new(store), dir)
}

/// Seed a campaign with one pending recipient per phone number.
pub async fn seed_campaign(
    store: &SqliteStore,
    id: &str,
    status: CampaignStatus,
    phones: &[&str],
) -> Campaign {
    let campaign = Campaign {
        id: id.to_string(),
        account_id: "acct-test".to_string(),
        message: "test message".to_string(),
        sender_id: None,
        carrier: CarrierKind::Onbuka,
        status,
        total_recipients: phones.len() as i64,
        sent_count: 0,
        delivered_count: 0,
        failed_count: 0,
        created_at: now_iso(),
        started_at: if status == CampaignStatus::Draft {
            None
        } else {
            Some(now_iso())
        },
        completed_at: None,
    };
    store
        .create_campaign(&campaign)
        .await
        .expect("create campaign");

    let seeds: Vec<NewRecipient> = phones
        .iter()
        .map(|p| NewRecipient::from_phone(*p))
        .collect();
    store
        .insert_recipients(id, &seeds)
        .await
        .expect("insert recipients");

    campaign
}
