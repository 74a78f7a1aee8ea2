// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `volley keygen` command implementation.
//!
//! Mints a random API key for an account, stores its SHA-256 hash, and
//! prints the raw key exactly once. The raw key is never persisted.

use uuid::Uuid;

use volley_config::VolleyConfig;
use volley_core::VolleyError;
use volley_gateway::hash_key;
use volley_storage::SqliteStore;

/// Runs the `volley keygen` command.
pub async fn run_keygen(
    config: &VolleyConfig,
    account_id: &str,
    label: &str,
) -> Result<(), VolleyError> {
    if account_id.trim().is_empty() {
        return Err(VolleyError::InvalidRequest(
            "account_id must not be empty".into(),
        ));
    }

    let raw_key = format!("vl_{}", Uuid::new_v4().simple());
    let store = SqliteStore::open(&config.storage).await?;
    store
        .insert_api_key(account_id, &hash_key(&raw_key), label)
        .await?;
    store.close().await?;

    println!("{raw_key}");
    eprintln!("API key minted for account {account_id}; shown once, store it now.");
    Ok(())
}
