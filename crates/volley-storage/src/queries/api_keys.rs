// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! API key operations for inbound request authentication.
//!
//! Only the SHA-256 hash of a key is ever stored; lookup is by hash.

use rusqlite::{OptionalExtension, params};

use volley_core::VolleyError;

use crate::database::Database;
use crate::models::ApiKey;

fn key_from_row(row: &rusqlite::Row<'_>) -> Result<ApiKey, rusqlite::Error> {
    Ok(ApiKey {
        id: row.get(0)?,
        account_id: row.get(1)?,
        key_hash: row.get(2)?,
        label: row.get(3)?,
        is_active: row.get::<_, i64>(4)? != 0,
        created_at: row.get(5)?,
        last_used_at: row.get(6)?,
    })
}

/// Insert a new active key. Returns the row id.
pub async fn insert_key(
    db: &Database,
    account_id: &str,
    key_hash: &str,
    label: &str,
) -> Result<i64, VolleyError> {
    let account_id = account_id.to_string();
    let key_hash = key_hash.to_string();
    let label = label.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO api_keys (account_id, key_hash, label) VALUES (?1, ?2, ?3)",
                params![account_id, key_hash, label],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Look up an active key by hash.
pub async fn find_active_by_hash(
    db: &Database,
    key_hash: &str,
) -> Result<Option<ApiKey>, VolleyError> {
    let key_hash = key_hash.to_string();
    db.connection()
        .call(move |conn| {
            let key = conn
                .query_row(
                    "SELECT id, account_id, key_hash, label, is_active, created_at, last_used_at
                     FROM api_keys
                     WHERE key_hash = ?1 AND is_active = 1",
                    params![key_hash],
                    key_from_row,
                )
                .optional()?;
            Ok(key)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Stamp a key's `last_used_at` after successful authentication.
pub async fn touch_last_used(db: &Database, id: i64, now: &str) -> Result<(), VolleyError> {
    let now = now.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE api_keys SET last_used_at = ?2 WHERE id = ?1",
                params![id, now],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
