// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign CRUD, lifecycle transitions, and counter increments.
//!
//! Every status transition is a guarded single-statement UPDATE: the
//! expected current status sits in the WHERE clause, so an illegal or raced
//! transition affects zero rows and is reported to the caller instead of
//! overwriting state. Counters are only ever bumped with `SET x = x + ?`.

use rusqlite::{OptionalExtension, params};

use volley_core::VolleyError;

use crate::database::Database;
use crate::models::Campaign;

const CAMPAIGN_COLUMNS: &str = "id, account_id, message, sender_id, carrier, status,
     total_recipients, sent_count, delivered_count, failed_count,
     created_at, started_at, completed_at";

fn campaign_from_row(row: &rusqlite::Row<'_>) -> Result<Campaign, rusqlite::Error> {
    Ok(Campaign {
        id: row.get(0)?,
        account_id: row.get(1)?,
        message: row.get(2)?,
        sender_id: row.get(3)?,
        carrier: super::parse_text_enum(4, row.get::<_, String>(4)?)?,
        status: super::parse_text_enum(5, row.get::<_, String>(5)?)?,
        total_recipients: row.get(6)?,
        sent_count: row.get(7)?,
        delivered_count: row.get(8)?,
        failed_count: row.get(9)?,
        created_at: row.get(10)?,
        started_at: row.get(11)?,
        completed_at: row.get(12)?,
    })
}

/// Insert a new campaign row.
pub async fn create_campaign(db: &Database, campaign: &Campaign) -> Result<(), VolleyError> {
    let c = campaign.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO campaigns (id, account_id, message, sender_id, carrier, status,
                     total_recipients, sent_count, delivered_count, failed_count,
                     created_at, started_at, completed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    c.id,
                    c.account_id,
                    c.message,
                    c.sender_id,
                    c.carrier.to_string(),
                    c.status.to_string(),
                    c.total_recipients,
                    c.sent_count,
                    c.delivered_count,
                    c.failed_count,
                    c.created_at,
                    c.started_at,
                    c.completed_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch a campaign by id.
pub async fn get_campaign(db: &Database, id: &str) -> Result<Option<Campaign>, VolleyError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let campaign = conn
                .query_row(
                    &format!("SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE id = ?1"),
                    params![id],
                    campaign_from_row,
                )
                .optional()?;
            Ok(campaign)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// `draft -> running`; stamps `started_at`. Returns false when the campaign
/// was not in `draft`.
pub async fn start_campaign(db: &Database, id: &str, now: &str) -> Result<bool, VolleyError> {
    let id = id.to_string();
    let now = now.to_string();
    db.connection()
        .call(move |conn| {
            let rows = conn.execute(
                "UPDATE campaigns SET status = 'running', started_at = ?2
                 WHERE id = ?1 AND status = 'draft'",
                params![id, now],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// `running -> paused`. Returns false when the campaign was not `running`.
pub async fn pause_campaign(db: &Database, id: &str) -> Result<bool, VolleyError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let rows = conn.execute(
                "UPDATE campaigns SET status = 'paused'
                 WHERE id = ?1 AND status = 'running'",
                params![id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// `paused -> running`; `started_at` is left untouched.
pub async fn resume_campaign(db: &Database, id: &str) -> Result<bool, VolleyError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let rows = conn.execute(
                "UPDATE campaigns SET status = 'running'
                 WHERE id = ?1 AND status = 'paused'",
                params![id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// `running -> completed`; stamps `completed_at`. The sole automatic
/// transition, triggered by the dispatcher observing zero pending
/// recipients. Guarded, so it fires exactly once.
pub async fn complete_campaign(db: &Database, id: &str, now: &str) -> Result<bool, VolleyError> {
    let id = id.to_string();
    let now = now.to_string();
    db.connection()
        .call(move |conn| {
            let rows = conn.execute(
                "UPDATE campaigns SET status = 'completed', completed_at = ?2
                 WHERE id = ?1 AND status = 'running'",
                params![id, now],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Apply one dispatcher invocation's counter deltas as atomic increments.
pub async fn increment_counters(
    db: &Database,
    id: &str,
    sent_delta: i64,
    failed_delta: i64,
) -> Result<(), VolleyError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE campaigns
                 SET sent_count = sent_count + ?2,
                     failed_count = failed_count + ?3
                 WHERE id = ?1",
                params![id, sent_delta, failed_delta],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Bump `delivered_count` by one. A single atomic counter increment so
/// concurrent receipt processing never loses updates.
pub async fn increment_delivered(db: &Database, id: &str) -> Result<(), VolleyError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE campaigns SET delivered_count = delivered_count + 1 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
