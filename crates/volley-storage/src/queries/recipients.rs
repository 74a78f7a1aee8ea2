// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign recipient operations: bulk authoring inserts, pending-page
//! fetches, page outcome application, and receipt application.
//!
//! Outcome and receipt updates are guarded on the row's current status, so
//! a recipient only ever moves forward along
//! `pending -> sent -> {delivered | failed}`.

use rusqlite::{OptionalExtension, params};

use volley_core::VolleyError;
use volley_core::types::RecipientStatus;

use crate::database::Database;
use crate::models::{CampaignRecipient, NewRecipient, ReceiptApplication};

const RECIPIENT_COLUMNS: &str = "id, campaign_id, phone, contact_id, status, message_id,
     sent_at, delivered_at, error_message";

fn recipient_from_row(row: &rusqlite::Row<'_>) -> Result<CampaignRecipient, rusqlite::Error> {
    Ok(CampaignRecipient {
        id: row.get(0)?,
        campaign_id: row.get(1)?,
        phone: row.get(2)?,
        contact_id: row.get(3)?,
        status: super::parse_text_enum(4, row.get::<_, String>(4)?)?,
        message_id: row.get(5)?,
        sent_at: row.get(6)?,
        delivered_at: row.get(7)?,
        error_message: row.get(8)?,
    })
}

/// Bulk-insert recipients for a freshly authored campaign, one `pending`
/// row per destination, in a single transaction.
pub async fn insert_recipients(
    db: &Database,
    campaign_id: &str,
    recipients: &[NewRecipient],
) -> Result<(), VolleyError> {
    let campaign_id = campaign_id.to_string();
    let recipients = recipients.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO campaign_recipients (campaign_id, phone, contact_id, status)
                     VALUES (?1, ?2, ?3, 'pending')",
                )?;
                for r in &recipients {
                    stmt.execute(params![campaign_id, r.phone, r.contact_id])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch up to `limit` recipients currently `pending` for the campaign,
/// oldest first.
pub async fn fetch_pending(
    db: &Database,
    campaign_id: &str,
    limit: i64,
) -> Result<Vec<CampaignRecipient>, VolleyError> {
    let campaign_id = campaign_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RECIPIENT_COLUMNS} FROM campaign_recipients
                 WHERE campaign_id = ?1 AND status = 'pending'
                 ORDER BY id ASC
                 LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![campaign_id, limit], recipient_from_row)?;
            let mut recipients = Vec::new();
            for row in rows {
                recipients.push(row?);
            }
            Ok(recipients)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark a dispatched page `sent`, assigning each recipient its aligned
/// provider message id and the send timestamp. One transaction per page;
/// every update is guarded on `pending` so a recipient is never re-sent
/// backwards into `sent`.
pub async fn mark_page_sent(
    db: &Database,
    assignments: Vec<(i64, Option<String>)>,
    sent_at: &str,
) -> Result<(), VolleyError> {
    let sent_at = sent_at.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "UPDATE campaign_recipients
                     SET status = 'sent', message_id = ?2, sent_at = ?3
                     WHERE id = ?1 AND status = 'pending'",
                )?;
                for (id, message_id) in &assignments {
                    stmt.execute(params![id, message_id, sent_at])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark every recipient in a failed page `failed` with the shared reason.
pub async fn mark_page_failed(
    db: &Database,
    ids: Vec<i64>,
    error: &str,
) -> Result<(), VolleyError> {
    let error = error.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "UPDATE campaign_recipients
                     SET status = 'failed', error_message = ?2
                     WHERE id = ?1 AND status = 'pending'",
                )?;
                for id in &ids {
                    stmt.execute(params![id, error])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Apply a delivery receipt to the recipient holding `message_id`.
///
/// Returns `None` when no recipient carries the id (benign: receipts may
/// reference sends this deployment never logged). The status update is
/// guarded on `sent`, which makes it idempotent per message id: a duplicate
/// receipt matches zero rows and reports `transitioned: false`.
pub async fn apply_receipt(
    db: &Database,
    message_id: &str,
    status: RecipientStatus,
    now: &str,
    error: Option<String>,
) -> Result<Option<ReceiptApplication>, VolleyError> {
    let message_id = message_id.to_string();
    let status_str = status.to_string();
    let delivered_at = if status == RecipientStatus::Delivered {
        Some(now.to_string())
    } else {
        None
    };
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let found: Option<(i64, String)> = tx
                .query_row(
                    "SELECT id, campaign_id FROM campaign_recipients WHERE message_id = ?1",
                    params![message_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            let result = match found {
                Some((id, campaign_id)) => {
                    let rows = tx.execute(
                        "UPDATE campaign_recipients
                         SET status = ?2, delivered_at = ?3, error_message = ?4
                         WHERE id = ?1 AND status = 'sent'",
                        params![id, status_str, delivered_at, error],
                    )?;
                    Some(ReceiptApplication {
                        campaign_id,
                        transitioned: rows > 0,
                    })
                }
                None => None,
            };

            tx.commit()?;
            Ok(result)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch a recipient by provider message id.
pub async fn get_by_message_id(
    db: &Database,
    message_id: &str,
) -> Result<Option<CampaignRecipient>, VolleyError> {
    let message_id = message_id.to_string();
    db.connection()
        .call(move |conn| {
            let recipient = conn
                .query_row(
                    &format!(
                        "SELECT {RECIPIENT_COLUMNS} FROM campaign_recipients
                         WHERE message_id = ?1"
                    ),
                    params![message_id],
                    recipient_from_row,
                )
                .optional()?;
            Ok(recipient)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All recipients of a campaign, oldest first.
pub async fn list_for_campaign(
    db: &Database,
    campaign_id: &str,
) -> Result<Vec<CampaignRecipient>, VolleyError> {
    let campaign_id = campaign_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RECIPIENT_COLUMNS} FROM campaign_recipients
                 WHERE campaign_id = ?1
                 ORDER BY id ASC"
            ))?;
            let rows = stmt.query_map(params![campaign_id], recipient_from_row)?;
            let mut recipients = Vec::new();
            for row in rows {
                recipients.push(row?);
            }
            Ok(recipients)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
