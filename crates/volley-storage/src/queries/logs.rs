// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Send-ledger operations. Rows are append-only at dispatch time and only
//! touched again by the delivery reconciler.

use rusqlite::{OptionalExtension, params};

use volley_core::VolleyError;
use volley_core::types::RecipientStatus;

use crate::database::Database;
use crate::models::{NewSmsLog, SmsLog};

const LOG_COLUMNS: &str = "id, account_id, campaign_id, phone, message, carrier, message_id,
     status, error_message, sent_at, delivered_at";

fn log_from_row(row: &rusqlite::Row<'_>) -> Result<SmsLog, rusqlite::Error> {
    Ok(SmsLog {
        id: row.get(0)?,
        account_id: row.get(1)?,
        campaign_id: row.get(2)?,
        phone: row.get(3)?,
        message: row.get(4)?,
        carrier: super::parse_text_enum(5, row.get::<_, String>(5)?)?,
        message_id: row.get(6)?,
        status: super::parse_text_enum(7, row.get::<_, String>(7)?)?,
        error_message: row.get(8)?,
        sent_at: row.get(9)?,
        delivered_at: row.get(10)?,
    })
}

/// Append one ledger row per destination of a dispatch call, in a single
/// transaction so the ledger never partially records a call.
pub async fn insert_logs(db: &Database, logs: Vec<NewSmsLog>) -> Result<(), VolleyError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO sms_logs (account_id, campaign_id, phone, message, carrier,
                         message_id, status, error_message, sent_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                )?;
                for log in &logs {
                    stmt.execute(params![
                        log.account_id,
                        log.campaign_id,
                        log.phone,
                        log.message,
                        log.carrier.to_string(),
                        log.message_id,
                        log.status.to_string(),
                        log.error_message,
                        log.sent_at,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch a ledger row by provider message id (the public status lookup).
pub async fn get_by_message_id(
    db: &Database,
    message_id: &str,
) -> Result<Option<SmsLog>, VolleyError> {
    let message_id = message_id.to_string();
    db.connection()
        .call(move |conn| {
            let log = conn
                .query_row(
                    &format!("SELECT {LOG_COLUMNS} FROM sms_logs WHERE message_id = ?1"),
                    params![message_id],
                    log_from_row,
                )
                .optional()?;
            Ok(log)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Apply a delivery receipt to the ledger row holding `message_id`.
///
/// Guarded on the row still being `sent`; returns whether a row advanced.
pub async fn apply_receipt(
    db: &Database,
    message_id: &str,
    status: RecipientStatus,
    now: &str,
    error: Option<String>,
) -> Result<bool, VolleyError> {
    let message_id = message_id.to_string();
    let status_str = status.to_string();
    let delivered_at = if status == RecipientStatus::Delivered {
        Some(now.to_string())
    } else {
        None
    };
    db.connection()
        .call(move |conn| {
            let rows = conn.execute(
                "UPDATE sms_logs
                 SET status = ?2, delivered_at = ?3, error_message = ?4
                 WHERE message_id = ?1 AND status = 'sent'",
                params![message_id, status_str, delivered_at, error],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Most recent ledger rows for an account, newest first.
pub async fn list_recent(
    db: &Database,
    account_id: &str,
    limit: i64,
) -> Result<Vec<SmsLog>, VolleyError> {
    let account_id = account_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LOG_COLUMNS} FROM sms_logs
                 WHERE account_id = ?1
                 ORDER BY sent_at DESC, id DESC
                 LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![account_id, limit], log_from_row)?;
            let mut logs = Vec::new();
            for row in rows {
                logs.push(row?);
            }
            Ok(logs)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use volley_core::types::{CarrierKind, now_iso};

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn make_log(phone: &str, message_id: Option<&str>, status: RecipientStatus) -> NewSmsLog {
        NewSmsLog {
            account_id: "acct-1".to_string(),
            campaign_id: None,
            phone: phone.to_string(),
            message: "ping".to_string(),
            carrier: CarrierKind::Onbuka,
            message_id: message_id.map(String::from),
            status,
            error_message: None,
            sent_at: now_iso(),
        }
    }

    #[tokio::test]
    async fn insert_and_lookup_by_message_id() {
        let (db, _dir) = setup_db().await;

        insert_logs(
            &db,
            vec![
                make_log("111", Some("m1"), RecipientStatus::Sent),
                make_log("222", Some("m2"), RecipientStatus::Sent),
            ],
        )
        .await
        .unwrap();

        let log = get_by_message_id(&db, "m2").await.unwrap().unwrap();
        assert_eq!(log.phone, "222");
        assert_eq!(log.status, RecipientStatus::Sent);
        assert_eq!(log.carrier, CarrierKind::Onbuka);

        assert!(get_by_message_id(&db, "nope").await.unwrap().is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn failed_sends_are_logged_without_message_ids() {
        let (db, _dir) = setup_db().await;

        let mut log = make_log("111", None, RecipientStatus::Failed);
        log.error_message = Some("EIMS connection error: refused".to_string());
        insert_logs(&db, vec![log]).await.unwrap();

        let recent = list_recent(&db, "acct-1", 10).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].status, RecipientStatus::Failed);
        assert!(recent[0].message_id.is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn receipt_advances_a_sent_row_once() {
        let (db, _dir) = setup_db().await;
        insert_logs(&db, vec![make_log("111", Some("m1"), RecipientStatus::Sent)])
            .await
            .unwrap();

        assert!(
            apply_receipt(&db, "m1", RecipientStatus::Delivered, &now_iso(), None)
                .await
                .unwrap()
        );
        assert!(
            !apply_receipt(&db, "m1", RecipientStatus::Delivered, &now_iso(), None)
                .await
                .unwrap()
        );

        let log = get_by_message_id(&db, "m1").await.unwrap().unwrap();
        assert_eq!(log.status, RecipientStatus::Delivered);
        assert!(log.delivered_at.is_some());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn receipt_for_unknown_id_touches_nothing() {
        let (db, _dir) = setup_db().await;
        insert_logs(&db, vec![make_log("111", Some("m1"), RecipientStatus::Sent)])
            .await
            .unwrap();

        assert!(
            !apply_receipt(&db, "ghost", RecipientStatus::Failed, &now_iso(), None)
                .await
                .unwrap()
        );

        let log = get_by_message_id(&db, "m1").await.unwrap().unwrap();
        assert_eq!(log.status, RecipientStatus::Sent);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_recent_is_scoped_to_the_account() {
        let (db, _dir) = setup_db().await;

        let mut other = make_log("999", Some("mx"), RecipientStatus::Sent);
        other.account_id = "acct-2".to_string();
        insert_logs(
            &db,
            vec![make_log("111", Some("m1"), RecipientStatus::Sent), other],
        )
        .await
        .unwrap();

        let recent = list_recent(&db, "acct-1", 10).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].phone, "111");

        db.close().await.unwrap();
    }
}
