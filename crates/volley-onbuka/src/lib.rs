// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Onbuka carrier adapter for the Volley dispatch engine.
//!
//! Implements [`CarrierAdapter`] over Onbuka's v3 HTTP+JSON API. Requests
//! are authenticated with a keyed digest: `md5(api_key + api_secret +
//! unix_timestamp)` sent alongside the plaintext timestamp. The upstream
//! rejects stale timestamps, so the signature is computed with wall-clock
//! time at call time, never at batch-build time.

pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use md5::{Digest, Md5};
use tracing::{debug, warn};

use volley_config::model::OnbukaConfig;
use volley_core::carrier::{CarrierAdapter, CarrierBalance, SendBatch, SendOutcome};
use volley_core::error::VolleyError;

use crate::types::{OnbukaResponse, SendSmsRequest};

/// Onbuka carrier adapter. No `Debug` impl: it holds the API secret.
#[derive(Clone)]
pub struct OnbukaCarrier {
    http: reqwest::Client,
    api_key: String,
    api_secret: String,
    app_id: String,
    base_url: String,
}

impl OnbukaCarrier {
    /// Creates an adapter from the carrier config.
    ///
    /// Missing credentials are a configuration error, surfaced here before
    /// any send is attempted.
    pub fn new(config: &OnbukaConfig, timeout: Duration) -> Result<Self, VolleyError> {
        let (api_key, api_secret, app_id) = match (
            config.api_key.as_deref(),
            config.api_secret.as_deref(),
            config.app_id.as_deref(),
        ) {
            (Some(key), Some(secret), Some(app)) if !key.is_empty() && !secret.is_empty() => {
                (key.to_string(), secret.to_string(), app.to_string())
            }
            _ => {
                return Err(VolleyError::Config(
                    "Onbuka credentials not configured".into(),
                ));
            }
        };

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VolleyError::Carrier {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            api_key,
            api_secret,
            app_id,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Signature headers for one request: `(timestamp, digest)`.
    fn sign_now(&self) -> (String, String) {
        let timestamp = Utc::now().timestamp().to_string();
        let digest = sign(&self.api_key, &self.api_secret, &timestamp);
        (timestamp, digest)
    }
}

/// Keyed digest over `api_key + api_secret + timestamp`, hex-encoded.
pub fn sign(api_key: &str, api_secret: &str, timestamp: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(api_key.as_bytes());
    hasher.update(api_secret.as_bytes());
    hasher.update(timestamp.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl CarrierAdapter for OnbukaCarrier {
    fn name(&self) -> &str {
        "onbuka"
    }

    async fn send(&self, batch: &SendBatch) -> SendOutcome {
        let n = batch.destinations.len();
        let (timestamp, digest) = self.sign_now();

        let body = SendSmsRequest {
            app_id: self.app_id.clone(),
            numbers: batch.destinations.join(","),
            content: batch.body.clone(),
            sender_id: batch.sender_id.clone(),
        };

        let response = match self
            .http
            .post(format!("{}/sendSms", self.base_url))
            .header("Content-Type", "application/json;charset=UTF-8")
            .header("Api-Key", &self.api_key)
            .header("Sign", &digest)
            .header("Timestamp", &timestamp)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Onbuka request failed");
                return SendOutcome::rejected(n, format!("Onbuka request failed: {e}"));
            }
        };

        let http_status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                return SendOutcome::rejected(n, format!("Onbuka response read failed: {e}"));
            }
        };

        if !http_status.is_success() {
            return SendOutcome::rejected(
                n,
                format!("Onbuka returned HTTP {http_status}: {text}"),
            );
        }

        let parsed: OnbukaResponse = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(e) => {
                return SendOutcome::rejected(n, format!("Onbuka returned malformed response: {e}"));
            }
        };

        if parsed.status == "0" {
            let ids: Vec<String> = parsed
                .array
                .unwrap_or_default()
                .into_iter()
                .map(|m| m.msg_id)
                .collect();
            debug!(destinations = n, ids = ids.len(), "Onbuka accepted batch");
            SendOutcome::accepted(n, ids)
        } else {
            SendOutcome::rejected(
                n,
                format!("Onbuka error {}: {}", parsed.status, parsed.reason),
            )
        }
    }

    async fn balance(&self) -> Result<CarrierBalance, VolleyError> {
        let (timestamp, digest) = self.sign_now();

        let response = self
            .http
            .get(format!("{}/getBalance", self.base_url))
            .header("Api-Key", &self.api_key)
            .header("Sign", &digest)
            .header("Timestamp", &timestamp)
            .send()
            .await
            .map_err(|e| VolleyError::Carrier {
                message: format!("Onbuka balance request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let parsed: OnbukaResponse =
            response.json().await.map_err(|e| VolleyError::Carrier {
                message: format!("Onbuka returned malformed balance response: {e}"),
                source: Some(Box::new(e)),
            })?;

        if parsed.status == "0" {
            Ok(CarrierBalance {
                balance: parsed.balance.unwrap_or_else(|| "0".into()),
                gift: parsed.gift.unwrap_or_else(|| "0".into()),
            })
        } else {
            Err(VolleyError::Carrier {
                message: format!("Onbuka error {}: {}", parsed.status, parsed.reason),
                source: None,
            })
        }
    }
}
