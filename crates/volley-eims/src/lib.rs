// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! EIMS gateway carrier adapter for the Volley dispatch engine.
//!
//! EIMS gateways speak plain HTTP+JSON with credentials in the request
//! body. Up to three independently configured accounts are supported; each
//! becomes its own adapter instance. An account's `servers` value is a
//! comma-separated URL list and the first entry is used.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use volley_config::model::EimsAccountConfig;
use volley_core::carrier::{CarrierAdapter, SendBatch, SendOutcome};
use volley_core::error::VolleyError;

/// Body of `POST {server}/sms/send`.
#[derive(Debug, Clone, Serialize)]
struct EimsSendRequest {
    account: String,
    password: String,
    numbers: String,
    content: String,
}

/// Send response. Some gateway builds report `status` as a JSON number,
/// others as a string; both `0` and `"0"` mean accepted.
#[derive(Debug, Clone, Deserialize)]
struct EimsSendResponse {
    #[serde(default)]
    status: Option<serde_json::Value>,
    #[serde(default, rename = "messageIds")]
    message_ids: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

impl EimsSendResponse {
    fn is_accepted(&self) -> bool {
        match &self.status {
            Some(serde_json::Value::Number(n)) => n.as_i64() == Some(0),
            Some(serde_json::Value::String(s)) => s == "0",
            _ => false,
        }
    }
}

/// EIMS carrier adapter for one configured account slot. No `Debug` impl:
/// it holds the account password.
#[derive(Clone)]
pub struct EimsCarrier {
    http: reqwest::Client,
    label: String,
    account: String,
    password: String,
    server_url: String,
}

impl EimsCarrier {
    /// Creates an adapter for one account slot (`label` is its wire name,
    /// e.g. `eims_1`). Missing credentials are a configuration error.
    pub fn new(
        label: &str,
        config: &EimsAccountConfig,
        timeout: Duration,
    ) -> Result<Self, VolleyError> {
        let (account, password, servers) = match (
            config.account.as_deref(),
            config.password.as_deref(),
            config.servers.as_deref(),
        ) {
            (Some(account), Some(password), Some(servers))
                if !account.is_empty() && !servers.trim().is_empty() =>
            {
                (account.to_string(), password.to_string(), servers)
            }
            _ => {
                return Err(VolleyError::Config(format!(
                    "EIMS account {label} not configured"
                )));
            }
        };

        let server_url = first_server(servers).ok_or_else(|| {
            VolleyError::Config(format!("EIMS account {label} has an empty server list"))
        })?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VolleyError::Carrier {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            label: label.to_string(),
            account,
            password,
            server_url,
        })
    }
}

/// First non-empty entry of a comma-separated server list, trimmed and
/// stripped of a trailing slash.
fn first_server(servers: &str) -> Option<String> {
    servers
        .split(',')
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
}

#[async_trait]
impl CarrierAdapter for EimsCarrier {
    fn name(&self) -> &str {
        &self.label
    }

    async fn send(&self, batch: &SendBatch) -> SendOutcome {
        let n = batch.destinations.len();

        // EIMS has no sender-id concept; the account determines the sender.
        let body = EimsSendRequest {
            account: self.account.clone(),
            password: self.password.clone(),
            numbers: batch.destinations.join(","),
            content: batch.body.clone(),
        };

        let response = match self
            .http
            .post(format!("{}/sms/send", self.server_url))
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(account = %self.label, error = %e, "EIMS request failed");
                return SendOutcome::rejected(n, format!("EIMS connection error: {e}"));
            }
        };

        let http_status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                return SendOutcome::rejected(n, format!("EIMS response read failed: {e}"));
            }
        };

        if !http_status.is_success() {
            return SendOutcome::rejected(n, format!("EIMS returned HTTP {http_status}: {text}"));
        }

        let parsed: EimsSendResponse = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(e) => {
                return SendOutcome::rejected(n, format!("EIMS returned malformed response: {e}"));
            }
        };

        if parsed.is_accepted() {
            debug!(account = %self.label, destinations = n, "EIMS accepted batch");
            SendOutcome::accepted(n, parsed.message_ids)
        } else {
            let reason = parsed.error.unwrap_or_else(|| {
                format!(
                    "EIMS error {}",
                    parsed
                        .status
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "unknown".into())
                )
            });
            SendOutcome::rejected(n, reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(servers: &str) -> EimsAccountConfig {
        EimsAccountConfig {
            account: Some("acct".into()),
            password: Some("pw".into()),
            servers: Some(servers.to_string()),
        }
    }

    fn test_batch(destinations: &[&str]) -> SendBatch {
        SendBatch {
            destinations: destinations.iter().map(|d| d.to_string()).collect(),
            body: "hello".into(),
            sender_id: Some("IGNORED".into()),
        }
    }

    #[test]
    fn first_server_takes_the_first_trimmed_entry() {
        assert_eq!(
            first_server(" http://a:8090 , http://b:8090 "),
            Some("http://a:8090".to_string())
        );
        assert_eq!(
            first_server("http://a:8090/"),
            Some("http://a:8090".to_string())
        );
        assert_eq!(first_server(" , ,"), None);
    }

    #[test]
    fn missing_credentials_are_a_config_error() {
        let err = EimsCarrier::new("eims_2", &EimsAccountConfig::default(), Duration::from_secs(5))
            .unwrap_err();
        assert!(matches!(err, VolleyError::Config(_)));
        assert!(err.to_string().contains("EIMS account eims_2 not configured"));
    }

    #[tokio::test]
    async fn send_success_with_numeric_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/sms/send"))
            .and(body_partial_json(serde_json::json!({
                "account": "acct",
                "password": "pw",
                "numbers": "111,222"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": 0,
                "messageIds": ["e1", "e2"]
            })))
            .mount(&server)
            .await;

        let carrier =
            EimsCarrier::new("eims_1", &test_config(&server.uri()), Duration::from_secs(5))
                .unwrap();
        let outcome = carrier.send(&test_batch(&["111", "222"])).await;

        assert!(outcome.accepted);
        assert_eq!(
            outcome.message_ids,
            vec![Some("e1".to_string()), Some("e2".to_string())]
        );
    }

    #[tokio::test]
    async fn send_success_with_string_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/sms/send"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "0",
                "messageIds": ["e1"]
            })))
            .mount(&server)
            .await;

        let carrier =
            EimsCarrier::new("eims_1", &test_config(&server.uri()), Duration::from_secs(5))
                .unwrap();
        let outcome = carrier.send(&test_batch(&["111"])).await;
        assert!(outcome.accepted);
    }

    #[tokio::test]
    async fn upstream_rejection_carries_its_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/sms/send"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": 5,
                "error": "account suspended"
            })))
            .mount(&server)
            .await;

        let carrier =
            EimsCarrier::new("eims_1", &test_config(&server.uri()), Duration::from_secs(5))
                .unwrap();
        let outcome = carrier.send(&test_batch(&["111", "222"])).await;

        assert!(!outcome.accepted);
        assert_eq!(outcome.error.as_deref(), Some("account suspended"));
        assert_eq!(outcome.message_ids, vec![None, None]);
    }

    #[tokio::test]
    async fn rejection_without_error_field_reports_the_status_code() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/sms/send"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": 9})),
            )
            .mount(&server)
            .await;

        let carrier =
            EimsCarrier::new("eims_1", &test_config(&server.uri()), Duration::from_secs(5))
                .unwrap();
        let outcome = carrier.send(&test_batch(&["111"])).await;

        assert!(!outcome.accepted);
        assert_eq!(outcome.error.as_deref(), Some("EIMS error 9"));
    }

    #[tokio::test]
    async fn connection_failure_is_normalized() {
        let carrier = EimsCarrier::new(
            "eims_3",
            &test_config("http://127.0.0.1:1"),
            Duration::from_secs(5),
        )
        .unwrap();
        let outcome = carrier.send(&test_batch(&["111"])).await;

        assert!(!outcome.accepted);
        assert!(
            outcome
                .error
                .as_deref()
                .unwrap()
                .contains("EIMS connection error")
        );
    }

    #[tokio::test]
    async fn only_the_first_server_is_contacted() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/sms/send"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": 0,
                "messageIds": ["e1"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let servers = format!("{}, http://127.0.0.1:1", server.uri());
        let carrier =
            EimsCarrier::new("eims_1", &test_config(&servers), Duration::from_secs(5)).unwrap();
        let outcome = carrier.send(&test_batch(&["111"])).await;
        assert!(outcome.accepted);
    }
}
