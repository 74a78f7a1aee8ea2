// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMPP carrier slot for the Volley dispatch engine.
//!
//! SMPP is a session-oriented binary protocol: it needs a persistent TCP
//! bind to a message center, which this deployment mode does not hold.
//! Rather than hang or surface a different error path, the adapter fails
//! fast with the same `SendOutcome` failure shape every other carrier uses,
//! so callers keep a single failure contract.
//!
//! Session establishment and PDU handling are intentionally absent; the
//! upstream's real behavior is an open gap, not something to invent here.

use async_trait::async_trait;
use tracing::warn;

use volley_core::carrier::{CarrierAdapter, SendBatch, SendOutcome};

/// Reason reported for every SMPP send in this deployment mode.
const TRANSPORT_UNAVAILABLE: &str =
    "SMPP transport unavailable: no persistent session is bound in this deployment";

/// Placeholder adapter for the SMPP carrier slot.
#[derive(Debug, Clone, Default)]
pub struct SmppCarrier;

impl SmppCarrier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CarrierAdapter for SmppCarrier {
    fn name(&self) -> &str {
        "smpp"
    }

    async fn send(&self, batch: &SendBatch) -> SendOutcome {
        warn!(
            destinations = batch.destinations.len(),
            "SMPP send refused: transport unavailable"
        );
        SendOutcome::rejected(batch.destinations.len(), TRANSPORT_UNAVAILABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volley_core::VolleyError;

    fn test_batch(n: usize) -> SendBatch {
        SendBatch {
            destinations: (0..n).map(|i| format!("55111111111{i}")).collect(),
            body: "hello".into(),
            sender_id: None,
        }
    }

    #[tokio::test]
    async fn send_fails_fast_with_the_uniform_shape() {
        let carrier = SmppCarrier::new();
        let outcome = carrier.send(&test_batch(3)).await;

        assert!(!outcome.accepted);
        assert_eq!(outcome.message_ids, vec![None, None, None]);
        assert!(
            outcome
                .error
                .as_deref()
                .unwrap()
                .contains("transport unavailable")
        );
    }

    #[tokio::test]
    async fn balance_is_reported_as_unsupported() {
        let carrier = SmppCarrier::new();
        let err = carrier.balance().await.unwrap_err();
        assert!(matches!(err, VolleyError::Carrier { .. }));
        assert!(err.to_string().contains("smpp"));
    }
}
