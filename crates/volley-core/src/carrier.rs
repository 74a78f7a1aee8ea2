// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The carrier adapter seam: one send contract over heterogeneous upstreams.

use async_trait::async_trait;

use crate::error::VolleyError;

/// One carrier call's worth of work: a non-empty destination list, a message
/// body, and an optional sender id. Chunking to the carrier's per-call
/// ceiling is the batch dispatcher's job, not the adapter's.
#[derive(Debug, Clone)]
pub struct SendBatch {
    pub destinations: Vec<String>,
    pub body: String,
    pub sender_id: Option<String>,
}

/// The uniform result of a carrier send.
///
/// Adapters never return `Err` from a send: every transport failure,
/// malformed response, or upstream rejection is normalized into an
/// unaccepted outcome with a human-readable reason. `message_ids` is always
/// positionally aligned and equal-length with the batch's destination list,
/// with `None` where the upstream assigned no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub accepted: bool,
    pub message_ids: Vec<Option<String>>,
    pub error: Option<String>,
}

impl SendOutcome {
    /// An accepted outcome. Pads or truncates `ids` to `destinations` length
    /// so the alignment invariant holds even for short upstream id arrays.
    pub fn accepted(destinations: usize, ids: Vec<String>) -> Self {
        let mut message_ids: Vec<Option<String>> = ids.into_iter().map(Some).collect();
        message_ids.resize(destinations, None);
        Self {
            accepted: true,
            message_ids,
            error: None,
        }
    }

    /// A rejected outcome covering every destination with the shared reason.
    pub fn rejected(destinations: usize, reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            message_ids: vec![None; destinations],
            error: Some(reason.into()),
        }
    }
}

/// Account balance as reported by a carrier that supports the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierBalance {
    pub balance: String,
    pub gift: String,
}

/// Adapter for a single upstream SMS carrier.
///
/// All adapters implement the same contract despite differing wire formats;
/// dispatch selects the implementation by configuration, never by
/// conditional branching in callers.
#[async_trait]
pub trait CarrierAdapter: Send + Sync + 'static {
    /// The carrier's wire name (matches [`crate::types::CarrierKind`]).
    fn name(&self) -> &str;

    /// Submits one batch to the upstream. Must not hang: implementations
    /// carry a bounded per-call timeout, and a timed-out call is reported
    /// as an unaccepted outcome like any other transport failure.
    async fn send(&self, batch: &SendBatch) -> SendOutcome;

    /// Queries the carrier account balance. Most carriers do not expose
    /// one; the default reports the capability as absent.
    async fn balance(&self) -> Result<CarrierBalance, VolleyError> {
        Err(VolleyError::Carrier {
            message: format!("{} does not report a balance", self.name()),
            source: None,
        })
    }
}
