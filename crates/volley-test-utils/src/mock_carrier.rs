// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock carrier adapter for deterministic testing.
//!
//! `MockCarrier` implements `CarrierAdapter` with pre-configured outcomes,
//! enabling fast, CI-runnable tests without upstream carrier calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use volley_core::carrier::{CarrierAdapter, SendBatch, SendOutcome};

/// A mock carrier that returns pre-configured send outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty, the
/// batch is accepted with generated `mock-N` message ids. Every batch is
/// recorded for later inspection.
pub struct MockCarrier {
    outcomes: Arc<Mutex<VecDeque<SendOutcome>>>,
    calls: Arc<Mutex<Vec<SendBatch>>>,
    id_counter: AtomicU64,
}

impl MockCarrier {
    /// Create a mock carrier with an empty outcome queue.
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            id_counter: AtomicU64::new(0),
        }
    }

    /// Create a mock carrier pre-loaded with the given outcomes.
    pub fn with_outcomes(outcomes: Vec<SendOutcome>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::from(outcomes))),
            calls: Arc::new(Mutex::new(Vec::new())),
            id_counter: AtomicU64::new(0),
        }
    }

    /// Queue an outcome for a future send.
    pub async fn push_outcome(&self, outcome: SendOutcome) {
        self.outcomes.lock().await.push_back(outcome);
    }

    /// Every batch this carrier has been asked to send, in order.
    pub async fn calls(&self) -> Vec<SendBatch> {
        self.calls.lock().await.clone()
    }
}

impl Default for MockCarrier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CarrierAdapter for MockCarrier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, batch: &SendBatch) -> SendOutcome {
        self.calls.lock().await.push(batch.clone());

        if let Some(outcome) = self.outcomes.lock().await.pop_front() {
            return outcome;
        }

        let ids: Vec<String> = batch
            .destinations
            .iter()
            .map(|_| {
                let n = self.id_counter.fetch_add(1, Ordering::SeqCst) + 1;
                format!("mock-{n}")
            })
            .collect();
        SendOutcome::accepted(batch.destinations.len(), ids)
    }
}
