// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign dispatch and delivery reconciliation engine.
//!
//! The engine is four pieces over one storage layer:
//! - [`CarrierRegistry`] resolves configured carrier adapters.
//! - [`DispatchGateway`] makes one carrier call per invocation and keeps
//!   the send ledger aligned with it.
//! - [`BatchDispatcher`] pages a running campaign's pending recipients
//!   through the gateway and maintains campaign counters and completion.
//! - [`DeliveryReconciler`] folds asynchronous delivery receipts back onto
//!   persisted state.
//!
//! All invocations are short-lived and stateless; campaigns are isolated
//! purely through row-level status transitions.

pub mod batcher;
pub mod gateway;
pub mod lifecycle;
pub mod reconciler;
pub mod registry;

pub use batcher::{AdvanceOutcome, AdvanceStatus, BatchDispatcher};
pub use gateway::{DispatchGateway, DispatchSummary, SendRequest};
pub use lifecycle::CampaignControl;
pub use reconciler::DeliveryReconciler;
pub use registry::CarrierRegistry;
