// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Volley dispatch engine.
//!
//! This crate provides the error type, the shared domain types (campaign,
//! recipient, send ledger, receipt), and the [`CarrierAdapter`] trait that
//! every upstream carrier crate implements.

pub mod carrier;
pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use carrier::{CarrierAdapter, CarrierBalance, SendBatch, SendOutcome};
pub use error::VolleyError;
pub use types::{
    ApiKey, Campaign, CampaignRecipient, CampaignStatus, CarrierKind, DeliveryReceipt,
    RecipientStatus, SmsLog,
};
