// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Volley dispatch engine.

use thiserror::Error;

use crate::types::CampaignStatus;

/// The primary error type used across all Volley crates.
///
/// Carrier transport failures deliberately do NOT appear here: a carrier
/// adapter reports failure through its [`crate::carrier::SendOutcome`] value
/// so that every caller has exactly one failure contract to handle. The
/// `Carrier` variant exists for operations outside the send contract
/// (balance queries, adapter construction plumbing).
#[derive(Debug, Error)]
pub enum VolleyError {
    /// Configuration errors (missing carrier credentials, invalid TOML,
    /// unknown fields). Surfaced before any send attempt or log write.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed or unusable request input, rejected before side effects.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Storage backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Carrier errors outside the uniform send contract.
    #[error("carrier error: {message}")]
    Carrier {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// An explicit lifecycle action was applied to a campaign in the
    /// wrong state.
    #[error("illegal campaign transition: {from} -> {to}")]
    InvalidTransition {
        from: CampaignStatus,
        to: CampaignStatus,
    },

    /// The batch dispatcher was invoked on a campaign that is not `running`.
    #[error("campaign {id} is not dispatchable in status {status}")]
    NotDispatchable {
        id: String,
        status: CampaignStatus,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
