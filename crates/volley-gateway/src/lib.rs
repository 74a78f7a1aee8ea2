// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Volley dispatch engine.
//!
//! Exposes the dispatch, campaign-advance, lifecycle, receipt-webhook, and
//! status-lookup endpoints over axum, with API-key authentication on the
//! `/v1` surface and a uniform `{ "error": ... }` envelope.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::hash_key;
pub use server::{GatewayState, ServerConfig, build_router, start_server};
