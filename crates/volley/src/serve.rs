// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `volley serve` command implementation.
//!
//! Opens storage, builds the carrier registry from configured credentials,
//! wires the dispatch engine, and serves the HTTP gateway until shutdown.

use std::sync::Arc;

use tracing::info;

use volley_config::VolleyConfig;
use volley_core::VolleyError;
use volley_dispatch::CarrierRegistry;
use volley_gateway::{GatewayState, ServerConfig, start_server};
use volley_storage::SqliteStore;

/// Runs the `volley serve` command.
pub async fn run_serve(config: VolleyConfig) -> Result<(), VolleyError> {
    info!(service = %config.service.name, "starting volley serve");

    let store = Arc::new(SqliteStore::open(&config.storage).await?);
    let registry = Arc::new(CarrierRegistry::from_settings(config.carriers.clone()));
    let state = GatewayState::new(Arc::clone(&store), registry, config.dispatch.clone());

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    let result = start_server(&server_config, state).await;

    // Checkpoint the WAL on the way out, even after a server error.
    store.close().await?;
    result
}
