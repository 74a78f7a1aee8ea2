// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state. Webhook and health routes
//! are public: upstream carriers push receipts without credentials.

use std::sync::Arc;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use volley_config::model::DispatchConfig;
use volley_core::VolleyError;
use volley_dispatch::{
    BatchDispatcher, CampaignControl, CarrierRegistry, DeliveryReconciler, DispatchGateway,
};
use volley_storage::SqliteStore;

use crate::auth::{AuthState, auth_middleware};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub store: Arc<SqliteStore>,
    pub registry: Arc<CarrierRegistry>,
    pub dispatch: Arc<DispatchGateway>,
    pub batcher: Arc<BatchDispatcher>,
    pub control: Arc<CampaignControl>,
    pub reconciler: Arc<DeliveryReconciler>,
}

impl GatewayState {
    /// Wire the engine components over a store and carrier registry.
    pub fn new(
        store: Arc<SqliteStore>,
        registry: Arc<CarrierRegistry>,
        dispatch_config: DispatchConfig,
    ) -> Self {
        let dispatch = Arc::new(DispatchGateway::new(
            Arc::clone(&registry),
            Arc::clone(&store),
        ));
        let batcher = Arc::new(BatchDispatcher::new(
            Arc::clone(&dispatch),
            Arc::clone(&store),
            dispatch_config,
        ));
        let control = Arc::new(CampaignControl::new(Arc::clone(&store)));
        let reconciler = Arc::new(DeliveryReconciler::new(Arc::clone(&store)));
        Self {
            store,
            registry,
            dispatch,
            batcher,
            control,
            reconciler,
        }
    }
}

/// Gateway server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the full gateway router over the given state.
///
/// Routes:
/// - public: `GET /health`, `POST /webhooks/delivery`
/// - API-key authenticated: everything under `/v1`
pub fn build_router(state: GatewayState) -> Router {
    let auth_state = AuthState {
        store: Arc::clone(&state.store),
    };

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/webhooks/delivery", post(handlers::post_delivery_receipt))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/send", post(handlers::post_send))
        .route("/v1/campaigns/{id}/advance", post(handlers::post_advance))
        .route("/v1/campaigns/{id}/start", post(handlers::post_start))
        .route("/v1/campaigns/{id}/pause", post(handlers::post_pause))
        .route("/v1/campaigns/{id}/resume", post(handlers::post_resume))
        .route("/v1/status/{message_id}", get(handlers::get_status))
        .route("/v1/balance", get(handlers::get_balance))
        .route("/v1/logs", get(handlers::get_logs))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the gateway HTTP server and serve until shutdown.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), VolleyError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| VolleyError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| VolleyError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
    }
}
