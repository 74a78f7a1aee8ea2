// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router-level tests: authentication, the error envelope, and the
//! dispatch/webhook endpoints over a scripted carrier.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use volley_config::model::{CarrierSettings, DispatchConfig};
use volley_core::carrier::SendOutcome;
use volley_core::types::{CampaignStatus, CarrierKind};
use volley_dispatch::CarrierRegistry;
use volley_gateway::{GatewayState, build_router, hash_key};
use volley_storage::SqliteStore;
use volley_test_utils::{MockCarrier, seed_campaign, temp_store};

const RAW_KEY: &str = "vl_http_test_key";

struct TestApp {
    router: Router,
    store: Arc<SqliteStore>,
    carrier: Arc<MockCarrier>,
    _dir: tempfile::TempDir,
}

async fn test_app() -> TestApp {
    let (store, dir) = temp_store().await;
    store
        .insert_api_key("acct-test", &hash_key(RAW_KEY), "test")
        .await
        .unwrap();

    let carrier = Arc::new(MockCarrier::new());
    let registry = Arc::new(CarrierRegistry::from_settings(CarrierSettings::default()));
    registry.register(CarrierKind::Onbuka, Arc::clone(&carrier));

    let state = GatewayState::new(
        Arc::clone(&store),
        registry,
        DispatchConfig {
            page_size: 100,
            max_pages_per_run: 10,
            page_delay_ms: 0,
        },
    );

    TestApp {
        router: build_router(state),
        store,
        carrier,
        _dir: dir,
    }
}

fn authed(request: axum::http::request::Builder) -> axum::http::request::Builder {
    request.header(header::AUTHORIZATION, format!("Bearer {RAW_KEY}"))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app().await;
    let response = app
        .router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn v1_routes_reject_missing_and_bogus_keys_with_the_envelope() {
    let app = test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/v1/logs").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "missing API key");

    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/v1/logs")
                .header(header::AUTHORIZATION, "Bearer wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid API key");
}

#[tokio::test]
async fn send_dispatches_and_reports_aligned_ids() {
    let app = test_app().await;

    let response = app
        .router
        .oneshot(
            authed(Request::builder().method("POST").uri("/v1/send"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"to":"5511111111111,5511222222222","message":"hello"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["sent_count"], 2);
    assert_eq!(body["message_ids"].as_array().unwrap().len(), 2);

    // One ledger row per destination landed.
    let logs = app.store.list_recent_logs("acct-test", 10).await.unwrap();
    assert_eq!(logs.len(), 2);
}

#[tokio::test]
async fn send_with_unknown_provider_is_a_400_with_the_envelope() {
    let app = test_app().await;

    let response = app
        .router
        .oneshot(
            authed(Request::builder().method("POST").uri("/v1/send"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"to":"111","message":"hi","provider":"twilio"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("Unknown provider: twilio")
    );
    assert!(app.carrier.calls().await.is_empty());
}

#[tokio::test]
async fn send_failure_reports_in_body_not_status() {
    let app = test_app().await;
    app.carrier
        .push_outcome(SendOutcome::rejected(1, "Onbuka error 1: invalid sender"))
        .await;

    let response = app
        .router
        .oneshot(
            authed(Request::builder().method("POST").uri("/v1/send"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"to":"111","message":"hi"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["sent_count"], 0);
    assert_eq!(body["error"], "Onbuka error 1: invalid sender");
}

#[tokio::test]
async fn campaign_advance_and_lifecycle_round_trip() {
    let app = test_app().await;
    seed_campaign(
        &app.store,
        "c-1",
        CampaignStatus::Draft,
        &["5511111111111", "5511222222222", "5511333333333"],
    )
    .await;

    let response = app
        .router
        .clone()
        .oneshot(
            authed(Request::builder().method("POST").uri("/v1/campaigns/c-1/start"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "running");

    let response = app
        .router
        .clone()
        .oneshot(
            authed(Request::builder().method("POST").uri("/v1/campaigns/c-1/advance"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "processing");
    assert_eq!(body["sent"], 3);
    assert_eq!(body["failed"], 0);

    // Second advance completes the drained campaign.
    let response = app
        .router
        .clone()
        .oneshot(
            authed(Request::builder().method("POST").uri("/v1/campaigns/c-1/advance"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["status"], "completed");

    // Pausing a completed campaign is an illegal transition.
    let response = app
        .router
        .oneshot(
            authed(Request::builder().method("POST").uri("/v1/campaigns/c-1/pause"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("illegal campaign transition"));
}

#[tokio::test]
async fn advance_of_missing_campaign_is_a_404() {
    let app = test_app().await;
    let response = app
        .router
        .oneshot(
            authed(Request::builder().method("POST").uri("/v1/campaigns/ghost/advance"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "campaign not found: ghost");
}

#[tokio::test]
async fn webhook_applies_single_and_batch_receipts_without_auth() {
    let app = test_app().await;
    seed_campaign(&app.store, "c-1", CampaignStatus::Running, &["111", "222"]).await;
    app.carrier
        .push_outcome(SendOutcome::accepted(2, vec!["m1".into(), "m2".into()]))
        .await;
    app.router
        .clone()
        .oneshot(
            authed(Request::builder().method("POST").uri("/v1/campaigns/c-1/advance"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Single receipt, no Authorization header.
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhooks/delivery")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"msgId":"m1","status":"0"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!({"success": true}));

    // Batch receipt, including an unknown id.
    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhooks/delivery")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"[{"msgId":"m2","status":"0"},{"msgId":"ghost","status":"0"}]"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["processed"], 2);

    let campaign = app.store.get_campaign("c-1").await.unwrap().unwrap();
    assert_eq!(campaign.delivered_count, 2);
}

#[tokio::test]
async fn status_lookup_returns_the_ledger_row_or_404() {
    let app = test_app().await;

    app.router
        .clone()
        .oneshot(
            authed(Request::builder().method("POST").uri("/v1/send"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"to":"111","message":"hi"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(
            authed(Request::builder().uri("/v1/status/mock-1"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["phone"], "111");
    assert_eq!(body["status"], "sent");

    let response = app
        .router
        .oneshot(
            authed(Request::builder().uri("/v1/status/ghost"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "message not found: ghost");
}

#[tokio::test]
async fn logs_endpoint_lists_the_accounts_ledger() {
    let app = test_app().await;

    app.router
        .clone()
        .oneshot(
            authed(Request::builder().method("POST").uri("/v1/send"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"to":"111,222,333","message":"hi"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    let response = app
        .router
        .oneshot(
            authed(Request::builder().uri("/v1/logs?limit=2"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}
