//! Integration tests for the ingest and service metrics procedures.

mod helpers;

use http::StatusCode;
use serde_json::json;

use telehub_broker::BrokerClient;

#[tokio::test]
async fn test_create_then_get_user() {
    let app = helpers::TestApp::new().await;

    let resp = app
        .rpc(
            "CreateUser",
            json!({ "name": "Alice", "email": "alice@example.com" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.i64("user_id"), 1);
    assert_eq!(resp.str("status"), "success");
    assert_eq!(resp.str("error"), "");

    let resp = app.rpc("GetUser", json!({ "user_id": 1 })).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.i64("user_id"), 1);
    assert_eq!(resp.str("name"), "Alice");
    assert_eq!(resp.str("email"), "alice@example.com");
    assert_eq!(resp.str("error"), "");

    let resp = app
        .rpc("GetServiceMetrics", json!({ "service_name": "user" }))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.i64("total_requests"), 2);
    assert_eq!(resp.i64("successful_requests"), 2);
    assert_eq!(resp.i64("failed_requests"), 0);

    app.shutdown().await;
}

#[tokio::test]
async fn test_get_missing_user_reports_error() {
    let app = helpers::TestApp::new().await;

    let resp = app.rpc("GetUser", json!({ "user_id": 999 })).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.i64("user_id"), 999);
    assert!(resp.str("error").contains("not found"));
    assert_eq!(resp.str("name"), "");

    let resp = app
        .rpc("GetServiceMetrics", json!({ "service_name": "user" }))
        .await;
    assert_eq!(resp.i64("total_requests"), 1);
    assert_eq!(resp.i64("successful_requests"), 0);
    assert_eq!(resp.i64("failed_requests"), 1);
    assert_eq!(resp.f64("average_latency_ms"), 0.0);

    app.shutdown().await;
}

#[tokio::test]
async fn test_create_user_rejects_invalid_email() {
    let app = helpers::TestApp::new().await;

    let resp = app
        .rpc("CreateUser", json!({ "name": "Alice", "email": "nope" }))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.str("status"), "error");
    assert!(resp.str("error").starts_with("VALIDATION"));
    assert_eq!(resp.i64("user_id"), 0);
    assert_eq!(app.broker.stats().messages_received, 0);

    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_publish_retried_until_success() {
    let app = helpers::TestApp::with_flaky_broker(2).await;

    let resp = app
        .rpc(
            "CreateUser",
            json!({ "name": "Alice", "email": "alice@example.com" }),
        )
        .await;
    assert_eq!(resp.str("status"), "success");
    assert_eq!(resp.i64("user_id"), 1);

    // Two backoff waits of 100ms and 200ms
    let resp = app
        .rpc("GetServiceMetrics", json!({ "service_name": "user" }))
        .await;
    assert_eq!(resp.i64("successful_requests"), 1);
    assert!(resp.f64("average_latency_ms") >= 300.0);

    app.wait_for_consumed(1).await;
    app.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_publish_failure_keeps_committed_user() {
    let app = helpers::TestApp::with_flaky_broker(u32::MAX).await;

    let resp = app
        .rpc(
            "CreateUser",
            json!({ "name": "Bob", "email": "bob@example.com" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.str("status"), "error");
    assert!(resp.str("error").starts_with("PUBLISH_FAILURE"));

    let resp = app.rpc("GetUser", json!({ "user_id": 1 })).await;
    assert_eq!(resp.str("name"), "Bob");
    assert_eq!(resp.str("error"), "");

    let resp = app
        .rpc("GetServiceMetrics", json!({ "service_name": "user" }))
        .await;
    assert_eq!(resp.i64("total_requests"), 2);
    assert_eq!(resp.i64("successful_requests"), 1);
    assert_eq!(resp.i64("failed_requests"), 1);
    assert_eq!(app.broker.stats().messages_received, 0);

    app.shutdown().await;
}

#[tokio::test]
async fn test_create_order() {
    let app = helpers::TestApp::new().await;

    let resp = app
        .rpc("CreateOrder", json!({ "user_id": 1, "product": "Widget" }))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.i64("order_id"), 1);
    assert_eq!(resp.str("status"), "success");

    let resp = app
        .rpc("CreateOrder", json!({ "user_id": 1, "product": "" }))
        .await;
    assert_eq!(resp.str("status"), "error");
    assert_eq!(resp.i64("order_id"), 0);

    let resp = app
        .rpc("GetServiceMetrics", json!({ "service_name": "order" }))
        .await;
    assert_eq!(resp.i64("total_requests"), 2);
    assert_eq!(resp.i64("successful_requests"), 1);
    assert_eq!(resp.i64("failed_requests"), 1);

    let resp = app
        .rpc("GetServiceMetrics", json!({ "service_name": "user" }))
        .await;
    assert_eq!(resp.i64("total_requests"), 0);

    app.shutdown().await;
}

#[tokio::test]
async fn test_unknown_service_is_not_found() {
    let app = helpers::TestApp::new().await;

    let resp = app
        .rpc("GetServiceMetrics", json!({ "service_name": "billing" }))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.str("error"), "UNKNOWN_SERVICE");

    app.shutdown().await;
}

#[tokio::test]
async fn test_exhausted_pool_fails_fast() {
    let app = helpers::TestApp::new().await;

    let mut held = Vec::new();
    for _ in 0..app.user_pool.max_sessions() {
        held.push(app.user_pool.acquire().await.unwrap());
    }

    let resp = app
        .rpc(
            "CreateUser",
            json!({ "name": "Carol", "email": "carol@example.com" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.str("status"), "error");
    assert!(resp.str("error").starts_with("POOL_EXHAUSTED"));

    drop(held);
    assert_eq!(app.user_pool.active(), 0);

    let resp = app
        .rpc(
            "CreateUser",
            json!({ "name": "Carol", "email": "carol@example.com" }),
        )
        .await;
    assert_eq!(resp.str("status"), "success");

    app.shutdown().await;
}

#[tokio::test]
async fn test_unavailable_database_reports_error() {
    let app = helpers::TestApp::new().await;
    app.order_db.set_available(false);

    let resp = app
        .rpc("CreateOrder", json!({ "user_id": 1, "product": "Widget" }))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.str("status"), "error");
    assert!(resp.str("error").starts_with("CONNECTION"));

    app.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore = "high-concurrency load run; use --ignored"]
async fn test_concurrent_ingest_load() {
    const REQUESTS: usize = 500;
    let app = std::sync::Arc::new(helpers::TestApp::new().await);

    let mut tasks = Vec::with_capacity(REQUESTS);
    for n in 0..REQUESTS {
        let app = std::sync::Arc::clone(&app);
        tasks.push(tokio::spawn(async move {
            let resp = app
                .rpc(
                    "CreateUser",
                    json!({ "name": format!("user{n}"), "email": format!("user{n}@example.com") }),
                )
                .await;
            assert_eq!(resp.status, StatusCode::OK);
            resp.str("status") == "success"
        }));
    }

    let mut succeeded = 0u64;
    for task in tasks {
        if task.await.unwrap() {
            succeeded += 1;
        }
    }

    let resp = app
        .rpc("GetServiceMetrics", json!({ "service_name": "user" }))
        .await;
    assert_eq!(resp.i64("total_requests"), REQUESTS as i64);
    assert_eq!(resp.i64("successful_requests"), succeeded as i64);
    assert_eq!(resp.i64("failed_requests"), (REQUESTS as u64 - succeeded) as i64);
    assert_eq!(app.user_pool.active(), 0);
}
