//! Integration tests for resource metrics and poller health.

mod helpers;

use http::StatusCode;
use serde_json::json;

const USER_DB_POLLER: usize = 0;
const BROKER_POLLER: usize = 1;

#[tokio::test]
async fn test_database_metrics_served_from_latest_sample() {
    let app = helpers::TestApp::new().await;

    // No poll yet: a direct read is taken and kept
    let resp = app
        .rpc("GetDatabaseMetrics", json!({ "service_name": "user" }))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.i64("active_connections"), 1);
    assert_eq!(resp.f64("database_size_mb"), 0.0);

    let resp = app
        .rpc(
            "CreateUser",
            json!({ "name": "Alice", "email": "alice@example.com" }),
        )
        .await;
    assert_eq!(resp.str("status"), "success");

    let resp = app
        .rpc("GetDatabaseMetrics", json!({ "service_name": "user" }))
        .await;
    assert_eq!(resp.f64("database_size_mb"), 0.0);

    assert!(app.user_db_poll.fire());
    app.wait_for_cycles(USER_DB_POLLER, 1).await;

    let resp = app
        .rpc("GetDatabaseMetrics", json!({ "service_name": "user" }))
        .await;
    assert!(resp.f64("database_size_mb") > 0.0);
    assert_eq!(resp.i64("active_connections"), 1);

    app.shutdown().await;
}

#[tokio::test]
async fn test_unknown_database_resource() {
    let app = helpers::TestApp::new().await;

    let resp = app
        .rpc("GetDatabaseMetrics", json!({ "service_name": "billing" }))
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.str("error"), "UNKNOWN_RESOURCE");

    app.shutdown().await;
}

#[tokio::test]
async fn test_failed_poll_keeps_previous_sample() {
    let app = helpers::TestApp::new().await;

    assert!(app.user_db_poll.fire());
    app.wait_for_cycles(USER_DB_POLLER, 1).await;

    app.user_db.set_introspection_failing(true);
    assert!(app.user_db_poll.fire());
    app.wait_for_poller(USER_DB_POLLER, |h| h.failed_cycles >= 1)
        .await;

    let resp = app
        .rpc("GetDatabaseMetrics", json!({ "service_name": "user" }))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.i64("active_connections"), 1);
    assert_eq!(app.user_pool.active(), 0);

    app.shutdown().await;
}

#[tokio::test]
async fn test_kafka_metrics_follow_broker_poller() {
    let app = helpers::TestApp::new().await;

    let resp = app.rpc("GetKafkaMetrics", json!({})).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.i64("messages_received"), 0);
    assert_eq!(resp.i64("lag"), 0);

    app.rpc(
        "CreateUser",
        json!({ "name": "Alice", "email": "alice@example.com" }),
    )
    .await;
    app.wait_for_consumed(1).await;

    // Live counters until the first poll
    let resp = app.rpc("GetKafkaMetrics", json!({})).await;
    assert_eq!(resp.i64("messages_received"), 1);
    assert!(resp.i64("bytes_received") > 0);

    assert!(app.broker_poll.fire());
    app.wait_for_cycles(BROKER_POLLER, 1).await;

    app.rpc(
        "CreateUser",
        json!({ "name": "Bob", "email": "bob@example.com" }),
    )
    .await;
    app.wait_for_consumed(2).await;

    let resp = app.rpc("GetKafkaMetrics", json!({})).await;
    assert_eq!(resp.i64("messages_received"), 1);

    assert!(app.broker_poll.fire());
    app.wait_for_cycles(BROKER_POLLER, 2).await;

    let resp = app.rpc("GetKafkaMetrics", json!({})).await;
    assert_eq!(resp.i64("messages_received"), 2);
    assert_eq!(resp.i64("lag"), 0);

    app.shutdown().await;
}

#[tokio::test]
async fn test_health_reports_pollers() {
    let app = helpers::TestApp::new().await;

    let resp = app.request("GET", "/api/health", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["success"], true);
    assert_eq!(resp.body["data"]["status"], "ok");

    let pollers = resp.body["data"]["pollers"].as_array().unwrap();
    let names: Vec<_> = pollers.iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["database:user", "broker"]);

    let databases = resp.body["data"]["databases"].as_array().unwrap();
    let names: Vec<_> = databases.iter().map(|d| d["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["order", "user"]);
    assert!(databases.iter().all(|d| d["reachable"] == true));
    assert_eq!(databases[1]["active"], 0);

    app.shutdown().await;
}

#[tokio::test]
async fn test_health_degrades_when_database_unreachable() {
    let app = helpers::TestApp::new().await;
    app.order_db.set_available(false);

    let resp = app.request("GET", "/api/health", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["status"], "degraded");
    assert_eq!(resp.body["data"]["databases"][0]["reachable"], false);

    app.shutdown().await;
}

#[tokio::test]
async fn test_kafka_metrics_accept_empty_body() {
    let app = helpers::TestApp::new().await;

    let resp = app.request("POST", "/api/rpc/GetKafkaMetrics", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.i64("messages_received"), 0);

    app.shutdown().await;
}

#[tokio::test]
async fn test_health_degrades_after_repeated_poll_failures() {
    let app = helpers::TestApp::new().await;
    app.user_db.set_introspection_failing(true);

    for _ in 0..3 {
        assert!(app.user_db_poll.fire());
    }
    app.wait_for_poller(USER_DB_POLLER, |h| h.consecutive_failures >= 3)
        .await;

    let resp = app.request("GET", "/api/health", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"]["status"], "degraded");

    app.user_db.set_introspection_failing(false);
    assert!(app.user_db_poll.fire());
    app.wait_for_cycles(USER_DB_POLLER, 1).await;

    let resp = app.request("GET", "/api/health", None).await;
    assert_eq!(resp.body["data"]["status"], "ok");

    app.shutdown().await;
}
