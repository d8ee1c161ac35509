//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use telehub_broker::{BrokerClient, BrokerStats, MemoryBroker, RetryPolicy};
use telehub_core::config::AppConfig;
use telehub_core::error::AppError;
use telehub_core::result::AppResult;
use telehub_core::types::names::{ORDER_SERVICE, SERVICES, USER_EVENTS_TOPIC, USER_SERVICE};
use telehub_database::memory::MemoryDatabase;
use telehub_database::{DatabaseBackend, SessionPool};
use telehub_metrics::{LatestSample, MetricsAccumulator};
use telehub_service::{MetricsQueryService, MonitoredDatabase, OrderService, UserService};
use telehub_worker::samplers::{BrokerSampler, DatabaseSampler};
use telehub_worker::{ManualTrigger, PollerHealth, PollerHealthHandle, PollerRunner, TickSource};

/// Broker that fails the first `failures` publishes, then delegates.
#[derive(Debug)]
pub struct FlakyBroker {
    inner: Arc<MemoryBroker>,
    failures: u32,
    attempts: AtomicU32,
}

impl FlakyBroker {
    pub fn new(inner: Arc<MemoryBroker>, failures: u32) -> Self {
        Self {
            inner,
            failures,
            attempts: AtomicU32::new(0),
        }
    }

    /// Publish attempts seen so far
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrokerClient for FlakyBroker {
    async fn publish(&self, topic: &str, key: &str, value: &str) -> AppResult<()> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.failures {
            return Err(AppError::publish_failure("injected broker failure"));
        }
        self.inner.publish(topic, key, value).await
    }

    fn stats(&self) -> BrokerStats {
        self.inner.stats()
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing store of the user database
    pub user_db: MemoryDatabase,
    /// Backing store of the order database
    pub order_db: MemoryDatabase,
    /// User database pool
    pub user_pool: Arc<SessionPool>,
    /// The in-memory broker behind the client
    pub broker: Arc<MemoryBroker>,
    /// Fires one user database poll
    pub user_db_poll: ManualTrigger,
    /// Fires one broker poll
    pub broker_poll: ManualTrigger,
    /// Poller health views: user database first, then broker
    pub pollers: Vec<PollerHealthHandle>,
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl TestApp {
    /// Create a new test application over in-memory databases and broker
    pub async fn new() -> Self {
        Self::build(None).await
    }

    /// Create a test application whose broker fails the first `failures`
    /// publishes
    pub async fn with_flaky_broker(failures: u32) -> Self {
        Self::build(Some(failures)).await
    }

    async fn build(failures: Option<u32>) -> Self {
        let config = AppConfig::default();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let user_db = MemoryDatabase::new();
        let order_db = MemoryDatabase::new();
        let user_pool = Arc::new(SessionPool::new(
            USER_SERVICE,
            DatabaseBackend::Memory(user_db.clone()),
            4,
        ));
        let order_pool = Arc::new(SessionPool::new(
            ORDER_SERVICE,
            DatabaseBackend::Memory(order_db.clone()),
            4,
        ));

        let broker = Arc::new(MemoryBroker::new(64));
        let consumer = broker
            .spawn_consumer(USER_EVENTS_TOPIC, "monitoring-service", shutdown_rx.clone())
            .await;
        let client: Arc<dyn BrokerClient> = match failures {
            Some(failures) => Arc::new(FlakyBroker::new(Arc::clone(&broker), failures)),
            None => broker.clone(),
        };

        let accumulator = Arc::new(MetricsAccumulator::new(SERVICES));
        let user_db_monitor = MonitoredDatabase::new(Arc::clone(&user_pool));
        let monitored = HashMap::from([
            (USER_SERVICE.to_string(), user_db_monitor.clone()),
            (
                ORDER_SERVICE.to_string(),
                MonitoredDatabase::new(Arc::clone(&order_pool)),
            ),
        ]);
        let broker_latest = LatestSample::new();

        let user_service = Arc::new(UserService::new(
            Arc::clone(&user_pool),
            Arc::clone(&accumulator),
            Arc::clone(&client),
            RetryPolicy::default(),
            USER_EVENTS_TOPIC,
        ));
        let order_service = Arc::new(OrderService::new(order_pool, Arc::clone(&accumulator)));
        let metrics_query = Arc::new(MetricsQueryService::new(
            Arc::clone(&accumulator),
            monitored,
            Arc::clone(&client),
            broker_latest.clone(),
        ));

        let (db_ticks, user_db_poll) = TickSource::manual();
        let db_runner = PollerRunner::new(
            DatabaseSampler::new(USER_SERVICE, user_db_monitor),
            db_ticks,
            3,
        );
        let (broker_ticks, broker_poll) = TickSource::manual();
        let broker_runner = PollerRunner::new(
            BrokerSampler::new(Arc::clone(&client), broker_latest),
            broker_ticks,
            3,
        );
        let pollers = vec![db_runner.health(), broker_runner.health()];
        let tasks = vec![
            consumer,
            tokio::spawn(db_runner.run(shutdown_rx.clone())),
            tokio::spawn(broker_runner.run(shutdown_rx)),
        ];

        let state = telehub_api::AppState {
            config: Arc::new(config),
            user_service,
            order_service,
            metrics_query,
            pollers: Arc::new(pollers.clone()),
            started_at: Instant::now(),
        };

        Self {
            router: telehub_api::build_app(state),
            user_db,
            order_db,
            user_pool,
            broker,
            user_db_poll,
            broker_poll,
            pollers,
            shutdown_tx,
            tasks,
        }
    }

    /// Call a remote procedure
    pub async fn rpc(&self, procedure: &str, body: Value) -> TestResponse {
        self.request("POST", &format!("/api/rpc/{procedure}"), Some(body))
            .await
    }

    /// Make an HTTP request against the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Wait until the poller at `index` has completed `cycles` cycles
    pub async fn wait_for_cycles(&self, index: usize, cycles: u64) {
        self.wait_for_poller(index, |h| h.completed_cycles >= cycles)
            .await;
    }

    /// Wait until the health of the poller at `index` satisfies `ready`
    pub async fn wait_for_poller(&self, index: usize, ready: impl FnMut(&PollerHealth) -> bool) {
        let mut health = self.pollers[index].subscribe();
        tokio::time::timeout(Duration::from_secs(5), health.wait_for(ready))
            .await
            .expect("Poller did not reach the expected state in time")
            .expect("Poller stopped");
    }

    /// Wait until the broker consumer has seen `count` messages
    pub async fn wait_for_consumed(&self, count: i64) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.broker.stats().messages_received < count {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("Consumer did not catch up in time");
    }

    /// Stop background tasks
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        for task in self.tasks {
            let _ = task.await;
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// String field of the body, or "" when absent
    pub fn str(&self, field: &str) -> &str {
        self.body.get(field).and_then(Value::as_str).unwrap_or("")
    }

    /// Integer field of the body
    pub fn i64(&self, field: &str) -> i64 {
        self.body
            .get(field)
            .and_then(Value::as_i64)
            .unwrap_or_else(|| panic!("missing integer field '{field}' in {}", self.body))
    }

    /// Float field of the body
    pub fn f64(&self, field: &str) -> f64 {
        self.body
            .get(field)
            .and_then(Value::as_f64)
            .unwrap_or_else(|| panic!("missing number field '{field}' in {}", self.body))
    }
}
