//! Telehub Server: telemetry aggregation for the user and order services
//!
//! Main entry point that wires all crates together and starts the server.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use telehub_broker::{BrokerClient, RetryPolicy};
use telehub_core::config::AppConfig;
use telehub_core::error::AppError;
use telehub_core::types::names::{ORDER_SERVICE, SERVICES, USER_SERVICE};
use telehub_database::SessionPool;
use telehub_database::migration::{Schema, run_migrations};
use telehub_metrics::{LatestSample, MetricsAccumulator};
use telehub_service::{MetricsQueryService, MonitoredDatabase, OrderService, UserService};
use telehub_worker::samplers::{BrokerSampler, DatabaseSampler, ServiceMetricsReporter};
use telehub_worker::{PollerHealthHandle, PollerRunner, Sampler, TickSource};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("TELEHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    let started_at = Instant::now();
    tracing::info!("Starting Telehub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database pools + migrations ──────────────────────
    let mut pools: HashMap<String, Arc<SessionPool>> = HashMap::new();
    for (name, db_config) in config.databases.iter() {
        tracing::info!("Connecting to {} database...", name);
        let pool = Arc::new(SessionPool::connect(name, db_config).await?);

        if let Some(schema) = Schema::for_resource(name) {
            run_migrations(pool.backend(), schema).await?;
        }
        pools.insert(name.to_string(), pool);
    }
    let user_pool = pool_for(&pools, USER_SERVICE)?;
    let order_pool = pool_for(&pools, ORDER_SERVICE)?;

    // ── Step 2: Metrics ──────────────────────────────────────────
    let accumulator = Arc::new(MetricsAccumulator::new(SERVICES));
    let monitored: HashMap<String, MonitoredDatabase> = pools
        .iter()
        .map(|(name, pool)| (name.clone(), MonitoredDatabase::new(Arc::clone(pool))))
        .collect();
    let broker_latest = LatestSample::new();

    // ── Step 3: Shutdown channel + broker consumer ───────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let broker = telehub_broker::from_config(&config.broker)?;
    let consumer_handle = broker
        .spawn_consumer(
            &config.broker.topic,
            &config.broker.group_id,
            shutdown_rx.clone(),
        )
        .await;
    let broker: Arc<dyn BrokerClient> = broker;

    // ── Step 4: Services ─────────────────────────────────────────
    let user_service = Arc::new(UserService::new(
        user_pool,
        Arc::clone(&accumulator),
        Arc::clone(&broker),
        RetryPolicy::from_config(&config.broker.retry),
        config.broker.topic.clone(),
    ));
    let order_service = Arc::new(OrderService::new(order_pool, Arc::clone(&accumulator)));
    let metrics_query = Arc::new(MetricsQueryService::new(
        Arc::clone(&accumulator),
        monitored.clone(),
        Arc::clone(&broker),
        broker_latest.clone(),
    ));

    // ── Step 5: Pollers ──────────────────────────────────────────
    let mut poller_handles = Vec::new();
    let mut poller_health = Vec::new();

    if config.pollers.enabled {
        let threshold = config.pollers.failure_alert_threshold;

        for (name, database) in &monitored {
            let runner = PollerRunner::new(
                DatabaseSampler::new(name, database.clone()),
                TickSource::interval(config.pollers.database_interval()),
                threshold,
            );
            spawn_poller(runner, &shutdown_rx, &mut poller_handles, &mut poller_health);
        }

        let runner = PollerRunner::new(
            BrokerSampler::new(Arc::clone(&broker), broker_latest),
            TickSource::interval(config.pollers.broker_interval()),
            threshold,
        );
        spawn_poller(runner, &shutdown_rx, &mut poller_handles, &mut poller_health);

        let runner = PollerRunner::new(
            ServiceMetricsReporter::new(Arc::clone(&accumulator)),
            TickSource::interval(config.pollers.report_interval()),
            threshold,
        );
        spawn_poller(runner, &shutdown_rx, &mut poller_handles, &mut poller_health);

        tracing::info!("Started {} pollers", poller_handles.len());
    } else {
        tracing::info!("Pollers disabled");
    }

    // ── Step 6: Build and start HTTP server ──────────────────────
    let app_state = telehub_api::AppState {
        config: Arc::new(config.clone()),
        user_service,
        order_service,
        metrics_query,
        pollers: Arc::new(poller_health),
        started_at,
    };

    let app = telehub_api::build_app(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Telehub server listening on {}", addr);

    // ── Step 7: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 8: Wait for background tasks, close pools ───────────
    tracing::info!("Waiting for background tasks to complete...");

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    for handle in poller_handles {
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Poller did not stop within {:?}", grace);
        }
    }
    let _ = tokio::time::timeout(grace, consumer_handle).await;

    for pool in pools.values() {
        pool.close().await;
    }

    tracing::info!("Telehub server shut down gracefully");
    Ok(())
}

fn pool_for(
    pools: &HashMap<String, Arc<SessionPool>>,
    name: &str,
) -> Result<Arc<SessionPool>, AppError> {
    pools
        .get(name)
        .cloned()
        .ok_or_else(|| AppError::configuration(format!("No database configured for '{name}'")))
}

fn spawn_poller<S>(
    runner: PollerRunner<S>,
    shutdown_rx: &watch::Receiver<bool>,
    handles: &mut Vec<JoinHandle<()>>,
    health: &mut Vec<PollerHealthHandle>,
) where
    S: Sampler + 'static,
{
    health.push(runner.health());
    handles.push(tokio::spawn(runner.run(shutdown_rx.clone())));
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
