use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod consumer;
pub mod db;
pub mod invoker;
pub mod notify;
pub mod queue;
pub mod service;
pub mod store;

use crate::invoker::http::HttpWorkerInvoker;
use crate::notify::Notifier;
use crate::notify::log::LogNotifier;
use crate::notify::webhook::WebhookNotifier;
use crate::queue::postgres::PgQueue;
use crate::service::Services;
use crate::store::postgres::PgStateStore;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "buildline_orchestrator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Buildline Orchestrator...");

    let settings = config::Settings::from_env();

    tracing::info!("Connecting to database...");

    // Create database connection pool
    let pool = db::create_pool(&settings.database_url)
        .await
        .expect("Failed to create database pool");

    tracing::info!("Database connection pool created");

    // Run migrations
    db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let store = Arc::new(PgStateStore::new(pool.clone()));
    let queue = Arc::new(PgQueue::new(pool.clone(), settings.visibility_timeout));
    let notifier: Arc<dyn Notifier> = match &settings.webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url)),
        None => Arc::new(LogNotifier),
    };
    let invoker = Arc::new(HttpWorkerInvoker::new(&settings.worker_base_url));

    let services = Services::new(
        store,
        queue,
        notifier,
        invoker,
        settings.chain.clone(),
        settings.per_task_minutes,
        settings.worker_timeout,
    );

    // Dispatch consumer runs alongside the HTTP API
    tokio::spawn(consumer::run(services.clone(), settings.poll_interval));

    // Build router with all API endpoints
    let app = api::create_router(services);

    tracing::info!("Listening on {}", settings.bind_addr);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
