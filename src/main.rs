//! citypulse server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use citypulse::app_state::AppState;
use citypulse::build_app;
use citypulse::clients::{GeminiSummarizer, NominatimGeocoder};
use citypulse::config::PulseConfig;
use citypulse::domain::{EventBus, ViewState};
use citypulse::persistence::{InMemoryUpdateStore, PostgresUpdateStore, UpdateStore};
use citypulse::service::demo::demo_updates;
use citypulse::service::{SummaryService, UpdateService, now_millis, spawn_sweeper};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = PulseConfig::from_env().context("invalid configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    tracing::info!(addr = %config.listen_addr, "starting citypulse");

    // Build persistence layer
    let store = build_store(&config).await?;

    // Build domain and service layers
    let event_bus = EventBus::new(config.event_bus_capacity);
    let update_service = Arc::new(UpdateService::new(
        store,
        event_bus.clone(),
        config.feed,
    ));

    let summarizer = GeminiSummarizer::new(
        &config.summary_api_url,
        &config.summary_model,
        config.summary_api_key.clone(),
    )
    .context("failed to build summary client")?;
    if config.summary_api_key.is_none() {
        tracing::warn!("SUMMARY_API_KEY not set, pulse checks will return the fallback text");
    }
    let summary_service = Arc::new(SummaryService::new(Arc::new(summarizer)));

    let geocoder = NominatimGeocoder::new(&config.geocoder_url, &config.geocoder_user_agent)
        .context("failed to build geocoder client")?;

    if config.sweep_interval_secs > 0 {
        let _sweeper = spawn_sweeper(
            Arc::clone(&update_service),
            Duration::from_secs(config.sweep_interval_secs),
        );
    }

    // Build application state
    let app_state = AppState {
        update_service,
        summary_service,
        geocoder: Arc::new(geocoder),
        event_bus,
        view_defaults: ViewState::centered(config.default_center, config.default_zoom),
    };

    let app = build_app(app_state, Duration::from_secs(config.request_timeout_secs));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn build_store(config: &PulseConfig) -> anyhow::Result<Arc<dyn UpdateStore>> {
    if config.persistence_enabled {
        let store = PostgresUpdateStore::connect(config)
            .await
            .context("failed to connect to PostgreSQL")?;
        store
            .ensure_schema()
            .await
            .context("failed to prepare the updates table")?;
        tracing::info!("using PostgreSQL update store");
        return Ok(Arc::new(store));
    }

    let store = if config.seed_demo_data {
        let seed = demo_updates(now_millis());
        tracing::info!(count = seed.len(), "seeding in-memory store with demo updates");
        InMemoryUpdateStore::with_updates(seed)
    } else {
        InMemoryUpdateStore::new()
    };
    tracing::info!("using in-memory update store");
    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
