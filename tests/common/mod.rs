//! Shared harness: boots the full application on an ephemeral port with an
//! in-memory store and stub outbound clients.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use citypulse::app_state::AppState;
use citypulse::build_app;
use citypulse::clients::{Geocoder, Summarizer};
use citypulse::domain::{Coordinates, EventBus, FeedSettings, ViewState};
use citypulse::error::PulseError;
use citypulse::persistence::InMemoryUpdateStore;
use citypulse::service::{SummaryService, UpdateService};

/// Text returned by [`EchoSummarizer`].
pub const SUMMARY_TEXT: &str = "Traffic is heavy near downtown.";

/// Resolves only "Brooklyn".
#[derive(Debug)]
pub struct FixedGeocoder;

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn search(&self, query: &str) -> Result<Coordinates, PulseError> {
        match query.trim() {
            "" => Err(PulseError::InvalidRequest("query must not be empty".into())),
            "Brooklyn" => Ok(Coordinates::new(40.6782, -73.9442)),
            _ => Err(PulseError::GeoLookupError("location not found".into())),
        }
    }
}

/// Always configured; answers with [`SUMMARY_TEXT`].
#[derive(Debug)]
pub struct EchoSummarizer;

#[async_trait]
impl Summarizer for EchoSummarizer {
    fn is_configured(&self) -> bool {
        true
    }

    async fn generate(&self, _system: &str, _prompt: &str) -> Result<String, PulseError> {
        Ok(format!("  {SUMMARY_TEXT}\n"))
    }
}

/// A running test server.
#[derive(Debug)]
pub struct TestApp {
    /// Bound address.
    pub addr: SocketAddr,
    /// State shared with the server.
    pub state: AppState,
}

impl TestApp {
    /// `http://addr{path}`.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// `ws://addr/ws`.
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }
}

/// Boots the application on `127.0.0.1:0`.
pub async fn spawn_app() -> TestApp {
    spawn_app_with_bus_capacity(64).await
}

/// Boots the application with an event bus holding at most `capacity`
/// undelivered events per subscriber.
pub async fn spawn_app_with_bus_capacity(capacity: usize) -> TestApp {
    let event_bus = EventBus::new(capacity);
    let update_service = Arc::new(UpdateService::new(
        Arc::new(InMemoryUpdateStore::new()),
        event_bus.clone(),
        FeedSettings::default(),
    ));
    let state = AppState {
        update_service,
        summary_service: Arc::new(SummaryService::new(Arc::new(EchoSummarizer))),
        geocoder: Arc::new(FixedGeocoder),
        event_bus,
        view_defaults: ViewState::default(),
    };

    let app = build_app(state.clone(), Duration::from_secs(5));
    let listener = tokio_test::assert_ok!(tokio::net::TcpListener::bind("127.0.0.1:0").await);
    let addr = tokio_test::assert_ok!(listener.local_addr());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    TestApp { addr, state }
}
