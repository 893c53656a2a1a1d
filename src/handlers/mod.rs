//! HTTP request handlers for the Switchboard API

use crate::config::Config;
use crate::error::AppResult;
use crate::health::{DashboardState, HttpProber, Probe, SweepScheduler};
use crate::metrics::Metrics;
use crate::presets::PresetStore;
use crate::registry::EndpointRegistry;
use crate::relay::RelayBridge;
use axum::{
    Router,
    routing::{get, post, put},
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub mod dashboard;
pub mod endpoints;
pub mod health;
pub mod metrics;
pub mod presets;
pub mod prompt;
pub mod relay;

/// Application state shared across all handlers
///
/// All fields are Arc'd for cheap cloning across Axum handlers. The dashboard
/// state (health cache + selection) is mutated only through `DashboardState`
/// methods under its write lock.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    registry: Arc<RwLock<EndpointRegistry>>,
    dashboard: Arc<RwLock<DashboardState>>,
    prober: Arc<dyn Probe>,
    scheduler: Arc<SweepScheduler>,
    presets: Arc<RwLock<PresetStore>>,
    relay: Arc<RelayBridge>,
    metrics: Metrics,
    http: reqwest::Client,
}

impl AppState {
    /// Create a new AppState from configuration
    ///
    /// Opens the JSON-file stores under `registry.data_dir` and wires the
    /// prober and sweep scheduler. The scheduler is not started here; the
    /// caller decides when ticking begins.
    pub fn new(config: Config) -> AppResult<Self> {
        let data_dir = Path::new(&config.registry.data_dir);
        let registry = Arc::new(RwLock::new(EndpointRegistry::open(data_dir)?));
        let presets = Arc::new(RwLock::new(PresetStore::open(data_dir)?));
        let dashboard = Arc::new(RwLock::new(DashboardState::new()));

        let prober: Arc<dyn Probe> = Arc::new(HttpProber::new(config.probe.timeout())?);
        let metrics = Metrics::new()
            .map_err(|e| crate::error::AppError::Internal(format!("metrics setup failed: {e}")))?;

        let scheduler = Arc::new(SweepScheduler::new(
            registry.clone(),
            dashboard.clone(),
            prober.clone(),
            metrics.clone(),
        ));

        let relay = Arc::new(RelayBridge::new(config.relay.clone()));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.server.request_timeout_seconds))
            .build()
            .map_err(|e| {
                crate::error::AppError::Internal(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            config: Arc::new(config),
            registry,
            dashboard,
            prober,
            scheduler,
            presets,
            relay,
            metrics,
            http,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Arc<RwLock<EndpointRegistry>> {
        &self.registry
    }

    pub fn dashboard(&self) -> &Arc<RwLock<DashboardState>> {
        &self.dashboard
    }

    pub fn prober(&self) -> &Arc<dyn Probe> {
        &self.prober
    }

    pub fn scheduler(&self) -> &SweepScheduler {
        &self.scheduler
    }

    pub fn presets(&self) -> &Arc<RwLock<PresetStore>> {
        &self.presets
    }

    pub fn relay(&self) -> &RelayBridge {
        &self.relay
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

/// Build the full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::handler))
        .route("/metrics", get(metrics::handler))
        .route(
            "/api/endpoints",
            get(endpoints::list).post(endpoints::create),
        )
        .route(
            "/api/endpoints/{id}",
            put(endpoints::update).delete(endpoints::delete),
        )
        .route("/api/endpoints/{id}/probe", post(endpoints::probe_one))
        .route("/api/sweep", post(dashboard::sweep))
        .route("/api/dashboard", get(dashboard::snapshot))
        .route(
            "/api/selection/{target}",
            put(dashboard::select).delete(dashboard::clear),
        )
        .route("/api/selection/reload", post(dashboard::reload))
        .route("/api/presets", get(presets::list).post(presets::create))
        .route(
            "/api/presets/{id}",
            put(presets::update).delete(presets::delete),
        )
        .route("/api/system-prompt", post(prompt::send))
        .route("/api/relay/connect", post(relay::connect))
        .route("/api/relay/disconnect", post(relay::disconnect))
        .route("/api/relay/publish", post(relay::publish))
        .route("/api/relay/messages", get(relay::messages))
        .layer(axum::middleware::from_fn(
            crate::middleware::request_id::request_id_middleware,
        ))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
