//! Match Odds — Entry Point
//!
//! Initializes configuration, logging, the registries and the
//! probability source, then serves the prediction API until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Build the team/division registry from config
//! 4. Build the probability source (heuristic, model or remote)
//! 5. Wrap it with the heuristic fallback when enabled
//! 6. Create the Prometheus registry and health state
//! 7. Serve the API, /live, /ready and /metrics on one listener
//! 8. Wait for SIGINT → flip readiness → drain → exit

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};

use match_odds::adapters::http::{build_router, AppState};
use match_odds::adapters::metrics::{HealthState, MetricsRegistry};
use match_odds::adapters::registry::StaticRegistry;
use match_odds::adapters::sources::{
    FallbackSource, HeuristicSource, ModelSource, RemoteSource, RemoteSourceConfig,
};
use match_odds::config::{self, AppConfig, SourceKind};
use match_odds::ports::probability_source::ProbabilitySource;
use match_odds::usecases::PredictionService;

/// Env var overriding the config file location.
const CONFIG_ENV: &str = "MATCH_ODDS_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .unwrap_or_else(|| "config.toml".to_string());
    let config = config::loader::load_config(&config_path)
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.service.log_level)
                }),
        )
        .json()
        .init();

    info!(
        name = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path,
        source = ?config.source.kind,
        margin = config.pricing.default_house_margin,
        "Starting match odds service"
    );

    // ── 3. Team and division registry ───────────────────────
    let registry = Arc::new(
        StaticRegistry::from_config(&config.teams, &config.divisions)
            .context("Failed to build team registry")?,
    );

    // ── 4. Metrics ──────────────────────────────────────────
    let metrics = if config.metrics.enabled {
        Some(Arc::new(
            MetricsRegistry::new().context("Failed to create metrics registry")?,
        ))
    } else {
        None
    };

    // ── 5. Probability source (+ heuristic fallback) ────────
    let source = build_source(&config, metrics.clone())?;

    // ── 6. Prediction service and health state ──────────────
    let mut service = PredictionService::new(
        registry.clone(),
        registry,
        Arc::clone(&source),
        config.pricing.clone(),
    );
    if let Some(metrics) = &metrics {
        service = service.with_metrics(Arc::clone(metrics));
    }
    let service = Arc::new(service);

    let health = Arc::new(HealthState::new());
    let source_ready = source.is_ready().await;
    health.set_source_ready(source_ready);
    if !source_ready {
        warn!(source = source.name(), "Probability source not ready at startup");
    }

    // ── 7. Serve API + health + metrics ─────────────────────
    let state = AppState::new(
        Arc::clone(&service),
        Arc::clone(&health),
        config.service.name.clone(),
        config.service.api_version.clone(),
    );
    let app = build_router(state, metrics);

    let listener = tokio::net::TcpListener::bind(&config.service.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.service.bind_address))?;
    info!(address = %config.service.bind_address, "Prediction API listening");

    let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await
    });

    // ── 8. Wait for SIGINT ──────────────────────────────────
    signal::ctrl_c()
        .await
        .context("Failed to listen for SIGINT")?;
    info!("SIGINT received, initiating graceful shutdown");

    // Readiness probe → 503 before the listener stops accepting
    health.begin_shutdown();
    let _ = shutdown_tx.send(());

    match tokio::time::timeout(Duration::from_secs(30), server).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => warn!(error = %e, "Server exited with error"),
        Ok(Err(e)) => warn!(error = %e, "Server task panicked"),
        Err(_) => warn!("Server drain timed out"),
    }

    info!("Shutdown complete");
    Ok(())
}

/// Build the configured probability source.
///
/// With `fallback_to_heuristic`, a model or remote source is wrapped so
/// that its failures are answered by the heuristic table instead of a 503.
fn build_source(
    config: &AppConfig,
    metrics: Option<Arc<MetricsRegistry>>,
) -> Result<Arc<dyn ProbabilitySource>> {
    let source = &config.source;
    let heuristic: Arc<dyn ProbabilitySource> =
        Arc::new(HeuristicSource::new(source.jitter, source.seed));

    let primary: Arc<dyn ProbabilitySource> = match source.kind {
        SourceKind::Heuristic => return Ok(heuristic),
        SourceKind::Model => match ModelSource::load(Path::new(&source.model_path)) {
            Ok(model) => Arc::new(model),
            Err(e) if source.fallback_to_heuristic => {
                warn!(
                    error = %format!("{e:#}"),
                    path = %source.model_path,
                    "Model unavailable, serving heuristic probabilities"
                );
                return Ok(heuristic);
            }
            Err(e) => return Err(e.context("Failed to load model")),
        },
        SourceKind::Remote => {
            let base_url = source
                .remote_url
                .clone()
                .context("source.remote_url is required for kind = \"remote\"")?;
            Arc::new(
                RemoteSource::new(RemoteSourceConfig {
                    base_url,
                    timeout: Duration::from_millis(source.timeout_ms),
                })
                .context("Failed to create remote source")?,
            )
        }
    };

    if !source.fallback_to_heuristic {
        return Ok(primary);
    }

    let mut fallback = FallbackSource::new(primary, heuristic);
    if let Some(metrics) = metrics {
        fallback = fallback.with_metrics(metrics);
    }
    Ok(Arc::new(fallback))
}
