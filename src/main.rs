use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vigil::config::Config;
use vigil::services::{CandidateScanner, ScannerConfig, TokenTracker, TrackerConfig};
use vigil::sources::{ChronosClient, DiscoveryFeed, Forecaster, JupiterClient, JupiterDiscovery};
use vigil::{api, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vigil=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting Vigil server on {}:{}", config.host, config.port);

    // One Jupiter client backs both the price feed and discovery.
    let jupiter = JupiterClient::new(config.jupiter_base_url.clone());

    // Forecasting is optional; without a URL the tracker simply never
    // dispatches.
    let forecaster: Option<Arc<dyn Forecaster>> = config.forecast_url.as_ref().map(|url| {
        info!("Forecast service configured at {}", url);
        Arc::new(ChronosClient::new(url.clone())) as Arc<dyn Forecaster>
    });

    let tracker = TokenTracker::new(
        TrackerConfig {
            history_capacity: config.history_capacity,
            candle_duration_ms: config.candle_duration_secs as i64 * 1000,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            momentum_period: config.momentum_period,
            smoothing_period: config.smoothing_period,
            smoothing_type: config.smoothing_type,
            prediction_length: config.prediction_length,
        },
        Arc::new(jupiter.clone()),
        forecaster,
    );

    let feeds: Vec<Arc<dyn DiscoveryFeed>> = config
        .scan_categories
        .iter()
        .map(|category| {
            Arc::new(JupiterDiscovery::new(
                jupiter.clone(),
                category.clone(),
                config.scan_limit,
            )) as Arc<dyn DiscoveryFeed>
        })
        .collect();

    let scanner = CandidateScanner::new(
        ScannerConfig {
            min_holders_floor: config.min_holders_floor,
        },
        feeds,
    );

    // Create application state
    let state = AppState {
        config: config.clone(),
        tracker: tracker.clone(),
        scanner,
    };

    // Start the ingestion cycle
    tracker.clone().start();

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = api::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Vigil server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
