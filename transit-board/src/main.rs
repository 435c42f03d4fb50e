use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use transit_board::board::{HEALTH_SOURCES, TransitBoard};
use transit_board::config::AppConfig;
use transit_board::feed::{FeedClient, FeedClientConfig, FeedProvider, MockFeedProvider};
use transit_board::health::health_report;
use transit_board::stops::StopTable;
use transit_board::web::{AppState, create_router};

const DEFAULT_CONFIG_PATH: &str = "config.json";
const DEFAULT_STOPS_PATH: &str = "data/stops.txt";
const DEFAULT_ADDR: &str = "0.0.0.0:5000";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("TRANSIT_BOARD_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    let config = AppConfig::load(&config_path)?;
    info!(path = %config_path, "loaded config");

    let stops_path =
        std::env::var("TRANSIT_BOARD_STOPS").unwrap_or_else(|_| DEFAULT_STOPS_PATH.into());
    let stops = StopTable::load(&stops_path)?;
    info!(path = %stops_path, stops = stops.len(), "loaded stop table");

    // Canned feeds for offline runs
    if let Ok(mock_dir) = std::env::var("TRANSIT_BOARD_MOCK_DIR") {
        info!(dir = %mock_dir, "serving feeds from mock directory");
        let provider = MockFeedProvider::from_dir(&mock_dir)?;
        return serve(config, stops, provider).await;
    }

    let mut client_config = FeedClientConfig::new().with_timeout(config.feeds.timeout_secs);
    match std::env::var("MTA_API_KEY") {
        Ok(key) => client_config = client_config.with_api_key(key),
        Err(_) => warn!("MTA_API_KEY not set; requests are sent without a key"),
    }
    let provider = FeedClient::new(client_config)?;
    serve(config, stops, provider).await
}

async fn serve<P>(config: AppConfig, stops: StopTable, provider: P) -> Result<(), BoxError>
where
    P: FeedProvider + 'static,
{
    let started_at = Utc::now();
    let board = Arc::new(TransitBoard::new(&config, stops, provider)?);

    info!("fetching initial board");
    board.run_cycle(Utc::now()).await;

    let report = health_report(
        &HEALTH_SOURCES,
        &board.source_metadata(),
        &config.display,
        started_at,
        Utc::now(),
    );
    info!(status = ?report.status, "health at startup");

    let poll_interval = config.poll_interval();
    let refresh_board = Arc::clone(&board);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(poll_interval);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            refresh_board.run_cycle(Utc::now()).await;
        }
    });
    info!(interval_secs = poll_interval.as_secs(), "fetch loop started");

    let static_dir = std::env::var("TRANSIT_BOARD_STATIC_DIR").ok();
    let state = AppState::new(board, config.display, config.location, started_at);
    let app = create_router(state, static_dir.as_deref());

    let addr: SocketAddr = std::env::var("TRANSIT_BOARD_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.into())
        .parse()?;
    info!(%addr, "transit board listening");
    info!("  GET /api/subway   - next arrivals per station direction");
    info!("  GET /api/inbound  - trains tracked along the corridor");
    info!("  GET /api/config   - station blocks for the frontend");
    info!("  GET /api/health   - per-source health");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
