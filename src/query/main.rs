//! Query server for solar irradiance lookups.
//!
//! Exposes the nearest-match lookup over HTTP with permissive CORS.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use helios::{validate_query, Config, Credentials, LookupResult, SolarService};

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Solar irradiance query server")]
struct Args {
    /// Listen address; defaults to 0.0.0.0 on $PORT
    #[arg(short, long)]
    listen: Option<String>,

    /// Port used when --listen is not given
    #[arg(long, env = "PORT", default_value = "8080")]
    port: u16,

    /// TOML config file; without it the spreadsheet source is read from the environment
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
}

/// Application state shared across handlers
struct AppState {
    service: SolarService,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Helios Query Server");

    let config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            Config::load_from_file(path)?
        }
        None => Config::from_env()?,
    };

    let credentials = Credentials::from_env();
    let service = SolarService::from_config(&config, &credentials)?;
    info!("Serving lookups from {} source", service.source_kind());

    let state = Arc::new(AppState { service });

    // Build router
    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/get_solar_data", get(solar_data_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listen = args
        .listen
        .unwrap_or_else(|| format!("0.0.0.0:{}", args.port));
    info!("Starting server on {}", listen);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Serialize)]
struct RootResponse {
    message: &'static str,
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Solar Data API is running!",
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    source: String,
}

/// Health check endpoint; does not touch the data source
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        source: state.service.source_kind().to_string(),
    })
}

#[derive(Deserialize)]
struct SolarQueryParams {
    lat: f64,
    lon: f64,
}

/// Nearest irradiance; lookup failures come back as `{"error": ...}` with 200,
/// non-finite coordinates are a 400
async fn solar_data_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SolarQueryParams>,
) -> Result<Json<LookupResult>, (StatusCode, Json<LookupResult>)> {
    if let Err(e) = validate_query(params.lat, params.lon) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(LookupResult::Error {
                error: e.to_string(),
            }),
        ));
    }

    Ok(Json(state.service.lookup(params.lat, params.lon).await))
}
