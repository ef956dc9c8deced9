use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::info;

use oficio::config::AppConfig;
use oficio::error::AppError;
use oficio::infra::{
    DeterministicGeocoder, InMemoryListingRepository, InMemoryLocationRepository,
    InMemoryProviderDirectory,
};
use oficio::marketplace::audit::TracingAuditSink;
use oficio::marketplace::listings::{listing_router, ListingService};
use oficio::marketplace::locations::{location_router, LocationService};
use oficio::telemetry;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_server().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_server() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let directory = Arc::new(InMemoryProviderDirectory::default());
    let listings = Arc::new(ListingService::new(
        Arc::new(InMemoryListingRepository::default()),
        directory.clone(),
        Arc::new(TracingAuditSink),
    ));
    let locations = Arc::new(LocationService::new(
        Arc::new(InMemoryLocationRepository::default()),
        directory,
        Arc::new(DeterministicGeocoder),
    ));

    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .with_state(state)
        .merge(listing_router(listings))
        .merge(location_router(locations));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "marketplace core ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}
