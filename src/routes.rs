use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::energy::{consumption, consumption_table, health};
use crate::services::EnergyService;

pub fn create_router(service: EnergyService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/appliancesconsumption", get(consumption))
        .route("/api/v1/appliancesconsumption/html", get(consumption_table))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
