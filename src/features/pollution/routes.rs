use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::pollution::handlers::pollution_handler;
use crate::features::pollution::services::PollutionService;

/// Public pollution lookups
pub fn routes(service: Arc<PollutionService>) -> Router {
    Router::new()
        .route("/api/pollution/current", get(pollution_handler::get_current))
        .route(
            "/api/pollution/forecast",
            get(pollution_handler::get_forecast),
        )
        .route("/api/pollution/history", get(pollution_handler::get_history))
        .with_state(service)
}
