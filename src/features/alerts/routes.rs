use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::alerts::handlers::alert_handler::{self, AlertsState};
use crate::features::alerts::hub::AlertHub;
use crate::features::alerts::services::AlertService;

pub fn routes(service: Arc<AlertService>, hub: Arc<AlertHub>) -> Router {
    Router::new()
        .route("/api/alerts/history", get(alert_handler::get_history))
        .route("/api/alerts/stream", get(alert_handler::stream_alerts))
        .with_state(AlertsState { service, hub })
}
