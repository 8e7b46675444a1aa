use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::admin::handlers;
use crate::features::admin::services::AdminService;

/// Create admin routes (all require admin access)
pub fn routes(admin_service: Arc<AdminService>) -> Router {
    Router::new()
        .route("/alerts/simulate", post(handlers::simulate_alert))
        .route("/email/test", post(handlers::send_test_email))
        .route("/caches", get(handlers::list_caches))
        .with_state(admin_service)
}
