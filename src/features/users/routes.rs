use crate::features::users::handlers::user_handler;
use crate::features::users::services::UserService;
use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/users/me", get(user_handler::get_me))
        .route(
            "/api/users/me/preferences",
            put(user_handler::update_preferences),
        )
        .with_state(service)
}
