use crate::features::favorites::handlers::favorite_city_handler;
use crate::features::favorites::services::FavoriteCityService;
use axum::{
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

pub fn routes(service: Arc<FavoriteCityService>) -> Router {
    Router::new()
        .route(
            "/api/favorites",
            get(favorite_city_handler::list_favorites).post(favorite_city_handler::add_favorite),
        )
        .route(
            "/api/favorites/{id}",
            delete(favorite_city_handler::remove_favorite),
        )
        .with_state(service)
}
