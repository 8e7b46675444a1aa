use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::alerts::{
    dtos as alerts_dtos, handlers::alert_handler, models as alerts_models,
};
use crate::features::auth::{self, dtos as auth_dtos};
use crate::features::favorites::{dtos as favorites_dtos, handlers::favorite_city_handler};
use crate::features::pollution::{handlers::pollution_handler, models as pollution_models};
use crate::features::users::{dtos as users_dtos, handlers::user_handler, models as users_models};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::verify,
        auth::handlers::resend_verification,
        auth::handlers::check,
        // Users
        user_handler::get_me,
        user_handler::update_preferences,
        // Favorites
        favorite_city_handler::add_favorite,
        favorite_city_handler::list_favorites,
        favorite_city_handler::remove_favorite,
        // Pollution (public)
        pollution_handler::get_current,
        pollution_handler::get_forecast,
        pollution_handler::get_history,
        // Alerts
        alert_handler::get_history,
        alert_handler::stream_alerts,
        // Admin
        admin_handlers::simulate_alert,
        admin_handlers::send_test_email,
        admin_handlers::list_caches,
    ),
    components(
        schemas(
            Meta,
            // Auth
            auth_dtos::RegisterRequestDto,
            auth_dtos::RegisterResponseDto,
            auth_dtos::LoginRequestDto,
            auth_dtos::LoginResponseDto,
            auth_dtos::VerifyRequestDto,
            auth_dtos::ResendVerificationRequestDto,
            auth_dtos::AuthCheckResponseDto,
            ApiResponse<auth_dtos::RegisterResponseDto>,
            ApiResponse<auth_dtos::LoginResponseDto>,
            ApiResponse<auth_dtos::AuthCheckResponseDto>,
            // Users
            users_models::UserRole,
            users_dtos::NotificationPreferencesDto,
            users_dtos::UserDetailsResponseDto,
            ApiResponse<users_dtos::UserDetailsResponseDto>,
            // Favorites
            favorites_dtos::CreateFavoriteCityDto,
            favorites_dtos::FavoriteCityResponseDto,
            ApiResponse<favorites_dtos::FavoriteCityResponseDto>,
            ApiResponse<Vec<favorites_dtos::FavoriteCityResponseDto>>,
            // Pollution
            pollution_models::PollutionResponse,
            pollution_models::Coordinates,
            pollution_models::PollutionEntry,
            pollution_models::AqiMain,
            pollution_models::Components,
            ApiResponse<pollution_models::PollutionResponse>,
            // Alerts
            alerts_models::AlertPriority,
            alerts_dtos::AlertMessage,
            alerts_dtos::AlertHistoryResponseDto,
            ApiResponse<Vec<alerts_dtos::AlertHistoryResponseDto>>,
            // Admin
            admin_dtos::SimulateAlertRequestDto,
            admin_dtos::SimulateAlertResponseDto,
            admin_dtos::TestEmailRequestDto,
            admin_dtos::CacheStatsDto,
            ApiResponse<admin_dtos::SimulateAlertResponseDto>,
            ApiResponse<Vec<admin_dtos::CacheStatsDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, email verification and login"),
        (name = "users", description = "Account details and notification preferences"),
        (name = "favorites", description = "Monitored locations"),
        (name = "pollution", description = "Air quality readings"),
        (name = "alerts", description = "Alert history and in-app stream"),
        (name = "admin", description = "Operator tooling (admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "PolluAlert API",
        version = "0.1.0",
        description = "API documentation for PolluAlert",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
