use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::users::models::{NotificationPreferences, User, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NotificationPreferencesDto {
    /// Lowest priority level (1-5) that triggers an alert
    #[validate(range(min = 1, max = 5, message = "AQI threshold must be between 1 and 5"))]
    pub aqi_threshold: i16,
    pub email_notifications_enabled: bool,
    pub app_notifications_enabled: bool,
}

impl From<NotificationPreferencesDto> for NotificationPreferences {
    fn from(dto: NotificationPreferencesDto) -> Self {
        Self {
            aqi_threshold: dto.aqi_threshold,
            email_notifications_enabled: dto.email_notifications_enabled,
            app_notifications_enabled: dto.app_notifications_enabled,
        }
    }
}

impl From<NotificationPreferences> for NotificationPreferencesDto {
    fn from(p: NotificationPreferences) -> Self {
        Self {
            aqi_threshold: p.aqi_threshold,
            email_notifications_enabled: p.email_notifications_enabled,
            app_notifications_enabled: p.app_notifications_enabled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDetailsResponseDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub verified: bool,
    pub preferences: NotificationPreferencesDto,
}

impl From<User> for UserDetailsResponseDto {
    fn from(u: User) -> Self {
        let preferences = u.preferences().into();
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role,
            verified: u.verified,
            preferences,
        }
    }
}
