use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::constants::DEFAULT_AQI_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Admin,
}

/// Database model for an account
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub aqi_threshold: i16,
    pub email_notifications_enabled: bool,
    pub app_notifications_enabled: bool,
    pub verified: bool,
    pub verification_code: Option<String>,
    pub verification_code_expiry: Option<DateTime<Utc>>,
    pub verification_attempts: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn preferences(&self) -> NotificationPreferences {
        NotificationPreferences {
            aqi_threshold: self.aqi_threshold,
            email_notifications_enabled: self.email_notifications_enabled,
            app_notifications_enabled: self.app_notifications_enabled,
        }
    }

    pub fn verification_state(&self) -> VerificationState {
        VerificationState {
            verified: self.verified,
            code: self.verification_code.clone(),
            expiry: self.verification_code_expiry,
            attempts: self.verification_attempts,
        }
    }
}

/// How and when a user wants to be alerted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationPreferences {
    /// Lowest priority level (1-5) that triggers an alert
    pub aqi_threshold: i16,
    pub email_notifications_enabled: bool,
    pub app_notifications_enabled: bool,
}

impl NotificationPreferences {
    pub fn any_channel_enabled(&self) -> bool {
        self.email_notifications_enabled || self.app_notifications_enabled
    }
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            aqi_threshold: DEFAULT_AQI_THRESHOLD,
            email_notifications_enabled: true,
            app_notifications_enabled: true,
        }
    }
}

/// Email verification columns, read and written together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationState {
    pub verified: bool,
    pub code: Option<String>,
    pub expiry: Option<DateTime<Utc>>,
    pub attempts: i32,
}

/// Fields needed to insert a fresh, unverified account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub preferences: NotificationPreferences,
    pub verification_code: String,
    pub verification_code_expiry: DateTime<Utc>,
}
