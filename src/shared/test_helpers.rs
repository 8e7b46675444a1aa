//! In-memory doubles and fixtures for unit and handler tests.

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, Router};
use chrono::{DateTime, Utc};
use fake::faker::address::en::CityName;
use fake::faker::internet::en::{SafeEmail, Username};
use fake::Fake;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::alerts::dtos::AlertMessage;
use crate::features::alerts::hub::AlertPublisher;
use crate::features::alerts::models::{AlertHistory, NewAlertHistory};
use crate::features::alerts::repositories::AlertHistoryRepository;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::favorites::models::{FavoriteCity, NewFavoriteCity};
use crate::features::favorites::repositories::FavoriteCityRepository;
use crate::features::pollution::clients::AirQualityProvider;
use crate::features::pollution::models::{
    AqiMain, Components, Coordinates, PollutionEntry, PollutionResponse,
};
use crate::features::users::models::{
    NewUser, NotificationPreferences, User, UserRole, VerificationState,
};
use crate::features::users::repositories::UserRepository;
use crate::modules::mailer::{EmailMessage, MailError, Mailer};

// =============================================================================
// FIXTURES
// =============================================================================

/// A verified account with default preferences
pub fn fake_user() -> User {
    let now = Utc::now();
    let preferences = NotificationPreferences::default();
    User {
        id: Uuid::now_v7(),
        username: Username().fake(),
        email: SafeEmail().fake(),
        password_hash: "not-a-real-hash".to_string(),
        role: UserRole::User,
        aqi_threshold: preferences.aqi_threshold,
        email_notifications_enabled: preferences.email_notifications_enabled,
        app_notifications_enabled: preferences.app_notifications_enabled,
        verified: true,
        verification_code: None,
        verification_code_expiry: None,
        verification_attempts: 0,
        created_at: now,
        updated_at: now,
    }
}

pub fn fake_city(user_id: Uuid) -> FavoriteCity {
    FavoriteCity {
        id: Uuid::now_v7(),
        user_id,
        city_name: CityName().fake(),
        latitude: (-90.0..90.0).fake(),
        longitude: (-180.0..180.0).fake(),
        current_aqi: None,
        last_checked: None,
        created_at: Utc::now(),
    }
}

pub fn create_test_user() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: Uuid::now_v7(),
        username: "test_user".to_string(),
        role: UserRole::User,
    }
}

/// Stored row matching an authenticated identity
pub fn test_user_row(identity: &AuthenticatedUser) -> User {
    User {
        id: identity.user_id,
        username: identity.username.clone(),
        email: "test_user@example.fr".to_string(),
        role: identity.role,
        ..fake_user()
    }
}

/// Injects `identity` the way the auth middleware would
pub fn with_authenticated_user(router: Router, identity: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let identity = identity.clone();
            async move {
                request.extensions_mut().insert(identity);
                next.run(request).await
            }
        },
    ))
}

// =============================================================================
// REPOSITORIES
// =============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.get(id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.username == user.username || u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::now_v7(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: UserRole::User,
            aqi_threshold: user.preferences.aqi_threshold,
            email_notifications_enabled: user.preferences.email_notifications_enabled,
            app_notifications_enabled: user.preferences.app_notifications_enabled,
            verified: false,
            verification_code: Some(user.verification_code),
            verification_code_expiry: Some(user.verification_code_expiry),
            verification_attempts: 0,
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() != before)
    }

    async fn update_preferences(
        &self,
        id: Uuid,
        preferences: NotificationPreferences,
    ) -> Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        Ok(users.iter_mut().find(|u| u.id == id).map(|u| {
            u.aqi_threshold = preferences.aqi_threshold;
            u.email_notifications_enabled = preferences.email_notifications_enabled;
            u.app_notifications_enabled = preferences.app_notifications_enabled;
            u.updated_at = Utc::now();
            u.clone()
        }))
    }

    async fn update_verification(&self, id: Uuid, state: &VerificationState) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.verified = state.verified;
            u.verification_code = state.code.clone();
            u.verification_code_expiry = state.expiry;
            u.verification_attempts = state.attempts;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryFavoriteCityRepository {
    cities: Mutex<Vec<FavoriteCity>>,
}

impl InMemoryFavoriteCityRepository {
    pub fn with_cities(cities: Vec<FavoriteCity>) -> Self {
        Self {
            cities: Mutex::new(cities),
        }
    }

    pub fn insert(&self, city: FavoriteCity) {
        self.cities.lock().unwrap().push(city);
    }

    pub fn get(&self, id: Uuid) -> Option<FavoriteCity> {
        self.cities.lock().unwrap().iter().find(|c| c.id == id).cloned()
    }

    pub fn all(&self) -> Vec<FavoriteCity> {
        self.cities.lock().unwrap().clone()
    }
}

#[async_trait]
impl FavoriteCityRepository for InMemoryFavoriteCityRepository {
    async fn list_all(&self) -> Result<Vec<FavoriteCity>> {
        Ok(self.all())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<FavoriteCity>> {
        let cities = self.cities.lock().unwrap();
        Ok(cities.iter().filter(|c| c.user_id == user_id).cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FavoriteCity>> {
        Ok(self.get(id))
    }

    async fn exists_by_user_and_coordinates(
        &self,
        user_id: Uuid,
        latitude: f64,
        longitude: f64,
    ) -> Result<bool> {
        let cities = self.cities.lock().unwrap();
        Ok(cities
            .iter()
            .any(|c| c.user_id == user_id && c.latitude == latitude && c.longitude == longitude))
    }

    async fn create(&self, city: NewFavoriteCity) -> Result<FavoriteCity> {
        let created = FavoriteCity {
            id: Uuid::now_v7(),
            user_id: city.user_id,
            city_name: city.city_name,
            latitude: city.latitude,
            longitude: city.longitude,
            current_aqi: city.current_aqi,
            last_checked: city.current_aqi.map(|_| Utc::now()),
            created_at: Utc::now(),
        };
        self.insert(created.clone());
        Ok(created)
    }

    async fn update_aqi(&self, id: Uuid, aqi: i32, checked_at: DateTime<Utc>) -> Result<()> {
        let mut cities = self.cities.lock().unwrap();
        if let Some(c) = cities.iter_mut().find(|c| c.id == id) {
            c.current_aqi = Some(aqi);
            c.last_checked = Some(checked_at);
        }
        Ok(())
    }

    async fn delete_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut cities = self.cities.lock().unwrap();
        let before = cities.len();
        cities.retain(|c| !(c.id == id && c.user_id == user_id));
        Ok(cities.len() != before)
    }
}

#[derive(Default)]
pub struct InMemoryAlertHistoryRepository {
    alerts: Mutex<Vec<AlertHistory>>,
    fail_writes: AtomicBool,
}

impl InMemoryAlertHistoryRepository {
    /// Stored alerts in insertion order
    pub fn all(&self) -> Vec<AlertHistory> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl AlertHistoryRepository for InMemoryAlertHistoryRepository {
    async fn create(&self, alert: NewAlertHistory) -> Result<AlertHistory> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("history store unavailable".to_string()));
        }

        let created = AlertHistory {
            id: Uuid::now_v7(),
            user_id: alert.user_id,
            aqi: alert.aqi,
            latitude: alert.latitude,
            longitude: alert.longitude,
            city_name: alert.city_name,
            priority: alert.priority,
            message: alert.message,
            timestamp: Utc::now(),
        };
        self.alerts.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AlertHistory>> {
        let alerts = self.alerts.lock().unwrap();
        Ok(alerts
            .iter()
            .rev()
            .filter(|a| a.user_id == user_id)
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64> {
        let alerts = self.alerts.lock().unwrap();
        Ok(alerts.iter().filter(|a| a.user_id == user_id).count() as i64)
    }
}

// =============================================================================
// DELIVERY
// =============================================================================

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail_sends: AtomicBool,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: EmailMessage) -> std::result::Result<(), MailError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(MailError::Transport("connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<(Uuid, AlertMessage)>>,
    fail_publishes: AtomicBool,
}

impl RecordingPublisher {
    pub fn published(&self) -> Vec<(Uuid, AlertMessage)> {
        self.published.lock().unwrap().clone()
    }

    pub fn fail_publishes(&self, fail: bool) {
        self.fail_publishes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl AlertPublisher for RecordingPublisher {
    async fn publish(&self, user_id: Uuid, message: AlertMessage) -> Result<usize> {
        if self.fail_publishes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("topic unavailable".to_string()));
        }
        self.published.lock().unwrap().push((user_id, message));
        Ok(1)
    }
}

// =============================================================================
// AIR QUALITY
// =============================================================================

/// Serves fixed readings per coordinate; unknown coordinates fail.
#[derive(Default)]
pub struct StaticAirQualityProvider {
    /// `None` yields a response with an empty list
    readings: HashMap<String, Option<i32>>,
    calls: AtomicUsize,
}

impl StaticAirQualityProvider {
    pub fn with_aqi(mut self, lat: f64, lon: f64, aqi: i32) -> Self {
        self.readings.insert(format!("{}_{}", lat, lon), Some(aqi));
        self
    }

    pub fn with_empty(mut self, lat: f64, lon: f64) -> Self {
        self.readings.insert(format!("{}_{}", lat, lon), None);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond(&self, lat: f64, lon: f64) -> Result<PollutionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reading = self
            .readings
            .get(&format!("{}_{}", lat, lon))
            .ok_or_else(|| AppError::ExternalServiceError("API error: 503".to_string()))?;

        let list = reading
            .map(|aqi| PollutionEntry {
                dt: Utc::now().timestamp(),
                main: AqiMain { aqi },
                components: Components::default(),
            })
            .into_iter()
            .collect();

        Ok(PollutionResponse {
            coord: Coordinates { lon, lat },
            list,
        })
    }
}

#[async_trait]
impl AirQualityProvider for StaticAirQualityProvider {
    async fn current(&self, lat: f64, lon: f64) -> Result<PollutionResponse> {
        self.respond(lat, lon)
    }

    async fn forecast(&self, lat: f64, lon: f64) -> Result<PollutionResponse> {
        self.respond(lat, lon)
    }

    async fn history(
        &self,
        lat: f64,
        lon: f64,
        _start: i64,
        _end: i64,
    ) -> Result<PollutionResponse> {
        self.respond(lat, lon)
    }
}
