use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::alerts::dtos::{AlertHistoryResponseDto, AlertMessage};
use crate::features::alerts::hub::AlertPublisher;
use crate::features::alerts::models::{AlertHistory, AlertPriority, NewAlertHistory};
use crate::features::alerts::repositories::AlertHistoryRepository;
use crate::features::alerts::services::DecisionCache;
use crate::features::favorites::models::FavoriteCity;
use crate::features::users::models::{NotificationPreferences, User};
use crate::modules::mailer::{AlertEmail, EmailTemplates, Mailer};
use crate::shared::types::PaginationQuery;
use crate::shared::validation::is_deliverable_email;

/// Decision rule: at least one channel on and the AQI's level reaches the threshold
pub fn should_alert(preferences: &NotificationPreferences, aqi: i32) -> bool {
    if !preferences.any_channel_enabled() {
        return false;
    }
    AlertPriority::from_aqi(aqi).level() >= preferences.aqi_threshold
}

pub fn alert_message(priority: AlertPriority, city_name: &str, aqi: i32) -> String {
    format!(
        "Alerte Niveau {} ({}) : AQI de {} est à {}",
        priority.level(),
        priority.label(),
        city_name,
        aqi
    )
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%d/%m/%Y %H:%M").to_string()
}

/// Alert decision and fan-out to the history table, the in-app topic and email
pub struct AlertService {
    history: Arc<dyn AlertHistoryRepository>,
    publisher: Arc<dyn AlertPublisher>,
    mailer: Arc<dyn Mailer>,
    templates: Arc<EmailTemplates>,
    decisions: DecisionCache,
}

impl AlertService {
    pub fn new(
        history: Arc<dyn AlertHistoryRepository>,
        publisher: Arc<dyn AlertPublisher>,
        mailer: Arc<dyn Mailer>,
        templates: Arc<EmailTemplates>,
        decisions: DecisionCache,
    ) -> Self {
        Self {
            history,
            publisher,
            mailer,
            templates,
            decisions,
        }
    }

    /// Applies [`should_alert`], memoized per `(user, city)` for the same AQI
    pub fn should_process_alert(&self, user: &User, city_id: Uuid, aqi: i32) -> bool {
        if let Some(decision) = self.decisions.get(user.id, city_id, aqi) {
            tracing::debug!(
                "Cached alert decision for user={} city={} aqi={}: {}",
                user.id,
                city_id,
                aqi,
                decision
            );
            return decision;
        }

        let decision = should_alert(&user.preferences(), aqi);
        self.decisions.record(user.id, city_id, aqi, decision);
        decision
    }

    /// Runs the decision and dispatches when it fires
    pub async fn process_alert(
        &self,
        user: &User,
        city: &FavoriteCity,
        aqi: i32,
    ) -> Result<Option<AlertHistory>> {
        if !self.should_process_alert(user, city.id, aqi) {
            return Ok(None);
        }
        self.dispatch(user, city, aqi).await.map(Some)
    }

    /// Persists the alert, then notifies each enabled channel.
    ///
    /// Channel failures are logged and do not undo the stored history row.
    pub async fn dispatch(
        &self,
        user: &User,
        city: &FavoriteCity,
        aqi: i32,
    ) -> Result<AlertHistory> {
        let priority = AlertPriority::from_aqi(aqi);
        let message = alert_message(priority, &city.city_name, aqi);

        let alert = self
            .history
            .create(NewAlertHistory {
                user_id: user.id,
                aqi,
                latitude: city.latitude,
                longitude: city.longitude,
                city_name: city.city_name.clone(),
                priority,
                message,
            })
            .await?;

        tracing::info!(
            "Alert {} recorded for user={} city={} aqi={} level={}",
            alert.id,
            user.id,
            city.city_name,
            aqi,
            priority.level()
        );

        if user.app_notifications_enabled {
            self.notify_app(user, &alert).await;
        }

        if user.email_notifications_enabled {
            self.notify_email(user, &alert).await;
        }

        Ok(alert)
    }

    async fn notify_app(&self, user: &User, alert: &AlertHistory) {
        match self
            .publisher
            .publish(user.id, AlertMessage::from(alert))
            .await
        {
            Ok(receivers) => {
                tracing::debug!("In-app alert {} delivered to {} clients", alert.id, receivers)
            }
            Err(e) => tracing::error!(
                "Failed to publish in-app alert {} for user {}: {}",
                alert.id,
                user.id,
                e
            ),
        }
    }

    async fn notify_email(&self, user: &User, alert: &AlertHistory) {
        if !is_deliverable_email(&user.email) {
            tracing::warn!(
                "Skipping alert email for user {}: invalid address '{}'",
                user.id,
                user.email
            );
            return;
        }

        let timestamp = format_timestamp(alert.timestamp);
        let content = AlertEmail {
            city_name: &alert.city_name,
            aqi: alert.aqi,
            priority_label: alert.priority.label(),
            priority_color: alert.priority.color(),
            message: &alert.message,
            timestamp: &timestamp,
        };

        let result = match self.templates.alert(&user.email, &content) {
            Ok(email) => self.mailer.send(email).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            tracing::error!(
                "Failed to send alert email {} to {}: {}",
                alert.id,
                user.email,
                e
            );
        }
    }

    pub async fn history(
        &self,
        user_id: Uuid,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<AlertHistoryResponseDto>, i64)> {
        let alerts = self
            .history
            .list_by_user(user_id, pagination.limit(), pagination.offset())
            .await?;
        let total = self.history.count_by_user(user_id).await?;

        Ok((alerts.into_iter().map(Into::into).collect(), total))
    }
}
