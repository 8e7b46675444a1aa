use chrono::Utc;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::*;
use crate::features::alerts::models::AlertPriority;
use crate::features::alerts::services::{alert_message, format_timestamp, AlertService, DecisionCache};
use crate::features::favorites::repositories::FavoriteCityRepository;
use crate::features::pollution::services::PollutionService;
use crate::features::users::repositories::UserRepository;
use crate::modules::mailer::{AlertEmail, EmailTemplates, Mailer};

const SAMPLE_CITY: &str = "Paris";
const SAMPLE_AQI: i32 = 4;

/// Service for admin operations
pub struct AdminService {
    users: Arc<dyn UserRepository>,
    cities: Arc<dyn FavoriteCityRepository>,
    alerts: Arc<AlertService>,
    mailer: Arc<dyn Mailer>,
    templates: Arc<EmailTemplates>,
    decisions: DecisionCache,
    pollution: Arc<PollutionService>,
}

impl AdminService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        cities: Arc<dyn FavoriteCityRepository>,
        alerts: Arc<AlertService>,
        mailer: Arc<dyn Mailer>,
        templates: Arc<EmailTemplates>,
        decisions: DecisionCache,
        pollution: Arc<PollutionService>,
    ) -> Self {
        Self {
            users,
            cities,
            alerts,
            mailer,
            templates,
            decisions,
            pollution,
        }
    }

    /// Runs the normal decision and dispatch path for a stored favorite
    pub async fn simulate(&self, dto: SimulateAlertRequestDto) -> Result<SimulateAlertResponseDto> {
        let user = self
            .users
            .find_by_id(dto.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Utilisateur non trouvé".to_string()))?;

        let city = self
            .cities
            .find_by_id(dto.city_id)
            .await?
            .filter(|c| c.user_id == user.id)
            .ok_or_else(|| AppError::NotFound("Ville favorite non trouvée".to_string()))?;

        tracing::info!(
            "Simulating alert: user={}, city={}, aqi={}",
            user.id,
            city.id,
            dto.aqi
        );

        let alert = self.alerts.process_alert(&user, &city, dto.aqi).await?;
        Ok(SimulateAlertResponseDto {
            alerted: alert.is_some(),
            alert: alert.map(Into::into),
        })
    }

    /// Sends a sample alert email, surfacing delivery failures
    pub async fn send_test_email(&self, dto: TestEmailRequestDto) -> Result<()> {
        let priority = AlertPriority::from_aqi(SAMPLE_AQI);
        let message = alert_message(priority, SAMPLE_CITY, SAMPLE_AQI);
        let timestamp = format_timestamp(Utc::now());

        let email = self.templates.alert(
            &dto.email,
            &AlertEmail {
                city_name: SAMPLE_CITY,
                aqi: SAMPLE_AQI,
                priority_label: priority.label(),
                priority_color: priority.color(),
                message: &message,
                timestamp: &timestamp,
            },
        )?;

        self.mailer.send(email).await?;
        tracing::info!("Test email sent to {}", dto.email);
        Ok(())
    }

    pub fn cache_stats(&self) -> Vec<CacheStatsDto> {
        vec![self.pollution.stats().into(), self.decisions.stats().into()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::pollution::clients::AirQualityProvider;
    use crate::shared::test_helpers::{
        fake_city, fake_user, InMemoryAlertHistoryRepository, InMemoryFavoriteCityRepository,
        InMemoryUserRepository, RecordingMailer, RecordingPublisher, StaticAirQualityProvider,
    };
    use std::time::Duration;
    use uuid::Uuid;

    struct Fixture {
        service: AdminService,
        mailer: Arc<RecordingMailer>,
        history: Arc<InMemoryAlertHistoryRepository>,
    }

    fn fixture(
        users: Vec<crate::features::users::models::User>,
        cities: Vec<crate::features::favorites::models::FavoriteCity>,
    ) -> Fixture {
        let mailer = Arc::new(RecordingMailer::default());
        let history = Arc::new(InMemoryAlertHistoryRepository::default());
        let templates = Arc::new(EmailTemplates::new().unwrap());
        let decisions = DecisionCache::new(Duration::from_secs(60));
        let alerts = Arc::new(AlertService::new(
            history.clone(),
            Arc::new(RecordingPublisher::default()),
            mailer.clone(),
            templates.clone(),
            decisions.clone(),
        ));
        let provider: Arc<dyn AirQualityProvider> = Arc::new(StaticAirQualityProvider::default());
        let service = AdminService::new(
            Arc::new(InMemoryUserRepository::with_users(users)),
            Arc::new(InMemoryFavoriteCityRepository::with_cities(cities)),
            alerts,
            mailer.clone(),
            templates,
            decisions,
            Arc::new(PollutionService::new(provider, Duration::from_secs(300))),
        );
        Fixture {
            service,
            mailer,
            history,
        }
    }

    #[tokio::test]
    async fn test_simulate_dispatches_above_threshold() {
        let user = fake_user();
        let city = fake_city(user.id);
        let f = fixture(vec![user.clone()], vec![city.clone()]);

        let result = f
            .service
            .simulate(SimulateAlertRequestDto {
                user_id: user.id,
                city_id: city.id,
                aqi: 5,
            })
            .await
            .unwrap();

        assert!(result.alerted);
        assert_eq!(result.alert.unwrap().priority_level, 5);
        assert_eq!(f.history.all().len(), 1);
    }

    #[tokio::test]
    async fn test_simulate_below_threshold_does_not_alert() {
        let mut user = fake_user();
        user.aqi_threshold = 4;
        let city = fake_city(user.id);
        let f = fixture(vec![user.clone()], vec![city.clone()]);

        let result = f
            .service
            .simulate(SimulateAlertRequestDto {
                user_id: user.id,
                city_id: city.id,
                aqi: 2,
            })
            .await
            .unwrap();

        assert!(!result.alerted);
        assert!(result.alert.is_none());
        assert!(f.history.all().is_empty());
    }

    #[tokio::test]
    async fn test_simulate_rejects_city_of_another_user() {
        let user = fake_user();
        let city = fake_city(Uuid::now_v7());
        let f = fixture(vec![user.clone()], vec![city.clone()]);

        let result = f
            .service
            .simulate(SimulateAlertRequestDto {
                user_id: user.id,
                city_id: city.id,
                aqi: 5,
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_send_test_email() {
        let f = fixture(vec![], vec![]);

        f.service
            .send_test_email(TestEmailRequestDto {
                email: "ops@example.fr".to_string(),
            })
            .await
            .unwrap();

        let sent = f.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ops@example.fr");
        assert!(sent[0].text_body.contains(SAMPLE_CITY));
    }

    #[tokio::test]
    async fn test_send_test_email_surfaces_failure() {
        let f = fixture(vec![], vec![]);
        f.mailer.fail_sends(true);

        let result = f
            .service
            .send_test_email(TestEmailRequestDto {
                email: "ops@example.fr".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }

    #[test]
    fn test_cache_stats_lists_both_caches() {
        let f = fixture(vec![], vec![]);

        let stats = f.service.cache_stats();

        assert_eq!(stats.len(), 2);
        assert!(stats.iter().all(|s| s.entries == 0));
    }
}
