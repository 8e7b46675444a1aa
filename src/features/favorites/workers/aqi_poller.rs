use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

use crate::core::error::{AppError, Result};
use crate::features::alerts::services::AlertService;
use crate::features::favorites::models::FavoriteCity;
use crate::features::favorites::repositories::FavoriteCityRepository;
use crate::features::pollution::clients::AirQualityProvider;
use crate::features::users::repositories::UserRepository;

/// Outcome of one pass over every favorite city
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub checked: usize,
    pub alerted: usize,
    pub failed: usize,
}

/// Background worker refreshing the AQI of every favorite city.
///
/// Cities are checked one after another with uncached provider calls.
pub struct AqiPoller {
    cities: Arc<dyn FavoriteCityRepository>,
    users: Arc<dyn UserRepository>,
    provider: Arc<dyn AirQualityProvider>,
    alerts: Arc<AlertService>,
    period: Duration,
}

impl AqiPoller {
    pub fn new(
        cities: Arc<dyn FavoriteCityRepository>,
        users: Arc<dyn UserRepository>,
        provider: Arc<dyn AirQualityProvider>,
        alerts: Arc<AlertService>,
        period: Duration,
    ) -> Self {
        Self {
            cities,
            users,
            provider,
            alerts,
            period,
        }
    }

    /// Run the poller in a background loop
    pub async fn run(&self) {
        tracing::info!(
            "Starting AQI poller (interval: {}s)",
            self.period.as_secs()
        );

        let mut interval = interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            match self.poll_once().await {
                Ok(summary) => tracing::info!(
                    "AQI poll finished: checked={}, alerted={}, failed={}",
                    summary.checked,
                    summary.alerted,
                    summary.failed
                ),
                Err(e) => tracing::error!("AQI poll aborted: {:?}", e),
            }
        }
    }

    /// One pass over all favorites; per-city failures are counted, not returned
    pub async fn poll_once(&self) -> Result<PollSummary> {
        let cities = self.cities.list_all().await?;
        let mut summary = PollSummary::default();

        for city in &cities {
            match self.check_city(city).await {
                Ok(alerted) => {
                    summary.checked += 1;
                    if alerted {
                        summary.alerted += 1;
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!(
                        "Failed to check city {} ({}): {}",
                        city.id,
                        city.city_name,
                        e
                    );
                }
            }
        }

        Ok(summary)
    }

    async fn check_city(&self, city: &FavoriteCity) -> Result<bool> {
        let response = self.provider.current(city.latitude, city.longitude).await?;
        let aqi = response.current_aqi().ok_or_else(|| {
            AppError::ExternalServiceError("Empty pollution response".to_string())
        })?;

        let checked_at = Utc::now();
        self.cities.update_aqi(city.id, aqi, checked_at).await?;

        let user = self
            .users
            .find_by_id(city.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Owner {} not found", city.user_id)))?;

        let mut city = city.clone();
        city.current_aqi = Some(aqi);
        city.last_checked = Some(checked_at);

        let alert = self.alerts.process_alert(&user, &city, aqi).await?;
        Ok(alert.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::alerts::services::DecisionCache;
    use crate::modules::mailer::EmailTemplates;
    use crate::shared::test_helpers::{
        fake_city, fake_user, InMemoryAlertHistoryRepository, InMemoryFavoriteCityRepository,
        InMemoryUserRepository, RecordingMailer, RecordingPublisher, StaticAirQualityProvider,
    };
    use uuid::Uuid;

    fn city_at(user_id: Uuid, latitude: f64, longitude: f64) -> FavoriteCity {
        let mut city = fake_city(user_id);
        city.latitude = latitude;
        city.longitude = longitude;
        city
    }

    #[tokio::test]
    async fn test_poll_isolates_failures() {
        let user = fake_user();
        let orphan_owner = Uuid::now_v7();
        let polluted = city_at(user.id, 1.0, 1.0);
        let clean = city_at(user.id, 2.0, 2.0);
        let unreachable = city_at(user.id, 3.0, 3.0);
        let orphan = city_at(orphan_owner, 4.0, 4.0);

        let cities = Arc::new(InMemoryFavoriteCityRepository::with_cities(vec![
            unreachable.clone(),
            polluted.clone(),
            orphan,
            clean.clone(),
        ]));
        let provider = StaticAirQualityProvider::default()
            .with_aqi(1.0, 1.0, 5)
            .with_aqi(2.0, 2.0, 1)
            .with_aqi(4.0, 4.0, 5);
        let history = Arc::new(InMemoryAlertHistoryRepository::default());
        let alerts = Arc::new(AlertService::new(
            history.clone(),
            Arc::new(RecordingPublisher::default()),
            Arc::new(RecordingMailer::default()),
            Arc::new(EmailTemplates::new().unwrap()),
            DecisionCache::new(Duration::from_secs(60)),
        ));

        let poller = AqiPoller::new(
            cities.clone(),
            Arc::new(InMemoryUserRepository::with_users(vec![user.clone()])),
            Arc::new(provider),
            alerts,
            Duration::from_secs(3600),
        );

        let summary = poller.poll_once().await.unwrap();

        assert_eq!(
            summary,
            PollSummary {
                checked: 2,
                alerted: 1,
                failed: 2,
            }
        );
        assert_eq!(cities.get(polluted.id).unwrap().current_aqi, Some(5));
        assert_eq!(cities.get(clean.id).unwrap().current_aqi, Some(1));
        assert!(cities.get(clean.id).unwrap().last_checked.is_some());
        assert_eq!(cities.get(unreachable.id).unwrap().current_aqi, None);
        let alerts = history.all();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].city_name, polluted.city_name);
    }

    #[tokio::test]
    async fn test_empty_response_counts_as_failure() {
        let user = fake_user();
        let city = city_at(user.id, 7.0, 7.0);
        let provider = StaticAirQualityProvider::default().with_empty(7.0, 7.0);
        let alerts = Arc::new(AlertService::new(
            Arc::new(InMemoryAlertHistoryRepository::default()),
            Arc::new(RecordingPublisher::default()),
            Arc::new(RecordingMailer::default()),
            Arc::new(EmailTemplates::new().unwrap()),
            DecisionCache::new(Duration::from_secs(60)),
        ));
        let poller = AqiPoller::new(
            Arc::new(InMemoryFavoriteCityRepository::with_cities(vec![city])),
            Arc::new(InMemoryUserRepository::with_users(vec![user])),
            Arc::new(provider),
            alerts,
            Duration::from_secs(3600),
        );

        let summary = poller.poll_once().await.unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.checked, 0);
    }
}
