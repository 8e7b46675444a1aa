use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::alerts::services::{AlertService, DecisionCache};
use crate::features::favorites::dtos::{CreateFavoriteCityDto, FavoriteCityResponseDto};
use crate::features::favorites::models::{FavoriteCity, NewFavoriteCity};
use crate::features::favorites::repositories::FavoriteCityRepository;
use crate::features::pollution::clients::AirQualityProvider;
use crate::features::users::repositories::UserRepository;

pub struct FavoriteCityService {
    cities: Arc<dyn FavoriteCityRepository>,
    users: Arc<dyn UserRepository>,
    provider: Arc<dyn AirQualityProvider>,
    alerts: Arc<AlertService>,
    decisions: DecisionCache,
}

impl FavoriteCityService {
    pub fn new(
        cities: Arc<dyn FavoriteCityRepository>,
        users: Arc<dyn UserRepository>,
        provider: Arc<dyn AirQualityProvider>,
        alerts: Arc<AlertService>,
        decisions: DecisionCache,
    ) -> Self {
        Self {
            cities,
            users,
            provider,
            alerts,
            decisions,
        }
    }

    /// Saves the location with its current AQI and runs the alert decision once.
    ///
    /// A failed AQI lookup still saves the location, without a reading.
    pub async fn add(
        &self,
        user_id: Uuid,
        dto: CreateFavoriteCityDto,
    ) -> Result<FavoriteCityResponseDto> {
        if self
            .cities
            .exists_by_user_and_coordinates(user_id, dto.latitude, dto.longitude)
            .await?
        {
            return Err(AppError::Conflict(
                "Cette ville est déjà dans vos favoris".to_string(),
            ));
        }

        let current_aqi = match self.provider.current(dto.latitude, dto.longitude).await {
            Ok(response) => response.current_aqi(),
            Err(e) => {
                tracing::warn!(
                    "Initial AQI lookup failed for {} ({}, {}): {}",
                    dto.city_name,
                    dto.latitude,
                    dto.longitude,
                    e
                );
                None
            }
        };

        let city = self
            .cities
            .create(NewFavoriteCity {
                user_id,
                city_name: dto.city_name,
                latitude: dto.latitude,
                longitude: dto.longitude,
                current_aqi,
            })
            .await?;

        tracing::info!(
            "Favorite city added: id={}, user={}, name={}",
            city.id,
            user_id,
            city.city_name
        );

        if let Some(aqi) = current_aqi {
            self.check_new_city(&city, aqi).await;
        }

        Ok(city.into())
    }

    async fn check_new_city(&self, city: &FavoriteCity, aqi: i32) {
        let user = match self.users.find_by_id(city.user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return,
            Err(e) => {
                tracing::error!("Failed to load owner of city {}: {}", city.id, e);
                return;
            }
        };

        if let Err(e) = self.alerts.process_alert(&user, city, aqi).await {
            tracing::error!("Alert check failed for new city {}: {}", city.id, e);
        }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<FavoriteCityResponseDto>> {
        let cities = self.cities.list_by_user(user_id).await?;
        Ok(cities.into_iter().map(Into::into).collect())
    }

    /// Only the owner can remove a location
    pub async fn remove(&self, user_id: Uuid, city_id: Uuid) -> Result<()> {
        if !self.cities.delete_by_id_and_user(city_id, user_id).await? {
            return Err(AppError::NotFound("Ville favorite non trouvée".to_string()));
        }

        self.decisions.evict_city(user_id, city_id);
        tracing::info!("Favorite city removed: id={}, user={}", city_id, user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::mailer::EmailTemplates;
    use crate::shared::test_helpers::{
        fake_city, fake_user, InMemoryAlertHistoryRepository, InMemoryFavoriteCityRepository,
        InMemoryUserRepository, RecordingMailer, RecordingPublisher, StaticAirQualityProvider,
    };
    use std::time::Duration;

    struct Fixture {
        service: FavoriteCityService,
        cities: Arc<InMemoryFavoriteCityRepository>,
        history: Arc<InMemoryAlertHistoryRepository>,
        decisions: DecisionCache,
    }

    fn fixture(
        users: Vec<crate::features::users::models::User>,
        cities: Vec<FavoriteCity>,
        provider: StaticAirQualityProvider,
    ) -> Fixture {
        let cities = Arc::new(InMemoryFavoriteCityRepository::with_cities(cities));
        let history = Arc::new(InMemoryAlertHistoryRepository::default());
        let decisions = DecisionCache::new(Duration::from_secs(60));
        let alerts = Arc::new(AlertService::new(
            history.clone(),
            Arc::new(RecordingPublisher::default()),
            Arc::new(RecordingMailer::default()),
            Arc::new(EmailTemplates::new().unwrap()),
            decisions.clone(),
        ));
        let service = FavoriteCityService::new(
            cities.clone(),
            Arc::new(InMemoryUserRepository::with_users(users)),
            Arc::new(provider),
            alerts,
            decisions.clone(),
        );
        Fixture {
            service,
            cities,
            history,
            decisions,
        }
    }

    fn dto(name: &str, latitude: f64, longitude: f64) -> CreateFavoriteCityDto {
        CreateFavoriteCityDto {
            city_name: name.to_string(),
            latitude,
            longitude,
        }
    }

    #[tokio::test]
    async fn test_add_records_aqi_and_alerts() {
        let user = fake_user();
        let provider = StaticAirQualityProvider::default().with_aqi(48.85, 2.35, 4);
        let f = fixture(vec![user.clone()], vec![], provider);

        let city = f.service.add(user.id, dto("Paris", 48.85, 2.35)).await.unwrap();

        assert_eq!(city.current_aqi, Some(4));
        assert_eq!(f.history.all().len(), 1);
    }

    #[tokio::test]
    async fn test_add_survives_provider_failure() {
        let user = fake_user();
        let f = fixture(vec![user.clone()], vec![], StaticAirQualityProvider::default());

        let city = f.service.add(user.id, dto("Paris", 48.85, 2.35)).await.unwrap();

        assert_eq!(city.current_aqi, None);
        assert_eq!(f.cities.all().len(), 1);
        assert!(f.history.all().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_coordinates_rejected() {
        let user = fake_user();
        let mut existing = fake_city(user.id);
        existing.latitude = 48.85;
        existing.longitude = 2.35;
        let f = fixture(
            vec![user.clone()],
            vec![existing],
            StaticAirQualityProvider::default(),
        );

        let result = f.service.add(user.id, dto("Paris bis", 48.85, 2.35)).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(f.cities.all().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_city_of_another_user_deletes_nothing() {
        let owner = fake_user();
        let intruder = fake_user();
        let city = fake_city(owner.id);
        let f = fixture(
            vec![owner.clone(), intruder.clone()],
            vec![city.clone()],
            StaticAirQualityProvider::default(),
        );

        let result = f.service.remove(intruder.id, city.id).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(f.cities.all().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_evicts_cached_decision() {
        let owner = fake_user();
        let city = fake_city(owner.id);
        let f = fixture(
            vec![owner.clone()],
            vec![city.clone()],
            StaticAirQualityProvider::default(),
        );
        f.decisions.record(owner.id, city.id, 3, true);

        f.service.remove(owner.id, city.id).await.unwrap();

        assert!(f.cities.all().is_empty());
        assert_eq!(f.decisions.get(owner.id, city.id, 3), None);
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_user() {
        let alice = fake_user();
        let bob = fake_user();
        let f = fixture(
            vec![alice.clone(), bob.clone()],
            vec![fake_city(alice.id), fake_city(alice.id), fake_city(bob.id)],
            StaticAirQualityProvider::default(),
        );

        assert_eq!(f.service.list(alice.id).await.unwrap().len(), 2);
        assert_eq!(f.service.list(bob.id).await.unwrap().len(), 1);
    }
}
