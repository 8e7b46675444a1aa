use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::alerts::services::DecisionCache;
use crate::features::users::dtos::{NotificationPreferencesDto, UserDetailsResponseDto};
use crate::features::users::repositories::UserRepository;

pub struct UserService {
    users: Arc<dyn UserRepository>,
    decisions: DecisionCache,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, decisions: DecisionCache) -> Self {
        Self { users, decisions }
    }

    pub async fn get_details(&self, user_id: Uuid) -> Result<UserDetailsResponseDto> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Utilisateur non trouvé".to_string()))?;
        Ok(user.into())
    }

    /// Replaces the preferences and forgets cached alert decisions for the user
    pub async fn update_preferences(
        &self,
        user_id: Uuid,
        dto: NotificationPreferencesDto,
    ) -> Result<UserDetailsResponseDto> {
        let user = self
            .users
            .update_preferences(user_id, dto.into())
            .await?
            .ok_or_else(|| AppError::NotFound("Utilisateur non trouvé".to_string()))?;

        let evicted = self.decisions.evict_user(user_id);
        tracing::info!(
            "Preferences updated for user {} (threshold={}, evicted {} cached decisions)",
            user_id,
            user.aqi_threshold,
            evicted
        );

        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{fake_user, InMemoryUserRepository};
    use std::time::Duration;

    #[tokio::test]
    async fn test_update_preferences_evicts_decisions() {
        let user = fake_user();
        let users = Arc::new(InMemoryUserRepository::with_users(vec![user.clone()]));
        let decisions = DecisionCache::new(Duration::from_secs(60));
        let city_id = Uuid::now_v7();
        decisions.record(user.id, city_id, 3, true);
        let service = UserService::new(users.clone(), decisions.clone());

        let details = service
            .update_preferences(
                user.id,
                NotificationPreferencesDto {
                    aqi_threshold: 5,
                    email_notifications_enabled: true,
                    app_notifications_enabled: false,
                },
            )
            .await
            .unwrap();

        assert_eq!(details.preferences.aqi_threshold, 5);
        assert_eq!(users.get(user.id).unwrap().aqi_threshold, 5);
        assert_eq!(decisions.get(user.id, city_id, 3), None);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let service = UserService::new(
            Arc::new(InMemoryUserRepository::default()),
            DecisionCache::new(Duration::from_secs(60)),
        );
        let result = service.get_details(Uuid::now_v7()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
