use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::database::is_unique_violation;
use crate::core::error::{AppError, Result};
use crate::features::favorites::models::{FavoriteCity, NewFavoriteCity};

const CITY_COLUMNS: &str =
    "id, user_id, city_name, latitude, longitude, current_aqi, last_checked, created_at";

#[async_trait]
pub trait FavoriteCityRepository: Send + Sync {
    /// Every favorite of every user, oldest first
    async fn list_all(&self) -> Result<Vec<FavoriteCity>>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<FavoriteCity>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FavoriteCity>>;

    async fn exists_by_user_and_coordinates(
        &self,
        user_id: Uuid,
        latitude: f64,
        longitude: f64,
    ) -> Result<bool>;

    /// Same coordinates twice for one user is a `Conflict`
    async fn create(&self, city: NewFavoriteCity) -> Result<FavoriteCity>;

    async fn update_aqi(&self, id: Uuid, aqi: i32, checked_at: DateTime<Utc>) -> Result<()>;

    /// Deletes only when `user_id` owns the row; returns `true` if a row was removed
    async fn delete_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> Result<bool>;
}

pub struct PgFavoriteCityRepository {
    pool: PgPool,
}

impl PgFavoriteCityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteCityRepository for PgFavoriteCityRepository {
    async fn list_all(&self) -> Result<Vec<FavoriteCity>> {
        let sql = format!(
            "SELECT {} FROM favorite_cities ORDER BY created_at, id",
            CITY_COLUMNS
        );
        let cities = sqlx::query_as::<_, FavoriteCity>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(cities)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<FavoriteCity>> {
        let sql = format!(
            "SELECT {} FROM favorite_cities WHERE user_id = $1 ORDER BY created_at, id",
            CITY_COLUMNS
        );
        let cities = sqlx::query_as::<_, FavoriteCity>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(cities)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FavoriteCity>> {
        let sql = format!("SELECT {} FROM favorite_cities WHERE id = $1", CITY_COLUMNS);
        let city = sqlx::query_as::<_, FavoriteCity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(city)
    }

    async fn exists_by_user_and_coordinates(
        &self,
        user_id: Uuid,
        latitude: f64,
        longitude: f64,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM favorite_cities
                WHERE user_id = $1 AND latitude = $2 AND longitude = $3
            )
            "#,
        )
        .bind(user_id)
        .bind(latitude)
        .bind(longitude)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn create(&self, city: NewFavoriteCity) -> Result<FavoriteCity> {
        let sql = format!(
            r#"
            INSERT INTO favorite_cities (id, user_id, city_name, latitude, longitude, current_aqi, last_checked)
            VALUES ($1, $2, $3, $4, $5, $6, CASE WHEN $6::INTEGER IS NULL THEN NULL ELSE NOW() END)
            RETURNING {}
            "#,
            CITY_COLUMNS
        );

        sqlx::query_as::<_, FavoriteCity>(&sql)
            .bind(Uuid::now_v7())
            .bind(city.user_id)
            .bind(&city.city_name)
            .bind(city.latitude)
            .bind(city.longitude)
            .bind(city.current_aqi)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict("Cette ville est déjà dans vos favoris".to_string())
                } else {
                    tracing::error!("Failed to create favorite city: {:?}", e);
                    AppError::Database(e)
                }
            })
    }

    async fn update_aqi(&self, id: Uuid, aqi: i32, checked_at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE favorite_cities SET current_aqi = $2, last_checked = $3 WHERE id = $1")
            .bind(id)
            .bind(aqi)
            .bind(checked_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_by_id_and_user(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM favorite_cities WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
