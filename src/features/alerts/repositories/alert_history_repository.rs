use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::alerts::models::{AlertHistory, NewAlertHistory};

#[async_trait]
pub trait AlertHistoryRepository: Send + Sync {
    async fn create(&self, alert: NewAlertHistory) -> Result<AlertHistory>;

    /// Newest first
    async fn list_by_user(&self, user_id: Uuid, limit: i64, offset: i64)
        -> Result<Vec<AlertHistory>>;

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64>;
}

pub struct PgAlertHistoryRepository {
    pool: PgPool,
}

impl PgAlertHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertHistoryRepository for PgAlertHistoryRepository {
    async fn create(&self, alert: NewAlertHistory) -> Result<AlertHistory> {
        sqlx::query_as::<_, AlertHistory>(
            r#"
            INSERT INTO alert_history (id, user_id, aqi, latitude, longitude, city_name, priority, message)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, aqi, latitude, longitude, city_name, priority, message, timestamp
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(alert.user_id)
        .bind(alert.aqi)
        .bind(alert.latitude)
        .bind(alert.longitude)
        .bind(&alert.city_name)
        .bind(alert.priority)
        .bind(&alert.message)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save alert history: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AlertHistory>> {
        let alerts = sqlx::query_as::<_, AlertHistory>(
            r#"
            SELECT id, user_id, aqi, latitude, longitude, city_name, priority, message, timestamp
            FROM alert_history
            WHERE user_id = $1
            ORDER BY timestamp DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(alerts)
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM alert_history WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
