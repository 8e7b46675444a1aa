use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::database::is_unique_violation;
use crate::core::error::{AppError, Result};
use crate::features::users::models::{
    NewUser, NotificationPreferences, User, UserRole, VerificationState,
};

const USER_COLUMNS: &str = r#"
    id, username, email, password_hash, role, aqi_threshold,
    email_notifications_enabled, app_notifications_enabled,
    verified, verification_code, verification_code_expiry, verification_attempts,
    created_at, updated_at
"#;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Case-insensitive lookup
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Inserts an unverified user; a taken username or email is a `Conflict`
    async fn create(&self, user: NewUser) -> Result<User>;

    /// Returns `true` if a row was removed
    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn update_preferences(
        &self,
        id: Uuid,
        preferences: NotificationPreferences,
    ) -> Result<Option<User>>;

    async fn update_verification(&self, id: Uuid, state: &VerificationState) -> Result<()>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User> {
        let sql = format!(
            r#"
            INSERT INTO users (
                id, username, email, password_hash, role, aqi_threshold,
                email_notifications_enabled, app_notifications_enabled,
                verified, verification_code, verification_code_expiry, verification_attempts
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, $9, $10, 0)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let created = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::now_v7())
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(UserRole::User)
            .bind(user.preferences.aqi_threshold)
            .bind(user.preferences.email_notifications_enabled)
            .bind(user.preferences.app_notifications_enabled)
            .bind(&user.verification_code)
            .bind(user.verification_code_expiry)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict("Nom d'utilisateur ou email déjà utilisé".to_string())
                } else {
                    tracing::error!("Failed to create user: {:?}", e);
                    AppError::Database(e)
                }
            })?;

        Ok(created)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_preferences(
        &self,
        id: Uuid,
        preferences: NotificationPreferences,
    ) -> Result<Option<User>> {
        let sql = format!(
            r#"
            UPDATE users
            SET aqi_threshold = $2,
                email_notifications_enabled = $3,
                app_notifications_enabled = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(preferences.aqi_threshold)
            .bind(preferences.email_notifications_enabled)
            .bind(preferences.app_notifications_enabled)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_verification(&self, id: Uuid, state: &VerificationState) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET verified = $2,
                verification_code = $3,
                verification_code_expiry = $4,
                verification_attempts = $5,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(state.verified)
        .bind(&state.code)
        .bind(state.expiry)
        .bind(state.attempts)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
