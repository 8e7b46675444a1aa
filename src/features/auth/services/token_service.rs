use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::Claims;
use crate::features::users::models::User;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

pub struct IssuedToken {
    pub access_token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// Signs HS256 access tokens for verified users
pub struct TokenService {
    encoding_key: EncodingKey,
    issuer: String,
    expires_in: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
            expires_in: i64::try_from(config.jwt_expiry.as_secs()).unwrap_or(i64::MAX),
        }
    }

    pub fn issue(&self, user: &User) -> Result<IssuedToken> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            iss: self.issuer.clone(),
            iat: now,
            exp: now.saturating_add(self.expires_in as u64),
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken {
            access_token,
            expires_in: self.expires_in,
        })
    }
}
