use super::model::{AuthenticatedUser, Claims};
use crate::core::error::AppError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use uuid::Uuid;

pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn new(secret: &str, issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let claims = token_data.claims;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Auth("Invalid subject claim".to_string()))?;

        Ok(AuthenticatedUser {
            user_id,
            username: claims.username,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token(secret: &str, issuer: &str, exp_offset: i64) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::now_v7().to_string(),
            username: "marie".to_string(),
            role: UserRole::Admin,
            iss: issuer.to_string(),
            iat: now as u64,
            exp: (now + exp_offset) as u64,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token() {
        let validator = JwtValidator::new(SECRET, "pollualert");
        let user = validator
            .validate_token(&token(SECRET, "pollualert", 3600))
            .unwrap();
        assert_eq!(user.username, "marie");
        assert!(user.is_admin());
    }

    #[test]
    fn test_rejects_expired_token() {
        let validator = JwtValidator::new(SECRET, "pollualert");
        let result = validator.validate_token(&token(SECRET, "pollualert", -3600));
        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[test]
    fn test_rejects_wrong_secret_and_issuer() {
        let validator = JwtValidator::new(SECRET, "pollualert");
        assert!(validator
            .validate_token(&token("other-secret", "pollualert", 3600))
            .is_err());
        assert!(validator
            .validate_token(&token(SECRET, "someone-else", 3600))
            .is_err());
        assert!(validator.validate_token("not-a-jwt").is_err());
    }
}
