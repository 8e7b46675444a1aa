use chrono::Utc;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    LoginRequestDto, LoginResponseDto, RegisterRequestDto, RegisterResponseDto,
};
use crate::features::auth::password::{hash_password, verify_password};
use crate::features::auth::services::TokenService;
use crate::features::auth::verification;
use crate::features::users::models::{NewUser, NotificationPreferences, User};
use crate::features::users::repositories::UserRepository;
use crate::modules::mailer::{EmailTemplates, Mailer};
use crate::shared::constants::VERIFICATION_CODE_TTL_MINUTES;

/// Registration, login and email verification
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    mailer: Arc<dyn Mailer>,
    templates: Arc<EmailTemplates>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        mailer: Arc<dyn Mailer>,
        templates: Arc<EmailTemplates>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            mailer,
            templates,
            tokens,
        }
    }

    /// Creates an unverified account and emails its first code.
    ///
    /// The account is removed again if the email cannot be sent.
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<RegisterResponseDto> {
        if self.users.find_by_username(&dto.username).await?.is_some() {
            return Err(AppError::Conflict(
                "Nom d'utilisateur déjà utilisé".to_string(),
            ));
        }
        if self.users.find_by_email(&dto.email).await?.is_some() {
            return Err(AppError::Conflict("Email déjà utilisé".to_string()));
        }

        let preferences = dto
            .preferences
            .map(NotificationPreferences::from)
            .unwrap_or_default();
        let code = verification::generate_code();

        let user = self
            .users
            .create(NewUser {
                username: dto.username,
                email: dto.email,
                password_hash: hash_password(&dto.password)?,
                preferences,
                verification_code: code.clone(),
                verification_code_expiry: verification::code_expiry(Utc::now()),
            })
            .await?;

        if let Err(e) = self.send_verification_email(&user, &code).await {
            tracing::error!(
                "Verification email to {} failed, removing user {}: {}",
                user.email,
                user.id,
                e
            );
            self.users.delete(user.id).await?;
            return Err(AppError::ExternalServiceError(
                "Impossible d'envoyer l'email de vérification".to_string(),
            ));
        }

        tracing::info!("User registered: id={}, username={}", user.id, user.username);
        Ok(RegisterResponseDto { user_id: user.id })
    }

    pub async fn login(&self, dto: LoginRequestDto) -> Result<LoginResponseDto> {
        let user = self
            .users
            .find_by_username(&dto.username)
            .await?
            .filter(|user| verify_password(&dto.password, &user.password_hash))
            .ok_or_else(|| AppError::Auth("Identifiants invalides".to_string()))?;

        if !user.verified {
            return Err(AppError::Forbidden(
                "Compte non vérifié. Veuillez vérifier votre email".to_string(),
            ));
        }

        let token = self.tokens.issue(&user)?;
        tracing::info!("User logged in: id={}", user.id);

        Ok(LoginResponseDto {
            access_token: token.access_token,
            token_type: "Bearer".to_string(),
            expires_in: token.expires_in,
            user_id: user.id,
        })
    }

    pub async fn verify(&self, email: &str, code: &str) -> Result<()> {
        let user = self.find_by_email(email).await?;

        let original = user.verification_state();
        let mut state = original.clone();
        let outcome = verification::apply_code(&mut state, code, Utc::now());

        if state != original {
            self.users.update_verification(user.id, &state).await?;
        }

        match outcome {
            Ok(()) => {
                tracing::info!("User verified: id={}", user.id);
                Ok(())
            }
            Err(e) => {
                tracing::info!("Verification refused for user {}: {}", user.id, e);
                Err(e.into())
            }
        }
    }

    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        let user = self.find_by_email(email).await?;

        let mut state = user.verification_state();
        let code = verification::reissue_code(&mut state, Utc::now())?;
        self.users.update_verification(user.id, &state).await?;

        self.send_verification_email(&user, &code).await?;
        tracing::info!("Verification code reissued for user {}", user.id);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<User> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("Utilisateur non trouvé".to_string()))
    }

    async fn send_verification_email(&self, user: &User, code: &str) -> Result<()> {
        let email = self.templates.verification(
            &user.email,
            &user.username,
            code,
            VERIFICATION_CODE_TTL_MINUTES,
        )?;
        self.mailer.send(email).await?;
        Ok(())
    }
}
