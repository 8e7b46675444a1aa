//! Email verification codes.
//!
//! Rules are applied to a [`VerificationState`] in memory; callers persist the
//! state whenever it changes.

use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use thiserror::Error;

use crate::core::error::AppError;
use crate::features::users::models::VerificationState;
use crate::shared::constants::{
    MAX_VERIFICATION_ATTEMPTS, VERIFICATION_CODE_LEN, VERIFICATION_CODE_TTL_MINUTES,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Compte déjà vérifié")]
    AlreadyVerified,

    #[error("Trop de tentatives. Veuillez demander un nouveau code")]
    TooManyAttempts,

    #[error("Code expiré. Veuillez demander un nouveau code")]
    CodeExpired,

    #[error("Code incorrect")]
    IncorrectCode,
}

impl From<VerificationError> for AppError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::AlreadyVerified => AppError::Conflict(err.to_string()),
            VerificationError::TooManyAttempts
            | VerificationError::CodeExpired
            | VerificationError::IncorrectCode => AppError::BadRequest(err.to_string()),
        }
    }
}

/// Zero-padded numeric code
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..VERIFICATION_CODE_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

pub fn code_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::minutes(VERIFICATION_CODE_TTL_MINUTES)
}

/// Checks `code` against the state.
///
/// A wrong code bumps the attempt counter; a correct one marks the account
/// verified and clears the code.
pub fn apply_code(
    state: &mut VerificationState,
    code: &str,
    now: DateTime<Utc>,
) -> Result<(), VerificationError> {
    if state.verified {
        return Err(VerificationError::AlreadyVerified);
    }
    if state.attempts >= MAX_VERIFICATION_ATTEMPTS {
        return Err(VerificationError::TooManyAttempts);
    }

    let expected = match (&state.code, state.expiry) {
        (Some(expected), Some(expiry)) if expiry > now => expected,
        _ => return Err(VerificationError::CodeExpired),
    };

    if expected != code.trim() {
        state.attempts += 1;
        return Err(VerificationError::IncorrectCode);
    }

    state.verified = true;
    state.code = None;
    state.expiry = None;
    state.attempts = 0;
    Ok(())
}

/// Replaces the pending code and resets the attempt counter
pub fn reissue_code(
    state: &mut VerificationState,
    now: DateTime<Utc>,
) -> Result<String, VerificationError> {
    if state.verified {
        return Err(VerificationError::AlreadyVerified);
    }

    let code = generate_code();
    state.code = Some(code.clone());
    state.expiry = Some(code_expiry(now));
    state.attempts = 0;
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(code: &str, now: DateTime<Utc>) -> VerificationState {
        VerificationState {
            verified: false,
            code: Some(code.to_string()),
            expiry: Some(code_expiry(now)),
            attempts: 0,
        }
    }

    #[test]
    fn test_generate_code_is_six_digits() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_correct_code_verifies() {
        let now = Utc::now();
        let mut state = pending("123456", now);

        assert_eq!(apply_code(&mut state, "123456", now), Ok(()));
        assert!(state.verified);
        assert_eq!(state.code, None);
        assert_eq!(state.expiry, None);
        assert_eq!(state.attempts, 0);
    }

    #[test]
    fn test_third_wrong_code_locks_until_reissue() {
        let now = Utc::now();
        let mut state = pending("123456", now);

        for attempt in 1..=3 {
            assert_eq!(
                apply_code(&mut state, "000000", now),
                Err(VerificationError::IncorrectCode)
            );
            assert_eq!(state.attempts, attempt);
        }

        // Even the right code is refused now
        assert_eq!(
            apply_code(&mut state, "123456", now),
            Err(VerificationError::TooManyAttempts)
        );
        assert!(!state.verified);

        let code = reissue_code(&mut state, now).unwrap();
        assert_eq!(state.attempts, 0);
        assert_eq!(state.expiry, Some(code_expiry(now)));
        assert_eq!(apply_code(&mut state, &code, now), Ok(()));
    }

    #[test]
    fn test_expired_code() {
        let issued = Utc::now();
        let mut state = pending("123456", issued);
        let later = issued + Duration::minutes(VERIFICATION_CODE_TTL_MINUTES + 1);

        assert_eq!(
            apply_code(&mut state, "123456", later),
            Err(VerificationError::CodeExpired)
        );
        assert_eq!(state.attempts, 0);
    }

    #[test]
    fn test_missing_code_counts_as_expired() {
        let mut state = VerificationState {
            verified: false,
            code: None,
            expiry: None,
            attempts: 0,
        };
        assert_eq!(
            apply_code(&mut state, "123456", Utc::now()),
            Err(VerificationError::CodeExpired)
        );
    }

    #[test]
    fn test_already_verified_checked_first() {
        let now = Utc::now();
        let mut state = pending("123456", now);
        state.verified = true;
        state.attempts = 5;

        assert_eq!(
            apply_code(&mut state, "123456", now),
            Err(VerificationError::AlreadyVerified)
        );
        assert_eq!(
            reissue_code(&mut state, now),
            Err(VerificationError::AlreadyVerified)
        );
    }

    #[test]
    fn test_error_messages() {
        let err: AppError = VerificationError::IncorrectCode.into();
        assert_eq!(err.to_string(), "Bad request: Code incorrect");
    }
}
