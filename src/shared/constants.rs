/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// VERIFICATION
// =============================================================================

/// Lifetime of an emailed verification code
pub const VERIFICATION_CODE_TTL_MINUTES: i64 = 15;

/// Wrong codes accepted before the account is locked until a resend
pub const MAX_VERIFICATION_ATTEMPTS: i32 = 3;

/// Number of digits in a verification code
pub const VERIFICATION_CODE_LEN: usize = 6;

// =============================================================================
// PREFERENCES
// =============================================================================

/// Threshold applied when registration carries no preferences ("Malsain")
pub const DEFAULT_AQI_THRESHOLD: i16 = 3;
