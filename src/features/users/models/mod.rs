mod user;

pub use user::{NewUser, NotificationPreferences, User, UserRole, VerificationState};
