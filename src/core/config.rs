use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub swagger: SwaggerConfig,
    pub openweather: OpenWeatherConfig,
    pub smtp: SmtpConfig,
    pub alerts: AlertConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Settings for locally issued HS256 access tokens
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_expiry: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// OpenWeatherMap Air Pollution API settings
#[derive(Debug, Clone)]
pub struct OpenWeatherConfig {
    pub api_key: String,
    /// Base URL up to and including `/data/2.5`
    pub base_url: String,
    pub timeout: Duration,
    /// TTL of cached responses served by the pollution query endpoints
    pub cache_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub starttls: bool,
}

/// Polling loop and alert decision settings
#[derive(Debug, Clone)]
pub struct AlertConfig {
    pub poll_enabled: bool,
    pub poll_interval: Duration,
    pub decision_cache_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            openweather: OpenWeatherConfig::from_env()?,
            smtp: SmtpConfig::from_env()?,
            alerts: AlertConfig::from_env()?,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid value", key)),
        Err(_) => Ok(default),
    }
}

fn parse_bool_env(key: &str, default: bool) -> Result<bool, String> {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(format!("{} must be a boolean", key)),
        },
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        Ok(Self {
            url,
            max_connections: parse_env("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_env("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_env(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_env("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: parse_env("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        })
    }
}

impl AuthConfig {
    const DEFAULT_JWT_EXPIRY_SECS: u64 = 86400; // 24 hours

    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| "JWT_SECRET environment variable is required".to_string())?;

        let jwt_issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "pollualert".to_string());
        let jwt_expiry_secs = parse_env("JWT_EXPIRY_SECS", Self::DEFAULT_JWT_EXPIRY_SECS)?;

        Ok(Self {
            jwt_secret,
            jwt_issuer,
            jwt_expiry: Duration::from_secs(jwt_expiry_secs),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "PolluAlert API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for PolluAlert".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl OpenWeatherConfig {
    const DEFAULT_BASE_URL: &'static str = "https://api.openweathermap.org/data/2.5";
    const DEFAULT_TIMEOUT_SECS: u64 = 10;
    const DEFAULT_CACHE_TTL_SECS: u64 = 600; // 10 minutes

    pub fn from_env() -> Result<Self, String> {
        let api_key = env::var("OPENWEATHER_API_KEY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "OPENWEATHER_API_KEY environment variable is required".to_string())?;

        let base_url = env::var("OPENWEATHER_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = parse_env("OPENWEATHER_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS)?;
        let cache_ttl_secs = parse_env("POLLUTION_CACHE_TTL_SECS", Self::DEFAULT_CACHE_TTL_SECS)?;

        Ok(Self {
            api_key,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }
}

impl SmtpConfig {
    const DEFAULT_PORT: u16 = 587;

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port = parse_env("SMTP_PORT", Self::DEFAULT_PORT)?;
        if port == 0 {
            return Err("SMTP_PORT must be > 0".to_string());
        }

        let username = env::var("SMTP_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SMTP_PASSWORD").ok().filter(|s| !s.is_empty());
        let from = env::var("SMTP_FROM")
            .unwrap_or_else(|_| "PolluAlert <no-reply@pollualert.local>".to_string());
        let starttls = parse_bool_env("SMTP_STARTTLS", true)?;

        Ok(Self {
            host,
            port,
            username,
            password,
            from,
            starttls,
        })
    }
}

impl AlertConfig {
    const DEFAULT_POLL_INTERVAL_SECS: u64 = 3600; // 1 hour
    const DEFAULT_DECISION_CACHE_TTL_SECS: u64 = 3600;

    pub fn from_env() -> Result<Self, String> {
        let poll_enabled = parse_bool_env("POLL_ENABLED", true)?;
        let poll_interval_secs = parse_env("POLL_INTERVAL_SECS", Self::DEFAULT_POLL_INTERVAL_SECS)?;
        if poll_interval_secs == 0 {
            return Err("POLL_INTERVAL_SECS must be > 0".to_string());
        }
        let decision_cache_ttl_secs = parse_env(
            "ALERT_DECISION_CACHE_TTL_SECS",
            Self::DEFAULT_DECISION_CACHE_TTL_SECS,
        )?;

        Ok(Self {
            poll_enabled,
            poll_interval: Duration::from_secs(poll_interval_secs),
            decision_cache_ttl: Duration::from_secs(decision_cache_ttl_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u64 = parse_env("POLLUALERT_TEST_UNSET_NUMBER", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        env::set_var("POLLUALERT_TEST_BAD_NUMBER", "forty-two");
        let result: Result<u64, String> = parse_env("POLLUALERT_TEST_BAD_NUMBER", 1);
        assert!(result.is_err());
        env::remove_var("POLLUALERT_TEST_BAD_NUMBER");
    }

    #[test]
    fn test_parse_bool_env_accepts_common_spellings() {
        env::set_var("POLLUALERT_TEST_BOOL_OFF", "Off");
        env::set_var("POLLUALERT_TEST_BOOL_ON", "1");
        assert!(!parse_bool_env("POLLUALERT_TEST_BOOL_OFF", true).unwrap());
        assert!(parse_bool_env("POLLUALERT_TEST_BOOL_ON", false).unwrap());
        assert!(parse_bool_env("POLLUALERT_TEST_BOOL_UNSET", true).unwrap());
        env::remove_var("POLLUALERT_TEST_BOOL_OFF");
        env::remove_var("POLLUALERT_TEST_BOOL_ON");
    }

    #[test]
    fn test_swagger_credentials_require_both_parts() {
        let mut swagger = SwaggerConfig {
            username: Some("admin".to_string()),
            password: None,
            title: "t".to_string(),
            version: "v".to_string(),
            description: "d".to_string(),
        };
        assert_eq!(swagger.credentials(), None);

        swagger.password = Some("secret".to_string());
        assert_eq!(swagger.credentials(), Some("admin:secret".to_string()));
    }
}
