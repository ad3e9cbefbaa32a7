/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | HTTP_PORT | 3000 | HTTP API port |
/// | DATABASE_URL | sqlite://./data/bookings.db | SQLite database |
/// | PROVIDER_API_URL | https://eu-central-1.hapio.net/v1 | scheduling provider base URL |
/// | PROVIDER_API_TOKEN | (unset) | provider bearer token |
/// | PROVIDER_TIMEOUT_SECS | 30 | timeout for provider query/mutating calls |
/// | PROVIDER_HEALTH_TIMEOUT_SECS | 10 | timeout for the provider health probe |
/// | BOOKING_WINDOW_DAYS | 90 | how far ahead availability is computed |
/// | PENDING_TTL_MINUTES | 30 | age after which pending bookings are auto-cancelled |
/// | ENVIRONMENT | development | development \| staging \| production |
///
/// An unset `PROVIDER_API_TOKEN` does not prevent startup; provider-backed
/// operations then fail with a configuration error, distinct from network
/// failures.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// SQLite database URL
    pub database_url: String,
    /// Scheduling provider base URL
    pub provider_api_url: String,
    /// Scheduling provider bearer token
    pub provider_api_token: Option<String>,
    /// Timeout for provider query/mutating calls (seconds)
    pub provider_timeout_secs: u64,
    /// Timeout for the provider health probe (seconds)
    pub provider_health_timeout_secs: u64,
    /// Availability look-ahead window (days)
    pub booking_window_days: u32,
    /// Stale pending bookings older than this are auto-cancelled (minutes)
    pub pending_ttl_minutes: u64,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://./data/bookings.db".into()),
            provider_api_url: std::env::var("PROVIDER_API_URL")
                .unwrap_or_else(|_| "https://eu-central-1.hapio.net/v1".into()),
            provider_api_token: std::env::var("PROVIDER_API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            provider_timeout_secs: std::env::var("PROVIDER_TIMEOUT_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
            provider_health_timeout_secs: std::env::var("PROVIDER_HEALTH_TIMEOUT_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10),
            booking_window_days: std::env::var("BOOKING_WINDOW_DAYS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(90),
            pending_ttl_minutes: std::env::var("PENDING_TTL_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the fields tests commonly need to pin down.
    pub fn with_overrides(database_url: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.database_url = database_url.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
