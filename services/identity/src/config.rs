use crate::cookie::CookiePolicy;
use crate::domain::types::{SESSION_TTL_DEVELOPMENT_SECS, SESSION_TTL_PRODUCTION_SECS};
use crate::rate_limit::RateLimitPolicy;

/// Deployment profile, resolved once at startup. Everything
/// profile-dependent (session backend, cookie attributes, limiter
/// enablement defaults) is derived here; request handling never branches
/// on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Production,
    Development,
}

impl Profile {
    fn parse(value: &str) -> Self {
        match value {
            "production" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn session_ttl_secs(self) -> i64 {
        match self {
            Self::Production => SESSION_TTL_PRODUCTION_SECS,
            Self::Development => SESSION_TTL_DEVELOPMENT_SECS,
        }
    }

    pub fn cookie_policy(self) -> CookiePolicy {
        CookiePolicy {
            secure: self == Self::Production,
            max_age_secs: self.session_ttl_secs(),
        }
    }
}

/// Identity service configuration loaded from environment variables.
#[derive(Debug)]
pub struct IdentityConfig {
    /// Deployment profile. Env var: `PROFILE` (default `development`).
    pub profile: Profile,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL; required in the production profile.
    pub redis_url: Option<String>,
    /// Base URL of the mail relay that delivers one-time codes.
    pub mailer_url: String,
    /// TCP port to listen on (default 3110). Env var: `IDENTITY_PORT`.
    pub identity_port: u16,
    /// Comma-separated staff account names mapped to the staff mail domain.
    pub staff_accounts: Vec<String>,
    /// Rate limiter thresholds and per-endpoint flags.
    pub rate_limit: RateLimitPolicy,
}

impl IdentityConfig {
    pub fn from_env() -> Self {
        let profile = Profile::parse(
            &std::env::var("PROFILE").unwrap_or_else(|_| "development".to_owned()),
        );
        let redis_url = std::env::var("REDIS_URL").ok();
        if profile == Profile::Production && redis_url.is_none() {
            panic!("REDIS_URL is required in the production profile");
        }
        Self {
            profile,
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            redis_url,
            mailer_url: std::env::var("MAILER_URL").expect("MAILER_URL"),
            identity_port: std::env::var("IDENTITY_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3110),
            staff_accounts: std::env::var("STAFF_ACCOUNTS")
                .map(|v| v.split(',').map(str::to_owned).collect())
                .unwrap_or_default(),
            rate_limit: RateLimitPolicy {
                max_wrong_per_minute: env_u64("MAX_WRONG_PER_MINUTE", 5),
                max_wrong_per_day: env_u64("MAX_WRONG_PER_DAY", 100),
                // Only login is guarded by default, and only in production —
                // the verification/reset guards ship disabled.
                login_enabled: env_flag("RATE_LIMIT_LOGIN", profile == Profile::Production),
                verification_enabled: env_flag("RATE_LIMIT_VERIFY", false),
                recovery_enabled: env_flag("RATE_LIMIT_RESET", false),
            },
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
