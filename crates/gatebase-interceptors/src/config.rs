use crate::errors::InterceptError;
use gatebase_auth::codec::MIN_SECRET_LEN;
use serde::Deserialize;
use std::time::Duration;

/// Environment keys the governance stack is configured from at process
/// start.
pub mod env_keys {
    pub const JWT_SECRET_KEY: &str = "JWT_SECRET_KEY";
    pub const JWT_ACCESS_TOKEN_TTL: &str = "JWT_ACCESS_TOKEN_TTL";
    pub const JWT_REFRESH_TOKEN_TTL: &str = "JWT_REFRESH_TOKEN_TTL";
    pub const JWT_ISSUER: &str = "JWT_ISSUER";
    pub const RATE_LIMIT_CAPACITY: &str = "RATE_LIMIT_CAPACITY";
    pub const RATE_LIMIT_WINDOW: &str = "RATE_LIMIT_WINDOW";
    pub const CSRF_TOKEN_TTL: &str = "CSRF_TOKEN_TTL";
    pub const CSRF_PROTECTED_METHODS: &str = "CSRF_PROTECTED_METHODS";
    pub const CSRF_SINGLE_USE: &str = "CSRF_SINGLE_USE";
}

pub const DEFAULT_ACCESS_TTL_SECS: u64 = 15 * 60;
pub const DEFAULT_REFRESH_TTL_SECS: u64 = 168 * 3600;
pub const DEFAULT_ISSUER: &str = "gate-service";
pub const DEFAULT_RATE_CAPACITY: u32 = 100;
pub const DEFAULT_RATE_WINDOW_SECS: u64 = 15 * 60;
pub const DEFAULT_CSRF_TTL_SECS: u64 = 10 * 60;

#[derive(Clone, Debug, Deserialize)]
pub struct AuthConfig {
    pub secret: String,
    #[serde(default = "default_access_ttl_secs")]
    pub access_ttl_secs: u64,
    #[serde(default = "default_refresh_ttl_secs")]
    pub refresh_ttl_secs: u64,
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

impl AuthConfig {
    pub fn access_ttl(&self) -> Duration {
        Duration::from_secs(self.access_ttl_secs)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_ttl_secs)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_rate_capacity")]
    pub capacity: u32,
    #[serde(default = "default_rate_window_secs")]
    pub window_secs: u64,
    #[serde(default)]
    pub overrides: Vec<MethodLimit>,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct MethodLimit {
    pub method: String,
    pub capacity: u32,
    pub window_secs: u64,
}

impl MethodLimit {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CsrfConfig {
    #[serde(default = "default_csrf_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default)]
    pub single_use: bool,
    #[serde(default)]
    pub protected_methods: Vec<String>,
}

impl CsrfConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct GovernanceConfig {
    pub auth: AuthConfig,
    #[serde(default = "default_rate_config")]
    pub rate: RateLimitConfig,
    #[serde(default = "default_csrf_config")]
    pub csrf: CsrfConfig,
}

impl GovernanceConfig {
    /// Reads the process environment, tolerating malformed numeric values by
    /// falling back to defaults. Only the signing secret is hard-required;
    /// `validate` reports it.
    pub fn from_env() -> Result<Self, InterceptError> {
        let config = Self {
            auth: AuthConfig {
                secret: std::env::var(env_keys::JWT_SECRET_KEY).unwrap_or_default(),
                access_ttl_secs: env_parse(env_keys::JWT_ACCESS_TOKEN_TTL, DEFAULT_ACCESS_TTL_SECS),
                refresh_ttl_secs: env_parse(
                    env_keys::JWT_REFRESH_TOKEN_TTL,
                    DEFAULT_REFRESH_TTL_SECS,
                ),
                issuer: env_or(env_keys::JWT_ISSUER, DEFAULT_ISSUER),
            },
            rate: RateLimitConfig {
                capacity: env_parse(env_keys::RATE_LIMIT_CAPACITY, DEFAULT_RATE_CAPACITY),
                window_secs: env_parse(env_keys::RATE_LIMIT_WINDOW, DEFAULT_RATE_WINDOW_SECS),
                overrides: Vec::new(),
            },
            csrf: CsrfConfig {
                ttl_secs: env_parse(env_keys::CSRF_TOKEN_TTL, DEFAULT_CSRF_TTL_SECS),
                single_use: env_flag(env_keys::CSRF_SINGLE_USE),
                protected_methods: env_list(env_keys::CSRF_PROTECTED_METHODS),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Startup gate: a process with an unusable governance configuration
    /// must refuse to start.
    pub fn validate(&self) -> Result<(), InterceptError> {
        if self.auth.secret.is_empty() {
            return Err(InterceptError::config_invalid(
                "JWT_SECRET_KEY is not set; generate one with: openssl rand -base64 64",
            ));
        }
        if self.auth.secret.len() < MIN_SECRET_LEN {
            return Err(InterceptError::config_invalid(&format!(
                "JWT_SECRET_KEY must be at least {MIN_SECRET_LEN} characters, got {}",
                self.auth.secret.len()
            )));
        }
        if self.rate.capacity == 0 || self.rate.window_secs == 0 {
            return Err(InterceptError::config_invalid(
                "rate limit capacity and window must be positive",
            ));
        }
        for limit in &self.rate.overrides {
            if limit.capacity == 0 || limit.window_secs == 0 {
                return Err(InterceptError::config_invalid(&format!(
                    "rate limit override for {} must be positive",
                    limit.method
                )));
            }
        }
        if self.csrf.ttl_secs == 0 {
            return Err(InterceptError::config_invalid(
                "CSRF token ttl must be positive",
            ));
        }
        Ok(())
    }
}

fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

fn env_parse<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str) -> bool {
    matches!(
        std::env::var(key).unwrap_or_default().trim(),
        "1" | "true" | "TRUE" | "True"
    )
}

fn env_list(key: &str) -> Vec<String> {
    std::env::var(key)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn default_access_ttl_secs() -> u64 {
    DEFAULT_ACCESS_TTL_SECS
}

fn default_refresh_ttl_secs() -> u64 {
    DEFAULT_REFRESH_TTL_SECS
}

fn default_issuer() -> String {
    DEFAULT_ISSUER.to_string()
}

fn default_rate_capacity() -> u32 {
    DEFAULT_RATE_CAPACITY
}

fn default_rate_window_secs() -> u64 {
    DEFAULT_RATE_WINDOW_SECS
}

fn default_csrf_ttl_secs() -> u64 {
    DEFAULT_CSRF_TTL_SECS
}

fn default_rate_config() -> RateLimitConfig {
    RateLimitConfig {
        capacity: DEFAULT_RATE_CAPACITY,
        window_secs: DEFAULT_RATE_WINDOW_SECS,
        overrides: Vec::new(),
    }
}

fn default_csrf_config() -> CsrfConfig {
    CsrfConfig {
        ttl_secs: DEFAULT_CSRF_TTL_SECS,
        single_use: false,
        protected_methods: Vec::new(),
    }
}
