//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub platform: PlatformConfig,
    pub bot: BotConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis event bus configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    /// Pattern subscribed with PSUBSCRIBE
    #[serde(default = "default_event_channel_pattern")]
    pub event_channel_pattern: String,
    /// Capacity of the in-process event broadcast channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

/// Remote chat platform (REST API) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    #[serde(default = "default_platform_api_url")]
    pub api_url: String,
    pub bot_token: String,
    #[serde(default = "default_platform_timeout_secs")]
    pub timeout_secs: u64,
    /// How often a rate-limited request is retried before giving up
    #[serde(default = "default_rate_limit_retries")]
    pub rate_limit_retries: u32,
}

impl PlatformConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Bot behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Command prefix, e.g. `!` in `!rrc`
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Serialize events that touch the same message
    #[serde(default = "default_serialize_per_message")]
    pub serialize_per_message: bool,
}

// Default value functions
fn default_app_name() -> String {
    "rolebot".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    1
}

fn default_event_channel_pattern() -> String {
    "channel:*".to_string()
}

fn default_event_buffer() -> usize {
    1024
}

fn default_reconnect_delay_ms() -> u64 {
    1000
}

fn default_platform_api_url() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_platform_timeout_secs() -> u64 {
    10
}

fn default_rate_limit_retries() -> u32 {
    3
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_serialize_per_message() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or
    /// a variable can't be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        Ok(Self {
            app: AppSettings {
                name: vars.string_or("APP_NAME", default_app_name),
                env: vars.parse_or("APP_ENV", default_env)?,
            },
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars
                    .parse_or("DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: vars
                    .parse_or("DATABASE_MIN_CONNECTIONS", default_min_connections)?,
            },
            redis: RedisConfig {
                url: vars.required("REDIS_URL")?,
                event_channel_pattern: vars
                    .string_or("EVENT_CHANNEL_PATTERN", default_event_channel_pattern),
                event_buffer: vars.parse_or("EVENT_BUFFER", default_event_buffer)?,
                reconnect_delay_ms: vars
                    .parse_or("EVENT_RECONNECT_DELAY_MS", default_reconnect_delay_ms)?,
            },
            platform: PlatformConfig {
                api_url: vars.string_or("PLATFORM_API_URL", default_platform_api_url),
                bot_token: vars.required("BOT_TOKEN")?,
                timeout_secs: vars
                    .parse_or("PLATFORM_TIMEOUT_SECS", default_platform_timeout_secs)?,
                rate_limit_retries: vars
                    .parse_or("PLATFORM_RATE_LIMIT_RETRIES", default_rate_limit_retries)?,
            },
            bot: BotConfig {
                prefix: vars.string_or("BOT_PREFIX", default_prefix),
                serialize_per_message: vars
                    .parse_or("BOT_SERIALIZE_PER_MESSAGE", default_serialize_per_message)?,
            },
        })
    }
}

/// Variable lookup helpers; blank values count as unset
struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::MissingVar(key))
    }

    fn string_or(&self, key: &str, default: fn() -> String) -> String {
        self.get(key).unwrap_or_else(default)
    }

    fn parse_or<T>(&self, key: &'static str, default: fn() -> T) -> Result<T, ConfigError>
    where
        T: FromStr,
    {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key, raw)),
            None => Ok(default()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
