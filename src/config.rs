use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::models::MatchWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_request_ttl_hours")]
    pub request_ttl_hours: i64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            request_ttl_hours: default_request_ttl_hours(),
        }
    }
}

fn default_request_ttl_hours() -> i64 { 48 }

/// Upper bound on the request TTL (one year)
const MAX_REQUEST_TTL_HOURS: i64 = 24 * 366;

impl MatchingSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_REQUEST_TTL_HOURS).contains(&self.request_ttl_hours) {
            return Err(ConfigError::Message(format!(
                "matching.request_ttl_hours must be between 1 and {}, got {}",
                MAX_REQUEST_TTL_HOURS, self.request_ttl_hours
            )));
        }
        Ok(())
    }
}

/// Points per matching criterion
#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_same_sub_region_weight")]
    pub same_sub_region: u16,
    #[serde(default = "default_same_region_weight")]
    pub same_region: u16,
    #[serde(default = "default_main_service_weight")]
    pub main_service: u16,
    #[serde(default = "default_preferred_gender_weight")]
    pub preferred_gender: u16,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            same_sub_region: default_same_sub_region_weight(),
            same_region: default_same_region_weight(),
            main_service: default_main_service_weight(),
            preferred_gender: default_preferred_gender_weight(),
        }
    }
}

impl From<&WeightsConfig> for MatchWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            same_sub_region: config.same_sub_region,
            same_region: config.same_region,
            main_service: config.main_service,
            preferred_gender: config.preferred_gender,
        }
    }
}

fn default_same_sub_region_weight() -> u16 { 2 }
fn default_same_region_weight() -> u16 { 1 }
fn default_main_service_weight() -> u16 { 1 }
fn default_preferred_gender_weight() -> u16 { 1 }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub secret_key: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

fn default_algorithm() -> String { "HS256".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Configuration file (config/default.toml)
    /// 2. Local overrides (config/local.toml)
    /// 3. Environment variables (prefixed with BESTGO__)
    /// 4. DATABASE_URL and JWT_SECRET
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., BESTGO__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        Self::from_config(apply_env_overrides(settings)?)
    }

    fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Self = config.try_deserialize()?;
        settings.matching.validate()?;
        Ok(settings)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("BESTGO")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Well-known variables shared with the rest of the deployment
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = std::env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(secret) = std::env::var("JWT_SECRET") {
        builder = builder.set_override("auth.secret_key", secret)?;
    }

    builder.build()
}
