use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

pub mod endpoints;

const DEFAULT_API_BASE_URL: &str = "https://ebiztable.shop/api";
const DEFAULT_HEALTH_CHECK_URL: &str = "https://ebiztable.shop/actuator/health";
const PRODUCTION_DOMAIN: &str = "https://ebiztable.shop";
const DEVELOPMENT_HOST: &str = "43.202.52.161";
const DEVELOPMENT_PORT: u16 = 8080;
const DEFAULT_STORAGE_PATH: &str = "storage.json";

/// Build flavour the client talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Named environment, or development when none is set.
    fn resolve(value: Option<String>) -> Result<Self, ConfigError> {
        value.map_or(Ok(Environment::default()), |value| value.parse())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub api_base_url: String,
    pub production_domain: String,
    pub development_host: String,
    pub development_port: u16,
    pub health_check_url: String,
    /// No per-request timeout is applied when unset.
    pub request_timeout_secs: Option<u64>,
    pub health_check_timeout_secs: u64,
    pub storage_path: PathBuf,
    pub redis_url: Option<String>,
    pub recent_search_capacity: usize,
    pub hydration_concurrency: usize,
    pub search_debounce_ms: u64,
    pub activity_lookback_days: u32,
}

/// Resolved endpoint and flags, as shown on the developer screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentInfo {
    pub base_url: String,
    pub is_development: bool,
    pub is_production: bool,
}

impl Config {
    /// Built-in defaults for one environment; both currently target the
    /// production HTTPS endpoint.
    pub fn for_environment(environment: Environment) -> Self {
        Config {
            environment,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            production_domain: PRODUCTION_DOMAIN.to_string(),
            development_host: DEVELOPMENT_HOST.to_string(),
            development_port: DEVELOPMENT_PORT,
            health_check_url: DEFAULT_HEALTH_CHECK_URL.to_string(),
            request_timeout_secs: None,
            health_check_timeout_secs: 5,
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            redis_url: None,
            recent_search_capacity: 10,
            hydration_concurrency: 8,
            search_debounce_ms: 500,
            activity_lookback_days: 90,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let environment = Environment::resolve(env::var("APP_ENV").ok())?;
        let defaults = Config::for_environment(environment);

        let api_base_url = env::var("API_BASE_URL").unwrap_or(defaults.api_base_url);
        let health_check_url = env::var("HEALTH_CHECK_URL").unwrap_or(defaults.health_check_url);
        validate_url("API_BASE_URL", &api_base_url)?;
        validate_url("HEALTH_CHECK_URL", &health_check_url)?;

        Ok(Config {
            environment,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            health_check_url,
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|value| value.parse().ok()),
            health_check_timeout_secs: parse_or(
                "HEALTH_CHECK_TIMEOUT_SECS",
                defaults.health_check_timeout_secs,
            ),
            storage_path: env::var("STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty()),
            recent_search_capacity: parse_or(
                "RECENT_SEARCH_CAPACITY",
                defaults.recent_search_capacity,
            ),
            hydration_concurrency: parse_or("HYDRATION_CONCURRENCY", defaults.hydration_concurrency),
            search_debounce_ms: parse_or("SEARCH_DEBOUNCE_MS", defaults.search_debounce_ms),
            activity_lookback_days: parse_or(
                "ACTIVITY_LOOKBACK_DAYS",
                defaults.activity_lookback_days,
            ),
            ..defaults
        })
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn health_check_timeout(&self) -> Duration {
        Duration::from_secs(self.health_check_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn environment_info(&self) -> EnvironmentInfo {
        EnvironmentInfo {
            base_url: self.api_base_url.clone(),
            is_development: self.is_development(),
            is_production: self.is_production(),
        }
    }

    /// Logs the resolved server settings; silent outside development.
    pub fn log_server_info(&self) {
        if !self.is_development() {
            return;
        }
        tracing::info!(
            environment = self.environment.as_str(),
            api_base_url = %self.api_base_url,
            production_domain = %self.production_domain,
            development_host = %self.development_host,
            development_port = self.development_port,
            health_check_url = %self.health_check_url,
            redis = self.redis_url.is_some(),
            "server environment"
        );
    }
}

fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {}, falling back to default", name);
            default
        }),
        Err(_) => default,
    }
}

fn validate_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
    reqwest::Url::parse(value)
        .map(|_| ())
        .map_err(|error| ConfigError::InvalidUrl {
            name,
            message: error.to_string(),
        })
}
