use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::receipts::rules::{RuleKind, RuleKindParseError};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let disabled_rules = match env::var("APP_DISABLED_RULES") {
            Ok(raw) => parse_rule_list(&raw)?,
            Err(_) => Vec::new(),
        };

        let max_concurrent_scoring = env::var("APP_SCORING_CONCURRENCY")
            .unwrap_or_else(|_| "0".to_string())
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidConcurrency)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringConfig {
                disabled_rules,
                max_concurrent_scoring,
            },
        })
    }
}

fn parse_rule_list(raw: &str) -> Result<Vec<RuleKind>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| name.parse::<RuleKind>().map_err(ConfigError::UnknownRule))
        .collect()
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Rule toggles and background scoring limits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoringConfig {
    pub disabled_rules: Vec<RuleKind>,
    /// Upper bound on scoring tasks running at once; `0` leaves it unbounded.
    pub max_concurrent_scoring: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidConcurrency,
    UnknownRule(RuleKindParseError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidConcurrency => {
                write!(f, "APP_SCORING_CONCURRENCY must be a non-negative integer")
            }
            ConfigError::UnknownRule(err) => write!(f, "APP_DISABLED_RULES: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidConcurrency => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::UnknownRule(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_DISABLED_RULES");
        env::remove_var("APP_SCORING_CONCURRENCY");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn parses_disabled_rules_and_concurrency() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_DISABLED_RULES", "round_dollar_total, afternoon_purchase,");
        env::set_var("APP_SCORING_CONCURRENCY", "8");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.scoring.disabled_rules,
            vec![RuleKind::RoundDollarTotal, RuleKind::AfternoonPurchase]
        );
        assert_eq!(config.scoring.max_concurrent_scoring, 8);
        reset_env();
    }

    #[test]
    fn rejects_unknown_rule_names() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_DISABLED_RULES", "lucky_number");
        let err = AppConfig::load().expect_err("unknown rule rejected");
        assert!(matches!(err, ConfigError::UnknownRule(_)));
        assert!(err.to_string().contains("lucky_number"));
        reset_env();
    }

    #[test]
    fn rejects_invalid_concurrency() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_SCORING_CONCURRENCY", "-1");
        let err = AppConfig::load().expect_err("negative bound rejected");
        assert!(matches!(err, ConfigError::InvalidConcurrency));
        reset_env();
    }
}
