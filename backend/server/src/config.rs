use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};
use vitals::{GeoPoint, catalog::BASE_ORIGIN};

use crate::error::AppError;

const SECRETS_DIR: &str = "/run/secrets";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub cors_max_age_secs: u64,
    pub vitals_tick_secs: u64,
    pub location_tick_secs: u64,
    pub history_len: usize,
    pub nearest_vet_limit: usize,
    pub session_ttl_secs: u64,
    pub max_sessions: usize,
    pub base_origin: GeoPoint,
    pub diet: DietConfig,
}

#[derive(Clone)]
pub struct DietConfig {
    pub api_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    pub fallback: bool,
}

impl std::fmt::Debug for DietConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DietConfig")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        Ok(Self {
            port: try_load("RUST_PORT", "1111")?,
            cors_max_age_secs: try_load("CORS_MAX_AGE_SECS", "3600")?,
            vitals_tick_secs: try_load("VITALS_TICK_SECS", "10")?,
            location_tick_secs: try_load("LOCATION_TICK_SECS", "15")?,
            history_len: try_load("HISTORY_LEN", "24")?,
            nearest_vet_limit: try_load("NEAREST_VET_LIMIT", "3")?,
            session_ttl_secs: try_load("SESSION_TTL_SECS", "86400")?,
            max_sessions: try_load("MAX_SESSIONS", "1024")?,
            base_origin: GeoPoint::new(
                try_load("BASE_LATITUDE", "28.4744")?,
                try_load("BASE_LONGITUDE", "77.5030")?,
            ),
            diet: DietConfig {
                api_url: try_load(
                    "DIET_API_URL",
                    "https://api.openai.com/v1/chat/completions",
                )?,
                model: try_load("DIET_MODEL", "gpt-4")?,
                api_key: read_secret("DIET_API_KEY"),
                timeout_ms: try_load("DIET_TIMEOUT_MS", "10000")?,
                fallback: try_load("DIET_FALLBACK", "true")?,
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 1111,
            cors_max_age_secs: 3600,
            vitals_tick_secs: 10,
            location_tick_secs: 15,
            history_len: 24,
            nearest_vet_limit: 3,
            session_ttl_secs: 86_400,
            max_sessions: 1024,
            base_origin: BASE_ORIGIN,
            diet: DietConfig {
                api_url: "https://api.openai.com/v1/chat/completions".to_string(),
                model: "gpt-4".to_string(),
                api_key: None,
                timeout_ms: 10_000,
                fallback: true,
            },
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        info!("{key} not set");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|_| {
        info!("{key} using default: {default}");
        default.to_string()
    });

    parse_value(key, &raw)
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        AppError::Config(format!("{key}: {e}"))
    })
}

/// Optional secret mounted under `/run/secrets`, falling back to the
/// environment for local runs.
fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("{SECRETS_DIR}/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .ok()
        .or_else(|| var(secret_name).ok())
        .filter(|secret| !secret.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.port, 1111);
        assert_eq!(config.nearest_vet_limit, 3);
        assert_eq!(config.base_origin, BASE_ORIGIN);
        assert!(config.diet.api_key.is_none());
        assert!(config.diet.fallback);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value::<u16>("RUST_PORT", " 8080 ").unwrap(), 8080);
        assert_eq!(parse_value::<f64>("BASE_LATITUDE", "-12.5").unwrap(), -12.5);
        assert!(parse_value::<bool>("DIET_FALLBACK", "false").map(|v| !v).unwrap());
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        let err = parse_value::<u16>("RUST_PORT", "port").unwrap_err();

        assert!(matches!(err, AppError::Config(ref msg) if msg.starts_with("RUST_PORT")));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut config = Config::default();
        config.diet.api_key = Some("sk-secret".to_string());

        let printed = format!("{config:?}");

        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
