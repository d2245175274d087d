//! Engine configuration
//!
//! Values are read from the process environment, after loading a `.env` file
//! from the current directory or its parents when one is present. Environment
//! variables take precedence over `.env` values.
//!
//! ## Keys
//! - `FIELDROUTE_TABLE_PATH`: persisted contract table (default `./contracts_db.json`)
//! - `FIELDROUTE_GEOCODER_URL`: geocoding service base URL
//! - `FIELDROUTE_GEOCODER_USER_AGENT`: `User-Agent` sent to the service
//! - `FIELDROUTE_GEOCODER_MIN_DELAY_MS`: minimum delay between geocoding calls
//! - `FIELDROUTE_GEOCODER_TIMEOUT_MS`: per-request timeout
//! - `FIELDROUTE_SNAPSHOT_TTL_SECS`: maximum age of an enriched snapshot
//! - `FIELDROUTE_ROUTE_CAP`: how many ranked stops receive a visit number
//! - `FIELDROUTE_DEFAULT_ORIGIN`: `lat,lng` used when no agent position is known

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use shared::{Coordinate, SharedError};
use crate::error::{EngineError, EngineResult};

pub const ENV_TABLE_PATH: &str = "FIELDROUTE_TABLE_PATH";
pub const ENV_GEOCODER_URL: &str = "FIELDROUTE_GEOCODER_URL";
pub const ENV_GEOCODER_USER_AGENT: &str = "FIELDROUTE_GEOCODER_USER_AGENT";
pub const ENV_GEOCODER_MIN_DELAY_MS: &str = "FIELDROUTE_GEOCODER_MIN_DELAY_MS";
pub const ENV_GEOCODER_TIMEOUT_MS: &str = "FIELDROUTE_GEOCODER_TIMEOUT_MS";
pub const ENV_SNAPSHOT_TTL_SECS: &str = "FIELDROUTE_SNAPSHOT_TTL_SECS";
pub const ENV_ROUTE_CAP: &str = "FIELDROUTE_ROUTE_CAP";
pub const ENV_DEFAULT_ORIGIN: &str = "FIELDROUTE_DEFAULT_ORIGIN";

/// Seoul City Hall
pub const DEFAULT_ORIGIN: Coordinate = Coordinate { latitude: 37.5665, longitude: 126.9780 };

/// Geocoding client settings
#[derive(Debug, Clone, PartialEq)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub min_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "field_sales_app".to_string(),
            min_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Full engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub table_path: PathBuf,
    pub geocoder: GeocoderConfig,
    pub snapshot_ttl: Duration,
    pub route_cap: usize,
    pub default_origin: Coordinate,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            table_path: PathBuf::from("./contracts_db.json"),
            geocoder: GeocoderConfig::default(),
            snapshot_ttl: Duration::from_secs(60 * 60),
            route_cap: 15,
            default_origin: DEFAULT_ORIGIN,
        }
    }
}

impl EngineConfig {
    /// Load configuration from `.env` and the process environment
    pub fn from_env() -> EngineResult<Self> {
        // A missing .env file is fine
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to
    /// defaults for absent keys
    pub fn from_lookup<F>(lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_TABLE_PATH) {
            config.table_path = PathBuf::from(path);
        }
        if let Some(url) = lookup(ENV_GEOCODER_URL) {
            url::Url::parse(&url).map_err(|e| invalid(ENV_GEOCODER_URL, &url, e))?;
            config.geocoder.base_url = url;
        }
        if let Some(agent) = lookup(ENV_GEOCODER_USER_AGENT) {
            if agent.trim().is_empty() {
                return Err(invalid(ENV_GEOCODER_USER_AGENT, &agent, "must not be blank"));
            }
            config.geocoder.user_agent = agent;
        }
        if let Some(ms) = parse_key::<u64, _>(&lookup, ENV_GEOCODER_MIN_DELAY_MS)? {
            config.geocoder.min_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_key::<u64, _>(&lookup, ENV_GEOCODER_TIMEOUT_MS)? {
            config.geocoder.request_timeout = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_key::<u64, _>(&lookup, ENV_SNAPSHOT_TTL_SECS)? {
            config.snapshot_ttl = Duration::from_secs(secs);
        }
        if let Some(cap) = parse_key::<usize, _>(&lookup, ENV_ROUTE_CAP)? {
            config.route_cap = cap;
        }
        if let Some(origin) = lookup(ENV_DEFAULT_ORIGIN) {
            config.default_origin = origin.parse::<Coordinate>()?;
        }

        Ok(config)
    }
}

fn parse_key<T, F>(lookup: &F, key: &str) -> EngineResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| invalid(key, &raw, e)),
        None => Ok(None),
    }
}

fn invalid(field: &str, value: &str, reason: impl std::fmt::Display) -> EngineError {
    let shared = SharedError::InvalidConfig {
        field: field.to_string(),
        value: value.to_string(),
    };
    EngineError::config(format!("{shared} ({reason})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = EngineConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.route_cap, 15);
        assert_eq!(config.snapshot_ttl, Duration::from_secs(3600));
        assert_eq!(config.geocoder.min_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            (ENV_TABLE_PATH, "/tmp/contracts.json"),
            (ENV_GEOCODER_URL, "http://localhost:8088"),
            (ENV_GEOCODER_MIN_DELAY_MS, "250"),
            (ENV_ROUTE_CAP, "5"),
            (ENV_DEFAULT_ORIGIN, "35.1152,129.0422"),
        ]))
        .unwrap();

        assert_eq!(config.table_path, PathBuf::from("/tmp/contracts.json"));
        assert_eq!(config.geocoder.base_url, "http://localhost:8088");
        assert_eq!(config.geocoder.min_delay, Duration::from_millis(250));
        assert_eq!(config.route_cap, 5);
        assert_eq!(config.default_origin, Coordinate::new(35.1152, 129.0422));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let result = EngineConfig::from_lookup(lookup_from(&[(ENV_ROUTE_CAP, "many")]));
        assert!(matches!(result, Err(EngineError::ConfigError { .. })));

        let result = EngineConfig::from_lookup(lookup_from(&[(ENV_GEOCODER_URL, "not a url")]));
        assert!(matches!(result, Err(EngineError::ConfigError { .. })));

        let result = EngineConfig::from_lookup(lookup_from(&[(ENV_DEFAULT_ORIGIN, "somewhere")]));
        assert!(matches!(result, Err(EngineError::SharedError(_))));
    }
}
