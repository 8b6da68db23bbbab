use std::env;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_STATION_NAME: &str = "ws980wifi";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationConfig {
    pub name: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub stations: Vec<StationConfig>,
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl PollerConfig {
    pub fn new() -> Result<Self, ConfigError> {
        // Load environment variables
        dotenv::dotenv().ok();

        // Try the WS980_STATIONS list first, then individual variables
        let stations = if let Ok(raw) = env::var("WS980_STATIONS") {
            parse_stations(&raw)?
        } else {
            stations_from_indexed_vars()?
        };

        if stations.is_empty() {
            return Err(ConfigError::NoStations);
        }

        let poll_interval = duration_var("WS980_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        let timeout = duration_var("WS980_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(PollerConfig {
            stations,
            poll_interval,
            timeout,
        })
    }
}

fn duration_var(name: &'static str, default_secs: u64) -> Result<Duration, ConfigError> {
    match env::var(name) {
        Ok(value) => {
            let secs: u64 = value.parse().map_err(|_| ConfigError::InvalidValue {
                name,
                value: value.clone(),
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue { name, value });
            }
            Ok(Duration::from_secs(secs))
        }
        Err(_) => Ok(Duration::from_secs(default_secs)),
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    let port: u16 = raw
        .parse()
        .map_err(|_| ConfigError::InvalidPort(raw.to_string()))?;
    if port == 0 {
        return Err(ConfigError::InvalidPort(raw.to_string()));
    }
    Ok(port)
}

/// Parse a comma-separated list of `name=host:port` entries.
fn parse_stations(raw: &str) -> Result<Vec<StationConfig>, ConfigError> {
    let mut stations = Vec::new();
    for pair in raw.split(',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let (name, endpoint) = pair
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidStation(pair.to_string()))?;
        let (host, port) = endpoint
            .rsplit_once(':')
            .ok_or_else(|| ConfigError::InvalidStation(pair.to_string()))?;
        let name = name.trim();
        let host = host.trim();
        if name.is_empty() || host.is_empty() {
            return Err(ConfigError::InvalidStation(pair.to_string()));
        }
        stations.push(StationConfig {
            name: name.to_string(),
            host: host.to_string(),
            port: parse_port(port.trim())?,
        });
    }
    Ok(stations)
}

/// Fallback: WS980_STATION_<N>_HOST / _PORT / _NAME environment variables.
fn stations_from_indexed_vars() -> Result<Vec<StationConfig>, ConfigError> {
    let mut stations = Vec::new();
    for (key, host) in env::vars() {
        if let Some(index) = key
            .strip_prefix("WS980_STATION_")
            .and_then(|s| s.strip_suffix("_HOST"))
        {
            let port = env::var(format!("WS980_STATION_{}_PORT", index))
                .map_err(|_| ConfigError::InvalidStation(key.clone()))?;
            let name = env::var(format!("WS980_STATION_{}_NAME", index))
                .unwrap_or_else(|_| DEFAULT_STATION_NAME.to_string());
            stations.push(StationConfig {
                name,
                host,
                port: parse_port(&port)?,
            });
        }
    }
    Ok(stations)
}
