use std::{env, net::SocketAddr, time::Duration};

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";

#[derive(Debug, thiserror::Error)]
#[error("{key} must be {expected}, got {value:?}")]
pub struct ConfigError {
    pub key: &'static str,
    pub expected: &'static str,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub host: String,
    pub port: u16,
    pub records_per_page: u32,
    pub checkins_per_page: u32,
    pub recent_per_page: u32,
    pub api_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            records_per_page: 10,
            checkins_per_page: 10,
            recent_per_page: 5,
            api_timeout: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let api_base_url = lookup("LIFELOG_API_URL")
            .filter(|value| !value.trim().is_empty())
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        Ok(Self {
            api_base_url,
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            records_per_page: page_size(&lookup, "RECORDS_PER_PAGE", defaults.records_per_page)?,
            checkins_per_page: page_size(&lookup, "CHECKINS_PER_PAGE", defaults.checkins_per_page)?,
            recent_per_page: page_size(&lookup, "RECENT_PER_PAGE", defaults.recent_per_page)?,
            api_timeout: match lookup("API_TIMEOUT_SECS") {
                Some(value) => Some(Duration::from_secs(value.trim().parse().map_err(|_| {
                    ConfigError {
                        key: "API_TIMEOUT_SECS",
                        expected: "a number of seconds",
                        value,
                    }
                })?)),
                None => None,
            },
        })
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError {
            key: "HOST",
            expected: "an IP address",
            value: self.host.clone(),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError {
            key,
            expected: "a number",
            value,
        }),
        None => Ok(default),
    }
}

fn page_size<F>(lookup: &F, key: &'static str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let size = parse_or(lookup, key, default)?;
    if size == 0 {
        return Err(ConfigError {
            key,
            expected: "a positive page size",
            value: size.to_string(),
        });
    }
    Ok(size)
}
