use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use reqwest::Url;
use tracing::{info, warn};

use crate::error::ConfigError;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000/analyze";
const ANALYZE_PATH: &str = "/analyze";

pub struct Config {
    pub port: u16,
    pub backend_url: String,
    /// Outbound timeout for the relay. `None` leaves the client default.
    pub relay_timeout: Option<Duration>,
    pub max_upload_bytes: usize,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = match lookup("PYTHON_BACKEND_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => normalize_backend_url(&url)?,
            None => {
                info!("PYTHON_BACKEND_URL not set, using default: {DEFAULT_BACKEND_URL}");
                DEFAULT_BACKEND_URL.to_string()
            }
        };

        let relay_timeout = lookup("RELAY_TIMEOUT_SECS")
            .map(|raw| parse::<u64>("RELAY_TIMEOUT_SECS", &raw))
            .transpose()?
            .map(Duration::from_secs);

        Ok(Self {
            port: try_load(&lookup, "PORT", "3000")?,
            backend_url,
            relay_timeout,
            max_upload_bytes: try_load(&lookup, "MAX_UPLOAD_BYTES", "10485760")?,
            static_dir: PathBuf::from(lookup("STATIC_DIR").unwrap_or_else(|| "static".to_string())),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    parse(key, &raw)
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Accepts a full endpoint URL or just a tunnel host such as
/// `abc123.ngrok.io`. A missing scheme becomes `https://`; a URL with no
/// path gets `/analyze`. URLs that already carry a path are kept.
pub fn normalize_backend_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    // `host:port` parses with the host as its scheme.
    let mut url = match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url,
        _ if !trimmed.contains("://") => Url::parse(&format!("https://{trimmed}"))
            .map_err(|e| invalid_backend_url(raw, e.to_string()))?,
        Ok(url) => {
            return Err(invalid_backend_url(raw, format!("unsupported scheme {}", url.scheme())))
        }
        Err(e) => return Err(invalid_backend_url(raw, e.to_string())),
    };

    if url.path() == "/" {
        url.set_path(ANALYZE_PATH);
    }
    Ok(url.into())
}

fn invalid_backend_url(raw: &str, reason: String) -> ConfigError {
    warn!("Invalid PYTHON_BACKEND_URL value: {reason}");
    ConfigError::Invalid {
        key: "PYTHON_BACKEND_URL",
        value: raw.to_string(),
        reason,
    }
}
