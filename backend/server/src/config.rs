use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    /// In-memory store when unset.
    pub redis_url: Option<String>,
    pub media_root: PathBuf,
    pub max_body_bytes: usize,
    pub session_ttl: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            port: try_load("RUST_PORT", "8000")?,
            redis_url: var("REDIS_URL").ok(),
            media_root: try_load("MEDIA_ROOT", "media")?,
            max_body_bytes: try_load("MAX_BODY_BYTES", "10485760")?,
            session_ttl: Duration::from_secs(try_load("SESSION_TTL_SECS", "1209600")?),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            redis_url: None,
            media_root: PathBuf::from("media"),
            max_body_bytes: 10 * 1024 * 1024,
            session_ttl: Duration::from_secs(14 * 24 * 60 * 60),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let value = var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {value}"))
}
