use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub auth_token: Option<String>,
    pub submit_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    pub tick_interval_ms: u64,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            api_base_url: get_env("QUIZ_API_BASE_URL")?,
            auth_token: env::var("QUIZ_AUTH_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            submit_timeout_secs: get_env_parse_or("SUBMIT_TIMEOUT_SECS", 10)?,
            fetch_timeout_secs: get_env_parse_or("FETCH_TIMEOUT_SECS", 10)?,
            tick_interval_ms: get_env_parse_or("TICK_INTERVAL_MS", 1000)?,
        })
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Ok(raw) = env::var(name) else {
        tracing::debug!("{} not set, using default", name);
        return Ok(default);
    };
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    if config.tick_interval_ms == 0 {
        return Err(Error::Config("TICK_INTERVAL_MS must be positive".to_string()));
    }
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}
