use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://mcqs.db";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:5000";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub option_count: usize,
    pub thinking_budget: u32,
    pub request_timeout_secs: u64,
    pub session_ttl_secs: u64,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let option_count: usize = get_env_parse_or("MCQ_OPTION_COUNT", 4)?;
        if option_count < 2 {
            return Err(Error::Config(
                "MCQ_OPTION_COUNT must be at least 2".to_string(),
            ));
        }

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            database_url: get_env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            gemini_api_key: env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            gemini_model: get_env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_api_base: get_env_or("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
            option_count,
            thinking_budget: get_env_parse_or("GEMINI_THINKING_BUDGET", 32_000)?,
            request_timeout_secs: get_env_parse_or("GEMINI_TIMEOUT_SECS", 300)?,
            session_ttl_secs: get_env_parse_or("SESSION_TTL_SECS", 86_400)?,
        })
    }

    /// The API credential is only needed by the generation job, so it is
    /// checked there rather than in `from_env`.
    pub fn require_api_key(&self) -> Result<&str> {
        self.gemini_api_key
            .as_deref()
            .ok_or_else(|| Error::Config("Missing environment variable: GEMINI_API_KEY".to_string()))
    }
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<&'static Config> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(get_config())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
