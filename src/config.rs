use crate::error::AppError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODELS: [&str; 4] = [
    "llama-3.1-8b-instant",
    "mixtral-8x7b-32768",
    "gemma-7b-it",
    "llama-2-70b-chat",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub region: String,
    pub groq_api_key: Option<String>,
    pub groq_models: Vec<String>,
    pub data_dir: PathBuf,
    pub tracker: TrackerConfig,
}

/// Timing knobs for the live session tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub poll_interval: Duration,
    pub status_interval: Duration,
    /// Deadline applied to every fetch, generation and persistence call.
    pub call_timeout: Duration,
    /// How long `stop` waits for an in-flight tick before aborting it.
    pub stop_timeout: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            poll_interval: Duration::from_secs(3),
            status_interval: Duration::from_secs(15),
            call_timeout: Duration::from_secs(10),
            stop_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_key = env::var("RIOT_API_KEY").map_err(|_| {
            AppError::ConfigError("RIOT_API_KEY not found in .env file".to_string())
        })?;

        let region = env::var("RIOT_REGION").unwrap_or_else(|_| "na1".to_string());

        let groq_api_key = env::var("GROQ_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let groq_models = env::var("GROQ_MODELS")
            .ok()
            .map(|raw| parse_models(&raw))
            .filter(|models| !models.is_empty())
            .unwrap_or_else(|| DEFAULT_MODELS.iter().map(|m| m.to_string()).collect());

        let data_dir = env::var("ROAST_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".league_roast")
            });

        let defaults = TrackerConfig::default();
        let tracker = TrackerConfig {
            poll_interval: secs_var("LIVE_POLL_SECS", defaults.poll_interval)?,
            status_interval: secs_var("LIVE_STATUS_SECS", defaults.status_interval)?,
            call_timeout: secs_var("EXTERNAL_TIMEOUT_SECS", defaults.call_timeout)?,
            stop_timeout: defaults.stop_timeout,
        };

        Ok(Config {
            api_key,
            region,
            groq_api_key,
            groq_models,
            data_dir,
            tracker,
        })
    }
}

fn parse_models(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect()
}

fn secs_var(name: &str, default: Duration) -> Result<Duration, AppError> {
    match env::var(name) {
        Ok(raw) => {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                AppError::ConfigError(format!("{} must be a whole number of seconds", name))
            })?;
            if secs == 0 {
                return Err(AppError::ConfigError(format!("{} must be greater than zero", name)));
            }
            Ok(Duration::from_secs(secs))
        }
        Err(_) => Ok(default),
    }
}
