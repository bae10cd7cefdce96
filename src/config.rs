//! Configuration for the Feedly client
//!
//! Loads configuration from feedly.yml, `.env` and environment variables.
//! Environment variables take precedence over file values.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{Error, Result};

/// Default constants (fallback if feedly.yml not found)
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const CONFIG_FILE: &str = "feedly.yml";
pub const SESSION_DIR: &str = ".feedly";
pub const DEFAULT_REVIEW_LIMIT: usize = 100;
pub const DEFAULT_COUNTRY: &str = "fr";
pub const DEFAULT_SCRAPE_COUNT: u32 = 200;
pub const COOKIE_DAYS: i64 = 7;

/// YAML config structures
#[derive(Debug, Deserialize)]
struct YamlConfig {
    api: Option<ApiSection>,
    session: Option<SessionSection>,
    reviews: Option<ReviewsSection>,
    add_app: Option<AddAppSection>,
}

#[derive(Debug, Deserialize)]
struct ApiSection {
    url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    timeout_secs: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionSection {
    dir: Option<String>,
    cookie_days: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ReviewsSection {
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct AddAppSection {
    country: Option<String>,
    count: Option<u32>,
}

/// Deserialize a value that can be either a string or a number
fn deserialize_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_yaml::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {:?}",
            other
        ))),
    }
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub session_dir: PathBuf,
    /// No client-side timeout unless explicitly configured.
    pub timeout: Option<Duration>,
    pub review_limit: usize,
    pub default_country: String,
    pub default_count: u32,
    pub cookie_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Load configuration from feedly.yml or use defaults
    pub fn new() -> Self {
        Self::load_from_file(CONFIG_FILE)
            .or_else(|_| Self::load_from_file(Path::new("..").join(CONFIG_FILE)))
            .unwrap_or_else(|_| {
                let mut config = Self::defaults();
                config.apply_env();
                config
            })
    }

    /// Resolve a value: prefer env var if config value looks like ${VAR}
    fn resolve_env_string(value: Option<String>, env_keys: &[&str]) -> Option<String> {
        if let Some(ref v) = value {
            if v.starts_with("${") && v.ends_with('}') {
                let var_name = &v[2..v.len() - 1];
                if let Ok(env_val) = std::env::var(var_name) {
                    return Some(env_val);
                }
            }
        }
        for key in env_keys {
            if let Ok(env_val) = std::env::var(key) {
                if !env_val.trim().is_empty() {
                    return Some(env_val);
                }
            }
        }
        value.filter(|v| !(v.starts_with("${") && v.ends_with('}')))
    }

    /// Resolve a `${VAR}` value from the environment; unset placeholders become `None`.
    fn resolve_placeholder(value: Option<String>) -> Option<String> {
        Self::resolve_env_string(value, &[])
    }

    /// Load .env file into environment variables using dotenvy
    fn load_dotenv() {
        if dotenvy::dotenv().is_err() {
            let _ = dotenvy::from_filename("../.env");
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_dotenv();

        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml(&content)
    }

    /// Build configuration from YAML text, then apply env overrides.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let yaml: YamlConfig = serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;

        let mut config = Self::defaults();

        if let Some(api) = yaml.api {
            if let Some(url) = api.url {
                config.api_url = url;
            }
            config.timeout = Self::resolve_placeholder(api.timeout_secs)
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
        }
        if let Some(session) = yaml.session {
            if let Some(dir) = Self::resolve_placeholder(session.dir) {
                config.session_dir = PathBuf::from(dir);
            }
            if let Some(days) = session.cookie_days {
                config.cookie_days = days;
            }
        }
        if let Some(limit) = yaml.reviews.and_then(|r| r.limit) {
            config.review_limit = limit;
        }
        if let Some(add_app) = yaml.add_app {
            if let Some(country) = add_app.country {
                config.default_country = country;
            }
            if let Some(count) = add_app.count {
                config.default_count = count;
            }
        }

        config.apply_env();
        Ok(config)
    }

    /// Apply environment overrides on top of the current values.
    fn apply_env(&mut self) {
        let url = Self::resolve_env_string(
            Some(self.api_url.clone()),
            &["FEEDLY_API_URL", "NEXT_PUBLIC_API_URL"],
        )
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        self.api_url = normalize_base_url(&url);

        if let Ok(dir) = std::env::var("FEEDLY_SESSION_DIR") {
            if !dir.trim().is_empty() {
                self.session_dir = PathBuf::from(dir);
            }
        }
        if let Some(secs) = std::env::var("FEEDLY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.timeout = Some(Duration::from_secs(secs));
        }
    }

    /// Create config with defaults (fallback)
    pub fn defaults() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_dir: PathBuf::from(SESSION_DIR),
            timeout: None,
            review_limit: DEFAULT_REVIEW_LIMIT,
            default_country: DEFAULT_COUNTRY.to_string(),
            default_count: DEFAULT_SCRAPE_COUNT,
            cookie_days: COOKIE_DAYS,
        }
    }

    /// Override the API base URL (CLI flag).
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = normalize_base_url(url);
        self
    }

    /// Override the session directory (CLI flag).
    pub fn with_session_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.session_dir = dir.into();
        self
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
