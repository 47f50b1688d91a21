use crate::error::ConfigError;
use colored::Colorize;
use json_comments::StripComments;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://5haapyl219.execute-api.eu-central-1.amazonaws.com/prod/ask";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub debug: bool,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidEndpoint { url: self.endpoint.clone(), reason };
        let url = Url::parse(&self.endpoint).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!("unsupported scheme '{}'", other))),
        }
    }

    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(Duration::from_secs(self.timeout_secs))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint_url()?;
        self.timeout()?;
        Ok(())
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(debug) = env("TOURAI_DEBUG") { self.debug = debug.to_lowercase() == "true"; }
        if let Some(endpoint) = env("TOURAI_ENDPOINT") { self.endpoint = endpoint; }
        if let Some(secs) = env("TOURAI_TIMEOUT_SECS") { if let Ok(n) = secs.parse() { self.timeout_secs = n; } }
    }
}

pub fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("TOURAI_CONFIG_PATH") {
        return PathBuf::from(path);
    }
    let mut config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config_dir.push("tourai");
    config_dir.push("tourai.config.json");
    config_dir
}

/// Loads the config from the default location and the process environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path();
    if !config_path.exists() {
        match write_default_config(&config_path) {
            Ok(()) => println!("{}", format!("Created default config at '{}'", config_path.display()).green()),
            Err(e) => println!("{}", e.to_string().red()),
        }
    }
    load_from(&config_path, |key| std::env::var(key).ok())
}

/// File values first, then environment overrides, then validation. A file
/// that is missing or does not parse leaves the defaults in place.
pub fn load_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    if let Ok(json) = std::fs::read_to_string(path) {
        let stripped = StripComments::new(json.as_bytes());
        match serde_json::from_reader(stripped) {
            Ok(file_config) => config = file_config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "config file did not parse");
                println!(
                    "{} {} {}\n{}",
                    "Failed to parse".red(),
                    path.display().to_string().red(),
                    format!(": {}", e).red(),
                    "Using default config"
                );
            }
        }
    }

    config.apply_env(env);
    config.validate()?;
    Ok(config)
}

pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let io_err = |source: std::io::Error| ConfigError::Io { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let default_json = serde_json::to_string_pretty(&Config::default()).unwrap_or_else(|_| "{}".to_string());
    std::fs::write(path, default_json).map_err(io_err)
}
