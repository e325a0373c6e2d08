use std::env;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_GRAPH_API_URL: &str = "https://graph.facebook.com";
const DEFAULT_GRAPH_API_VERSION: &str = "v19.0";
const DEFAULT_SERVER_HOST: &str = "::";
const DEFAULT_SERVER_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app_id: String,
    pub app_secret: String,
    pub access_token: String,
    pub ad_account_id: String,
    pub graph_api_url: String,
    pub graph_api_version: String,
    pub graph_api_timeout_secs: Option<u64>,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| lookup(var).ok_or(ConfigError::Missing(var));
        let optional = |var: &'static str, default: &str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let server_port = match lookup("SERVER_PORT").filter(|v| !v.trim().is_empty()) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "SERVER_PORT",
                value,
            })?,
            None => DEFAULT_SERVER_PORT,
        };

        let graph_api_timeout_secs = match lookup("GRAPH_API_TIMEOUT_SECS")
            .filter(|v| !v.trim().is_empty())
        {
            Some(value) => Some(value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "GRAPH_API_TIMEOUT_SECS",
                value,
            })?),
            None => None,
        };

        Ok(Config {
            app_id: required("FB_APP_ID")?,
            app_secret: required("FB_APP_SECRET")?,
            access_token: required("FB_ACCESS_TOKEN")?,
            ad_account_id: required("FB_AD_ACCOUNT_ID")?,
            graph_api_url: optional("GRAPH_API_URL", DEFAULT_GRAPH_API_URL)
                .trim_end_matches('/')
                .to_string(),
            graph_api_version: optional("GRAPH_API_VERSION", DEFAULT_GRAPH_API_VERSION),
            graph_api_timeout_secs,
            server_host: optional("SERVER_HOST", DEFAULT_SERVER_HOST),
            server_port,
            api_base_uri: lookup("API_BASE_URI").unwrap_or_default(),
        })
    }

    pub fn graph_api_timeout(&self) -> Option<Duration> {
        self.graph_api_timeout_secs.map(Duration::from_secs)
    }
}
