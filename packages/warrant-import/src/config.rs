use dotenvy::dotenv;
use secrecy::SecretString;
use std::env;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_SEARCH_URL: &str = "http://www4.cookcountysheriff.org/locatename.asp";
pub const DEFAULT_DETAIL_PREFIX: &str = "wanted.asp";
pub const DEFAULT_PANDA_API: &str = "http://panda.tribapps.com/api/1.0";
pub const DEFAULT_PANDA_SLUG: &str = "cook_county_warrants";
pub const DEFAULT_DB_PATH: &str = "warrants.sqlite3";

/// Importer configuration, built once at startup and passed by reference.
#[derive(Debug)]
pub struct Config {
    pub search_url: Url,
    pub detail_prefix: String,
    pub panda_api_url: String,
    pub panda_slug: String,
    pub panda_email: String,
    pub panda_api_key: SecretString,
    pub database_path: String,
    /// Request timeout for the source site. Unset means the client default.
    pub http_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::MissingVar(key));

        let panda_email = require("PANDA_AUTH_EMAIL")?;
        let panda_api_key = SecretString::new(Box::from(require("PANDA_AUTH_KEY")?.as_str()));

        let search_url = get("WARRANT_SEARCH_URL").unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string());
        let search_url = Url::parse(&search_url).map_err(|source| ConfigError::InvalidUrl {
            var: "WARRANT_SEARCH_URL",
            source,
        })?;

        let panda_api_url = get("PANDA_API_URL").unwrap_or_else(|| DEFAULT_PANDA_API.to_string());
        Url::parse(&panda_api_url).map_err(|source| ConfigError::InvalidUrl {
            var: "PANDA_API_URL",
            source,
        })?;

        let http_timeout = get("HTTP_TIMEOUT_SECS")
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| ConfigError::InvalidNumber {
                        var: "HTTP_TIMEOUT_SECS",
                        value,
                    })
            })
            .transpose()?;

        Ok(Self {
            search_url,
            detail_prefix: get("WARRANT_DETAIL_PREFIX")
                .unwrap_or_else(|| DEFAULT_DETAIL_PREFIX.to_string()),
            panda_api_url,
            panda_slug: get("PANDA_DATASET_SLUG").unwrap_or_else(|| DEFAULT_PANDA_SLUG.to_string()),
            panda_email,
            panda_api_key,
            database_path: get("WARRANT_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            http_timeout,
        })
    }
}
