use std::path::PathBuf;

use crate::models::error::Error;

const DEFAULT_API_BASE_URL: &str = "https://api.jolpi.ca/ergast/f1";
const DEFAULT_IMAGE_BASE_URL: &str =
    "https://media.formula1.com/content/dam/fom-website/2018-redesign-assets/Track%20icons%204x3";
const DEFAULT_USER_AGENT: &str = concat!("f1_widgets/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub image_base_url: String,
    pub cache_dir: PathBuf,
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn init() -> Result<Self, Error> {
        let request_timeout_secs = match std::env::var("F1_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                Error::Config("F1_REQUEST_TIMEOUT_SECS must be a positive integer".into())
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            api_base_url: env_or("F1_API_BASE_URL", DEFAULT_API_BASE_URL),
            image_base_url: env_or("F1_IMAGE_BASE_URL", DEFAULT_IMAGE_BASE_URL),
            cache_dir: std::env::var("F1_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_cache_dir()),
            user_agent: env_or("F1_USER_AGENT", DEFAULT_USER_AGENT),
            request_timeout_secs,
        })
    }

    /// Config rooted at explicit endpoints and cache directory.
    pub fn with_endpoints(api_base_url: &str, image_base_url: &str, cache_dir: PathBuf) -> Self {
        Config {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
            cache_dir,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .unwrap_or_else(|| default.to_string())
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("f1_widgets")
}
