use std::time::Duration;

use reqwest::Client;

use crate::models::error::Error;
use crate::utils::{cache_store::CacheStore, config::Config, fetcher::CachedFetcher};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub fetcher: CachedFetcher,
}

impl AppState {
    pub fn init(config: Config) -> Result<Self, Error> {
        let http_client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let fetcher = CachedFetcher::new(http_client, CacheStore::new(config.cache_dir.clone()));
        Ok(AppState { config, fetcher })
    }
}
