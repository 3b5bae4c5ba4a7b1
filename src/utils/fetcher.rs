//! Fetch-with-cache-and-fallback shared by every widget.
//!
//! A fresh cache entry is served without touching the network. Otherwise the
//! remote is fetched, validated and persisted. When the refresh fails for any
//! reason, whatever readable entry exists is served regardless of age; only
//! with no usable entry at all does the caller see an error.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde_json::{from_str, Value};
use tracing::{debug, error, info, warn};

use crate::models::{
    cache::{relative_age, CacheEntry, Freshness},
    error::Error,
};
use crate::utils::cache_store::CacheStore;

/// Checks that a response has the shape a widget needs.
pub type Validator = fn(&Value) -> Result<(), Error>;

pub fn accept_any(_: &Value) -> Result<(), Error> {
    Ok(())
}

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub cache_key: String,
    pub max_age: Duration,
    pub validate: Validator,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, cache_key: &str, max_age: Duration) -> Self {
        Self {
            url: url.into(),
            cache_key: cache_key.to_string(),
            max_age,
            validate: accept_any,
        }
    }

    pub fn validated_by(mut self, validate: Validator) -> Self {
        self.validate = validate;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Fetched {
    pub data: Value,
    pub freshness: Freshness,
}

/// Where widgets get their data from.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_json(&self, request: &FetchRequest) -> Result<Fetched, Error>;

    /// Local path of a cached image, downloading it when missing or older
    /// than `max_age`. `None` means no image could be produced.
    async fn fetch_image(&self, url: &str, key: &str, max_age: Option<Duration>)
        -> Option<PathBuf>;
}

#[derive(Debug, Clone)]
pub struct CachedFetcher {
    client: Client,
    store: CacheStore,
}

impl CachedFetcher {
    pub fn new(client: Client, store: CacheStore) -> Self {
        Self { client, store }
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Parsed JSON for `url`, from cache when younger than `max_age`.
    pub async fn fetch_with_cache(
        &self,
        url: &str,
        cache_key: &str,
        max_age: Duration,
    ) -> Result<Value, Error> {
        let request = FetchRequest::new(url, cache_key, max_age);
        Ok(self.fetch_at(&request, Utc::now()).await?.data)
    }

    pub async fn fetch_at(
        &self,
        request: &FetchRequest,
        now: DateTime<Utc>,
    ) -> Result<Fetched, Error> {
        let key = request.cache_key.as_str();
        let cached = self.store.read(key).await;

        if let Some(entry) = &cached {
            let age = entry.age(now);
            if entry.is_fresh(request.max_age, now) {
                match (request.validate)(&entry.data) {
                    Ok(()) => {
                        info!("Using cached data for {key} ({})", relative_age(age));
                        return Ok(Fetched {
                            data: entry.data.clone(),
                            freshness: Freshness::Cached(age),
                        });
                    }
                    Err(e) => debug!("Cached {key} is unusable ({e}), fetching fresh data"),
                }
            } else {
                debug!("Cache for {key} too old ({}), fetching fresh data", relative_age(age));
            }
        }

        match self.fetch_remote(request).await {
            Ok(data) => {
                let entry = CacheEntry::new(data, now);
                if let Err(e) = self.store.write(key, &entry).await {
                    warn!("Cache write failed for {key}: {e}");
                }
                info!("Fetched fresh data for {key}");
                Ok(Fetched {
                    data: entry.data,
                    freshness: Freshness::Live,
                })
            }
            Err(fetch_err) => {
                warn!("Unable to fetch {}: {fetch_err}", request.url);
                match cached {
                    Some(entry) if (request.validate)(&entry.data).is_ok() => {
                        let age = entry.age(now);
                        warn!("Serving stale cache for {key} ({})", relative_age(age));
                        Ok(Fetched {
                            data: entry.data,
                            freshness: Freshness::Stale(age),
                        })
                    }
                    _ => {
                        error!("Unable to fetch data or read from cache for {key}");
                        Err(match fetch_err {
                            Error::InvalidData(_) => fetch_err,
                            _ => Error::Fetch("API request failed".to_string()),
                        })
                    }
                }
            }
        }
    }

    async fn fetch_remote(&self, request: &FetchRequest) -> Result<Value, Error> {
        let data = self.get_json(&request.url).await?;
        (request.validate)(&data)?;
        Ok(data)
    }

    async fn get_json(&self, url: &str) -> Result<Value, Error> {
        let res = self.client.get(url).send().await?;
        if !res.status().is_success() {
            return Err((res.status().as_u16(), url).into());
        }
        let body = res.text().await?;
        Ok(from_str(&body)?)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, Error> {
        let res = self.client.get(url).send().await?;
        if !res.status().is_success() {
            return Err((res.status().as_u16(), url).into());
        }
        Ok(res.bytes().await?.to_vec())
    }
}

#[async_trait]
impl DataSource for CachedFetcher {
    async fn fetch_json(&self, request: &FetchRequest) -> Result<Fetched, Error> {
        self.fetch_at(request, Utc::now()).await
    }

    async fn fetch_image(
        &self,
        url: &str,
        key: &str,
        max_age: Option<Duration>,
    ) -> Option<PathBuf> {
        let existing = self.store.image_age(key, Utc::now()).await;
        if let Some(age) = existing {
            if max_age.map_or(true, |max| age < max) {
                return Some(self.store.image_path(key));
            }
        }

        let bytes = match self.get_bytes(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Image error for {key}: {e}");
                return existing.map(|_| self.store.image_path(key));
            }
        };

        match self.store.write_image(key, &bytes).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Image cache write failed for {key}: {e}");
                existing.map(|_| self.store.image_path(key))
            }
        }
    }
}
