pub mod cache_store;
pub mod config;
pub mod fetcher;
pub mod race_utils;
pub mod state;
pub mod theme;
