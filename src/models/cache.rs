use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One persisted API response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub data: Value,
}

impl CacheEntry {
    pub fn new(data: Value, timestamp: DateTime<Utc>) -> Self {
        Self { timestamp, data }
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.timestamp
    }

    pub fn is_fresh(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        self.age(now) < max_age
    }
}

/// Where the data handed to a widget came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Freshness {
    Live,
    Cached(Duration),
    Stale(Duration),
}

impl Freshness {
    pub fn label(&self) -> String {
        match self {
            Freshness::Live => "live".to_string(),
            Freshness::Cached(age) => format!("cached {}", relative_age(*age)),
            Freshness::Stale(age) => format!("stale {}", relative_age(*age)),
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Freshness::Stale(_))
    }
}

/// Compact "time ago" text, e.g. `5m ago`.
pub fn relative_age(age: Duration) -> String {
    if age < Duration::minutes(1) {
        "just now".to_string()
    } else if age < Duration::hours(1) {
        format!("{}m ago", age.num_minutes())
    } else if age < Duration::days(1) {
        format!("{}h ago", age.num_hours())
    } else {
        format!("{}d ago", age.num_days())
    }
}
