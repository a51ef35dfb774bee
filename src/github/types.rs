// GitHub API response types.
// Defines the event records returned by the public events endpoint.

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

/// A single public event from `/users/{user}/events`.
///
/// Only `event_type` and `repo.name` drive classification and must be
/// well formed. Everything else is kept so the cached copy mirrors what the
/// server sent, and an unexpected shape there reads as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub repo: EventRepo,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub actor: Option<EventActor>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl RawEvent {
    /// Build a minimal event (used by tests and fixtures).
    pub fn new(event_type: impl Into<String>, repo_name: impl Into<String>) -> Self {
        Self {
            id: None,
            event_type: event_type.into(),
            repo: EventRepo {
                id: None,
                name: repo_name.into(),
                url: None,
            },
            actor: None,
            public: None,
            created_at: None,
        }
    }

    pub fn repo_name(&self) -> &str {
        &self.repo.name
    }
}

/// Repository an event happened in (`owner/name`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRepo {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// User that triggered an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventActor {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Deserialize an optional field, treating a value of the wrong shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: Option<u64>,
    pub remaining: Option<u64>,
    /// Unix timestamp at which the quota resets.
    pub reset: Option<u64>,
}

impl RateLimit {
    /// Read the `x-ratelimit-*` headers; missing or unparsable values stay `None`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
        };

        Self {
            limit: read("x-ratelimit-limit"),
            remaining: read("x-ratelimit-remaining"),
            reset: read("x-ratelimit-reset"),
        }
    }

    pub fn is_present(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Reset time formatted as `HH:MM:SS` UTC.
    pub fn reset_display(&self) -> String {
        self.reset
            .and_then(|reset| DateTime::from_timestamp(reset as i64, 0))
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}
