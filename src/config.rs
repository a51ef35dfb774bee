// Runtime configuration.
// Defaults target the public GitHub API; the CLI overrides individual fields.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache;
use crate::error::{OctofeedError, Result};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// GitHub caps `per_page` at 100 for the events endpoint.
pub const MAX_PER_PAGE: u32 = 100;

pub const DEFAULT_PER_PAGE: u32 = 30;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST API, without a trailing slash.
    pub api_base: String,
    pub user_agent: String,
    /// Events requested in the single page we fetch.
    pub per_page: u32,
    pub timeout: Duration,
    /// Overrides the platform cache directory when set.
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: format!("octofeed/{}", env!("CARGO_PKG_VERSION")),
            per_page: DEFAULT_PER_PAGE,
            timeout: DEFAULT_TIMEOUT,
            cache_dir: None,
        }
    }
}

impl Config {
    /// Check field ranges and normalize the API base.
    pub fn validate(mut self) -> Result<Self> {
        let trimmed = self.api_base.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(OctofeedError::Config("api base URL is empty".to_string()));
        }
        self.api_base = trimmed.to_string();

        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(OctofeedError::Config(format!(
                "per_page must be between 1 and {}, got {}",
                MAX_PER_PAGE, self.per_page
            )));
        }

        if self.timeout.is_zero() {
            return Err(OctofeedError::Config("timeout must be non-zero".to_string()));
        }

        Ok(self)
    }

    /// Directory holding cached event records.
    pub fn resolved_cache_dir(&self) -> Option<PathBuf> {
        self.cache_dir.clone().or_else(cache::cache_dir)
    }
}
