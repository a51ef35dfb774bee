// GitHub API HTTP client.
// Handles conditional requests, rate limit observation, and status interpretation.

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, ETAG, HeaderMap, HeaderValue, IF_NONE_MATCH, USER_AGENT},
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{OctofeedError, Result};

use super::types::RateLimit;

const GITHUB_API_VERSION: &str = "2022-11-28";

/// What the server said about a conditional GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteResponse {
    /// 304: the validator we sent is still current.
    NotModified,
    /// 200 with a body and, usually, a new validator.
    Fresh { etag: Option<String>, body: String },
}

/// GitHub API client with rate limit tracking.
pub struct GitHubClient {
    client: Client,
    api_base: String,
    per_page: u32,
    rate_limit: RateLimit,
}

impl GitHubClient {
    /// Create a client from a validated configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| OctofeedError::Config(format!("invalid user agent: {}", e)))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            per_page: config.per_page,
            rate_limit: RateLimit::default(),
        })
    }

    /// Rate limit reported by the most recent response.
    pub fn rate_limit(&self) -> &RateLimit {
        &self.rate_limit
    }

    pub(crate) fn per_page(&self) -> u32 {
        self.per_page
    }

    /// GET `endpoint`, sending `If-None-Match` when a validator is known.
    pub async fn get_conditional<T: serde::Serialize + ?Sized>(
        &mut self,
        endpoint: &str,
        params: &T,
        etag: Option<&str>,
    ) -> Result<RemoteResponse> {
        let url = format!("{}{}", self.api_base, endpoint);
        let mut request = self.client.get(&url).query(params);

        if let Some(etag) = etag {
            match HeaderValue::from_str(etag) {
                Ok(value) => request = request.header(IF_NONE_MATCH, value),
                Err(_) => warn!(etag, "cached validator is not a valid header value, skipping"),
            }
        }

        debug!(%url, conditional = etag.is_some(), "sending request");
        let response = request.send().await?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Update rate limit from response headers and log it.
    fn update_rate_limit(&mut self, response: &Response) {
        let rate = RateLimit::from_headers(response.headers());
        if !rate.is_present() {
            return;
        }

        if rate.is_exhausted() {
            warn!(
                limit = ?rate.limit,
                reset_at = %rate.reset_display(),
                "GitHub rate limit exhausted"
            );
        } else {
            debug!(
                remaining = ?rate.remaining,
                limit = ?rate.limit,
                reset_at = %rate.reset_display(),
                "GitHub rate limit"
            );
        }

        self.rate_limit = rate;
    }

    /// Check response status and convert to a remote outcome.
    async fn check_response(&self, response: Response) -> Result<RemoteResponse> {
        match response.status() {
            StatusCode::NOT_MODIFIED => Ok(RemoteResponse::NotModified),
            StatusCode::OK => {
                let etag = response
                    .headers()
                    .get(ETAG)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                let body = response.text().await?;
                Ok(RemoteResponse::Fresh { etag, body })
            }
            StatusCode::NOT_FOUND => {
                let url = response.url().path().to_string();
                Err(OctofeedError::NotFound(url))
            }
            status => Err(OctofeedError::Status {
                status,
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_user_agent() {
        let config = Config {
            user_agent: "bad\nagent".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            GitHubClient::new(&config),
            Err(OctofeedError::Config(_))
        ));
    }

    #[test]
    fn test_new_starts_without_rate_limit() {
        let client = GitHubClient::new(&Config::default()).unwrap();
        assert!(!client.rate_limit().is_present());
        assert_eq!(client.per_page(), Config::default().per_page);
    }
}
