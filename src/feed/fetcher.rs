// Conditional fetcher.
// Pairs the validator cache with an event source and applies the stale-on-failure policy.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::cache::{CacheRecord, ValidatorCache};
use crate::error::{OctofeedError, Result};
use crate::github::{RawEvent, RemoteResponse};

/// Anything that can answer a conditional request for a user's events.
#[async_trait]
pub trait EventSource: Send {
    /// Fetch events for `identity`, sending `etag` as a precondition when given.
    async fn fetch_events(&mut self, identity: &str, etag: Option<&str>) -> Result<RemoteResponse>;
}

/// Result of one fetch, with the reason when live data could not be used.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Server confirmed the cached events are current.
    NotModified(Vec<RawEvent>),
    /// Server sent new events; they have been cached.
    Fresh(Vec<RawEvent>),
    /// Live fetch failed; events are the last cached copy or empty.
    Degraded {
        events: Vec<RawEvent>,
        reason: OctofeedError,
    },
}

/// Flattened view for callers that only want the events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub events: Vec<RawEvent>,
    pub served_from_cache: bool,
}

impl FetchOutcome {
    pub fn events(&self) -> &[RawEvent] {
        match self {
            FetchOutcome::NotModified(events)
            | FetchOutcome::Fresh(events)
            | FetchOutcome::Degraded { events, .. } => events,
        }
    }

    pub fn served_from_cache(&self) -> bool {
        !matches!(self, FetchOutcome::Fresh(_))
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, FetchOutcome::Degraded { .. })
    }

    /// True when the upstream said the user does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchOutcome::Degraded { reason, .. } if reason.is_not_found())
    }

    pub fn error(&self) -> Option<&OctofeedError> {
        match self {
            FetchOutcome::Degraded { reason, .. } => Some(reason),
            _ => None,
        }
    }

    pub fn into_result(self) -> FetchResult {
        let served_from_cache = self.served_from_cache();
        let events = match self {
            FetchOutcome::NotModified(events)
            | FetchOutcome::Fresh(events)
            | FetchOutcome::Degraded { events, .. } => events,
        };
        FetchResult {
            events,
            served_from_cache,
        }
    }
}

/// Fetches a user's events, revalidating against the cached ETag.
pub struct ConditionalFetcher<S, C> {
    source: S,
    cache: C,
}

impl<S: EventSource, C: ValidatorCache> ConditionalFetcher<S, C> {
    pub fn new(source: S, cache: C) -> Self {
        Self { source, cache }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch events for `identity`. Never fails; see [`FetchOutcome`].
    pub async fn fetch(&mut self, identity: &str) -> FetchOutcome {
        // The request and the cache key must name the same user.
        let identity = identity.trim();
        let record = self.cache.load(identity);
        let etag = record.as_ref().and_then(|r| r.etag.as_deref());

        let live = self.fetch_live(identity, etag, record.is_some()).await;

        match live {
            Ok(Live::NotModified) => match record {
                Some(record) => {
                    info!(identity, events = record.events.len(), "events not modified, using cache");
                    FetchOutcome::NotModified(record.events)
                }
                None => degrade(identity, None, OctofeedError::UnexpectedNotModified),
            },
            Ok(Live::Fresh(new_record)) => {
                if let Err(e) = self.cache.store(identity, &new_record) {
                    warn!(identity, error = %e, "failed to write cache record");
                }
                info!(identity, events = new_record.events.len(), "fetched fresh events");
                FetchOutcome::Fresh(new_record.events)
            }
            Err(e) => degrade(identity, record, e),
        }
    }

    async fn fetch_live(
        &mut self,
        identity: &str,
        etag: Option<&str>,
        have_record: bool,
    ) -> Result<Live> {
        debug!(identity, etag = ?etag, have_record, "fetching events");
        match self.source.fetch_events(identity, etag).await? {
            RemoteResponse::NotModified => Ok(Live::NotModified),
            RemoteResponse::Fresh { etag, body } => {
                let events: Vec<RawEvent> =
                    serde_json::from_str(&body).map_err(OctofeedError::MalformedResponse)?;
                Ok(Live::Fresh(CacheRecord::new(etag, events)))
            }
        }
    }
}

enum Live {
    NotModified,
    Fresh(CacheRecord),
}

fn degrade(identity: &str, record: Option<CacheRecord>, reason: OctofeedError) -> FetchOutcome {
    let events = record.map(|r| r.events).unwrap_or_default();
    if reason.is_not_found() {
        info!(identity, "user not found upstream");
    } else {
        warn!(identity, error = %reason, stale_events = events.len(), "fetch failed, serving cached events");
    }
    FetchOutcome::Degraded { events, reason }
}
