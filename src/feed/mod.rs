// Activity feed pipeline.
// Fetches events with cache revalidation, classifies them, and aggregates a report.

pub mod aggregate;
pub mod classify;
pub mod fetcher;

pub use aggregate::{ActionSummary, RepoCount, Report, aggregate};
pub use classify::{ClassifiedEvent, classify, classify_event};
pub use fetcher::{ConditionalFetcher, EventSource, FetchOutcome, FetchResult};
