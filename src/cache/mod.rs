// Cache module for local filesystem caching.
// Stores the last validated events payload per user for conditional requests.

pub mod paths;
pub mod store;

pub use paths::{cache_dir, cache_key, user_events_path};
pub use store::{CacheRecord, FileCache, MemoryCache, ValidatorCache};
