//! octofeed: summarize a GitHub user's recent public activity.
//!
//! Events are fetched with `If-None-Match` revalidation against a local
//! cache, fall back to the last good copy when GitHub is unreachable, and are
//! grouped into a [`feed::Report`] by action and repository.

pub mod cache;
pub mod config;
pub mod error;
pub mod feed;
pub mod github;
pub mod render;
pub mod telemetry;

pub use error::{OctofeedError, Result};
