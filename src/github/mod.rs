// GitHub API module.
// Provides the client and types for the public events endpoint.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{GitHubClient, RemoteResponse};
pub use types::*;
