//! Issue submission to the external tracker (GitHub REST API).

pub mod client;
pub mod error;

pub use client::{CreatedIssue, GitHubTracker, RepoRef, DEFAULT_API_URL};
pub use error::TrackerError;
