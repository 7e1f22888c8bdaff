//! Domain logic for the bug relay service.
//!
//! Everything in this crate is pure: normalizing inbound reports, composing
//! the markdown issue body, deriving labels and deciding how uploaded files
//! are named. I/O lives in `bugrelay-api` and `bugrelay-tracker`.

pub mod body;
pub mod error;
pub mod labels;
pub mod report;
pub mod upload;
