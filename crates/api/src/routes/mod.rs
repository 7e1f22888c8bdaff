//! Route tree.
//!
//! ```text
//! GET    /health              health check
//! POST   /upload-vessel       upload a vessel file
//! POST   /upload              alias of /upload-vessel
//! POST   /report              submit a bug report
//! POST   /submit-bug          alias of /report for older clients
//! GET    /uploads/{file}      stored files (static)
//! ```

pub mod health;
pub mod reports;
pub mod uploads;
