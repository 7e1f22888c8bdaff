//! Request handlers.
//!
//! Each submodule provides async handler functions for one route group.
//! Handlers return [`AppResult`](crate::error::AppResult); errors become
//! HTTP responses only in [`AppError`](crate::error::AppError)'s
//! `IntoResponse` impl.

pub mod reports;
pub mod uploads;
