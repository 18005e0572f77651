#![forbid(unsafe_code)]

//! Slack bot that approves GitHub pull requests linked in messages.

pub mod app;
pub mod clock;
pub mod config;
pub mod dedup;
pub mod errors;
pub mod extract;
pub mod github;
pub mod http;
pub mod models;
pub mod processor;
pub mod routing;
pub mod slack;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
