// crates/retag/src/lib.rs
// retag - image reference updater for deployment manifests

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod catalog;
pub mod config;
pub mod diff;
pub mod error;
pub mod flow;
pub mod http;
pub mod mcp_client;
pub mod patch;
pub mod prompt;

pub use error::{Result, RetagError};
