//! Command-line dashboard over calendar feeds.
//!
//! This crate provides the `nexusboard` command-line interface: the agenda
//! and month views, single-feed checks and a self-refreshing watch mode.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;

pub use cli::Cli;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
