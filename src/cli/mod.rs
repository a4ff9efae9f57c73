//! Command line interface module
//!
//! Argument parsing with environment fallbacks; the parsed arguments become
//! the [`crate::config::AppConfig`] the server runs with.

pub mod args;

pub use args::Args;
