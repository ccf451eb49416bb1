// src/lib.rs

//! Vanguard Sentinel: a single-target website security checker.
//!
//! The library hosts everything the binary's subcommands share: the scan
//! pipeline, the report writers, the trigger endpoint and the log watcher.

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod report;
pub mod server;
pub mod watcher;

pub use error::{Result, SentinelError};
