//! FPL League Tracker
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod stats;
pub mod storage;
pub mod types;
