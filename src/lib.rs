//! Clipcheck - video authenticity analysis service
//!
//! This library crate exposes the core functionality for integration testing.

pub mod analysis;
pub mod config;
pub mod error;
pub mod scoring;
pub mod server;
pub mod storage;

pub use error::{Error, Result};
