//! Thumbnail fetching module
//!
//! This module handles:
//! - The asynchronous fetch backend seam and the file-backed backend (backend.rs)
//! - Outstanding fetch tracking and stale-result suppression (cache.rs)

pub mod backend;
pub mod cache;
