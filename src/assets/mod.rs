//! Asset access module
//!
//! This module handles everything between the host's media library and
//! the picker grid:
//! - Shared data structures (data.rs)
//! - The repository seam and criteria types (repository.rs)
//! - A folder-backed repository (folder.rs)
//! - The effective fetch result and its default policy (provider.rs)

pub mod data;
pub mod folder;
pub mod provider;
pub mod repository;
