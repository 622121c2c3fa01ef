//! Picker core module
//!
//! This module handles the picker's list model:
//! - Section/index mapping (layout.rs)
//! - Cell identifier registration (registry.rs)
//! - The composed data source the rendering surface talks to (datasource.rs)

pub mod datasource;
pub mod layout;
pub mod registry;
