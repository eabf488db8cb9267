//! # CMA Common Library
//!
//! Shared code for the Chiang Mai Activities data tools including:
//! - Canonical activity model (the JSON item store record)
//! - Error types
//! - Data directory resolution
//! - JSON store access (backup, atomic replace)

pub mod config;
pub mod error;
pub mod model;
pub mod store;

pub use error::{Error, Result};
pub use model::ActivityItem;
