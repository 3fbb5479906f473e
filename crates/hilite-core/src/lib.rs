//! # hilite-core
//!
//! Core types, traits, and configuration for hilite.
//!
//! This crate provides the item/annotation/note data model, the
//! [`LibraryHost`] trait through which every read and mutation of the
//! reference library happens, and the configuration that drives a summary run.

pub mod config;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use config::{ConfigError, ConfigResult, SummaryConfig};
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
