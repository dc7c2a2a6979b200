//! Infrastructure layer providing external service integrations.
//!
//! This module contains the key-value storage backends, configuration
//! loading, and log output setup.

pub mod config;
pub mod logging;
pub mod persistence;

pub use config::*;
pub use logging::*;
pub use persistence::*;
