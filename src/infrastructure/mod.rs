//! Infrastructure layer providing external service integrations.
//!
//! This module contains the HTTP item source for the hosted menu table and
//! the runtime settings it is built from.

pub mod catalog;
pub mod config;

pub use catalog::*;
pub use config::*;
