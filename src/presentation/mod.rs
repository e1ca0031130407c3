//! Presentation layer handling terminal UI and user input.
//!
//! This module manages the terminal user interface using ratatui,
//! maps keyboard and mouse input onto deck operations, and renders the
//! loading, error, card and completion views.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
