//! Application layer managing state and user workflows.
//!
//! This module coordinates between the domain layer and presentation layer:
//! it owns the deck session, runs the background load, times each advance
//! and classifies card gestures.

pub mod state;
pub mod gesture;

pub use state::*;
pub use gesture::*;
