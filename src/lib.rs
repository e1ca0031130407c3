//! menudeck - Terminal Menu Flashcards Library
//!
//! Learn a restaurant menu one shuffled card at a time, in the terminal.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
