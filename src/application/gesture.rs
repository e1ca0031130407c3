//! Horizontal drag classification for the card surface.

use crate::domain::Direction;

/// Outcome of a completed press/release pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Press and release at the same spot
    Tap,
    /// Drag past the threshold
    Swipe(Direction),
    /// Short drag or release without a press
    None,
}

/// Tracks one drag at a time and classifies it on release.
///
/// Coordinates are in whatever unit the caller uses (terminal columns for
/// the TUI); the threshold is in the same unit.
///
/// # Examples
///
/// ```
/// use menudeck::application::{Gesture, SwipeDetector};
/// use menudeck::domain::Direction;
///
/// let mut detector = SwipeDetector::new(50);
/// detector.press(100);
/// assert_eq!(detector.release(180), Gesture::Swipe(Direction::Know));
/// ```
#[derive(Debug, Clone)]
pub struct SwipeDetector {
    start_x: Option<i32>,
    threshold: u32,
}

impl SwipeDetector {
    pub fn new(threshold: u32) -> Self {
        Self {
            start_x: None,
            threshold,
        }
    }

    pub fn press(&mut self, x: i32) {
        self.start_x = Some(x);
    }

    pub fn is_dragging(&self) -> bool {
        self.start_x.is_some()
    }

    pub fn cancel(&mut self) {
        self.start_x = None;
    }

    pub fn release(&mut self, x: i32) -> Gesture {
        let Some(start) = self.start_x.take() else {
            return Gesture::None;
        };

        let delta = x - start;
        if delta.unsigned_abs() > self.threshold {
            if delta > 0 {
                Gesture::Swipe(Direction::Know)
            } else {
                Gesture::Swipe(Direction::Repeat)
            }
        } else if delta == 0 {
            Gesture::Tap
        } else {
            Gesture::None
        }
    }
}
