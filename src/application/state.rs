//! Application state for the flashcard screen.
//!
//! [`App`] owns one deck session, the background load that feeds it and the
//! timer that completes each advance once the exit animation has played.

use crate::application::gesture::{Gesture, SwipeDetector};
use crate::domain::{
    DeckSession, Direction, FetchError, FetchResult, ItemSource, MenuItem, SessionPhase,
};
use crate::infrastructure::Settings;
use ratatui::layout::Rect;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// How often the event loop wakes up when nothing is scheduled.
pub const IDLE_TICK: Duration = Duration::from_millis(100);

/// Which overlay, if any, is on top of the card screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Card screen receives input
    Normal,
    /// Key reference popup is displayed
    Help,
}

/// Main application state.
pub struct App {
    /// The deck session currently on screen
    pub session: DeckSession,
    pub mode: AppMode,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Drag tracking for the card surface
    pub swipe: SwipeDetector,
    /// Full terminal area as of the last draw
    pub screen: Rect,
    /// Symbol printed after prices
    pub currency: String,
    source: Arc<dyn ItemSource>,
    pending_load: Option<Receiver<FetchResult<Vec<MenuItem>>>>,
    advance_delay: Duration,
    advance_deadline: Option<Instant>,
}

impl App {
    pub fn new(source: Arc<dyn ItemSource>, settings: &Settings) -> Self {
        Self {
            session: DeckSession::new(),
            mode: AppMode::Normal,
            help_scroll: 0,
            swipe: SwipeDetector::new(settings.swipe_threshold),
            screen: Rect::default(),
            currency: settings.currency.clone(),
            source,
            pending_load: None,
            advance_delay: settings.advance_delay(),
            advance_deadline: None,
        }
    }

    /// Replaces the session with a fresh one and fetches the deck on a
    /// background thread. Ignored while a fetch is already running.
    pub fn start_load(&mut self) {
        if self.pending_load.is_some() {
            return;
        }

        self.session = DeckSession::new();
        self.advance_deadline = None;
        self.swipe.cancel();

        let (tx, rx) = mpsc::channel();
        let source = Arc::clone(&self.source);
        thread::spawn(move || {
            // The receiver is gone only if the app quit mid-fetch.
            let _ = tx.send(source.fetch_active_items());
        });
        self.pending_load = Some(rx);
        info!("deck load started");
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Applies a finished background fetch. Returns `true` once the result
    /// has been handed to the session.
    pub fn poll_load(&mut self) -> bool {
        let Some(rx) = self.pending_load.as_ref() else {
            return false;
        };

        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                warn!("deck loader exited without a result");
                Err(FetchError::Transport("loader thread stopped".to_string()))
            }
        };

        self.pending_load = None;
        self.session.finish_load(result);
        true
    }

    /// Full reload, available from the error screen.
    pub fn reload(&mut self) {
        if matches!(self.session.phase(), SessionPhase::Error(_)) {
            self.start_load();
        }
    }

    pub fn flip(&mut self) {
        self.session.flip();
    }

    /// Starts the exit animation for the current card. The position moves
    /// on when [`App::tick`] sees the delay has passed.
    pub fn advance(&mut self, direction: Direction, now: Instant) {
        if !self.session.begin_advance(direction) {
            return;
        }
        if self.advance_delay.is_zero() {
            self.session.commit_advance();
        } else {
            self.advance_deadline = Some(now + self.advance_delay);
        }
    }

    /// Completes a pending advance whose delay has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.advance_deadline {
            if now >= deadline {
                self.advance_deadline = None;
                self.session.commit_advance();
            }
        }
    }

    pub fn restart(&mut self) {
        self.session.restart();
    }

    /// Maps a finished drag on the card onto a deck operation.
    pub fn apply_gesture(&mut self, gesture: Gesture, now: Instant) {
        match gesture {
            Gesture::Tap => self.flip(),
            Gesture::Swipe(direction) => self.advance(direction, now),
            Gesture::None => {}
        }
    }

    /// How long the event loop may block before the next scheduled change.
    pub fn next_wakeup(&self, now: Instant) -> Duration {
        match self.advance_deadline {
            Some(deadline) => deadline.saturating_duration_since(now).min(IDLE_TICK),
            None => IDLE_TICK,
        }
    }

    /// Fraction of the exit animation that has played, in `0.0..=1.0`.
    pub fn exit_progress(&self, now: Instant) -> f32 {
        match self.advance_deadline {
            Some(deadline) if !self.advance_delay.is_zero() => {
                let remaining = deadline.saturating_duration_since(now).as_secs_f32();
                (1.0 - remaining / self.advance_delay.as_secs_f32()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    pub fn open_help(&mut self) {
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    pub fn close_help(&mut self) {
        self.mode = AppMode::Normal;
    }
}
