//! Deck session state machine.
//!
//! A session owns one shuffled deck and the user's position in it. The
//! advance operation is split in two phases so that callers can play an
//! exit animation between [`DeckSession::begin_advance`] and
//! [`DeckSession::commit_advance`].

use super::errors::FetchResult;
use super::models::MenuItem;
use super::source::ItemSource;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, error, info};

/// User-facing message shown when the deck could not be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Could not load the menu. Press F5 to try again.";

/// Which way the current card leaves the screen.
///
/// Only the exit animation depends on it; both directions advance the deck
/// by exactly one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The user knows this item (card slides right)
    Know,
    /// The user wants to see this item again (card slides left)
    Repeat,
}

/// Observable phase of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Error(String),
    Active,
    Completed,
}

#[derive(Debug)]
enum DeckState {
    Loading,
    Failed(String),
    Ready,
}

/// One continuous run through a shuffled deck.
///
/// # Examples
///
/// ```
/// use menudeck::domain::{DeckSession, Direction, MenuItem, SessionPhase, StaticItemSource};
///
/// let source = StaticItemSource::new(vec![MenuItem::new(1, "Tea")]);
/// let mut session = DeckSession::new();
/// session.load(&source);
/// assert_eq!(session.phase(), SessionPhase::Active);
///
/// session.advance(Direction::Know);
/// assert_eq!(session.phase(), SessionPhase::Completed);
/// ```
#[derive(Debug)]
pub struct DeckSession {
    state: DeckState,
    deck: Vec<MenuItem>,
    position: usize,
    flipped: bool,
    transitioning: Option<Direction>,
    rng: StdRng,
}

impl Default for DeckSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckSession {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates a session with a caller-provided random source.
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            state: DeckState::Loading,
            deck: Vec::new(),
            position: 0,
            flipped: false,
            transitioning: None,
            rng,
        }
    }

    /// Fetches the active items from `source` and starts the session.
    pub fn load(&mut self, source: &dyn ItemSource) {
        let result = source.fetch_active_items();
        self.finish_load(result);
    }

    /// Applies the outcome of a fetch that was performed elsewhere.
    pub fn finish_load(&mut self, result: FetchResult<Vec<MenuItem>>) {
        self.position = 0;
        self.flipped = false;
        self.transitioning = None;

        match result {
            Ok(mut items) => {
                items.shuffle(&mut self.rng);
                info!(items = items.len(), "deck loaded");
                self.deck = items;
                self.state = DeckState::Ready;
            }
            Err(err) => {
                error!(error = %err, "deck load failed");
                self.deck.clear();
                self.state = DeckState::Failed(LOAD_FAILED_MESSAGE.to_string());
            }
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match &self.state {
            DeckState::Loading => SessionPhase::Loading,
            DeckState::Failed(message) => SessionPhase::Error(message.clone()),
            DeckState::Ready if self.position < self.deck.len() => SessionPhase::Active,
            DeckState::Ready => SessionPhase::Completed,
        }
    }

    /// The card at the current position, if any.
    pub fn current_item(&self) -> Option<&MenuItem> {
        match self.state {
            DeckState::Ready => self.deck.get(self.position),
            _ => None,
        }
    }

    /// Toggles the current card. Ignored when there is no current card or
    /// while a card is leaving the screen.
    pub fn flip(&mut self) -> bool {
        if self.current_item().is_none() || self.transitioning.is_some() {
            return false;
        }
        self.flipped = !self.flipped;
        true
    }

    /// Starts moving past the current card.
    ///
    /// Returns `false` without touching any state when there is no current
    /// card or another advance is still in flight.
    pub fn begin_advance(&mut self, direction: Direction) -> bool {
        if self.current_item().is_none() || self.transitioning.is_some() {
            return false;
        }
        debug!(position = self.position, ?direction, "advance started");
        self.transitioning = Some(direction);
        self.flipped = false;
        true
    }

    /// Finishes the in-flight advance, if there is one.
    pub fn commit_advance(&mut self) -> bool {
        if self.transitioning.take().is_none() {
            return false;
        }
        self.position = (self.position + 1).min(self.deck.len());
        if self.position == self.deck.len() {
            info!(cards = self.deck.len(), "deck completed");
        }
        true
    }

    /// Advances without an animation delay.
    pub fn advance(&mut self, direction: Direction) -> bool {
        self.begin_advance(direction) && self.commit_advance()
    }

    /// Reshuffles the same items and starts over. Only valid once the deck
    /// has been completed.
    pub fn restart(&mut self) -> bool {
        if self.phase() != SessionPhase::Completed {
            return false;
        }
        self.deck.shuffle(&mut self.rng);
        self.position = 0;
        self.flipped = false;
        self.transitioning = None;
        info!(items = self.deck.len(), "deck restarted");
        true
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped && self.current_item().is_some()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning.is_some()
    }

    /// Direction of the advance currently in flight.
    pub fn exit_direction(&self) -> Option<Direction> {
        self.transitioning
    }

    /// One-based card number and deck size, e.g. `(3, 10)` for "card 3 of 10".
    pub fn progress(&self) -> (usize, usize) {
        let total = self.deck.len();
        ((self.position + 1).min(total), total)
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.deck
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FetchError, StaticItemSource};

    fn seeded() -> DeckSession {
        DeckSession::with_rng(StdRng::seed_from_u64(7))
    }

    fn items(n: i64) -> Vec<MenuItem> {
        (1..=n).map(|id| MenuItem::new(id, format!("Item {id}"))).collect()
    }

    fn sorted_ids(session: &DeckSession) -> Vec<i64> {
        let mut ids: Vec<i64> = session.items().iter().map(|i| i.id).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_new_session_is_loading() {
        let session = seeded();
        assert_eq!(session.phase(), SessionPhase::Loading);
        assert!(session.current_item().is_none());
    }

    #[test]
    fn test_load_produces_permutation() {
        let mut session = seeded();
        session.load(&StaticItemSource::new(items(20)));

        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.position(), 0);
        assert!(!session.is_flipped());
        assert_eq!(sorted_ids(&session), (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn test_load_skips_inactive_items() {
        let mut all = items(3);
        all[1].is_active = false;

        let mut session = seeded();
        session.load(&StaticItemSource::new(all));

        assert_eq!(sorted_ids(&session), vec![1, 3]);
    }

    #[test]
    fn test_empty_load_is_completed() {
        let mut session = seeded();
        session.load(&StaticItemSource::new(Vec::new()));

        assert_eq!(session.phase(), SessionPhase::Completed);
        assert!(!session.flip());
        assert!(!session.begin_advance(Direction::Know));
        assert_eq!(session.progress(), (0, 0));
    }

    #[test]
    fn test_failed_load_enters_error() {
        let mut session = seeded();
        session.load(&StaticItemSource::failing(FetchError::Transport(
            "connection refused".to_string(),
        )));

        assert_eq!(
            session.phase(),
            SessionPhase::Error(LOAD_FAILED_MESSAGE.to_string())
        );
        assert!(session.is_empty());
        assert!(!session.flip());
        assert!(!session.advance(Direction::Know));
        assert!(!session.restart());
    }

    #[test]
    fn test_flip_toggles_once_per_call() {
        let mut session = seeded();
        session.load(&StaticItemSource::new(items(2)));

        assert!(session.flip());
        assert!(session.is_flipped());
        assert!(session.flip());
        assert!(!session.is_flipped());
    }

    #[test]
    fn test_advance_while_transitioning_is_ignored() {
        let mut session = seeded();
        session.load(&StaticItemSource::new(items(3)));

        assert!(session.begin_advance(Direction::Know));
        assert!(!session.begin_advance(Direction::Repeat));
        assert!(!session.advance(Direction::Know));
        assert_eq!(session.position(), 0);
        assert_eq!(session.exit_direction(), Some(Direction::Know));

        assert!(session.commit_advance());
        assert_eq!(session.position(), 1);
        assert!(!session.commit_advance());
        assert_eq!(session.position(), 1);
    }

    #[test]
    fn test_flip_ignored_while_transitioning() {
        let mut session = seeded();
        session.load(&StaticItemSource::new(items(2)));
        session.flip();

        session.begin_advance(Direction::Repeat);
        assert!(!session.is_flipped());
        assert!(!session.flip());
        assert!(!session.is_flipped());
    }

    #[test]
    fn test_completed_ignores_advance_and_flip() {
        let mut session = seeded();
        session.load(&StaticItemSource::new(items(1)));
        session.advance(Direction::Repeat);

        assert_eq!(session.phase(), SessionPhase::Completed);
        assert!(!session.advance(Direction::Know));
        assert!(!session.flip());
        assert_eq!(session.position(), 1);
    }

    #[test]
    fn test_restart_only_from_completed() {
        let mut session = seeded();
        session.load(&StaticItemSource::new(items(2)));

        assert!(!session.restart());
        session.advance(Direction::Know);
        assert!(!session.restart());
        assert_eq!(session.position(), 1);
    }

    #[test]
    fn test_restart_reshuffles_same_items() {
        let mut session = seeded();
        session.load(&StaticItemSource::new(items(12)));
        let first_order: Vec<i64> = session.items().iter().map(|i| i.id).collect();

        while session.advance(Direction::Know) {}
        assert!(session.restart());

        let second_order: Vec<i64> = session.items().iter().map(|i| i.id).collect();
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.position(), 0);
        assert_eq!(sorted_ids(&session), (1..=12).collect::<Vec<_>>());
        assert_ne!(first_order, second_order);
    }

    #[test]
    fn test_restart_empty_deck_stays_completed() {
        let mut session = seeded();
        session.load(&StaticItemSource::new(Vec::new()));

        assert!(session.restart());
        assert_eq!(session.phase(), SessionPhase::Completed);
    }

    #[test]
    fn test_three_card_walkthrough() {
        let mut session = seeded();
        session.load(&StaticItemSource::new(vec![
            MenuItem::new(1, "A"),
            MenuItem::new(2, "B"),
            MenuItem::new(3, "C"),
        ]));
        assert_eq!(session.position(), 0);
        assert_eq!(session.progress(), (1, 3));

        session.begin_advance(Direction::Know);
        session.commit_advance();
        assert_eq!(session.position(), 1);
        assert!(!session.is_flipped());

        session.flip();
        assert!(session.is_flipped());

        session.begin_advance(Direction::Repeat);
        session.commit_advance();
        assert_eq!(session.position(), 2);
        assert!(!session.is_flipped());

        session.advance(Direction::Know);
        assert_eq!(session.position(), 3);
        assert_eq!(session.phase(), SessionPhase::Completed);
        assert_eq!(session.progress(), (3, 3));

        session.restart();
        assert_eq!(session.position(), 0);
        assert_eq!(session.phase(), SessionPhase::Active);
    }
}
