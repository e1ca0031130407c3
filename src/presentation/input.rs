use crate::application::{App, AppMode};
use crate::domain::{Direction, SessionPhase};
use crate::presentation::ui::{CardLayout, contains};
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use std::time::Instant;

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, _modifiers: KeyModifiers, now: Instant) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, now),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, now: Instant) {
        if matches!(key, KeyCode::F(1) | KeyCode::Char('?')) {
            app.open_help();
            return;
        }

        match app.session.phase() {
            SessionPhase::Active => match key {
                KeyCode::Char(' ') | KeyCode::Enter => app.flip(),
                KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('k') => {
                    app.advance(Direction::Know, now)
                }
                KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('r') => {
                    app.advance(Direction::Repeat, now)
                }
                _ => {}
            },
            SessionPhase::Completed => {
                if matches!(key, KeyCode::Enter | KeyCode::Char('r')) {
                    app.restart();
                }
            }
            SessionPhase::Error(_) => {
                if key == KeyCode::F(5) {
                    app.reload();
                }
            }
            SessionPhase::Loading => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    /// Card drags become swipes or taps; the two buttons advance directly.
    pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, now: Instant) {
        if app.mode != AppMode::Normal {
            return;
        }
        let layout = CardLayout::new(app.screen);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => match app.session.phase() {
                SessionPhase::Active => {
                    if contains(layout.card, mouse.column, mouse.row) {
                        app.swipe.press(i32::from(mouse.column));
                    } else if contains(layout.repeat_button, mouse.column, mouse.row) {
                        app.advance(Direction::Repeat, now);
                    } else if contains(layout.know_button, mouse.column, mouse.row) {
                        app.advance(Direction::Know, now);
                    }
                }
                SessionPhase::Completed => {
                    if contains(layout.restart_button, mouse.column, mouse.row) {
                        app.restart();
                    }
                }
                _ => {}
            },
            MouseEventKind::Up(MouseButton::Left) => {
                if app.swipe.is_dragging() {
                    let gesture = app.swipe.release(i32::from(mouse.column));
                    app.apply_gesture(gesture, now);
                }
            }
            _ => {}
        }
    }
}
