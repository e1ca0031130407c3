use crate::application::{App, AppMode};
use crate::domain::{Direction, MenuItem, SessionPhase};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use std::time::Instant;

const CARD_MAX_WIDTH: u16 = 48;
const COMPLETION_WIDTH: u16 = 40;
const COMPLETION_HEIGHT: u16 = 9;

/// Screen regions of the card view, shared by rendering and mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLayout {
    pub title: Rect,
    pub card: Rect,
    pub repeat_button: Rect,
    pub know_button: Rect,
    pub progress: Rect,
    pub status: Rect,
    pub restart_button: Rect,
}

impl CardLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let card = centered_columns(rows[1], CARD_MAX_WIDTH);
        let buttons_row = centered_columns(rows[2], CARD_MAX_WIDTH);
        let buttons = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(buttons_row);

        let panel = completion_panel(area);
        let restart_button = Rect {
            x: panel.x + 2,
            y: panel.y + panel.height.saturating_sub(4),
            width: panel.width.saturating_sub(4),
            height: 3.min(panel.height),
        };

        Self {
            title: rows[0],
            card,
            repeat_button: buttons[0],
            know_button: buttons[1],
            progress: rows[3],
            status: rows[4],
            restart_button,
        }
    }
}

pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

fn centered_columns(area: Rect, max_width: u16) -> Rect {
    let width = area.width.min(max_width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

fn completion_panel(area: Rect) -> Rect {
    let width = area.width.min(COMPLETION_WIDTH);
    let height = area.height.min(COMPLETION_HEIGHT);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render_ui(f: &mut Frame, app: &App) {
    let area = f.area();
    let layout = CardLayout::new(area);

    match app.session.phase() {
        SessionPhase::Loading => render_loading(f, area),
        SessionPhase::Error(message) => render_error(f, area, &message),
        SessionPhase::Completed => render_completed(f, &layout),
        SessionPhase::Active => render_active(f, app, &layout),
    }

    if app.mode == AppMode::Help {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_loading(f: &mut Frame, area: Rect) {
    let middle = vertical_middle(area, 1);
    let loading = Paragraph::new("Loading menu...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(loading, middle);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let middle = vertical_middle(area, 3);
    let error = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled("q: quit", Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::LightRed))
    .wrap(Wrap { trim: true });
    f.render_widget(error, middle);
}

fn vertical_middle(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        y: area.y + (area.height - height) / 2,
        height,
        ..area
    }
}

fn render_completed(f: &mut Frame, layout: &CardLayout) {
    let panel = completion_panel(f.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Color::White));
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "You have learned everything!",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("Great job!", Style::default().fg(Color::Gray))),
    ])
    .alignment(Alignment::Center)
    .block(block);
    f.render_widget(text, panel);

    render_button(f, layout.restart_button, "Start over (Enter)", Color::Cyan);
}

fn render_active(f: &mut Frame, app: &App, layout: &CardLayout) {
    let title = Paragraph::new("Learn mode")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    f.render_widget(title, layout.title);

    if let Some(item) = app.session.current_item() {
        let card = exit_offset(
            layout.card,
            f.area(),
            app.session.exit_direction(),
            app.exit_progress(Instant::now()),
        );
        if app.session.is_flipped() {
            render_card_back(f, item, &app.currency, card);
        } else {
            render_card_front(f, item, card);
        }
    }

    render_button(f, layout.repeat_button, "✗ Repeat (←)", Color::LightRed);
    render_button(f, layout.know_button, "✓ Know (→)", Color::LightGreen);

    let (current, total) = app.session.progress();
    let progress = Paragraph::new(format!("Card {current} of {total}"))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(progress, layout.progress);

    let status = Paragraph::new("Space: flip | ←/→: repeat/know | drag card to swipe | ?: help | q: quit")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(status, layout.status);
}

/// Slides the card toward the exit side while an advance is in flight.
fn exit_offset(card: Rect, bounds: Rect, direction: Option<Direction>, progress: f32) -> Rect {
    let Some(direction) = direction else {
        return card;
    };
    let shift = (card.width as f32 * progress) as u16;
    match direction {
        Direction::Know => {
            let max_x = bounds.x + bounds.width.saturating_sub(card.width);
            Rect {
                x: (card.x + shift).min(max_x),
                ..card
            }
        }
        Direction::Repeat => Rect {
            x: card.x.saturating_sub(shift).max(bounds.x),
            ..card
        },
    }
}

fn card_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title)
        .style(Style::default().fg(color))
}

fn render_card_front(f: &mut Frame, item: &MenuItem, area: Rect) {
    f.render_widget(Clear, area);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            item.name.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(item.image_ref(), Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(Span::styled(
            "Click the card to see details",
            Style::default().fg(Color::Gray),
        )),
    ];
    let front = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(card_block("", Color::White));
    f.render_widget(front, area);
}

fn render_card_back(f: &mut Frame, item: &MenuItem, currency: &str, area: Rect) {
    f.render_widget(Clear, area);
    let mut lines = vec![
        Line::from(Span::styled(
            item.name.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(
            item.description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or("No description.")
                .to_string(),
        ),
    ];

    if let Some(category) = item.category_id {
        lines.push(Line::from(Span::styled(
            format!("Category #{category}"),
            Style::default().fg(Color::DarkGray),
        )));
    }

    push_chips(&mut lines, "Ingredients:", item.ingredients(), Color::Cyan);
    push_chips(&mut lines, "Allergens:", item.allergens(), Color::Yellow);

    if let Some(price) = item.price() {
        lines.push(Line::from(""));
        lines.push(
            Line::from(Span::styled(
                format!("{} {}", format_price(price), currency),
                Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Right),
        );
    }

    let back = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(card_block("", Color::White));
    f.render_widget(back, area);
}

fn push_chips<'a>(lines: &mut Vec<Line<'a>>, heading: &'a str, labels: &[String], color: Color) {
    if labels.is_empty() {
        return;
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        heading,
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )));

    let mut chips = Vec::with_capacity(labels.len() * 2);
    for label in labels {
        chips.push(Span::styled(format!("[{label}]"), Style::default().fg(color)));
        chips.push(Span::raw(" "));
    }
    lines.push(Line::from(chips));
}

pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{price:.0}")
    } else {
        format!("{price:.2}")
    }
}

fn render_button(f: &mut Frame, area: Rect, label: &str, color: Color) {
    let button = Paragraph::new(label.to_string())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD));
    f.render_widget(button, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    "menudeck Help (Line {}/{})",
                    start_line + 1,
                    help_lines.len()
                ))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"MENUDECK KEY REFERENCE

=== CARDS ===
Space / Enter   Flip the current card
→ / l / k       I know this item (next card)
← / h / r       Repeat this item (next card)

=== MOUSE ===
Click card      Flip the current card
Drag right      I know this item
Drag left       Repeat this item
Buttons         Repeat / Know, same as the keys

=== END OF DECK ===
Enter / r       Shuffle the same items and start over

=== OTHER ===
F5              Reload the menu after a failed load
F1 or ?         Show this help (scroll with ↑↓, PgUp/PgDn, Home)
q / Esc         Quit

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window"#;
