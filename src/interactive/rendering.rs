//! TUI rendering with ratatui
//!
//! Everything on the board and keyboard is drawn from a [`Snapshot`], so the
//! master and its followers render through exactly the same code.

use super::app::{App, MessageStyle};
use crate::config::Role;
use crate::core::Verdict;
use crate::core::keyboard::LAYOUT;
use crate::game::{Phase, ROWS};
use crate::sync::Snapshot;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
};
use std::time::Instant;

const CONFETTI_COLORS: [Color; 5] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Magenta,
];

/// Main UI rendering function
pub fn ui(f: &mut Frame, app: &App) {
    let view = app.view();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(12),   // Board and side panel
            Constraint::Length(5), // Keyboard
            Constraint::Length(3), // Prompt or banner
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    render_header(f, app.role(), chunks[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    render_board(f, &view, main_chunks[0]);
    render_messages(f, app, main_chunks[1]);
    render_keyboard(f, &view, chunks[2]);
    render_prompt(f, app, &view, chunks[3]);
    render_status(f, app, chunks[4]);

    render_confetti(f, app);
}

fn render_header(f: &mut Frame, role: Role, area: Rect) {
    let title = match role {
        Role::Master => "WORDLE MIRROR - Master",
        Role::Follower => "WORDLE MIRROR - Following",
    };
    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(header, area);
}

/// Background/foreground for a tile or key
#[must_use]
pub const fn verdict_style(verdict: Verdict) -> Style {
    match verdict {
        Verdict::Correct => Style::new().fg(Color::Black).bg(Color::Green),
        Verdict::Present => Style::new().fg(Color::Black).bg(Color::Yellow),
        Verdict::Absent => Style::new().fg(Color::White).bg(Color::DarkGray),
        Verdict::Unset => Style::new().fg(Color::White),
    }
}

fn board_lines(view: &Snapshot) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(ROWS * 2);
    for (row, (letters, tiles)) in view.board.iter().zip(&view.tile_states).enumerate() {
        let active_row = view.started && !view.over && row == view.current_row;
        let spans: Vec<Span> = letters
            .iter()
            .zip(tiles)
            .enumerate()
            .flat_map(|(col, (slot, verdict))| {
                let ch = slot.get().unwrap_or(if active_row && col == view.current_col {
                    '_'
                } else {
                    '·'
                });
                let mut style = verdict_style(*verdict).add_modifier(Modifier::BOLD);
                if active_row && !verdict.is_set() {
                    style = style.fg(Color::Cyan);
                }
                [Span::styled(format!(" {ch} "), style), Span::raw(" ")]
            })
            .collect();
        lines.push(Line::from(spans));
        lines.push(Line::default());
    }
    lines
}

fn render_board(f: &mut Frame, view: &Snapshot, area: Rect) {
    let board = Paragraph::new(board_lines(view))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(" Board ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
    f.render_widget(board, area);
}

fn key_span(label: String, verdict: Verdict) -> Span<'static> {
    Span::styled(format!(" {label} "), verdict_style(verdict))
}

fn render_keyboard(f: &mut Frame, view: &Snapshot, area: Rect) {
    let last = LAYOUT.len() - 1;
    let lines: Vec<Line> = LAYOUT
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut spans = Vec::new();
            if i == last {
                spans.push(key_span("ENTER".into(), Verdict::Unset));
                spans.push(Span::raw(" "));
            }
            for ch in row.chars() {
                spans.push(key_span(ch.to_string(), view.key(ch)));
                spans.push(Span::raw(" "));
            }
            if i == last {
                spans.push(key_span("DEL".into(), Verdict::Unset));
            }
            Line::from(spans)
        })
        .collect();

    let keyboard = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().title(" Keys ").borders(Borders::ALL));
    f.render_widget(keyboard, area);
}

fn render_messages(f: &mut Frame, app: &App, area: Rect) {
    let messages: Vec<ListItem> = app
        .messages
        .iter()
        .rev()
        .map(|msg| {
            let style = match msg.style {
                MessageStyle::Info => Style::default().fg(Color::White),
                MessageStyle::Success => Style::default().fg(Color::Green),
                MessageStyle::Error => Style::default().fg(Color::Red),
            };
            ListItem::new(msg.text.clone()).style(style)
        })
        .collect();

    let messages_list =
        List::new(messages).block(Block::default().title(" Messages ").borders(Borders::ALL));

    f.render_widget(messages_list, area);
}

fn render_prompt(f: &mut Frame, app: &App, view: &Snapshot, area: Rect) {
    let (title, content, color) = if let Some(outcome) = view.outcome_text() {
        let title = match app.role() {
            Role::Master => " Game over | Enter: new game ",
            Role::Follower => " Game over ",
        };
        let color = if view.win { Color::Green } else { Color::Red };
        (title, outcome, color)
    } else {
        match app.phase() {
            Some(Phase::Idle) => (
                " Secret word (5 letters) | Enter to start ",
                "*".repeat(app.answer_input.chars().count()),
                Color::Yellow,
            ),
            Some(_) => (
                " Your guess ",
                format!("Row {} of {ROWS}", view.row_number()),
                Color::Cyan,
            ),
            None if view.started => (
                " Watching ",
                format!("Row {} of {ROWS}", view.row_number()),
                Color::Cyan,
            ),
            None => (
                " Watching ",
                "Waiting for the master to pick a word".to_string(),
                Color::DarkGray,
            ),
        }
    };

    let prompt = Paragraph::new(content)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .style(Style::default().fg(color)),
        );

    f.render_widget(prompt, area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let link = Paragraph::new(format!("Link: {}", app.link)).alignment(Alignment::Center);
    f.render_widget(link, chunks[0]);

    let help_text = match app.role() {
        Role::Master => "Esc: Quit | Ctrl+R: Reset (twice: Restart) | Ctrl+N: Restart",
        Role::Follower => "q/Esc: Quit",
    };
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[1]);
}

fn render_confetti(f: &mut Frame, app: &App) {
    let Some(confetti) = &app.confetti else {
        return;
    };
    let area = f.area();
    let now = Instant::now();
    let buf = f.buffer_mut();
    for p in confetti.visible(now) {
        let x = area.x + (p.x * f32::from(area.width)) as u16;
        let y = area.y + (p.y * f32::from(area.height)) as u16;
        if x < area.right() && y < area.bottom() {
            let color = CONFETTI_COLORS[usize::from(p.color) % CONFETTI_COLORS.len()];
            buf.set_string(x, y, p.glyph.to_string(), Style::default().fg(color));
        }
    }
}
