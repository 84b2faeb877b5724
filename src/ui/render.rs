//! Render functions for the TUI.
//!
//! Lays out the stats header, the optional search bar, the tree panel and
//! the status bar, then draws the help overlay on top when it is open.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{help, status, tree_panel};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 8;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Number of frames in the loading spinner animation.
pub(super) const SPINNER_FRAMES: usize = SPINNER.len();

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let show_search = app.search_mode || !app.view.active_search().is_empty();
    let search_height = if show_search { 3 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(search_height),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    if show_search {
        render_search_bar(f, app, chunks[1]);
    }
    tree_panel::render(f, app, chunks[2]);
    status::render(f, app, chunks[3]);

    if app.show_help {
        help::render(f);
    }
}

/// One-line header: title, stats and loading indicator.
fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let stats = app.view.stats();
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut spans = vec![
        Span::styled(" edutree ", bold.fg(Color::Cyan)),
        Span::raw(format!(
            " Total: {}  Active: {}  Inactive: {}",
            stats.total, stats.active, stats.inactive
        )),
    ];
    if app.view.is_loading() {
        spans.push(Span::styled(
            format!("  {} loading", SPINNER[app.spinner_frame % SPINNER_FRAMES]),
            Style::default().fg(Color::Yellow),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_search_bar(f: &mut Frame, app: &App, area: Rect) {
    let (text, border) = if app.search_mode {
        (
            format!("/{}_", app.search_input),
            Style::default().fg(Color::Yellow),
        )
    } else {
        (
            format!("/{}", app.view.active_search()),
            Style::default().fg(Color::DarkGray),
        )
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" Search ");
    f.render_widget(Paragraph::new(text).block(block), area);
}
