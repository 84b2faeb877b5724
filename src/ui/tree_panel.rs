use crate::app::{App, EmptyState};
use crate::util::{display_width, truncate_to_width};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Render the category tree panel.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let title = if app.view.active_search().is_empty() {
        " Categories ".to_string()
    } else {
        format!(" Categories matching \"{}\" ", app.view.active_search())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    if let Some(empty) = app.view.empty_state() {
        render_empty(f, block, &empty, area);
        return;
    }

    let rows = app.rows();
    // Borders take two columns.
    let inner_width = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let node = row.node;
            let indent = "  ".repeat(row.depth);
            let marker = if !node.has_children() {
                "  "
            } else if node.expanded {
                "v "
            } else {
                "> "
            };

            let style = if i == app.selected {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else if !node.is_active {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };

            let prefix = format!("{}{}", indent, marker);
            let suffix = if node.is_active { "" } else { " (inactive)" };
            let name_budget = inner_width
                .saturating_sub(display_width(&prefix))
                .saturating_sub(display_width(suffix));
            let name = if node.name.is_empty() {
                "(unnamed)"
            } else {
                node.name.as_str()
            };

            let mut spans = Vec::with_capacity(4);
            spans.push(Span::styled(prefix, style));
            spans.push(Span::styled(truncate_to_width(name, name_budget), style));
            if !node.is_active {
                spans.push(Span::styled(suffix, style.add_modifier(Modifier::ITALIC)));
            }
            if node.has_children() && !node.expanded {
                let count = node.children.iter().filter(|c| !c.hidden).count();
                spans.push(Span::styled(format!(" [{}]", count), style));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(block);
    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_empty(f: &mut Frame, block: Block<'_>, empty: &EmptyState, area: Rect) {
    let text = match empty {
        EmptyState::Loading => "Loading categories...".to_string(),
        EmptyState::LoadFailed(error) => {
            format!("Failed to load categories:\n{}\n\nPress r to retry", error)
        }
        EmptyState::NoCategories => "No categories yet".to_string(),
        EmptyState::NoMatches(term) => {
            format!("No categories match \"{}\"\n\nPress Esc to clear the search", term)
        }
    };
    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
