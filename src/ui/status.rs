use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if let Some(error) = app.view.load_error() {
        Cow::Owned(format!("Load failed: {} | [r]etry", error))
    } else if app.search_mode {
        Cow::Borrowed("Type to search | ESC clear | ENTER apply now")
    } else {
        Cow::Borrowed("[j/k]move [Enter]toggle [e]xpand all [c]ollapse all [/]search [r]eload [?]help [q]uit")
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    f.render_widget(Paragraph::new(text).style(style), area);
}
