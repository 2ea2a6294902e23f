use ratatui::{
    prelude::Rect,
    widgets::{Block, Borders, BorderType, Paragraph},
    style::Style,
};

use crate::app::{App, Screen};
use super::theme::{THEME_ACCENT, THEME_BORDER};

pub fn render_status_bar(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let (mode_str, key_hints) = match app.current() {
        Some(screen) if screen.request().error.is_some() => {
            ("ERROR", "q: Quit | r: Retry | b: Back")
        }
        Some(screen) if screen.request().loading => ("LOADING", "q: Quit | b: Back"),
        Some(Screen::Explore(_)) => ("EXPLORE", "q: Quit | j/k: Nav | Enter: Open"),
        Some(Screen::Feed(_)) => (
            "VIDEOS",
            "q: Quit | j/k: Nav | Enter: Related | o: Browser | y: Copy link | b: Back",
        ),
        None => ("", "q: Quit"),
    };

    let status_msg = app.status_message.as_deref().unwrap_or("");
    let text = if status_msg.is_empty() {
        format!(" [{}] {} ", mode_str, key_hints)
    } else {
        format!(" [{}] {} | {} ", mode_str, key_hints, status_msg)
    };

    let p = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME_BORDER)),
        )
        .style(Style::default().fg(THEME_ACCENT));
    f.render_widget(p, area);
}
