use ratatui::{
    prelude::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::app::App;
use super::theme::{THEME_ACCENT, THEME_BORDER, THEME_DIM, THEME_FG};
use super::widgets::truncate_str;

/// Breadcrumb of the navigation stack, current screen last.
pub fn render_title_bar(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let budget = (area.width as usize).saturating_sub(4) / app.screens.len().max(1);
    let mut spans = Vec::new();
    for (i, screen) in app.screens.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" › ", Style::default().fg(THEME_DIM)));
        }
        let title = truncate_str(&screen.title(), budget.max(4));
        let style = if i + 1 == app.screens.len() {
            Style::default().fg(THEME_ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(THEME_FG)
        };
        spans.push(Span::styled(title, style));
    }

    let p = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME_BORDER))
            .title(" Loop "),
    );
    f.render_widget(p, area);
}
