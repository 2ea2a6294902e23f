pub mod components;

use crate::app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
};
use ratatui_image::picker::Picker;

use components::main_content::render_main_area;
use components::status_bar::render_status_bar;
use components::theme::THEME_BG;
use components::title_bar::render_title_bar;

pub fn ui(f: &mut Frame, app: &mut App, picker: &mut Picker) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1) // Outer margin
        .constraints([
            Constraint::Length(3), // Breadcrumb
            Constraint::Min(1),    // Main content
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    // Render Background
    f.render_widget(
        Block::default().style(Style::default().bg(THEME_BG)),
        f.area(),
    );

    render_title_bar(f, app, main_layout[0]);
    render_main_area(f, app, main_layout[1], picker);
    render_status_bar(f, app, main_layout[2]);
}
