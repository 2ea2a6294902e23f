use ratatui::{
    layout::{Constraint, Direction, Layout},
    prelude::Rect,
};

pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(r.height.saturating_sub(height) / 2),
            Constraint::Length(height.min(r.height)),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(r.width.saturating_sub(width) / 2),
            Constraint::Length(width.min(r.width)),
            Constraint::Min(0),
        ])
        .split(popup_layout[1])[1]
}

pub fn get_width(s: &str) -> usize {
    s.chars().map(|c| {
        let cp = c as u32;
        if (0x1F300..=0x1F9FF).contains(&cp) || (0x2600..=0x26FF).contains(&cp) {
            2
        } else {
            1
        }
    }).sum()
}

pub fn truncate_str(s: &str, max_width: usize) -> String {
    if get_width(s) <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let w = get_width(&c.to_string());
        if current_width + w + 3 > max_width {
            result.push_str("...");
            break;
        }
        result.push(c);
        current_width += w;
    }
    result
}

/// Rows of a list body that are visible, given each row's height and the scroll offset.
pub fn visible_row_areas(heights: &[u16], offset: usize, body: Rect) -> Vec<(usize, Rect)> {
    let mut areas = Vec::new();
    let mut y = body.y;
    for (position, &height) in heights.iter().enumerate().skip(offset) {
        if y >= body.bottom() {
            break;
        }
        let visible = height.min(body.bottom() - y);
        areas.push((position, Rect::new(body.x, y, body.width, visible)));
        y += height;
    }
    areas
}
