use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use ratatui_image::picker::Picker;

use crate::app::bind::{BoundRow, CategoryRow, OwnerImage, VideoHeader, VideoRow};
use crate::app::{App, Screen};

use super::theme::{THEME_ACCENT, THEME_BORDER, THEME_DIM, THEME_ERROR, THEME_FG, THEME_HIGHLIGHT};
use super::widgets::{centered_rect_fixed, truncate_str, visible_row_areas};

const PLACEHOLDER_GLYPH: &str = "◌";
const DESCRIPTION_PREVIEW_LINES: usize = 3;

pub fn render_main_area(f: &mut ratatui::Frame, app: &mut App, area: Rect, picker: &mut Picker) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let Some(screen) = app.screens.last() else {
        return;
    };

    let width = chunks[0].width.saturating_sub(6) as usize;
    let items: Vec<ListItem<'static>> = match screen {
        Screen::Explore(explore) => (0..explore.adapter.item_count())
            .filter_map(|p| explore.adapter.bind(p))
            .map(|row| category_item(row, width))
            .collect(),
        Screen::Feed(feed) => (0..feed.adapter.item_count())
            .filter_map(|p| feed.adapter.bind(p, &app.relativizer))
            .map(|row| video_item(row, width))
            .collect(),
    };
    let heights: Vec<u16> = items.iter().map(|i| i.height() as u16).collect();
    let selected = screen.selected();
    let request = screen.request().clone();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME_BORDER))
        .title(format!(" {} ", screen.title()));
    let body = block.inner(chunks[0]);

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(THEME_HIGHLIGHT)
                .fg(THEME_FG)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("┃ ");

    app.list_state
        .select((!heights.is_empty()).then_some(selected));
    f.render_stateful_widget(list, chunks[0], &mut app.list_state);
    app.row_areas = visible_row_areas(&heights, app.list_state.offset(), body);

    render_details(f, app, chunks[1], picker);

    if request.loading {
        render_loading_indicator(f, chunks[0]);
    }
    if let Some(message) = &request.error {
        render_error_panel(f, message, area);
    }
}

fn category_item(row: BoundRow<CategoryRow, CategoryRow>, width: usize) -> ListItem<'static> {
    match row {
        BoundRow::Header(category) | BoundRow::Content(category) => ListItem::new(vec![
            Line::from(Span::styled(
                format!(" {}", truncate_str(&category.title, width)),
                Style::default().fg(THEME_FG).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ]),
        BoundRow::Loading => loading_item(),
    }
}

fn video_item(row: BoundRow<VideoRow, VideoHeader>, width: usize) -> ListItem<'static> {
    match row {
        BoundRow::Header(header) => header_item(header, width),
        BoundRow::Content(video) => content_item(video, width),
        BoundRow::Loading => loading_item(),
    }
}

fn content_item(row: VideoRow, width: usize) -> ListItem<'static> {
    let mut second_line = Vec::new();
    if let Some(subtitle) = row.subtitle {
        second_line.push(Span::styled(
            truncate_str(&subtitle, width.saturating_sub(10)),
            Style::default().fg(THEME_ACCENT),
        ));
        second_line.push(Span::styled(" • ", Style::default().fg(THEME_DIM)));
    }
    second_line.push(Span::styled(row.duration, Style::default().fg(THEME_FG)));

    ListItem::new(vec![
        Line::from(Span::styled(
            truncate_str(&row.title, width),
            Style::default().fg(THEME_FG).add_modifier(Modifier::BOLD),
        )),
        Line::from(second_line),
        Line::from(Span::styled(row.uploaded, Style::default().fg(THEME_DIM))),
    ])
}

fn header_item(header: VideoHeader, width: usize) -> ListItem<'static> {
    let glyph = match header.owner_image {
        OwnerImage::Remote(_) => "●",
        OwnerImage::Placeholder => PLACEHOLDER_GLYPH,
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{} ", glyph), Style::default().fg(THEME_ACCENT)),
        Span::styled(
            truncate_str(&header.title, width.saturating_sub(2)),
            Style::default().fg(THEME_FG).add_modifier(Modifier::BOLD),
        ),
    ])];
    if let Some(subtitle) = header.subtitle {
        lines.push(Line::from(Span::styled(
            format!("  {}", subtitle),
            Style::default().fg(THEME_ACCENT),
        )));
    }

    let meta: Vec<String> = [header.view_count, header.uploaded].into_iter().flatten().collect();
    if !meta.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {}", meta.join(" • ")),
            Style::default().fg(THEME_DIM),
        )));
    }
    if let Some(description) = header.description {
        for line in description.lines().take(DESCRIPTION_PREVIEW_LINES) {
            lines.push(Line::from(Span::styled(
                format!("  {}", truncate_str(line, width.saturating_sub(2))),
                Style::default().fg(THEME_FG),
            )));
        }
    }
    if let Some(tags) = header.tags {
        lines.push(Line::from(Span::styled(
            format!("  {}", truncate_str(tags.trim_end(), width.saturating_sub(2))),
            Style::default().fg(THEME_ACCENT),
        )));
    }
    lines.push(Line::from(Span::styled(
        "─".repeat(width),
        Style::default().fg(THEME_BORDER),
    )));
    ListItem::new(lines)
}

fn loading_item() -> ListItem<'static> {
    ListItem::new(Line::from(Span::styled(
        "    [ Loading more... ] ",
        Style::default().fg(THEME_ACCENT).add_modifier(Modifier::BOLD),
    )))
}

/// Picture and fields of the selected row.
fn render_details(f: &mut ratatui::Frame, app: &mut App, area: Rect, picker: &mut Picker) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME_BORDER))
        .title(" Details ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(screen) = app.screens.last() else {
        return;
    };
    let selected = screen.selected();
    let (image_url, placeholder, lines) = match screen {
        Screen::Explore(explore) => match explore.adapter.bind(selected) {
            Some(BoundRow::Content(category)) | Some(BoundRow::Header(category)) => (
                category.thumbnail,
                false,
                vec![field("Category: ", category.title)],
            ),
            _ => (None, false, Vec::new()),
        },
        Screen::Feed(feed) => match feed.adapter.bind(selected, &app.relativizer) {
            Some(BoundRow::Header(header)) => header_details(header),
            Some(BoundRow::Content(row)) => {
                let mut lines = vec![field("Title: ", row.title)];
                if let Some(subtitle) = row.subtitle {
                    lines.push(field("By: ", subtitle));
                }
                lines.push(field("Duration: ", row.duration));
                if !row.uploaded.is_empty() {
                    lines.push(field("Uploaded: ", row.uploaded));
                }
                (row.thumbnail, false, lines)
            }
            _ => (None, false, Vec::new()),
        },
    };

    let image = image_url.as_deref().and_then(|url| app.images.get(url));
    let image_height = match (image, placeholder) {
        (Some(img), _) => {
            let height = if img.width() > 0 {
                ((img.height() as f64 / img.width() as f64) * inner.width as f64 * 0.5).round()
                    as u16
            } else {
                0
            };
            height.clamp(2, 18)
        }
        (None, true) => 3,
        (None, false) => 0,
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(image_height),
            Constraint::Length(if image_height > 0 { 1 } else { 0 }),
            Constraint::Min(0),
        ])
        .split(inner);

    if let Some(img) = image {
        let mut protocol = picker.new_resize_protocol(img.clone());
        let widget = ratatui_image::StatefulImage::new();
        f.render_stateful_widget(widget, layout[0], &mut protocol);
    } else if placeholder {
        let glyph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(PLACEHOLDER_GLYPH, Style::default().fg(THEME_DIM))),
        ])
        .alignment(ratatui::layout::Alignment::Center);
        f.render_widget(glyph, layout[0]);
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().padding(ratatui::widgets::Padding::left(1)));
    f.render_widget(p, layout[2]);
}

fn header_details(header: VideoHeader) -> (Option<String>, bool, Vec<Line<'static>>) {
    let (image_url, placeholder) = match header.owner_image {
        OwnerImage::Remote(url) => (Some(url), false),
        OwnerImage::Placeholder => (None, true),
    };
    let mut lines = vec![field("Title: ", header.title)];
    if let Some(subtitle) = header.subtitle {
        lines.push(field("By: ", subtitle));
    }
    if let Some(views) = header.view_count {
        lines.push(field("Views: ", views));
    }
    if let Some(uploaded) = header.uploaded {
        lines.push(Line::from(Span::styled(uploaded, Style::default().fg(THEME_DIM))));
    }
    if let Some(tags) = header.tags {
        lines.push(Line::from(Span::styled(tags, Style::default().fg(THEME_ACCENT))));
    }
    if let Some(description) = header.description {
        lines.push(Line::from(""));
        lines.extend(
            description
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(THEME_FG)))),
        );
    }
    (image_url, placeholder, lines)
}

fn field(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(THEME_ACCENT).add_modifier(Modifier::BOLD)),
        Span::styled(value, Style::default().fg(THEME_FG)),
    ])
}

fn render_loading_indicator(f: &mut ratatui::Frame, area: Rect) {
    let popup = centered_rect_fixed(24, 3, area);
    f.render_widget(Clear, popup);
    let p = Paragraph::new(Line::from(Span::styled(
        "Loading...",
        Style::default().fg(THEME_ACCENT).add_modifier(Modifier::BOLD),
    )))
    .alignment(ratatui::layout::Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME_ACCENT)),
    );
    f.render_widget(p, popup);
}

/// Error panel with a retry hint; `r` reloads the screen.
fn render_error_panel(f: &mut ratatui::Frame, message: &str, area: Rect) {
    let mut lines: Vec<Line> = message
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(THEME_FG))))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[ r ]", Style::default().fg(THEME_ACCENT).add_modifier(Modifier::BOLD)),
        Span::styled(" Retry", Style::default().fg(THEME_FG)),
    ]));

    let popup = centered_rect_fixed(44, lines.len() as u16 + 2, area);
    f.render_widget(Clear, popup);
    let p = Paragraph::new(lines)
        .alignment(ratatui::layout::Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME_ERROR))
                .title(" Error "),
        );
    f.render_widget(p, popup);
}
