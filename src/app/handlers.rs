use super::App;
use super::actions;
use super::updates;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::time::{Duration, Instant};

const PAGE_STEP: i32 = 10;

pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let x = mouse.column;
            let y = mouse.row;
            let double_click = is_double_click(app, x, y);

            let Some(&(position, area)) = app
                .row_areas
                .iter()
                .find(|(_, area)| is_in_rect(x, y, *area))
            else {
                return;
            };
            let Some(screen) = app.screens.last_mut() else {
                return;
            };
            let already_selected = screen.selected() == position;
            screen.select(position, app.dispatcher.as_mut());
            if double_click || already_selected {
                screen.click(position, area);
            }
        }
        MouseEventKind::ScrollUp => updates::move_selection(app, -1),
        MouseEventKind::ScrollDown => updates::move_selection(app, 1),
        _ => {}
    }
}

fn is_double_click(app: &mut App, x: u16, y: u16) -> bool {
    let now = Instant::now();
    let threshold = Duration::from_millis(500);

    if let (Some(last_time), Some(last_pos)) = (app.last_click_time, app.last_click_pos) {
        if now.duration_since(last_time) < threshold && last_pos == (x, y) {
            app.last_click_time = None;
            return true;
        }
    }
    app.last_click_time = Some(now);
    app.last_click_pos = Some((x, y));
    false
}

fn is_in_rect(x: u16, y: u16, area: Rect) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

/// Area the row at `position` was last drawn into, if it was on screen.
fn row_area(app: &App, position: usize) -> Rect {
    app.row_areas
        .iter()
        .find(|(p, _)| *p == position)
        .map(|(_, area)| *area)
        .unwrap_or_default()
}

pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.shutdown();
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.shutdown(),
        KeyCode::Down | KeyCode::Char('j') => updates::move_selection(app, 1),
        KeyCode::Up | KeyCode::Char('k') => updates::move_selection(app, -1),
        KeyCode::PageDown => updates::move_selection(app, PAGE_STEP),
        KeyCode::PageUp => updates::move_selection(app, -PAGE_STEP),
        KeyCode::Home | KeyCode::Char('g') => {
            if let Some(screen) = app.screens.last_mut() {
                screen.select(0, app.dispatcher.as_mut());
            }
        }
        KeyCode::End | KeyCode::Char('G') => {
            let count = app.current().map(|s| s.item_count()).unwrap_or(0);
            updates::move_selection(app, count as i32);
        }
        KeyCode::Enter => {
            let Some(position) = app.current().map(|s| s.selected()) else {
                return;
            };
            let area = row_area(app, position);
            if let Some(screen) = app.current_mut() {
                screen.click(position, area);
            }
        }
        KeyCode::Char('r') => reload(app),
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
            if !app.pop_screen() && key.code == KeyCode::Esc {
                app.shutdown();
            }
        }
        KeyCode::Char('o') => actions::open_in_browser(app),
        KeyCode::Char('y') => actions::copy_link(app),
        _ => {}
    }
}

/// Retries failed thumbnails and the failed request of the current screen.
fn reload(app: &mut App) {
    app.images.forget_failures();
    let Some(screen) = app.screens.last_mut() else {
        return;
    };
    if screen.request().error.is_none() {
        app.status_message = Some("Nothing to retry.".to_string());
        return;
    }
    screen.reload(app.dispatcher.as_mut());
    app.status_message = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::requests::testing::RecordingDispatcher;
    use crate::app::requests::Completion;
    use crate::sys::image::ImageLoader;
    use crate::sys::vimeo::FetchError;
    use tokio::sync::mpsc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn click(x: u16, y: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: x,
            row: y,
            modifiers: KeyModifiers::empty(),
        }
    }

    #[tokio::test]
    async fn r_retries_only_after_an_error() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut app = App::with_dispatcher(
            Box::new(RecordingDispatcher::default()),
            rx,
            ImageLoader::spawn(4),
        );
        app.open_explore();
        let first = app.current().and_then(|s| s.request().in_flight).unwrap();

        handle_key_event(&mut app, key(KeyCode::Char('r')));
        assert_eq!(app.current().unwrap().request().in_flight, Some(first));

        tx.send(Completion { request_id: first, result: Err(FetchError::HostUnreachable) })
            .unwrap();
        updates::on_tick(&mut app);
        assert!(app.current().unwrap().request().error.is_some());

        handle_key_event(&mut app, key(KeyCode::Char('r')));
        let screen = app.current().unwrap();
        assert!(screen.request().error.is_none());
        assert!(screen.request().loading);
        assert_ne!(screen.request().in_flight, Some(first));
    }

    #[tokio::test]
    async fn esc_on_root_quits() {
        let (_tx, rx) = mpsc::unbounded_channel();
        let mut app = App::with_dispatcher(
            Box::new(RecordingDispatcher::default()),
            rx,
            ImageLoader::spawn(4),
        );
        app.open_explore();
        handle_key_event(&mut app, key(KeyCode::Char('b')));
        assert!(app.running);
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(!app.running);
        assert!(app.screens.is_empty());
    }

    #[tokio::test]
    async fn mouse_click_selects_the_row_under_the_cursor() {
        let (_tx, rx) = mpsc::unbounded_channel();
        let mut app = App::with_dispatcher(
            Box::new(RecordingDispatcher::default()),
            rx,
            ImageLoader::spawn(4),
        );
        app.open_explore();
        app.row_areas = vec![(0, Rect::new(1, 1, 20, 2)), (1, Rect::new(1, 3, 20, 2))];

        // outside every row
        handle_mouse_event(&mut app, click(40, 40));
        assert_eq!(app.current().unwrap().selected(), 0);
        assert!(is_in_rect(5, 4, Rect::new(1, 3, 20, 2)));
        assert!(!is_in_rect(21, 4, Rect::new(1, 3, 20, 2)));
    }
}
