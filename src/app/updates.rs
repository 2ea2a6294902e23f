use super::{App, NavEvent, Screen};
use crate::model::Item;

pub fn on_tick(app: &mut App) {
    // check for completed requests
    while let Ok(completion) = app.completion_rx.try_recv() {
        let request_id = completion.request_id;
        app.dispatcher.finished(request_id);
        match app.screens.iter_mut().find(|s| s.owns(request_id)) {
            Some(screen) => {
                screen.on_completion(completion);
            }
            None => log::debug!("no screen waiting on request #{}", request_id),
        }
    }

    for screen in app.screens.iter_mut() {
        screen.sync_changes();
    }

    while let Ok(event) = app.nav_rx.try_recv() {
        handle_nav_event(app, event);
    }

    request_images_for_selection(app);
    app.images.poll();
}

fn handle_nav_event(app: &mut App, event: NavEvent) {
    match event {
        NavEvent::ItemClicked { position, area } => {
            log::debug!("item {} clicked at {:?}", position, area);
            let (category, video) = match app.current() {
                Some(Screen::Explore(explore)) => (explore.adapter.content_at(position).cloned(), None),
                Some(Screen::Feed(feed)) => (None, feed.adapter.content_at(position).cloned()),
                None => (None, None),
            };
            if let Some(category) = category {
                app.open_category(category);
            } else if let Some(video) = video {
                app.open_video(video);
            }
        }
    }
}

pub fn move_selection(app: &mut App, delta: i32) {
    if let Some(screen) = app.screens.last_mut() {
        screen.move_selection(delta, app.dispatcher.as_mut());
    }
}

/// Thumbnail of the selected row, plus the owner picture when the header is selected.
pub fn request_images_for_selection(app: &mut App) {
    let Some(screen) = app.screens.last() else {
        return;
    };
    let selected = screen.selected();
    let url = match screen {
        Screen::Explore(explore) => explore
            .adapter
            .content_at(selected)
            .and_then(|c| c.pictures.as_ref())
            .and_then(|p| p.largest_link())
            .map(str::to_string),
        Screen::Feed(feed) => match feed.adapter.get_item(selected) {
            Some(Item::Header(video)) => video.owner_image_link().map(str::to_string),
            Some(Item::Content(video)) => video.thumbnail_link().map(str::to_string),
            _ => None,
        },
    };
    if let Some(url) = url {
        app.images.load(&url);
    }
}
