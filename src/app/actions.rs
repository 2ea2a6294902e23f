use super::App;
use crate::model::Video;

const VIMEO_WEB_BASE: &str = "https://vimeo.com";

/// Public page of a video, falling back to one built from its id.
pub fn video_url(video: &Video) -> Option<String> {
    match video.link.as_deref().filter(|l| !l.is_empty()) {
        Some(link) => Some(link.to_string()),
        None => {
            let id = video.id();
            (!id.is_empty()).then(|| format!("{}/{}", VIMEO_WEB_BASE, id))
        }
    }
}

fn selected_url(app: &App) -> Option<String> {
    app.current()
        .and_then(|screen| screen.selected_video())
        .and_then(video_url)
}

pub fn open_in_browser(app: &mut App) {
    let Some(url) = selected_url(app) else {
        app.status_message = Some("No video selected.".to_string());
        return;
    };
    if webbrowser::open(&url).is_ok() {
        app.status_message = Some("Opening in browser...".to_string());
    } else {
        log::error!("failed to open browser for {}", url);
        app.status_message = Some("Failed to open browser.".to_string());
    }
}

pub fn copy_link(app: &mut App) {
    let Some(url) = selected_url(app) else {
        app.status_message = Some("No video selected.".to_string());
        return;
    };
    if let Some(clipboard) = &mut app.clipboard {
        if clipboard.set_text(url).is_ok() {
            app.status_message = Some("Link copied to clipboard.".to_string());
        } else {
            app.status_message = Some("Failed to copy link.".to_string());
        }
    } else {
        app.status_message = Some("Clipboard not available.".to_string());
    }
}
