use ratatui::layout::Rect;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::app::adapter::{ListAdapter, ListChange};
use crate::app::requests::{Completion, Dispatch, Request, Response};
use crate::model::{Category, Collection, Video};
use crate::sys::vimeo::FetchError;

pub const LOAD_ERROR_MESSAGE: &str = "Can't load data.\nCheck your network connection.";

/// Rows left below the selection before the next page is requested.
const PAGINATION_THRESHOLD: usize = 2;

/// Events raised by screens for the owner of the navigation stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    ItemClicked { position: usize, area: Rect },
}

fn click_listener(events: UnboundedSender<NavEvent>) -> crate::app::adapter::OnItemClick {
    Box::new(move |position, area| {
        let _ = events.send(NavEvent::ItemClicked { position, area });
    })
}

/// Loading indicator, error panel and the single outstanding request of a screen.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RequestState {
    pub loading: bool,
    pub error: Option<String>,
    pub in_flight: Option<u64>,
}

impl RequestState {
    fn begin(&mut self, request_id: u64) {
        self.in_flight = Some(request_id);
    }

    /// Takes the result if the completion belongs to the outstanding request.
    fn settle(&mut self, completion: Completion) -> Option<Result<Response, FetchError>> {
        if self.in_flight != Some(completion.request_id) {
            log::debug!("ignoring stale completion #{}", completion.request_id);
            return None;
        }
        self.in_flight = None;
        Some(completion.result)
    }

    fn fail(&mut self, err: &FetchError) {
        match err {
            FetchError::Cancelled => {
                log::debug!("request canceled, keeping current state");
            }
            FetchError::Timeout | FetchError::HostUnreachable => {
                log::error!("Timeout occurred");
                self.loading = false;
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
            }
            FetchError::Server(500) => {
                self.loading = false;
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
            }
            FetchError::Server(code) => {
                log::warn!("unhandled response status {}", code);
                self.loading = false;
            }
            FetchError::OtherIo(message) | FetchError::Decode(message) => {
                log::error!("request failed: {}", message);
                self.loading = false;
            }
        }
    }

    fn cancel(&mut self, dispatcher: &mut dyn Dispatch) {
        if let Some(id) = self.in_flight.take() {
            dispatcher.cancel(id);
        }
    }
}

/// Selected row, kept on the same item as rows are inserted or removed around it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    known_len: usize,
}

impl Selection {
    pub fn apply(&mut self, change: ListChange) {
        match change {
            ListChange::Inserted(position) => {
                if position <= self.index && self.index < self.known_len {
                    self.index += 1;
                }
                self.known_len += 1;
            }
            ListChange::Removed(position) => {
                self.known_len = self.known_len.saturating_sub(1);
                if position < self.index {
                    self.index -= 1;
                }
                self.index = self.index.min(self.known_len.saturating_sub(1));
            }
            ListChange::Changed(_) => {}
        }
    }
}

fn observed_adapter<T>(
    events: UnboundedSender<NavEvent>,
) -> (ListAdapter<T>, UnboundedReceiver<ListChange>) {
    let (change_tx, change_rx) = mpsc::unbounded_channel();
    let mut adapter = ListAdapter::new();
    adapter.set_change_listener(change_tx);
    adapter.set_on_item_click(click_listener(events));
    (adapter, change_rx)
}

fn drain_changes(changes: &mut UnboundedReceiver<ListChange>, selection: &mut Selection) {
    while let Ok(change) = changes.try_recv() {
        selection.apply(change);
    }
}

pub struct ExploreScreen {
    pub adapter: ListAdapter<Category>,
    pub request: RequestState,
    pub selection: Selection,
    changes: UnboundedReceiver<ListChange>,
}

impl ExploreScreen {
    pub fn new(events: UnboundedSender<NavEvent>) -> Self {
        let (adapter, changes) = observed_adapter(events);
        Self {
            adapter,
            request: RequestState::default(),
            selection: Selection::default(),
            changes,
        }
    }

    pub fn start(&mut self, dispatcher: &mut dyn Dispatch) {
        self.request.loading = true;
        let id = dispatcher.dispatch(Request::Categories);
        self.request.begin(id);
    }

    pub fn reload(&mut self, dispatcher: &mut dyn Dispatch) {
        self.request.error = None;
        self.start(dispatcher);
    }

    pub fn on_completion(&mut self, completion: Completion) -> bool {
        let Some(result) = self.request.settle(completion) else {
            return false;
        };
        match result {
            Ok(Response::Categories(categories)) => {
                log::debug!("onResponse() : {} categories", categories.data.len());
                self.request.loading = false;
                self.adapter.add_all(categories.data);
            }
            Ok(other) => {
                log::warn!("unexpected response for categories: {:?}", other);
                self.request.loading = false;
            }
            Err(err) => self.request.fail(&err),
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedSource {
    Category(Category),
    Related(Video),
}

/// A paginated list of videos, either a category's or those related to a video.
pub struct VideoFeedScreen {
    pub source: FeedSource,
    pub adapter: ListAdapter<Video>,
    pub request: RequestState,
    /// Last page applied to the adapter, 0 before the first response.
    pub page: u32,
    pub is_last_page: bool,
    pub selection: Selection,
    paginating: bool,
    changes: UnboundedReceiver<ListChange>,
}

impl VideoFeedScreen {
    pub fn new(source: FeedSource, events: UnboundedSender<NavEvent>) -> Self {
        let (mut adapter, changes) = observed_adapter(events);
        if let FeedSource::Related(video) = &source {
            adapter.add_header(video.clone());
        }
        Self {
            source,
            adapter,
            request: RequestState::default(),
            page: 0,
            is_last_page: false,
            selection: Selection::default(),
            paginating: false,
            changes,
        }
    }

    fn request_for(&self, page: u32) -> Request {
        match &self.source {
            FeedSource::Category(category) => Request::CategoryVideos {
                slug: category.slug().to_string(),
                page,
            },
            FeedSource::Related(video) => Request::RelatedVideos {
                video_id: video.id().to_string(),
                page,
            },
        }
    }

    pub fn start(&mut self, dispatcher: &mut dyn Dispatch) {
        self.request.loading = true;
        self.paginating = false;
        let id = dispatcher.dispatch(self.request_for(1));
        self.request.begin(id);
    }

    pub fn can_load_more(&self) -> bool {
        self.page > 0
            && !self.is_last_page
            && !self.request.loading
            && self.request.in_flight.is_none()
    }

    /// Requests the next page behind a loading marker. Returns whether one was sent.
    pub fn load_more(&mut self, dispatcher: &mut dyn Dispatch) -> bool {
        if !self.can_load_more() {
            return false;
        }
        self.paginating = true;
        self.adapter.add_loading();
        let id = dispatcher.dispatch(self.request_for(self.page + 1));
        self.request.begin(id);
        true
    }

    pub fn near_end(&self, selected: usize) -> bool {
        selected + PAGINATION_THRESHOLD + 1 >= self.adapter.item_count()
    }

    pub fn reload(&mut self, dispatcher: &mut dyn Dispatch) {
        self.request.error = None;
        if self.page == 0 {
            self.start(dispatcher);
        } else {
            self.load_more(dispatcher);
        }
    }

    pub fn on_completion(&mut self, completion: Completion) -> bool {
        let Some(result) = self.request.settle(completion) else {
            return false;
        };
        if let Err(err @ FetchError::Cancelled) = &result {
            self.request.fail(err);
            return true;
        }
        if self.paginating {
            self.adapter.remove_loading();
            self.paginating = false;
        }
        match result {
            Ok(Response::Videos(videos)) => {
                log::debug!("onResponse() : page {} with {} videos", videos.page, videos.data.len());
                self.request.loading = false;
                self.apply_page(videos);
            }
            Ok(other) => {
                log::warn!("unexpected response for videos: {:?}", other);
                self.request.loading = false;
            }
            Err(err) => self.request.fail(&err),
        }
        true
    }

    fn apply_page(&mut self, videos: Collection<Video>) {
        self.is_last_page = videos.is_last_page();
        self.page = videos.page.max(self.page + 1);
        self.adapter.add_all(videos.data);
    }
}

pub enum Screen {
    Explore(ExploreScreen),
    Feed(VideoFeedScreen),
}

impl Screen {
    pub fn title(&self) -> String {
        match self {
            Screen::Explore(_) => "Explore".to_string(),
            Screen::Feed(feed) => match &feed.source {
                FeedSource::Category(c) => c.name.clone().unwrap_or_else(|| c.slug().to_string()),
                FeedSource::Related(v) => v.name.clone().unwrap_or_else(|| v.id().to_string()),
            },
        }
    }

    pub fn start(&mut self, dispatcher: &mut dyn Dispatch) {
        match self {
            Screen::Explore(s) => s.start(dispatcher),
            Screen::Feed(s) => s.start(dispatcher),
        }
    }

    pub fn reload(&mut self, dispatcher: &mut dyn Dispatch) {
        match self {
            Screen::Explore(s) => s.reload(dispatcher),
            Screen::Feed(s) => s.reload(dispatcher),
        }
    }

    pub fn on_completion(&mut self, completion: Completion) -> bool {
        match self {
            Screen::Explore(s) => s.on_completion(completion),
            Screen::Feed(s) => s.on_completion(completion),
        }
    }

    pub fn request(&self) -> &RequestState {
        match self {
            Screen::Explore(s) => &s.request,
            Screen::Feed(s) => &s.request,
        }
    }

    pub fn owns(&self, request_id: u64) -> bool {
        self.request().in_flight == Some(request_id)
    }

    /// Cancels the outstanding request; its completion will be ignored.
    pub fn teardown(&mut self, dispatcher: &mut dyn Dispatch) {
        match self {
            Screen::Explore(s) => s.request.cancel(dispatcher),
            Screen::Feed(s) => s.request.cancel(dispatcher),
        }
    }

    pub fn item_count(&self) -> usize {
        match self {
            Screen::Explore(s) => s.adapter.item_count(),
            Screen::Feed(s) => s.adapter.item_count(),
        }
    }

    pub fn selected(&self) -> usize {
        match self {
            Screen::Explore(s) => s.selection.index,
            Screen::Feed(s) => s.selection.index,
        }
    }

    /// Applies pending adapter notifications to the selection.
    pub fn sync_changes(&mut self) {
        match self {
            Screen::Explore(s) => drain_changes(&mut s.changes, &mut s.selection),
            Screen::Feed(s) => drain_changes(&mut s.changes, &mut s.selection),
        }
    }

    /// Selects `position` directly, paginating like `move_selection` does.
    pub fn select(&mut self, position: usize, dispatcher: &mut dyn Dispatch) {
        self.sync_changes();
        let position = position.min(self.item_count().saturating_sub(1));
        match self {
            Screen::Explore(s) => s.selection.index = position,
            Screen::Feed(s) => {
                s.selection.index = position;
                if s.near_end(position) {
                    s.load_more(dispatcher);
                }
            }
        }
    }

    /// Moves the selection and asks for the next page when it nears the end.
    pub fn move_selection(&mut self, delta: i32, dispatcher: &mut dyn Dispatch) {
        self.sync_changes();
        let count = self.item_count();
        if count == 0 {
            return;
        }
        let current = self.selected();
        let next = if delta > 0 {
            (current + delta as usize).min(count - 1)
        } else {
            current.saturating_sub(delta.unsigned_abs() as usize)
        };
        match self {
            Screen::Explore(s) => s.selection.index = next,
            Screen::Feed(s) => {
                s.selection.index = next;
                if s.near_end(next) {
                    s.load_more(dispatcher);
                }
            }
        }
    }

    pub fn click(&mut self, position: usize, area: Rect) -> bool {
        match self {
            Screen::Explore(s) => s.adapter.click(position, area),
            Screen::Feed(s) => s.adapter.click(position, area),
        }
    }

    /// Video under the selection, including the header video.
    pub fn selected_video(&self) -> Option<&Video> {
        match self {
            Screen::Explore(_) => None,
            Screen::Feed(s) => s.adapter.get_item(s.selection.index).and_then(|i| i.payload()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::requests::testing::RecordingDispatcher;
    use crate::model::{Paging, ViewType};
    use tokio::sync::mpsc;

    fn video(id: u32) -> Video {
        Video {
            uri: format!("/videos/{}", id),
            name: Some(format!("Video {}", id)),
            ..Default::default()
        }
    }

    fn videos_page(page: u32, ids: &[u32], has_next: bool) -> Response {
        Response::Videos(Collection {
            total: 100,
            page,
            per_page: ids.len() as u32,
            paging: Paging {
                next: has_next.then(|| format!("/next?page={}", page + 1)),
                ..Default::default()
            },
            data: ids.iter().map(|&id| video(id)).collect(),
        })
    }

    fn categories(names: &[&str]) -> Response {
        Response::Categories(Collection {
            total: names.len() as u32,
            page: 1,
            per_page: names.len() as u32,
            paging: Paging::default(),
            data: names
                .iter()
                .map(|n| Category { uri: format!("/categories/{}", n), ..Default::default() })
                .collect(),
        })
    }

    fn done(request_id: u64, result: Result<Response, FetchError>) -> Completion {
        Completion { request_id, result }
    }

    fn explore() -> (ExploreScreen, RecordingDispatcher) {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut dispatcher = RecordingDispatcher::default();
        let mut screen = ExploreScreen::new(tx);
        screen.start(&mut dispatcher);
        (screen, dispatcher)
    }

    fn related() -> (VideoFeedScreen, RecordingDispatcher) {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut dispatcher = RecordingDispatcher::default();
        let mut screen = VideoFeedScreen::new(FeedSource::Related(video(1)), tx);
        screen.start(&mut dispatcher);
        (screen, dispatcher)
    }

    #[test]
    fn explore_success_fills_adapter() {
        let (mut screen, dispatcher) = explore();
        assert!(screen.request.loading);
        let (id, request) = dispatcher.last().cloned().unwrap();
        assert_eq!(request, Request::Categories);

        assert!(screen.on_completion(done(id, Ok(categories(&["music", "travel"])))));
        assert!(!screen.request.loading);
        assert_eq!(screen.request.error, None);
        assert_eq!(screen.adapter.item_count(), 2);
        assert_eq!(screen.adapter.content_at(1).map(|c| c.slug()), Some("travel"));
    }

    #[test]
    fn timeouts_and_500_show_error_panel() {
        for err in [FetchError::Timeout, FetchError::HostUnreachable, FetchError::Server(500)] {
            let (mut screen, dispatcher) = explore();
            let id = dispatcher.last().unwrap().0;
            screen.on_completion(done(id, Err(err)));
            assert!(!screen.request.loading);
            assert_eq!(screen.request.error.as_deref(), Some(LOAD_ERROR_MESSAGE));
        }
    }

    #[test]
    fn other_io_stops_loading_silently() {
        let (mut screen, dispatcher) = explore();
        let id = dispatcher.last().unwrap().0;
        screen.on_completion(done(id, Err(FetchError::OtherIo("reset".into()))));
        assert!(!screen.request.loading);
        assert_eq!(screen.request.error, None);
    }

    #[test]
    fn other_status_codes_fall_through() {
        let (mut screen, dispatcher) = explore();
        let id = dispatcher.last().unwrap().0;
        screen.on_completion(done(id, Err(FetchError::Server(404))));
        assert!(!screen.request.loading);
        assert_eq!(screen.request.error, None);
        assert!(screen.adapter.is_empty());
    }

    #[test]
    fn cancelled_completion_changes_nothing() {
        let (mut screen, dispatcher) = explore();
        let id = dispatcher.last().unwrap().0;
        screen.on_completion(done(id, Err(FetchError::Cancelled)));
        assert!(screen.request.loading);
        assert_eq!(screen.request.error, None);
    }

    #[test]
    fn cancelled_page_keeps_the_loading_marker() {
        let (mut screen, mut dispatcher) = related();
        let id = dispatcher.last().unwrap().0;
        screen.on_completion(done(id, Ok(videos_page(1, &[2, 3], true))));
        assert!(screen.load_more(&mut dispatcher));
        let id = dispatcher.last().unwrap().0;
        let mut changes = Vec::new();
        while let Ok(change) = screen.changes.try_recv() {
            changes.push(change);
        }
        assert!(!changes.is_empty());

        assert!(screen.on_completion(done(id, Err(FetchError::Cancelled))));
        assert!(screen.adapter.is_loading());
        assert_eq!(screen.adapter.item_count(), 4);
        assert_eq!(screen.adapter.view_type_at(3), Some(ViewType::Loading));
        assert_eq!(screen.page, 1);
        assert_eq!(screen.request.error, None);
        assert!(screen.changes.try_recv().is_err());
    }

    #[test]
    fn torn_down_screen_ignores_late_success() {
        let (screen, mut dispatcher) = explore();
        let id = dispatcher.last().unwrap().0;
        let mut screen = Screen::Explore(screen);
        screen.teardown(&mut dispatcher);
        assert_eq!(dispatcher.cancelled, vec![id]);
        assert!(!screen.owns(id));

        assert!(!screen.on_completion(done(id, Ok(categories(&["music"])))));
        assert_eq!(screen.item_count(), 0);
    }

    #[test]
    fn reload_hides_error_and_reissues() {
        let (mut screen, mut dispatcher) = explore();
        let id = dispatcher.last().unwrap().0;
        screen.on_completion(done(id, Err(FetchError::Timeout)));

        screen.reload(&mut dispatcher);
        assert_eq!(screen.request.error, None);
        assert!(screen.request.loading);
        assert_eq!(dispatcher.sent.len(), 2);
        assert_eq!(screen.request.in_flight, Some(dispatcher.last().unwrap().0));
    }

    #[test]
    fn related_feed_starts_with_header() {
        let (screen, dispatcher) = related();
        assert!(screen.adapter.has_header());
        assert_eq!(screen.adapter.view_type_at(0), Some(ViewType::Header));
        assert_eq!(
            dispatcher.last().unwrap().1,
            Request::RelatedVideos { video_id: "1".into(), page: 1 }
        );
    }

    #[test]
    fn pagination_adds_and_removes_marker() {
        let (mut screen, mut dispatcher) = related();
        let id = dispatcher.last().unwrap().0;
        screen.on_completion(done(id, Ok(videos_page(1, &[2, 3, 4], true))));
        assert_eq!(screen.adapter.item_count(), 4);
        assert_eq!(screen.page, 1);
        assert!(screen.can_load_more());

        assert!(screen.load_more(&mut dispatcher));
        assert!(screen.adapter.is_loading());
        assert_eq!(screen.adapter.view_type_at(4), Some(ViewType::Loading));
        assert_eq!(
            dispatcher.last().unwrap().1,
            Request::RelatedVideos { video_id: "1".into(), page: 2 }
        );
        // already in flight
        assert!(!screen.load_more(&mut dispatcher));

        let id = dispatcher.last().unwrap().0;
        screen.on_completion(done(id, Ok(videos_page(2, &[5, 6], false))));
        assert!(!screen.adapter.is_loading());
        assert_eq!(screen.adapter.item_count(), 6);
        assert_eq!(screen.adapter.view_type_at(5), Some(ViewType::Content));
        assert!(screen.is_last_page);
        assert!(!screen.load_more(&mut dispatcher));
    }

    #[test]
    fn failed_page_removes_marker_and_retries_same_page() {
        let (mut screen, mut dispatcher) = related();
        let id = dispatcher.last().unwrap().0;
        screen.on_completion(done(id, Ok(videos_page(1, &[2], true))));
        screen.load_more(&mut dispatcher);
        let id = dispatcher.last().unwrap().0;

        screen.on_completion(done(id, Err(FetchError::Timeout)));
        assert!(!screen.adapter.is_loading());
        assert_eq!(screen.adapter.item_count(), 2);
        assert_eq!(screen.request.error.as_deref(), Some(LOAD_ERROR_MESSAGE));

        screen.reload(&mut dispatcher);
        assert_eq!(
            dispatcher.last().unwrap().1,
            Request::RelatedVideos { video_id: "1".into(), page: 2 }
        );
    }

    #[test]
    fn category_feed_requests_by_slug() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut dispatcher = RecordingDispatcher::default();
        let category = Category { uri: "/categories/travel".into(), ..Default::default() };
        let mut screen = Screen::Feed(VideoFeedScreen::new(FeedSource::Category(category), tx));
        screen.start(&mut dispatcher);
        assert_eq!(screen.title(), "travel");
        assert_eq!(
            dispatcher.last().unwrap().1,
            Request::CategoryVideos { slug: "travel".into(), page: 1 }
        );
    }

    #[test]
    fn selection_near_end_requests_next_page() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut dispatcher = RecordingDispatcher::default();
        let category = Category { uri: "/categories/travel".into(), ..Default::default() };
        let mut screen = Screen::Feed(VideoFeedScreen::new(FeedSource::Category(category), tx));
        screen.start(&mut dispatcher);
        let id = dispatcher.last().unwrap().0;
        screen.on_completion(done(id, Ok(videos_page(1, &[1, 2, 3, 4, 5, 6], true))));

        screen.move_selection(1, &mut dispatcher);
        assert_eq!(dispatcher.sent.len(), 1);
        screen.move_selection(2, &mut dispatcher);
        assert_eq!(screen.selected(), 3);
        assert_eq!(dispatcher.sent.len(), 2);
        assert_eq!(screen.item_count(), 7);

        screen.move_selection(-10, &mut dispatcher);
        assert_eq!(screen.selected(), 0);
    }

    #[test]
    fn direct_select_near_end_requests_next_page() {
        let (screen, mut dispatcher) = related();
        let id = dispatcher.last().unwrap().0;
        let mut screen = Screen::Feed(screen);
        screen.on_completion(done(id, Ok(videos_page(1, &[2, 3, 4, 5, 6, 7], true))));

        screen.select(1, &mut dispatcher);
        assert_eq!(dispatcher.sent.len(), 1);

        screen.select(5, &mut dispatcher);
        assert_eq!(screen.selected(), 5);
        assert_eq!(dispatcher.sent.len(), 2);
        assert_eq!(
            dispatcher.last().unwrap().1,
            Request::RelatedVideos { video_id: "1".into(), page: 2 }
        );
        assert_eq!(screen.item_count(), 8);
    }

    #[test]
    fn clicks_are_forwarded_as_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher = RecordingDispatcher::default();
        let mut screen = Screen::Feed(VideoFeedScreen::new(FeedSource::Related(video(1)), tx));
        screen.start(&mut dispatcher);
        let id = dispatcher.last().unwrap().0;
        screen.on_completion(done(id, Ok(videos_page(1, &[2], false))));

        let area = Rect::new(1, 4, 30, 2);
        assert!(!screen.click(0, area));
        assert!(screen.click(1, area));
        assert_eq!(rx.try_recv().unwrap(), NavEvent::ItemClicked { position: 1, area });
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn selection_follows_inserts_and_removals() {
        let mut selection = Selection::default();
        for p in 0..4 {
            selection.apply(ListChange::Inserted(p));
        }
        assert_eq!(selection.index, 0);

        selection.index = 2;
        selection.apply(ListChange::Inserted(0));
        assert_eq!(selection.index, 3);
        selection.apply(ListChange::Inserted(5));
        assert_eq!(selection.index, 3);
        selection.apply(ListChange::Removed(1));
        assert_eq!(selection.index, 2);

        // removing the selected last row moves up
        selection.index = 4;
        selection.apply(ListChange::Removed(4));
        assert_eq!(selection.index, 3);

        for _ in 0..4 {
            selection.apply(ListChange::Removed(0));
        }
        assert_eq!(selection.index, 0);
    }

    #[test]
    fn selected_video_includes_header() {
        let (screen, _dispatcher) = related();
        let screen = Screen::Feed(screen);
        assert_eq!(screen.selected_video().map(|v| v.id()), Some("1"));
    }
}
