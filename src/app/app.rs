use std::sync::Arc;
use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::model::{Category, Video};
use crate::sys::format::SystemRelativizer;
use crate::sys::image::ImageLoader;
use crate::sys::vimeo::VimeoClient;

use super::requests::{Completion, Dispatch, RequestDispatcher};
use super::screen::{ExploreScreen, FeedSource, NavEvent, Screen, VideoFeedScreen};

const IMAGE_CACHE_SIZE: usize = 50;

pub struct App {
    pub running: bool,
    /// Navigation stack; the last screen is the one on display.
    pub screens: Vec<Screen>,
    // Async Communication
    pub dispatcher: Box<dyn Dispatch>,
    pub completion_rx: UnboundedReceiver<Completion>,
    pub nav_tx: UnboundedSender<NavEvent>,
    pub nav_rx: UnboundedReceiver<NavEvent>,
    // Images
    pub images: ImageLoader,
    pub relativizer: SystemRelativizer,
    // Messages/Status
    pub status_message: Option<String>,
    pub clipboard: Option<arboard::Clipboard>,
    // Layout from the last draw, used for mouse hit testing
    pub list_state: ListState,
    pub row_areas: Vec<(usize, Rect)>,
    pub last_click_time: Option<Instant>,
    pub last_click_pos: Option<(u16, u16)>,
}

impl App {
    pub fn new(client: VimeoClient) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let dispatcher = RequestDispatcher::new(Arc::new(client), completion_tx);
        Self::with_dispatcher(
            Box::new(dispatcher),
            completion_rx,
            ImageLoader::spawn(IMAGE_CACHE_SIZE),
        )
    }

    pub fn with_dispatcher(
        dispatcher: Box<dyn Dispatch>,
        completion_rx: UnboundedReceiver<Completion>,
        images: ImageLoader,
    ) -> Self {
        let (nav_tx, nav_rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            screens: Vec::new(),
            dispatcher,
            completion_rx,
            nav_tx,
            nav_rx,
            images,
            relativizer: SystemRelativizer,
            status_message: None,
            clipboard: arboard::Clipboard::new().ok(),
            list_state: ListState::default(),
            row_areas: Vec::new(),
            last_click_time: None,
            last_click_pos: None,
        }
    }

    pub fn current(&self) -> Option<&Screen> {
        self.screens.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Screen> {
        self.screens.last_mut()
    }

    pub fn push_screen(&mut self, mut screen: Screen) {
        screen.start(self.dispatcher.as_mut());
        log::info!("opening screen '{}'", screen.title());
        self.screens.push(screen);
        self.list_state = ListState::default();
        self.row_areas.clear();
    }

    /// Leaves the current screen. The root screen is never popped.
    pub fn pop_screen(&mut self) -> bool {
        if self.screens.len() <= 1 {
            return false;
        }
        if let Some(mut screen) = self.screens.pop() {
            screen.teardown(self.dispatcher.as_mut());
        }
        self.list_state = ListState::default();
        self.row_areas.clear();
        true
    }

    pub fn open_explore(&mut self) {
        let screen = ExploreScreen::new(self.nav_tx.clone());
        self.push_screen(Screen::Explore(screen));
    }

    pub fn open_category(&mut self, category: Category) {
        let screen = VideoFeedScreen::new(FeedSource::Category(category), self.nav_tx.clone());
        self.push_screen(Screen::Feed(screen));
    }

    pub fn open_video(&mut self, video: Video) {
        let screen = VideoFeedScreen::new(FeedSource::Related(video), self.nav_tx.clone());
        self.push_screen(Screen::Feed(screen));
    }

    /// Tears down every screen, cancelling whatever is still in flight.
    pub fn shutdown(&mut self) {
        while let Some(mut screen) = self.screens.pop() {
            screen.teardown(self.dispatcher.as_mut());
        }
        self.running = false;
    }
}
