use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::model::{Item, ViewType};

/// Positional change raised after every single mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    Inserted(usize),
    Removed(usize),
    Changed(usize),
}

/// Called with the activated row's position and the area it was drawn into.
pub type OnItemClick = Box<dyn FnMut(usize, Rect) + Send>;

/// Ordered rows for a list surface: an optional leading header, content rows in
/// server order, and an optional trailing loading marker while a page is in flight.
pub struct ListAdapter<T> {
    items: Vec<Item<T>>,
    has_header: bool,
    loading_active: bool,
    change_tx: Option<UnboundedSender<ListChange>>,
    on_item_click: Option<OnItemClick>,
}

impl<T> Default for ListAdapter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListAdapter<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            has_header: false,
            loading_active: false,
            change_tx: None,
            on_item_click: None,
        }
    }

    pub fn set_change_listener(&mut self, tx: UnboundedSender<ListChange>) {
        self.change_tx = Some(tx);
    }

    pub fn set_on_item_click(&mut self, listener: OnItemClick) {
        self.on_item_click = Some(listener);
    }

    fn notify(&self, change: ListChange) {
        if let Some(tx) = &self.change_tx {
            let _ = tx.send(change);
        }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_header(&self) -> bool {
        self.has_header
    }

    pub fn is_loading(&self) -> bool {
        self.loading_active
    }

    pub fn get_item(&self, position: usize) -> Option<&Item<T>> {
        self.items.get(position)
    }

    pub fn content_at(&self, position: usize) -> Option<&T> {
        self.items.get(position).and_then(Item::content)
    }

    pub fn view_type_at(&self, position: usize) -> Option<ViewType> {
        self.items.get(position).map(Item::view_type)
    }

    /// Puts the featured item at position 0, replacing any existing header.
    pub fn add_header(&mut self, header: T) {
        if self.has_header {
            self.items[0] = Item::Header(header);
            self.notify(ListChange::Changed(0));
            return;
        }
        self.items.insert(0, Item::Header(header));
        self.has_header = true;
        self.notify(ListChange::Inserted(0));
    }

    fn add(&mut self, value: T) {
        // content always lands before a trailing loading marker
        let position = if self.loading_active {
            self.marker_position().unwrap_or(self.items.len())
        } else {
            self.items.len()
        };
        self.items.insert(position, Item::Content(value));
        self.notify(ListChange::Inserted(position));
    }

    /// One insert notification per element, in input order.
    pub fn add_all<I: IntoIterator<Item = T>>(&mut self, values: I) {
        for value in values {
            self.add(value);
        }
    }

    /// Appends the loading marker. A second call while one is present does nothing.
    pub fn add_loading(&mut self) {
        if self.marker_position().is_some() {
            log::warn!("loading marker already present");
            self.loading_active = true;
            return;
        }
        self.loading_active = true;
        self.items.push(Item::LoadingMarker);
        self.notify(ListChange::Inserted(self.items.len() - 1));
    }

    /// Clears the loading flag and removes the marker wherever it sits.
    /// Returns whether a marker was removed.
    ///
    /// Unlike a plain "drop the last row", the count only shrinks when a marker
    /// exists, so calling this without one never deletes a content row.
    pub fn remove_loading(&mut self) -> bool {
        self.loading_active = false;
        match self.marker_position() {
            Some(position) => {
                self.items.remove(position);
                self.notify(ListChange::Removed(position));
                true
            }
            None => false,
        }
    }

    fn marker_position(&self) -> Option<usize> {
        self.items.iter().rposition(Item::is_loading_marker)
    }

    fn remove_at(&mut self, position: usize) {
        let removed = self.items.remove(position);
        match removed {
            Item::Header(_) => self.has_header = false,
            Item::LoadingMarker => self.loading_active = false,
            Item::Content(_) => {}
        }
        self.notify(ListChange::Removed(position));
    }

    /// Removes items one at a time from the front, one notification each.
    pub fn clear(&mut self) {
        while !self.items.is_empty() {
            self.remove_at(0);
        }
    }

    /// Fires the click listener for content rows only.
    pub fn click(&mut self, position: usize, area: Rect) -> bool {
        if self.view_type_at(position) != Some(ViewType::Content) {
            return false;
        }
        match self.on_item_click.as_mut() {
            Some(listener) => {
                listener(position, area);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item<T>> {
        self.items.iter()
    }
}

impl<T: PartialEq> ListAdapter<T> {
    /// Removes the first header or content item equal to `value`.
    pub fn remove(&mut self, value: &T) -> bool {
        let position = self
            .items
            .iter()
            .position(|item| item.payload() == Some(value));
        match position {
            Some(position) => {
                self.remove_at(position);
                true
            }
            None => false,
        }
    }
}
