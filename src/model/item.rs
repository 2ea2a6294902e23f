/// One row of an adapter's backing sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Item<T> {
    Header(T),
    Content(T),
    LoadingMarker,
}

impl<T> Item<T> {
    pub fn view_type(&self) -> ViewType {
        match self {
            Item::Header(_) => ViewType::Header,
            Item::Content(_) => ViewType::Content,
            Item::LoadingMarker => ViewType::Loading,
        }
    }

    pub fn content(&self) -> Option<&T> {
        match self {
            Item::Content(value) => Some(value),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            Item::Header(value) | Item::Content(value) => Some(value),
            Item::LoadingMarker => None,
        }
    }

    pub fn is_loading_marker(&self) -> bool {
        matches!(self, Item::LoadingMarker)
    }
}

/// Layout/binding code the rendering surface switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewType {
    Content,
    Loading,
    Header,
}

