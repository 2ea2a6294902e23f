use crate::app::adapter::ListAdapter;
use crate::model::{Category, Item, Video};
use crate::sys::format::{
    DateRelativizer, ViewCountStyle, format_duration, format_tags, format_view_count,
    relative_created_time,
};

/// What a surface draws at one position.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundRow<C, H> {
    Header(H),
    Content(C),
    Loading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRow {
    pub title: String,
    /// `None` leaves the subtitle as it was.
    pub subtitle: Option<String>,
    /// `None` means no image is set.
    pub thumbnail: Option<String>,
    pub duration: String,
    pub uploaded: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerImage {
    Remote(String),
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoHeader {
    pub title: String,
    pub subtitle: Option<String>,
    pub owner_image: OwnerImage,
    pub description: Option<String>,
    pub view_count: Option<String>,
    pub uploaded: Option<String>,
    pub tags: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    pub title: String,
    pub thumbnail: Option<String>,
}

fn title_of(name: Option<&str>) -> String {
    name.unwrap_or_default().to_string()
}

fn subtitle_of(video: &Video) -> Option<String> {
    video
        .user
        .as_ref()
        .and_then(|u| u.name.as_deref())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// "{relative} - {compact views}", falling back to whichever part is present.
pub fn row_uploaded_label(video: &Video, relativizer: &dyn DateRelativizer) -> String {
    let uploaded = relative_created_time(video.created_time.as_deref(), relativizer);
    let plays = video.plays();
    if plays > 0 {
        let views = format_view_count(plays, ViewCountStyle::Compact);
        if uploaded.is_empty() {
            views
        } else {
            format!("{} - {}", uploaded, views)
        }
    } else {
        uploaded
    }
}

pub fn bind_video_row(video: &Video, relativizer: &dyn DateRelativizer) -> VideoRow {
    VideoRow {
        title: title_of(video.name.as_deref()),
        subtitle: subtitle_of(video),
        thumbnail: video.thumbnail_link().map(str::to_string),
        duration: format_duration(video.duration),
        uploaded: row_uploaded_label(video, relativizer),
    }
}

pub fn bind_video_header(video: &Video, relativizer: &dyn DateRelativizer) -> VideoHeader {
    let uploaded = relative_created_time(video.created_time.as_deref(), relativizer);
    let plays = video.plays();
    VideoHeader {
        title: title_of(video.name.as_deref()),
        subtitle: subtitle_of(video),
        owner_image: match video.owner_image_link() {
            Some(link) => OwnerImage::Remote(link.to_string()),
            None => OwnerImage::Placeholder,
        },
        description: video
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        view_count: (plays > 0).then(|| format_view_count(plays, ViewCountStyle::Grouped)),
        uploaded: (!uploaded.is_empty()).then(|| format!("Uploaded {}", uploaded)),
        tags: (!video.tags.is_empty()).then(|| format_tags(&video.tags)),
    }
}

pub fn bind_category_row(category: &Category) -> CategoryRow {
    CategoryRow {
        title: title_of(category.name.as_deref()),
        thumbnail: category
            .pictures
            .as_ref()
            .and_then(|p| p.largest_link())
            .map(str::to_string),
    }
}

impl ListAdapter<Video> {
    pub fn bind(
        &self,
        position: usize,
        relativizer: &dyn DateRelativizer,
    ) -> Option<BoundRow<VideoRow, VideoHeader>> {
        self.get_item(position).map(|item| match item {
            Item::Header(video) => BoundRow::Header(bind_video_header(video, relativizer)),
            Item::Content(video) => BoundRow::Content(bind_video_row(video, relativizer)),
            Item::LoadingMarker => BoundRow::Loading,
        })
    }
}

impl ListAdapter<Category> {
    pub fn bind(&self, position: usize) -> Option<BoundRow<CategoryRow, CategoryRow>> {
        self.get_item(position).map(|item| match item {
            Item::Header(category) => BoundRow::Header(bind_category_row(category)),
            Item::Content(category) => BoundRow::Content(bind_category_row(category)),
            Item::LoadingMarker => BoundRow::Loading,
        })
    }
}
