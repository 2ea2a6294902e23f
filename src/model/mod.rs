use serde::{Deserialize, Serialize};

pub mod item;

pub use item::{Item, ViewType};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub link: Option<String>,
}

/// Image variants, ordered by ascending size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pictures {
    #[serde(default)]
    pub sizes: Vec<Size>,
}

impl Pictures {
    /// Link of the largest (last) variant, if it has a non-empty one.
    pub fn largest_link(&self) -> Option<&str> {
        self.sizes
            .last()
            .and_then(|size| size.link.as_deref())
            .filter(|link| !link.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub pictures: Option<Pictures>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub plays: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub canonical: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub duration: u32, // seconds
    #[serde(default)]
    pub created_time: Option<String>, // e.g. "2015-06-13T10:00:00+00:00"
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub pictures: Option<Pictures>,
    #[serde(default)]
    pub stats: Option<Stats>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Video {
    /// Identifier taken from the trailing segment of the resource uri,
    /// `/videos/1234` -> `1234`.
    pub fn id(&self) -> &str {
        last_segment(&self.uri)
    }

    pub fn plays(&self) -> u64 {
        self.stats.as_ref().and_then(|s| s.plays).unwrap_or(0)
    }

    pub fn thumbnail_link(&self) -> Option<&str> {
        self.pictures.as_ref().and_then(Pictures::largest_link)
    }

    pub fn owner_image_link(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.pictures.as_ref())
            .and_then(Pictures::largest_link)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub pictures: Option<Pictures>,
}

impl Category {
    /// Short name used to address the category, `/categories/animation` -> `animation`.
    pub fn slug(&self) -> &str {
        last_segment(&self.uri)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
}

/// One page of a listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection<T> {
    #[serde(default)]
    pub total: u32,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub paging: Paging,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

fn first_page() -> u32 {
    1
}

impl<T> Collection<T> {
    pub fn is_last_page(&self) -> bool {
        self.paging.next.is_none()
    }
}

pub type VideosCollection = Collection<Video>;
pub type CategoriesCollection = Collection<Category>;

fn last_segment(uri: &str) -> &str {
    uri.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}
