use std::future::Future;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::model::{CategoriesCollection, VideosCollection};

const ACCEPT_VERSION: &str = "application/vnd.vimeo.*+json;version=3.2";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("host unreachable")]
    HostUnreachable,
    #[error("request canceled")]
    Cancelled,
    #[error("io error: {0}")]
    OtherIo(String),
    #[error("server responded with {0}")]
    Server(u16),
    #[error("unreadable response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::HostUnreachable
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Server(status.as_u16())
        } else {
            FetchError::OtherIo(err.to_string())
        }
    }
}

/// Remote listing endpoints the screens depend on.
pub trait VideoService: Send + Sync + 'static {
    fn fetch_categories(
        &self,
    ) -> impl Future<Output = Result<CategoriesCollection, FetchError>> + Send;

    fn fetch_category_videos(
        &self,
        slug: &str,
        page: u32,
    ) -> impl Future<Output = Result<VideosCollection, FetchError>> + Send;

    fn fetch_related_videos(
        &self,
        video_id: &str,
        page: u32,
    ) -> impl Future<Output = Result<VideosCollection, FetchError>> + Send;
}

pub struct VimeoClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
    per_page: u32,
}

impl VimeoClient {
    pub fn new(
        base_url: &str,
        access_token: Option<String>,
        per_page: u32,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("loop/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
            per_page,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.get(&url).header(ACCEPT, ACCEPT_VERSION).query(query);
        if let Some(token) = &self.access_token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await.map_err(|e| {
            log::error!("GET {} failed: {}", url, e);
            FetchError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            log::error!("GET {} -> {} {}", url, status.as_u16(), status.canonical_reason().unwrap_or(""));
            return Err(FetchError::Server(status.as_u16()));
        }
        log::debug!("GET {} -> {}", url, status.as_u16());

        let body = response.bytes().await.map_err(FetchError::from)?;
        serde_json::from_slice::<T>(&body).map_err(|e| {
            log::error!("GET {} returned an unreadable body: {}", url, e);
            FetchError::Decode(e.to_string())
        })
    }

    fn page_query(&self, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("page", page.to_string()),
            ("per_page", self.per_page.to_string()),
        ]
    }
}

impl VideoService for VimeoClient {
    async fn fetch_categories(&self) -> Result<CategoriesCollection, FetchError> {
        self.get("/categories", &[]).await
    }

    async fn fetch_category_videos(
        &self,
        slug: &str,
        page: u32,
    ) -> Result<VideosCollection, FetchError> {
        let path = format!("/categories/{}/videos", slug);
        self.get(&path, &self.page_query(page)).await
    }

    async fn fetch_related_videos(
        &self,
        video_id: &str,
        page: u32,
    ) -> Result<VideosCollection, FetchError> {
        let path = format!("/videos/{}/videos", video_id);
        let mut query = vec![("filter", "related".to_string())];
        query.extend(self.page_query(page));
        self.get(&path, &query).await
    }
}
