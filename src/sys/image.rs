use anyhow::{Result, Context};
use image::DynamicImage;
use lru::LruCache;
use std::collections::HashSet;
use std::num::NonZeroUsize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub async fn download_image(url: &str) -> Result<DynamicImage> {
    let bytes = reqwest::get(url).await?.error_for_status()?.bytes().await?;
    let img = image::load_from_memory(&bytes)
        .context("Failed to decode image")?;
    Ok(img)
}

/// Fire-and-forget image fetching; decoded images are picked up on the next poll.
pub struct ImageLoader {
    request_tx: UnboundedSender<String>,
    result_rx: UnboundedReceiver<(String, Option<DynamicImage>)>,
    cache: LruCache<String, DynamicImage>,
    pending: HashSet<String>,
    /// Urls whose last download failed; not requested again until forgotten.
    failed: HashSet<String>,
}

impl ImageLoader {
    pub fn spawn(capacity: usize) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<String>();
        let (result_tx, result_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(url) = request_rx.recv().await {
                let tx = result_tx.clone();
                tokio::spawn(async move {
                    let img = match download_image(&url).await {
                        Ok(img) => Some(img),
                        Err(e) => {
                            log::error!("image {} failed: {:#}", url, e);
                            None
                        }
                    };
                    let _ = tx.send((url, img));
                });
            }
        });

        Self::with_channels(request_tx, result_rx, capacity)
    }

    fn with_channels(
        request_tx: UnboundedSender<String>,
        result_rx: UnboundedReceiver<(String, Option<DynamicImage>)>,
        capacity: usize,
    ) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            request_tx,
            result_rx,
            cache: LruCache::new(capacity),
            pending: HashSet::new(),
            failed: HashSet::new(),
        }
    }

    pub fn load(&mut self, url: &str) {
        if url.is_empty()
            || self.cache.contains(url)
            || self.pending.contains(url)
            || self.failed.contains(url)
        {
            return;
        }
        if self.request_tx.send(url.to_string()).is_ok() {
            self.pending.insert(url.to_string());
        }
    }

    pub fn poll(&mut self) {
        while let Ok((url, img)) = self.result_rx.try_recv() {
            self.pending.remove(&url);
            match img {
                Some(img) => {
                    self.cache.put(url, img);
                }
                None => {
                    self.failed.insert(url);
                }
            }
        }
    }

    /// Lets failed urls be requested again.
    pub fn forget_failures(&mut self) {
        self.failed.clear();
    }

    pub fn get(&mut self, url: &str) -> Option<&DynamicImage> {
        self.cache.get(url)
    }
}
