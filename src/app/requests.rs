use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

use crate::model::{CategoriesCollection, VideosCollection};
use crate::sys::vimeo::{FetchError, VideoService};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Categories,
    CategoryVideos { slug: String, page: u32 },
    RelatedVideos { video_id: String, page: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Categories(CategoriesCollection),
    Videos(VideosCollection),
}

/// Result of one request, tagged with the id it was dispatched under.
#[derive(Debug, Clone)]
pub struct Completion {
    pub request_id: u64,
    pub result: Result<Response, FetchError>,
}

/// Issues requests off the UI thread. Completions come back through a channel the
/// UI loop drains, so adapters are only ever touched from the loop.
pub trait Dispatch {
    fn dispatch(&mut self, request: Request) -> u64;
    fn cancel(&mut self, request_id: u64);

    /// Called once the completion for `request_id` has been drained.
    fn finished(&mut self, _request_id: u64) {}
}

pub struct RequestDispatcher<S: VideoService> {
    service: Arc<S>,
    completion_tx: UnboundedSender<Completion>,
    next_id: u64,
    cancel_handles: HashMap<u64, oneshot::Sender<()>>,
}

impl<S: VideoService> RequestDispatcher<S> {
    pub fn new(service: Arc<S>, completion_tx: UnboundedSender<Completion>) -> Self {
        Self {
            service,
            completion_tx,
            next_id: 1,
            cancel_handles: HashMap::new(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.cancel_handles.len()
    }
}

async fn perform<S: VideoService>(service: &S, request: Request) -> Result<Response, FetchError> {
    match request {
        Request::Categories => service.fetch_categories().await.map(Response::Categories),
        Request::CategoryVideos { slug, page } => service
            .fetch_category_videos(&slug, page)
            .await
            .map(Response::Videos),
        Request::RelatedVideos { video_id, page } => service
            .fetch_related_videos(&video_id, page)
            .await
            .map(Response::Videos),
    }
}

impl<S: VideoService> Dispatch for RequestDispatcher<S> {
    fn dispatch(&mut self, request: Request) -> u64 {
        let request_id = self.next_id;
        self.next_id += 1;

        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        self.cancel_handles.insert(request_id, cancel_tx);

        let service = self.service.clone();
        let tx = self.completion_tx.clone();
        log::debug!("request #{} {:?}", request_id, request);

        tokio::spawn(async move {
            let result = tokio::select! {
                res = perform(service.as_ref(), request) => res,
                _ = cancel_rx => Err(FetchError::Cancelled),
            };
            let _ = tx.send(Completion { request_id, result });
        });

        request_id
    }

    fn cancel(&mut self, request_id: u64) {
        if let Some(handle) = self.cancel_handles.remove(&request_id) {
            log::debug!("canceling request #{}", request_id);
            let _ = handle.send(());
        }
    }

    fn finished(&mut self, request_id: u64) {
        self.cancel_handles.remove(&request_id);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Collection, Paging};
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct StubService {
        delay: Duration,
    }

    impl VideoService for StubService {
        async fn fetch_categories(&self) -> Result<CategoriesCollection, FetchError> {
            tokio::time::sleep(self.delay).await;
            Ok(Collection {
                total: 1,
                page: 1,
                per_page: 1,
                paging: Paging::default(),
                data: vec![Category { uri: "/categories/music".into(), ..Default::default() }],
            })
        }

        async fn fetch_category_videos(
            &self,
            _slug: &str,
            _page: u32,
        ) -> Result<VideosCollection, FetchError> {
            Err(FetchError::Server(500))
        }

        async fn fetch_related_videos(
            &self,
            _video_id: &str,
            _page: u32,
        ) -> Result<VideosCollection, FetchError> {
            Err(FetchError::Timeout)
        }
    }

    #[tokio::test]
    async fn completion_carries_request_id() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher =
            RequestDispatcher::new(Arc::new(StubService { delay: Duration::ZERO }), tx);

        let first = dispatcher.dispatch(Request::Categories);
        let second = dispatcher.dispatch(Request::CategoryVideos { slug: "music".into(), page: 1 });
        assert_ne!(first, second);
        assert_eq!(dispatcher.in_flight(), 2);

        let mut seen = Vec::new();
        for _ in 0..2 {
            let completion = rx.recv().await.unwrap();
            dispatcher.finished(completion.request_id);
            seen.push((completion.request_id, completion.result.is_ok()));
        }
        seen.sort();
        assert_eq!(seen, vec![(first, true), (second, false)]);
        assert_eq!(dispatcher.in_flight(), 0);
    }

    #[tokio::test]
    async fn cancelled_request_completes_as_cancelled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dispatcher =
            RequestDispatcher::new(Arc::new(StubService { delay: Duration::from_secs(30) }), tx);

        let id = dispatcher.dispatch(Request::Categories);
        dispatcher.cancel(id);

        let completion = rx.recv().await.unwrap();
        assert_eq!(completion.request_id, id);
        assert_eq!(completion.result.unwrap_err(), FetchError::Cancelled);
    }
}
