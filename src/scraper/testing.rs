// In-memory transport with scripted responses, for tests only
use crate::model::{FetchError, NetworkCause};
use crate::scraper::transport::{Transport, TransportResponse};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub enum FakeRoute {
    Respond { status: u16, body: String },
    Fail(FetchError),
    /// Never answers; only a timeout or cancellation ends the request.
    Hang,
}

impl FakeRoute {
    pub fn page(body: &str) -> Self {
        FakeRoute::Respond { status: 200, body: body.to_string() }
    }

    pub fn status(status: u16, body: &str) -> Self {
        FakeRoute::Respond { status, body: body.to_string() }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Tokio clock reading when the request reached the transport.
    pub at: Instant,
}

/// Unknown URLs fail with a connection error.
#[derive(Default)]
pub struct FakeTransport {
    routes: HashMap<String, FakeRoute>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, route: FakeRoute) -> Self {
        self.routes.insert(url.to_string(), route);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        _timeout: Duration,
    ) -> Result<TransportResponse, FetchError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            headers: headers.to_vec(),
            at: Instant::now(),
        });

        match self.routes.get(url).cloned() {
            Some(FakeRoute::Respond { status, body }) => Ok(TransportResponse { status, body }),
            Some(FakeRoute::Fail(err)) => Err(err),
            Some(FakeRoute::Hang) => std::future::pending().await,
            None => Err(FetchError::Network(NetworkCause::Transport(format!(
                "connection refused: {url}"
            )))),
        }
    }
}
