use crate::model::{FetchError, NetworkCause};
use crate::scraper::transport::Transport;

use rand::Rng;
use scraper::Html;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

/// Randomized pause before every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolitenessDelay {
    min: Duration,
    max: Duration,
}

impl PolitenessDelay {
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let low = self.min.as_millis() as u64;
        let high = self.max.as_millis() as u64;
        Duration::from_millis(rand::rng().random_range(low..=high))
    }
}

/// Fetches pages for one site: politeness delay, one GET, status check, DOM parse.
pub struct PageFetcher {
    transport: Arc<dyn Transport>,
    headers: Vec<(String, String)>,
    timeout: Duration,
    delay: PolitenessDelay,
}

impl PageFetcher {
    pub fn new(transport: Arc<dyn Transport>, user_agent: &str, timeout: Duration, delay: PolitenessDelay) -> Self {
        Self {
            transport,
            headers: vec![
                ("User-Agent".to_string(), user_agent.to_string()),
                ("Accept-Language".to_string(), "pt-BR,pt;q=0.9,en;q=0.8".to_string()),
            ],
            timeout,
            delay,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn delay(&self) -> PolitenessDelay {
        self.delay
    }

    /// Only HTTP 200 counts as success. The transport call is bounded by the fetcher's
    /// own timeout as well, so a transport that ignores its deadline still fails fast.
    pub async fn fetch(&self, url: &str) -> Result<Html, FetchError> {
        let pause = self.delay.sample();
        if !pause.is_zero() {
            debug!("Waiting {:?} before GET {}", pause, url);
            sleep(pause).await;
        }

        let response = match timeout(self.timeout, self.transport.get(url, &self.headers, self.timeout)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!("Network error for {}: {}", url, e);
                return Err(e);
            }
            Err(_) => {
                warn!("Request timed out after {:?}: {}", self.timeout, url);
                return Err(FetchError::Network(NetworkCause::Timeout));
            }
        };

        if response.status != 200 {
            warn!("HTTP error {} for {}", response.status, url);
            return Err(FetchError::Http(response.status));
        }

        Ok(Html::parse_document(&response.body))
    }
}
