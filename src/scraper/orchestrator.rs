use crate::config::AppConfig;
use crate::model::{NetworkCause, ScrapeBatch, ScrapeResult, ScrapeStatus, SearchTerm, SiteId};
use crate::scraper::registry::AdapterRegistry;
use crate::scraper::transport::Transport;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{info, warn};

/// Runs the requested adapters for one search term and collects one result per site.
///
/// Adapters share nothing but the transport, so they run concurrently up to
/// `max_concurrency`. A failing adapter only affects its own row. When a deadline is set,
/// adapters still running at expiry are dropped (which cancels their in-flight request)
/// and reported as `NetworkFailure(Timeout)`.
pub struct ScrapeOrchestrator {
    registry: AdapterRegistry,
    max_concurrency: usize,
    deadline: Option<Duration>,
}

impl ScrapeOrchestrator {
    pub fn new(registry: AdapterRegistry) -> Self {
        Self {
            registry,
            max_concurrency: SiteId::ALL.len(),
            deadline: None,
        }
    }

    pub fn from_config(config: &AppConfig, transport: Arc<dyn Transport>) -> Self {
        let mut orchestrator = Self::new(AdapterRegistry::from_config(config, transport))
            .with_max_concurrency(config.max_concurrency);
        orchestrator.deadline = config.batch_deadline();
        orchestrator
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Scrapes `sites` (duplicates ignored, order kept) with the configured deadline.
    pub async fn scrape_all(&self, term: &SearchTerm, sites: &[SiteId]) -> ScrapeBatch {
        let deadline = self.deadline.map(|limit| Instant::now() + limit);
        self.run(term, sites, deadline).await
    }

    /// Same as `scrape_all`, with a caller-imposed deadline for the whole batch.
    pub async fn scrape_all_with_deadline(
        &self,
        term: &SearchTerm,
        sites: &[SiteId],
        deadline: Instant,
    ) -> ScrapeBatch {
        self.run(term, sites, Some(deadline)).await
    }

    async fn run(&self, term: &SearchTerm, sites: &[SiteId], deadline: Option<Instant>) -> ScrapeBatch {
        let started_at = Utc::now();
        let sites = dedup_preserving_order(sites);
        info!("Scraping '{}' on {} site(s)", term, sites.len());

        let results: Vec<ScrapeResult> = stream::iter(sites)
            .map(|site| self.run_site(site, term.as_str(), deadline))
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let batch = ScrapeBatch::new(term.clone(), started_at, results);
        info!(
            "Finished '{}': {} ok, {} failed",
            term,
            batch.succeeded().count(),
            batch.failed().count()
        );
        batch
    }

    async fn run_site(&self, site: SiteId, term: &str, deadline: Option<Instant>) -> ScrapeResult {
        let Some(adapter) = self.registry.get(site) else {
            warn!("No adapter registered for {}", site);
            return ScrapeResult::failed(site, None, ScrapeStatus::Unavailable);
        };

        let Some(deadline) = deadline else {
            return adapter.scrape(term).await;
        };

        // Sites still queued behind the worker limit when time runs out never start.
        if Instant::now() >= deadline {
            warn!("[{}] Batch deadline passed before start", site);
            return timed_out(site);
        }

        match timeout_at(deadline, adapter.scrape(term)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("[{}] Batch deadline expired, request cancelled", site);
                timed_out(site)
            }
        }
    }
}

fn timed_out(site: SiteId) -> ScrapeResult {
    ScrapeResult::failed(site, None, ScrapeStatus::NetworkFailure(NetworkCause::Timeout))
}

fn dedup_preserving_order(sites: &[SiteId]) -> Vec<SiteId> {
    let mut unique = Vec::with_capacity(sites.len());
    for site in sites {
        if !unique.contains(site) {
            unique.push(*site);
        }
    }
    unique
}
