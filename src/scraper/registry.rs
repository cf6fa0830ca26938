use crate::config::AppConfig;
use crate::model::SiteId;
use crate::scraper::fetcher::PageFetcher;
use crate::scraper::sites::{
    AmazonAdapter, AmericanasAdapter, EstanteVirtualAdapter, MercadoLivreAdapter, TravessaAdapter,
};
use crate::scraper::traits::SiteAdapter;
use crate::scraper::transport::Transport;

use std::collections::BTreeMap;
use std::sync::Arc;

/// Explicit `SiteId -> adapter` table assembled at startup.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: BTreeMap<SiteId, Arc<dyn SiteAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All five retailers, each with its own fetcher (user agent, delay) over a shared transport.
    pub fn from_config(config: &AppConfig, transport: Arc<dyn Transport>) -> Self {
        let fetcher = |site: SiteId| {
            PageFetcher::new(
                transport.clone(),
                config.user_agent_for(site),
                config.request_timeout(),
                config.delay_for(site),
            )
        };

        Self::new()
            .with(AmazonAdapter::new(fetcher(SiteId::Amazon)))
            .with(MercadoLivreAdapter::new(fetcher(SiteId::MercadoLivre)))
            .with(EstanteVirtualAdapter::new(fetcher(SiteId::EstanteVirtual)))
            .with(AmericanasAdapter::new(fetcher(SiteId::Americanas)))
            .with(TravessaAdapter::new(fetcher(SiteId::Travessa)))
    }

    pub fn with(mut self, adapter: impl SiteAdapter + 'static) -> Self {
        self.register(Arc::new(adapter));
        self
    }

    /// Replaces any adapter already registered for the same site.
    pub fn register(&mut self, adapter: Arc<dyn SiteAdapter>) {
        self.adapters.insert(adapter.site(), adapter);
    }

    pub fn get(&self, site: SiteId) -> Option<Arc<dyn SiteAdapter>> {
        self.adapters.get(&site).cloned()
    }

    pub fn sites(&self) -> Vec<SiteId> {
        self.adapters.keys().copied().collect()
    }
}
