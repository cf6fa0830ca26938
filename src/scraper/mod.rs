// Fetching, block detection, site adapters and batch orchestration

pub mod block;
pub mod fetcher;
pub mod orchestrator;
pub mod registry;
pub mod sites;
pub mod traits;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use block::BlockDetector;
pub use fetcher::{PageFetcher, PolitenessDelay};
pub use orchestrator::ScrapeOrchestrator;
pub use registry::AdapterRegistry;
pub use traits::{ProductDetails, SiteAdapter};
pub use transport::{ReqwestTransport, Transport, TransportResponse};
