// Multi-site book price scraping: per-retailer adapters plus a batch orchestrator.

pub mod config;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod scraper;
pub mod utils;

pub use config::{load_config, AppConfig};
pub use model::{ScrapeBatch, ScrapeResult, ScrapeStatus, SearchTerm, SiteId};
pub use crate::scraper::{AdapterRegistry, ScrapeOrchestrator};
