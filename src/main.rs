use book_price_scraper::config::{load_config, AppConfig, ConfigError};
use book_price_scraper::model::SearchTerm;
use book_price_scraper::scraper::{ReqwestTransport, ScrapeOrchestrator};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "config.json";

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let term = match SearchTerm::new(args.join(" ")) {
        Ok(term) => term,
        Err(_) => {
            error!("Usage: book-price-scraper <search term>");
            std::process::exit(2);
        }
    };

    let config = match load_config(CONFIG_PATH) {
        Ok(cfg) => cfg,
        Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No {} found, using defaults", CONFIG_PATH);
            AppConfig::default()
        }
        Err(e) => {
            error!("Config load error: {}", e);
            std::process::exit(1);
        }
    };

    let transport = match ReqwestTransport::new() {
        Ok(t) => Arc::new(t),
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let orchestrator = ScrapeOrchestrator::from_config(&config, transport);
    let batch = orchestrator.scrape_all(&term, &config.enabled_sites()).await;

    for result in batch.iter() {
        match (result.title(), result.price()) {
            (Some(title), Some(price)) => info!(
                "{:<16} R$ {:>9.2}  {}  {}",
                result.site().display_name(),
                price,
                title,
                result.link().unwrap_or_default()
            ),
            _ => warn!("{:<16} {}", result.site().display_name(), result.status()),
        }
    }

    match serde_json::to_string_pretty(&batch) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize results: {}", e),
    }
}
