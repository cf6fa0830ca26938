use crate::model::{MissingField, ScrapeResult, ScrapeStatus, SiteId};
use crate::parser::price::{PriceLocale, PriceText};
use crate::scraper::block::BlockDetector;
use crate::scraper::fetcher::PageFetcher;

use async_trait::async_trait;
use scraper::Html;
use tracing::{info, warn};

/// Title and raw price pulled from a product page. Either may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDetails {
    pub title: Option<String>,
    pub price: Option<PriceText>,
}

/// Site-specific scraping: URL template, selectors and the shared scrape chain.
///
/// Implementors only describe *where* things are on their site; `scrape` drives the
/// fetch → block check → locate → fetch → extract → parse sequence and turns every
/// failure into a `ScrapeStatus`.
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    fn site(&self) -> SiteId;

    fn fetcher(&self) -> &PageFetcher;

    fn build_search_url(&self, term: &str) -> String;

    /// Absolute URL of the first organic product on the search results page.
    fn locate_first_result_link(&self, search_page: &Html) -> Option<String>;

    fn extract_details(&self, product_page: &Html) -> ProductDetails;

    fn price_locale(&self) -> PriceLocale {
        PriceLocale::PtBr
    }

    async fn scrape(&self, term: &str) -> ScrapeResult {
        let site = self.site();
        let search_url = self.build_search_url(term);
        info!("Searching for '{}' on {}: {}", term, site.display_name(), search_url);

        // Parsed documents are not Send, so each one lives in its own block between awaits.
        let link = {
            let search_page = match self.fetcher().fetch(&search_url).await {
                Ok(doc) => doc,
                Err(e) => {
                    warn!("[{}] Could not fetch search page: {}", site, e);
                    return ScrapeResult::failed(site, None, e.into());
                }
            };
            if BlockDetector::is_blocked(&search_page, site) {
                warn!("[{}] Search page is a block/verification page", site);
                return ScrapeResult::failed(site, None, ScrapeStatus::Blocked);
            }
            match self.locate_first_result_link(&search_page) {
                Some(link) => link,
                None => {
                    warn!("[{}] No product results for '{}'", site, term);
                    return ScrapeResult::failed(
                        site,
                        None,
                        ScrapeStatus::NotFound(MissingField::ProductLink),
                    );
                }
            }
        };
        info!("[{}] Found product link: {}", site, link);

        let details = {
            let fetched = self.fetcher().fetch(&link).await;
            let product_page = match fetched {
                Ok(doc) => doc,
                Err(e) => {
                    warn!("[{}] Could not fetch product page: {}", site, e);
                    return ScrapeResult::failed(site, Some(link), e.into());
                }
            };
            if BlockDetector::is_blocked(&product_page, site) {
                warn!("[{}] Product page is a block/verification page", site);
                return ScrapeResult::failed(site, Some(link), ScrapeStatus::Blocked);
            }
            self.extract_details(&product_page)
        };

        let Some(title) = details.title else {
            warn!("[{}] Title not found on {}", site, link);
            return ScrapeResult::failed(site, Some(link), ScrapeStatus::NotFound(MissingField::Title));
        };
        let Some(raw_price) = details.price else {
            warn!("[{}] Price not found on {}", site, link);
            return ScrapeResult::failed(site, Some(link), ScrapeStatus::NotFound(MissingField::Price));
        };

        match raw_price.parse(self.price_locale()) {
            Ok(price) => {
                info!("[{}] Extracted '{}' at {:.2}", site, title, price);
                ScrapeResult::ok(site, link, title, price)
            }
            Err(e) => {
                warn!("[{}] {}", site, e);
                ScrapeResult::failed(site, Some(link), ScrapeStatus::ParseFailure(raw_price.raw()))
            }
        }
    }
}
