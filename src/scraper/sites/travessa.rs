use crate::model::SiteId;
use crate::normalizer::capitalize;
use crate::parser::selectors::{first_match, Extracted, Lookup};
use crate::scraper::fetcher::PageFetcher;
use crate::scraper::traits::{ProductDetails, SiteAdapter};
use crate::utils::{absolute_url, encode_query};

use async_trait::async_trait;
use scraper::Html;

pub const BASE_URL: &str = "https://www.travessa.com.br";

pub(crate) const RESULT_LINK: &[Lookup] = &[
    Lookup::Attr { css: "h4.search-result-item-heading a", attr: "href" },
    Lookup::Attr { css: ".search-result-item a.product-link", attr: "href" },
];

pub(crate) const TITLE: &[Lookup] = &[
    Lookup::Text("#lblNomArtigo"),
    Lookup::Text("h1.product__name"),
];

pub(crate) const PRICE: &[Lookup] = &[
    Lookup::Text("#litPreco"),
    Lookup::Text("span.product__price--sale"),
];

pub struct TravessaAdapter {
    fetcher: PageFetcher,
}

impl TravessaAdapter {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl SiteAdapter for TravessaAdapter {
    fn site(&self) -> SiteId {
        SiteId::Travessa
    }

    fn fetcher(&self) -> &PageFetcher {
        &self.fetcher
    }

    fn build_search_url(&self, term: &str) -> String {
        format!(
            "{}/Busca.aspx?d=1&refinada=s&cta=1&tt={}&o=1",
            BASE_URL,
            encode_query(term)
        )
    }

    fn locate_first_result_link(&self, search_page: &Html) -> Option<String> {
        let href = first_match(search_page, RESULT_LINK)?.into_text();
        absolute_url(BASE_URL, &href)
    }

    // Travessa prints titles in capitals.
    fn extract_details(&self, product_page: &Html) -> ProductDetails {
        ProductDetails {
            title: first_match(product_page, TITLE).map(|title| capitalize(&title.into_text())),
            price: first_match(product_page, PRICE).map(Extracted::into_price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NetworkCause, ScrapeStatus};
    use crate::scraper::fetcher::PolitenessDelay;
    use crate::scraper::testing::{FakeRoute, FakeTransport};
    use std::sync::Arc;
    use std::time::Duration;

    const SEARCH_URL: &str = "https://www.travessa.com.br/Busca.aspx?d=1&refinada=s&cta=1&tt=Clean+Code&o=1";

    fn adapter(transport: FakeTransport, timeout: Duration) -> TravessaAdapter {
        TravessaAdapter::new(PageFetcher::new(
            Arc::new(transport),
            "TestAgent/1.0",
            timeout,
            PolitenessDelay::none(),
        ))
    }

    #[test]
    fn builds_search_url() {
        let travessa = adapter(FakeTransport::new(), Duration::from_secs(1));
        assert_eq!(travessa.build_search_url("Clean Code"), SEARCH_URL);
    }

    #[test]
    fn capitalizes_title_and_reads_price() {
        let travessa = adapter(FakeTransport::new(), Duration::from_secs(1));
        let doc = Html::parse_document(
            r#"<span id="lblNomArtigo">CÓDIGO LIMPO</span><span id="litPreco">R$ 1.089,90</span>"#,
        );
        let details = travessa.extract_details(&doc);
        assert_eq!(details.title.as_deref(), Some("Código limpo"));
        assert_eq!(details.price.unwrap().parse(travessa.price_locale()), Ok(1089.90));
    }

    #[tokio::test]
    async fn product_page_timeout_is_network_failure() {
        let travessa = adapter(
            FakeTransport::new()
                .route(
                    SEARCH_URL,
                    FakeRoute::page(
                        r#"<h4 class="search-result-item-heading"><a href="https://www.travessa.com.br/codigo-limpo/artigo/1">CÓDIGO LIMPO</a></h4>"#,
                    ),
                )
                .route("https://www.travessa.com.br/codigo-limpo/artigo/1", FakeRoute::Hang),
            Duration::from_millis(50),
        );

        let result = travessa.scrape("Clean Code").await;
        assert_eq!(result.status(), &ScrapeStatus::NetworkFailure(NetworkCause::Timeout));
        assert_eq!(result.link(), Some("https://www.travessa.com.br/codigo-limpo/artigo/1"));
    }
}
