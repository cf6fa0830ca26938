use crate::model::SiteId;
use crate::parser::selectors::{first_match, Extracted, Lookup};
use crate::scraper::fetcher::PageFetcher;
use crate::scraper::traits::{ProductDetails, SiteAdapter};
use crate::utils::{absolute_url, encode_query};

use async_trait::async_trait;
use scraper::Html;

pub const BASE_URL: &str = "https://www.amazon.com.br";

pub(crate) const RESULT_LINK: &[Lookup] = &[
    Lookup::Attr { css: r#"div[data-component-type="s-search-result"] h2 a"#, attr: "href" },
    Lookup::Attr { css: r#"div[data-component-type="s-search-result"] a.a-link-normal"#, attr: "href" },
    Lookup::Attr { css: r#"div[data-component-type="s-search-result"] a.a-text-normal"#, attr: "href" },
];

pub(crate) const TITLE: &[Lookup] = &[
    Lookup::Text("#productTitle"),
    Lookup::Text("#ebooksProductTitle"),
    Lookup::Text("h1#title"),
];

// Whole/fraction pair first, then the screen-reader copy of the buy-box price.
pub(crate) const PRICE: &[Lookup] = &[
    Lookup::SplitPrice { whole: ".a-price-whole", fraction: ".a-price-fraction" },
    Lookup::Text("#corePrice_feature_div .a-offscreen"),
    Lookup::Text("span#price"),
    Lookup::Text(".a-price .a-offscreen"),
];

pub struct AmazonAdapter {
    fetcher: PageFetcher,
}

impl AmazonAdapter {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl SiteAdapter for AmazonAdapter {
    fn site(&self) -> SiteId {
        SiteId::Amazon
    }

    fn fetcher(&self) -> &PageFetcher {
        &self.fetcher
    }

    fn build_search_url(&self, term: &str) -> String {
        format!("{}/s?k={}&i=stripbooks", BASE_URL, encode_query(term))
    }

    fn locate_first_result_link(&self, search_page: &Html) -> Option<String> {
        let href = first_match(search_page, RESULT_LINK)?.into_text();
        absolute_url(BASE_URL, &href)
    }

    fn extract_details(&self, product_page: &Html) -> ProductDetails {
        ProductDetails {
            title: first_match(product_page, TITLE).map(Extracted::into_text),
            price: first_match(product_page, PRICE).map(Extracted::into_price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScrapeStatus;
    use crate::scraper::fetcher::PolitenessDelay;
    use crate::scraper::testing::{FakeRoute, FakeTransport};
    use std::sync::Arc;
    use std::time::Duration;

    fn adapter(transport: FakeTransport) -> AmazonAdapter {
        AmazonAdapter::new(PageFetcher::new(
            Arc::new(transport),
            "TestAgent/1.0",
            Duration::from_secs(1),
            PolitenessDelay::none(),
        ))
    }

    const SEARCH_PAGE: &str = r#"
        <div data-component-type="s-search-result">
          <h2><a class="a-link-normal" href="/Clean-Code-Robert-Martin/dp/8576082675">Código Limpo</a></h2>
        </div>"#;

    #[test]
    fn search_url_targets_book_department() {
        let amazon = adapter(FakeTransport::new());
        assert_eq!(
            amazon.build_search_url("Clean Code"),
            "https://www.amazon.com.br/s?k=Clean+Code&i=stripbooks"
        );
    }

    #[test]
    fn resolves_relative_result_link() {
        let amazon = adapter(FakeTransport::new());
        let doc = Html::parse_document(SEARCH_PAGE);
        assert_eq!(
            amazon.locate_first_result_link(&doc).as_deref(),
            Some("https://www.amazon.com.br/Clean-Code-Robert-Martin/dp/8576082675")
        );
    }

    #[test]
    fn joins_whole_and_fraction_price() {
        let amazon = adapter(FakeTransport::new());
        let doc = Html::parse_document(
            r#"<span id="productTitle"> Código Limpo </span>
               <span class="a-price"><span class="a-price-whole">1.049<span class="a-price-decimal">,</span></span><span class="a-price-fraction">90</span></span>"#,
        );
        let details = amazon.extract_details(&doc);
        assert_eq!(details.title.as_deref(), Some("Código Limpo"));
        assert_eq!(details.price.unwrap().parse(amazon.price_locale()), Ok(1049.90));
    }

    #[tokio::test]
    async fn captcha_search_page_is_blocked() {
        let term = "Clean Code";
        let url = "https://www.amazon.com.br/s?k=Clean+Code&i=stripbooks";
        let amazon = adapter(FakeTransport::new().route(
            url,
            FakeRoute::page(r#"<form action="/errors/validateCaptcha"><input id="captchacharacters"></form>"#),
        ));

        let result = amazon.scrape(term).await;
        assert_eq!(result.status(), &ScrapeStatus::Blocked);
        assert!(result.title().is_none() && result.price().is_none());
    }

    #[tokio::test]
    async fn blocked_product_page_keeps_link() {
        let product = "https://www.amazon.com.br/Clean-Code-Robert-Martin/dp/8576082675";
        let amazon = adapter(
            FakeTransport::new()
                .route("https://www.amazon.com.br/s?k=Clean+Code&i=stripbooks", FakeRoute::page(SEARCH_PAGE))
                .route(product, FakeRoute::page(r#"<form action="/errors/validateCaptcha"></form>"#)),
        );

        let result = amazon.scrape("Clean Code").await;
        assert_eq!(result.status(), &ScrapeStatus::Blocked);
        assert_eq!(result.link(), Some(product));
        assert!(result.title().is_none());
        assert!(result.price().is_none());
    }

    #[tokio::test]
    async fn full_chain_succeeds() {
        let product = "https://www.amazon.com.br/Clean-Code-Robert-Martin/dp/8576082675";
        let amazon = adapter(
            FakeTransport::new()
                .route("https://www.amazon.com.br/s?k=Clean+Code&i=stripbooks", FakeRoute::page(SEARCH_PAGE))
                .route(
                    product,
                    FakeRoute::page(
                        r#"<span id="productTitle">Código Limpo</span>
                           <span class="a-price-whole">89,</span><span class="a-price-fraction">99</span>"#,
                    ),
                ),
        );

        let result = amazon.scrape("Clean Code").await;
        assert_eq!(result.status(), &ScrapeStatus::Ok);
        assert_eq!(result.link(), Some(product));
        assert_eq!(result.price(), Some(89.99));
    }
}
