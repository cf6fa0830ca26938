use crate::model::SiteId;
use crate::parser::selectors::{first_match, Extracted, Lookup};
use crate::scraper::fetcher::PageFetcher;
use crate::scraper::traits::{ProductDetails, SiteAdapter};
use crate::utils::{absolute_url, encode_query};

use async_trait::async_trait;
use scraper::Html;

pub const BASE_URL: &str = "https://www.americanas.com.br";

pub(crate) const RESULT_LINK: &[Lookup] = &[
    Lookup::Attr { css: "a.product-link", attr: "href" },
    Lookup::Attr { css: r#"a[href*="/produto/"]"#, attr: "href" },
];

pub(crate) const TITLE: &[Lookup] = &[
    Lookup::Text("h1.product-title__title"),
    Lookup::Text(r#"h1[data-testid="product-title"]"#),
    Lookup::Text("h1"),
];

pub(crate) const PRICE: &[Lookup] = &[
    Lookup::Text("span.price__SalesPrice"),
    Lookup::Text("span.price-sales"),
    Lookup::Text(r#"[data-testid="price-value"]"#),
];

pub struct AmericanasAdapter {
    fetcher: PageFetcher,
}

impl AmericanasAdapter {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl SiteAdapter for AmericanasAdapter {
    fn site(&self) -> SiteId {
        SiteId::Americanas
    }

    fn fetcher(&self) -> &PageFetcher {
        &self.fetcher
    }

    fn build_search_url(&self, term: &str) -> String {
        format!("{}/s?q={}", BASE_URL, encode_query(term))
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
