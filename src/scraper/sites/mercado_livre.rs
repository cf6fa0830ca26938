use crate::model::SiteId;
use crate::parser::selectors::{first_match, Extracted, Lookup};
use crate::scraper::fetcher::PageFetcher;
use crate::scraper::traits::{ProductDetails, SiteAdapter};
use crate::utils::{absolute_url, encode_query};

use async_trait::async_trait;
use scraper::Html;

pub const BASE_URL: &str = "https://lista.mercadolivre.com.br";

// Result links are already absolute (produto.mercadolivre.com.br).
pub(crate) const RESULT_LINK: &[Lookup] = &[
    Lookup::Attr { css: "a.poly-component__title", attr: "href" },
    Lookup::Attr { css: "a.ui-search-item__group__element", attr: "href" },
    Lookup::Attr { css: "a.ui-search-link", attr: "href" },
];

pub(crate) const TITLE: &[Lookup] = &[
    Lookup::Text("h1.ui-pdp-title"),
    Lookup::Text("h1"),
];

// Whole and cents are read from the same money element; crossed-out list prices
// carry `--previous` and are skipped.
pub(crate) const PRICE: &[Lookup] = &[
    Lookup::SplitPriceIn {
        container: ".ui-pdp-price__second-line .andes-money-amount",
        whole: "span.andes-money-amount__fraction",
        fraction: "span.andes-money-amount__cents",
    },
    Lookup::SplitPriceIn {
        container: ".andes-money-amount:not(.andes-money-amount--previous)",
        whole: "span.andes-money-amount__fraction",
        fraction: "span.andes-money-amount__cents",
    },
    Lookup::Text("span.andes-money-amount__fraction"),
];

pub struct MercadoLivreAdapter {
    fetcher: PageFetcher,
}

impl MercadoLivreAdapter {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl SiteAdapter for MercadoLivreAdapter {
    fn site(&self) -> SiteId {
        SiteId::MercadoLivre
    }

    fn fetcher(&self) -> &PageFetcher {
        &self.fetcher
    }

    fn build_search_url(&self, term: &str) -> String {
        format!("{}/{}", BASE_URL, encode_query(term))
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
