// Ordered selector fallbacks: each field is a list of lookups tried in priority order
use crate::normalizer::clean_text;
use crate::parser::price::PriceText;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// One lookup strategy for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Cleaned text of the first matching element with non-empty text.
    Text(&'static str),
    /// Attribute value of the first matching element that carries it.
    Attr { css: &'static str, attr: &'static str },
    /// Price rendered as separate whole and fraction elements. The fraction is optional.
    SplitPrice { whole: &'static str, fraction: &'static str },
    /// Whole and fraction read from inside the same container element, so fragments of
    /// two different prices on the page are never joined.
    SplitPriceIn {
        container: &'static str,
        whole: &'static str,
        fraction: &'static str,
    },
}

/// Value produced by a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Text(String),
    Split { whole: String, fraction: Option<String> },
}

impl Extracted {
    pub fn into_text(self) -> String {
        match self {
            Extracted::Text(text) => text,
            Extracted::Split { whole, fraction: Some(fraction) } => format!("{whole} {fraction}"),
            Extracted::Split { whole, fraction: None } => whole,
        }
    }

    pub fn into_price(self) -> PriceText {
        match self {
            Extracted::Text(text) => PriceText::Full(text),
            Extracted::Split { whole, fraction } => PriceText::Split { whole, fraction },
        }
    }
}

impl Lookup {
    /// Every CSS selector this lookup uses.
    pub fn selectors(&self) -> Vec<&'static str> {
        match *self {
            Lookup::Text(css) | Lookup::Attr { css, .. } => vec![css],
            Lookup::SplitPrice { whole, fraction } => vec![whole, fraction],
            Lookup::SplitPriceIn { container, whole, fraction } => vec![container, whole, fraction],
        }
    }

    pub fn find(&self, doc: &Html) -> Option<Extracted> {
        match *self {
            Lookup::Text(css) => first_text(doc, css).map(Extracted::Text),
            Lookup::Attr { css, attr } => {
                let selector = parse_selector(css)?;
                doc.select(&selector)
                    .filter_map(|el| el.value().attr(attr))
                    .map(str::trim)
                    .find(|value| !value.is_empty())
                    .map(|value| Extracted::Text(value.to_string()))
            }
            Lookup::SplitPrice { whole, fraction } => {
                let whole = first_text(doc, whole)?;
                Some(Extracted::Split {
                    whole,
                    fraction: first_text(doc, fraction),
                })
            }
            Lookup::SplitPriceIn { container, whole, fraction } => {
                let container = parse_selector(container)?;
                let whole = parse_selector(whole)?;
                let fraction = parse_selector(fraction)?;
                doc.select(&container).find_map(|el| {
                    let whole = first_text_in(&el, &whole)?;
                    Some(Extracted::Split {
                        whole,
                        fraction: first_text_in(&el, &fraction),
                    })
                })
            }
        }
    }
}

/// Tries every lookup in order and returns the first non-empty match.
pub fn first_match(doc: &Html, chain: &[Lookup]) -> Option<Extracted> {
    chain.iter().find_map(|lookup| lookup.find(doc))
}

/// Parses a CSS selector, logging and discarding invalid ones.
pub fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!("Invalid selector {:?}: {}", css, e);
            None
        }
    }
}

pub fn element_text(el: &ElementRef<'_>) -> String {
    clean_text(&el.text().collect::<String>())
}

fn first_text_in(scope: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .map(|el| element_text(&el))
        .find(|text| !text.is_empty())
}

fn first_text(doc: &Html, css: &str) -> Option<String> {
    let selector = parse_selector(css)?;
    doc.select(&selector)
        .map(|el| element_text(&el))
        .find(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRICE: &[Lookup] = &[
        Lookup::Text("span.sale-price"),
        Lookup::Text("span.list-price"),
    ];

    #[test]
    fn falls_back_to_second_selector() {
        let doc = Html::parse_document(r#"<span class="list-price">R$ 59,90</span>"#);
        assert_eq!(
            first_match(&doc, PRICE),
            Some(Extracted::Text("R$ 59,90".into()))
        );
    }

    #[test]
    fn first_selector_wins_when_both_match() {
        let doc = Html::parse_document(
            r#"<span class="list-price">R$ 59,90</span><span class="sale-price">R$ 49,90</span>"#,
        );
        assert_eq!(
            first_match(&doc, PRICE),
            Some(Extracted::Text("R$ 49,90".into()))
        );
    }

    #[test]
    fn empty_elements_do_not_count_as_matches() {
        let doc = Html::parse_document(
            r#"<span class="sale-price">  </span><span class="list-price">R$ 10,00</span>"#,
        );
        assert_eq!(first_match(&doc, PRICE).map(Extracted::into_text), Some("R$ 10,00".into()));
    }

    #[test]
    fn attr_lookup_skips_elements_without_attribute() {
        let doc = Html::parse_document(r#"<a class="item">x</a><a class="item" href="/p/1">y</a>"#);
        let chain = [Lookup::Attr { css: "a.item", attr: "href" }];
        assert_eq!(first_match(&doc, &chain), Some(Extracted::Text("/p/1".into())));
    }

    #[test]
    fn split_price_collects_both_fragments() {
        let doc = Html::parse_document(
            r#"<span class="whole">49<span class="dec">,</span></span><span class="frac">90</span>"#,
        );
        let chain = [Lookup::SplitPrice { whole: ".whole", fraction: ".frac" }];
        assert_eq!(
            first_match(&doc, &chain).map(Extracted::into_price),
            Some(PriceText::Split { whole: "49,".into(), fraction: Some("90".into()) })
        );
    }

    #[test]
    fn scoped_split_price_keeps_fragments_together() {
        let doc = Html::parse_document(
            r#"<div class="money old"><span class="whole">120</span></div>
               <div class="money"><span class="whole">89</span><span class="frac">90</span></div>"#,
        );
        let chain = [Lookup::SplitPriceIn {
            container: ".money:not(.old)",
            whole: ".whole",
            fraction: ".frac",
        }];
        assert_eq!(
            first_match(&doc, &chain).map(Extracted::into_price),
            Some(PriceText::Split { whole: "89".into(), fraction: Some("90".into()) })
        );
    }

    #[test]
    fn scoped_split_price_without_fraction_in_container() {
        let doc = Html::parse_document(
            r#"<div class="money"><span class="whole">120</span></div><span class="frac">90</span>"#,
        );
        let chain = [Lookup::SplitPriceIn { container: ".money", whole: ".whole", fraction: ".frac" }];
        assert_eq!(
            first_match(&doc, &chain).map(Extracted::into_price),
            Some(PriceText::Split { whole: "120".into(), fraction: None })
        );
    }

    #[test]
    fn invalid_selector_is_no_match() {
        let doc = Html::parse_document("<p>hi</p>");
        assert_eq!(first_match(&doc, &[Lookup::Text("p[")]), None);
    }
}
