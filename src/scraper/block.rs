// Detection of HTTP 200 pages that are captchas, login walls or bot checks
use crate::model::SiteId;
use crate::parser::selectors::{element_text, parse_selector};

use scraper::Html;

#[derive(Debug, Clone, Copy)]
pub enum BlockMarker {
    /// A `<form>` whose action contains the given path.
    FormAction(&'static str),
    /// Any element matching the selector.
    Element(&'static str),
    /// An element matching the selector whose text contains the given phrase.
    ElementText { css: &'static str, text: &'static str },
    /// The page `<title>` contains the phrase (case-insensitive).
    TitleContains(&'static str),
    /// Every inner marker must match.
    All(&'static [BlockMarker]),
}

impl BlockMarker {
    pub fn matches(&self, doc: &Html) -> bool {
        match *self {
            BlockMarker::FormAction(path) => has_element(doc, "form[action]", |el| {
                el.value().attr("action").is_some_and(|action| action.contains(path))
            }),
            BlockMarker::Element(css) => has_element(doc, css, |_| true),
            BlockMarker::ElementText { css, text } => {
                let wanted = text.to_lowercase();
                has_element(doc, css, |el| element_text(el).to_lowercase().contains(&wanted))
            }
            BlockMarker::TitleContains(phrase) => {
                let wanted = phrase.to_lowercase();
                has_element(doc, "title", |el| element_text(el).to_lowercase().contains(&wanted))
            }
            BlockMarker::All(markers) => markers.iter().all(|marker| marker.matches(doc)),
        }
    }
}

/// Bot walls served in front of any of the retailers.
const GENERIC_MARKERS: &[BlockMarker] = &[
    BlockMarker::Element("#challenge-form"),
    BlockMarker::Element("#cf-challenge-running"),
    BlockMarker::TitleContains("Just a moment..."),
    BlockMarker::Element("#px-captcha"),
    BlockMarker::TitleContains("Access Denied"),
    BlockMarker::TitleContains("Acesso negado"),
];

const AMAZON_MARKERS: &[BlockMarker] = &[
    BlockMarker::FormAction("/errors/validateCaptcha"),
    BlockMarker::Element("input#captchacharacters"),
    BlockMarker::TitleContains("Robot Check"),
    BlockMarker::ElementText { css: "h4", text: "Digite os caracteres" },
];

const MERCADO_LIVRE_MARKERS: &[BlockMarker] = &[
    BlockMarker::All(&[
        BlockMarker::TitleContains("Mercado Livre"),
        BlockMarker::ElementText { css: "a", text: "Já tenho conta" },
    ]),
    BlockMarker::FormAction("/gz/account-verification"),
];

const AMERICANAS_MARKERS: &[BlockMarker] = &[
    BlockMarker::ElementText { css: "h1", text: "Verificação de segurança" },
];

const ESTANTE_VIRTUAL_MARKERS: &[BlockMarker] = &[];

const TRAVESSA_MARKERS: &[BlockMarker] = &[
    BlockMarker::FormAction("captcha"),
];

pub struct BlockDetector;

impl BlockDetector {
    pub fn markers(site: SiteId) -> &'static [BlockMarker] {
        match site {
            SiteId::Amazon => AMAZON_MARKERS,
            SiteId::MercadoLivre => MERCADO_LIVRE_MARKERS,
            SiteId::EstanteVirtual => ESTANTE_VIRTUAL_MARKERS,
            SiteId::Americanas => AMERICANAS_MARKERS,
            SiteId::Travessa => TRAVESSA_MARKERS,
        }
    }

    /// Whether a successfully fetched page is a block page for `site`.
    pub fn is_blocked(doc: &Html, site: SiteId) -> bool {
        Self::markers(site)
            .iter()
            .chain(GENERIC_MARKERS)
            .any(|marker| marker.matches(doc))
    }
}

fn has_element(doc: &Html, css: &str, pred: impl Fn(&scraper::ElementRef<'_>) -> bool) -> bool {
    match parse_selector(css) {
        Some(selector) => doc.select(&selector).any(|el| pred(&el)),
        None => false,
    }
}
