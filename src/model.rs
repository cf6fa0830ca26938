// Core types: SiteId, ScrapeResult, ScrapeBatch and the failure taxonomy
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Retailers with a registered adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteId {
    Amazon,
    MercadoLivre,
    EstanteVirtual,
    Americanas,
    Travessa,
}

impl SiteId {
    pub const ALL: [SiteId; 5] = [
        SiteId::Amazon,
        SiteId::MercadoLivre,
        SiteId::EstanteVirtual,
        SiteId::Americanas,
        SiteId::Travessa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SiteId::Amazon => "amazon",
            SiteId::MercadoLivre => "mercado_livre",
            SiteId::EstanteVirtual => "estante_virtual",
            SiteId::Americanas => "americanas",
            SiteId::Travessa => "travessa",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SiteId::Amazon => "Amazon Brazil",
            SiteId::MercadoLivre => "Mercado Livre",
            SiteId::EstanteVirtual => "Estante Virtual",
            SiteId::Americanas => "Americanas",
            SiteId::Travessa => "Travessa",
        }
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SiteId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        SiteId::ALL
            .into_iter()
            .find(|site| site.as_str() == wanted)
            .ok_or_else(|| ModelError::UnknownSite(s.to_string()))
    }
}

/// Non-empty search text supplied by the caller. Only ever URL-encoded, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn new(text: impl AsRef<str>) -> Result<Self, ModelError> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyTerm);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an adapter could not find when it reports `NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    ProductLink,
    Title,
    Price,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum NetworkCause {
    #[error("timed out")]
    Timeout,
    #[error("{0}")]
    Transport(String),
}

/// Outcome of one adapter run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ScrapeStatus {
    Ok,
    NotFound(MissingField),
    /// HTTP 200 page recognized as a captcha, login wall or bot check.
    Blocked,
    NetworkFailure(NetworkCause),
    HttpFailure(u16),
    /// Price text was present but not numerically interpretable.
    ParseFailure(String),
    /// No adapter is registered for the requested site.
    Unavailable,
}

impl ScrapeStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ScrapeStatus::Ok)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScrapeStatus::Ok => "ok",
            ScrapeStatus::NotFound(_) => "not_found",
            ScrapeStatus::Blocked => "blocked",
            ScrapeStatus::NetworkFailure(_) => "network_failure",
            ScrapeStatus::HttpFailure(_) => "http_failure",
            ScrapeStatus::ParseFailure(_) => "parse_failure",
            ScrapeStatus::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for ScrapeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeStatus::Ok => write!(f, "ok"),
            ScrapeStatus::NotFound(MissingField::ProductLink) => write!(f, "no product found"),
            ScrapeStatus::NotFound(MissingField::Title) => write!(f, "title not found"),
            ScrapeStatus::NotFound(MissingField::Price) => write!(f, "price not found"),
            ScrapeStatus::Blocked => write!(f, "blocked by bot protection"),
            ScrapeStatus::NetworkFailure(cause) => write!(f, "network failure: {}", cause),
            ScrapeStatus::HttpFailure(code) => write!(f, "HTTP error {}", code),
            ScrapeStatus::ParseFailure(raw) => write!(f, "unreadable price {:?}", raw),
            ScrapeStatus::Unavailable => write!(f, "no adapter registered"),
        }
    }
}

impl From<FetchError> for ScrapeStatus {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Network(cause) => ScrapeStatus::NetworkFailure(cause),
            FetchError::Http(code) => ScrapeStatus::HttpFailure(code),
        }
    }
}

/// One row per requested site. Title and price are present exactly when the status is `Ok`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapeResult {
    site: SiteId,
    link: Option<String>,
    title: Option<String>,
    price: Option<f64>,
    status: ScrapeStatus,
}

impl ScrapeResult {
    pub fn ok(site: SiteId, link: String, title: String, price: f64) -> Self {
        Self {
            site,
            link: Some(link),
            title: Some(title),
            price: Some(price),
            status: ScrapeStatus::Ok,
        }
    }

    /// A failed run. `status` must not be `Ok`. Release builds downgrade a stray `Ok` to a
    /// missing-title result so title and price stay absent.
    pub fn failed(site: SiteId, link: Option<String>, status: ScrapeStatus) -> Self {
        debug_assert!(!status.is_ok(), "ScrapeResult::failed called with Ok status for {site}");
        let status = match status {
            ScrapeStatus::Ok => ScrapeStatus::NotFound(MissingField::Title),
            other => other,
        };
        Self {
            site,
            link,
            title: None,
            price: None,
            status,
        }
    }

    pub fn site(&self) -> SiteId {
        self.site
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn status(&self) -> &ScrapeStatus {
        &self.status
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }
}

/// Row handed to the persistence layer, which requires title and price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreRecord {
    pub store: SiteId,
    pub link: String,
    pub title: String,
    pub price: f64,
}

/// Results of one search invocation, one per requested site, in request order.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeBatch {
    term: SearchTerm,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    results: Vec<ScrapeResult>,
}

impl ScrapeBatch {
    pub(crate) fn new(
        term: SearchTerm,
        started_at: DateTime<Utc>,
        results: Vec<ScrapeResult>,
    ) -> Self {
        Self {
            term,
            started_at,
            finished_at: Utc::now(),
            results,
        }
    }

    pub fn term(&self) -> &SearchTerm {
        &self.term
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    pub fn results(&self) -> &[ScrapeResult] {
        &self.results
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScrapeResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, site: SiteId) -> Option<&ScrapeResult> {
        self.results.iter().find(|r| r.site == site)
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &ScrapeResult> {
        self.results.iter().filter(|r| r.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ScrapeResult> {
        self.results.iter().filter(|r| !r.is_ok())
    }

    /// Rows for the persistence layer. Failed sites are left out.
    pub fn store_records(&self) -> Vec<StoreRecord> {
        self.results
            .iter()
            .filter_map(|r| match (&r.status, &r.link, &r.title, r.price) {
                (ScrapeStatus::Ok, Some(link), Some(title), Some(price)) => Some(StoreRecord {
                    store: r.site,
                    link: link.clone(),
                    title: title.clone(),
                    price,
                }),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network failure: {0}")]
    Network(NetworkCause),
    #[error("unexpected HTTP status {0}")]
    Http(u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceParseError {
    #[error("empty price text")]
    Empty,
    #[error("price text is not numeric: {0:?}")]
    NotNumeric(String),
    #[error("ambiguous price format: {0:?}")]
    Ambiguous(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("search term must not be empty")]
    EmptyTerm,
    #[error("unknown site: {0}")]
    UnknownSite(String),
}
