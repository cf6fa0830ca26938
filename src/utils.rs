// URL helpers shared by the site adapters
use url::Url;
use url::form_urlencoded::byte_serialize;

/// Form-encodes a search term for a query string (spaces become `+`).
pub fn encode_query(term: &str) -> String {
    byte_serialize(term.as_bytes()).collect()
}

/// Resolves `href` against `base`. Absolute links come back unchanged.
pub fn absolute_url(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let base = Url::parse(base).ok()?;
    base.join(href).ok().map(String::from)
}
