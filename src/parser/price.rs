// Locale-aware price parsing
use crate::model::PriceParseError;

/// Currency markers stripped before parsing. Longest first so "R$" wins over "$".
const CURRENCY_MARKERS: &[&str] = &["US$", "R$", "BRL", "USD", "$", "€"];

/// Separator convention of the price text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceLocale {
    /// `1.234,56`
    #[default]
    PtBr,
    /// `1,234.56`
    EnUs,
}

impl PriceLocale {
    fn thousands_separator(self) -> char {
        match self {
            PriceLocale::PtBr => '.',
            PriceLocale::EnUs => ',',
        }
    }

    fn decimal_separator(self) -> char {
        match self {
            PriceLocale::PtBr => ',',
            PriceLocale::EnUs => '.',
        }
    }
}

/// Raw price as found on a page: either one text or whole and fraction fragments
/// rendered in separate elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceText {
    Full(String),
    Split { whole: String, fraction: Option<String> },
}

impl PriceText {
    pub fn parse(&self, locale: PriceLocale) -> Result<f64, PriceParseError> {
        match self {
            PriceText::Full(raw) => parse_price(raw, locale),
            PriceText::Split { whole, fraction: Some(fraction) } => {
                parse_price_parts(whole, fraction, locale)
            }
            PriceText::Split { whole, fraction: None } => parse_price(whole, locale),
        }
    }

    /// Text as it would be shown, used when reporting a parse failure.
    pub fn raw(&self) -> String {
        match self {
            PriceText::Full(raw) => raw.clone(),
            PriceText::Split { whole, fraction: Some(fraction) } => format!("{whole}|{fraction}"),
            PriceText::Split { whole, fraction: None } => whole.clone(),
        }
    }
}

/// Parses a locale-formatted price such as `R$ 1.234,56`.
///
/// Thousands separators are removed before the decimal separator is normalized, so
/// `1.234,56` reads as 1234.56. Anything that is empty, contains stray characters, or
/// has misplaced separators is rejected; the parser never falls back to zero.
pub fn parse_price(raw: &str, locale: PriceLocale) -> Result<f64, PriceParseError> {
    let stripped = strip_decoration(raw);
    if stripped.is_empty() {
        return Err(PriceParseError::Empty);
    }

    let thousands = locale.thousands_separator();
    let decimal = locale.decimal_separator();

    if !stripped
        .chars()
        .all(|c| c.is_ascii_digit() || c == thousands || c == decimal)
    {
        return Err(PriceParseError::NotNumeric(raw.trim().to_string()));
    }

    let (integer, fraction) = match stripped.split_once(decimal) {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (stripped.as_str(), None),
    };

    if let Some(fraction) = fraction {
        if fraction.is_empty()
            || fraction.len() > 2
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(PriceParseError::Ambiguous(raw.trim().to_string()));
        }
    }

    let digits = integer_digits(integer, thousands)
        .ok_or_else(|| PriceParseError::Ambiguous(raw.trim().to_string()))?;

    let normalized = match fraction {
        Some(fraction) => format!("{digits}.{fraction}"),
        None => digits,
    };

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(PriceParseError::NotNumeric(raw.trim().to_string())),
    }
}

/// Parses a price rendered as two fragments, e.g. `49` and `90`.
///
/// The fragments are joined with the locale's decimal separator. A separator already
/// trailing the whole part (Amazon renders `49,` + `90`) is dropped first.
pub fn parse_price_parts(
    whole: &str,
    fraction: &str,
    locale: PriceLocale,
) -> Result<f64, PriceParseError> {
    let decimal = locale.decimal_separator();
    let whole = strip_decoration(whole);
    let whole = whole.trim_end_matches(decimal);
    let fraction = strip_decoration(fraction);
    let fraction = fraction.trim_start_matches(decimal);

    if whole.is_empty() {
        return Err(PriceParseError::Empty);
    }
    if fraction.is_empty() {
        return parse_price(whole, locale);
    }

    parse_price(&format!("{whole}{decimal}{fraction}"), locale)
}

fn strip_decoration(raw: &str) -> String {
    let mut text: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();
    for marker in CURRENCY_MARKERS {
        text = text.replace(marker, "");
    }
    text
}

/// Digits of the integer part with thousands separators removed. Separators are only
/// accepted between groups of exactly three digits.
fn integer_digits(integer: &str, thousands: char) -> Option<String> {
    if integer.is_empty() {
        return None;
    }
    let groups: Vec<&str> = integer.split(thousands).collect();
    let (first, rest) = groups.split_first()?;
    if first.is_empty() || (first.len() > 3 && !rest.is_empty()) {
        return None;
    }
    if rest.iter().any(|group| group.len() != 3) {
        return None;
    }
    Some(groups.concat())
}
