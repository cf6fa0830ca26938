pub mod price;
pub mod selectors;

pub use price::{parse_price, parse_price_parts, PriceLocale, PriceText};
pub use selectors::{first_match, Extracted, Lookup};
