use once_cell::sync::Lazy;
use regex::Regex;

static PRICE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\d.,]+").expect("Invalid price regex")
});

/// Parse a displayed price ("From $1,200", "€25.50") into a numeric value.
/// Takes the first numeric run, drops thousands separators. Unparsable
/// input yields None, never an error.
pub fn parse_price(price_text: &str) -> Option<f64> {
    let raw = PRICE_REGEX.find(price_text)?.as_str();
    let cleaned = raw.replace(',', "");
    cleaned.parse::<f64>().ok()
}
