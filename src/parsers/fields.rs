use once_cell::sync::Lazy;
use regex::Regex;

static RATING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\d.]+").expect("Invalid rating regex")
});

static REVIEWS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([\d.]+)(k?)").expect("Invalid reviews regex")
});

/// Parse a star rating ("4.9", "4.9 stars") into its numeric value.
/// Values outside the 0.0 to 5.0 scale are rejected as noise.
pub fn parse_rating(rating_text: &str) -> Option<f64> {
    let raw = RATING_REGEX.find(rating_text)?.as_str();
    let value = raw.parse::<f64>().ok()?;
    if (0.0..=5.0).contains(&value) {
        Some(value)
    } else {
        None
    }
}

/// Parse a review count ("(1.2k)", "1,234", "856") into a literal count.
/// A `k` suffix multiplies by 1000. Unparsable input yields None; an
/// observed zero stays zero.
pub fn parse_review_count(reviews_text: &str) -> Option<u32> {
    let cleaned = reviews_text.to_lowercase().replace(['(', ')', ','], "");
    let caps = REVIEWS_REGEX.captures(&cleaned)?;
    let number = caps[1].parse::<f64>().ok()?;
    let count = if &caps[2] == "k" { number * 1000.0 } else { number };
    Some(count as u32)
}
