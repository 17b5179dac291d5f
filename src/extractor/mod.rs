//! Turns rendered search-result HTML into gig listings.

pub mod strategies;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use crate::models::GigListing;
use crate::parsers::{clean_text, parse_price, parse_rating, parse_review_count};
use strategies::FieldStrategy;

/// Everything extracted from one rendered page.
#[derive(Debug, Default)]
pub struct PageExtraction {
    pub listings: Vec<GigListing>,
    /// Card fragments discarded because no gig URL could be recovered.
    pub fragments_dropped: usize,
}

/// Extract every gig listing from a rendered search page, in document
/// order. Never fails: unrecognized markup yields an empty extraction,
/// fragments without a usable gig URL are dropped and counted.
pub fn extract_listings(html: &str, base_url: &str) -> PageExtraction {
    let document = Html::parse_document(html);
    let fragments = find_card_fragments(&document);
    if fragments.is_empty() {
        return PageExtraction::default();
    }
    info!("Found {} gig cards", fragments.len());

    let total = fragments.len();
    let mut extraction = PageExtraction::default();
    for fragment in fragments {
        match extract_gig(fragment, base_url) {
            Some(listing) => extraction.listings.push(listing),
            None => {
                debug!("Dropping listing fragment without a usable gig URL");
                extraction.fragments_dropped += 1;
            }
        }
    }
    if extraction.fragments_dropped > 0 {
        warn!(
            "Dropped {} of {} listing fragments",
            extraction.fragments_dropped, total
        );
    }
    extraction
}

/// Locate card containers: first selector in the chain that matches
/// anything wins. Falls back to scanning for elements whose class names
/// look card-like when no selector matches.
fn find_card_fragments<'a>(document: &'a Html) -> Vec<ElementRef<'a>> {
    for selector_str in strategies::GIG_CARD {
        if let Ok(selector) = Selector::parse(selector_str) {
            let matches: Vec<ElementRef> = document.select(&selector).collect();
            if !matches.is_empty() {
                debug!("Card selector '{}' matched {} fragments", selector_str, matches.len());
                return matches;
            }
        }
    }

    let fallback = generic_card_scan(document);
    if !fallback.is_empty() {
        warn!(
            "No card selector matched; generic scan found {} candidate fragments",
            fallback.len()
        );
    }
    fallback
}

fn generic_card_scan<'a>(document: &'a Html) -> Vec<ElementRef<'a>> {
    let mut fragments = Vec::new();
    if let Ok(selector) = Selector::parse("article, div") {
        for element in document.select(&selector) {
            if let Some(class) = element.value().attr("class") {
                let class = class.to_lowercase();
                if class.contains("gig") && class.contains("card") {
                    fragments.push(element);
                }
            }
        }
    }
    fragments
}

fn extract_gig(fragment: ElementRef, base_url: &str) -> Option<GigListing> {
    let gig_url = first_match(fragment, strategies::GIG_LINK)
        .and_then(|href| absolutize(&href, base_url))?;

    let title = first_match(fragment, strategies::TITLE);
    let seller_name = first_match(fragment, strategies::SELLER_NAME);
    let seller_level = first_match(fragment, strategies::SELLER_LEVEL);
    let price = first_match(fragment, strategies::PRICE).and_then(|text| parse_price(&text));
    let (rating, num_reviews) = extract_rating_block(fragment);

    Some(GigListing {
        title,
        seller_name,
        seller_level,
        price,
        rating,
        num_reviews,
        gig_url,
    })
}

/// Rating and review count live together in a rating area on current
/// markup. When no area is found the score is looked up card-wide; a
/// missing review count stays missing.
fn extract_rating_block(fragment: ElementRef) -> (Option<f64>, Option<u32>) {
    if let Some(area) = find_first(fragment, strategies::RATING_AREA) {
        let rating = first_match(area, strategies::RATING_SCORE).and_then(|text| parse_rating(&text));
        let reviews =
            first_match(area, strategies::REVIEW_COUNT).and_then(|text| parse_review_count(&text));
        return (rating, reviews);
    }

    let rating =
        first_match(fragment, strategies::RATING_SCORE_CARD).and_then(|text| parse_rating(&text));
    let reviews =
        first_match(fragment, strategies::REVIEW_COUNT).and_then(|text| parse_review_count(&text));
    (rating, reviews)
}

/// First strategy in the chain that yields a non-empty value wins,
/// regardless of document position.
fn first_match(fragment: ElementRef, chain: &[FieldStrategy]) -> Option<String> {
    for strategy in chain {
        if let Ok(selector) = Selector::parse(strategy.selector) {
            if let Some(element) = fragment.select(&selector).next() {
                let raw = match strategy.attr {
                    Some(name) => element.value().attr(name).map(str::to_string),
                    None => Some(element.text().collect::<String>()),
                };
                if let Some(raw) = raw {
                    let cleaned = clean_text(&raw);
                    if !cleaned.is_empty() {
                        return Some(cleaned);
                    }
                }
            }
        }
    }
    None
}

fn find_first<'a>(fragment: ElementRef<'a>, selectors: &[&str]) -> Option<ElementRef<'a>> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = fragment.select(&selector).next() {
                return Some(element);
            }
        }
    }
    None
}

/// Resolve an href against the site base and strip tracking queries.
/// Non-HTTP targets are rejected.
fn absolutize(href: &str, base_url: &str) -> Option<String> {
    let base = Url::parse(base_url).ok()?;
    let mut absolute = base.join(href).ok()?;
    if !matches!(absolute.scheme(), "http" | "https") {
        return None;
    }
    absolute.set_query(None);
    Some(absolute.to_string())
}
