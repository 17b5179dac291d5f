//! Selector strategies for Fiverr search-result markup.
//!
//! Each field has an ordered chain: the first entry matches the markup
//! shape currently served, later entries cover older layouts and A/B
//! variants. Markup drift is handled by editing these tables, not the
//! extraction code. Order is significant.

/// One way to locate a field inside a listing fragment: a CSS selector
/// plus where the value lives (element text, or a named attribute).
#[derive(Debug, Clone, Copy)]
pub struct FieldStrategy {
    pub selector: &'static str,
    pub attr: Option<&'static str>,
}

const fn text(selector: &'static str) -> FieldStrategy {
    FieldStrategy { selector, attr: None }
}

const fn attr(selector: &'static str, attr: &'static str) -> FieldStrategy {
    FieldStrategy { selector, attr: Some(attr) }
}

/// Gig card containers, tried in order until one selector yields cards.
pub const GIG_CARD: &[&str] = &[
    r#"div[data-testid="gig-card-layout"]"#,
    "div.gig-card",
    "article.gig-card",
];

pub const TITLE: &[FieldStrategy] = &[
    text(r#"a[data-testid="gig-title"]"#),
    text("a.gig-title-link"),
    text("h3 a"),
    text(r#"a[href*="/gigs/"]"#),
];

/// Same elements as TITLE, but reading the link target.
pub const GIG_LINK: &[FieldStrategy] = &[
    attr(r#"a[data-testid="gig-title"]"#, "href"),
    attr("a.gig-title-link", "href"),
    attr("h3 a", "href"),
    attr(r#"a[href*="/gigs/"]"#, "href"),
];

pub const SELLER_NAME: &[FieldStrategy] = &[
    text(r#"a[data-testid="seller-name"]"#),
    text(r#"a[href*="/users/"]"#),
    text("p.seller-name"),
];

pub const SELLER_LEVEL: &[FieldStrategy] = &[
    text(r#"span[data-testid="seller-level"]"#),
    text("span.seller-level"),
];

pub const PRICE: &[FieldStrategy] = &[
    text(r#"span[data-testid="price"]"#),
    text("p.price"),
    text(r#"span[class*="price"]"#),
];

/// Container holding both the star score and the review count.
pub const RATING_AREA: &[&str] = &[
    r#"div[data-testid="gig-rating"]"#,
    r#"span[class*="rating"]"#,
    r#"div[class*="rating"]"#,
];

/// Score lookup inside a rating area.
pub const RATING_SCORE: &[FieldStrategy] = &[
    text(r#"span[data-testid="star-rating-score"]"#),
    text("span.rating-score"),
    text("b"),
];

/// Score lookup across the whole card, used when no rating area exists.
pub const RATING_SCORE_CARD: &[FieldStrategy] = &[
    text(r#"span[data-testid="star-rating-score"]"#),
    text("span.rating-score"),
    text(r#"b[class*="rating"]"#),
];

pub const REVIEW_COUNT: &[FieldStrategy] = &[
    text(r#"span[data-testid="review-count"]"#),
    text("span.rating-count"),
    text(r#"span[class*="reviews"]"#),
];
