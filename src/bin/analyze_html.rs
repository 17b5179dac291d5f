use anyhow::Result;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use scraper::{Html, Selector};
use std::fs;

#[tokio::main]
async fn main() -> Result<()> {
    let keyword = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "logo design".to_string());

    let client = Client::builder()
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36")
        .build()?;

    let encoded = utf8_percent_encode(&keyword, NON_ALPHANUMERIC).to_string();
    let url = format!("https://www.fiverr.com/search/gigs?query={}", encoded);
    println!("Fetching {}...", url);
    let response = client.get(&url).send().await?;
    let html = response.text().await?;
    fs::write("fiverr_sample.html", &html)?;
    println!("Saved {} bytes to fiverr_sample.html", html.len());

    if html.contains("Hmm, something seems to have gone wrong") {
        println!("NOTE: response looks like the bot wall, counts below are meaningless");
    }

    let document = Html::parse_document(&html);

    // Look for gig cards
    let card_selector =
        Selector::parse(r#"div[data-testid="gig-card-layout"], div.gig-card, article.gig-card"#)
            .unwrap();
    let cards = document.select(&card_selector);
    println!("Found {} potential gig card elements", cards.count());

    // Try field selectors
    let selectors = vec![
        r#"a[data-testid="gig-title"]"#,
        "a.gig-title-link",
        r#"a[data-testid="seller-name"]"#,
        r#"span[data-testid="seller-level"]"#,
        r#"span[data-testid="price"]"#,
        r#"span[class*="price"]"#,
        r#"div[data-testid="gig-rating"]"#,
        r#"span[data-testid="star-rating-score"]"#,
        r#"span[data-testid="review-count"]"#,
    ];

    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            let count = document.select(&selector).count();
            if count > 0 {
                println!("Selector '{}' matched {} elements", selector_str, count);
            }
        }
    }

    Ok(())
}
