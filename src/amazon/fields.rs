//! Field-scoped extraction strategies for product detail pages.
//!
//! Every field owns an ordered list of strategies, tried in order until one
//! yields a usable non-empty value. Exhausting all strategies yields `None`
//! for that field only - a miss is a normal, inspectable outcome, never an
//! error of the encompassing extraction.

use crate::amazon::selectors::product;
use regex_lite::Regex;
use scraper::Html;
use std::sync::LazyLock;
use tracing::trace;

/// One extraction attempt: pure function from page to optional value.
pub type Strategy<T> = fn(&Html) -> Option<T>;

/// Runs strategies in order, returning the first hit.
pub fn first_match<T>(doc: &Html, strategies: &[Strategy<T>]) -> Option<T> {
    strategies.iter().find_map(|s| s(doc))
}

static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([$£€¥])\s*([\d,]+\.?\d*)").unwrap());

static RATING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d.]+)\s+out of 5").unwrap());

static BSR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#([\d,]+) in ([^(\n#]+)").unwrap());

static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([\d,]+)").unwrap());

/// Parses a currency symbol and amount out of raw price text.
///
/// Handles label prefixes ("List Price: $29.99"), thousands separators, and
/// rejects non-positive amounts.
pub fn parse_price_text(text: &str) -> Option<(f64, String)> {
    let caps = PRICE_RE.captures(text)?;
    let currency = caps.get(1)?.as_str().to_string();
    let value: f64 = caps.get(2)?.as_str().replace(',', "").parse().ok()?;

    if value > 0.0 {
        Some((value, currency))
    } else {
        None
    }
}

fn select_price_text(doc: &Html, selector: &scraper::Selector) -> Option<(f64, String)> {
    doc.select(selector).find_map(|e| parse_price_text(&e.text().collect::<String>()))
}

fn price_structured(doc: &Html) -> Option<(f64, String)> {
    select_price_text(doc, &product::PRICE)
}

fn price_deal(doc: &Html) -> Option<(f64, String)> {
    select_price_text(doc, &product::PRICE_DEAL)
}

/// Last resort: free-text scan of the whole page for a currency-prefixed
/// numeral. Noisy, so it runs only after the structured strategies miss.
fn price_freetext(doc: &Html) -> Option<(f64, String)> {
    let text = doc.root_element().text().collect::<String>();
    parse_price_text(&text)
}

/// Current price with its currency symbol, via the ordered strategy chain.
pub fn extract_price(doc: &Html) -> Option<(f64, String)> {
    let result = first_match(doc, &[price_structured, price_deal, price_freetext]);
    trace!(?result, "price extraction");
    result
}

/// Pre-discount "was"/list price. Accepted only if strictly greater than the
/// current price, so a malformed page cannot produce a negative discount.
pub fn extract_list_price(doc: &Html, current_price: f64) -> Option<f64> {
    select_price_text(doc, &product::PRICE_LIST)
        .map(|(value, _)| value)
        .filter(|&value| current_price > 0.0 && value > current_price)
}

/// Star rating from "<float> out of 5 stars", clamped to [0, 5].
pub fn extract_rating(doc: &Html) -> Option<f32> {
    doc.select(&product::RATING).find_map(|e| {
        let text = e.text().collect::<String>();
        let caps = RATING_RE.captures(&text)?;
        let stars: f32 = caps.get(1)?.as_str().parse().ok()?;
        Some(stars.clamp(0.0, 5.0))
    })
}

/// Review count with thousands separators stripped.
pub fn extract_reviews_count(doc: &Html) -> Option<u32> {
    doc.select(&product::REVIEW_COUNT).find_map(|e| {
        let text = e.text().collect::<String>();
        let caps = COUNT_RE.captures(&text)?;
        caps.get(1)?.as_str().replace(',', "").parse().ok()
    })
}

/// Prime badge presence. Never unknown: absence means false.
pub fn extract_is_prime(doc: &Html) -> bool {
    doc.select(&product::PRIME).next().is_some()
}

/// First "#N in Category" string on the page; later category ranks are
/// ignored. The "(See Top 100...)" link suffix is cut by the pattern.
pub fn extract_best_sellers_rank(doc: &Html) -> Option<String> {
    let text = doc
        .select(&product::BSR_SECTION)
        .next()
        .map(|e| e.text().collect::<String>())
        .unwrap_or_else(|| doc.root_element().text().collect::<String>());

    let caps = BSR_RE.captures(&text)?;
    let number = caps.get(1)?.as_str().replace(',', "");
    let category = caps.get(2)?.as_str().trim();

    if category.is_empty() {
        return None;
    }
    Some(format!("#{} in {}", number, category))
}

/// First 5 feature bullets, trimmed. Entries under 10 characters are UI
/// chrome ("About this item" separators etc.) and dropped.
pub fn extract_bullet_points(doc: &Html) -> Vec<String> {
    doc.select(&product::FEATURE_BULLETS)
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|text| text.len() > 10)
        .take(5)
        .collect()
}

/// Main image source attribute, with the high-res fallback.
pub fn extract_main_image_url(doc: &Html) -> Option<String> {
    doc.select(&product::IMAGE).next().and_then(|e| {
        e.value().attr("src").or_else(|| e.value().attr("data-old-hires")).map(String::from)
    })
}

/// First non-empty title-region text.
pub fn extract_title(doc: &Html) -> Option<String> {
    doc.select(&product::TITLE)
        .map(|e| e.text().collect::<String>().trim().to_string())
        .find(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Html {
        Html::parse_document(html)
    }

    // parse_price_text

    #[test]
    fn test_parse_price_text() {
        assert_eq!(parse_price_text("$29.99"), Some((29.99, "$".to_string())));
        assert_eq!(parse_price_text("$1,234.56"), Some((1234.56, "$".to_string())));
        assert_eq!(parse_price_text("£10"), Some((10.0, "£".to_string())));
        assert_eq!(parse_price_text("List Price: $49.99"), Some((49.99, "$".to_string())));
    }

    #[test]
    fn test_parse_price_text_rejects_garbage() {
        assert_eq!(parse_price_text(""), None);
        assert_eq!(parse_price_text("Currently unavailable"), None);
        assert_eq!(parse_price_text("29.99"), None); // no currency symbol
        assert_eq!(parse_price_text("$0"), None); // non-positive
    }

    // price chain

    #[test]
    fn test_price_structured_wins() {
        let d = doc(r#"
            <span class="a-price"><span class="a-offscreen">$19.99</span></span>
            <span id="priceblock_dealprice">$15.99</span>
        "#);
        assert_eq!(extract_price(&d), Some((19.99, "$".to_string())));
    }

    #[test]
    fn test_price_falls_back_to_deal() {
        let d = doc(r#"<span id="priceblock_dealprice">$15.99</span>"#);
        assert_eq!(extract_price(&d), Some((15.99, "$".to_string())));
    }

    #[test]
    fn test_price_falls_back_to_freetext() {
        let d = doc("<p>3 options from $12.50 available today</p>");
        assert_eq!(extract_price(&d), Some((12.50, "$".to_string())));
    }

    #[test]
    fn test_price_all_strategies_miss() {
        let d = doc("<p>Currently unavailable</p>");
        assert_eq!(extract_price(&d), None);
    }

    // list price

    #[test]
    fn test_list_price_accepted_when_greater() {
        let d = doc(r#"
            <span class="a-price a-text-price"><span class="a-offscreen">$39.99</span></span>
        "#);
        assert_eq!(extract_list_price(&d, 29.99), Some(39.99));
    }

    #[test]
    fn test_list_price_rejected_when_not_greater() {
        let d = doc(r#"
            <span class="a-price a-text-price"><span class="a-offscreen">$20.00</span></span>
        "#);
        assert_eq!(extract_list_price(&d, 29.99), None);
        assert_eq!(extract_list_price(&d, 20.00), None);
    }

    #[test]
    fn test_list_price_rejected_without_current_price() {
        let d = doc(r#"
            <span class="a-price a-text-price"><span class="a-offscreen">$20.00</span></span>
        "#);
        // price unknown (0.0) means a discount would be ill-formed
        assert_eq!(extract_list_price(&d, 0.0), None);
    }

    #[test]
    fn test_list_price_absent() {
        let d = doc("<html><body></body></html>");
        assert_eq!(extract_list_price(&d, 29.99), None);
    }

    // rating

    #[test]
    fn test_rating() {
        let d = doc(r#"
            <i class="a-icon-star"><span class="a-icon-alt">4.7 out of 5 stars</span></i>
        "#);
        assert_eq!(extract_rating(&d), Some(4.7));
    }

    #[test]
    fn test_rating_clamped() {
        let d = doc(r#"
            <i class="a-icon-star"><span class="a-icon-alt">7.3 out of 5 stars</span></i>
        "#);
        assert_eq!(extract_rating(&d), Some(5.0));
    }

    #[test]
    fn test_rating_missing() {
        let d = doc("<html><body></body></html>");
        assert_eq!(extract_rating(&d), None);
    }

    // reviews

    #[test]
    fn test_reviews_count() {
        let d = doc(r#"<span id="acrCustomerReviewText">12,345 ratings</span>"#);
        assert_eq!(extract_reviews_count(&d), Some(12345));
    }

    #[test]
    fn test_reviews_count_missing() {
        let d = doc("<html><body></body></html>");
        assert_eq!(extract_reviews_count(&d), None);
    }

    // prime

    #[test]
    fn test_is_prime() {
        let d = doc(r#"<i class="a-icon-prime"></i>"#);
        assert!(extract_is_prime(&d));

        let d = doc("<html><body></body></html>");
        assert!(!extract_is_prime(&d));
    }

    // BSR

    #[test]
    fn test_bsr_from_detail_section() {
        let d = doc(r#"
            <div id="productDetails_detailBullets_sections1">
                <span>#1,234 in Home &amp; Kitchen (See Top 100 in Home &amp; Kitchen)</span>
                <span>#5 in Vacuum Cleaners</span>
            </div>
        "#);
        assert_eq!(extract_best_sellers_rank(&d), Some("#1234 in Home & Kitchen".to_string()));
    }

    #[test]
    fn test_bsr_first_match_only() {
        let d = doc("<p>Best Sellers Rank: #7 in Electronics\n#2 in Headphones</p>");
        assert_eq!(extract_best_sellers_rank(&d), Some("#7 in Electronics".to_string()));
    }

    #[test]
    fn test_bsr_missing() {
        let d = doc("<html><body><p>No rank here</p></body></html>");
        assert_eq!(extract_best_sellers_rank(&d), None);
    }

    // bullets

    #[test]
    fn test_bullet_points_capped_at_five() {
        let items: String = (1..=7)
            .map(|i| format!("<li><span class=\"a-list-item\">  Feature number {} here  </span></li>", i))
            .collect();
        let d = doc(&format!(r#"<div id="feature-bullets"><ul>{}</ul></div>"#, items));

        let bullets = extract_bullet_points(&d);
        assert_eq!(bullets.len(), 5);
        assert_eq!(bullets[0], "Feature number 1 here");
        assert_eq!(bullets[4], "Feature number 5 here");
    }

    #[test]
    fn test_bullet_points_drops_short_chrome() {
        let d = doc(r#"
            <div id="feature-bullets"><ul>
                <li><span class="a-list-item">OK</span></li>
                <li><span class="a-list-item">A genuinely descriptive bullet</span></li>
            </ul></div>
        "#);
        let bullets = extract_bullet_points(&d);
        assert_eq!(bullets, vec!["A genuinely descriptive bullet".to_string()]);
    }

    #[test]
    fn test_bullet_points_empty() {
        let d = doc("<html><body></body></html>");
        assert!(extract_bullet_points(&d).is_empty());
    }

    // image

    #[test]
    fn test_main_image_url() {
        let d = doc(r#"<img id="landingImage" src="https://m.media-amazon.com/images/I/x.jpg">"#);
        assert_eq!(
            extract_main_image_url(&d),
            Some("https://m.media-amazon.com/images/I/x.jpg".to_string())
        );
    }

    #[test]
    fn test_main_image_url_hires_fallback() {
        let d = doc(r#"<img id="landingImage" data-old-hires="https://img/hires.jpg">"#);
        assert_eq!(extract_main_image_url(&d), Some("https://img/hires.jpg".to_string()));
    }

    // title

    #[test]
    fn test_title_trimmed() {
        let d = doc(r#"<span id="productTitle">   Robot Vacuum Cleaner   </span>"#);
        assert_eq!(extract_title(&d), Some("Robot Vacuum Cleaner".to_string()));
    }

    #[test]
    fn test_title_skips_empty_region() {
        let d = doc(r#"<span id="productTitle">  </span><div id="title"><span>Real Title</span></div>"#);
        assert_eq!(extract_title(&d), Some("Real Title".to_string()));
    }
}
