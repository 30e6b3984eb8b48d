//! CSS selectors for Amazon HTML parsing.
//!
//! This file contains all CSS selectors used for parsing Amazon pages.
//! Update this file when Amazon changes their HTML structure.
//!
//! **Update process**: When parsing fails, capture HTML sample,
//! update selectors, and add test fixture.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for category listing pages.
pub mod listing {
    use super::*;

    /// Ranked product card - anything carrying a non-empty ASIN.
    pub static CARD: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div[data-asin]:not([data-asin=''])").unwrap());

    /// ASIN attribute on a card.
    pub static ASIN_ATTR: &str = "data-asin";

    /// Detail page link inside a card.
    pub static DETAIL_LINK: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "a.a-link-normal[href*='/dp/'], \
             h2 a.a-link-normal",
        )
        .unwrap()
    });
}

/// Selectors for product detail pages.
pub mod product {
    use super::*;

    /// Product title on detail page.
    pub static TITLE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "#productTitle, \
             #title span, \
             .product-title-word-break",
        )
        .unwrap()
    });

    /// Structured current price.
    pub static PRICE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "#corePrice_feature_div .a-price:not(.a-text-price) .a-offscreen, \
             #priceblock_ourprice, \
             .a-price:not(.a-text-price) .a-offscreen",
        )
        .unwrap()
    });

    /// Promotional/deal price element, second price strategy.
    pub static PRICE_DEAL: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "#priceblock_dealprice, \
             .a-priceToPay .a-offscreen, \
             #twister_swatch_price",
        )
        .unwrap()
    });

    /// "Was"/list price region (strikethrough).
    pub static PRICE_LIST: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "span.a-price.a-text-price .a-offscreen, \
             #priceblock_saleprice, \
             span[data-a-strike='true'] .a-offscreen",
        )
        .unwrap()
    });

    /// Main product image.
    pub static IMAGE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "#landingImage, \
             #imgTagWrapperId img, \
             #main-image",
        )
        .unwrap()
    });

    /// Star rating text ("4.5 out of 5 stars").
    pub static RATING: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "#acrPopover span.a-icon-alt, \
             i.a-icon-star span.a-icon-alt",
        )
        .unwrap()
    });

    /// Review count on detail page.
    pub static REVIEW_COUNT: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "#acrCustomerReviewText, \
             #acrCustomerReviewLink span",
        )
        .unwrap()
    });

    /// Prime badge on detail page.
    pub static PRIME: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "#prime-badge, \
             .a-icon-prime, \
             i.a-icon-prime",
        )
        .unwrap()
    });

    /// Feature bullet entries.
    pub static FEATURE_BULLETS: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse("#feature-bullets ul li span.a-list-item").unwrap()
    });

    /// Best Sellers Rank containers, either detail-table or bullet layout.
    pub static BSR_SECTION: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "#productDetails_detailBullets_sections1, \
             #detailBulletsWrapper_feature_div, \
             #SalesRank",
        )
        .unwrap()
    });
}

/// Selectors for detecting error/captcha pages.
pub mod errors {
    use super::*;

    /// CAPTCHA form.
    pub static CAPTCHA: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "form[action*='validateCaptcha'], \
             img[src*='captcha']",
        )
        .unwrap()
    });

    /// Dog page (Amazon's error page).
    pub static DOG_PAGE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "img[alt*='dog'], \
             .a-box-inner a[href='/ref=cs_503_link']",
        )
        .unwrap()
    });
}
