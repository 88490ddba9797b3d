use crate::categories::format_category_name;
use crate::models::{DisplayRecord, Product};

pub const TITLE_LIMIT: usize = 40;
pub const ELLIPSIS: &str = "...";

pub fn present(product: &Product) -> DisplayRecord {
    let rate = product.rating.rate;
    DisplayRecord {
        id: product.id,
        title: truncate_title(&product.title),
        full_title: product.title.clone(),
        price: format_price(product.price),
        description: product.description.clone(),
        image: product.image.clone(),
        rate,
        review_count: product.rating.count,
        card_stars: card_stars(rate),
        modal_stars: modal_stars(rate),
        category_label: format_category_name(&product.category),
    }
}

/// Cuts titles longer than [`TITLE_LIMIT`] UTF-16 code units. A character that would
/// straddle the limit is dropped whole.
pub fn truncate_title(title: &str) -> String {
    if title.encode_utf16().count() <= TITLE_LIMIT {
        return title.to_string();
    }
    let mut units = 0;
    let end = title
        .char_indices()
        .find(|(_, c)| {
            units += c.len_utf16();
            units > TITLE_LIMIT
        })
        .map(|(i, _)| i)
        .unwrap_or(title.len());
    format!("{}{}", &title[..end], ELLIPSIS)
}

/// Two decimals, ties rounded up.
pub fn format_price(price: f64) -> String {
    let cents = (price.max(0.0) * 100.0).round() as u64;
    format!("{}.{:02}", cents / 100, cents % 100)
}

pub fn star_count(rate: f64) -> u8 {
    rate.round().clamp(0.0, 5.0) as u8
}

/// Card view: star `i` (1-based) is filled when `rate >= i`.
pub fn card_stars(rate: f64) -> [bool; 5] {
    std::array::from_fn(|i| rate >= (i + 1) as f64)
}

/// Detail view: star `i` (0-based) is filled when `i < round(rate)`.
pub fn modal_stars(rate: f64) -> [bool; 5] {
    let count = star_count(rate) as usize;
    std::array::from_fn(|i| i < count)
}
