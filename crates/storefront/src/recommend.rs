//! Product recommendations for the wishlist view.
//!
//! A small deterministic scorer over the wishlist and the catalog: brand
//! affinity, price-band distance from the wishlist's median price, name-token
//! overlap, and an availability nudge. Pure function - no I/O, no state - so
//! the wishlist view can recompute it whenever either input changes.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;

use glownest_core::ProductId;

use crate::api::types::Product;

/// Maximum number of recommendations returned.
pub const MAX_RECOMMENDATIONS: usize = 4;

/// Common words ignored when tokenizing product names.
const STOP_WORDS: [&str; 12] = [
    "the", "a", "an", "of", "for", "and", "or", "to", "with", "by", "on", "in",
];

/// Brand match with any wishlist item.
const BRAND_WEIGHT: f64 = 5.0;
/// Name-token overlap is capped at this many points.
const OVERLAP_CAP: f64 = 3.0;
/// In-stock nudge.
const AVAILABILITY_WEIGHT: f64 = 0.5;

/// Pick up to [`MAX_RECOMMENDATIONS`] catalog products to suggest alongside
/// the wishlist.
///
/// Products already in the wishlist are excluded outright. With an empty
/// wishlist there is nothing to score against (the median price of an empty
/// list is ill-defined), so the first few catalog entries are returned in
/// catalog order.
///
/// Ties keep the catalog's original order: the sort is stable, so an unstable
/// ordering can never shuffle the top picks between recomputes.
#[must_use]
pub fn recommend(wishlist: &[Product], catalog: &[Product]) -> Vec<Product> {
    if wishlist.is_empty() {
        return catalog.iter().take(MAX_RECOMMENDATIONS).cloned().collect();
    }

    let wishlist_ids: HashSet<&ProductId> = wishlist.iter().map(|product| &product.id).collect();
    let wishlist_brands: HashSet<&str> = wishlist
        .iter()
        .filter_map(|product| product.brand.as_deref())
        .collect();
    let token_frequency = pooled_token_frequency(wishlist);
    let median = median_price(wishlist);

    let mut scored: Vec<(f64, &Product)> = catalog
        .iter()
        .filter(|product| !wishlist_ids.contains(&product.id))
        .map(|product| {
            (
                score(product, &wishlist_brands, &token_frequency, median),
                product,
            )
        })
        .collect();

    // Stable sort: equal scores preserve catalog order.
    scored.sort_by(|(a, _), (b, _)| b.total_cmp(a));

    scored
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|(_, product)| product.clone())
        .collect()
}

/// Score one candidate against the wishlist signals.
fn score(
    product: &Product,
    wishlist_brands: &HashSet<&str>,
    token_frequency: &HashMap<String, u32>,
    median: Option<Decimal>,
) -> f64 {
    let mut score = 0.0;

    // Brand match has the biggest boost
    if let Some(brand) = product.brand.as_deref()
        && wishlist_brands.contains(brand)
    {
        score += BRAND_WEIGHT;
    }

    score += price_band_score(product.price, median);

    let overlap = tokenize(&product.product_name)
        .filter(|token| token_frequency.contains_key(token))
        .count();
    #[allow(clippy::cast_precision_loss)]
    let overlap = overlap as f64;
    score += overlap.min(OVERLAP_CAP);

    if product.is_available {
        score += AVAILABILITY_WEIGHT;
    }

    score
}

/// Points for sitting near the wishlist's median price.
///
/// Relative deviation bands: within 10% scores 3, within 20% scores 2,
/// within 35% scores 1. Skipped entirely when either price is unusable.
fn price_band_score(price: Decimal, median: Option<Decimal>) -> f64 {
    let Some(median) = median else {
        return 0.0;
    };
    if price <= Decimal::ZERO {
        return 0.0;
    }

    let deviation = ((price - median) / median).abs();
    if deviation <= Decimal::new(10, 2) {
        3.0
    } else if deviation <= Decimal::new(20, 2) {
        2.0
    } else if deviation <= Decimal::new(35, 2) {
        1.0
    } else {
        0.0
    }
}

/// The median of the wishlist's positive prices: sort ascending and take the
/// element at index `n / 2`, without averaging the middle pair for even
/// lengths. `None` when no wishlist item has a positive price.
fn median_price(wishlist: &[Product]) -> Option<Decimal> {
    let mut prices: Vec<Decimal> = wishlist
        .iter()
        .map(|product| product.price)
        .filter(|price| *price > Decimal::ZERO)
        .collect();
    if prices.is_empty() {
        return None;
    }
    prices.sort_unstable();
    prices.get(prices.len() / 2).copied()
}

/// Pool every wishlist product name into a token frequency map.
fn pooled_token_frequency(wishlist: &[Product]) -> HashMap<String, u32> {
    let mut frequency = HashMap::new();
    for product in wishlist {
        for token in tokenize(&product.product_name) {
            *frequency.entry(token).or_insert(0) += 1;
        }
    }
    frequency
}

/// Lowercase, strip everything outside `[a-z0-9\s]`, split on whitespace,
/// and drop stop words.
fn tokenize(name: &str) -> impl Iterator<Item = String> + '_ {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .filter(|token| !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect::<Vec<_>>()
        .into_iter()
}
