//! Recommendation scoring properties over catalog fixtures.
//!
//! These pin down the ranking behavior the wishlist view relies on: relative
//! weight ordering between the signals, wishlist exclusion, tie stability,
//! and the empty-wishlist fallback.

use glownest_integration_tests::product;
use glownest_storefront::recommend::{MAX_RECOMMENDATIONS, recommend};

#[test]
fn wishlist_items_are_never_recommended() {
    let wishlist = vec![product("w1", Some("GlowLab"), "Retinol Serum", "40.00", true)];
    let catalog = vec![
        product("w1", Some("GlowLab"), "Retinol Serum", "40.00", true),
        product("c1", Some("GlowLab"), "Retinol Cream", "42.00", true),
    ];

    let picks = recommend(&wishlist, &catalog);
    assert!(picks.iter().all(|p| p.id.as_str() != "w1"));
    assert_eq!(picks.len(), 1);
}

#[test]
fn brand_match_outweighs_any_single_other_signal() {
    let wishlist = vec![product("w1", Some("GlowLab"), "Retinol Serum", "40.00", true)];
    // Same brand, terrible price fit, no name overlap, out of stock: 5.0.
    let brand_only = product("c1", Some("GlowLab"), "Clay Mask", "200.00", false);
    // Perfect price band only: 3.0.
    let price_only = product("c2", Some("Dermaglow"), "Clay Mask", "40.00", false);
    // Two-token name overlap plus availability: 2.0 + 0.5.
    let overlap_only = product("c3", Some("Dermaglow"), "Retinol Serum", "200.00", true);

    let picks = recommend(&wishlist, &[price_only, overlap_only, brand_only]);
    assert_eq!(picks[0].id.as_str(), "c1");
}

#[test]
fn combined_signals_can_outrank_a_bare_brand_match() {
    let wishlist = vec![product("w1", Some("GlowLab"), "Retinol Serum", "40.00", true)];
    // Brand only: 5.0.
    let brand_only = product("c1", Some("GlowLab"), "Clay Mask", "200.00", false);
    // Price band + two-token overlap + availability: 3.0 + 2.0 + 0.5.
    let everything_else = product("c2", Some("Dermaglow"), "Retinol Serum", "40.00", true);

    let picks = recommend(&wishlist, &[brand_only, everything_else]);
    assert_eq!(picks[0].id.as_str(), "c2");
}

#[test]
fn price_band_scores_against_the_upper_median() {
    // Even count: median is the element at index n/2 of the sorted prices,
    // here 30.00, not the 25.00 average of the middle pair.
    let wishlist = vec![
        product("w1", None, "Toner", "10.00", true),
        product("w2", None, "Cleanser", "20.00", true),
        product("w3", None, "Essence", "30.00", true),
        product("w4", None, "Serum", "40.00", true),
    ];
    // 30.00 sits exactly on the index-n/2 median (3 points); 25.00 would
    // only land in the 20% band (2 points) against it.
    let on_median = product("c1", None, "Balm", "30.00", false);
    let near_mean = product("c2", None, "Oil", "25.00", false);

    let picks = recommend(&wishlist, &[near_mean, on_median]);
    assert_eq!(picks[0].id.as_str(), "c1");
}

#[test]
fn name_overlap_is_capped() {
    let wishlist = vec![product(
        "w1",
        None,
        "Gentle Hydrating Vitamin Glow Serum",
        "30.00",
        true,
    )];
    // Five overlapping tokens, capped to three points.
    let many_tokens = product(
        "c1",
        None,
        "Gentle Hydrating Vitamin Glow Serum Duo",
        "300.00",
        false,
    );
    // Capped overlap plus availability beats capped overlap alone.
    let capped_and_available = product(
        "c2",
        None,
        "Gentle Hydrating Vitamin Serum",
        "300.00",
        true,
    );

    let picks = recommend(&wishlist, &[many_tokens, capped_and_available]);
    assert_eq!(picks[0].id.as_str(), "c2");
}

#[test]
fn availability_breaks_otherwise_equal_scores() {
    let wishlist = vec![product("w1", Some("GlowLab"), "Serum", "30.00", true)];
    let out_of_stock = product("c1", Some("GlowLab"), "Mist", "30.00", false);
    let in_stock = product("c2", Some("GlowLab"), "Balm", "30.00", true);

    let picks = recommend(&wishlist, &[out_of_stock, in_stock]);
    assert_eq!(picks[0].id.as_str(), "c2");
}

#[test]
fn ties_preserve_catalog_order() {
    let wishlist = vec![product("w1", None, "Serum", "30.00", true)];
    // Four identical candidates: catalog order must survive the sort.
    let catalog: Vec<_> = ["c1", "c2", "c3", "c4", "c5"]
        .iter()
        .map(|id| product(id, None, "Mist", "30.00", true))
        .collect();

    let picks = recommend(&wishlist, &catalog);
    let ids: Vec<_> = picks.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["c1", "c2", "c3", "c4"]);
}

#[test]
fn empty_wishlist_falls_back_to_catalog_order() {
    let catalog: Vec<_> = ["c1", "c2", "c3", "c4", "c5", "c6"]
        .iter()
        .map(|id| product(id, None, "Serum", "30.00", true))
        .collect();

    let picks = recommend(&[], &catalog);
    assert_eq!(picks.len(), MAX_RECOMMENDATIONS);
    let ids: Vec<_> = picks.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["c1", "c2", "c3", "c4"]);
}

#[test]
fn small_catalog_returns_fewer_than_the_cap() {
    let picks = recommend(&[], &[product("c1", None, "Serum", "30.00", true)]);
    assert_eq!(picks.len(), 1);
}
