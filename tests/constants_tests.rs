// Host-side tests for the web front-end constants.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn post_processing_is_within_reasonable_bounds() {
    assert!(BLOOM_STRENGTH > 0.0 && BLOOM_STRENGTH <= 1.0);
    // Threshold is a luminance cut in [0, 1]
    assert!(BLOOM_THRESHOLD > 0.0 && BLOOM_THRESHOLD < 1.0);
    assert!(BLOOM_RADIUS >= 0.0 && BLOOM_RADIUS <= 1.0);
    assert!(TONE_EXPOSURE > 0.0);
    assert!(FOG_DENSITY > 0.0 && FOG_DENSITY < 0.1);
    assert!(MAX_PIXEL_RATIO >= 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn star_outline_is_convex_enough_to_read_as_a_star() {
    assert!(STAR_INNER_RADIUS > 0.0);
    assert!(STAR_INNER_RADIUS < STAR_OUTER_RADIUS);
    assert!(STAR_DEPTH > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn ornament_meshes_have_positive_size() {
    for size in [
        BOX_SIZE,
        SPHERE_RADIUS,
        CANE_LENGTH,
        CANE_THICKNESS,
        DUST_SIZE,
        PHOTO_FRAME_DEPTH,
        SNOW_POINT_SIZE,
    ] {
        assert!(size > 0.0);
    }
    assert!(CANE_THICKNESS < CANE_LENGTH);
    assert!(SNOW_OPACITY > 0.0 && SNOW_OPACITY <= 1.0);
}

#[test]
fn asset_urls_are_https() {
    for url in MUSIC_URLS
        .iter()
        .chain(PRELOAD_IMAGES.iter())
        .chain([DETECTOR_WASM_URL, DETECTOR_MODEL_URL].iter())
    {
        assert!(url.starts_with("https://"), "{url}");
    }
    assert!(MUSIC_URLS[0].ends_with(".mp3"));
    assert!(MUSIC_URLS[1].ends_with(".ogg"));
    assert!(MUSIC_VOLUME > 0.0 && MUSIC_VOLUME <= 1.0);
}

#[test]
fn dom_ids_are_distinct() {
    let ids = [
        ID_CANVAS,
        ID_LOADER,
        ID_UI,
        ID_DEBUG,
        ID_VIDEO,
        ID_MUSIC,
        ID_UPLOAD,
        ID_UI_TOGGLE,
    ];
    for (i, a) in ids.iter().enumerate() {
        assert!(!a.is_empty());
        for b in &ids[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
