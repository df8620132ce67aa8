// Host-side tests for the debug status line.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod status {
    include!("../src/status.rs");
}

use tree_core::{FrameOutcome, Gesture, HandMetrics, Mode};

fn metrics() -> HandMetrics {
    HandMetrics {
        hand_size: 0.234,
        extension_ratio: 1.876,
        pinch_ratio: 0.5,
    }
}

#[test]
fn lost_hand_reports_no_hand() {
    assert_eq!(
        status::describe(&FrameOutcome::NoHand, Mode::Tree).as_deref(),
        Some(status::NO_HAND)
    );
}

#[test]
fn unreliable_frame_keeps_previous_line() {
    assert_eq!(
        status::describe(&FrameOutcome::Unreliable(metrics()), Mode::Scatter),
        None
    );
}

#[test]
fn classified_frame_lists_metrics_and_mode() {
    let line = status::describe(
        &FrameOutcome::Classified(metrics(), Gesture::OpenHand),
        Mode::Scatter,
    );
    assert_eq!(
        line.as_deref(),
        Some(format!(
            "Size: 0.23 | Ext: 1.88 | Pinch: 0.50 | Mode: {}",
            Mode::Scatter.label()
        ))
        .as_deref()
    );
}
