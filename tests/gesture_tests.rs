// Host-side tests for the gesture classifier.

use glam::Vec3;
use tree_core::{
    FrameOutcome, Gesture, GestureClassifier, HandLandmarks, Mode, ParticleId, SceneState,
    INDEX_TIP, LANDMARK_COUNT, MIDDLE_MCP, MIDDLE_TIP, PINKY_TIP, RING_TIP, THUMB_TIP, WRIST,
};

const HAND_SIZE: f32 = 0.2;

/// Upright hand with the requested extension and pinch ratios.
fn hand(extension: f32, pinch: f32) -> HandLandmarks {
    hand_scaled(extension, pinch, HAND_SIZE)
}

fn hand_scaled(extension: f32, pinch: f32, size: f32) -> HandLandmarks {
    let mut pts = [Vec3::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
    let wrist = Vec3::new(0.5, 0.8, 0.0);
    pts[WRIST] = wrist;
    pts[MIDDLE_MCP] = wrist - Vec3::new(0.0, size, 0.0);
    let tip = wrist - Vec3::new(0.0, extension * size, 0.0);
    for i in [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP] {
        pts[i] = tip;
    }
    pts[THUMB_TIP] = tip + Vec3::new(pinch * size, 0.0, 0.0);
    HandLandmarks(pts)
}

fn photos() -> Vec<ParticleId> {
    vec![ParticleId(10), ParticleId(11), ParticleId(12)]
}

fn state_in(mode: Mode) -> SceneState {
    let mut s = SceneState::new();
    match mode {
        Mode::Focus => s.focus_on(ParticleId(11)),
        other => s.release_to(other),
    }
    s
}

#[test]
fn metrics_recover_constructed_ratios() {
    let m = hand(1.6, 0.6).metrics();
    assert!((m.hand_size - HAND_SIZE).abs() < 1e-5);
    assert!((m.extension_ratio - 1.6).abs() < 1e-4);
    assert!((m.pinch_ratio - 0.6).abs() < 1e-4);
}

#[test]
fn closed_fist_resolves_to_tree_regardless_of_pinch() {
    let mut c = GestureClassifier::new(1);
    for pinch in [0.1, 0.5, 0.9] {
        let mut s = state_in(Mode::Focus);
        c.process(&mut s, Some(&hand(1.0, pinch)), &photos());
        assert_eq!(s.mode(), Mode::Tree);
        assert_eq!(s.focus(), None);
    }
}

#[test]
fn pinch_enters_focus_on_a_live_photo() {
    let mut c = GestureClassifier::new(2);
    let mut s = state_in(Mode::Scatter);
    let out = c.process(&mut s, Some(&hand(1.6, 0.2)), &photos());
    assert!(matches!(out, FrameOutcome::Classified(_, Gesture::Pinch)));
    assert_eq!(s.mode(), Mode::Focus);
    assert!(photos().contains(&s.focus().unwrap()));
}

#[test]
fn repeated_pinch_keeps_current_focus() {
    let mut c = GestureClassifier::new(3);
    let mut s = state_in(Mode::Focus);
    for _ in 0..20 {
        c.process(&mut s, Some(&hand(1.6, 0.2)), &photos());
        assert_eq!(s.focus(), Some(ParticleId(11)));
    }
}

#[test]
fn pinch_without_photos_holds_mode() {
    let mut c = GestureClassifier::new(4);
    let mut s = state_in(Mode::Tree);
    c.process(&mut s, Some(&hand(1.6, 0.2)), &[]);
    assert_eq!(s.mode(), Mode::Tree);
    assert_eq!(s.focus(), None);
}

#[test]
fn open_hand_resolves_to_scatter() {
    let mut c = GestureClassifier::new(5);
    let mut s = state_in(Mode::Focus);
    c.process(&mut s, Some(&hand(1.8, 0.9)), &photos());
    assert_eq!(s.mode(), Mode::Scatter);
    assert_eq!(s.focus(), None);
}

#[test]
fn ambiguous_band_keeps_previous_mode() {
    let mut c = GestureClassifier::new(6);
    for mode in [Mode::Tree, Mode::Scatter, Mode::Focus] {
        let mut s = state_in(mode);
        let focus_before = s.focus();
        c.process(&mut s, Some(&hand(1.6, 0.6)), &photos());
        assert_eq!(s.mode(), mode);
        assert_eq!(s.focus(), focus_before);
    }
}

#[test]
fn tiny_hand_moves_pointer_but_not_mode() {
    let mut c = GestureClassifier::new(7);
    let mut s = state_in(Mode::Scatter);
    let tiny = hand_scaled(1.0, 0.5, 0.01);
    let out = c.process(&mut s, Some(&tiny), &photos());
    assert!(matches!(out, FrameOutcome::Unreliable(_)));
    assert_eq!(s.mode(), Mode::Scatter);
    assert!(s.hand.detected);
    let expected = tiny.pointer();
    assert!((s.hand.x - expected.x).abs() < 1e-6);
    assert!((s.hand.y - expected.y).abs() < 1e-6);
}

#[test]
fn pointer_maps_middle_base_to_unit_square() {
    let mut pts = [Vec3::ZERO; LANDMARK_COUNT];
    pts[MIDDLE_MCP] = Vec3::new(0.75, 0.25, 0.0);
    let p = HandLandmarks(pts).pointer();
    assert!((p.x - 0.5).abs() < 1e-6);
    assert!((p.y + 0.5).abs() < 1e-6);
}

#[test]
fn lost_hand_keeps_last_pointer_and_mode() {
    let mut c = GestureClassifier::new(8);
    let mut s = state_in(Mode::Tree);
    c.process(&mut s, Some(&hand(1.8, 0.9)), &photos());
    let (x, y) = (s.hand.x, s.hand.y);

    let out = c.process(&mut s, None, &photos());
    assert_eq!(out, FrameOutcome::NoHand);
    assert!(!s.hand.detected);
    assert_eq!((s.hand.x, s.hand.y), (x, y));
    assert_eq!(s.mode(), Mode::Scatter);
}
