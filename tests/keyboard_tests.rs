// Host-side tests for the key bindings.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

mod keyboard {
    include!("../src/events/keyboard.rs");
}

use keyboard::{action_for_key, KeyAction};

#[test]
fn h_toggles_ui_in_either_case() {
    assert_eq!(action_for_key("h"), Some(KeyAction::ToggleUi));
    assert_eq!(action_for_key("H"), Some(KeyAction::ToggleUi));
}

#[test]
fn m_toggles_music_in_either_case() {
    assert_eq!(action_for_key("m"), Some(KeyAction::ToggleMusic));
    assert_eq!(action_for_key("M"), Some(KeyAction::ToggleMusic));
}

#[test]
fn other_keys_are_ignored() {
    for key in ["a", "Escape", " ", "Enter", "ArrowLeft", "hm", ""] {
        assert_eq!(action_for_key(key), None, "{key:?}");
    }
}
