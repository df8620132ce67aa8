/// What a global key press asks the page to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    ToggleUi,
    ToggleMusic,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        "h" | "H" => Some(KeyAction::ToggleUi),
        "m" | "M" => Some(KeyAction::ToggleMusic),
        _ => None,
    }
}
