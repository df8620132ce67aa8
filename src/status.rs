use tree_core::{FrameOutcome, Mode};

pub const INITIALIZING: &str = "Initializing...";
pub const NO_HAND: &str = "No hand detected";
pub const CAMERA_ERROR: &str = "Camera Error. View Mode Only.";

/// Status line for one classified detector frame, or `None` when the line
/// should keep its previous text.
pub fn describe(outcome: &FrameOutcome, mode: Mode) -> Option<String> {
    match outcome {
        FrameOutcome::NoHand => Some(NO_HAND.to_string()),
        FrameOutcome::Unreliable(_) => None,
        FrameOutcome::Classified(m, _) => Some(format!(
            "Size: {:.2} | Ext: {:.2} | Pinch: {:.2} | Mode: {}",
            m.hand_size,
            m.extension_ratio,
            m.pinch_ratio,
            mode.label()
        )),
    }
}
