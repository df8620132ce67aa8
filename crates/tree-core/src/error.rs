use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("expected {expected} hand landmarks, got {got}")]
    LandmarkCount { expected: usize, got: usize },

    #[error("photo dimensions must be positive and finite, got {width}x{height}")]
    PhotoDimensions { width: f32, height: f32 },
}
