//! Hand-landmark gesture classification.
//!
//! One frame of landmarks becomes a pointer reading plus, when the hand is
//! large enough in frame, a mode decision. Ratios are plain thresholds with
//! an ambiguous band between the fist and open-hand cutoffs that keeps the
//! previous mode.

use crate::constants::*;
use crate::error::SceneError;
use crate::particle::ParticleId;
use crate::state::{Mode, SceneState};
use glam::{Vec2, Vec3};
use rand::prelude::*;

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;

const FINGERTIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// The 21 joints of one detected hand in normalized image coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks(pub [Vec3; LANDMARK_COUNT]);

impl HandLandmarks {
    pub fn from_points(points: &[Vec3]) -> Result<Self, SceneError> {
        let joints: [Vec3; LANDMARK_COUNT] =
            points.try_into().map_err(|_| SceneError::LandmarkCount {
                expected: LANDMARK_COUNT,
                got: points.len(),
            })?;
        Ok(Self(joints))
    }

    /// Build from a flat `[x0, y0, z0, x1, ...]` buffer.
    pub fn from_flat(coords: &[f32]) -> Result<Self, SceneError> {
        if coords.len() != LANDMARK_COUNT * 3 {
            return Err(SceneError::LandmarkCount {
                expected: LANDMARK_COUNT,
                got: coords.len() / 3,
            });
        }
        let points: Vec<Vec3> = coords
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();
        Self::from_points(&points)
    }

    #[inline]
    fn image_xy(&self, i: usize) -> Vec2 {
        self.0[i].truncate()
    }

    /// Image-plane distance between two joints; depth is ignored.
    #[inline]
    fn planar_distance(&self, a: usize, b: usize) -> f32 {
        self.image_xy(a).distance(self.image_xy(b))
    }

    /// Pointer anchored on the middle-finger base, mapped to [-1, 1].
    pub fn pointer(&self) -> Vec2 {
        (self.image_xy(MIDDLE_MCP) - Vec2::splat(0.5)) * 2.0
    }

    pub fn metrics(&self) -> HandMetrics {
        let hand_size = self.planar_distance(MIDDLE_MCP, WRIST);
        let avg_tip = FINGERTIPS
            .iter()
            .map(|&tip| self.planar_distance(tip, WRIST))
            .sum::<f32>()
            / FINGERTIPS.len() as f32;
        let pinch = self.planar_distance(THUMB_TIP, INDEX_TIP);
        HandMetrics {
            hand_size,
            extension_ratio: avg_tip / hand_size,
            pinch_ratio: pinch / hand_size,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandMetrics {
    pub hand_size: f32,
    pub extension_ratio: f32,
    pub pinch_ratio: f32,
}

impl HandMetrics {
    /// Hands this small in frame give unstable ratios.
    #[inline]
    pub fn is_reliable(&self) -> bool {
        self.hand_size >= MIN_HAND_SIZE
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    Fist,
    Pinch,
    OpenHand,
    /// Between the fist and open-hand thresholds without a pinch.
    Ambiguous,
}

/// First matching rule wins: fist, then pinch, then open hand.
pub fn classify(extension_ratio: f32, pinch_ratio: f32) -> Gesture {
    if extension_ratio < FIST_EXTENSION_MAX {
        Gesture::Fist
    } else if pinch_ratio < PINCH_RATIO_MAX {
        Gesture::Pinch
    } else if extension_ratio > OPEN_EXTENSION_MIN {
        Gesture::OpenHand
    } else {
        Gesture::Ambiguous
    }
}

/// What the classifier did with one frame, for status reporting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    NoHand,
    /// Pointer updated, mode decision skipped.
    Unreliable(HandMetrics),
    Classified(HandMetrics, Gesture),
}

pub struct GestureClassifier {
    rng: StdRng,
}

impl GestureClassifier {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fold one detector frame into the scene state.
    ///
    /// `photos` lists the live photo particles a pinch may focus on. The
    /// pointer is written before the hand-size gate so it tracks even on
    /// frames too degenerate for a mode decision.
    pub fn process(
        &mut self,
        state: &mut SceneState,
        hand: Option<&HandLandmarks>,
        photos: &[ParticleId],
    ) -> FrameOutcome {
        let Some(hand) = hand else {
            state.hand.detected = false;
            return FrameOutcome::NoHand;
        };

        let pointer = hand.pointer();
        state.hand.detected = true;
        state.hand.x = pointer.x;
        state.hand.y = pointer.y;

        let metrics = hand.metrics();
        if !metrics.is_reliable() {
            return FrameOutcome::Unreliable(metrics);
        }

        let gesture = classify(metrics.extension_ratio, metrics.pinch_ratio);
        match gesture {
            Gesture::Fist => state.release_to(Mode::Tree),
            Gesture::OpenHand => state.release_to(Mode::Scatter),
            Gesture::Pinch if state.mode() != Mode::Focus => {
                if let Some(&photo) = photos.choose(&mut self.rng) {
                    state.focus_on(photo);
                }
            }
            Gesture::Pinch | Gesture::Ambiguous => {}
        }
        FrameOutcome::Classified(metrics, gesture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_order_matches_thresholds() {
        assert_eq!(classify(1.0, 0.1), Gesture::Fist);
        assert_eq!(classify(1.0, 0.9), Gesture::Fist);
        assert_eq!(classify(1.6, 0.2), Gesture::Pinch);
        assert_eq!(classify(1.8, 0.2), Gesture::Pinch);
        assert_eq!(classify(1.8, 0.9), Gesture::OpenHand);
        assert_eq!(classify(1.6, 0.6), Gesture::Ambiguous);
    }

    #[test]
    fn flat_buffer_must_hold_every_joint() {
        let err = HandLandmarks::from_flat(&[0.0; 30]).unwrap_err();
        assert_eq!(
            err,
            SceneError::LandmarkCount {
                expected: 21,
                got: 10
            }
        );
        assert!(HandLandmarks::from_flat(&[0.5; 63]).is_ok());
    }
}
