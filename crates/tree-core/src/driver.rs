//! Per-frame animation step: time, group rotation, particle and snow updates.

use crate::constants::*;
use crate::particle::{approach, FrameInputs};
use crate::snow::SnowField;
use crate::state::{Mode, SceneState};
use crate::system::ParticleSystem;
use glam::{EulerRot, Mat4, Vec2, Vec3};

/// Snapshot handed to the renderer after a step.
#[derive(Clone, Copy, Debug)]
pub struct FrameSummary {
    pub dt: f32,
    pub elapsed: f32,
    pub group_world: Mat4,
}

#[derive(Debug, Default)]
pub struct AnimationDriver {
    elapsed: f32,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Run one frame. `dt_sec` is wall time since the previous call and is
    /// clamped to `MAX_FRAME_DT`.
    pub fn advance(
        &mut self,
        dt_sec: f32,
        state: &mut SceneState,
        particles: &mut ParticleSystem,
        snow: &mut SnowField,
        camera_position: Vec3,
    ) -> FrameSummary {
        let dt = dt_sec.clamp(0.0, MAX_FRAME_DT);
        self.elapsed += dt;

        integrate_rotation(state, dt);
        let group_world = group_matrix(state.rotation);

        let inputs = FrameInputs::new(
            dt,
            self.elapsed,
            state.mode(),
            state.focus(),
            group_world,
            camera_position,
        );
        particles.update(&inputs);
        snow.update(self.elapsed);

        FrameSummary {
            dt,
            elapsed: self.elapsed,
            group_world,
        }
    }
}

/// Steer the group orientation for this frame.
///
/// An open hand steers yaw/pitch directly; otherwise the tree turns on its
/// own, faster when assembled, and an assembled tree also levels out.
pub fn integrate_rotation(state: &mut SceneState, dt: f32) {
    let mode = state.mode();
    let hand = state.hand;
    let r = &mut state.rotation;
    match mode {
        Mode::Scatter if hand.detected => {
            let target_yaw = hand.x * SCATTER_YAW_RANGE;
            let target_pitch = hand.y * SCATTER_PITCH_RANGE;
            r.y = approach(r.y, target_yaw, HAND_FOLLOW_RATE * dt);
            r.x = approach(r.x, target_pitch, HAND_FOLLOW_RATE * dt);
        }
        Mode::Tree => {
            r.y += TREE_AUTO_YAW * dt;
            r.x = approach(r.x, 0.0, TREE_PITCH_RELAX_RATE * dt);
        }
        Mode::Scatter | Mode::Focus => {
            r.y += IDLE_AUTO_YAW * dt;
        }
    }
}

/// World transform of the particle group for a pitch (x) / yaw (y) pair.
#[inline]
pub fn group_matrix(rotation: Vec2) -> Mat4 {
    Mat4::from_euler(EulerRot::XYZ, rotation.x, rotation.y, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ParticleId;
    use crate::state::HandSignal;

    #[test]
    fn tree_mode_spins_and_levels() {
        let mut s = SceneState::new();
        s.rotation = Vec2::new(0.5, 0.0);
        integrate_rotation(&mut s, 0.1);
        assert!((s.rotation.y - 0.03).abs() < 1e-6);
        assert!((s.rotation.x - 0.4).abs() < 1e-6);
    }

    #[test]
    fn scatter_follows_hand_only_when_detected() {
        let mut s = SceneState::new();
        s.release_to(Mode::Scatter);
        s.hand.x = 1.0;
        s.hand.detected = false;
        integrate_rotation(&mut s, 0.1);
        assert!((s.rotation.y - 0.01).abs() < 1e-6);

        s.hand.detected = true;
        let before = s.rotation.y;
        integrate_rotation(&mut s, 0.1);
        let expected = before + (SCATTER_YAW_RANGE - before) * 0.3;
        assert!((s.rotation.y - expected).abs() < 1e-5);
    }

    #[test]
    fn detected_hand_tilts_scatter_pitch() {
        let mut s = SceneState::new();
        s.release_to(Mode::Scatter);
        s.hand = HandSignal {
            detected: true,
            x: 0.0,
            y: -1.0,
        };
        integrate_rotation(&mut s, 0.1);
        assert!((s.rotation.x + SCATTER_PITCH_RANGE * 0.3).abs() < 1e-5);
        assert!(s.rotation.y.abs() < 1e-6);
    }

    #[test]
    fn focus_leaves_pitch_alone() {
        let mut s = SceneState::new();
        s.focus_on(ParticleId(0));
        s.rotation = Vec2::new(0.2, 1.0);
        integrate_rotation(&mut s, 0.1);
        assert_eq!(s.rotation.x, 0.2);
        assert!((s.rotation.y - 1.01).abs() < 1e-6);
    }
}
