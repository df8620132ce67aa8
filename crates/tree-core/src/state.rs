//! Session-wide scene state shared between the gesture path and the frame loop.
//!
//! `SceneState` is owned by the frontend and passed by reference into the
//! classifier and the animation driver; nothing in this crate keeps a global
//! copy. The focused photo is stored as a `ParticleId`, never as a reference,
//! so the particle arena stays the sole owner of every particle.

use crate::constants::{CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR, CAMERA_Y, CAMERA_Z};
use crate::particle::ParticleId;
use glam::{Mat4, Vec2, Vec3};

/// Discrete interaction mode selected by hand gestures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Particles assemble into the cone.
    #[default]
    Tree,
    /// Particles drift to their scatter targets and tumble.
    Scatter,
    /// One photo flies to the camera, everything else scatters.
    Focus,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Tree => "TREE",
            Mode::Scatter => "SCATTER",
            Mode::Focus => "FOCUS",
        }
    }
}

/// Latest pointer reading derived from the tracked hand.
///
/// `x`/`y` are in [-1, 1]. The values are kept when detection drops so the
/// driver always sees the last accepted position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandSignal {
    pub detected: bool,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct SceneState {
    mode: Mode,
    focus: Option<ParticleId>,
    pub hand: HandSignal,
    /// Smoothed group orientation: `x` is pitch, `y` is yaw (radians).
    pub rotation: Vec2,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The focused photo; `Some` only while the mode is `Focus`.
    #[inline]
    pub fn focus(&self) -> Option<ParticleId> {
        self.focus
    }

    /// Switch to `Tree` or `Scatter`, dropping any focus target.
    pub fn release_to(&mut self, mode: Mode) {
        debug_assert!(mode != Mode::Focus, "use focus_on to enter focus mode");
        if self.mode != mode {
            log::info!("[state] mode {} -> {}", self.mode.label(), mode.label());
        }
        self.mode = mode;
        self.focus = None;
    }

    /// Enter `Focus` on the given photo particle.
    pub fn focus_on(&mut self, photo: ParticleId) {
        if self.mode != Mode::Focus {
            log::info!("[state] mode {} -> FOCUS on {:?}", self.mode.label(), photo);
        }
        self.mode = Mode::Focus;
        self.focus = Some(photo);
    }
}

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, CAMERA_Y, CAMERA_Z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 16.0 / 9.0,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    ///
    /// The camera looks straight down -Z from its eye, matching a camera
    /// that was positioned but never re-aimed.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, Vec3::new(self.eye.x, self.eye.y, self.target.z), self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}
