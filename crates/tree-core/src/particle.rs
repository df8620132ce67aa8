//! A single animated scene object and its per-frame state machine.
//!
//! Each particle owns exactly one `Transform`. Only `Particle::update` writes
//! it, once per frame, by blending toward a target picked from the current
//! mode. Positions and scales never snap: both move a fraction of the
//! remaining distance every frame.

use crate::constants::*;
use crate::error::SceneError;
use crate::state::Mode;
use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};
use rand::Rng;

/// Stable handle into the particle arena. Ids are assigned in creation order
/// and never reused within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Deep green box, the bulk of the tree.
    GreenBox,
    GoldBox,
    GoldSphere,
    RedSphere,
    CandyCane,
    Dust,
    Photo,
}

impl Category {
    /// The five categories drawn by the weighted ornament roll, in roll order.
    pub const ORNAMENTS: [Category; 5] = [
        Category::GreenBox,
        Category::GoldBox,
        Category::GoldSphere,
        Category::RedSphere,
        Category::CandyCane,
    ];

    #[inline]
    pub fn is_ornament(self) -> bool {
        !matches!(self, Category::Dust | Category::Photo)
    }
}

/// Position, Euler XYZ rotation and uniform scale of one renderable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

impl Transform {
    #[inline]
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Model matrix relative to the rotating group.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.orientation(),
            self.position,
        )
    }
}

/// Photo plane size fitted into the reference box, preserving aspect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhotoFrame {
    pub width: f32,
    pub height: f32,
}

impl PhotoFrame {
    pub fn fit(pixel_width: f32, pixel_height: f32) -> Result<Self, SceneError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(pixel_width) || !valid(pixel_height) {
            return Err(SceneError::PhotoDimensions {
                width: pixel_width,
                height: pixel_height,
            });
        }
        let aspect = pixel_width / pixel_height;
        let (mut width, mut height) = (PHOTO_REFERENCE_SIZE, PHOTO_REFERENCE_SIZE);
        if aspect > 1.0 {
            height = width / aspect;
        } else {
            width = height * aspect;
        }
        Ok(Self { width, height })
    }

    /// Non-uniform scale applied to the square gold backing box.
    #[inline]
    pub fn backing_scale(&self) -> [f32; 2] {
        [
            self.width / PHOTO_REFERENCE_SIZE,
            self.height / PHOTO_REFERENCE_SIZE,
        ]
    }
}

/// Everything a particle needs from the driver to advance one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameInputs {
    pub dt: f32,
    pub elapsed: f32,
    pub mode: Mode,
    pub focus: Option<ParticleId>,
    pub group_world: Mat4,
    pub camera_position: Vec3,
    group_inverse: Mat4,
}

impl FrameInputs {
    pub fn new(
        dt: f32,
        elapsed: f32,
        mode: Mode,
        focus: Option<ParticleId>,
        group_world: Mat4,
        camera_position: Vec3,
    ) -> Self {
        Self {
            dt,
            elapsed,
            mode,
            focus,
            group_world,
            camera_position,
            group_inverse: group_world.inverse(),
        }
    }

    /// Map a world-space point into the rotating group's local space.
    #[inline]
    pub fn to_group_local(&self, world: Vec3) -> Vec3 {
        self.group_inverse.transform_point3(world)
    }
}

#[derive(Clone, Debug)]
pub struct Particle {
    id: ParticleId,
    category: Category,
    tree_target: Vec3,
    scatter_target: Vec3,
    base_scale: f32,
    spin: Vec3,
    photo: Option<PhotoFrame>,
    transform: Transform,
}

impl Particle {
    pub fn new(
        id: ParticleId,
        category: Category,
        tree_target: Vec3,
        scatter_target: Vec3,
        initial: Transform,
        spin: Vec3,
    ) -> Self {
        Self {
            id,
            category,
            tree_target,
            scatter_target,
            base_scale: initial.scale,
            spin,
            photo: None,
            transform: initial,
        }
    }

    pub(crate) fn with_photo(mut self, frame: PhotoFrame) -> Self {
        self.photo = Some(frame);
        self
    }

    #[inline]
    pub fn id(&self) -> ParticleId {
        self.id
    }
    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }
    #[inline]
    pub fn tree_target(&self) -> Vec3 {
        self.tree_target
    }
    #[inline]
    pub fn scatter_target(&self) -> Vec3 {
        self.scatter_target
    }
    #[inline]
    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }
    #[inline]
    pub fn spin(&self) -> Vec3 {
        self.spin
    }
    #[inline]
    pub fn photo(&self) -> Option<PhotoFrame> {
        self.photo
    }
    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }
    #[inline]
    pub fn is_photo(&self) -> bool {
        self.category == Category::Photo
    }

    pub(crate) fn set_tree_target(&mut self, target: Vec3) {
        self.tree_target = target;
    }

    /// Advance this particle by one frame.
    pub fn update(&mut self, f: &FrameInputs) {
        let focused = f.mode == Mode::Focus && f.focus == Some(self.id);

        let target = match f.mode {
            Mode::Tree => self.tree_target,
            Mode::Scatter => self.scatter_target,
            Mode::Focus if focused => f.to_group_local(Vec3::from(FOCUS_POINT)),
            Mode::Focus => self.scatter_target,
        };
        let rate = if focused {
            FOCUS_LERP_RATE
        } else {
            POSITION_LERP_RATE
        };
        self.transform.position = self.transform.position.lerp(target, rate * f.dt);

        match f.mode {
            Mode::Scatter => self.transform.rotation += self.spin * f.dt,
            Mode::Tree if self.is_photo() => {
                if let Some(yaw) = outward_yaw(self.transform.position) {
                    self.transform.rotation = Vec3::new(0.0, yaw, 0.0);
                }
            }
            Mode::Tree => {
                let r = &mut self.transform.rotation;
                r.x = approach(r.x, 0.0, f.dt);
                r.z = approach(r.z, 0.0, f.dt);
                r.y += TREE_SELF_SPIN * f.dt;
            }
            Mode::Focus => {}
        }

        if focused {
            let eye = f.to_group_local(f.camera_position);
            if let Some(r) = facing_rotation(eye - self.transform.position) {
                self.transform.rotation = r;
            }
        }

        let target_scale = self.target_scale(f, focused);
        self.transform.scale = approach(self.transform.scale, target_scale, SCALE_LERP_RATE * f.dt);
    }

    fn target_scale(&self, f: &FrameInputs, focused: bool) -> f32 {
        let base = self.base_scale;
        match (self.category, f.mode) {
            (Category::Dust, Mode::Tree) => 0.0,
            (Category::Dust, _) => {
                let phase = self.id.0 as f32;
                base * (DUST_SHIMMER_MIN
                    + DUST_SHIMMER_SPAN * (f.elapsed * DUST_SHIMMER_FREQ + phase).sin())
            }
            (Category::Photo, Mode::Scatter) => base * PHOTO_SCATTER_SCALE,
            (_, Mode::Focus) if focused => FOCUS_SCALE,
            (_, Mode::Focus) => base * FOCUS_BACKGROUND_SCALE,
            _ => base,
        }
    }
}

/// Random per-axis angular velocity; photos roll more gently.
pub fn random_spin<R: Rng + ?Sized>(rng: &mut R, category: Category) -> Vec3 {
    let m = if category == Category::Photo {
        PHOTO_SPIN_MULTIPLIER
    } else {
        SPIN_MULTIPLIER
    };
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * m,
        (rng.gen::<f32>() - 0.5) * m,
        (rng.gen::<f32>() - 0.5) * m,
    )
}

/// Exponential smoothing step: move `alpha` of the way from `current` to `target`.
#[inline]
pub fn approach(current: f32, target: f32, alpha: f32) -> f32 {
    current + (target - current) * alpha
}

/// Yaw that turns a plane's +Z away from the vertical axis.
fn outward_yaw(position: Vec3) -> Option<f32> {
    let out = Vec3::new(position.x, 0.0, position.z);
    (out.length_squared() > 1e-8).then(|| out.x.atan2(out.z))
}

/// Euler XYZ rotation that points +Z along `dir` with +Y kept upright.
fn facing_rotation(dir: Vec3) -> Option<Vec3> {
    let z = dir.try_normalize()?;
    let x = Vec3::Y.cross(z).try_normalize()?;
    let y = z.cross(x);
    let q = Quat::from_mat3(&Mat3::from_cols(x, y, z));
    let (a, b, c) = q.to_euler(EulerRot::XYZ);
    Some(Vec3::new(a, b, c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(mode: Mode, focus: Option<ParticleId>, dt: f32) -> FrameInputs {
        FrameInputs::new(
            dt,
            1.0,
            mode,
            focus,
            Mat4::IDENTITY,
            Vec3::new(0.0, CAMERA_Y, CAMERA_Z),
        )
    }

    fn photo_at(position: Vec3) -> Particle {
        Particle::new(
            ParticleId(3),
            Category::Photo,
            position,
            Vec3::new(10.0, 0.0, 0.0),
            Transform {
                position,
                rotation: Vec3::ZERO,
                scale: PHOTO_BASE_SCALE,
            },
            Vec3::ZERO,
        )
    }

    fn sample(id: u32, category: Category, rotation: Vec3, spin: Vec3) -> Particle {
        let position = Vec3::new(2.0, 1.0, 0.0);
        Particle::new(
            ParticleId(id),
            category,
            position,
            position,
            Transform {
                position,
                rotation,
                scale: 0.5,
            },
            spin,
        )
    }

    // dt * SCALE_LERP_RATE == 1 lands the scale on its target in one step.
    const SNAP_DT: f32 = 1.0 / SCALE_LERP_RATE;

    #[test]
    fn dust_shimmer_is_phased_by_id() {
        let mut a = sample(1, Category::Dust, Vec3::ZERO, Vec3::ZERO);
        let mut b = sample(2, Category::Dust, Vec3::ZERO, Vec3::ZERO);
        let f = frame(Mode::Scatter, None, SNAP_DT);
        a.update(&f);
        b.update(&f);
        let shimmer = |id: f32| {
            0.5 * (DUST_SHIMMER_MIN + DUST_SHIMMER_SPAN * (f.elapsed * DUST_SHIMMER_FREQ + id).sin())
        };
        assert!((a.transform().scale - shimmer(1.0)).abs() < 1e-5);
        assert!((b.transform().scale - shimmer(2.0)).abs() < 1e-5);
        assert!((a.transform().scale - b.transform().scale).abs() > 1e-3);
    }

    #[test]
    fn scattered_photos_grow() {
        let mut p = photo_at(Vec3::ZERO);
        p.update(&frame(Mode::Scatter, None, SNAP_DT));
        let expected = PHOTO_BASE_SCALE * PHOTO_SCATTER_SCALE;
        assert!((p.transform().scale - expected).abs() < 1e-5);
    }

    #[test]
    fn focus_shrinks_everything_but_the_focused_particle() {
        let mut background = sample(7, Category::GoldSphere, Vec3::ZERO, Vec3::ZERO);
        let mut photo = photo_at(Vec3::ZERO);
        let f = frame(Mode::Focus, Some(ParticleId(3)), SNAP_DT);
        background.update(&f);
        photo.update(&f);
        assert!((background.transform().scale - 0.5 * FOCUS_BACKGROUND_SCALE).abs() < 1e-5);
        assert!((photo.transform().scale - FOCUS_SCALE).abs() < 1e-5);
    }

    #[test]
    fn tree_ornaments_spin_upright() {
        let mut p = sample(4, Category::RedSphere, Vec3::new(1.0, 0.2, -0.5), Vec3::ONE);
        p.update(&frame(Mode::Tree, None, 0.1));
        let r = p.transform().rotation;
        assert!((r.x - 0.9).abs() < 1e-6);
        assert!((r.z + 0.45).abs() < 1e-6);
        assert!((r.y - (0.2 + TREE_SELF_SPIN * 0.1)).abs() < 1e-6);
    }

    #[test]
    fn scatter_tumbles_by_spin() {
        let spin = Vec3::new(0.4, -0.2, 0.6);
        let mut p = sample(5, Category::CandyCane, Vec3::new(0.1, 0.0, 0.0), spin);
        p.update(&frame(Mode::Scatter, None, 0.5));
        let expected = Vec3::new(0.1, 0.0, 0.0) + spin * 0.5;
        assert!((p.transform().rotation - expected).length() < 1e-6);
    }

    #[test]
    fn photos_spin_slower_than_ornaments() {
        use rand::{rngs::StdRng, SeedableRng};
        let mut rng = StdRng::seed_from_u64(11);
        let (mut photo_max, mut box_max) = (0.0f32, 0.0f32);
        for _ in 0..200 {
            let photo = random_spin(&mut rng, Category::Photo).abs().max_element();
            let box_spin = random_spin(&mut rng, Category::GoldBox).abs().max_element();
            assert!(photo <= PHOTO_SPIN_MULTIPLIER * 0.5);
            assert!(box_spin <= SPIN_MULTIPLIER * 0.5);
            photo_max = photo_max.max(photo);
            box_max = box_max.max(box_spin);
        }
        assert!(photo_max < box_max);
    }

    #[test]
    fn fit_preserves_aspect_inside_reference_box() {
        let wide = PhotoFrame::fit(800.0, 400.0).unwrap();
        assert!((wide.width - 1.2).abs() < 1e-6);
        assert!((wide.height - 0.6).abs() < 1e-6);
        let tall = PhotoFrame::fit(300.0, 600.0).unwrap();
        assert!((tall.width - 0.6).abs() < 1e-6);
        assert!((tall.height - 1.2).abs() < 1e-6);
        assert_eq!(tall.backing_scale(), [0.5, 1.0]);
    }

    #[test]
    fn fit_rejects_degenerate_images() {
        assert!(PhotoFrame::fit(0.0, 10.0).is_err());
        assert!(PhotoFrame::fit(10.0, f32::NAN).is_err());
    }

    #[test]
    fn tree_photo_faces_away_from_axis() {
        let mut p = photo_at(Vec3::new(5.0, 1.0, 0.0));
        p.update(&frame(Mode::Tree, None, 0.016));
        let facing = p.transform().orientation() * Vec3::Z;
        assert!(facing.x > 0.99, "facing {facing:?}");
    }

    #[test]
    fn focused_photo_faces_camera() {
        let mut p = photo_at(Vec3::new(0.0, 2.0, 0.0));
        let f = frame(Mode::Focus, Some(ParticleId(3)), 0.016);
        p.update(&f);
        let facing = p.transform().orientation() * Vec3::Z;
        let to_cam = (f.camera_position - p.transform().position).normalize();
        assert!(facing.dot(to_cam) > 0.999);
    }
}
