//! The particle arena: ornaments, dust motes and photo frames.
//!
//! Particles are append-only. Ids double as arena indices, so a
//! `ParticleId` stays valid for the whole session. Photo tree targets are a
//! function of the total photo count and are rebuilt in full after every
//! insertion.

use crate::constants::*;
use crate::error::SceneError;
use crate::layout;
use crate::particle::{
    random_spin, Category, FrameInputs, Particle, ParticleId, PhotoFrame, Transform,
};
use glam::Vec3;
use rand::prelude::*;
use smallvec::SmallVec;

/// Counts and tree dimensions used to build a `ParticleSystem`.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub ornament_count: usize,
    pub dust_count: usize,
    pub tree_height: f32,
    pub tree_radius: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ornament_count: ORNAMENT_COUNT,
            dust_count: DUST_COUNT,
            tree_height: TREE_HEIGHT,
            tree_radius: TREE_RADIUS,
        }
    }
}

/// Photo ids in insertion order; most sessions hold only a handful.
pub type PhotoIds = SmallVec<[ParticleId; 16]>;

pub struct ParticleSystem {
    pub config: SceneConfig,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleSystem {
    pub fn new(config: SceneConfig, seed: u64) -> Self {
        let mut system = Self {
            particles: Vec::with_capacity(config.ornament_count + config.dust_count),
            config,
            rng: StdRng::seed_from_u64(seed),
        };
        for _ in 0..system.config.ornament_count {
            system.spawn_ornament();
        }
        for _ in 0..system.config.dust_count {
            system.spawn_dust();
        }
        log::info!(
            "[particles] built ornaments={} dust={}",
            system.config.ornament_count,
            system.config.dust_count
        );
        system
    }

    #[inline]
    fn next_id(&self) -> ParticleId {
        ParticleId(self.particles.len() as u32)
    }

    fn spawn_ornament(&mut self) {
        let id = self.next_id();
        let rng = &mut self.rng;
        let category = layout::ornament_category(rng.gen());
        let scale = ORNAMENT_SCALE_MIN + rng.gen::<f32>() * ORNAMENT_SCALE_SPAN;
        let rotation = Vec3::new(
            rng.gen::<f32>() * INITIAL_ROTATION_MAX,
            rng.gen::<f32>() * INITIAL_ROTATION_MAX,
            rng.gen::<f32>() * INITIAL_ROTATION_MAX,
        );
        let spin = random_spin(rng, category);
        let scatter = layout::random_in_box(rng, [ORNAMENT_SCATTER_SIZE; 3]);
        let tree = layout::cone_point(rng, self.config.tree_height, self.config.tree_radius);
        self.particles.push(Particle::new(
            id,
            category,
            tree,
            scatter,
            Transform {
                position: tree,
                rotation,
                scale,
            },
            spin,
        ));
    }

    fn spawn_dust(&mut self) {
        let id = self.next_id();
        let rng = &mut self.rng;
        let scale = DUST_SCALE_MIN + rng.gen::<f32>() * DUST_SCALE_SPAN;
        let spin = random_spin(rng, Category::Dust);
        let scatter = layout::random_in_box(rng, [DUST_SCATTER_SIZE; 3]);
        let tree = layout::dust_cone_point(rng, self.config.tree_height, self.config.tree_radius);
        self.particles.push(Particle::new(
            id,
            Category::Dust,
            tree,
            scatter,
            Transform {
                position: tree,
                rotation: Vec3::ZERO,
                scale,
            },
            spin,
        ));
    }

    /// Register a decoded image as a framed photo particle and re-lay-out
    /// every photo on the spiral.
    pub fn add_photo(&mut self, pixel_width: f32, pixel_height: f32) -> Result<ParticleId, SceneError> {
        let frame = PhotoFrame::fit(pixel_width, pixel_height)?;
        let id = self.next_id();
        let spin = random_spin(&mut self.rng, Category::Photo);
        let scatter = layout::random_in_box(&mut self.rng, PHOTO_SCATTER_EXTENT);
        let initial = Transform {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: PHOTO_BASE_SCALE,
        };
        self.particles.push(
            Particle::new(id, Category::Photo, Vec3::ZERO, scatter, initial, spin).with_photo(frame),
        );
        self.relayout_photos();
        log::info!("[photos] added {:?}, total={}", id, self.photo_count());
        Ok(id)
    }

    /// Recompute every photo's tree target from its insertion index.
    pub fn relayout_photos(&mut self) {
        let count = self.photo_count();
        if count == 0 {
            return;
        }
        let (height, radius) = (self.config.tree_height, self.config.tree_radius);
        for (i, p) in self.particles.iter_mut().filter(|p| p.is_photo()).enumerate() {
            p.set_tree_target(layout::photo_spiral_point(i, count, height, radius));
        }
    }

    /// Advance every particle by one frame.
    pub fn update(&mut self, frame: &FrameInputs) {
        for p in &mut self.particles {
            p.update(frame);
        }
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn photo_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_photo()).count()
    }

    pub fn photo_ids(&self) -> PhotoIds {
        self.particles
            .iter()
            .filter(|p| p.is_photo())
            .map(Particle::id)
            .collect()
    }

    /// Position of the star topper in group space.
    pub fn star_position(&self) -> Vec3 {
        Vec3::new(0.0, self.config.tree_height / 2.0 + STAR_LIFT, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> ParticleSystem {
        ParticleSystem::new(
            SceneConfig {
                ornament_count: 20,
                dust_count: 10,
                ..SceneConfig::default()
            },
            1,
        )
    }

    #[test]
    fn ids_match_arena_slots() {
        let mut s = small();
        let id = s.add_photo(640.0, 480.0).unwrap();
        assert_eq!(id, ParticleId(30));
        for (i, p) in s.particles().iter().enumerate() {
            assert_eq!(p.id(), ParticleId(i as u32));
        }
        assert_eq!(s.get(id).map(Particle::category), Some(Category::Photo));
    }

    #[test]
    fn rejected_photo_leaves_arena_untouched() {
        let mut s = small();
        assert!(s.add_photo(0.0, 480.0).is_err());
        assert_eq!(s.len(), 30);
        assert_eq!(s.photo_count(), 0);
    }

    #[test]
    fn ornaments_start_on_their_tree_target() {
        let s = small();
        for p in s.particles() {
            assert_eq!(p.transform().position, p.tree_target());
        }
    }
}
