//! Falling snow, independent of gestures and mode.

use crate::constants::*;
use glam::Vec3;
use rand::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flake {
    pub position: Vec3,
    /// World units per frame.
    pub fall_speed: f32,
    pub sway_speed: f32,
}

pub struct SnowField {
    flakes: Vec<Flake>,
    rng: StdRng,
}

impl SnowField {
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let flakes = (0..count)
            .map(|_| Flake {
                position: Vec3::new(
                    (rng.gen::<f32>() - 0.5) * SNOW_FIELD_WIDTH,
                    (rng.gen::<f32>() - 0.5) * SNOW_FIELD_HEIGHT,
                    (rng.gen::<f32>() - 0.5) * SNOW_FIELD_DEPTH,
                ),
                fall_speed: SNOW_FALL_MIN + rng.gen::<f32>() * SNOW_FALL_SPAN,
                sway_speed: rng.gen::<f32>() * SNOW_SWAY_MAX,
            })
            .collect();
        Self { flakes, rng }
    }

    /// Field with caller-supplied flakes, mostly for tests.
    pub fn from_flakes(flakes: Vec<Flake>, seed: u64) -> Self {
        Self {
            flakes,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn flakes(&self) -> &[Flake] {
        &self.flakes
    }

    /// Step every flake by one frame. Motion is per frame, not per second.
    pub fn update(&mut self, elapsed: f32) {
        for (i, flake) in self.flakes.iter_mut().enumerate() {
            let p = &mut flake.position;
            p.y -= flake.fall_speed;
            p.x += (elapsed * SNOW_SWAY_FREQ + i as f32).sin() * flake.sway_speed * SNOW_SWAY_GAIN;
            if p.y < SNOW_FLOOR {
                p.y = SNOW_CEILING;
                p.x = (self.rng.gen::<f32>() - 0.5) * SNOW_FIELD_WIDTH;
                p.z = (self.rng.gen::<f32>() - 0.5) * SNOW_FIELD_DEPTH;
            }
        }
    }
}
