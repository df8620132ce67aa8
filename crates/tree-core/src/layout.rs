//! Target-position generators for the tree, the dust cloud and the photo spiral.

use crate::constants::*;
use crate::particle::Category;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::{FRAC_PI_4, TAU};

/// Upper edges of the cumulative ornament weights, aligned with
/// `Category::ORNAMENTS`.
pub const ORNAMENT_CUMULATIVE_WEIGHTS: [f32; 5] = [0.40, 0.70, 0.92, 0.97, 1.00];

/// Map a uniform roll in [0, 1) onto an ornament category.
pub fn ornament_category(roll: f32) -> Category {
    for (edge, category) in ORNAMENT_CUMULATIVE_WEIGHTS.iter().zip(Category::ORNAMENTS) {
        if roll < *edge {
            return category;
        }
    }
    Category::CandyCane
}

/// Uniform point in an origin-centered box with the given edge lengths.
pub fn random_in_box<R: Rng + ?Sized>(rng: &mut R, extent: [f32; 3]) -> Vec3 {
    Vec3::new(
        spread(rng, extent[0]),
        spread(rng, extent[1]),
        spread(rng, extent[2]),
    )
}

#[inline]
fn spread<R: Rng + ?Sized>(rng: &mut R, range: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * range
}

/// Ornament slot on the cone surface band. Radius shrinks linearly to the
/// tip and gets +/-20% noise so the silhouette is not a perfect cone.
pub fn cone_point<R: Rng + ?Sized>(rng: &mut R, height: f32, radius: f32) -> Vec3 {
    let y_norm: f32 = rng.gen();
    let y = (y_norm - 0.5) * height;
    let r_at_height = (1.0 - y_norm) * radius;
    let r = r_at_height * (ORNAMENT_RADIUS_NOISE_MIN + rng.gen::<f32>() * ORNAMENT_RADIUS_NOISE_SPAN);
    let angle = rng.gen::<f32>() * TAU;
    Vec3::new(angle.cos() * r, y, angle.sin() * r)
}

/// Dust slot inside a looser cone; radius is uniform from the axis outward,
/// so the cloud is densest near the trunk.
pub fn dust_cone_point<R: Rng + ?Sized>(rng: &mut R, height: f32, radius: f32) -> Vec3 {
    let h = height * DUST_HEIGHT_FACTOR;
    let r_base = radius * DUST_RADIUS_FACTOR;
    let y_norm: f32 = rng.gen();
    let y = (y_norm - 0.5) * h;
    let r = (1.0 - y_norm) * r_base * rng.gen::<f32>();
    let angle = rng.gen::<f32>() * TAU;
    Vec3::new(angle.cos() * r, y, angle.sin() * r)
}

/// Tree target of photo `index` out of `count`, on a three-turn spiral that
/// rings just outside the cone from bottom to top.
pub fn photo_spiral_point(index: usize, count: usize, height: f32, radius: f32) -> Vec3 {
    let h = height * PHOTO_LAYOUT_HEIGHT_FACTOR;
    let step_y = h / count as f32;
    let y = -h / 2.0 + step_y * index as f32 + step_y / 2.0;
    let normalized = (y + height / 2.0) / height;
    let r_max = (radius * (1.0 - normalized)).max(PHOTO_MIN_RADIUS);
    let r = r_max + PHOTO_RING_OFFSET;
    let angle = normalized * TAU * PHOTO_SPIRAL_LOOPS + FRAC_PI_4;
    Vec3::new(angle.cos() * r, y, angle.sin() * r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn weight_edges_pick_next_category() {
        assert_eq!(ornament_category(0.0), Category::GreenBox);
        assert_eq!(ornament_category(0.3999), Category::GreenBox);
        assert_eq!(ornament_category(0.40), Category::GoldBox);
        assert_eq!(ornament_category(0.70), Category::GoldSphere);
        assert_eq!(ornament_category(0.92), Category::RedSphere);
        assert_eq!(ornament_category(0.97), Category::CandyCane);
        assert_eq!(ornament_category(0.9999), Category::CandyCane);
    }

    #[test]
    fn cone_points_stay_inside_noisy_cone() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..2000 {
            let p = cone_point(&mut rng, TREE_HEIGHT, TREE_RADIUS);
            assert!(p.y >= -TREE_HEIGHT / 2.0 && p.y <= TREE_HEIGHT / 2.0);
            let y_norm = p.y / TREE_HEIGHT + 0.5;
            let r = (p.x * p.x + p.z * p.z).sqrt();
            assert!(r <= (1.0 - y_norm) * TREE_RADIUS * 1.2 + 1e-3);
        }
    }

    #[test]
    fn single_photo_sits_mid_height() {
        let p = photo_spiral_point(0, 1, TREE_HEIGHT, TREE_RADIUS);
        assert!(p.y.abs() < 1e-5);
        let r = (p.x * p.x + p.z * p.z).sqrt();
        assert!((r - (TREE_RADIUS * 0.5 + PHOTO_RING_OFFSET)).abs() < 1e-4);
    }

    #[test]
    fn spiral_winds_three_times_from_quarter_turn() {
        let count = 8;
        for i in 0..count {
            let p = photo_spiral_point(i, count, TREE_HEIGHT, TREE_RADIUS);
            let normalized = (p.y + TREE_HEIGHT / 2.0) / TREE_HEIGHT;
            let angle = normalized * TAU * PHOTO_SPIRAL_LOOPS + FRAC_PI_4;
            let dir = Vec3::new(p.x, 0.0, p.z).normalize();
            assert!((dir.x - angle.cos()).abs() < 1e-4, "photo {i}");
            assert!((dir.z - angle.sin()).abs() < 1e-4, "photo {i}");
        }
    }
}
