// Host-side tests for the particle arena, the photo spiral and the frame driver.

use std::collections::HashSet;

use glam::{Mat4, Vec3};
use tree_core::layout::photo_spiral_point;
use tree_core::{
    AnimationDriver, Category, FrameInputs, Mode, ParticleId, ParticleSystem, SceneConfig,
    SceneState, SnowField, CAMERA_Y, CAMERA_Z, FOCUS_LERP_RATE, FOCUS_POINT, FOCUS_SCALE,
    POSITION_LERP_RATE, TREE_HEIGHT, TREE_RADIUS,
};

fn small(seed: u64) -> ParticleSystem {
    ParticleSystem::new(
        SceneConfig {
            ornament_count: 60,
            dust_count: 40,
            ..SceneConfig::default()
        },
        seed,
    )
}

fn camera() -> Vec3 {
    Vec3::new(0.0, CAMERA_Y, CAMERA_Z)
}

fn still_frame(mode: Mode, focus: Option<ParticleId>, dt: f32, elapsed: f32) -> FrameInputs {
    FrameInputs::new(dt, elapsed, mode, focus, Mat4::IDENTITY, camera())
}

#[test]
fn default_scene_has_expected_population() {
    let system = ParticleSystem::new(SceneConfig::default(), 2024);
    assert_eq!(system.len(), 3500);

    let dust = system
        .particles()
        .iter()
        .filter(|p| p.category() == Category::Dust)
        .count();
    assert_eq!(dust, 2000);
    assert_eq!(system.photo_count(), 0);

    let ids: HashSet<_> = system.particles().iter().map(|p| p.id()).collect();
    assert_eq!(ids.len(), system.len());
}

#[test]
fn ornament_mix_tracks_category_weights() {
    let system = ParticleSystem::new(SceneConfig::default(), 77);
    let weights = [
        (Category::GreenBox, 0.40),
        (Category::GoldBox, 0.30),
        (Category::GoldSphere, 0.22),
        (Category::RedSphere, 0.05),
        (Category::CandyCane, 0.03),
    ];
    let total = system.config.ornament_count as f32;
    for (category, expected) in weights {
        let n = system
            .particles()
            .iter()
            .filter(|p| p.category() == category)
            .count() as f32;
        let share = n / total;
        assert!(
            (share - expected).abs() < 0.045,
            "{category:?}: share {share}, expected {expected}"
        );
    }
}

#[test]
fn positions_close_the_gap_every_frame() {
    let mut system = small(5);
    let photo = system.add_photo(800.0, 600.0).unwrap();
    let modes = [
        (Mode::Scatter, None),
        (Mode::Tree, None),
        (Mode::Focus, Some(photo)),
        (Mode::Scatter, None),
    ];
    let mut elapsed = 0.0;
    for (i, (mode, focus)) in modes.into_iter().enumerate() {
        for step in 0..30 {
            let dt = 0.01 + 0.003 * ((i * 30 + step) % 30) as f32;
            elapsed += dt;
            let before: Vec<Vec3> = system.particles().iter().map(|p| p.transform().position).collect();
            system.update(&still_frame(mode, focus, dt, elapsed));
            for (p, prev) in system.particles().iter().zip(before) {
                let focused = focus == Some(p.id());
                let (target, rate) = match mode {
                    Mode::Tree => (p.tree_target(), POSITION_LERP_RATE),
                    Mode::Focus if focused => (Vec3::from(FOCUS_POINT), FOCUS_LERP_RATE),
                    _ => (p.scatter_target(), POSITION_LERP_RATE),
                };
                let old_gap = (prev - target).length();
                let new_gap = (p.transform().position - target).length();
                assert!(
                    new_gap <= old_gap * (1.0 - rate * dt) + 1e-4,
                    "{:?} in {mode:?}: gap {old_gap} -> {new_gap}",
                    p.id()
                );
            }
        }
    }
}

#[test]
fn dust_fades_out_when_tree_assembles() {
    let mut system = small(6);
    for i in 0..200 {
        system.update(&still_frame(Mode::Tree, None, 0.05, i as f32 * 0.05));
    }
    for p in system.particles().iter().filter(|p| p.category() == Category::Dust) {
        assert!(p.transform().scale < 1e-3, "dust scale {}", p.transform().scale);
    }
}

#[test]
fn relayout_is_idempotent() {
    let mut system = small(7);
    for (w, h) in [(640.0, 480.0), (480.0, 640.0), (500.0, 500.0)] {
        system.add_photo(w, h).unwrap();
    }
    let targets = |s: &ParticleSystem| -> Vec<Vec3> {
        s.photo_ids()
            .iter()
            .filter_map(|&id| s.get(id))
            .map(|p| p.tree_target())
            .collect()
    };
    let first = targets(&system);
    system.relayout_photos();
    assert_eq!(first, targets(&system));
    for (i, t) in first.iter().enumerate() {
        assert_eq!(*t, photo_spiral_point(i, 3, TREE_HEIGHT, TREE_RADIUS));
    }
}

#[test]
fn adding_a_photo_moves_every_earlier_photo() {
    let mut system = small(8);
    for n in 1..6 {
        let before: Vec<f32> = system
            .photo_ids()
            .iter()
            .filter_map(|&id| system.get(id))
            .map(|p| p.tree_target().y)
            .collect();
        system.add_photo(400.0, 300.0).unwrap();
        assert_eq!(system.photo_count(), n);
        for (i, old_y) in before.iter().enumerate() {
            let id = system.photo_ids()[i];
            let new_y = system.get(id).unwrap().tree_target().y;
            assert!((new_y - old_y).abs() > 1e-4, "photo {i} stayed at {old_y}");
        }
    }
}

#[test]
fn spiral_stays_inside_layout_band_and_outside_cone() {
    let count = 12;
    let half = TREE_HEIGHT * 0.9 / 2.0;
    for i in 0..count {
        let p = photo_spiral_point(i, count, TREE_HEIGHT, TREE_RADIUS);
        assert!(p.y > -half && p.y < half);
        let r = Vec3::new(p.x, 0.0, p.z).length();
        let cone = TREE_RADIUS * (0.5 - p.y / TREE_HEIGHT);
        assert!(r >= cone + 3.0 - 1e-4, "photo {i} at radius {r}");
    }
}

#[test]
fn focused_photo_settles_at_focus_point() {
    let mut system = small(9);
    let id = system.add_photo(1024.0, 768.0).unwrap();
    let mut snow = SnowField::new(10, 1);
    let mut state = SceneState::new();
    state.focus_on(id);
    let mut driver = AnimationDriver::new();

    let mut summary = None;
    for _ in 0..400 {
        summary = Some(driver.advance(0.05, &mut state, &mut system, &mut snow, camera()));
    }
    let summary = summary.unwrap();
    let photo = system.get(id).unwrap();
    let world = summary.group_world.transform_point3(photo.transform().position);
    assert!(
        world.distance(Vec3::from(FOCUS_POINT)) < 1.0,
        "focused photo at {world:?}"
    );
    assert!((photo.transform().scale - FOCUS_SCALE).abs() < 1e-2);

    for p in system.particles().iter().filter(|p| p.id() != id && p.category() != Category::Dust) {
        assert!(p.transform().scale < photo.transform().scale);
    }
}

#[test]
fn driver_clamps_long_frames() {
    let mut system = small(10);
    let mut snow = SnowField::new(10, 2);
    let mut state = SceneState::new();
    let mut driver = AnimationDriver::new();
    let summary = driver.advance(3.0, &mut state, &mut system, &mut snow, camera());
    assert_eq!(summary.dt, 0.1);
    assert_eq!(driver.elapsed(), 0.1);
}
