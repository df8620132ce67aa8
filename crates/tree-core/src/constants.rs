// Shared scene tuning constants used by the simulation and the web frontend.

// Particle counts
pub const ORNAMENT_COUNT: usize = 1500;
pub const DUST_COUNT: usize = 2000;
pub const SNOW_COUNT: usize = 1000;

// Tree shape (world units, centered on the group origin)
pub const TREE_HEIGHT: f32 = 24.0;
pub const TREE_RADIUS: f32 = 8.0;

// Camera
pub const CAMERA_Z: f32 = 50.0;
pub const CAMERA_Y: f32 = 2.0;
pub const CAMERA_FOV_DEG: f32 = 42.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

// Palette (0xRRGGBB)
pub const COLOR_BACKGROUND: u32 = 0x050d1a;
pub const COLOR_FOG: u32 = 0x050d1a;
pub const COLOR_CHAMPAGNE_GOLD: u32 = 0xffd966;
pub const COLOR_DEEP_GREEN: u32 = 0x03180a;
pub const COLOR_ACCENT_RED: u32 = 0x990000;

// Scatter volumes (edge lengths of origin-centered boxes)
pub const ORNAMENT_SCATTER_SIZE: f32 = 60.0;
pub const DUST_SCATTER_SIZE: f32 = 50.0;
pub const PHOTO_SCATTER_EXTENT: [f32; 3] = [50.0, 40.0, 50.0];

// Ornament sizing
pub const ORNAMENT_SCALE_MIN: f32 = 0.4;
pub const ORNAMENT_SCALE_SPAN: f32 = 0.5;
pub const ORNAMENT_RADIUS_NOISE_MIN: f32 = 0.8;
pub const ORNAMENT_RADIUS_NOISE_SPAN: f32 = 0.4;
pub const INITIAL_ROTATION_MAX: f32 = 6.0;

// Dust cloud around the tree
pub const DUST_HEIGHT_FACTOR: f32 = 1.2;
pub const DUST_RADIUS_FACTOR: f32 = 1.5;
pub const DUST_SCALE_MIN: f32 = 0.5;
pub const DUST_SCALE_SPAN: f32 = 1.0;

// Photo spiral
pub const PHOTO_LAYOUT_HEIGHT_FACTOR: f32 = 0.9;
pub const PHOTO_SPIRAL_LOOPS: f32 = 3.0;
pub const PHOTO_RING_OFFSET: f32 = 3.0;
pub const PHOTO_MIN_RADIUS: f32 = 1.0;
pub const PHOTO_BASE_SCALE: f32 = 0.8;
pub const PHOTO_REFERENCE_SIZE: f32 = 1.2; // image fits in a 1.2 x 1.2 box
pub const PHOTO_FRAME_SIZE: f32 = 1.4;
pub const PHOTO_PLANE_OFFSET_Z: f32 = 0.04;

// Star topper sits this far above the tree tip
pub const STAR_LIFT: f32 = 1.2;

// Spin magnitudes (per-axis range is [-m/2, m/2))
pub const SPIN_MULTIPLIER: f32 = 2.0;
pub const PHOTO_SPIN_MULTIPLIER: f32 = 0.3;

// Per-particle blending rates (per second)
pub const POSITION_LERP_RATE: f32 = 2.0;
pub const FOCUS_LERP_RATE: f32 = 5.0;
pub const SCALE_LERP_RATE: f32 = 4.0;
pub const TREE_SELF_SPIN: f32 = 0.5; // rad/s around the vertical axis

// Mode-dependent target scales
pub const PHOTO_SCATTER_SCALE: f32 = 2.5; // multiple of base
pub const FOCUS_SCALE: f32 = 4.5; // absolute
pub const FOCUS_BACKGROUND_SCALE: f32 = 0.8; // multiple of base

// World-space point the focused photo flies to
pub const FOCUS_POINT: [f32; 3] = [0.0, 2.0, 35.0];

// Dust shimmer: base * (MIN + SPAN * sin(FREQ * t + id))
pub const DUST_SHIMMER_MIN: f32 = 0.8;
pub const DUST_SHIMMER_SPAN: f32 = 0.4;
pub const DUST_SHIMMER_FREQ: f32 = 4.0;

// Group rotation integration
pub const SCATTER_YAW_RANGE: f32 = std::f32::consts::PI * 0.9;
pub const SCATTER_PITCH_RANGE: f32 = std::f32::consts::PI * 0.25;
pub const HAND_FOLLOW_RATE: f32 = 3.0;
pub const TREE_AUTO_YAW: f32 = 0.3;
pub const TREE_PITCH_RELAX_RATE: f32 = 2.0;
pub const IDLE_AUTO_YAW: f32 = 0.1;

// Frames longer than this are integrated as if they were this long
pub const MAX_FRAME_DT: f32 = 0.1;

// Gesture thresholds (ratios are relative to hand size)
pub const MIN_HAND_SIZE: f32 = 0.02;
pub const FIST_EXTENSION_MAX: f32 = 1.5;
pub const PINCH_RATIO_MAX: f32 = 0.35;
pub const OPEN_EXTENSION_MIN: f32 = 1.7;

// Snow field
pub const SNOW_FIELD_WIDTH: f32 = 100.0;
pub const SNOW_FIELD_DEPTH: f32 = 60.0;
pub const SNOW_FIELD_HEIGHT: f32 = 60.0;
pub const SNOW_FLOOR: f32 = -30.0;
pub const SNOW_CEILING: f32 = 30.0;
pub const SNOW_FALL_MIN: f32 = 0.1;
pub const SNOW_FALL_SPAN: f32 = 0.2;
pub const SNOW_SWAY_MAX: f32 = 0.05;
pub const SNOW_SWAY_FREQ: f32 = 2.0;
pub const SNOW_SWAY_GAIN: f32 = 0.1;

/// Split a packed 0xRRGGBB color into linear-ish float channels.
#[inline]
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}
