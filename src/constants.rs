// Rendering and page-wiring constants for the web front-end.
//
// Scene-wide tunables (counts, tree size, colors) live in `tree_core`; the
// values here only concern how the browser presents that scene.

// Bloom post-processing
pub const BLOOM_STRENGTH: f32 = 0.5;
pub const BLOOM_THRESHOLD: f32 = 0.65;
pub const BLOOM_RADIUS: f32 = 0.4;

// Reinhard tone mapping exposure
pub const TONE_EXPOSURE: f32 = 2.2;

// Exponential-squared fog density
pub const FOG_DENSITY: f32 = 0.015;

// Canvas backing store never exceeds this device pixel ratio
pub const MAX_PIXEL_RATIO: f64 = 2.0;

// Mesh dimensions in particle-local units
pub const BOX_SIZE: f32 = 0.55;
pub const SPHERE_RADIUS: f32 = 0.5;
pub const CANE_LENGTH: f32 = 1.0;
pub const CANE_THICKNESS: f32 = 0.16;
pub const DUST_SIZE: f32 = 0.08;
pub const STAR_OUTER_RADIUS: f32 = 1.5;
pub const STAR_INNER_RADIUS: f32 = 0.7;
pub const STAR_DEPTH: f32 = 0.4;
pub const PHOTO_FRAME_DEPTH: f32 = 0.05;

// Snow billboard half-size in world units
pub const SNOW_POINT_SIZE: f32 = 0.4;
pub const SNOW_OPACITY: f32 = 0.8;

// Emissive tints, applied on top of the base material color
pub const GOLD_EMISSIVE: u32 = 0x443300;
pub const GREEN_EMISSIVE: u32 = 0x002200;
pub const RED_EMISSIVE: u32 = 0x330000;
pub const STAR_COLOR: u32 = 0xffdd88;
pub const STAR_EMISSIVE: u32 = 0xffaa00;
pub const DUST_COLOR: u32 = 0xffeebb;
pub const CANE_STRIPE: u32 = 0x880000;

// Background music
pub const MUSIC_URLS: [&str; 2] = [
    "https://upload.wikimedia.org/wikipedia/commons/transcoded/6/6d/Silent_Night_-_piano.ogg/Silent_Night_-_piano.ogg.mp3",
    "https://upload.wikimedia.org/wikipedia/commons/6/6d/Silent_Night_-_piano.ogg",
];
pub const MUSIC_VOLUME: f64 = 0.4;

// Photos fetched at startup
pub const PRELOAD_IMAGES: [&str; 4] = [
    "https://images.unsplash.com/photo-1543589077-47d81606c1bf?q=80&w=600",
    "https://images.unsplash.com/photo-1576919228236-a097c32a5cd4?q=80&w=600",
    "https://images.unsplash.com/photo-1512389142860-9c449e58a543?q=80&w=600",
    "https://images.unsplash.com/photo-1512389142860-9c449e58a543?q=80&w=600",
];

// Hand-landmark detector assets
pub const DETECTOR_WASM_URL: &str =
    "https://cdn.jsdelivr.net/npm/@mediapipe/tasks-vision@0.10.3/wasm";
pub const DETECTOR_MODEL_URL: &str = "https://storage.googleapis.com/mediapipe-models/hand_landmarker/hand_landmarker/float16/1/hand_landmarker.task";

// Requested webcam resolution
pub const CAMERA_IDEAL_WIDTH: u32 = 640;
pub const CAMERA_IDEAL_HEIGHT: u32 = 480;

// Video readyState at which frames can be sampled (HAVE_CURRENT_DATA)
pub const VIDEO_HAVE_CURRENT_DATA: u16 = 2;

// DOM element ids
pub const ID_CANVAS: &str = "app-canvas";
pub const ID_LOADER: &str = "loader";
pub const ID_UI: &str = "ui-overlay";
pub const ID_DEBUG: &str = "debug-status";
pub const ID_VIDEO: &str = "webcam";
pub const ID_MUSIC: &str = "music-toggle";
pub const ID_UPLOAD: &str = "photo-input";
pub const ID_UI_TOGGLE: &str = "ui-toggle";
