#![cfg(target_arch = "wasm32")]
use crate::constants::{ID_CANVAS, ID_MUSIC, ID_UI_TOGGLE};
use crate::core::{
    AnimationDriver, Camera, ParticleSystem, SceneConfig, SceneState, SnowField, SNOW_COUNT,
};
use crate::frame::{FrameContext, Lifecycle};
use crate::photos::PhotoQueue;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod core;
mod dom;
mod events;
mod frame;
mod gesture;
mod overlay;
mod photos;
mod render;
mod status;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    dom::add_window_listener("resize", move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    });
}

/// Random seed from the page's PRNG; every simulation stream derives from it.
#[inline]
fn page_seed() -> u64 {
    let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (hi << 32) | lo
}

fn wire_music(document: &web::Document) -> Option<audio::Music> {
    let music = match audio::Music::new() {
        Ok(m) => m,
        Err(e) => {
            log::warn!("[music] unavailable: {:?}", e);
            return None;
        }
    };
    music.play();
    let toggle = music.clone();
    dom::add_click_listener(document, ID_MUSIC, move || toggle.toggle());
    Some(music)
}

fn wire_teardown(
    frame_ctx: Rc<RefCell<FrameContext<'static>>>,
    lifecycle: Lifecycle,
    music: Option<audio::Music>,
) {
    dom::add_window_listener("pagehide", move || {
        lifecycle.shutdown();
        if let Some(m) = &music {
            m.pause();
        }
        match frame_ctx.try_borrow_mut() {
            Ok(mut ctx) => ctx.gpu = None,
            Err(_) => log::warn!("[teardown] frame busy, GPU state left to the page"),
        }
        log::info!("[teardown] stopped");
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("tree-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = dom::element_by_id(&document, ID_CANVAS)?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);
    overlay::set_status(&document, status::INITIALIZING);

    let seed = page_seed();
    let system = ParticleSystem::new(SceneConfig::default(), seed);
    let snow = SnowField::new(SNOW_COUNT, seed.wrapping_add(1));
    let gpu = frame::init_gpu(&canvas).await;
    let pending_photos: PhotoQueue = Rc::default();

    let mut camera = Camera::default();
    camera.set_viewport(canvas.width(), canvas.height());
    let frame_ctx = Rc::new(RefCell::new(FrameContext {
        state: SceneState::new(),
        system,
        snow,
        driver: AnimationDriver::new(),
        camera,
        canvas,
        gpu,
        pending_photos: pending_photos.clone(),
        last_instant: Instant::now(),
    }));
    let lifecycle = Lifecycle::new();

    let music = wire_music(&document);
    events::wire_global_keydown(&document, music.clone());
    let doc = document.clone();
    dom::add_click_listener(&document, ID_UI_TOGGLE, move || overlay::toggle_ui(&doc));

    if let Err(e) = photos::wire_upload(&document, &pending_photos) {
        log::warn!("[photos] upload disabled: {:?}", e);
    }
    photos::preload(&pending_photos);

    wire_teardown(frame_ctx.clone(), lifecycle.clone(), music);
    frame::start_loop(frame_ctx.clone(), lifecycle.clone());
    spawn_local(gesture::start(
        document,
        frame_ctx,
        lifecycle,
        seed.wrapping_add(2),
    ));
    Ok(())
}
