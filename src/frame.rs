use crate::core::{AnimationDriver, Camera, ParticleSystem, SceneState, SnowField};
use crate::photos::PhotoQueue;
use crate::render;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub state: SceneState,
    pub system: ParticleSystem,
    pub snow: SnowField,
    pub driver: AnimationDriver,
    pub camera: Camera,

    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,
    pub pending_photos: PhotoQueue,

    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        self.ingest_photos();

        let summary = self.driver.advance(
            dt_sec,
            &mut self.state,
            &mut self.system,
            &mut self.snow,
            self.camera.eye,
        );

        let (w, h) = (self.canvas.width(), self.canvas.height());
        self.camera.set_viewport(w, h);
        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(w, h);
            if let Err(e) = g.render(&self.camera, &self.system, &self.snow, summary.group_world) {
                log::error!("render error: {:?}", e);
            }
        }
    }

    /// Turn decoded images into photo particles. A photo the GPU rejects is
    /// dropped whole so no frame waits on a texture that never comes.
    fn ingest_photos(&mut self) {
        let images: Vec<web::HtmlImageElement> = self.pending_photos.borrow_mut().drain(..).collect();
        for img in images {
            let (w, h) = (img.natural_width() as f32, img.natural_height() as f32);
            let texture = match &self.gpu {
                Some(g) => match g.upload_photo(&img) {
                    Ok(t) => Some(t),
                    Err(e) => {
                        log::warn!("[photos] skipping {}: {:?}", img.src(), e);
                        continue;
                    }
                },
                None => None,
            };
            let id = match self.system.add_photo(w, h) {
                Ok(id) => id,
                Err(e) => {
                    log::warn!("[photos] skipping {}: {}", img.src(), e);
                    continue;
                }
            };
            if let (Some(g), Some(t)) = (&mut self.gpu, texture) {
                g.attach_photo(id, t);
            }
            log::info!("[photos] added #{} ({}x{})", self.system.photo_count(), w, h);
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// Shared run flag plus the webcam stream, so page teardown can stop both
/// animation loops and release the camera.
#[derive(Clone)]
pub struct Lifecycle {
    running: Rc<RefCell<bool>>,
    camera: Rc<RefCell<Option<web::MediaStream>>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            running: Rc::new(RefCell::new(true)),
            camera: Rc::default(),
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    pub fn set_camera(&self, stream: web::MediaStream) {
        *self.camera.borrow_mut() = Some(stream);
    }

    pub fn shutdown(&self) {
        *self.running.borrow_mut() = false;
        if let Some(stream) = self.camera.borrow_mut().take() {
            for track in stream.get_tracks().iter() {
                if let Ok(track) = track.dyn_into::<web::MediaStreamTrack>() {
                    track.stop();
                }
            }
        }
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Call `step` once per animation frame until the lifecycle stops.
pub fn request_frames(lifecycle: Lifecycle, mut step: impl FnMut() + 'static) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !lifecycle.is_running() {
            return;
        }
        step();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>, lifecycle: Lifecycle) {
    request_frames(lifecycle, move || frame_ctx.borrow_mut().frame());
}
