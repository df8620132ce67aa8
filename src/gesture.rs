use crate::constants::{
    CAMERA_IDEAL_HEIGHT, CAMERA_IDEAL_WIDTH, DETECTOR_MODEL_URL, DETECTOR_WASM_URL, ID_VIDEO,
    VIDEO_HAVE_CURRENT_DATA,
};
use crate::core::{GestureClassifier, HandLandmarks};
use crate::dom::{self, js_error};
use crate::frame::{self, FrameContext, Lifecycle};
use crate::{overlay, status};
use js_sys::{Float32Array, Object, Reflect};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[wasm_bindgen(module = "/js/hand_bridge.js")]
extern "C" {
    #[wasm_bindgen(catch, js_name = createHandLandmarker)]
    async fn create_hand_landmarker(wasm_url: &str, model_url: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = detectHands)]
    fn detect_hands(
        landmarker: &JsValue,
        video: &web::HtmlVideoElement,
        timestamp_ms: f64,
    ) -> Result<JsValue, JsValue>;
}

/// Bring up the detector and webcam, then classify every video frame into
/// the shared scene state. Any failure leaves the scene in view-only mode.
pub async fn start(
    document: web::Document,
    frame_ctx: Rc<RefCell<FrameContext<'static>>>,
    lifecycle: Lifecycle,
    seed: u64,
) {
    if let Err(e) = run(&document, frame_ctx, lifecycle, seed).await {
        log::error!("[gesture] init error: {:?}", e);
        overlay::set_status(&document, status::CAMERA_ERROR);
        overlay::hide_loader(&document);
    }
}

async fn run(
    document: &web::Document,
    frame_ctx: Rc<RefCell<FrameContext<'static>>>,
    lifecycle: Lifecycle,
    seed: u64,
) -> anyhow::Result<()> {
    let landmarker = create_hand_landmarker(DETECTOR_WASM_URL, DETECTOR_MODEL_URL)
        .await
        .map_err(js_error)?;
    log::info!("[gesture] hand landmarker ready");

    let video: web::HtmlVideoElement = dom::element_by_id(document, ID_VIDEO)?;
    let stream = open_camera().await?;
    video.set_src_object(Some(&stream));
    lifecycle.set_camera(stream);

    let doc = document.clone();
    let source = video.clone();
    let on_loaded = Closure::once(move || {
        overlay::hide_loader(&doc);
        predict_loop(doc, source, landmarker, frame_ctx, lifecycle, seed);
    });
    video.set_onloadeddata(Some(on_loaded.as_ref().unchecked_ref()));
    on_loaded.forget();
    Ok(())
}

async fn open_camera() -> anyhow::Result<web::MediaStream> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let devices = window.navigator().media_devices().map_err(js_error)?;

    let ideal = |v: u32| -> anyhow::Result<Object> {
        let o = Object::new();
        Reflect::set(&o, &"ideal".into(), &v.into()).map_err(js_error)?;
        Ok(o)
    };
    let video = Object::new();
    Reflect::set(&video, &"facingMode".into(), &"user".into()).map_err(js_error)?;
    Reflect::set(&video, &"width".into(), &ideal(CAMERA_IDEAL_WIDTH)?).map_err(js_error)?;
    Reflect::set(&video, &"height".into(), &ideal(CAMERA_IDEAL_HEIGHT)?).map_err(js_error)?;
    let constraints = web::MediaStreamConstraints::new();
    constraints.set_video(&video);

    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(js_error)?;
    JsFuture::from(promise)
        .await
        .map_err(js_error)?
        .dyn_into::<web::MediaStream>()
        .map_err(js_error)
}

fn predict_loop(
    document: web::Document,
    video: web::HtmlVideoElement,
    landmarker: JsValue,
    frame_ctx: Rc<RefCell<FrameContext<'static>>>,
    lifecycle: Lifecycle,
    seed: u64,
) {
    let mut classifier = GestureClassifier::new(seed);
    let performance = web::window().and_then(|w| w.performance());
    frame::request_frames(lifecycle, move || {
        if video.ready_state() < VIDEO_HAVE_CURRENT_DATA {
            return;
        }
        let now = performance.as_ref().map(|p| p.now()).unwrap_or(0.0);
        let hand = match detect_hands(&landmarker, &video, now) {
            Ok(v) => read_landmarks(v),
            Err(e) => {
                log::warn!("[gesture] detect failed: {:?}", e);
                return;
            }
        };

        let mut guard = frame_ctx.borrow_mut();
        let ctx = &mut *guard;
        let photos = ctx.system.photo_ids();
        let outcome = classifier.process(&mut ctx.state, hand.as_ref(), &photos);
        if let Some(line) = status::describe(&outcome, ctx.state.mode()) {
            overlay::set_status(&document, &line);
        }
    });
}

fn read_landmarks(value: JsValue) -> Option<HandLandmarks> {
    let coords = value.dyn_into::<Float32Array>().ok()?.to_vec();
    match HandLandmarks::from_flat(&coords) {
        Ok(hand) => Some(hand),
        Err(e) => {
            log::warn!("[gesture] {}", e);
            None
        }
    }
}
