use crate::constants::{ID_UPLOAD, PRELOAD_IMAGES};
use crate::dom::{self, js_error};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Decoded images waiting for the next frame to turn them into particles.
pub type PhotoQueue = Rc<RefCell<Vec<web::HtmlImageElement>>>;

/// Load and fully decode an image so its natural size is known.
pub async fn decode_image(src: &str) -> anyhow::Result<web::HtmlImageElement> {
    let img = web::HtmlImageElement::new().map_err(js_error)?;
    img.set_cross_origin(Some("anonymous"));
    img.set_src(src);
    JsFuture::from(img.decode()).await.map_err(js_error)?;
    Ok(img)
}

fn enqueue(queue: &PhotoQueue, src: String, revoke: bool) {
    let queue = queue.clone();
    spawn_local(async move {
        match decode_image(&src).await {
            Ok(img) => queue.borrow_mut().push(img),
            Err(e) => log::warn!("[photos] could not load {}: {:?}", src, e),
        }
        if revoke {
            _ = web::Url::revoke_object_url(&src);
        }
    });
}

/// Queue the bundled sample photos.
pub fn preload(queue: &PhotoQueue) {
    for url in PRELOAD_IMAGES {
        enqueue(queue, url.to_string(), false);
    }
}

/// Feed every file picked in the upload input into the queue. The input is
/// cleared afterwards so picking the same file again fires another change.
pub fn wire_upload(document: &web::Document, queue: &PhotoQueue) -> anyhow::Result<()> {
    let input: web::HtmlInputElement = dom::element_by_id(document, ID_UPLOAD)?;
    let queue = queue.clone();
    let target = input.clone();
    let closure = Closure::wrap(Box::new(move || {
        let Some(files) = target.files() else {
            return;
        };
        for i in 0..files.length() {
            let Some(file) = files.get(i) else {
                continue;
            };
            match web::Url::create_object_url_with_blob(&file) {
                Ok(url) => enqueue(&queue, url, true),
                Err(e) => log::warn!("[photos] cannot read {}: {:?}", file.name(), e),
            }
        }
        target.set_value("");
    }) as Box<dyn FnMut()>);
    _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
    closure.forget();
    Ok(())
}
