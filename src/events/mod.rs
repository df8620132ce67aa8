mod keyboard;

pub use keyboard::{action_for_key, KeyAction};

use crate::audio::Music;
use crate::overlay;
use wasm_bindgen::JsCast;
use web_sys as web;

/// `h` toggles the page chrome, `m` toggles the music. Keys typed into form
/// fields are left alone.
pub fn wire_global_keydown(document: &web::Document, music: Option<Music>) {
    if let Some(window) = web::window() {
        let doc = document.clone();
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                if ev.repeat() || ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
                    return;
                }
                let in_field = ev
                    .target()
                    .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
                    .is_some();
                if in_field {
                    return;
                }
                match action_for_key(&ev.key()) {
                    Some(KeyAction::ToggleUi) => {
                        overlay::toggle_ui(&doc);
                        ev.prevent_default();
                    }
                    Some(KeyAction::ToggleMusic) => {
                        if let Some(m) = &music {
                            m.toggle();
                        }
                        ev.prevent_default();
                    }
                    None => {}
                }
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
