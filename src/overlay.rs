use crate::constants::{ID_DEBUG, ID_LOADER, ID_UI};
use web_sys as web;

#[inline]
fn set_hidden(document: &web::Document, id: &str, hidden: bool) {
    if let Some(el) = document.get_element_by_id(id) {
        let cl = el.class_list();
        if hidden {
            _ = cl.add_1("hidden");
        } else {
            _ = cl.remove_1("hidden");
        }
    }
}

#[inline]
fn is_hidden(document: &web::Document, id: &str) -> bool {
    document
        .get_element_by_id(id)
        .map(|el| el.class_list().contains("hidden"))
        .unwrap_or(false)
}

/// Fade out the loading screen. Idempotent.
#[inline]
pub fn hide_loader(document: &web::Document) {
    set_hidden(document, ID_LOADER, true);
}

#[inline]
pub fn toggle_ui(document: &web::Document) {
    let hidden = is_hidden(document, ID_UI);
    set_hidden(document, ID_UI, !hidden);
}

pub fn set_status(document: &web::Document, text: &str) {
    if let Some(el) = document.get_element_by_id(ID_DEBUG) {
        el.set_text_content(Some(text));
    }
}
