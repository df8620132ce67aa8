use crate::constants::{ID_MUSIC, MUSIC_URLS, MUSIC_VOLUME};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Looping background track behind the music toggle.
#[derive(Clone)]
pub struct Music {
    el: web::HtmlAudioElement,
    playing: Rc<RefCell<bool>>,
}

impl Music {
    pub fn new() -> anyhow::Result<Self> {
        let el = web::HtmlAudioElement::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        el.set_loop(true);
        el.set_cross_origin(Some("anonymous"));
        el.set_volume(MUSIC_VOLUME);
        // mp3 first, ogg where mp3 is unsupported
        let src = if el.can_play_type("audio/mpeg").is_empty() {
            MUSIC_URLS[1]
        } else {
            MUSIC_URLS[0]
        };
        el.set_src(src);
        Ok(Self {
            el,
            playing: Rc::new(RefCell::new(false)),
        })
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        *self.playing.borrow()
    }

    /// Start playback; browsers may refuse until the user interacts.
    pub fn play(&self) {
        let promise = match self.el.play() {
            Ok(p) => p,
            Err(e) => {
                log::warn!("[music] play rejected: {:?}", e);
                return;
            }
        };
        let this = self.clone();
        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => this.set_playing(true),
                Err(e) => {
                    log::info!("[music] autoplay prevented, waiting for user: {:?}", e);
                    this.set_playing(false);
                }
            }
        });
    }

    pub fn pause(&self) {
        _ = self.el.pause();
        self.set_playing(false);
    }

    pub fn toggle(&self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    fn set_playing(&self, playing: bool) {
        *self.playing.borrow_mut() = playing;
        if let Some(doc) = crate::dom::window_document() {
            if let Some(btn) = doc.get_element_by_id(ID_MUSIC) {
                _ = btn.class_list().toggle_with_force("playing", playing);
            }
        }
    }
}
