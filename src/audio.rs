//! Page flip sound effect.
//!
//! Playback is fire-and-forget through an `HtmlAudioElement`; a rejected
//! play promise (autoplay policy before the first user gesture) is
//! swallowed after logging.

/// Default flip sound, served from the host's public assets.
pub const FLIP_SOUND: &str = "/audios/page-flip-01a.mp3";

#[cfg(target_arch = "wasm32")]
pub(crate) fn play_flip(src: &str) {
    use wasm_bindgen_futures::{spawn_local, JsFuture};

    let audio = match web_sys::HtmlAudioElement::new_with_src(src) {
        Ok(audio) => audio,
        Err(_) => {
            log::warn!("could not create audio element for {}", src);
            return;
        }
    };
    match audio.play() {
        Ok(promise) => spawn_local(async move {
            if JsFuture::from(promise).await.is_err() {
                log::debug!("flip sound blocked by autoplay policy");
            }
        }),
        Err(_) => log::warn!("could not start flip sound {}", src),
    }
}
