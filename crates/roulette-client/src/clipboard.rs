//! Browser clipboard for the standings export.

use roulette_core::{Clipboard, RouletteError};
use wasm_bindgen_futures::JsFuture;

/// Writes through `navigator.clipboard`. The write runs detached; `done`
/// fires once the promise settles.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebClipboard;

impl Clipboard for WebClipboard {
    fn write_text(&self, text: &str, done: Box<dyn FnOnce(Result<(), RouletteError>)>) {
        let text = text.to_owned();
        wasm_bindgen_futures::spawn_local(async move {
            let Some(window) = web_sys::window() else {
                done(Err(RouletteError::Clipboard("no window".to_owned())));
                return;
            };
            let promise = window.navigator().clipboard().write_text(&text);
            let result = JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|e| RouletteError::Clipboard(format!("{e:?}")));
            done(result);
        });
    }
}
