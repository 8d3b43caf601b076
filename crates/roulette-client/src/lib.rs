//! Marble Roulette Browser Adapters
//!
//! Glue between `roulette-core` and the browser: a canvas-backed
//! [`DrawSurface`](roulette_core::DrawSurface), a clipboard writer and
//! tracing setup.
//!
//! Everything except the CSS keyword mapping is wasm32 only. On native
//! targets this crate builds as an (almost) empty library.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::must_use_candidate)]

pub mod css;

#[cfg(target_arch = "wasm32")]
pub mod canvas;
#[cfg(target_arch = "wasm32")]
pub mod clipboard;
#[cfg(target_arch = "wasm32")]
pub mod logging;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
#[cfg(target_arch = "wasm32")]
pub use clipboard::WebClipboard;
#[cfg(target_arch = "wasm32")]
pub use logging::init_logging;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    init_logging("info");
}
