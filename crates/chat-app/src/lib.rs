//! Chat App, the WASM entry point.
//!
//! This crate is the composition root (DI wiring layer).
//! It assembles the platform adapters into a `ChatSession` and exposes it
//! to the host page as the `ChatHandle` class.

mod app;

pub use app::ChatHandle;

use wasm_bindgen::prelude::*;

/// WASM entry point, runs once when the module is instantiated
#[wasm_bindgen(start)]
pub fn start() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Chat session module loaded");
}
