#![forbid(unsafe_code)]
#![cfg_attr(not(debug_assertions), deny(warnings))] // Forbid warnings in release builds
#![warn(clippy::all, rust_2018_idioms)]

mod app;
pub mod checker;
pub mod config;
pub mod drag;
pub mod edge;
pub mod error;
pub mod geometry;
pub mod model;
pub mod point;
pub mod problem;
pub mod scene;
pub mod session;
pub mod vertex;

pub use app::EditorApp;
pub use error::{EditorError, Result};
pub use model::PoseModel;
pub use session::Session;

// ----------------------------------------------------------------------------
// When compiling for web:

#[cfg(target_arch = "wasm32")]
use eframe::wasm_bindgen::{self, prelude::*};

/// This is the entry-point for all the web-assembly.
/// This is called once from the HTML.
/// It loads the app, installs some callbacks, then returns.
/// You can add more callbacks like this if you want to call in to your code.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start(canvas_id: &str) -> std::result::Result<(), eframe::wasm_bindgen::JsValue> {
    let app = EditorApp::default();
    eframe::start_web(canvas_id, Box::new(app))
}
