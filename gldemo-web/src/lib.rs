/// gldemo web - WebGL2 front-end for the sketch, mover and solid demos
///
/// Each app owns its canvas context and exposes event hooks; the page's JS
/// forwards DOM events and drives `requestAnimationFrame`.
use wasm_bindgen::prelude::*;

mod gl;
mod mover_app;
mod shaders;
mod sketch_app;
mod solid_app;

pub use mover_app::MoverApp;
pub use sketch_app::SketchApp;
pub use solid_app::SolidApp;

/// Report an initialisation failure the way the browser demos surface it:
/// console error plus a blocking alert
#[wasm_bindgen]
pub fn report_init_error(err: &JsValue) {
    web_sys::console::error_2(&JsValue::from_str("Failed to initialize program:"), err);
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message("Failed to initialize program");
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    web_sys::console::log_1(&JsValue::from_str("gldemo-web loaded"));
    Ok(())
}
