//! Stone Slabs core crate.
//!
//! A wall of stone slabs mounted into the page. A handful of slabs hide real project
//! links; the rest are decoys that only peek open briefly. Hover, tap or swipe across
//! the wall to uncover them. Layout, reveal state and swipe hit testing are plain
//! Rust (native-testable); `page` binds them to the DOM.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub(crate) mod log;
mod page;
pub mod reveal;
pub mod slabs;
pub mod swipe;

pub use config::PageConfig;
pub use error::{ConfigError, LayoutError, PageError};
pub use reveal::{Activation, EnterOutcome, PeekTicket, PointerSource, RevealController, RevealMode};
pub use slabs::{DUMMY_GLYPHS, IndexSource, PROJECTS, Project, SlabLayout, SlabRng, Tile, TileId, TileKind};
pub use swipe::{GridGeometry, PointLocator, SwipeTracker};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Mount the wall with the stock configuration.
#[wasm_bindgen]
pub fn start_page() -> Result<(), JsValue> {
    page::start_page(PageConfig::default()).map_err(JsValue::from)
}

/// Mount the wall with a JSON config, e.g. `{"total_slabs": 24, "mode": "crumble"}`.
/// Missing fields take their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_page_with_config(json: &str) -> Result<(), JsValue> {
    let config = PageConfig::from_json(json).map_err(PageError::from)?;
    page::start_page(config).map_err(JsValue::from)
}

#[wasm_bindgen]
pub fn set_reveal_mode(mode: &str) -> Result<(), JsValue> {
    let mode = RevealMode::parse(mode)
        .ok_or_else(|| JsValue::from_str(&format!("unknown reveal mode '{mode}'")))?;
    page::set_mode(mode).map_err(JsValue::from)
}

/// Id of the slab under a viewport point, if any.
#[wasm_bindgen]
pub fn hit_test_touch_point(x: f64, y: f64) -> Option<String> {
    page::hit_test_touch_point(x, y).map(|id| id.as_str().to_owned())
}
