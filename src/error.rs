//! Error types for page setup. Interaction itself never fails: unknown slab ids are
//! ignored by the controller.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Slab layout cannot be generated from the given inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("{projects} projects do not fit into {slots} slabs")]
    TooManyProjects { projects: usize, slots: usize },
    #[error("no decoy glyphs to draw dummy slabs from")]
    NoDummyGlyphs,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("total_slabs must be at least 1")]
    ZeroSlabs,
    #[error("columns must be at least 1")]
    ZeroColumns,
    #[error("peek_ms must be greater than 0")]
    ZeroPeek,
    #[error("invalid page config: {0}")]
    Json(String),
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("dom call failed: {0}")]
    Dom(String),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<JsValue> for PageError {
    fn from(value: JsValue) -> Self {
        PageError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<PageError> for JsValue {
    fn from(err: PageError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
