//! Browser console logging. No-op off wasm so native tests never call JS imports.

use std::cell::Cell;

thread_local! {
    static DEBUG: Cell<bool> = const { Cell::new(false) };
}

pub fn set_debug(enabled: bool) {
    DEBUG.with(|d| d.set(enabled));
}

pub fn debug_enabled() -> bool {
    DEBUG.with(|d| d.get())
}

pub fn info(msg: &str) {
    emit(Level::Info, msg);
}

pub fn warn(msg: &str) {
    emit(Level::Warn, msg);
}

/// Only printed when `PageConfig::debug` is set.
pub fn debug(msg: &str) {
    if debug_enabled() {
        emit(Level::Debug, msg);
    }
}

#[derive(Clone, Copy)]
enum Level {
    Debug,
    Info,
    Warn,
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, msg: &str) {
    use wasm_bindgen::JsValue;
    let line = JsValue::from_str(&format!("[stone-slabs] {msg}"));
    match level {
        Level::Debug => web_sys::console::debug_1(&line),
        Level::Info => web_sys::console::info_1(&line),
        Level::Warn => web_sys::console::warn_1(&line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, _msg: &str) {}
