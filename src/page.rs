//! DOM glue: builds the slab wall, wires pointer / touch listeners to the reveal
//! controller and mirrors controller state onto element classes.
//!
//! All state lives in `PAGE_STATE`. Listeners borrow it only for the duration of a
//! controller call; timers are armed after the borrow is released. Every mount gets a
//! fresh sequence number and its listeners carry it, so listeners left behind by an
//! earlier wall never drive the current one.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, TouchEvent, window};

use crate::config::PageConfig;
use crate::error::PageError;
use crate::log;
use crate::reveal::{
    Activation, EnterOutcome, PeekTicket, PointerSource, RevealController, RevealMode,
};
use crate::slabs::{SlabLayout, SlabRng, Tile, TileId, TileKind};
use crate::swipe::{PointLocator, SwipeTracker};

const SLAB_ATTR: &str = "data-slab-id";

struct PageState {
    mount: u64,
    doc: Document,
    root: Element,
    slabs: HashMap<TileId, Element>,
    controller: RevealController,
    swipe: SwipeTracker,
}

thread_local! {
    static PAGE_STATE: RefCell<Option<PageState>> = const { RefCell::new(None) };
    static MOUNT_SEQ: Cell<u64> = const { Cell::new(0) };
}

/// Locator backed by `document.elementFromPoint`, so overlapping or transformed
/// slabs resolve to whatever the user actually sees on top. With `root` set, slabs
/// outside that wall do not count.
pub(crate) struct DomLocator<'a> {
    doc: &'a Document,
    root: Option<&'a Element>,
}

impl PointLocator for DomLocator<'_> {
    fn tile_at(&self, x: f64, y: f64) -> Option<TileId> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let hit = self.doc.element_from_point(x as f32, y as f32)?;
        let slab = hit.closest(&format!("[{SLAB_ATTR}]")).ok().flatten()?;
        if let Some(root) = self.root {
            let node: &web_sys::Node = &slab;
            if !root.contains(Some(node)) {
                return None;
            }
        }
        slab.get_attribute(SLAB_ATTR).map(TileId::new)
    }
}

pub fn start_page(config: PageConfig) -> Result<(), PageError> {
    config.validate()?;
    log::set_debug(config.debug);

    let win = window().ok_or(PageError::NoWindow)?;
    let doc = win.document().ok_or(PageError::NoDocument)?;

    let mut rng = match config.seed {
        Some(seed) => SlabRng::seeded(seed),
        None => SlabRng::from_entropy(),
    };
    let layout = SlabLayout::standard(config.total_slabs, &mut rng)?;
    let mount = MOUNT_SEQ.with(|seq| {
        seq.set(seq.get() + 1);
        seq.get()
    });

    let root = mount_root(&doc, &config.mount_id)?;
    root.set_inner_html("");
    let style = doc.create_element("style")?;
    style.set_text_content(Some(&stylesheet(&config)));
    root.append_child(&style)?;

    let toggle = build_mode_toggle(&doc, mount)?;
    root.append_child(&toggle)?;

    let grid = doc.create_element("div")?;
    grid.set_class_name("slab-grid");
    let mut slabs = HashMap::with_capacity(layout.len());
    for tile in layout.tiles() {
        let el = build_slab(&doc, tile)?;
        attach_slab_listeners(&el, mount, tile.id.clone(), config.peek_ms)?;
        grid.append_child(&el)?;
        slabs.insert(tile.id.clone(), el);
    }
    attach_touch_listeners(&grid, mount, config.peek_ms)?;
    root.append_child(&grid)?;

    let real = layout.real_tiles().count();
    let total = layout.len();
    let controller = RevealController::new(layout, config.mode);
    apply_mode(&root, controller.mode());

    PAGE_STATE.with(|s| {
        s.replace(Some(PageState {
            mount,
            doc,
            root,
            slabs,
            controller,
            swipe: SwipeTracker::new(),
        }))
    });
    log::info(&format!(
        "mounted {total} slabs ({real} linked) into #{}",
        config.mount_id
    ));
    Ok(())
}

/// Switch cover animation for the mounted wall.
pub fn set_mode(mode: RevealMode) -> Result<(), PageError> {
    let mount = current_mount().ok_or(PageError::Dom("page not started".into()))?;
    interact(mount, |st| {
        st.controller.set_mode(mode);
        apply_mode(&st.root, mode);
        (None, ())
    });
    log::debug(&format!("mode -> {}", mode.as_str()));
    Ok(())
}

/// Slab under a viewport coordinate, or `None` off the wall.
pub fn hit_test_touch_point(x: f64, y: f64) -> Option<TileId> {
    let doc = window()?.document()?;
    DomLocator { doc: &doc, root: None }.tile_at(x, y)
}

fn current_mount() -> Option<u64> {
    PAGE_STATE.with(|cell| cell.borrow().as_ref().map(|st| st.mount))
}

fn mount_root(doc: &Document, mount_id: &str) -> Result<Element, PageError> {
    if let Some(el) = doc.get_element_by_id(mount_id) {
        return Ok(el);
    }
    let body = doc.body().ok_or(PageError::NoBody)?;
    let el = doc.create_element("div")?;
    el.set_id(mount_id);
    body.append_child(&el)?;
    Ok(el)
}

fn build_slab(doc: &Document, tile: &Tile) -> Result<Element, PageError> {
    let cover = format!(
        "<div class=\"slab-cover\"><img class=\"slab-glyph{}\" src=\"{}\" alt=\"\" style=\"opacity:{:.2}\"></div>",
        if tile.mirrored { " mirrored" } else { "" },
        tile.glyph,
        tile.opacity,
    );
    let el = match tile.kind {
        TileKind::Real(project) => {
            let a = doc.create_element("a")?;
            a.set_attribute("href", project.url)?;
            a.set_attribute("target", "_blank")?;
            a.set_attribute("rel", "noopener noreferrer")?;
            a.set_class_name("slab slab-real");
            a.set_inner_html(&format!(
                "<div class=\"slab-chamber\"><img class=\"slab-banner\" src=\"{}\" alt=\"{}\"></div>{cover}",
                project.banner, project.name
            ));
            a
        }
        TileKind::Dummy => {
            let div = doc.create_element("div")?;
            div.set_class_name("slab slab-dummy");
            div.set_inner_html(&format!("<div class=\"slab-chamber\"></div>{cover}"));
            div
        }
    };
    el.set_attribute(SLAB_ATTR, tile.id.as_str())?;
    Ok(el)
}

fn build_mode_toggle(doc: &Document, mount: u64) -> Result<Element, PageError> {
    let bar = doc.create_element("div")?;
    bar.set_class_name("slab-modes");
    for mode in [RevealMode::Flip, RevealMode::Crumble] {
        let btn = doc.create_element("button")?;
        btn.set_attribute("type", "button")?;
        btn.set_attribute("data-mode", mode.as_str())?;
        btn.set_text_content(Some(match mode {
            RevealMode::Flip => "Flip",
            RevealMode::Crumble => "Crumble",
        }));
        listen(&btn, "click", move |_evt| {
            let switched = interact(mount, |st| {
                st.controller.set_mode(mode);
                apply_mode(&st.root, mode);
                (None, ())
            });
            if switched.is_some() {
                log::debug(&format!("mode -> {}", mode.as_str()));
            }
        })?;
        bar.append_child(&btn)?;
    }
    Ok(bar)
}

fn apply_mode(root: &Element, mode: RevealMode) {
    let classes = root.class_list();
    classes.remove_2("mode-flip", "mode-crumble").ok();
    classes.add_1(&format!("mode-{}", mode.as_str())).ok();
    if let Ok(buttons) = root.query_selector_all("[data-mode]") {
        for i in 0..buttons.length() {
            if let Some(btn) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                let active = btn.get_attribute("data-mode").as_deref() == Some(mode.as_str());
                btn.class_list().toggle_with_force("is-active", active).ok();
            }
        }
    }
}

fn sync_slab(st: &PageState, id: &TileId) {
    if let Some(el) = st.slabs.get(id) {
        let open = st.controller.is_revealed(id);
        el.class_list().toggle_with_force("is-revealed", open).ok();
    }
}

/// Run a controller interaction against the wall from mount `mount` and re-render
/// every slab it could have touched: the returned slab plus the peek before and
/// after. Returns `None` when that wall is no longer the mounted one.
fn interact<R>(mount: u64, f: impl FnOnce(&mut PageState) -> (Option<TileId>, R)) -> Option<R> {
    PAGE_STATE.with(|cell| {
        let mut guard = cell.borrow_mut();
        let st = guard.as_mut().filter(|st| st.mount == mount)?;
        let before = st.controller.peeking().cloned();
        let (touched, out) = f(st);
        let after = st.controller.peeking().cloned();
        for id in [touched, before, after].into_iter().flatten() {
            sync_slab(st, &id);
        }
        Some(out)
    })
}

fn arm_peek_timer(mount: u64, ticket: PeekTicket, delay_ms: u32) {
    let Some(win) = window() else {
        return;
    };
    let cb = Closure::once_into_js(move || {
        let closed = interact(mount, |st| {
            let closed = st.controller.expire(&ticket);
            (closed.clone(), closed)
        })
        .flatten();
        if let Some(id) = closed {
            log::debug(&format!("peek expired: {id}"));
        }
    });
    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    if let Err(e) =
        win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay)
    {
        log::warn(&format!("could not arm peek timer: {}", PageError::from(e)));
    }
}

fn listen(
    target: &Element,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), PageError> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn attach_slab_listeners(
    el: &Element,
    mount: u64,
    id: TileId,
    peek_ms: u32,
) -> Result<(), PageError> {
    {
        let id = id.clone();
        listen(el, "mouseenter", move |_evt| {
            let outcome = interact(mount, |st| {
                (Some(id.clone()), st.controller.enter(&id, PointerSource::Mouse))
            });
            if let Some(EnterOutcome::Peeked(ticket)) = outcome {
                arm_peek_timer(mount, ticket, peek_ms);
            }
        })?;
    }
    {
        let id = id.clone();
        listen(el, "mouseleave", move |_evt| {
            interact(mount, |st| (Some(id.clone()), st.controller.leave(&id)));
        })?;
    }
    listen(el, "click", move |evt| {
        match interact(mount, |st| (Some(id.clone()), st.controller.activate(&id))) {
            Some(Activation::Navigate(url)) => log::debug(&format!("opening {url}")),
            Some(Activation::Intercepted) => evt.prevent_default(),
            Some(Activation::Peeked(ticket)) => arm_peek_timer(mount, ticket, peek_ms),
            // A link on a wall that was replaced by a newer mount stays inert.
            None => evt.prevent_default(),
            Some(Activation::Ignored) => {}
        }
    })
}

/// First touch point of the event, in viewport coordinates.
fn touch_point(evt: &Event) -> Option<(f64, f64)> {
    let touch = evt.dyn_ref::<TouchEvent>()?.touches().item(0)?;
    Some((touch.client_x() as f64, touch.client_y() as f64))
}

fn track_touch(evt: &Event, mount: u64, peek_ms: u32) {
    let Some((x, y)) = touch_point(evt) else {
        return;
    };
    let outcome = interact(mount, |st| {
        let locator = DomLocator {
            doc: &st.doc,
            root: Some(&st.root),
        };
        match st.swipe.track(&locator, x, y) {
            Some(id) => {
                let outcome = st.controller.enter(&id, PointerSource::Touch);
                (Some(id), Some(outcome))
            }
            None => (None, None),
        }
    })
    .flatten();
    if let Some(EnterOutcome::Peeked(ticket)) = outcome {
        arm_peek_timer(mount, ticket, peek_ms);
    }
}

fn attach_touch_listeners(grid: &Element, mount: u64, peek_ms: u32) -> Result<(), PageError> {
    listen(grid, "touchstart", move |evt| {
        interact(mount, |st| {
            st.controller.begin_touch();
            st.swipe.begin();
            (None, ())
        });
        track_touch(&evt, mount, peek_ms);
    })?;
    listen(grid, "touchmove", move |evt| {
        // Keep the page from scrolling while a finger sweeps across the wall.
        evt.prevent_default();
        track_touch(&evt, mount, peek_ms);
    })?;
    for ty in ["touchend", "touchcancel"] {
        listen(grid, ty, move |_evt| {
            interact(mount, |st| {
                st.swipe.end();
                (None, ())
            });
        })?;
    }
    Ok(())
}

fn stylesheet(config: &PageConfig) -> String {
    let ms = config.animation_ms;
    let cols = config.columns;
    format!(
        r#"
.slab-grid {{ display:grid; grid-template-columns:repeat({cols}, 1fr); gap:4px; padding:8px; }}
.slab {{ display:block; position:relative; aspect-ratio:4/3; perspective:2000px; cursor:pointer; }}
.slab-real.is-revealed {{ cursor:default; }}
.slab-chamber {{ position:absolute; inset:0; background:#3e3b36; box-shadow:inset 0 0 50px rgba(0,0,0,0.8); overflow:hidden; }}
.slab-banner {{ width:100%; height:100%; object-fit:cover; opacity:0; transition:opacity {ms}ms ease-in-out; }}
.slab.is-revealed .slab-banner {{ opacity:1; }}
.slab-cover {{ position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:#c2a676; backface-visibility:hidden; transform-style:preserve-3d; transition:all {ms}ms ease-in-out; box-shadow:4px 4px 10px rgba(0,0,0,0.5); }}
.slab-glyph {{ width:80%; height:80%; object-fit:contain; mix-blend-mode:multiply; filter:contrast(1.25) sepia(1) brightness(0.9); }}
.slab-glyph.mirrored {{ transform:scaleX(-1); }}
.mode-flip .slab.is-revealed .slab-cover {{ transform:rotateY(180deg); opacity:0; pointer-events:none; }}
.mode-crumble .slab.is-revealed .slab-cover {{ transform:scale(1.1); filter:blur(12px); opacity:0; pointer-events:none; }}
.slab-modes {{ position:fixed; top:16px; right:16px; z-index:50; display:flex; gap:8px; }}
.slab-modes button.is-active {{ background:#d97706; color:#000; }}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stylesheet_uses_config() {
        let cfg = PageConfig {
            columns: 6,
            animation_ms: 750,
            ..PageConfig::default()
        };
        let css = stylesheet(&cfg);
        assert!(css.contains("repeat(6, 1fr)"));
        assert!(css.contains("750ms"));
    }

    #[test]
    fn test_interact_without_page_is_none() {
        assert_eq!(interact(1, |_st| (None, 1)), None);
        assert_eq!(current_mount(), None);
    }
}
