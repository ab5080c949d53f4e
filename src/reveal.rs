//! Tile reveal controller.
//!
//! Real slabs stay uncovered for the rest of the session once revealed. Dummy slabs
//! only *peek*: a single dummy at a time is uncovered, and it closes again either
//! immediately on pointer-leave or when its peek ticket expires. Touch devices never
//! send a leave event, so the ticket is what closes them.

use std::collections::HashSet;

use crate::slabs::{SlabLayout, Tile, TileId, TileKind};

/// Cover animation used when a slab opens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RevealMode {
    #[default]
    Flip,
    Crumble,
}

impl RevealMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "flip" => Some(RevealMode::Flip),
            "crumble" => Some(RevealMode::Crumble),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RevealMode::Flip => "flip",
            RevealMode::Crumble => "crumble",
        }
    }
}

/// Where a pointer-enter came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    Touch,
}

/// Handle for a pending peek auto-clear. Only the newest ticket can clear the peek.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeekTicket {
    pub id: TileId,
    generation: u64,
}

/// Result of entering a slab.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnterOutcome {
    /// A real slab was uncovered by this enter.
    Revealed,
    /// Dummy slab is peeking; schedule `expire` with the ticket.
    Peeked(PeekTicket),
    /// Nothing changed (already revealed, or unknown id).
    Unchanged,
}

/// Result of a click / tap on a slab.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Activation {
    /// Revealed real slab: let the link open.
    Navigate(&'static str),
    /// Real slab whose click must not navigate (first interaction).
    Intercepted,
    Peeked(PeekTicket),
    Ignored,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Peek {
    id: TileId,
    generation: u64,
}

pub struct RevealController {
    layout: SlabLayout,
    revealed: HashSet<TileId>,
    // Real slabs uncovered by a touch whose follow-up synthesized click is still due.
    click_pending: HashSet<TileId>,
    peeking: Option<Peek>,
    generation: u64,
    mode: RevealMode,
}

impl RevealController {
    pub fn new(layout: SlabLayout, mode: RevealMode) -> Self {
        Self {
            layout,
            revealed: HashSet::new(),
            click_pending: HashSet::new(),
            peeking: None,
            generation: 0,
            mode,
        }
    }

    pub fn layout(&self) -> &SlabLayout {
        &self.layout
    }

    pub fn tile(&self, id: &TileId) -> Option<&Tile> {
        self.layout.get(id)
    }

    pub fn mode(&self) -> RevealMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RevealMode) {
        self.mode = mode;
    }

    /// Add a real slab to the revealed set. Returns `true` only if it was newly added.
    pub fn reveal(&mut self, id: &TileId) -> bool {
        match self.layout.get(id) {
            Some(t) if t.is_real() => self.revealed.insert(id.clone()),
            _ => false,
        }
    }

    /// Peek a dummy slab, superseding whatever was peeking before.
    pub fn peek(&mut self, id: &TileId) -> Option<PeekTicket> {
        match self.layout.get(id) {
            Some(t) if !t.is_real() => {}
            _ => return None,
        }
        self.generation += 1;
        self.peeking = Some(Peek {
            id: id.clone(),
            generation: self.generation,
        });
        Some(PeekTicket {
            id: id.clone(),
            generation: self.generation,
        })
    }

    /// Immediate clear (pointer left the slab). Returns the id that stopped peeking.
    pub fn unpeek(&mut self, id: &TileId) -> Option<TileId> {
        if self.peeking.as_ref().is_some_and(|p| &p.id == id) {
            self.peeking.take().map(|p| p.id)
        } else {
            None
        }
    }

    /// Timer fired. Clears the peek only if no newer peek or clear happened since.
    pub fn expire(&mut self, ticket: &PeekTicket) -> Option<TileId> {
        let current = self
            .peeking
            .as_ref()
            .is_some_and(|p| p.generation == ticket.generation && p.id == ticket.id);
        if current {
            self.peeking.take().map(|p| p.id)
        } else {
            None
        }
    }

    pub fn peeking(&self) -> Option<&TileId> {
        self.peeking.as_ref().map(|p| &p.id)
    }

    pub fn revealed(&self) -> &HashSet<TileId> {
        &self.revealed
    }

    /// Whether the slab is currently uncovered (revealed real, or the peeking dummy).
    pub fn is_revealed(&self, id: &TileId) -> bool {
        match self.layout.get(id) {
            Some(t) if t.is_real() => self.revealed.contains(id),
            Some(_) => self.peeking() == Some(id),
            None => false,
        }
    }

    /// Pointer (or finger) entered a slab.
    pub fn enter(&mut self, id: &TileId, source: PointerSource) -> EnterOutcome {
        let Some(kind) = self.layout.get(id).map(|t| t.kind) else {
            return EnterOutcome::Unchanged;
        };
        match kind {
            TileKind::Real(_) => {
                if self.reveal(id) {
                    if source == PointerSource::Touch {
                        self.click_pending.insert(id.clone());
                    }
                    EnterOutcome::Revealed
                } else {
                    EnterOutcome::Unchanged
                }
            }
            TileKind::Dummy => match self.peek(id) {
                Some(ticket) => EnterOutcome::Peeked(ticket),
                None => EnterOutcome::Unchanged,
            },
        }
    }

    /// Pointer left a slab. Dummies close right away; real slabs stay open.
    pub fn leave(&mut self, id: &TileId) -> Option<TileId> {
        self.unpeek(id)
    }

    /// Click or tap. Real slabs only navigate once they were already uncovered
    /// before this interaction.
    pub fn activate(&mut self, id: &TileId) -> Activation {
        let Some(kind) = self.layout.get(id).map(|t| t.kind) else {
            return Activation::Ignored;
        };
        match kind {
            TileKind::Real(project) => {
                if self.reveal(id) {
                    return Activation::Intercepted;
                }
                if self.click_pending.remove(id) {
                    return Activation::Intercepted;
                }
                Activation::Navigate(project.url)
            }
            TileKind::Dummy => match self.peek(id) {
                Some(ticket) => Activation::Peeked(ticket),
                None => Activation::Ignored,
            },
        }
    }

    /// A new touch gesture began; clicks owed by earlier gestures are stale.
    pub fn begin_touch(&mut self) {
        self.click_pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slabs::SlabRng;

    fn controller() -> RevealController {
        let layout = SlabLayout::standard(12, &mut SlabRng::seeded(5)).unwrap();
        RevealController::new(layout, RevealMode::Flip)
    }

    fn first_dummy(c: &RevealController) -> TileId {
        c.layout()
            .tiles()
            .iter()
            .find(|t| !t.is_real())
            .map(|t| t.id.clone())
            .unwrap()
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(RevealMode::parse("Crumble"), Some(RevealMode::Crumble));
        assert_eq!(RevealMode::parse("flip"), Some(RevealMode::Flip));
        assert_eq!(RevealMode::parse("melt"), None);
        assert_eq!(RevealMode::Crumble.as_str(), "crumble");
    }

    #[test]
    fn test_reveal_ignores_dummies_and_unknown() {
        let mut c = controller();
        let d = first_dummy(&c);
        assert!(!c.reveal(&d));
        assert!(!c.reveal(&TileId::from("nope")));
        assert!(c.revealed().is_empty());
    }

    #[test]
    fn test_peek_on_real_slab_is_refused() {
        let mut c = controller();
        assert!(c.peek(&TileId::from("ghost")).is_none());
        assert!(c.peeking().is_none());
    }

    #[test]
    fn test_leave_other_slab_keeps_peek() {
        let mut c = controller();
        let d = first_dummy(&c);
        c.peek(&d);
        assert_eq!(c.leave(&TileId::from("dummy-999")), None);
        assert_eq!(c.peeking(), Some(&d));
        assert_eq!(c.leave(&d), Some(d.clone()));
        assert!(!c.is_revealed(&d));
    }

    #[test]
    fn test_repeek_same_slab_rearms() {
        let mut c = controller();
        let d = first_dummy(&c);
        let first = c.peek(&d).unwrap();
        let second = c.peek(&d).unwrap();
        assert_eq!(c.expire(&first), None, "older timer must not close a re-armed peek");
        assert_eq!(c.expire(&second), Some(d));
    }

    #[test]
    fn test_mouse_enter_then_click_navigates() {
        let mut c = controller();
        let ghost = TileId::from("ghost");
        assert_eq!(c.enter(&ghost, PointerSource::Mouse), EnterOutcome::Revealed);
        assert_eq!(
            c.activate(&ghost),
            Activation::Navigate("https://ghost-calendar-dev.com")
        );
    }

    #[test]
    fn test_stale_touch_pending_cleared_by_new_gesture() {
        let mut c = controller();
        let ghost = TileId::from("ghost");
        c.enter(&ghost, PointerSource::Touch);
        // Swipe ended without a click; next gesture should not swallow a tap.
        c.begin_touch();
        assert!(matches!(c.activate(&ghost), Activation::Navigate(_)));
    }

    #[test]
    fn test_mode_switch_keeps_state() {
        let mut c = controller();
        let ghost = TileId::from("ghost");
        c.reveal(&ghost);
        c.set_mode(RevealMode::Crumble);
        assert_eq!(c.mode(), RevealMode::Crumble);
        assert!(c.is_revealed(&ghost));
    }
}
