//! Slab descriptors and layout generation.
//!
//! A layout is a flat, row-major list of slabs. Every slot starts as a dummy slab
//! with a random decoy glyph; the real project slabs are then dropped onto distinct
//! dummy slots by rejection sampling random indices.

use std::fmt;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::LayoutError;

mod projects;

pub use projects::{DUMMY_GLYPHS, PROJECTS};

/// Stable identifier of a slab, also written to the DOM as `data-slab-id`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(String);

impl TileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn dummy(index: usize) -> Self {
        Self(format!("dummy-{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TileId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A linked project hidden behind one real slab.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Project {
    pub id: &'static str,
    pub name: &'static str,
    pub glyph: &'static str,
    /// Image shown in the chamber once the slab is uncovered.
    pub banner: &'static str,
    pub url: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileKind {
    Real(&'static Project),
    Dummy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    pub glyph: &'static str,
    pub mirrored: bool,
    pub opacity: f32,
}

impl Tile {
    pub fn is_real(&self) -> bool {
        matches!(self.kind, TileKind::Real(_))
    }

    pub fn target_url(&self) -> Option<&'static str> {
        match self.kind {
            TileKind::Real(p) => Some(p.url),
            TileKind::Dummy => None,
        }
    }
}

const REAL_OPACITY: f32 = 0.9;

// --- Randomness ---------------------------------------------------------------

/// Source of random indices for layout generation. Tests script it to force
/// placement collisions.
pub trait IndexSource {
    /// Uniform index in `0..len`. `len == 0` returns 0.
    fn next_index(&mut self, len: usize) -> usize;

    /// Uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64 {
        const SCALE: usize = 1 << 24;
        self.next_index(SCALE) as f64 / SCALE as f64
    }
}

/// Seedable layout RNG backed by `rand`'s `SmallRng`.
#[derive(Clone, Debug)]
pub struct SlabRng {
    inner: SmallRng,
}

impl SlabRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seed from getrandom when the `rng` feature is on, otherwise from the clock.
    pub fn from_entropy() -> Self {
        #[cfg(feature = "rng")]
        {
            let mut buf = [0u8; 8];
            if getrandom::getrandom(&mut buf).is_ok() {
                return Self::seeded(u64::from_le_bytes(buf));
            }
        }
        Self::seeded(clock_seed())
    }
}

impl IndexSource for SlabRng {
    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.inner.gen_range(0..len)
    }

    fn next_unit(&mut self) -> f64 {
        self.inner.gen_range(0.0..1.0)
    }
}

#[cfg(target_arch = "wasm32")]
fn clock_seed() -> u64 {
    let now = web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0);
    (now * 1_000.0) as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

// --- Layout -------------------------------------------------------------------

/// Generated wall of slabs (row-major).
#[derive(Clone, Debug)]
pub struct SlabLayout {
    tiles: Vec<Tile>,
}

impl SlabLayout {
    /// Fill `total` slots with dummies, then place every project on a distinct slot.
    pub fn generate(
        total: usize,
        projects: &'static [Project],
        dummy_glyphs: &'static [&'static str],
        rng: &mut impl IndexSource,
    ) -> Result<Self, LayoutError> {
        if projects.len() > total {
            return Err(LayoutError::TooManyProjects {
                projects: projects.len(),
                slots: total,
            });
        }
        if dummy_glyphs.is_empty() {
            return Err(LayoutError::NoDummyGlyphs);
        }

        let mut tiles: Vec<Tile> = (0..total)
            .map(|i| Tile {
                id: TileId::dummy(i),
                kind: TileKind::Dummy,
                glyph: dummy_glyphs[rng.next_index(dummy_glyphs.len())],
                mirrored: rng.next_unit() < 0.5,
                opacity: (0.6 + rng.next_unit() * 0.4) as f32,
            })
            .collect();

        for project in projects {
            // Terminates: there are at least as many slots as projects.
            let slot = loop {
                let idx = rng.next_index(total);
                if !tiles[idx].is_real() {
                    break idx;
                }
            };
            tiles[slot] = Tile {
                id: TileId::new(project.id),
                kind: TileKind::Real(project),
                glyph: project.glyph,
                mirrored: false,
                opacity: REAL_OPACITY,
            };
        }

        Ok(Self { tiles })
    }

    /// Default wall: the bundled projects and decoy glyphs.
    pub fn standard(total: usize, rng: &mut impl IndexSource) -> Result<Self, LayoutError> {
        Self::generate(total, PROJECTS, DUMMY_GLYPHS, rng)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, id: &TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| &t.id == id)
    }

    pub fn position(&self, id: &TileId) -> Option<usize> {
        self.tiles.iter().position(|t| &t.id == id)
    }

    pub fn real_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.is_real())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Replays a fixed index script (modulo `len`), then falls back to counting up.
    struct Scripted {
        script: Vec<usize>,
        pos: usize,
        fallback: usize,
    }

    impl Scripted {
        fn new(script: &[usize]) -> Self {
            Self {
                script: script.to_vec(),
                pos: 0,
                fallback: 0,
            }
        }
    }

    impl IndexSource for Scripted {
        fn next_index(&mut self, len: usize) -> usize {
            if len == 0 {
                return 0;
            }
            let v = if self.pos < self.script.len() {
                self.script[self.pos]
            } else {
                self.fallback += 1;
                self.fallback
            };
            self.pos += 1;
            v % len
        }

        fn next_unit(&mut self) -> f64 {
            0.25
        }
    }

    #[test]
    fn test_dummy_ids_follow_slot_index() {
        let mut rng = SlabRng::seeded(7);
        let layout = SlabLayout::generate(6, &[], DUMMY_GLYPHS, &mut rng).unwrap();
        let ids: Vec<&str> = layout.tiles().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["dummy-0", "dummy-1", "dummy-2", "dummy-3", "dummy-4", "dummy-5"]);
    }

    #[test]
    fn test_rejection_sampling_skips_taken_slots() {
        // One glyph draw per slot, then placement: ghost 2; peach 2, 2 (taken), 0; hand 3.
        let mut rng = Scripted::new(&[0, 0, 0, 0, 2, 2, 2, 0, 3]);
        let layout = SlabLayout::generate(4, PROJECTS, DUMMY_GLYPHS, &mut rng).unwrap();
        assert_eq!(layout.tiles()[2].id.as_str(), "ghost");
        assert_eq!(layout.tiles()[0].id.as_str(), "peach");
        assert_eq!(layout.tiles()[3].id.as_str(), "hand");
        assert_eq!(layout.tiles()[1].id.as_str(), "dummy-1");
    }

    #[test]
    fn test_decor_drawn_from_rng() {
        let mut rng = Scripted::new(&[]);
        let layout = SlabLayout::generate(3, &[], DUMMY_GLYPHS, &mut rng).unwrap();
        for t in layout.tiles() {
            assert!(t.mirrored, "unit 0.25 < 0.5 mirrors");
            assert!((t.opacity - 0.7).abs() < 1e-6);
        }
    }

    #[test]
    fn test_real_slabs_are_not_mirrored() {
        let mut rng = SlabRng::seeded(99);
        let layout = SlabLayout::standard(48, &mut rng).unwrap();
        for t in layout.real_tiles() {
            assert!(!t.mirrored);
            assert_eq!(t.opacity, REAL_OPACITY);
            assert!(t.target_url().is_some());
        }
    }

    #[test]
    fn test_all_slots_real_when_counts_match() {
        let mut rng = SlabRng::seeded(3);
        let layout = SlabLayout::standard(PROJECTS.len(), &mut rng).unwrap();
        let ids: HashSet<&str> = layout.tiles().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), PROJECTS.len());
        assert!(layout.tiles().iter().all(Tile::is_real));
    }

    #[test]
    fn test_too_many_projects_is_rejected() {
        let mut rng = SlabRng::seeded(1);
        let err = SlabLayout::standard(2, &mut rng).unwrap_err();
        assert_eq!(
            err,
            LayoutError::TooManyProjects {
                projects: 3,
                slots: 2
            }
        );
    }

    #[test]
    fn test_empty_glyphs_is_rejected() {
        let mut rng = SlabRng::seeded(1);
        let err = SlabLayout::generate(10, PROJECTS, &[], &mut rng).unwrap_err();
        assert_eq!(err, LayoutError::NoDummyGlyphs);
    }

    #[test]
    fn test_rng_index_in_range() {
        let mut rng = SlabRng::seeded(0);
        for len in 1..64 {
            assert!(rng.next_index(len) < len);
            let u = rng.next_unit();
            assert!((0.0..1.0).contains(&u));
        }
        assert_eq!(rng.next_index(0), 0);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let a = SlabLayout::standard(48, &mut SlabRng::seeded(42)).unwrap();
        let b = SlabLayout::standard(48, &mut SlabRng::seeded(42)).unwrap();
        let pa: Vec<usize> = a.real_tiles().filter_map(|t| a.position(&t.id)).collect();
        let pb: Vec<usize> = b.real_tiles().filter_map(|t| b.position(&t.id)).collect();
        assert_eq!(pa, pb);
    }
}
