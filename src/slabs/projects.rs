// Project and decoy glyph data.
// Real slabs point at these projects; every other slab draws a decoy glyph.
use super::Project;

pub const PROJECTS: &[Project] = &[
    Project {
        id: "ghost",
        name: "GHOST-CALENDAR",
        glyph: "/images/glyph-ghost.jpg?v=3",
        banner: "https://placehold.co/600x200/000000/FFF?text=GHOST+GIF",
        url: "https://ghost-calendar-dev.com",
    },
    Project {
        id: "peach",
        name: "TWIN PEACH",
        glyph: "/images/glyph-peach.jpg?v=3",
        banner: "/images/banner-peach.gif?v=3",
        url: "https://twin-peach-dev.com",
    },
    Project {
        id: "hand",
        name: "Hand to Hand",
        glyph: "/images/glyph-hand.jpg?v=3",
        banner: "https://placehold.co/600x200/333333/FFF?text=Hand+to+Hand+GIF",
        url: "https://hand-to-hand-dev.com",
    },
];

// Decoys reuse the project glyphs so a covered slab gives nothing away.
pub const DUMMY_GLYPHS: &[&str] = &[
    "/images/glyph-ghost.jpg?v=3",
    "/images/glyph-peach.jpg?v=3",
    "/images/glyph-hand.jpg?v=3",
];
