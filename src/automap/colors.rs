//! Color slots and the precomputed compositing tables.
//!
//! Overlapping strokes never simply overwrite: every opaque write goes
//! through a 256x256 priority table so the final pixel is the
//! highest-priority color no matter what order features are drawn in.

use crate::render::Palette;

/* base palette indices */
pub const BLACK: u8 = 0;
pub const WHITE: u8 = 4;
pub const DARKGRAY: u8 = 5;
pub const BROWN: u8 = 64;
pub const GRAY: u8 = 96;
pub const GREEN: u8 = 112;
pub const YELLOW: u8 = 160;
pub const RED: u8 = 176;
pub const PINK: u8 = 251;

/* automap feature slots */
pub const CROSSHAIR: u8 = WHITE;
pub const MARK: u8 = GRAY + 4;
pub const PLAYER: u8 = WHITE;
pub const THING: u8 = GREEN;
pub const WALL: u8 = RED;
pub const ALLMAP_WALL: u8 = GRAY + 12;
pub const MASK: u8 = PINK;
pub const TELEPORTER: u8 = RED + 8;
pub const FD_WALL: u8 = BROWN;
pub const ALLMAP_FD_WALL: u8 = GRAY + 14;
pub const CD_WALL: u8 = YELLOW;
pub const ALLMAP_CD_WALL: u8 = GRAY + 10;
pub const TS_WALL: u8 = GRAY + 8;
pub const GRID: u8 = DARKGRAY;
pub const BACKGROUND: u8 = BLACK;

/// (slot, priority) - a strict order, higher wins.
const PRIORITIES: [(u8, u8); 12] = [
    (PLAYER, 12),
    (THING, 11),
    (WALL, 10),
    (ALLMAP_WALL, 9),
    (MASK, 8),
    (CD_WALL, 7),
    (ALLMAP_CD_WALL, 6),
    (FD_WALL, 5),
    (ALLMAP_FD_WALL, 4),
    (TELEPORTER, 3),
    (TS_WALL, 2),
    (GRID, 1),
];

/// Rings of the edge vignette, outermost first.
pub const DARK_LEVELS: usize = 6;

/// All compositing tables, built once at startup from the palette and
/// immutable afterwards; shared by reference with the drawer.
pub struct ColorTables {
    priority: Box<[[u8; 256]; 256]>,
    reveal: [u8; 256],
    tint60: Box<[[u8; 256]; 256]>,
    tint80: Box<[[u8; 256]; 256]>,
    dark: Box<[[u8; 256]; DARK_LEVELS]>,
}

impl ColorTables {
    pub fn build(palette: &Palette) -> ColorTables {
        let mut prio = [0u8; 256];
        for (slot, p) in PRIORITIES {
            prio[slot as usize] = p;
        }

        let mut priority = Box::new([[0u8; 256]; 256]);
        for a in 0..256usize {
            for b in 0..256usize {
                priority[a][b] = if prio[a] > prio[b] { a as u8 } else { b as u8 };
            }
        }

        let mut reveal = [0u8; 256];
        for (i, slot) in reveal.iter_mut().enumerate() {
            *slot = i as u8;
        }
        reveal[MASK as usize] = BACKGROUND;

        // 5-bit RGB cube of nearest palette indices; keeps the O(256)
        // nearest search out of the 64k blend-table loops below.
        let mut cube = vec![0u8; 1 << 15].into_boxed_slice();
        for (i, slot) in cube.iter_mut().enumerate() {
            let r = ((i >> 10) & 31) as u8;
            let g = ((i >> 5) & 31) as u8;
            let b = (i & 31) as u8;
            *slot = palette.nearest(r << 3 | r >> 2, g << 3 | g >> 2, b << 3 | b >> 2);
        }
        let quantize = |r: u32, g: u32, b: u32| -> u8 {
            cube[(((r >> 3) << 10) | ((g >> 3) << 5) | (b >> 3)) as usize]
        };

        let blend_table = |alpha: u32| -> Box<[[u8; 256]; 256]> {
            let mut t = Box::new([[0u8; 256]; 256]);
            for a in 0..256usize {
                let (ar, ag, ab) = palette.rgb(a as u8);
                for b in 0..256usize {
                    let (br, bg, bb) = palette.rgb(b as u8);
                    let mix = |x: u8, y: u8| -> u32 {
                        (x as u32 * (256 - alpha) + y as u32 * alpha) >> 8
                    };
                    t[a][b] = quantize(mix(ar, br), mix(ag, bg), mix(ab, bb));
                }
            }
            t
        };

        let mut dark = Box::new([[0u8; 256]; DARK_LEVELS]);
        for (ring, table) in dark.iter_mut().enumerate() {
            let f = (8 + 4 * ring as u32).min(32);
            for (i, slot) in table.iter_mut().enumerate() {
                let (r, g, b) = palette.rgb(i as u8);
                *slot = quantize(r as u32 * f / 32, g as u32 * f / 32, b as u32 * f / 32);
            }
        }

        ColorTables {
            priority,
            reveal,
            tint60: blend_table(153), // ~60 %
            tint80: blend_table(204), // ~80 %
            dark,
        }
    }

    /// Composite `color` over `dest`: the higher-priority index wins.
    #[inline]
    pub fn over(&self, dest: u8, color: u8) -> u8 {
        self.priority[color as usize][dest as usize]
    }

    /// 60 % blend of `b` over `a`, as a palette index.
    #[inline]
    pub fn tint60(&self, a: u8, b: u8) -> u8 {
        self.tint60[a as usize][b as usize]
    }

    /// 80 % blend of `b` over `a`, as a palette index.
    #[inline]
    pub fn tint80(&self, a: u8, b: u8) -> u8 {
        self.tint80[a as usize][b as usize]
    }

    /// Remap for the undiscovered-geometry pass: mask color becomes
    /// background, everything else is untouched.
    #[inline]
    pub fn reveal(&self, c: u8) -> u8 {
        self.reveal[c as usize]
    }

    /// Vignette shade for edge ring `ring` (0 = outermost, darkest).
    #[inline]
    pub fn darken(&self, ring: usize, c: u8) -> u8 {
        self.dark[ring][c as usize]
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
