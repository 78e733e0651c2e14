//! Immutable vector glyphs and digit bitmaps.
//!
//! Arrow and triangle coordinates are 16.16 fixed point in glyph-local
//! space, sized so an unscaled glyph spans roughly a player radius.

use once_cell::sync::Lazy;

use crate::units::{Fixed, MapLine, MapPoint};

const fn ml(ax: i32, ay: i32, bx: i32, by: i32) -> MapLine {
    MapLine {
        a: MapPoint::new(Fixed(ax), Fixed(ay)),
        b: MapPoint::new(Fixed(bx), Fixed(by)),
    }
}

/// Player pointing right, drawn from the middle.
pub static PLAYER_ARROW: [MapLine; 8] = [
    ml(-973678, 0, -674085, 0), //  -
    ml(-674085, 0, 1273270, 0), //  -------
    ml(1273270, 0, 674084, 299593), //  ------>
    ml(1273270, 0, 674084, -299593),
    ml(-973678, 0, -1273271, 299593), // >------>
    ml(-973678, 0, -1273271, -299593),
    ml(-674085, 0, -973678, 299593), // >>----->
    ml(-674085, 0, -973678, -299593),
];

/// Player arrow with direction ticks, shown while map cheats are on.
pub static CHEAT_PLAYER_ARROW: [MapLine; 19] = [
    ml(-973678, 0, -674085, 0), //  -
    ml(-674085, 0, -524288, 0), //  --
    ml(-524288, 0, -124831, 0), //  ---
    ml(-124831, 0, 1273270, 0), //  -------
    ml(1273270, 0, 674084, 199729), //  ------>
    ml(1273270, 0, 674084, -199729),
    ml(-973678, 0, -1273271, 199729), // >------>
    ml(-973678, 0, -1273271, -199729),
    ml(-674085, 0, -973678, 199729), // >>----->
    ml(-674085, 0, -973678, -199729),
    ml(-524288, 0, -524288, -199729), // >>-d--->
    ml(-524288, -199729, -324559, -199729),
    ml(-324559, -199729, -324559, 299593),
    ml(-124831, 0, -124831, -199729), // >>-dd-->
    ml(-124831, -199729, 74898, -199729),
    ml(74898, -199729, 74898, 299593),
    ml(274627, 299593, 274627, -171196), // >>-ddt->
    ml(274627, -171196, 312076, -208645),
    ml(312076, -208645, 394464, -171196),
];

pub static THING_TRIANGLE: [MapLine; 3] = [
    ml(-32768, -45875, 65536, 0),
    ml(65536, 0, -32768, 45875),
    ml(-32768, 45875, -32768, -45875),
];

/*--------------------------- mark digits ----------------------------*/

pub const MARK_WIDTH: usize = 8;
pub const MARK_HEIGHT: usize = 12;

/// Digit cell: 0 = off, 1 = translucent halo, 2 = solid core.
const MARK_ROWS: [&str; 10] = [
    "011111101122221112222221122112211221122112211221\
     122112211221122112211221122222211122221101111110",
    "001111000112210011222100122221001112210000122100\
     001221000012210000122100001221000012210000111100",
    "111111101222221112222221111112210111122111222221\
     122222111221111012211111122222211222222111111111",
    "111111101222221112222221111112210111122101222221\
     012222210111122111111221122222211222221111111110",
    "111111111221122112211221122112211221122112222221\
     122222211111122100001221000012210000122100001111",
    "111111111222222112222221122111111221111012222211\
     122222211111122111111221122222211222221111111110",
    "011111101122221012222210122111101221111012222211\
     122222211221122112211221122222211122221101111110",
    "111111111222222112222221111112210011222101122211\
     012221100122110001221000012210000122100001111000",
    "011111101122221112222221122112211221122111222211\
     122222211221122112211221122222211122221101111110",
    "011111101122221112222221122112211221122112222221\
     112222210111122101111221012222210122221101111110",
];

/// Digit bitmaps decoded once at first use.
pub static MARK_DIGITS: Lazy<[[u8; MARK_WIDTH * MARK_HEIGHT]; 10]> = Lazy::new(|| {
    let mut digits = [[0u8; MARK_WIDTH * MARK_HEIGHT]; 10];
    for (digit, rows) in MARK_ROWS.iter().enumerate() {
        for (i, ch) in rows.bytes().enumerate() {
            digits[digit][i] = ch - b'0';
        }
    }
    digits
});

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_bitmaps_decode() {
        for d in 0..10 {
            assert!(MARK_DIGITS[d].iter().all(|&c| c <= 2), "digit {d}");
            assert!(MARK_DIGITS[d].iter().any(|&c| c == 2), "digit {d} has a core");
        }
        // "1" is narrower than "8": fewer lit cells
        let lit = |d: usize| MARK_DIGITS[d].iter().filter(|&&c| c != 0).count();
        assert!(lit(1) < lit(8));
    }

    #[test]
    fn arrows_point_right() {
        let nose = PLAYER_ARROW
            .iter()
            .flat_map(|l| [l.a, l.b])
            .max_by_key(|p| p.x.0)
            .unwrap();
        assert!(nose.x.0 > 0 && nose.y.0 == 0);
        let cheat_nose = CHEAT_PLAYER_ARROW
            .iter()
            .flat_map(|l| [l.a, l.b])
            .max_by_key(|p| p.x.0)
            .unwrap();
        assert_eq!(nose.x, cheat_nose.x);
    }
}
