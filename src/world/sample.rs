//! Hand-built demo level.
//!
//! Asset parsing is out of scope for this crate, so the demo binary and
//! the tests walk this small two-room map instead: one-sided outer
//! walls, a height-stepped corridor, a secret closet, a teleporter pad
//! and a handful of things.

use smallvec::smallvec;

use crate::units::{ANG90, ANG180, Angle, Fixed, MapPoint};
use crate::world::geometry::{
    Level, Linedef, LinedefFlags, Sector, Thing, ThingFlags, Vertex, special,
};

pub const FLAT_FLOOR: u16 = 0;
pub const FLAT_GATE: u16 = 1;

/// Where the demo player begins.
pub const PLAYER_START: MapPoint = MapPoint::from_ints(256, 256);

const WEST: u16 = 0;
const EAST: u16 = 1;
const CORRIDOR: u16 = 2;
const CLOSET: u16 = 3;
const PAD: u16 = 4;

pub fn sample_level() -> Level {
    let verts: &[(i32, i32)] = &[
        // west room
        (0, 0),      // 0
        (512, 0),    // 1
        (512, 192),  // 2
        (512, 320),  // 3
        (512, 512),  // 4
        (0, 512),    // 5
        // corridor mouth, east side
        (768, 192), // 6
        (768, 320), // 7
        // east room
        (768, 0),    // 8
        (1280, 0),   // 9
        (1280, 512), // 10
        (768, 512),  // 11
        // secret closet over the west room
        (128, 512), // 12
        (128, 640), // 13
        (256, 640), // 14
        (256, 512), // 15
        // teleporter pad inside the east room
        (960, 192),  // 16
        (960, 320),  // 17
        (1088, 320), // 18
        (1088, 192), // 19
    ];

    let vertices = verts
        .iter()
        .map(|&(x, y)| Vertex {
            pos: MapPoint::from_ints(x, y),
        })
        .collect();

    let solid = |v1: u16, v2: u16, front: u16| Linedef {
        v1,
        v2,
        flags: LinedefFlags::IMPASSABLE,
        special: 0,
        tag: 0,
        front_sector: front,
        back_sector: None,
    };
    let portal = |v1: u16, v2: u16, front: u16, back: u16| Linedef {
        v1,
        v2,
        flags: LinedefFlags::TWO_SIDED,
        special: 0,
        tag: 0,
        front_sector: front,
        back_sector: Some(back),
    };

    let mut linedefs = vec![
        // west room shell
        solid(0, 1, WEST),
        solid(1, 2, WEST),
        portal(2, 3, WEST, CORRIDOR), // corridor mouth
        solid(3, 4, WEST),
        solid(5, 0, WEST),
        solid(4, 15, WEST),
        solid(12, 5, WEST),
        // secret closet
        portal(15, 12, WEST, CLOSET),
        solid(12, 13, CLOSET),
        solid(13, 14, CLOSET),
        solid(14, 15, CLOSET),
        // corridor walls
        solid(2, 6, CORRIDOR),
        solid(7, 3, CORRIDOR),
        portal(6, 7, CORRIDOR, EAST), // step up into the east room
        // east room shell
        solid(8, 9, EAST),
        solid(9, 10, EAST),
        solid(10, 11, EAST),
        solid(11, 7, EAST),
        solid(6, 8, EAST),
        // teleporter pad
        portal(16, 17, EAST, PAD),
        portal(17, 18, EAST, PAD),
        portal(18, 19, EAST, PAD),
        portal(19, 16, EAST, PAD),
    ];

    // the closet entrance hides as part of the wall
    linedefs[7].flags |= LinedefFlags::SECRET;
    // west edge of the pad is a repeatable walk-over teleporter
    linedefs[19].special = special::WR_TELEPORT;
    linedefs[19].tag = 1;

    // the player has already wandered the west room and corridor
    for ld in linedefs.iter_mut() {
        if ld.front_sector == WEST || ld.front_sector == CORRIDOR {
            ld.flags |= LinedefFlags::ALREADY_ON_MAP;
        }
    }

    let sectors = vec![
        Sector {
            floor_h: Fixed::ZERO,
            ceil_h: Fixed::from_int(128),
            floor_flat: FLAT_FLOOR,
            things: vec![1, 3],
        },
        Sector {
            floor_h: Fixed::from_int(32),
            ceil_h: Fixed::from_int(128),
            floor_flat: FLAT_FLOOR,
            things: vec![0, 4],
        },
        Sector {
            floor_h: Fixed::ZERO,
            ceil_h: Fixed::from_int(96),
            floor_flat: FLAT_FLOOR,
            things: vec![2],
        },
        Sector {
            floor_h: Fixed::ZERO,
            ceil_h: Fixed::from_int(128),
            floor_flat: FLAT_FLOOR,
            things: Vec::new(),
        },
        Sector {
            floor_h: Fixed::from_int(32),
            ceil_h: Fixed::from_int(128),
            floor_flat: FLAT_GATE,
            things: Vec::new(),
        },
    ];

    let monster = |x: i32, y: i32, angle: Angle, flags: ThingFlags| Thing {
        pos: MapPoint::from_ints(x, y),
        angle,
        flags,
        sprite_w: Fixed::from_int(41),
        sprite_h: Fixed::from_int(57),
    };

    let things = vec![
        monster(1100, 400, ANG180, ThingFlags::COUNTKILL),
        monster(200, 96, ANG90, ThingFlags::COUNTKILL | ThingFlags::CORPSE),
        // barrel in the corridor
        Thing {
            pos: MapPoint::from_ints(600, 230),
            angle: Angle::ZERO,
            flags: ThingFlags::empty(),
            sprite_w: Fixed::from_int(23),
            sprite_h: Fixed::from_int(32),
        },
        // blood splat, invisible on the automap
        Thing {
            pos: MapPoint::from_ints(220, 110),
            angle: Angle::ZERO,
            flags: ThingFlags::NOT_ON_AUTOMAP,
            sprite_w: Fixed::from_int(12),
            sprite_h: Fixed::from_int(4),
        },
        monster(900, 96, ANG90, ThingFlags::COUNTKILL),
    ];

    Level {
        name: "SAMPLE1".into(),
        id: 1,
        vertices,
        linedefs,
        sectors,
        things,
        blockmap_origin: MapPoint::ZERO,
        teleport_flats: smallvec![FLAT_GATE],
    }
}

/// Flag every line with an endpoint within `radius` of `pos` as seen.
/// Stands in for the play simulation that normally marks walls.
pub fn reveal_around(level: &mut Level, pos: MapPoint, radius: Fixed) {
    let r2 = radius.to_f64() * radius.to_f64();
    for i in 0..level.linedefs.len() {
        let (v1, v2) = (level.linedefs[i].v1, level.linedefs[i].v2);
        let near = [v1, v2].iter().any(|&v| {
            let d = level.vertices[v as usize].pos - pos;
            d.x.to_f64() * d.x.to_f64() + d.y.to_f64() * d.y.to_f64() <= r2
        });
        if near {
            level.linedefs[i].flags |= LinedefFlags::ALREADY_ON_MAP;
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_level_is_consistent() {
        let level = sample_level();
        level.validate().expect("sample level must validate");
        assert!(level.is_teleport_flat(FLAT_GATE));
        assert!(!level.is_teleport_flat(FLAT_FLOOR));
    }

    #[test]
    fn reveal_marks_nearby_lines_only() {
        let mut level = sample_level();
        for ld in level.linedefs.iter_mut() {
            ld.flags &= !LinedefFlags::ALREADY_ON_MAP;
        }
        reveal_around(&mut level, MapPoint::from_ints(0, 0), Fixed::from_int(100));
        let seen = level
            .linedefs
            .iter()
            .filter(|l| l.flags.contains(LinedefFlags::ALREADY_ON_MAP))
            .count();
        assert!(seen > 0);
        assert!(seen < level.linedefs.len());
    }
}
