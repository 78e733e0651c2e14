use bitflags::bitflags;
use smallvec::SmallVec;
use thiserror::Error;

use crate::units::{Angle, Fixed, MapPoint};

pub type VertexId = u16;
pub type LinedefId = u16;
pub type SectorId = u16;
pub type ThingId = u16;

/// Opaque handle for a floor flat; the automap only compares it against
/// the level's teleporter-pad set.
pub type FlatId = u16;

/// Runtime snapshot of one map (immutable after load).
///
/// Only the read-only slice of the level the automap consumes: vertex
/// positions, linedefs with flags, sector height data with per-sector
/// thing lists. Loading/decoding this from assets is someone else's job.
#[derive(Debug)]
pub struct Level {
    pub name: String,
    /// Identity used to detect re-entry into the same level.
    pub id: u32,
    pub vertices: Vec<Vertex>,
    pub linedefs: Vec<Linedef>,
    pub sectors: Vec<Sector>,
    pub things: Vec<Thing>,
    /// Grid alignment origin (the blockmap origin in the original data).
    pub blockmap_origin: MapPoint,
    /// Floor flats that read as teleporter pads.
    pub teleport_flats: SmallVec<[FlatId; 4]>,
}

/*--------------------------- linedefs -------------------------------*/

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LinedefFlags: u16 {
        const IMPASSABLE         = 0x0001;
        const BLOCK_MONSTERS     = 0x0002;
        const TWO_SIDED          = 0x0004;
        const UPPER_UNPEGGED     = 0x0010;
        const LOWER_UNPEGGED     = 0x0020;
        const SECRET             = 0x0040;
        const BLOCK_SOUND        = 0x0080;
        const NOT_ON_MAP         = 0x0200;
        const TELEPORT_TRIGGERED = 0x0800;
        const ALREADY_ON_MAP     = 0x1000;
    }
}

/// Line specials the automap cares about: walk-over teleporters and
/// level exits, which all route the player somewhere else.
pub mod special {
    pub const W1_TELEPORT: u16 = 39;
    pub const W1_EXIT_LEVEL: u16 = 52;
    pub const WR_TELEPORT: u16 = 97;
    pub const W1_SECRET_EXIT: u16 = 124;
    pub const M1_TELEPORT: u16 = 125;
    pub const MR_TELEPORT: u16 = 126;
}

#[derive(Clone, Debug)]
pub struct Linedef {
    pub v1: VertexId,
    pub v2: VertexId,
    pub flags: LinedefFlags,
    pub special: u16,
    pub tag: u16,
    pub front_sector: SectorId,
    pub back_sector: Option<SectorId>,
}

impl Linedef {
    /// Does this line teleport or exit when crossed?
    #[inline]
    pub fn routes_elsewhere(&self) -> bool {
        matches!(
            self.special,
            special::W1_TELEPORT | special::W1_EXIT_LEVEL | special::WR_TELEPORT
        ) || (special::W1_SECRET_EXIT..=special::MR_TELEPORT).contains(&self.special)
    }
}

/*----------------------- simple primitives --------------------------*/

#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub pos: MapPoint,
}

#[derive(Clone, Debug)]
pub struct Sector {
    pub floor_h: Fixed,
    pub ceil_h: Fixed,
    pub floor_flat: FlatId,
    /// Things currently standing in this sector.
    pub things: Vec<ThingId>,
}

/*--------------------------- game objects ---------------------------*/

bitflags! {
    /// Subset of the runtime mobj flags the automap reads.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ThingFlags: u32 {
        const CORPSE         = 0x0010_0000;
        const COUNTKILL      = 0x0040_0000;
        /// Never drawn on the automap (players, blood splats).
        const NOT_ON_AUTOMAP = 0x1000_0000;
    }
}

#[derive(Clone, Debug)]
pub struct Thing {
    pub pos: MapPoint,
    pub angle: Angle,
    pub flags: ThingFlags,
    pub sprite_w: Fixed,
    pub sprite_h: Fixed,
}

impl Thing {
    /// A live enemy: counts toward the kill total and is not a corpse.
    #[inline]
    pub fn is_enemy(&self) -> bool {
        self.flags & (ThingFlags::COUNTKILL | ThingFlags::CORPSE) == ThingFlags::COUNTKILL
    }
}

/*--------------------------- validation -----------------------------*/

/// Things that can be wrong with collaborator-provided level data.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LevelError {
    #[error("level `{0}` has no vertices")]
    NoVertices(String),

    #[error("linedef {line} references missing vertex {vertex}")]
    BadVertexRef { line: usize, vertex: VertexId },

    #[error("linedef {line} references missing sector {sector}")]
    BadSectorRef { line: usize, sector: SectorId },

    #[error("sector {sector} references missing thing {thing}")]
    BadThingRef { sector: usize, thing: ThingId },
}

impl Level {
    /// Sanity-check internal references once at hand-over; afterwards the
    /// automap indexes without re-checking.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.vertices.is_empty() {
            return Err(LevelError::NoVertices(self.name.clone()));
        }
        for (i, ld) in self.linedefs.iter().enumerate() {
            for v in [ld.v1, ld.v2] {
                if v as usize >= self.vertices.len() {
                    return Err(LevelError::BadVertexRef { line: i, vertex: v });
                }
            }
            for s in std::iter::once(ld.front_sector).chain(ld.back_sector) {
                if s as usize >= self.sectors.len() {
                    return Err(LevelError::BadSectorRef { line: i, sector: s });
                }
            }
        }
        for (i, sec) in self.sectors.iter().enumerate() {
            for &t in &sec.things {
                if t as usize >= self.things.len() {
                    return Err(LevelError::BadThingRef { sector: i, thing: t });
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn is_teleport_flat(&self, flat: FlatId) -> bool {
        self.teleport_flats.contains(&flat)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn empty_level() -> Level {
        Level {
            name: "EMPTY".into(),
            id: 0,
            vertices: Vec::new(),
            linedefs: Vec::new(),
            sectors: Vec::new(),
            things: Vec::new(),
            blockmap_origin: MapPoint::ZERO,
            teleport_flats: SmallVec::new(),
        }
    }

    #[test]
    fn validate_rejects_empty_vertex_set() {
        assert_eq!(
            empty_level().validate(),
            Err(LevelError::NoVertices("EMPTY".into()))
        );
    }

    #[test]
    fn validate_catches_dangling_vertex() {
        let mut level = empty_level();
        level.vertices.push(Vertex {
            pos: MapPoint::ZERO,
        });
        level.sectors.push(Sector {
            floor_h: Fixed::ZERO,
            ceil_h: Fixed::from_int(128),
            floor_flat: 0,
            things: Vec::new(),
        });
        level.linedefs.push(Linedef {
            v1: 0,
            v2: 9,
            flags: LinedefFlags::empty(),
            special: 0,
            tag: 0,
            front_sector: 0,
            back_sector: None,
        });
        assert_eq!(
            level.validate(),
            Err(LevelError::BadVertexRef { line: 0, vertex: 9 })
        );
    }

    #[test]
    fn teleport_specials() {
        let mut ld = Linedef {
            v1: 0,
            v2: 1,
            flags: LinedefFlags::empty(),
            special: 0,
            tag: 0,
            front_sector: 0,
            back_sector: None,
        };
        assert!(!ld.routes_elsewhere());
        for s in [39, 52, 97, 124, 125, 126] {
            ld.special = s;
            assert!(ld.routes_elsewhere(), "special {s}");
        }
        ld.special = 1; // ordinary door
        assert!(!ld.routes_elsewhere());
    }

    #[test]
    fn enemy_classification() {
        let mut t = Thing {
            pos: MapPoint::ZERO,
            angle: Angle::ZERO,
            flags: ThingFlags::COUNTKILL,
            sprite_w: Fixed::from_int(40),
            sprite_h: Fixed::from_int(56),
        };
        assert!(t.is_enemy());
        t.flags |= ThingFlags::CORPSE;
        assert!(!t.is_enemy(), "corpses are no longer enemies");
        t.flags = ThingFlags::empty();
        assert!(!t.is_enemy());
    }
}
