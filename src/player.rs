use bitflags::bitflags;

use crate::units::{Angle, MapPoint};

bitflags! {
    /// Cheat bits the automap reads.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Cheats: u32 {
        /// Reveal all walls.
        const ALLMAP        = 0x0001;
        /// Reveal all walls and things.
        const ALLMAP_THINGS = 0x0002;
    }
}

/// Read-only view of the tracked player, refreshed by the embedding
/// game once per tick. The automap never writes through it.
#[derive(Clone, Copy, Debug)]
pub struct Player {
    pub pos: MapPoint,
    pub angle: Angle,
    pub health: i32,
    /// Remaining tics of the all-map power (0 = inactive).
    pub allmap: i32,
    /// Remaining tics of invisibility (0 = inactive).
    pub invisibility: i32,
    pub cheats: Cheats,
}

impl Player {
    #[inline]
    pub fn cheating(&self) -> bool {
        self.cheats
            .intersects(Cheats::ALLMAP | Cheats::ALLMAP_THINGS)
    }

    #[inline]
    pub fn has_allmap(&self) -> bool {
        self.allmap > 0
    }

    /// Duty-cycled shimmer while invisibility runs out: solid flicker
    /// kicks in below 128 remaining tics.
    #[inline]
    pub fn shadow_flicker(&self) -> bool {
        self.invisibility > 128 || self.invisibility & 8 != 0
    }
}

impl Default for Player {
    fn default() -> Self {
        Player {
            pos: MapPoint::ZERO,
            angle: Angle::ZERO,
            health: 100,
            allmap: 0,
            invisibility: 0,
            cheats: Cheats::empty(),
        }
    }
}

/// Receiver for the automap's short status texts ("Follow Mode ON",
/// "Marked Spot 3", ...). Fire-and-forget; the HUD decides presentation.
pub trait Notifier {
    fn message(&mut self, text: String);
}

/// Swallows every message; handy for tests and headless use.
#[derive(Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn message(&mut self, _text: String) {}
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
