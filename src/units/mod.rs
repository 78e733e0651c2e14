//! Map-space units: 16.16 fixed point and binary angles.

mod angle;
mod fixed;

pub use angle::{ANG45, ANG90, ANG180, ANG270, Angle};
pub use fixed::{FRACBITS, FRACUNIT, Fixed};

use std::ops::{Add, Sub};

/// A location in map space.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct MapPoint {
    pub x: Fixed,
    pub y: Fixed,
}

impl MapPoint {
    pub const ZERO: MapPoint = MapPoint {
        x: Fixed::ZERO,
        y: Fixed::ZERO,
    };

    #[inline]
    pub const fn new(x: Fixed, y: Fixed) -> MapPoint {
        MapPoint { x, y }
    }

    #[inline]
    pub const fn from_ints(x: i32, y: i32) -> MapPoint {
        MapPoint {
            x: Fixed::from_int(x),
            y: Fixed::from_int(y),
        }
    }
}

impl Add for MapPoint {
    type Output = MapPoint;
    #[inline]
    fn add(self, rhs: MapPoint) -> MapPoint {
        MapPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for MapPoint {
    type Output = MapPoint;
    #[inline]
    fn sub(self, rhs: MapPoint) -> MapPoint {
        MapPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An undirected map-space segment, used both for level geometry and
/// for the vector glyphs (player arrow, thing triangle, grid lines).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MapLine {
    pub a: MapPoint,
    pub b: MapPoint,
}
