use std::f64::consts::PI;
use std::ops::{Add, Sub};

/// Binary angle: the full circle is the full range of a `u32`, so
/// wrap-around comes for free from wrapping arithmetic.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Hash)]
pub struct Angle(pub u32);

pub const ANG45: Angle = Angle(0x2000_0000);
pub const ANG90: Angle = Angle(0x4000_0000);
pub const ANG180: Angle = Angle(0x8000_0000);
pub const ANG270: Angle = Angle(0xC000_0000);

impl Angle {
    pub const ZERO: Angle = Angle(0);

    #[inline]
    pub fn from_radians(r: f64) -> Angle {
        Angle((r.rem_euclid(2.0 * PI) / (2.0 * PI) * (1u64 << 32) as f64) as u32)
    }

    #[inline]
    pub fn to_radians(self) -> f64 {
        self.0 as f64 / (1u64 << 31) as f64 * PI
    }
}

impl Add for Angle {
    type Output = Angle;
    #[inline]
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Angle {
    type Output = Angle;
    #[inline]
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_sub(rhs.0))
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
