//! Map <-> framebuffer coordinate transforms.
//!
//! The scale conversions widen to i64 before shifting so a full-size
//! level times a large scale never overflows; the forward and inverse
//! transforms are bit-exact inverses up to fixed-point truncation, not
//! float inverses.

use crate::units::{ANG90, Angle, FRACBITS, Fixed, MapPoint};

use super::viewport::Viewport;

/// Sine/cosine memoized on the binary angle: callers sweep many points
/// through the same rotation, so trig runs once per distinct angle.
pub struct RotCache {
    angle: Angle,
    sin: f64,
    cos: f64,
    recomputes: u32,
}

impl Default for RotCache {
    fn default() -> Self {
        RotCache {
            angle: Angle::ZERO,
            sin: 0.0,
            cos: 1.0,
            recomputes: 0,
        }
    }
}

impl RotCache {
    /// Rotate `p` around the origin by `a`.
    pub fn rotate(&mut self, p: MapPoint, a: Angle) -> MapPoint {
        if a != self.angle {
            let rot = a.to_radians();
            self.angle = a;
            self.sin = rot.sin();
            self.cos = rot.cos();
            self.recomputes += 1;
        }
        let x = p.x.to_f64();
        let y = p.y.to_f64();
        MapPoint::new(
            Fixed::from_f64(x * self.cos - y * self.sin),
            Fixed::from_f64(x * self.sin + y * self.cos),
        )
    }

    /// How often the trig pair has been recomputed (diagnostics).
    pub fn recomputes(&self) -> u32 {
        self.recomputes
    }
}

impl Viewport {
    /// Framebuffer distance -> map distance.
    #[inline]
    pub fn ftom(&self, px: i32) -> Fixed {
        Fixed(((((px as i64) << FRACBITS) * self.scale_ftom.0 as i64) >> FRACBITS) as i32)
    }

    /// Map distance -> framebuffer distance.
    #[inline]
    pub fn mtof(&self, d: Fixed) -> i32 {
        (((d.0 as i64 * self.scale_mtof.0 as i64) >> FRACBITS) >> FRACBITS) as i32
    }

    /// Map x -> framebuffer column.
    #[inline]
    pub fn cx_mtof(&self, x: Fixed) -> i32 {
        self.mtof(x - self.m_x)
    }

    /// Map y -> framebuffer row; the framebuffer counts rows downward.
    #[inline]
    pub fn cy_mtof(&self, y: Fixed) -> i32 {
        self.f_h - self.mtof(y - self.m_y)
    }

    /// Rotate `p` around the window center so the player's facing points
    /// up. Applied to every drawn point while rotate mode is on.
    pub fn rotate_about_center(
        &self,
        rot: &mut RotCache,
        player_angle: Angle,
        p: MapPoint,
    ) -> MapPoint {
        let pivot = self.center();
        rot.rotate(p - pivot, ANG90 - player_angle) + pivot
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{ANG45, ANG180};
    use crate::world::sample_level;

    fn fixture() -> Viewport {
        let level = sample_level();
        let mut vp = Viewport::new(640, 400);
        vp.init_for_level(&level);
        vp.m_w = vp.ftom(vp.f_w);
        vp.m_h = vp.ftom(vp.f_h);
        vp.m_x = Fixed::ZERO;
        vp.m_y = Fixed::ZERO;
        vp.m_x2 = vp.m_x + vp.m_w;
        vp.m_y2 = vp.m_y + vp.m_h;
        vp
    }

    #[test]
    fn transform_round_trip_within_one_pixel() {
        let vp = fixture();
        for x in [-5000, -37, 0, 1, 129, 640, 5000, 30_000] {
            let p = Fixed::from_int(x);
            let px = vp.mtof(p);
            let back = vp.mtof(vp.ftom(vp.mtof(p)));
            assert!(
                (px - back).abs() <= 1,
                "map {x}: {px} px vs {back} px after round trip"
            );
        }
    }

    #[test]
    fn screen_y_is_flipped() {
        let vp = fixture();
        // larger map y means a smaller row number
        assert!(vp.cy_mtof(Fixed::from_int(100)) > vp.cy_mtof(Fixed::from_int(200)));
        assert_eq!(vp.cy_mtof(vp.m_y), vp.f_h);
    }

    #[test]
    fn rotation_quarter_turns() {
        let mut rot = RotCache::default();
        let p = MapPoint::from_ints(100, 0);
        let q = rot.rotate(p, ANG90);
        assert!(q.x.abs() < Fixed::from_int(1));
        assert!((q.y - Fixed::from_int(100)).abs() < Fixed::from_int(1));
        let r = rot.rotate(p, ANG180);
        assert!((r.x + Fixed::from_int(100)).abs() < Fixed::from_int(1));
    }

    #[test]
    fn trig_is_memoized_per_angle() {
        let mut rot = RotCache::default();
        for i in 0..100 {
            rot.rotate(MapPoint::from_ints(i, i), ANG45);
        }
        assert_eq!(rot.recomputes(), 1);
        rot.rotate(MapPoint::ZERO, ANG90);
        rot.rotate(MapPoint::ZERO, ANG90);
        assert_eq!(rot.recomputes(), 2);
    }

    #[test]
    fn rotate_about_center_keeps_pivot() {
        let vp = fixture();
        let mut rot = RotCache::default();
        let pivot = vp.center();
        let q = vp.rotate_about_center(&mut rot, ANG45, pivot);
        assert!((q.x - pivot.x).abs() < Fixed::from_int(1));
        assert!((q.y - pivot.y).abs() < Fixed::from_int(1));
    }
}
