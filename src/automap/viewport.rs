//! Pan/zoom/follow window state.
//!
//! The window is a map-space rectangle `(m_x, m_y) .. (m_x2, m_y2)` of
//! size `(m_w, m_h)` plus the pair of mutually-reciprocal scale factors
//! that tie it to the framebuffer. Every mutation re-establishes two
//! invariants: `scale_ftom == 1/scale_mtof` and `m_x2/m_y2 == m_x/m_y +
//! m_w/m_h`.

use crate::units::{ANG90, Angle, FRACUNIT, Fixed, MapPoint};
use crate::world::Level;

use super::transform::RotCache;

/// Scale on first entry into a level.
pub(crate) const INIT_SCALE_MTOF: Fixed = Fixed(0x2ba0);

pub(crate) const PLAYER_RADIUS: Fixed = Fixed::from_int(16);

/// Padding added around the vertex extents.
const BOUNDS_MARGIN: Fixed = Fixed::from_int(24);

/// Framebuffer pixels the window pans per tic (doubled on speed).
#[inline]
pub(crate) fn pan_increment(speed: bool) -> i32 {
    8 << speed as i32
}

/// Per-tic zoom-in multiplier; reaches 2x in about a second.
#[inline]
pub(crate) fn zoom_in_mul(speed: bool) -> Fixed {
    Fixed((FRACUNIT.0 as f32 * (1.0 + pan_increment(speed) as f32 / 200.0)) as i32)
}

/// Per-tic zoom-out multiplier, reciprocal of [`zoom_in_mul`].
#[inline]
pub(crate) fn zoom_out_mul(speed: bool) -> Fixed {
    Fixed((FRACUNIT.0 as f32 / (1.0 + pan_increment(speed) as f32 / 200.0)) as i32)
}

/// Level-derived window limits, recomputed once per level entry.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bounds {
    pub min: MapPoint,
    pub max: MapPoint,
    /// Fits the whole level on screen; zooming out stops here.
    pub min_scale_mtof: Fixed,
    /// Derived from the player radius; zooming in stops here.
    pub max_scale_mtof: Fixed,
}

impl Bounds {
    pub fn from_level(level: &Level, f_w: i32, f_h: i32) -> Bounds {
        let (min, max) = level.vertices.iter().fold(
            (
                MapPoint::new(Fixed::MAX, Fixed::MAX),
                MapPoint::new(Fixed::MIN, Fixed::MIN),
            ),
            |(lo, hi), v| {
                (
                    MapPoint::new(lo.x.min(v.pos.x), lo.y.min(v.pos.y)),
                    MapPoint::new(hi.x.max(v.pos.x), hi.y.max(v.pos.y)),
                )
            },
        );
        let min = min - MapPoint::new(BOUNDS_MARGIN, BOUNDS_MARGIN);
        let max = max + MapPoint::new(BOUNDS_MARGIN, BOUNDS_MARGIN);

        let a = Fixed::from_int(f_w).div(max.x - min.x);
        let b = Fixed::from_int(f_h).div(max.y - min.y);

        Bounds {
            min,
            max,
            min_scale_mtof: a.min(b),
            max_scale_mtof: Fixed::from_int(f_h).div(Fixed(PLAYER_RADIUS.0 << 1)),
        }
    }
}

pub struct Viewport {
    pub(crate) f_w: i32,
    pub(crate) f_h: i32,

    /// Lower-left corner of the window (map coords).
    pub(crate) m_x: Fixed,
    pub(crate) m_y: Fixed,
    /// Upper-right corner, always `m_x + m_w` / `m_y + m_h`.
    pub(crate) m_x2: Fixed,
    pub(crate) m_y2: Fixed,
    pub(crate) m_w: Fixed,
    pub(crate) m_h: Fixed,

    pub(crate) scale_mtof: Fixed,
    pub(crate) scale_ftom: Fixed,

    /// How far the window pans each tic (map coords).
    pub(crate) pan_inc: MapPoint,
    pub(crate) mtof_zoommul: Fixed,
    pub(crate) ftom_zoommul: Fixed,

    /// Deceleration countdowns in framebuffer pixels, one per axis.
    pub(crate) dec_pan_x: i32,
    pub(crate) dec_pan_y: i32,

    // saved window for big-state recovery
    old_m_x: Fixed,
    old_m_y: Fixed,
    old_m_w: Fixed,
    old_m_h: Fixed,

    /// Last position the follower re-centered on.
    follow_old: MapPoint,

    pub(crate) bounds: Bounds,

    pub follow: bool,
    pub rotate: bool,
    pub big: bool,
    pub grid: bool,

    /// One-shot mouse/gamepad motion: cleared at the end of the tick.
    pub(crate) one_shot: bool,
}

impl Viewport {
    pub fn new(f_w: i32, f_h: i32) -> Viewport {
        let mut vp = Viewport {
            f_w,
            f_h,
            // sentinel: "never placed", resolved on first entry
            m_x: Fixed::MAX,
            m_y: Fixed::MAX,
            m_x2: Fixed::ZERO,
            m_y2: Fixed::ZERO,
            m_w: Fixed::ZERO,
            m_h: Fixed::ZERO,
            scale_mtof: INIT_SCALE_MTOF,
            scale_ftom: Fixed::ZERO,
            pan_inc: MapPoint::ZERO,
            mtof_zoommul: FRACUNIT,
            ftom_zoommul: FRACUNIT,
            dec_pan_x: 0,
            dec_pan_y: 0,
            old_m_x: Fixed::ZERO,
            old_m_y: Fixed::ZERO,
            old_m_w: Fixed::ZERO,
            old_m_h: Fixed::ZERO,
            follow_old: MapPoint::new(Fixed::MAX, Fixed::MAX),
            bounds: Bounds::default(),
            follow: true,
            rotate: false,
            big: false,
            grid: false,
            one_shot: false,
        };
        vp.scale_ftom = FRACUNIT.div(vp.scale_mtof);
        vp
    }

    #[inline]
    pub fn center(&self) -> MapPoint {
        MapPoint::new(self.m_x + self.m_w.half(), self.m_y + self.m_h.half())
    }

    /// Visible map rectangle as (lower-left, upper-right).
    #[inline]
    pub fn window(&self) -> (MapPoint, MapPoint) {
        (
            MapPoint::new(self.m_x, self.m_y),
            MapPoint::new(self.m_x2, self.m_y2),
        )
    }

    #[inline]
    pub(crate) fn set_scale(&mut self, mtof: Fixed) {
        self.scale_mtof = mtof;
        self.scale_ftom = FRACUNIT.div(mtof);
    }

    /// Resize the window around its current center after a scale change.
    pub(crate) fn activate_new_scale(&mut self) {
        self.m_x += self.m_w.half();
        self.m_y += self.m_h.half();
        self.m_w = self.ftom(self.f_w);
        self.m_h = self.ftom(self.f_h);
        self.m_x -= self.m_w.half();
        self.m_y -= self.m_h.half();
        self.m_x2 = self.m_x + self.m_w;
        self.m_y2 = self.m_y + self.m_h;
    }

    pub(crate) fn save_scale_and_loc(&mut self) {
        self.old_m_x = self.m_x;
        self.old_m_y = self.m_y;
        self.old_m_w = self.m_w;
        self.old_m_h = self.m_h;
    }

    /// Undo a big-state zoom. When following, the center is re-derived
    /// from the tracked position instead of the saved corner.
    pub(crate) fn restore_scale_and_loc(&mut self, follow_center: Option<MapPoint>) {
        self.m_w = self.old_m_w;
        self.m_h = self.old_m_h;
        match follow_center {
            Some(c) => {
                self.m_x = self.ftom(self.mtof(c.x)) - self.m_w.half();
                self.m_y = self.ftom(self.mtof(c.y)) - self.m_h.half();
            }
            None => {
                self.m_x = self.old_m_x;
                self.m_y = self.old_m_y;
            }
        }
        self.m_x2 = self.m_x + self.m_w;
        self.m_y2 = self.m_y + self.m_h;

        self.scale_mtof = Fixed::from_int(self.f_w).div(self.m_w);
        self.scale_ftom = FRACUNIT.div(self.scale_mtof);
    }

    /// Zoom all the way out (whole level visible).
    pub(crate) fn min_out_window_scale(&mut self) {
        self.set_scale(self.bounds.min_scale_mtof);
        self.activate_new_scale();
    }

    /// Zoom all the way in.
    pub(crate) fn max_out_window_scale(&mut self) {
        self.set_scale(self.bounds.max_scale_mtof);
        self.activate_new_scale();
    }

    /// Apply this tic's zoom multiplier, snapping to the exact bound
    /// when the result leaves the legal scale range.
    pub(crate) fn change_window_scale(&mut self) {
        self.scale_mtof = self.scale_mtof.mul(self.mtof_zoommul);
        self.scale_ftom = FRACUNIT.div(self.scale_mtof);

        if self.scale_mtof < self.bounds.min_scale_mtof {
            self.min_out_window_scale();
        } else if self.scale_mtof > self.bounds.max_scale_mtof {
            self.max_out_window_scale();
        } else {
            self.activate_new_scale();
        }
    }

    /// Re-center on the tracked position, quantized through the pixel
    /// grid so a stationary player never jitters the window.
    pub(crate) fn do_follow(&mut self, pos: MapPoint) {
        if self.follow_old != pos {
            self.m_x = self.ftom(self.mtof(pos.x)) - self.m_w.half();
            self.m_y = self.ftom(self.mtof(pos.y)) - self.m_h.half();
            self.m_x2 = self.m_x + self.m_w;
            self.m_y2 = self.m_y + self.m_h;
            self.follow_old = pos;
        }
    }

    pub(crate) fn reset_follow_cache(&mut self) {
        self.follow_old = MapPoint::new(Fixed::MAX, Fixed::MAX);
    }

    /// Wind the pan increment down: each tic the countdown loses one
    /// framebuffer pixel and the increment is rescaled to match.
    pub(crate) fn decelerate(&mut self) {
        if self.dec_pan_x != 0 {
            self.dec_pan_x -= 1;
            self.pan_inc.x = self.ftom(self.dec_pan_x) * self.pan_inc.x.sign();
        }
        if self.dec_pan_y != 0 {
            self.dec_pan_y -= 1;
            self.pan_inc.y = self.ftom(self.dec_pan_y) * self.pan_inc.y.sign();
        }
    }

    /// Apply this tic's pan, clamping the window center to the level
    /// bounds. Rotate mode pans along the rotated axes and is exempt
    /// from clamping (axis-aligned clamping is ill-defined there).
    pub(crate) fn change_window_loc(&mut self, rot: &mut RotCache, player_angle: Angle) {
        let mut inc = self.pan_inc;
        if self.rotate {
            inc = rot.rotate(inc, player_angle - ANG90);
        }

        self.m_x += inc.x;
        self.m_y += inc.y;

        if !self.rotate {
            let w = self.m_w.half();
            let h = self.m_h.half();

            if self.m_x + w > self.bounds.max.x {
                self.m_x = self.bounds.max.x - w;
                self.dec_pan_x = 0;
            } else if self.m_x + w < self.bounds.min.x {
                self.m_x = self.bounds.min.x - w;
                self.dec_pan_x = 0;
            }
            if self.m_y + h > self.bounds.max.y {
                self.m_y = self.bounds.max.y - h;
                self.dec_pan_y = 0;
            } else if self.m_y + h < self.bounds.min.y {
                self.m_y = self.bounds.min.y - h;
                self.dec_pan_y = 0;
            }
        }

        self.m_x2 = self.m_x + self.m_w;
        self.m_y2 = self.m_y + self.m_h;
    }

    /// Level-entry reset: new bounds, initial scale.
    pub(crate) fn init_for_level(&mut self, level: &Level) {
        self.follow = true;
        self.big = false;
        self.bounds = Bounds::from_level(level, self.f_w, self.f_h);
        self.set_scale(INIT_SCALE_MTOF);
        self.save_scale_and_loc();
    }

    pub(crate) fn stop_zoom(&mut self) {
        self.mtof_zoommul = FRACUNIT;
        self.ftom_zoommul = FRACUNIT;
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::sample_level;

    fn fixture() -> Viewport {
        let level = sample_level();
        let mut vp = Viewport::new(640, 400);
        vp.init_for_level(&level);
        vp.m_w = vp.ftom(vp.f_w);
        vp.m_h = vp.ftom(vp.f_h);
        vp.m_x = Fixed::from_int(300) - vp.m_w.half();
        vp.m_y = Fixed::from_int(250) - vp.m_h.half();
        vp.m_x2 = vp.m_x + vp.m_w;
        vp.m_y2 = vp.m_y + vp.m_h;
        vp
    }

    fn assert_rect_invariant(vp: &Viewport) {
        assert_eq!(vp.m_x2 - vp.m_x, vp.m_w);
        assert_eq!(vp.m_y2 - vp.m_y, vp.m_h);
    }

    fn assert_scale_invariant(vp: &Viewport) {
        let recip = FRACUNIT.div(vp.scale_mtof);
        assert!(
            (vp.scale_ftom.0 - recip.0).abs() <= 1,
            "ftom {} vs 1/mtof {}",
            vp.scale_ftom.0,
            recip.0
        );
    }

    #[test]
    fn scales_stay_reciprocal_through_zoom() {
        let mut vp = fixture();
        vp.mtof_zoommul = zoom_in_mul(false);
        vp.ftom_zoommul = zoom_out_mul(false);
        for _ in 0..50 {
            vp.change_window_scale();
            assert_scale_invariant(&vp);
            assert_rect_invariant(&vp);
        }
    }

    #[test]
    fn zoom_in_snaps_to_max_scale() {
        let mut vp = fixture();
        vp.mtof_zoommul = zoom_in_mul(true);
        vp.ftom_zoommul = zoom_out_mul(true);
        for _ in 0..300 {
            vp.change_window_scale();
            assert!(vp.scale_mtof <= vp.bounds.max_scale_mtof, "overshot");
        }
        assert_eq!(vp.scale_mtof, vp.bounds.max_scale_mtof);
    }

    #[test]
    fn zoom_out_snaps_to_min_scale() {
        let mut vp = fixture();
        vp.mtof_zoommul = zoom_out_mul(true);
        vp.ftom_zoommul = zoom_in_mul(true);
        for _ in 0..300 {
            vp.change_window_scale();
        }
        assert_eq!(vp.scale_mtof, vp.bounds.min_scale_mtof);
    }

    #[test]
    fn pan_then_decelerate_to_rest() {
        let mut vp = fixture();
        let mut rot = RotCache::default();
        let inc = pan_increment(false);

        vp.pan_inc.x = vp.ftom(inc);
        let mut last = vp.m_x;
        for _ in 0..10 {
            vp.decelerate();
            vp.change_window_loc(&mut rot, Angle::ZERO);
            assert!(vp.m_x > last, "monotonic pan while the key is held");
            assert_rect_invariant(&vp);
            last = vp.m_x;
        }

        // release: countdown starts at one less than the pan speed
        vp.dec_pan_x = inc - 1;
        let mut tics = 0;
        while vp.pan_inc.x != Fixed::ZERO {
            vp.decelerate();
            vp.change_window_loc(&mut rot, Angle::ZERO);
            tics += 1;
            assert!(tics <= inc - 1, "deceleration overran {tics} tics");
        }
        assert_eq!(vp.dec_pan_x, 0);
    }

    #[test]
    fn clamp_is_idempotent() {
        let mut vp = fixture();
        let mut rot = RotCache::default();
        // shove the window far past the east edge
        vp.pan_inc.x = Fixed::from_int(20_000);
        vp.change_window_loc(&mut rot, Angle::ZERO);
        let clamped = (vp.m_x, vp.m_y, vp.m_x2, vp.m_y2);

        vp.pan_inc = MapPoint::ZERO;
        vp.change_window_loc(&mut rot, Angle::ZERO);
        assert_eq!(clamped, (vp.m_x, vp.m_y, vp.m_x2, vp.m_y2));
        assert_rect_invariant(&vp);
    }

    #[test]
    fn clamp_kills_pending_deceleration() {
        let mut vp = fixture();
        let mut rot = RotCache::default();
        vp.pan_inc.x = Fixed::from_int(20_000);
        vp.dec_pan_x = 7;
        vp.change_window_loc(&mut rot, Angle::ZERO);
        assert_eq!(vp.dec_pan_x, 0);
    }

    #[test]
    fn rotate_mode_skips_clamping() {
        let mut vp = fixture();
        let mut rot = RotCache::default();
        vp.rotate = true;
        vp.pan_inc.x = Fixed::from_int(20_000);
        vp.change_window_loc(&mut rot, ANG90);
        assert!(vp.m_x + vp.m_w.half() > vp.bounds.max.x || vp.m_y + vp.m_h.half() > vp.bounds.max.y);
    }

    #[test]
    fn big_state_save_restore() {
        let mut vp = fixture();
        let before = (vp.m_x, vp.m_y, vp.m_w, vp.m_h, vp.scale_mtof);

        vp.save_scale_and_loc();
        vp.min_out_window_scale();
        assert_eq!(vp.scale_mtof, vp.bounds.min_scale_mtof);

        vp.restore_scale_and_loc(None);
        assert_eq!((vp.m_x, vp.m_y, vp.m_w, vp.m_h), (before.0, before.1, before.2, before.3));
        // scale is re-derived from the window, not copied: one ulp slack
        assert!((vp.scale_mtof.0 - before.4.0).abs() <= (before.4.0 >> 10).max(2));
        assert_scale_invariant(&vp);
    }

    #[test]
    fn follow_recenters_once_per_move() {
        let mut vp = fixture();
        let pos = MapPoint::from_ints(300, 260);
        vp.do_follow(pos);
        assert_ne!(vp.m_x, Fixed::ZERO);
        // same position: no further adjustment
        vp.m_x = Fixed::ZERO;
        vp.do_follow(pos);
        assert_eq!(vp.m_x, Fixed::ZERO);
        // new position: recenters again
        vp.do_follow(MapPoint::from_ints(301, 260));
        assert_ne!(vp.m_x, Fixed::ZERO);
    }
}
