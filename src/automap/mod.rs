//! The automap subsystem.
//!
//! One [`Automap`] instance carries the whole state: window rectangle
//! and scales, marks, input chords and the immutable compositing
//! tables. Each game tick runs at most one `respond` per pending event,
//! exactly one [`Automap::ticker`], then one [`Automap::draw`] - all on
//! the game thread, so nothing here locks.

pub mod colors;
pub mod glyphs;
pub mod input;
pub mod raster;
pub mod transform;
pub mod viewport;

mod draw;

pub use colors::ColorTables;
pub use input::{AmEvent, AmKey, GamepadButtons, GamepadSnapshot, Mods};
pub use raster::DotStyle;
pub use transform::RotCache;
pub use viewport::{Bounds, Viewport};

use crate::player::Player;
use crate::units::{FRACUNIT, Fixed, MapPoint};
use crate::world::Level;

use input::InputState;

pub struct Automap {
    pub active: bool,
    stopped: bool,
    /// Level identity of the last entry; a change re-derives bounds.
    last_level: Option<u32>,

    pub(crate) vp: Viewport,
    pub(crate) marks: Vec<MapPoint>,
    pub(crate) tables: ColorTables,
    pub(crate) rot: RotCache,
    pub(crate) input: InputState,
}

impl Automap {
    /// `f_w` x `f_h` is the automap's slice of the framebuffer.
    /// `tables` are built once at startup and never change.
    pub fn new(f_w: i32, f_h: i32, tables: ColorTables) -> Automap {
        Automap {
            active: false,
            stopped: true,
            last_level: None,
            vp: Viewport::new(f_w, f_h),
            marks: Vec::new(),
            tables,
            rot: RotCache::default(),
            input: InputState::default(),
        }
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.vp
    }

    #[inline]
    pub fn marks(&self) -> &[MapPoint] {
        &self.marks
    }

    /// Seed persisted preferences (config defaults) before first start.
    pub fn set_grid(&mut self, on: bool) {
        self.vp.grid = on;
    }

    /// See [`Automap::set_grid`].
    pub fn set_rotate(&mut self, on: bool) {
        self.vp.rotate = on;
    }

    /// Bring the automap up. Re-entering the level that was last shown
    /// restores the previous window; a new level recomputes bounds and
    /// starts at the initial scale.
    pub fn start(&mut self, level: &Level, player: &Player) {
        if !self.stopped {
            self.stop();
        }
        self.stopped = false;

        if self.last_level != Some(level.id) {
            self.vp.init_for_level(level);
            self.last_level = Some(level.id);
        }
        self.init_variables(player);
    }

    /// Hide the automap. The window is retained for the next entry.
    pub fn stop(&mut self) {
        self.active = false;
        self.stopped = true;
    }

    fn init_variables(&mut self, player: &Player) {
        self.active = true;

        self.vp.reset_follow_cache();
        self.vp.pan_inc = MapPoint::ZERO;
        self.vp.stop_zoom();

        self.vp.m_w = self.vp.ftom(self.vp.f_w);
        self.vp.m_h = self.vp.ftom(self.vp.f_h);

        // center on the player the first time and whenever following
        if self.vp.m_x == Fixed::MAX || self.vp.follow {
            self.vp.m_x = self.vp.ftom(self.vp.mtof(player.pos.x)) - self.vp.m_w.half();
            self.vp.m_y = self.vp.ftom(self.vp.mtof(player.pos.y)) - self.vp.m_h.half();
            self.vp.m_x2 = self.vp.m_x + self.vp.m_w;
            self.vp.m_y2 = self.vp.m_y + self.vp.m_h;
        }
    }

    /// Advance the window one game tick: follow, zoom, pan, and the
    /// end-of-tick reset of one-shot wheel/stick motion.
    pub fn ticker(&mut self, player: &Player) {
        if !self.active {
            return;
        }

        if self.vp.follow {
            self.vp.do_follow(player.pos);
        }

        if self.vp.ftom_zoommul != FRACUNIT {
            self.vp.change_window_scale();
        }

        if self.vp.pan_inc != MapPoint::ZERO {
            self.vp.decelerate();
            self.vp.change_window_loc(&mut self.rot, player.angle);
        }

        if self.vp.one_shot {
            self.vp.one_shot = false;
            self.vp.pan_inc = MapPoint::ZERO;
            self.vp.stop_zoom();
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;
    use crate::render::Palette;
    use crate::units::MapPoint;
    use crate::world::sample_level;

    fn automap() -> Automap {
        Automap::new(320, 200, ColorTables::build(&Palette::builtin()))
    }

    fn player_at(x: i32, y: i32) -> Player {
        Player {
            pos: MapPoint::from_ints(x, y),
            ..Player::default()
        }
    }

    #[test]
    fn start_centers_on_player() {
        let level = sample_level();
        let mut am = automap();
        let player = player_at(256, 256);
        am.start(&level, &player);
        assert!(am.active);
        let c = am.vp.center();
        assert!((c.x - player.pos.x).abs() < Fixed::from_int(8));
        assert!((c.y - player.pos.y).abs() < Fixed::from_int(8));
    }

    #[test]
    fn reentry_same_level_keeps_window() {
        let level = sample_level();
        let mut am = automap();
        let player = player_at(256, 256);
        am.start(&level, &player);
        am.vp.follow = false;
        // pan somewhere else, leave, and come back
        am.vp.m_x = Fixed::from_int(900);
        am.vp.m_y = Fixed::from_int(100);
        am.stop();
        am.start(&level, &player);
        assert_eq!(am.vp.m_x, Fixed::from_int(900));
        assert!(!am.vp.follow);
    }

    #[test]
    fn new_level_resets_scale_and_follow() {
        let mut level = sample_level();
        let mut am = automap();
        let player = player_at(256, 256);
        am.start(&level, &player);
        am.vp.follow = false;
        am.vp.set_scale(am.vp.bounds.max_scale_mtof);
        am.stop();

        level.id = 2;
        am.start(&level, &player);
        assert!(am.vp.follow, "level change turns follow back on");
        assert_eq!(am.vp.scale_mtof, viewport::INIT_SCALE_MTOF);
    }

    #[test]
    fn ticker_noop_while_inactive() {
        let level = sample_level();
        let mut am = automap();
        let player = player_at(256, 256);
        am.start(&level, &player);
        am.stop();
        let before = am.vp.m_x;
        am.ticker(&player_at(900, 400));
        assert_eq!(am.vp.m_x, before);
    }

    #[test]
    fn follow_tick_tracks_player() {
        let level = sample_level();
        let mut am = automap();
        am.start(&level, &player_at(256, 256));
        am.ticker(&player_at(400, 300));
        let c = am.vp.center();
        assert!((c.x - Fixed::from_int(400)).abs() < Fixed::from_int(8));
    }

    #[test]
    fn one_shot_motion_clears_after_tick() {
        let level = sample_level();
        let mut am = automap();
        let player = player_at(256, 256);
        am.start(&level, &player);
        am.vp.one_shot = true;
        am.vp.mtof_zoommul = viewport::zoom_in_mul(false);
        am.vp.ftom_zoommul = viewport::zoom_out_mul(false);
        am.ticker(&player);
        assert_eq!(am.vp.mtof_zoommul, FRACUNIT);
        assert_eq!(am.vp.ftom_zoommul, FRACUNIT);
        assert!(!am.vp.one_shot);
    }
}
