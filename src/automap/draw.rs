//! Per-frame drawing: walls, things, the player arrow, mark digits,
//! grid lines, edge vignette and crosshair.
//!
//! The drawer reads viewport state and writes pixels; the only state it
//! mutates is the trig cache. Draw order is fixed - compositing
//! priorities, not ordering, decide which color survives an overlap.

use crate::player::{Cheats, Player};
use crate::render::Frame;
use crate::units::{ANG90, Angle, Fixed, MapLine, MapPoint};
use crate::world::{Level, Linedef, LinedefFlags, Sector, Thing, ThingFlags};

use super::Automap;
use super::colors::{self, DARK_LEVELS};
use super::glyphs::{
    CHEAT_PLAYER_ARROW, MARK_DIGITS, MARK_HEIGHT, MARK_WIDTH, PLAYER_ARROW, THING_TRIANGLE,
};
use super::raster::{DotStyle, clip_segment, draw_fline};

/// World-space grid cell, one blockmap block.
const GRID_SIZE: Fixed = Fixed::from_int(128);

/// Wall color rules. First match wins; `None` means the line is not
/// drawn at all this frame.
fn classify_wall(
    line: &Linedef,
    front: &Sector,
    back: Option<&Sector>,
    level: &Level,
    allmap: bool,
    cheating: bool,
) -> Option<(DotStyle, u8)> {
    let flags = line.flags;
    if flags.contains(LinedefFlags::NOT_ON_MAP) && !cheating {
        return None;
    }
    let mapped = flags.contains(LinedefFlags::ALREADY_ON_MAP);
    let secret = flags.contains(LinedefFlags::SECRET);

    if line.routes_elsewhere()
        && (flags.contains(LinedefFlags::TELEPORT_TRIGGERED)
            || cheating
            || back.is_some_and(|b| level.is_teleport_flat(b.floor_flat)))
    {
        if cheating || (mapped && !secret && back.is_some_and(|b| b.ceil_h != b.floor_h)) {
            return Some((DotStyle::Opaque, colors::TELEPORTER));
        }
        if allmap {
            return Some((DotStyle::Opaque, colors::ALLMAP_FD_WALL));
        }
        // neither applies: fall through to the ordinary wall rules
    }

    match back {
        None => {}
        Some(_) if secret && !cheating => {}
        Some(back) => {
            return if back.floor_h != front.floor_h {
                if mapped || cheating {
                    Some((DotStyle::Opaque, colors::FD_WALL))
                } else if allmap {
                    Some((DotStyle::Opaque, colors::ALLMAP_FD_WALL))
                } else {
                    None
                }
            } else if back.ceil_h != front.ceil_h {
                if mapped || cheating {
                    Some((DotStyle::Opaque, colors::CD_WALL))
                } else if allmap {
                    Some((DotStyle::Opaque, colors::ALLMAP_CD_WALL))
                } else {
                    None
                }
            } else if cheating {
                Some((DotStyle::Opaque, colors::TS_WALL))
            } else {
                None
            };
        }
    }

    // one-sided, or secret still hiding as one: thick stroke
    let color = if mapped || cheating {
        colors::WALL
    } else if allmap {
        colors::ALLMAP_WALL
    } else {
        colors::MASK
    };
    Some((DotStyle::Big, color))
}

impl Automap {
    /// Render one frame into `frame`. No-op while the automap is down.
    pub fn draw(&mut self, frame: &mut Frame, level: &Level, player: &Player) {
        if !self.active {
            return;
        }
        debug_assert_eq!(frame.w() as i32, self.vp.f_w);
        debug_assert_eq!(frame.h() as i32, self.vp.f_h);

        frame.clear(colors::BACKGROUND);
        self.draw_walls(frame, level, player);
        if self.vp.grid {
            self.draw_grid(frame, level, player);
        }
        if player.cheats.contains(Cheats::ALLMAP_THINGS) {
            self.draw_things(frame, level, player);
        }
        if !self.marks.is_empty() {
            self.draw_marks(frame, player);
        }
        self.draw_player(frame, player);
        self.darken_edges(frame);
        if !self.vp.follow {
            self.draw_crosshair(frame);
        }
    }

    /// Clip and draw one map-space segment.
    fn mline(&self, frame: &mut Frame, style: DotStyle, color: u8, a: MapPoint, b: MapPoint) {
        if let Some([x0, y0, x1, y1]) = clip_segment(&self.vp, a, b) {
            draw_fline(frame, &self.tables, style, color, x0, y0, x1, y1);
        }
    }

    fn draw_walls(&mut self, frame: &mut Frame, level: &Level, player: &Player) {
        let allmap = player.has_allmap();
        let cheating = player.cheating();

        for line in &level.linedefs {
            let front = &level.sectors[line.front_sector as usize];
            let back = line.back_sector.map(|s| &level.sectors[s as usize]);
            let Some((style, color)) = classify_wall(line, front, back, level, allmap, cheating)
            else {
                continue;
            };

            let mut a = level.vertices[line.v1 as usize].pos;
            let mut b = level.vertices[line.v2 as usize].pos;
            if self.vp.rotate {
                a = self.vp.rotate_about_center(&mut self.rot, player.angle, a);
                b = self.vp.rotate_about_center(&mut self.rot, player.angle, b);
            }
            self.mline(frame, style, color, a, b);
        }

        // geometry only present as mask color stays undiscovered
        if !cheating && !allmap {
            for px in frame.pixels.iter_mut() {
                *px = self.tables.reveal(*px);
            }
        }
    }

    /// Draw a vector glyph at `at`, optionally scaled and rotated. In
    /// rotate mode the glyph counter-rotates with the view so its
    /// heading stays meaningful.
    #[allow(clippy::too_many_arguments)]
    fn glyph(
        &mut self,
        frame: &mut Frame,
        lines: &[MapLine],
        scale: Fixed,
        angle: Angle,
        style: DotStyle,
        color: u8,
        at: MapPoint,
        player_angle: Angle,
    ) {
        let angle = if self.vp.rotate {
            angle + (ANG90 - player_angle)
        } else {
            angle
        };

        for l in lines {
            let (mut a, mut b) = (l.a, l.b);
            if scale != Fixed::ZERO {
                a = MapPoint::new(a.x.mul(scale), a.y.mul(scale));
                b = MapPoint::new(b.x.mul(scale), b.y.mul(scale));
            }
            if angle != Angle::ZERO {
                a = self.rot.rotate(a, angle);
                b = self.rot.rotate(b, angle);
            }
            self.mline(frame, style, color, at + a, at + b);
        }
    }

    fn draw_player(&mut self, frame: &mut Frame, player: &Player) {
        let mut pt = player.pos;
        if self.vp.rotate {
            pt = self.vp.rotate_about_center(&mut self.rot, player.angle, pt);
        }

        let lines: &[MapLine] = if player.cheating() {
            &CHEAT_PLAYER_ARROW
        } else {
            &PLAYER_ARROW
        };
        let style = if player.shadow_flicker() {
            DotStyle::Translucent
        } else {
            DotStyle::Opaque
        };
        self.glyph(
            frame,
            lines,
            Fixed::ZERO,
            player.angle,
            style,
            colors::PLAYER,
            pt,
            player.angle,
        );
    }

    /// Things go down in two passes per sector - everything else first,
    /// enemies on top - and the enemy pass is skipped entirely when the
    /// first pass saw none. Ordering only; the pixels are identical.
    fn draw_things(&mut self, frame: &mut Frame, level: &Level, player: &Player) {
        for sector in &level.sectors {
            let mut enemies = 0u32;
            for &ti in &sector.things {
                let thing = &level.things[ti as usize];
                if thing.is_enemy() {
                    enemies += 1;
                    continue;
                }
                self.draw_thing(frame, thing, player);
            }
            if enemies == 0 {
                continue;
            }
            for &ti in &sector.things {
                let thing = &level.things[ti as usize];
                if thing.is_enemy() {
                    self.draw_thing(frame, thing, player);
                }
            }
        }
    }

    fn draw_thing(&mut self, frame: &mut Frame, thing: &Thing, player: &Player) {
        if thing.flags.contains(ThingFlags::NOT_ON_AUTOMAP) {
            return;
        }

        let size = thing
            .sprite_w
            .min(thing.sprite_h)
            .clamp(Fixed::from_int(24), Fixed::from_int(96))
            .half();

        let mut pos = thing.pos;
        if self.vp.rotate {
            pos = self.vp.rotate_about_center(&mut self.rot, player.angle, pos);
        }

        let fx = self.vp.cx_mtof(pos.x);
        let fy = self.vp.cy_mtof(pos.y);
        let fr = self.vp.mtof(size);
        if fx >= -fr && fx <= self.vp.f_w + fr && fy >= -fr && fy <= self.vp.f_h + fr {
            self.glyph(
                frame,
                &THING_TRIANGLE,
                size,
                thing.angle,
                DotStyle::Opaque,
                colors::THING,
                pos,
                player.angle,
            );
        }
    }

    /// Numbered digit bitmaps, multi-digit numbers stacked leftward with
    /// small kerning fixes around the narrow "1".
    fn draw_marks(&mut self, frame: &mut Frame, player: &Player) {
        let w = frame.w() as i32;
        let h = frame.h() as i32;

        for i in 0..self.marks.len() {
            let mut number = i + 1;
            let mut pos = self.marks[i];
            if self.vp.rotate {
                pos = self.vp.rotate_about_center(&mut self.rot, player.angle, pos);
            }

            let mut x = self.vp.cx_mtof(pos.x) - (MARK_WIDTH as i32 >> 1) + 1;
            let y = self.vp.cy_mtof(pos.y) - (MARK_HEIGHT as i32 >> 1) - 1;

            let mut digits = 1;
            let mut temp = number / 10;
            while temp > 0 {
                digits += 1;
                temp /= 10;
            }
            x += (digits - 1) * (MARK_WIDTH as i32 >> 1);
            x -= (number > 1 && number % 10 == 1) as i32;
            x -= (number / 10 == 1) as i32;

            loop {
                let digit = number % 10;
                if i > 0 && digit == 1 {
                    x += 2;
                }
                let bitmap = &MARK_DIGITS[digit];
                for (j, &cell) in bitmap.iter().enumerate() {
                    let fx = x + (j % MARK_WIDTH) as i32;
                    if (0..w).contains(&fx) {
                        let fy = y + (j / MARK_WIDTH) as i32;
                        if (0..h).contains(&fy) {
                            let idx = (fy * w + fx) as usize;
                            let dest = frame.pixels[idx];
                            match cell {
                                2 => frame.pixels[idx] = colors::MARK,
                                1 if dest != colors::MARK && dest != colors::GRID => {
                                    frame.pixels[idx] = self.tables.tint80(0, dest);
                                }
                                _ => {}
                            }
                        }
                    }
                }
                x -= MARK_WIDTH as i32;
                number /= 10;
                if number == 0 {
                    break;
                }
            }
        }
    }

    /// Block-aligned grid. The window's bounding box is expanded to its
    /// diagonal first so rotation never exposes an unruled corner.
    fn draw_grid(&mut self, frame: &mut Frame, level: &Level, player: &Player) {
        let minlen = Fixed((self.vp.m_w.0 as f64).hypot(self.vp.m_h.0 as f64) as i32);
        let extx = (minlen - self.vp.m_w).half();
        let exty = (minlen - self.vp.m_h).half();

        // vertical gridlines
        let mut start = self.vp.m_x - extx;
        let rem = (start - level.blockmap_origin.x).0 % GRID_SIZE.0;
        if rem != 0 {
            start += Fixed(GRID_SIZE.0 - rem);
        }
        let end = self.vp.m_x + minlen - extx;

        let mut x = start;
        while x < end {
            let mut a = MapPoint::new(x, self.vp.m_y - exty);
            let mut b = MapPoint::new(x, a.y + minlen);
            if self.vp.rotate {
                a = self.vp.rotate_about_center(&mut self.rot, player.angle, a);
                b = self.vp.rotate_about_center(&mut self.rot, player.angle, b);
            }
            self.mline(frame, DotStyle::Opaque, colors::GRID, a, b);
            x += GRID_SIZE;
        }

        // horizontal gridlines
        let mut start = self.vp.m_y - exty;
        let rem = (start - level.blockmap_origin.y).0 % GRID_SIZE.0;
        if rem != 0 {
            start += Fixed(GRID_SIZE.0 - rem);
        }
        let end = self.vp.m_y + minlen - exty;

        let mut y = start;
        while y < end {
            let mut a = MapPoint::new(self.vp.m_x - extx, y);
            let mut b = MapPoint::new(a.x + minlen, y);
            if self.vp.rotate {
                a = self.vp.rotate_about_center(&mut self.rot, player.angle, a);
                b = self.vp.rotate_about_center(&mut self.rot, player.angle, b);
            }
            self.mline(frame, DotStyle::Opaque, colors::GRID, a, b);
            y += GRID_SIZE;
        }
    }

    /// Shade the outer rings toward black so the map fades at its edge.
    fn darken_edges(&self, frame: &mut Frame) {
        let w = frame.w();
        let h = frame.h();
        if w <= 2 * DARK_LEVELS || h <= 2 * DARK_LEVELS {
            return;
        }

        for ring in 0..DARK_LEVELS {
            for x in ring..w - ring {
                let top = ring * w + x;
                frame.pixels[top] = self.tables.darken(ring, frame.pixels[top]);
                let bottom = (h - ring - 1) * w + x;
                frame.pixels[bottom] = self.tables.darken(ring, frame.pixels[bottom]);
            }
            for y in ring + 1..h - ring - 1 {
                let left = y * w + ring;
                frame.pixels[left] = self.tables.darken(ring, frame.pixels[left]);
                let right = y * w + (w - ring - 1);
                frame.pixels[right] = self.tables.darken(ring, frame.pixels[right]);
            }
        }
    }

    /// 2x2 tinted block addressed in half-resolution coordinates.
    fn scaled_pixel(&self, frame: &mut Frame, x: i32, y: i32) {
        let w = frame.w() as i32;
        let h = frame.h() as i32;
        for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let px = (x << 1) - 1 + dx;
            let py = (y << 1) - 1 + dy;
            if (0..w).contains(&px) && (0..h).contains(&py) {
                let i = (py * w + px) as usize;
                frame.pixels[i] = self.tables.tint60(colors::CROSSHAIR, frame.pixels[i]);
            }
        }
    }

    /// Faint plus at the window center while panning manually.
    fn draw_crosshair(&self, frame: &mut Frame) {
        let cx = self.vp.f_w >> 2;
        let cy = self.vp.f_h >> 2;
        for o in -2..=2 {
            self.scaled_pixel(frame, cx + o, cy);
        }
        for o in [-2, -1, 1, 2] {
            self.scaled_pixel(frame, cx, cy + o);
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
