//! Event -> viewport-command mapping.
//!
//! Dispatch is a strict allow-list: anything unmatched reports "not
//! consumed" and is left for the rest of the game to handle. Toggle
//! keys suppress key repeat through last-key-down tracking; the
//! clear-marks chord counts unbroken presses of its key.

use bitflags::bitflags;
use glam::Vec2;

use crate::player::{Notifier, Player};
use crate::units::{Fixed, MapPoint};
use crate::world::Level;

use super::Automap;
use super::viewport::{pan_increment, zoom_in_mul, zoom_out_mul};

pub const MSG_FOLLOW_ON: &str = "Follow Mode ON";
pub const MSG_FOLLOW_OFF: &str = "Follow Mode OFF";
pub const MSG_GRID_ON: &str = "Grid ON";
pub const MSG_GRID_OFF: &str = "Grid OFF";
pub const MSG_ROTATE_ON: &str = "Rotate Mode ON";
pub const MSG_ROTATE_OFF: &str = "Rotate Mode OFF";
pub const MSG_MARK_CLEARED: &str = "Mark Cleared";
pub const MSG_MARKS_CLEARED: &str = "Marks Cleared";

/// Logical automap keys; binding physical keys to these is the
/// embedding app's business.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AmKey {
    PanRight,
    PanLeft,
    PanUp,
    PanDown,
    ZoomIn,
    ZoomOut,
    Toggle,
    GoBig,
    Follow,
    Grid,
    Mark,
    ClearMark,
    Rotate,
}

/// Keyboard modifier state sampled with the event.
#[derive(Clone, Copy, Default, Debug)]
pub struct Mods {
    pub shift: bool,
    pub alt: bool,
}

bitflags! {
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct GamepadButtons: u32 {
        /// The automap toggle (back) button.
        const AUTOMAP        = 0x01;
        const LEFT_TRIGGER   = 0x02;
        const LEFT_SHOULDER  = 0x04;
        const RIGHT_SHOULDER = 0x08;
    }
}

/// Gamepad state delivered as one event per change.
/// Stick axes are -1..1 with +y pointing up.
#[derive(Clone, Copy, Default, Debug)]
pub struct GamepadSnapshot {
    pub buttons: GamepadButtons,
    pub stick: Vec2,
}

#[derive(Clone, Copy, Debug)]
pub enum AmEvent {
    KeyDown(AmKey),
    KeyUp(AmKey),
    WheelUp,
    WheelDown,
    Gamepad(GamepadSnapshot),
}

/// Responder-internal state: repeat suppression, the clear chord, and
/// an event-sourced held-key set for opposing-key reversal.
#[derive(Default)]
pub(crate) struct InputState {
    keydown: Option<AmKey>,
    mark_press: u32,
    back_button_down: bool,
    /// Last seen gamepad buttons; the speed rule reads the trigger from
    /// here even for keyboard events.
    pad_buttons: GamepadButtons,
    held: [bool; 4], // right, left, up, down
}

impl InputState {
    fn pan_slot(key: AmKey) -> Option<usize> {
        match key {
            AmKey::PanRight => Some(0),
            AmKey::PanLeft => Some(1),
            AmKey::PanUp => Some(2),
            AmKey::PanDown => Some(3),
            _ => None,
        }
    }

    fn set_held(&mut self, key: AmKey, down: bool) {
        if let Some(i) = Self::pan_slot(key) {
            self.held[i] = down;
        }
    }

    fn is_held(&self, key: AmKey) -> bool {
        Self::pan_slot(key).is_some_and(|i| self.held[i])
    }

    fn first_held_pan(&self) -> Option<AmKey> {
        [AmKey::PanLeft, AmKey::PanRight, AmKey::PanUp, AmKey::PanDown]
            .into_iter()
            .find(|&k| self.is_held(k))
    }
}

impl Automap {
    /// Exactly one of gamepad trigger and shift doubles pan/zoom speed;
    /// both together cancel out.
    fn speed_toggle(&self, mods: Mods) -> bool {
        let lt = self.input.pad_buttons.contains(GamepadButtons::LEFT_TRIGGER);
        (lt as u32 + mods.shift as u32) == 1
    }

    /// Feed one input event through the automap. Returns whether the
    /// event was consumed.
    pub fn respond(
        &mut self,
        ev: &AmEvent,
        mods: Mods,
        level: &Level,
        player: &Player,
        notifier: &mut dyn Notifier,
    ) -> bool {
        if let AmEvent::Gamepad(pad) = ev {
            self.input.pad_buttons = pad.buttons;
            if !pad.buttons.contains(GamepadButtons::AUTOMAP) {
                self.input.back_button_down = false;
            }
        }

        if !self.active {
            return match ev {
                AmEvent::KeyDown(AmKey::Toggle)
                    if self.input.keydown != Some(AmKey::Toggle) && !mods.alt =>
                {
                    self.input.keydown = Some(AmKey::Toggle);
                    self.start(level, player);
                    true
                }
                AmEvent::Gamepad(pad)
                    if pad.buttons.contains(GamepadButtons::AUTOMAP)
                        && !self.input.back_button_down =>
                {
                    self.input.back_button_down = true;
                    self.start(level, player);
                    true
                }
                AmEvent::KeyUp(key) => {
                    self.input.set_held(*key, false);
                    self.input.keydown = None;
                    false
                }
                _ => false,
            };
        }

        match *ev {
            AmEvent::KeyDown(key) => self.key_down(key, mods, player, notifier),
            AmEvent::KeyUp(key) => {
                self.key_up(key, mods, player);
                false
            }
            AmEvent::WheelUp => {
                let speed = self.speed_toggle(mods);
                self.vp.one_shot = true;
                self.vp.mtof_zoommul = zoom_in_mul(speed) + Fixed(2000);
                self.vp.ftom_zoommul = zoom_out_mul(speed) - Fixed(2000);
                self.vp.big = false;
                false
            }
            AmEvent::WheelDown => {
                let speed = self.speed_toggle(mods);
                self.vp.one_shot = true;
                self.vp.mtof_zoommul = zoom_out_mul(speed) - Fixed(2000);
                self.vp.ftom_zoommul = zoom_in_mul(speed) + Fixed(2000);
                false
            }
            AmEvent::Gamepad(pad) => {
                self.gamepad(pad, mods);
                false
            }
        }
    }

    /// Set the pan increment for a held pan key, or zero it under
    /// follow mode (where pan keys report unconsumed).
    fn pan_down(&mut self, key: AmKey, speed: bool) -> bool {
        let inc = self.vp.ftom(pan_increment(speed));
        match key {
            AmKey::PanRight | AmKey::PanLeft => {
                if self.vp.follow {
                    self.vp.pan_inc.x = Fixed::ZERO;
                    return false;
                }
                self.vp.pan_inc.x = if key == AmKey::PanRight { inc } else { -inc };
                self.vp.dec_pan_x = 0;
            }
            AmKey::PanUp | AmKey::PanDown => {
                if self.vp.follow {
                    self.vp.pan_inc.y = Fixed::ZERO;
                    return false;
                }
                self.vp.pan_inc.y = if key == AmKey::PanUp { inc } else { -inc };
                self.vp.dec_pan_y = 0;
            }
            _ => unreachable!("pan_down takes pan keys only"),
        }
        true
    }

    fn key_down(
        &mut self,
        key: AmKey,
        mods: Mods,
        player: &Player,
        notifier: &mut dyn Notifier,
    ) -> bool {
        use AmKey::*;

        let speed = self.speed_toggle(mods);
        match key {
            PanRight | PanLeft | PanUp | PanDown => {
                self.input.keydown = Some(key);
                self.input.set_held(key, true);
                self.pan_down(key, speed)
            }

            ZoomOut if !self.vp.one_shot => {
                self.input.keydown = Some(key);
                self.vp.mtof_zoommul = zoom_out_mul(speed);
                self.vp.ftom_zoommul = zoom_in_mul(speed);
                true
            }

            ZoomIn if !self.vp.one_shot => {
                self.input.keydown = Some(key);
                self.vp.mtof_zoommul = zoom_in_mul(speed);
                self.vp.ftom_zoommul = zoom_out_mul(speed);
                self.vp.big = false;
                true
            }

            Toggle if !mods.alt && self.input.keydown != Some(Toggle) => {
                self.input.keydown = Some(key);
                self.stop();
                true
            }

            GoBig => {
                if self.input.keydown != Some(GoBig) {
                    self.input.keydown = Some(key);
                    if self.vp.big {
                        self.vp.big = false;
                        let center = self.vp.follow.then_some(player.pos);
                        self.vp.restore_scale_and_loc(center);
                    } else if self.vp.scale_mtof != self.vp.bounds.min_scale_mtof {
                        self.vp.big = true;
                        self.vp.save_scale_and_loc();
                        self.vp.min_out_window_scale();
                    }
                }
                true
            }

            Follow => {
                if self.input.keydown != Some(Follow) {
                    self.input.keydown = Some(key);
                    self.vp.follow = !self.vp.follow;
                    if self.vp.follow {
                        self.vp.pan_inc = MapPoint::ZERO;
                    }
                    self.vp.reset_follow_cache();
                    let msg = if self.vp.follow { MSG_FOLLOW_ON } else { MSG_FOLLOW_OFF };
                    notifier.message(msg.into());
                }
                true
            }

            Grid => {
                if self.input.keydown != Some(Grid) {
                    self.input.keydown = Some(key);
                    self.vp.grid = !self.vp.grid;
                    let msg = if self.vp.grid { MSG_GRID_ON } else { MSG_GRID_OFF };
                    notifier.message(msg.into());
                }
                true
            }

            Mark if player.health > 0 => {
                if self.input.keydown != Some(Mark) {
                    self.input.keydown = Some(key);
                    self.add_mark(notifier);
                }
                true
            }

            ClearMark => {
                if !self.marks.is_empty() {
                    self.input.mark_press += 1;
                    if self.input.mark_press == 5 {
                        let msg = if self.marks.len() == 1 {
                            MSG_MARK_CLEARED
                        } else {
                            MSG_MARKS_CLEARED
                        };
                        notifier.message(msg.into());
                        self.marks.clear();
                    } else {
                        self.marks.pop();
                        notifier.message(MSG_MARK_CLEARED.into());
                    }
                }
                true
            }

            Rotate => {
                if self.input.keydown != Some(Rotate) {
                    self.input.keydown = Some(key);
                    self.vp.rotate = !self.vp.rotate;
                    let msg = if self.vp.rotate { MSG_ROTATE_ON } else { MSG_ROTATE_OFF };
                    notifier.message(msg.into());
                }
                true
            }

            _ => false,
        }
    }

    fn key_up(&mut self, key: AmKey, mods: Mods, _player: &Player) {
        use AmKey::*;

        self.input.set_held(key, false);
        if key == ClearMark {
            self.input.mark_press = 0;
        }
        self.input.keydown = None;

        let speed = self.speed_toggle(mods);
        match key {
            ZoomIn | ZoomOut if !self.vp.one_shot => {
                self.vp.stop_zoom();
            }

            // follow released while a pan key is held: resume panning
            Follow => {
                if let Some(pan) = self.input.first_held_pan() {
                    self.pan_down(pan, speed);
                }
            }

            PanLeft | PanRight if !self.vp.follow => {
                let opposing = if key == PanLeft { PanRight } else { PanLeft };
                if self.input.is_held(opposing) {
                    let inc = self.vp.ftom(pan_increment(speed));
                    self.vp.pan_inc.x = if opposing == PanRight { inc } else { -inc };
                    self.vp.dec_pan_x = 0;
                } else if self.vp.pan_inc.x != Fixed::ZERO {
                    self.vp.dec_pan_x = pan_increment(speed) - 1;
                }
            }

            PanUp | PanDown if !self.vp.follow => {
                let opposing = if key == PanUp { PanDown } else { PanUp };
                if self.input.is_held(opposing) {
                    let inc = self.vp.ftom(pan_increment(speed));
                    self.vp.pan_inc.y = if opposing == PanUp { inc } else { -inc };
                    self.vp.dec_pan_y = 0;
                } else if self.vp.pan_inc.y != Fixed::ZERO {
                    self.vp.dec_pan_y = pan_increment(speed) - 1;
                }
            }

            _ => {}
        }
    }

    fn gamepad(&mut self, pad: GamepadSnapshot, mods: Mods) {
        use GamepadButtons as B;

        if pad.buttons.contains(B::AUTOMAP) && !self.input.back_button_down {
            self.input.back_button_down = true;
            self.stop();
            return;
        }

        let speed = self.speed_toggle(mods);

        if pad.buttons.contains(B::RIGHT_SHOULDER) && !pad.buttons.contains(B::LEFT_SHOULDER) {
            self.vp.one_shot = true;
            self.vp.mtof_zoommul = zoom_in_mul(speed);
            self.vp.ftom_zoommul = zoom_out_mul(speed);
            self.vp.big = false;
        } else if pad.buttons.contains(B::LEFT_SHOULDER)
            && !pad.buttons.contains(B::RIGHT_SHOULDER)
        {
            self.vp.one_shot = true;
            self.vp.mtof_zoommul = zoom_out_mul(speed);
            self.vp.ftom_zoommul = zoom_in_mul(speed);
        }

        if !self.vp.follow {
            if pad.stick.x != 0.0 {
                self.vp.one_shot = true;
                self.vp.pan_inc.x = self.stick_pan(pad.stick.x, speed);
            }
            if pad.stick.y != 0.0 {
                self.vp.one_shot = true;
                self.vp.pan_inc.y = self.stick_pan(pad.stick.y, speed);
            }
        }
    }

    /// Stick pan increment: keyboard speed scaled by deflection, then
    /// quantized through the pixel grid like every other pan.
    fn stick_pan(&self, axis: f32, speed: bool) -> Fixed {
        let px = (pan_increment(speed) as f32 * axis.abs() * 1.2) as i32;
        let inc = self.vp.ftom(px);
        if axis < 0.0 { -inc } else { inc }
    }

    /// Drop a numbered mark at the window center. An exact duplicate of
    /// an existing mark is ignored.
    fn add_mark(&mut self, notifier: &mut dyn Notifier) {
        let c = self.vp.center();
        if self.marks.contains(&c) {
            return;
        }
        self.marks.push(c);
        notifier.message(format!("Marked Spot {}", self.marks.len()));
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::automap::ColorTables;
    use crate::player::NullNotifier;
    use crate::render::Palette;
    use crate::units::FRACUNIT;
    use crate::world::{Level, sample_level};

    struct Rig {
        am: Automap,
        level: Level,
        player: Player,
    }

    fn rig() -> Rig {
        let level = sample_level();
        let player = Player {
            pos: MapPoint::from_ints(256, 256),
            ..Player::default()
        };
        let mut am = Automap::new(320, 200, ColorTables::build(&Palette::builtin()));
        am.start(&level, &player);
        Rig { am, level, player }
    }

    impl Rig {
        fn send(&mut self, ev: AmEvent) -> bool {
            self.am
                .respond(&ev, Mods::default(), &self.level, &self.player, &mut NullNotifier)
        }
        fn press(&mut self, key: AmKey) -> bool {
            self.send(AmEvent::KeyDown(key))
        }
        fn release(&mut self, key: AmKey) {
            self.send(AmEvent::KeyUp(key));
        }
        fn tap(&mut self, key: AmKey) -> bool {
            let rc = self.press(key);
            self.release(key);
            rc
        }
    }

    #[test]
    fn toggle_starts_and_stops() {
        let mut r = rig();
        assert!(r.am.active);
        assert!(r.tap(AmKey::Toggle));
        assert!(!r.am.active);
        assert!(r.tap(AmKey::Toggle));
        assert!(r.am.active);
    }

    #[test]
    fn unmatched_keys_are_not_consumed() {
        let mut r = rig();
        // alt-tab must pass through for window switching
        let consumed = r.am.respond(
            &AmEvent::KeyDown(AmKey::Toggle),
            Mods { alt: true, shift: false },
            &r.level,
            &r.player,
            &mut NullNotifier,
        );
        assert!(!consumed);
        assert!(r.am.active);
    }

    #[test]
    fn pan_keys_unconsumed_in_follow_mode() {
        let mut r = rig();
        assert!(r.am.vp.follow);
        assert!(!r.press(AmKey::PanRight), "follow mode ignores pans");
        assert_eq!(r.am.vp.pan_inc.x, Fixed::ZERO);
    }

    #[test]
    fn follow_toggle_zeroes_pan() {
        let mut r = rig();
        assert!(r.tap(AmKey::Follow));
        assert!(!r.am.vp.follow);
        assert!(r.press(AmKey::PanRight));
        assert!(r.am.vp.pan_inc.x > Fixed::ZERO);
        r.release(AmKey::PanRight);

        assert!(r.tap(AmKey::Follow));
        assert!(r.am.vp.follow);
        assert_eq!(r.am.vp.pan_inc, MapPoint::ZERO);
    }

    #[test]
    fn opposing_key_reverses_instantly() {
        let mut r = rig();
        r.tap(AmKey::Follow);
        r.press(AmKey::PanRight);
        let right = r.am.vp.pan_inc.x;
        r.press(AmKey::PanLeft);
        assert_eq!(r.am.vp.pan_inc.x, -right);
        // releasing left with right still held snaps straight back
        r.release(AmKey::PanLeft);
        assert_eq!(r.am.vp.pan_inc.x, right);
        assert_eq!(r.am.vp.dec_pan_x, 0);
    }

    #[test]
    fn release_starts_deceleration() {
        let mut r = rig();
        r.tap(AmKey::Follow);
        r.press(AmKey::PanRight);
        r.release(AmKey::PanRight);
        assert_eq!(r.am.vp.dec_pan_x, pan_increment(false) - 1);
    }

    #[test]
    fn speed_modifier_rule() {
        let mut r = rig();
        r.tap(AmKey::Follow);

        // shift alone: doubled
        let shift = Mods { shift: true, alt: false };
        r.am.respond(
            &AmEvent::KeyDown(AmKey::PanRight),
            shift,
            &r.level,
            &r.player,
            &mut NullNotifier,
        );
        let fast = r.am.vp.pan_inc.x;
        r.release(AmKey::PanRight);

        // shift plus trigger: they cancel
        r.send(AmEvent::Gamepad(GamepadSnapshot {
            buttons: GamepadButtons::LEFT_TRIGGER,
            stick: Vec2::ZERO,
        }));
        r.am.respond(
            &AmEvent::KeyDown(AmKey::PanRight),
            shift,
            &r.level,
            &r.player,
            &mut NullNotifier,
        );
        let slow = r.am.vp.pan_inc.x;
        assert!(fast > slow);
        assert_eq!(Fixed(fast.0 / 2), slow);
    }

    #[test]
    fn mark_dedup_exact_coordinates() {
        let mut r = rig();
        assert!(r.tap(AmKey::Mark));
        assert_eq!(r.am.marks().len(), 1);
        // window unmoved: identical fixed-point center
        assert!(r.tap(AmKey::Mark));
        assert_eq!(r.am.marks().len(), 1);
    }

    #[test]
    fn dead_player_cannot_mark() {
        let mut r = rig();
        r.player.health = 0;
        assert!(!r.tap(AmKey::Mark));
        assert!(r.am.marks().is_empty());
    }

    #[test]
    fn clear_chord_removes_then_wipes() {
        let mut r = rig();
        r.tap(AmKey::Follow);
        // place 8 distinct marks by panning between them
        for i in 0..8 {
            r.am.vp.m_x = Fixed::from_int(100 + i * 10);
            r.tap(AmKey::Mark);
        }
        assert_eq!(r.am.marks().len(), 8);

        // four unbroken presses: one mark each
        for expect in [7, 6, 5, 4] {
            r.press(AmKey::ClearMark);
            assert_eq!(r.am.marks().len(), expect);
        }
        // fifth press of the same chord wipes the rest
        r.press(AmKey::ClearMark);
        assert!(r.am.marks().is_empty());
    }

    #[test]
    fn releasing_clear_key_ends_the_chord() {
        let mut r = rig();
        r.tap(AmKey::Follow);
        for i in 0..6 {
            r.am.vp.m_x = Fixed::from_int(100 + i * 10);
            r.tap(AmKey::Mark);
        }
        for expect in [5, 4, 3, 2, 1, 0] {
            r.tap(AmKey::ClearMark); // press+release every time
            assert_eq!(r.am.marks().len(), expect, "chord of one removes one");
        }
    }

    #[test]
    fn zoom_keys_set_reciprocal_multipliers() {
        let mut r = rig();
        assert!(r.press(AmKey::ZoomIn));
        assert!(r.am.vp.mtof_zoommul > FRACUNIT);
        assert!(r.am.vp.ftom_zoommul < FRACUNIT);
        r.release(AmKey::ZoomIn);
        assert_eq!(r.am.vp.mtof_zoommul, FRACUNIT);
        assert_eq!(r.am.vp.ftom_zoommul, FRACUNIT);
    }

    #[test]
    fn zoom_in_leaves_big_state() {
        let mut r = rig();
        r.tap(AmKey::GoBig);
        assert!(r.am.vp.big);
        r.press(AmKey::ZoomIn);
        assert!(!r.am.vp.big);
    }

    #[test]
    fn big_state_round_trip() {
        let mut r = rig();
        let before = (r.am.vp.m_w, r.am.vp.scale_mtof);
        r.tap(AmKey::GoBig);
        assert!(r.am.vp.big);
        assert_eq!(r.am.vp.scale_mtof, r.am.vp.bounds.min_scale_mtof);
        r.tap(AmKey::GoBig);
        assert!(!r.am.vp.big);
        assert_eq!(r.am.vp.m_w, before.0);
    }

    #[test]
    fn wheel_zoom_is_one_shot() {
        let mut r = rig();
        assert!(!r.send(AmEvent::WheelUp), "wheel reports unconsumed");
        assert!(r.am.vp.one_shot);
        assert!(r.am.vp.mtof_zoommul > FRACUNIT);
        r.am.ticker(&r.player.clone());
        assert_eq!(r.am.vp.mtof_zoommul, FRACUNIT);
    }

    #[test]
    fn gamepad_back_button_toggles() {
        let mut r = rig();
        let back = AmEvent::Gamepad(GamepadSnapshot {
            buttons: GamepadButtons::AUTOMAP,
            stick: Vec2::ZERO,
        });
        let none = AmEvent::Gamepad(GamepadSnapshot::default());
        r.send(back);
        assert!(!r.am.active);
        // still held: no re-trigger
        r.send(back);
        assert!(!r.am.active);
        r.send(none);
        r.send(back);
        assert!(r.am.active);
    }

    #[test]
    fn stick_pans_scale_with_deflection() {
        let mut r = rig();
        r.tap(AmKey::Follow);
        r.send(AmEvent::Gamepad(GamepadSnapshot {
            buttons: GamepadButtons::empty(),
            stick: Vec2::new(1.0, 0.0),
        }));
        let full = r.am.vp.pan_inc.x;
        r.send(AmEvent::Gamepad(GamepadSnapshot {
            buttons: GamepadButtons::empty(),
            stick: Vec2::new(0.5, 0.0),
        }));
        let half = r.am.vp.pan_inc.x;
        assert!(full > half && half > Fixed::ZERO);
        r.send(AmEvent::Gamepad(GamepadSnapshot {
            buttons: GamepadButtons::empty(),
            stick: Vec2::new(0.0, -1.0),
        }));
        assert!(r.am.vp.pan_inc.y < Fixed::ZERO);
    }
}
