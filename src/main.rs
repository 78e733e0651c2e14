//! Interactive automap viewer over the built-in sample level.
//!
//! ```bash
//! cargo run --release -- --width 1024 --height 640
//! ```
//!
//! WASD walks the player around (no collision, it is a map demo);
//! Tab toggles the automap, arrows pan, +/- zoom, 0 goes big,
//! F follow, G grid, R rotate, M mark, C clear marks, Shift speeds up.

use anyhow::Context;
use clap::Parser;
use glam::Vec2;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use yamap_rs::automap::{AmEvent, AmKey, Automap, ColorTables, Mods};
use yamap_rs::player::{Cheats, Notifier, Player};
use yamap_rs::render::{Frame, Palette};
use yamap_rs::units::{Angle, Fixed, MapPoint};
use yamap_rs::world::{PLAYER_START, reveal_around, sample_level};

const SIM_FPS: usize = 35;
const DT: f32 = 1.0 / SIM_FPS as f32;
const MOVE_SPEED: f32 = 250.0; // map-units / second
const TURN_RATE: f32 = std::f32::consts::PI; // rad / second
const REVEAL_RADIUS: i32 = 320; // map units of "seen" geometry per tic

#[derive(Parser)]
#[command(name = "automap", about = "Vector automap demo")]
struct Args {
    /// Window and framebuffer width
    #[arg(long, default_value_t = 1024)]
    width: usize,

    /// Window and framebuffer height
    #[arg(long, default_value_t = 640)]
    height: usize,

    /// Start with the grid on
    #[arg(long)]
    grid: bool,

    /// Give the player the all-map power
    #[arg(long)]
    allmap: bool,

    /// Enable the all-map-things cheat (shows things and cheat arrow)
    #[arg(long)]
    cheat: bool,
}

struct Stdout;

impl Notifier for Stdout {
    fn message(&mut self, text: String) {
        println!("[automap] {text}");
    }
}

/// Physical-to-logical key table; everything else falls through.
const BINDINGS: [(Key, AmKey); 13] = [
    (Key::Tab, AmKey::Toggle),
    (Key::Right, AmKey::PanRight),
    (Key::Left, AmKey::PanLeft),
    (Key::Up, AmKey::PanUp),
    (Key::Down, AmKey::PanDown),
    (Key::Equal, AmKey::ZoomIn),
    (Key::Minus, AmKey::ZoomOut),
    (Key::Key0, AmKey::GoBig),
    (Key::F, AmKey::Follow),
    (Key::G, AmKey::Grid),
    (Key::M, AmKey::Mark),
    (Key::C, AmKey::ClearMark),
    (Key::R, AmKey::Rotate),
];

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut level = sample_level();
    level.validate().context("sample level is broken")?;

    let palette = Palette::builtin();
    let mut am = Automap::new(args.width as i32, args.height as i32, ColorTables::build(&palette));
    am.set_grid(args.grid);
    let mut frame = Frame::new(args.width, args.height);
    let mut notifier = Stdout;

    /* ------------------------- player state -------------------------- */
    let mut pos = Vec2::new(
        PLAYER_START.x.to_f64() as f32,
        PLAYER_START.y.to_f64() as f32,
    );
    let mut heading = 0.0_f32; // radians, 0 = east

    let player_view = |pos: Vec2, heading: f32, args: &Args| Player {
        pos: MapPoint::new(
            Fixed::from_f64(pos.x as f64),
            Fixed::from_f64(pos.y as f64),
        ),
        angle: Angle::from_radians(heading as f64),
        health: 100,
        allmap: if args.allmap { i32::MAX } else { 0 },
        invisibility: 0,
        cheats: if args.cheat {
            Cheats::ALLMAP_THINGS
        } else {
            Cheats::empty()
        },
    };

    let mut win = Window::new(
        "yamap",
        args.width,
        args.height,
        WindowOptions::default(),
    )?;
    win.set_target_fps(SIM_FPS);

    println!("Tab opens the automap. WASD walks.");

    let mut out = vec![0u32; args.width * args.height];
    let mut was_down = [false; BINDINGS.len()];
    let mut player = player_view(pos, heading, &args);

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let mods = Mods {
            shift: win.is_key_down(Key::LeftShift) || win.is_key_down(Key::RightShift),
            alt: win.is_key_down(Key::LeftAlt) || win.is_key_down(Key::RightAlt),
        };

        /* ------------------ automap events ---------------------------- */
        for (i, &(mk, amk)) in BINDINGS.iter().enumerate() {
            // repeat-on: held toggle keys re-fire, the responder's
            // last-key-down tracking keeps them from bouncing
            if win.is_key_pressed(mk, KeyRepeat::Yes) {
                am.respond(&AmEvent::KeyDown(amk), mods, &level, &player, &mut notifier);
            }
            let down = win.is_key_down(mk);
            if was_down[i] && !down {
                am.respond(&AmEvent::KeyUp(amk), mods, &level, &player, &mut notifier);
            }
            was_down[i] = down;
        }

        if let Some((_, sy)) = win.get_scroll_wheel() {
            let ev = if sy > 0.0 {
                Some(AmEvent::WheelUp)
            } else if sy < 0.0 {
                Some(AmEvent::WheelDown)
            } else {
                None
            };
            if let Some(ev) = ev {
                am.respond(&ev, mods, &level, &player, &mut notifier);
            }
        }
        /* ------------------ walk the player --------------------------- */
        let run = if mods.shift { 1.5 } else { 1.0 };
        let mut forward = 0.0;
        if win.is_key_down(Key::W) {
            forward += 1.0;
        }
        if win.is_key_down(Key::S) {
            forward -= 1.0;
        }
        if win.is_key_down(Key::A) {
            heading = (heading + TURN_RATE * DT).rem_euclid(std::f32::consts::TAU);
        }
        if win.is_key_down(Key::D) {
            heading = (heading - TURN_RATE * DT).rem_euclid(std::f32::consts::TAU);
        }
        if forward != 0.0 {
            let (s, c) = heading.sin_cos();
            pos += Vec2::new(c, s) * forward * MOVE_SPEED * run * DT;
        }

        player = player_view(pos, heading, &args);
        reveal_around(&mut level, player.pos, Fixed::from_int(REVEAL_RADIUS));

        /* ------------------ tick + draw ------------------------------- */
        am.ticker(&player);

        if am.active {
            am.draw(&mut frame, &level, &player);
            for (dst, &idx) in out.iter_mut().zip(frame.pixels.iter()) {
                *dst = palette[idx as usize];
            }
        } else {
            // stand-in for the first-person view
            out.fill(0xFF_20_20_20);
        }

        win.update_with_buffer(&out, args.width, args.height)?;
    }
    Ok(())
}
