//! yamap_rs - a real-time vector automap.
//!
//! Top-down, scrollable/zoomable/rotatable rendering of explored level
//! geometry into an 8-bit indexed framebuffer. The crate is the map
//! subsystem only: level data, the tracked player and the window/pal
//! pipeline are collaborators fed in from outside.
//!
//! ```no_run
//! use yamap_rs::automap::{Automap, ColorTables};
//! use yamap_rs::player::{NullNotifier, Player};
//! use yamap_rs::render::{Frame, Palette};
//! use yamap_rs::world::sample_level;
//!
//! let level = sample_level();
//! let palette = Palette::builtin();
//! let mut am = Automap::new(320, 200, ColorTables::build(&palette));
//! let player = Player::default();
//!
//! am.start(&level, &player);
//! let mut frame = Frame::new(320, 200);
//! am.ticker(&player);                    // once per game tick
//! am.draw(&mut frame, &level, &player);  // once per video frame
//! ```

pub mod automap;
pub mod player;
pub mod render;
pub mod units;
pub mod world;
