//! Framebuffer-side collaborators: the indexed frame the automap draws
//! into and the palette used to present it.

mod frame;
mod palette;

pub use frame::Frame;
pub use palette::Palette;
