//! PPU：由固定容量表格合成 256x240 畫面

pub mod background;
pub mod display;
pub mod palette;
pub mod pixel;
pub mod ppu;
pub mod sprite;
pub mod tile;
pub mod types;
pub mod vram;

pub use ppu::PictureProcessor;
