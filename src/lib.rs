//! NES 風格 tile 式畫面產生器

pub mod core;

pub use crate::core::config::RenderConfig;
pub use crate::core::error::{Error, Result};
pub use crate::core::ppu::background::{BackgroundLayout, Mirroring, NameTable};
pub use crate::core::ppu::display::{frame_exchange, FramePresenter, FramePublisher, FrameReceiver};
pub use crate::core::ppu::palette::{FramePalette, PaletteGroup, SystemPalette};
pub use crate::core::ppu::pixel::SpritePriorityMode;
pub use crate::core::ppu::sprite::{ObjectTable, SpriteId};
pub use crate::core::ppu::tile::{PatternTable, Tile};
pub use crate::core::ppu::types::{Color, Frame, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use crate::core::ppu::vram::{RawVideoData, VideoTables};
pub use crate::core::ppu::PictureProcessor;
pub use crate::core::utils::logger::{FrameObserver, FrameStats, LogObserver, NullObserver};
