pub mod config;
pub mod error;
pub mod ppu;
pub mod utils;
