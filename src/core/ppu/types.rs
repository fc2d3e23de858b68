//! PPU 共用型別

use serde::{Deserialize, Serialize};

use crate::core::error::{RangeError, Result};

/// 畫面緩衝區大小 (NES: 256x240)
pub const SCREEN_WIDTH: usize = 256;
pub const SCREEN_HEIGHT: usize = 240;
pub const PIXEL_COUNT: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// 具體 RGB 顏色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::rgb(r, g, b)
    }
}

/// 一整個畫面的顏色陣列，row-major，原點在左上角
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pixels: Vec<Color>,
}

impl Frame {
    pub fn new() -> Self {
        Frame {
            pixels: vec![Color::BLACK; PIXEL_COUNT],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Result<Color> {
        let x = RangeError::check("frame x", x, SCREEN_WIDTH)?;
        let y = RangeError::check("frame y", y, SCREEN_HEIGHT)?;
        Ok(self.pixels[y * SCREEN_WIDTH + x])
    }

    /// 取得一條掃描線
    pub fn row(&self, y: usize) -> Result<&[Color]> {
        let y = RangeError::check("frame y", y, SCREEN_HEIGHT)?;
        Ok(&self.pixels[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH])
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [Color] {
        &mut self.pixels[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// 打包成 RGB24 位元組 (每像素 3 bytes)
    pub fn to_rgb24(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| [c.r, c.g, c.b])
            .collect()
    }

    /// 打包成 RGBA8888 位元組，alpha 固定 0xFF
    pub fn to_rgba32(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| [c.r, c.g, c.b, 0xFF])
            .collect()
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_dimensions_and_bounds() {
        let frame = Frame::new();
        assert_eq!(frame.pixels().len(), 256 * 240);
        assert_eq!(frame.get(255, 239).unwrap(), Color::BLACK);
        assert!(frame.get(256, 0).is_err());
        assert!(frame.get(0, 240).is_err());
        assert!(frame.row(240).is_err());
    }

    #[test]
    fn test_frame_packing() {
        let mut frame = Frame::new();
        frame.fill(Color::rgb(1, 2, 3));
        frame.row_mut(0)[1] = Color::rgb(9, 8, 7);
        let rgb = frame.to_rgb24();
        assert_eq!(rgb.len(), PIXEL_COUNT * 3);
        assert_eq!(&rgb[0..6], &[1, 2, 3, 9, 8, 7]);
        let rgba = frame.to_rgba32();
        assert_eq!(rgba.len(), PIXEL_COUNT * 4);
        assert_eq!(&rgba[4..8], &[9, 8, 7, 0xFF]);
        assert_eq!(frame.row(0).unwrap()[1], Color::rgb(9, 8, 7));
    }
}
