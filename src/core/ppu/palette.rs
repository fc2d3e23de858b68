//! 系統調色板、調色板組與畫面調色板
//!
//! 顏色解析為三層間接查表：
//! `FramePalette` (4 組) -> `PaletteGroup` (4 個系統索引) -> `SystemPalette` (64 色)

use crate::core::error::{RangeError, Result, ShapeError};
use crate::core::ppu::types::Color;

pub const SYSTEM_COLOR_COUNT: usize = 64;
pub const GROUP_ENTRY_COUNT: usize = 4;
pub const FRAME_GROUP_COUNT: usize = 4;

/// 2C02 參考調色板
const NES_REFERENCE_PALETTE: [(u8, u8, u8); SYSTEM_COLOR_COUNT] = [
    (0x54, 0x54, 0x54), (0x00, 0x1E, 0x74), (0x08, 0x10, 0x90), (0x30, 0x00, 0x88),
    (0x44, 0x00, 0x64), (0x5C, 0x00, 0x30), (0x54, 0x04, 0x00), (0x3C, 0x18, 0x00),
    (0x20, 0x2A, 0x00), (0x08, 0x3A, 0x00), (0x00, 0x40, 0x00), (0x00, 0x3C, 0x00),
    (0x00, 0x32, 0x3C), (0x00, 0x00, 0x00), (0x00, 0x00, 0x00), (0x00, 0x00, 0x00),
    (0x98, 0x96, 0x98), (0x08, 0x4C, 0xC4), (0x30, 0x32, 0xEC), (0x5C, 0x1E, 0xE4),
    (0x88, 0x14, 0xB0), (0xA0, 0x14, 0x64), (0x98, 0x22, 0x20), (0x78, 0x3C, 0x00),
    (0x54, 0x5A, 0x00), (0x28, 0x72, 0x00), (0x08, 0x7C, 0x00), (0x00, 0x76, 0x28),
    (0x00, 0x66, 0x78), (0x00, 0x00, 0x00), (0x00, 0x00, 0x00), (0x00, 0x00, 0x00),
    (0xEC, 0xEE, 0xEC), (0x4C, 0x9A, 0xEC), (0x78, 0x7C, 0xEC), (0xB0, 0x62, 0xEC),
    (0xE4, 0x54, 0xEC), (0xEC, 0x58, 0xB4), (0xEC, 0x6A, 0x64), (0xD4, 0x88, 0x20),
    (0xA0, 0xAA, 0x00), (0x74, 0xC4, 0x00), (0x4C, 0xD0, 0x20), (0x38, 0xCC, 0x6C),
    (0x38, 0xB4, 0xCC), (0x3C, 0x3C, 0x3C), (0x00, 0x00, 0x00), (0x00, 0x00, 0x00),
    (0xEC, 0xEE, 0xEC), (0xA8, 0xCC, 0xEC), (0xBC, 0xBC, 0xEC), (0xD4, 0xB2, 0xEC),
    (0xEC, 0xAE, 0xEC), (0xEC, 0xAE, 0xD4), (0xEC, 0xB4, 0xB0), (0xE4, 0xC4, 0x90),
    (0xCC, 0xD2, 0x78), (0xB4, 0xDE, 0x78), (0xA8, 0xE2, 0x90), (0x98, 0xE2, 0xB4),
    (0xA0, 0xD6, 0xE4), (0xA0, 0xA2, 0xA0), (0x00, 0x00, 0x00), (0x00, 0x00, 0x00),
];

/// 全系統共用的 64 色表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPalette {
    colors: [Color; SYSTEM_COLOR_COUNT],
}

impl SystemPalette {
    pub fn new(colors: &[Color]) -> Result<Self> {
        ShapeError::check("system palette colors", SYSTEM_COLOR_COUNT, colors.len())?;
        let mut table = [Color::BLACK; SYSTEM_COLOR_COUNT];
        table.copy_from_slice(colors);
        Ok(SystemPalette { colors: table })
    }

    /// 由 64x3 bytes (R, G, B) 建立
    pub fn from_rgb_bytes(bytes: &[u8]) -> Result<Self> {
        ShapeError::check(
            "system palette bytes",
            SYSTEM_COLOR_COUNT * 3,
            bytes.len(),
        )?;
        let colors: Vec<Color> = bytes
            .chunks_exact(3)
            .map(|c| Color::rgb(c[0], c[1], c[2]))
            .collect();
        SystemPalette::new(&colors)
    }

    pub fn nes_reference() -> Self {
        SystemPalette {
            colors: NES_REFERENCE_PALETTE.map(Color::from),
        }
    }

    pub fn color(&self, index: usize) -> Result<Color> {
        let index = RangeError::check("system palette index", index, SYSTEM_COLOR_COUNT)?;
        Ok(self.colors[index])
    }
}

impl Default for SystemPalette {
    fn default() -> Self {
        Self::nes_reference()
    }
}

/// 4 個系統調色板索引；像素值 0~3 選擇其中一格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaletteGroup {
    indices: [u8; GROUP_ENTRY_COUNT],
}

impl PaletteGroup {
    pub fn new(indices: [u8; GROUP_ENTRY_COUNT]) -> Result<Self> {
        for &index in &indices {
            RangeError::check("palette group entry", index as usize, SYSTEM_COLOR_COUNT)?;
        }
        Ok(PaletteGroup { indices })
    }

    pub fn from_slice(indices: &[u8]) -> Result<Self> {
        ShapeError::check("palette group indices", GROUP_ENTRY_COUNT, indices.len())?;
        let mut group = [0u8; GROUP_ENTRY_COUNT];
        group.copy_from_slice(indices);
        PaletteGroup::new(group)
    }

    pub fn palette_index(&self, slot: usize) -> Result<usize> {
        let slot = RangeError::check("palette group slot", slot, GROUP_ENTRY_COUNT)?;
        Ok(self.indices[slot] as usize)
    }
}

/// 一個畫面可用的 4 組調色板 (背景與精靈各一份)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FramePalette {
    groups: [PaletteGroup; FRAME_GROUP_COUNT],
}

impl FramePalette {
    pub fn new(groups: &[PaletteGroup]) -> Result<Self> {
        ShapeError::check("frame palette groups", FRAME_GROUP_COUNT, groups.len())?;
        let mut table = [PaletteGroup::default(); FRAME_GROUP_COUNT];
        table.copy_from_slice(groups);
        Ok(FramePalette { groups: table })
    }

    /// 由 16 個系統索引 (4 組 x 4 格) 建立
    pub fn from_indices(indices: &[u8]) -> Result<Self> {
        ShapeError::check(
            "frame palette indices",
            FRAME_GROUP_COUNT * GROUP_ENTRY_COUNT,
            indices.len(),
        )?;
        let groups = indices
            .chunks_exact(GROUP_ENTRY_COUNT)
            .map(PaletteGroup::from_slice)
            .collect::<Result<Vec<_>>>()?;
        FramePalette::new(&groups)
    }

    pub fn group(&self, index: usize) -> Result<&PaletteGroup> {
        let index = RangeError::check("frame palette group", index, FRAME_GROUP_COUNT)?;
        Ok(&self.groups[index])
    }

    /// 完整解析：組 -> 格 -> 系統色
    pub fn resolve(&self, system: &SystemPalette, group: usize, slot: usize) -> Result<Color> {
        let index = self.group(group)?.palette_index(slot)?;
        system.color(index)
    }
}
