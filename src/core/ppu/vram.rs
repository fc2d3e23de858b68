//! PPU 影像資料：把外部載入器提供的原始 byte buffer 解成固定容量的表格

use crate::core::error::{Result, ShapeError};
use crate::core::ppu::background::{BackgroundLayout, Mirroring, NameTable};
use crate::core::ppu::palette::{
    FramePalette, SystemPalette, FRAME_GROUP_COUNT, GROUP_ENTRY_COUNT,
};
use crate::core::ppu::sprite::ObjectTable;
use crate::core::ppu::tile::{PatternTable, PATTERN_TILE_COUNT, TILE_BYTE_COUNT};

pub const CHR_BANK_BYTE_COUNT: usize = PATTERN_TILE_COUNT * TILE_BYTE_COUNT;
pub const CHR_BYTE_COUNT: usize = CHR_BANK_BYTE_COUNT * 2;
/// 背景 16 個索引 + 精靈 16 個索引
pub const FRAME_PALETTE_BYTE_COUNT: usize = FRAME_GROUP_COUNT * GROUP_ENTRY_COUNT * 2;

/// 把 8KB CHR 切成兩個 bank：前 4KB 為精靈，後 4KB 為背景
pub fn split_chr_banks(chr: &[u8]) -> Result<(PatternTable, PatternTable)> {
    ShapeError::check("chr bytes", CHR_BYTE_COUNT, chr.len())?;
    let (sprite_bank, background_bank) = chr.split_at(CHR_BANK_BYTE_COUNT);
    let sprite_tiles = PatternTable::from_chr_bytes(sprite_bank)?;
    let background_tiles = PatternTable::from_chr_bytes(background_bank)?;
    Ok((sprite_tiles, background_tiles))
}

/// 外部載入器提供的原始資料
#[derive(Debug, Clone, Copy)]
pub struct RawVideoData<'a> {
    /// 64 x 3 bytes RGB
    pub system_palette: &'a [u8],
    /// 8KB CHR (精靈 bank + 背景 bank)
    pub chr: &'a [u8],
    /// 32 個系統調色板索引：前 16 個給背景，後 16 個給精靈
    pub frame_palettes: &'a [u8],
    /// 每張 1024 bytes (960 版面 + 64 屬性)
    pub name_tables: &'a [&'a [u8]],
    /// 64 x 4 bytes OAM
    pub oam: &'a [u8],
}

/// 一個畫面所需的全部表格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoTables {
    pub system_palette: SystemPalette,
    pub background_tiles: PatternTable,
    pub sprite_tiles: PatternTable,
    pub background_palette: FramePalette,
    pub sprite_palette: FramePalette,
    pub backgrounds: BackgroundLayout,
    pub sprites: ObjectTable,
}

impl VideoTables {
    pub fn decode(raw: &RawVideoData<'_>, mirroring: Mirroring) -> Result<Self> {
        let system_palette = SystemPalette::from_rgb_bytes(raw.system_palette)?;
        let (sprite_tiles, background_tiles) = split_chr_banks(raw.chr)?;

        ShapeError::check(
            "frame palette bytes",
            FRAME_PALETTE_BYTE_COUNT,
            raw.frame_palettes.len(),
        )?;
        let (background_indices, sprite_indices) =
            raw.frame_palettes.split_at(FRAME_PALETTE_BYTE_COUNT / 2);
        let background_palette = FramePalette::from_indices(background_indices)?;
        let sprite_palette = FramePalette::from_indices(sprite_indices)?;

        let tables = raw
            .name_tables
            .iter()
            .map(|bytes| NameTable::from_bytes(bytes))
            .collect::<Result<Vec<_>>>()?;
        let backgrounds = BackgroundLayout::new(tables, mirroring)?;

        let sprites = ObjectTable::from_bytes(raw.oam)?;

        log::debug!(
            "video tables decoded: {} name table(s), {} chr bytes",
            raw.name_tables.len(),
            raw.chr.len()
        );

        Ok(VideoTables {
            system_palette,
            background_tiles,
            sprite_tiles,
            background_palette,
            sprite_palette,
            backgrounds,
            sprites,
        })
    }
}
