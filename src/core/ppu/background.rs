//! 背景名稱表與捲動用的 2x2 背景配置

use serde::{Deserialize, Serialize};

use crate::core::error::{RangeError, Result, ShapeError};

pub const TILE_COUNT_X: usize = 32;
pub const TILE_COUNT_Y: usize = 30;
pub const TILE_COUNT: usize = TILE_COUNT_X * TILE_COUNT_Y;

/// meta-tile 為 2x2 tiles
pub const META_TILE_SIZE: usize = 2;
pub const META_TILE_COUNT_X: usize = TILE_COUNT_X.div_ceil(META_TILE_SIZE);
pub const META_TILE_COUNT_Y: usize = TILE_COUNT_Y.div_ceil(META_TILE_SIZE);

/// block 為 4x4 tiles (2x2 meta-tiles)，共用一個屬性 byte
pub const BLOCK_SIZE: usize = 4;
pub const BLOCK_COUNT_X: usize = META_TILE_COUNT_X.div_ceil(2);
pub const BLOCK_COUNT_Y: usize = META_TILE_COUNT_Y.div_ceil(2);
pub const BLOCK_COUNT: usize = BLOCK_COUNT_X * BLOCK_COUNT_Y;

/// 每個 meta-tile 2 bits，所以一個 block 一個 byte
pub const PACKED_ATTRIBUTE_BYTE_COUNT: usize = BLOCK_COUNT;
pub const NAME_TABLE_BYTE_COUNT: usize = TILE_COUNT + PACKED_ATTRIBUTE_BYTE_COUNT;

/// 一整個畫面的背景：每個 tile 的 pattern id + 每個 block 的調色板組選擇
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTable {
    pattern_indices: Box<[u8; TILE_COUNT]>,
    attributes: [u8; PACKED_ATTRIBUTE_BYTE_COUNT],
}

impl NameTable {
    pub fn new(pattern_indices: &[u8], packed_attributes: &[u8]) -> Result<Self> {
        ShapeError::check("pattern table indexes", TILE_COUNT, pattern_indices.len())?;
        ShapeError::check(
            "packed attribute bytes",
            PACKED_ATTRIBUTE_BYTE_COUNT,
            packed_attributes.len(),
        )?;

        let mut indices = Box::new([0u8; TILE_COUNT]);
        indices.copy_from_slice(pattern_indices);
        let mut attributes = [0u8; PACKED_ATTRIBUTE_BYTE_COUNT];
        attributes.copy_from_slice(packed_attributes);

        Ok(NameTable {
            pattern_indices: indices,
            attributes,
        })
    }

    /// 960 bytes 版面 + 64 bytes 屬性
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ShapeError::check("name table bytes", NAME_TABLE_BYTE_COUNT, bytes.len())?;
        let (layout, attributes) = bytes.split_at(TILE_COUNT);
        NameTable::new(layout, attributes)
    }

    fn check_tile(tile_x: usize, tile_y: usize) -> Result<()> {
        RangeError::check("tile x", tile_x, TILE_COUNT_X)?;
        RangeError::check("tile y", tile_y, TILE_COUNT_Y)?;
        Ok(())
    }

    /// tile 座標的平坦索引
    pub fn tile_index(&self, tile_x: usize, tile_y: usize) -> Result<usize> {
        Self::check_tile(tile_x, tile_y)?;
        Ok(tile_y * TILE_COUNT_X + tile_x)
    }

    pub fn pattern_table_index(&self, tile_x: usize, tile_y: usize) -> Result<u8> {
        let index = self.tile_index(tile_x, tile_y)?;
        Ok(self.pattern_indices[index])
    }

    /// tile 所屬 block 的索引，也就是屬性 byte 的位置
    pub fn block_index(&self, tile_x: usize, tile_y: usize) -> Result<usize> {
        Self::check_tile(tile_x, tile_y)?;
        Ok((tile_y / BLOCK_SIZE) * BLOCK_COUNT_X + tile_x / BLOCK_SIZE)
    }

    /// block 內的 meta-tile 編號：0 左上、1 右上、2 左下、3 右下
    pub fn block_local_meta_tile_index(&self, tile_x: usize, tile_y: usize) -> Result<usize> {
        Self::check_tile(tile_x, tile_y)?;
        let local_x = (tile_x / META_TILE_SIZE) % 2;
        let local_y = (tile_y / META_TILE_SIZE) % 2;
        Ok(local_y * (BLOCK_SIZE / META_TILE_SIZE) + local_x)
    }

    /// 從 block 屬性 byte 取出此 tile 的 2-bit 調色板組
    pub fn palette_group_index(&self, tile_x: usize, tile_y: usize) -> Result<usize> {
        let block = self.block_index(tile_x, tile_y)?;
        let meta_tile = self.block_local_meta_tile_index(tile_x, tile_y)?;
        let shift = meta_tile * 2;
        Ok(((self.attributes[block] >> shift) & 0b11) as usize)
    }
}

impl Default for NameTable {
    fn default() -> Self {
        NameTable {
            pattern_indices: Box::new([0u8; TILE_COUNT]),
            attributes: [0u8; PACKED_ATTRIBUTE_BYTE_COUNT],
        }
    }
}

/// 名稱表在 2x2 邏輯背景格中的排列方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mirroring {
    /// 1 張表，四格都指向它 (不捲動的簡易版本)
    #[default]
    SingleScreen,
    /// 2 張表，左右排列 [A, B, A, B]
    Vertical,
    /// 2 張表，上下排列 [A, A, B, B]
    Horizontal,
    /// 2 張表，對角排列 [A, B, B, A]
    Diagonal,
    /// 4 張表依序排列
    FourScreen,
}

impl Mirroring {
    pub fn table_count(&self) -> usize {
        match self {
            Mirroring::SingleScreen => 1,
            Mirroring::Vertical | Mirroring::Horizontal | Mirroring::Diagonal => 2,
            Mirroring::FourScreen => 4,
        }
    }

    /// 格位 (vertical << 1 | horizontal) 對應的名稱表
    fn slots(&self) -> [usize; 4] {
        match self {
            Mirroring::SingleScreen => [0, 0, 0, 0],
            Mirroring::Vertical => [0, 1, 0, 1],
            Mirroring::Horizontal => [0, 0, 1, 1],
            Mirroring::Diagonal => [0, 1, 1, 0],
            Mirroring::FourScreen => [0, 1, 2, 3],
        }
    }
}

/// 2x2 邏輯背景格，用於環繞捲動
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundLayout {
    tables: Vec<NameTable>,
    mirroring: Mirroring,
    slots: [usize; 4],
}

impl BackgroundLayout {
    pub fn new(tables: Vec<NameTable>, mirroring: Mirroring) -> Result<Self> {
        ShapeError::check("name tables", mirroring.table_count(), tables.len())?;
        log::debug!(
            "background layout: {} name table(s), {:?} mirroring",
            tables.len(),
            mirroring
        );
        Ok(BackgroundLayout {
            tables,
            mirroring,
            slots: mirroring.slots(),
        })
    }

    pub fn single(table: NameTable) -> Self {
        BackgroundLayout {
            tables: vec![table],
            mirroring: Mirroring::SingleScreen,
            slots: Mirroring::SingleScreen.slots(),
        }
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    /// 依格位 (0..4) 取得名稱表
    pub fn table_at(&self, slot: usize) -> Result<&NameTable> {
        let slot = RangeError::check("background slot", slot, self.slots.len())?;
        Ok(&self.tables[self.slots[slot]])
    }

    pub fn tables(&self) -> &[NameTable] {
        &self.tables
    }
}
