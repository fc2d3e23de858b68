//! 精靈屬性表 (OAM) 與掃描線精靈選擇

use bitflags::bitflags;

use crate::core::error::{RangeError, Result, ShapeError};
use crate::core::ppu::tile::{TILE_HEIGHT, TILE_WIDTH};

pub const SPRITE_COUNT: usize = 64;
pub const ATTRIBUTE_SIZE: usize = 4;
pub const OAM_BYTE_COUNT: usize = SPRITE_COUNT * ATTRIBUTE_SIZE;
/// 每條掃描線最多 8 個精靈
pub const MAX_SPRITES_PER_SCANLINE: usize = 8;
pub const SPRITE_HEIGHT: usize = TILE_HEIGHT;

bitflags! {
    /// 屬性 byte (byte 2)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SpriteFlags: u8 {
        const PALETTE = 0b0000_0011;
        const BEHIND_BACKGROUND = 1 << 5;
        const FLIP_HORIZONTAL = 1 << 6;
        const FLIP_VERTICAL = 1 << 7;
    }
}

impl SpriteFlags {
    pub fn palette_group(&self) -> usize {
        (self.bits() & Self::PALETTE.bits()) as usize
    }
}

/// OAM 編號，只能由 `SpriteId::new` 以合法範圍建立
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpriteId(u8);

impl SpriteId {
    pub fn new(id: usize) -> Result<Self> {
        let id = RangeError::check("sprite id", id, SPRITE_COUNT)?;
        Ok(SpriteId(id as u8))
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// 一筆 4 bytes 的精靈屬性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpriteAttribute {
    pub y: u8,
    pub tile: u8,
    pub flags: SpriteFlags,
    pub x: u8,
}

impl SpriteAttribute {
    pub fn from_bytes(bytes: [u8; ATTRIBUTE_SIZE]) -> Self {
        SpriteAttribute {
            y: bytes[0],
            tile: bytes[1],
            flags: SpriteFlags::from_bits_retain(bytes[2]),
            x: bytes[3],
        }
    }

    /// 精靈是否覆蓋掃描線 y：`y - 8 < sprite_y <= y`
    pub fn covers_scanline(&self, y: usize) -> bool {
        let top = self.y as usize;
        top <= y && top + SPRITE_HEIGHT > y
    }

    /// 精靈是否覆蓋欄 x：`x - 8 < sprite_x <= x`
    pub fn covers_column(&self, x: usize) -> bool {
        let left = self.x as usize;
        left <= x && left + TILE_WIDTH > x
    }
}

/// 一條掃描線上選中的精靈，固定 8 格，未使用的格為 `None`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanlineSprites {
    slots: [Option<SpriteId>; MAX_SPRITES_PER_SCANLINE],
    overflowed: bool,
}

impl ScanlineSprites {
    pub fn slots(&self) -> &[Option<SpriteId>; MAX_SPRITES_PER_SCANLINE] {
        &self.slots
    }

    /// 依 OAM 順序列出已佔用的格
    pub fn iter(&self) -> impl Iterator<Item = SpriteId> + '_ {
        self.slots.iter().map_while(|slot| *slot)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots[0].is_none()
    }

    /// 是否有超過 8 個精靈符合條件 (第 9 個之後被丟棄)
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }
}

/// OAM：64 筆精靈屬性
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectTable {
    attributes: [SpriteAttribute; SPRITE_COUNT],
}

impl ObjectTable {
    /// 每筆必須剛好 4 bytes
    pub fn new(attributes: &[[u8; ATTRIBUTE_SIZE]]) -> Result<Self> {
        ShapeError::check("sprite attributes", SPRITE_COUNT, attributes.len())?;
        let mut table = [SpriteAttribute::default(); SPRITE_COUNT];
        for (slot, bytes) in table.iter_mut().zip(attributes) {
            *slot = SpriteAttribute::from_bytes(*bytes);
        }
        Ok(ObjectTable { attributes: table })
    }

    /// 64x4 bytes 的原始 OAM
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ShapeError::check("sprite attribute bytes", OAM_BYTE_COUNT, bytes.len())?;
        let records: Vec<[u8; ATTRIBUTE_SIZE]> = bytes
            .chunks_exact(ATTRIBUTE_SIZE)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();
        ObjectTable::new(&records)
    }

    /// 掃描全部 64 筆，依編號由小到大保留前 8 個覆蓋 y 的精靈
    pub fn objects_on_scanline(&self, y: usize) -> ScanlineSprites {
        let mut selected = ScanlineSprites::default();
        let mut count = 0;

        for (id, attribute) in self.attributes.iter().enumerate() {
            if !attribute.covers_scanline(y) {
                continue;
            }
            if count == MAX_SPRITES_PER_SCANLINE {
                selected.overflowed = true;
                break;
            }
            selected.slots[count] = Some(SpriteId(id as u8));
            count += 1;
        }

        selected
    }

    pub fn attribute(&self, id: SpriteId) -> &SpriteAttribute {
        &self.attributes[id.index()]
    }

    pub fn x(&self, id: SpriteId) -> u8 {
        self.attribute(id).x
    }

    pub fn y(&self, id: SpriteId) -> u8 {
        self.attribute(id).y
    }

    pub fn pattern_table_index(&self, id: SpriteId) -> u8 {
        self.attribute(id).tile
    }

    pub fn palette_group_index(&self, id: SpriteId) -> usize {
        self.attribute(id).flags.palette_group()
    }

    pub fn is_flipped_horizontal(&self, id: SpriteId) -> bool {
        self.attribute(id).flags.contains(SpriteFlags::FLIP_HORIZONTAL)
    }

    pub fn is_flipped_vertical(&self, id: SpriteId) -> bool {
        self.attribute(id).flags.contains(SpriteFlags::FLIP_VERTICAL)
    }

    pub fn is_behind_background(&self, id: SpriteId) -> bool {
        self.attribute(id).flags.contains(SpriteFlags::BEHIND_BACKGROUND)
    }
}

impl Default for ObjectTable {
    fn default() -> Self {
        ObjectTable {
            attributes: [SpriteAttribute::default(); SPRITE_COUNT],
        }
    }
}
