//! PPU Tile 處理

use crate::core::error::{RangeError, Result, ShapeError};

/// Tile 為 8x8 像素，每像素 2 bits
pub const TILE_WIDTH: usize = 8;
pub const TILE_HEIGHT: usize = 8;
pub const PLANE_BYTE_COUNT: usize = TILE_WIDTH * TILE_HEIGHT / 8;
/// 一個 tile 在 CHR 資料中佔用的位元組數 (低平面 + 高平面)
pub const TILE_BYTE_COUNT: usize = PLANE_BYTE_COUNT * 2;

/// 由兩個 bit-plane 組成的 tile，每一列一個 byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tile {
    low: [u8; PLANE_BYTE_COUNT],
    high: [u8; PLANE_BYTE_COUNT],
}

impl Tile {
    pub fn new(packed_low: &[u8], packed_high: &[u8]) -> Result<Self> {
        ShapeError::check("packed low bytes", PLANE_BYTE_COUNT, packed_low.len())?;
        ShapeError::check("packed high bytes", PLANE_BYTE_COUNT, packed_high.len())?;

        let mut tile = Tile::default();
        tile.low.copy_from_slice(packed_low);
        tile.high.copy_from_slice(packed_high);
        Ok(tile)
    }

    pub const fn from_planes(low: [u8; PLANE_BYTE_COUNT], high: [u8; PLANE_BYTE_COUNT]) -> Self {
        Tile { low, high }
    }

    /// 解析 NES CHR 格式：前 8 bytes 為低平面，後 8 bytes 為高平面
    pub fn from_chr(bytes: &[u8]) -> Result<Self> {
        ShapeError::check("tile bytes", TILE_BYTE_COUNT, bytes.len())?;
        let (low, high) = bytes.split_at(PLANE_BYTE_COUNT);
        Tile::new(low, high)
    }

    /// 取得像素值 (0~3)；0 的意義由背景/精靈端決定
    pub fn pixel_value(&self, x: usize, y: usize) -> Result<u8> {
        let x = RangeError::check("tile pixel x", x, TILE_WIDTH)?;
        let y = RangeError::check("tile pixel y", y, TILE_HEIGHT)?;

        let bit_index = 7 - x;
        let low_bit = (self.low[y] >> bit_index) & 0x01;
        let high_bit = (self.high[y] >> bit_index) & 0x01;
        Ok((high_bit << 1) | low_bit)
    }

    pub fn low_plane(&self) -> &[u8; PLANE_BYTE_COUNT] {
        &self.low
    }

    pub fn high_plane(&self) -> &[u8; PLANE_BYTE_COUNT] {
        &self.high
    }
}

pub const PATTERN_TILE_COUNT: usize = 256;

/// 256 個 tile 的圖樣表，以一個 byte 索引
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTable {
    tiles: Box<[Tile; PATTERN_TILE_COUNT]>,
}

impl PatternTable {
    pub fn new(tiles: &[Tile]) -> Result<Self> {
        ShapeError::check("pattern table tiles", PATTERN_TILE_COUNT, tiles.len())?;
        let mut table = Box::new([Tile::default(); PATTERN_TILE_COUNT]);
        table.copy_from_slice(tiles);
        Ok(PatternTable { tiles: table })
    }

    /// 256 x 16 bytes 的 CHR 資料
    pub fn from_chr_bytes(bytes: &[u8]) -> Result<Self> {
        ShapeError::check(
            "pattern table bytes",
            PATTERN_TILE_COUNT * TILE_BYTE_COUNT,
            bytes.len(),
        )?;
        let tiles = bytes
            .chunks_exact(TILE_BYTE_COUNT)
            .map(Tile::from_chr)
            .collect::<Result<Vec<_>>>()?;
        PatternTable::new(&tiles)
    }

    /// 以 `usize` 索引取得 tile，超出 0..256 回傳錯誤
    pub fn tile(&self, index: usize) -> Result<&Tile> {
        let index = RangeError::check("pattern table index", index, PATTERN_TILE_COUNT)?;
        Ok(&self.tiles[index])
    }

    /// 名稱表與 OAM 內的 pattern id 皆為 u8，不可能越界
    pub fn tile_by_id(&self, id: u8) -> &Tile {
        &self.tiles[id as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tile() -> Tile {
        let low = [
            0b1000_0000,
            0b0000_0000,
            0b0000_0000,
            0b0000_0000,
            0b0000_0010,
            0b0000_0000,
            0b0000_0000,
            0b0000_0000,
        ];
        let high = [
            0b0000_0000,
            0b0000_0000,
            0b0000_0000,
            0b0100_0000,
            0b0000_0000,
            0b0000_0000,
            0b0000_0000,
            0b0000_0001,
        ];
        Tile::new(&low, &high).unwrap()
    }

    #[test]
    fn test_tile_rejects_wrong_plane_lengths() {
        assert!(Tile::new(&[0; 7], &[0; 8]).is_err());
        assert!(Tile::new(&[0; 8], &[0; 7]).is_err());
        assert!(Tile::new(&[0; 9], &[0; 8]).is_err());
        assert!(Tile::new(&[0; 8], &[0; 9]).is_err());
        assert!(Tile::new(&[0; 8], &[0; 8]).is_ok());
    }

    #[test]
    fn test_tile_pixel_values() {
        let tile = sample_tile();
        assert_eq!(tile.pixel_value(0, 0).unwrap(), 0b01);
        assert_eq!(tile.pixel_value(7, 7).unwrap(), 0b10);
        assert_eq!(tile.pixel_value(1, 3).unwrap(), 0b10);
        assert_eq!(tile.pixel_value(6, 4).unwrap(), 0b01);
        assert_eq!(tile.pixel_value(3, 3).unwrap(), 0);
    }

    #[test]
    fn test_tile_pixel_out_of_range() {
        let tile = sample_tile();
        assert!(tile.pixel_value(8, 0).is_err());
        assert!(tile.pixel_value(0, 8).is_err());
    }

    #[test]
    fn test_every_pixel_is_two_bits() {
        let tile = Tile::from_planes([0xA5; 8], [0x3C; 8]);
        for y in 0..TILE_HEIGHT {
            for x in 0..TILE_WIDTH {
                assert!(tile.pixel_value(x, y).unwrap() <= 3);
            }
        }
        // 全 1 的兩個平面每個像素都是 3
        let solid = Tile::from_planes([0xFF; 8], [0xFF; 8]);
        assert_eq!(solid.pixel_value(4, 4).unwrap(), 3);
    }

    #[test]
    fn test_tile_from_chr_layout() {
        let mut bytes = [0u8; 16];
        bytes[0] = 0x80; // 低平面第 0 列
        bytes[8 + 2] = 0x01; // 高平面第 2 列
        let tile = Tile::from_chr(&bytes).unwrap();
        assert_eq!(tile.pixel_value(0, 0).unwrap(), 1);
        assert_eq!(tile.pixel_value(7, 2).unwrap(), 2);
        assert!(Tile::from_chr(&bytes[..15]).is_err());
    }

    #[test]
    fn test_pattern_table_capacity() {
        let tiles = vec![Tile::default(); PATTERN_TILE_COUNT + 1];
        assert!(PatternTable::new(&tiles[..PATTERN_TILE_COUNT]).is_ok());
        assert!(PatternTable::new(&tiles[..PATTERN_TILE_COUNT - 1]).is_err());
        assert!(PatternTable::new(&tiles).is_err());
    }

    #[test]
    fn test_pattern_table_lookup() {
        let mut tiles = vec![Tile::default(); PATTERN_TILE_COUNT];
        tiles[255] = sample_tile();
        let table = PatternTable::new(&tiles).unwrap();
        assert_eq!(table.tile(255).unwrap(), &sample_tile());
        assert_eq!(table.tile_by_id(255), &sample_tile());
        assert!(table.tile(256).is_err());
        assert_eq!(table.iter().count(), PATTERN_TILE_COUNT);
    }

    #[test]
    fn test_pattern_table_from_chr_bytes() {
        let mut chr = vec![0u8; PATTERN_TILE_COUNT * TILE_BYTE_COUNT];
        // tile 1 第 0 列最左邊像素值為 3
        chr[16] = 0x80;
        chr[16 + 8] = 0x80;
        let table = PatternTable::from_chr_bytes(&chr).unwrap();
        assert_eq!(table.tile_by_id(1).pixel_value(0, 0).unwrap(), 3);
        assert_eq!(table.tile_by_id(0).pixel_value(0, 0).unwrap(), 0);
        assert!(PatternTable::from_chr_bytes(&chr[..chr.len() - 1]).is_err());
    }
}
