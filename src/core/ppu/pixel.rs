//! PPU 像素合成：背景與精靈的優先順序

use serde::{Deserialize, Serialize};

use crate::core::ppu::types::Color;

/// 精靈 "在背景後方" 旗標的處理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpritePriorityMode {
    /// 不看旗標，不透明的精靈像素一律蓋過背景
    #[default]
    Ignore,
    /// 旗標設定且背景像素值非 0 時，背景優先
    Honor,
}

/// 已解析的背景像素，保留原始像素值供優先權判斷
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundPixel {
    pub color: Color,
    pub value: u8,
}

/// 已解析且不透明的精靈像素
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpritePixel {
    pub color: Color,
    pub behind_background: bool,
}

pub fn composite(
    background: BackgroundPixel,
    sprite: Option<SpritePixel>,
    mode: SpritePriorityMode,
) -> Color {
    match (sprite, mode) {
        (None, _) => background.color,
        (Some(sprite), SpritePriorityMode::Honor)
            if sprite.behind_background && background.value != 0 =>
        {
            background.color
        }
        (Some(sprite), _) => sprite.color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Color = Color::rgb(10, 20, 30);
    const SPRITE: Color = Color::rgb(200, 100, 50);

    fn bg(value: u8) -> BackgroundPixel {
        BackgroundPixel { color: BG, value }
    }

    fn sprite(behind_background: bool) -> Option<SpritePixel> {
        Some(SpritePixel {
            color: SPRITE,
            behind_background,
        })
    }

    #[test]
    fn test_no_sprite_uses_background() {
        assert_eq!(composite(bg(3), None, SpritePriorityMode::Ignore), BG);
        assert_eq!(composite(bg(0), None, SpritePriorityMode::Honor), BG);
    }

    #[test]
    fn test_ignore_mode_sprite_always_wins() {
        assert_eq!(composite(bg(2), sprite(false), SpritePriorityMode::Ignore), SPRITE);
        assert_eq!(composite(bg(2), sprite(true), SpritePriorityMode::Ignore), SPRITE);
    }

    #[test]
    fn test_honor_mode_respects_behind_flag() {
        assert_eq!(composite(bg(2), sprite(true), SpritePriorityMode::Honor), BG);
        // 背景像素值為 0 時精靈仍可見
        assert_eq!(composite(bg(0), sprite(true), SpritePriorityMode::Honor), SPRITE);
        assert_eq!(composite(bg(2), sprite(false), SpritePriorityMode::Honor), SPRITE);
    }
}
