//! 渲染設定，可由 JSON 載入

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::ppu::background::Mirroring;
use crate::core::ppu::pixel::SpritePriorityMode;

/// 預設每 100 幀回報一次
pub const DEFAULT_REPORT_INTERVAL: u32 = 100;

fn default_report_interval() -> u32 {
    DEFAULT_REPORT_INTERVAL
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// 觀察者回呼的間隔幀數，0 表示停用
    #[serde(default = "default_report_interval")]
    pub report_interval: u32,
    #[serde(default)]
    pub sprite_priority: SpritePriorityMode,
    #[serde(default)]
    pub mirroring: Mirroring,
    #[serde(default)]
    pub initial_scroll_x: i32,
    #[serde(default)]
    pub initial_scroll_y: i32,
}

impl RenderConfig {
    pub fn from_json(data: &str) -> Result<Self> {
        let config: RenderConfig = serde_json::from_str(data)?;
        log::debug!("render config loaded: {:?}", config);
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            report_interval: DEFAULT_REPORT_INTERVAL,
            sprite_priority: SpritePriorityMode::default(),
            mirroring: Mirroring::default(),
            initial_scroll_x: 0,
            initial_scroll_y: 0,
        }
    }
}
