use std::fmt;
use std::time::{Duration, Instant};

use crate::core::config::RenderConfig;
use crate::core::error::Result;
use crate::core::ppu::background::Mirroring;
use crate::core::ppu::pixel::{composite, BackgroundPixel, SpritePixel, SpritePriorityMode};
use crate::core::ppu::sprite::ScanlineSprites;
use crate::core::ppu::tile::{TILE_HEIGHT, TILE_WIDTH};
use crate::core::ppu::types::{Frame, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::core::ppu::vram::VideoTables;
use crate::core::utils::logger::{FrameObserver, FrameStats, NullObserver};

/// PPU (圖像處理單元)：把所有表格合成一整個畫面
pub struct PictureProcessor {
    tables: VideoTables,
    scroll_x: i32,
    scroll_y: i32,
    sprite_priority: SpritePriorityMode,
    // 單一緩衝區，每次 generate_frame 覆寫
    frame_buffer: Frame,

    observer: Box<dyn FrameObserver>,
    report_interval: u32,
    stats: FrameStats,
}

impl PictureProcessor {
    pub fn new(tables: VideoTables) -> Self {
        Self::with_config(tables, &RenderConfig::default())
    }

    pub fn with_config(tables: VideoTables, config: &RenderConfig) -> Self {
        if tables.backgrounds.mirroring() != config.mirroring {
            log::warn!(
                "background layout uses {:?} but config asks for {:?}; keeping the layout",
                tables.backgrounds.mirroring(),
                config.mirroring
            );
        }
        PictureProcessor {
            tables,
            scroll_x: config.initial_scroll_x,
            scroll_y: config.initial_scroll_y,
            sprite_priority: config.sprite_priority,
            frame_buffer: Frame::new(),
            observer: Box::new(NullObserver),
            report_interval: config.report_interval,
            stats: FrameStats::default(),
        }
    }

    /// 注入幀統計觀察者
    pub fn with_observer(mut self, observer: impl FrameObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn set_scroll_position_x(&mut self, x: i32) {
        self.scroll_x = x;
    }

    pub fn set_scroll_position_y(&mut self, y: i32) {
        self.scroll_y = y;
    }

    pub fn scroll_position(&self) -> (i32, i32) {
        (self.scroll_x, self.scroll_y)
    }

    pub fn set_sprite_priority(&mut self, mode: SpritePriorityMode) {
        self.sprite_priority = mode;
    }

    pub fn tables(&self) -> &VideoTables {
        &self.tables
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// 重新產生整個畫面；回傳的緩衝區在下一次呼叫時會被覆寫
    pub fn generate_frame(&mut self) -> Result<&Frame> {
        let started = Instant::now();
        // 逐欄位借用，才能同時寫入 frame_buffer
        let scene = Scene {
            tables: &self.tables,
            scroll_x: self.scroll_x,
            scroll_y: self.scroll_y,
            sprite_priority: self.sprite_priority,
        };
        scene.render(&mut self.frame_buffer)?;
        self.finish_frame(started.elapsed());
        Ok(&self.frame_buffer)
    }

    /// 渲染到呼叫端提供的緩衝區 (雙緩衝用)
    pub fn render_into(&mut self, frame: &mut Frame) -> Result<()> {
        let started = Instant::now();
        self.scene().render(frame)?;
        self.finish_frame(started.elapsed());
        Ok(())
    }

    pub fn frame(&self) -> &Frame {
        &self.frame_buffer
    }

    fn scene(&self) -> Scene<'_> {
        Scene {
            tables: &self.tables,
            scroll_x: self.scroll_x,
            scroll_y: self.scroll_y,
            sprite_priority: self.sprite_priority,
        }
    }

    fn finish_frame(&mut self, elapsed: Duration) {
        self.stats.frame_count += 1;
        self.stats.last_frame = elapsed;
        self.stats.total_time += elapsed;
        log::trace!("frame {} generated in {:?}", self.stats.frame_count, elapsed);

        if self.report_interval > 0 && self.stats.frame_count % self.report_interval as u64 == 0 {
            self.observer.on_frame(&self.stats);
        }
    }
}

impl fmt::Debug for PictureProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PictureProcessor")
            .field("scroll_x", &self.scroll_x)
            .field("scroll_y", &self.scroll_y)
            .field("sprite_priority", &self.sprite_priority)
            .field("mirroring", &self.tables.backgrounds.mirroring())
            .field("report_interval", &self.report_interval)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// 一幀渲染期間不變的狀態
struct Scene<'a> {
    tables: &'a VideoTables,
    scroll_x: i32,
    scroll_y: i32,
    sprite_priority: SpritePriorityMode,
}

impl Scene<'_> {
    fn render(&self, frame: &mut Frame) -> Result<()> {
        for y in 0..SCREEN_HEIGHT {
            // 精靈選擇每條掃描線只做一次
            let candidates = self.tables.sprites.objects_on_scanline(y);
            let row = frame.row_mut(y);

            for (x, pixel) in row.iter_mut().enumerate() {
                let background = self.background_pixel(x, y)?;
                let sprite = self.sprite_pixel(x, y, &candidates)?;
                *pixel = composite(background, sprite, self.sprite_priority);
            }
        }
        Ok(())
    }

    /// 螢幕座標 -> (格位, 名稱表內像素座標)
    fn locate(&self, x: usize, y: usize) -> (usize, usize, usize) {
        if self.tables.backgrounds.mirroring() == Mirroring::SingleScreen {
            return (0, x, y);
        }

        let absolute_x = self.scroll_x as i64 + x as i64;
        let absolute_y = self.scroll_y as i64 + y as i64;
        let width = SCREEN_WIDTH as i64;
        let height = SCREEN_HEIGHT as i64;

        let horizontal = absolute_x.div_euclid(width).rem_euclid(2) as usize;
        let vertical = absolute_y.div_euclid(height).rem_euclid(2) as usize;
        let local_x = absolute_x.rem_euclid(width) as usize;
        let local_y = absolute_y.rem_euclid(height) as usize;

        ((vertical << 1) | horizontal, local_x, local_y)
    }

    fn background_pixel(&self, x: usize, y: usize) -> Result<BackgroundPixel> {
        let (slot, local_x, local_y) = self.locate(x, y);
        let table = self.tables.backgrounds.table_at(slot)?;

        let tile_x = local_x / TILE_WIDTH;
        let tile_y = local_y / TILE_HEIGHT;
        let pattern = table.pattern_table_index(tile_x, tile_y)?;
        let tile = self.tables.background_tiles.tile_by_id(pattern);
        let value = tile.pixel_value(local_x % TILE_WIDTH, local_y % TILE_HEIGHT)?;

        // 像素值 0 一律使用通用背景色 (第 0 組第 0 格)
        let group = if value == 0 {
            0
        } else {
            table.palette_group_index(tile_x, tile_y)?
        };
        let color = self.tables.background_palette.resolve(
            &self.tables.system_palette,
            group,
            value as usize,
        )?;

        Ok(BackgroundPixel { color, value })
    }

    /// 依 OAM 順序找第一個不透明的精靈像素
    fn sprite_pixel(
        &self,
        x: usize,
        y: usize,
        candidates: &ScanlineSprites,
    ) -> Result<Option<SpritePixel>> {
        let sprites = &self.tables.sprites;

        for id in candidates.iter() {
            let attribute = sprites.attribute(id);
            if !attribute.covers_column(x) {
                continue;
            }

            let mut local_x = x - attribute.x as usize;
            let mut local_y = y - attribute.y as usize;
            if sprites.is_flipped_horizontal(id) {
                local_x = TILE_WIDTH - 1 - local_x;
            }
            if sprites.is_flipped_vertical(id) {
                local_y = TILE_HEIGHT - 1 - local_y;
            }

            let tile = self.tables.sprite_tiles.tile_by_id(attribute.tile);
            let value = tile.pixel_value(local_x, local_y)?;
            // 精靈像素值 0 為透明
            if value == 0 {
                continue;
            }

            let color = self.tables.sprite_palette.resolve(
                &self.tables.system_palette,
                sprites.palette_group_index(id),
                value as usize,
            )?;
            return Ok(Some(SpritePixel {
                color,
                behind_background: sprites.is_behind_background(id),
            }));
        }

        Ok(None)
    }
}
