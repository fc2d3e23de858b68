//! 幀統計回報
//!
//! 核心不持有全域 logger；宿主注入 `FrameObserver`，
//! 由 `PictureProcessor` 在每 N 幀時呼叫一次。

use std::time::Duration;

/// 產生幀的統計資料
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// 目前已產生的總幀數
    pub frame_count: u64,
    /// 最近一次 generate_frame 所花時間
    pub last_frame: Duration,
    /// 所有幀的總耗時
    pub total_time: Duration,
}

impl FrameStats {
    pub fn average_frame(&self) -> Duration {
        if self.frame_count == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total_time.as_nanos() / self.frame_count as u128;
        Duration::from_nanos(nanos as u64)
    }

    /// 以最近一幀計算的 FPS
    pub fn current_fps(&self) -> f64 {
        fps(self.last_frame)
    }

    pub fn average_fps(&self) -> f64 {
        fps(self.average_frame())
    }
}

fn fps(frame_time: Duration) -> f64 {
    let seconds = frame_time.as_secs_f64();
    if seconds > 0.0 { 1.0 / seconds } else { 0.0 }
}

pub trait FrameObserver: Send {
    fn on_frame(&mut self, stats: &FrameStats);
}

/// 透過 `log` 輸出 FPS
#[derive(Debug, Default)]
pub struct LogObserver;

impl FrameObserver for LogObserver {
    fn on_frame(&mut self, stats: &FrameStats) {
        log::info!(
            "frame {}: current FPS {:.1}, average FPS {:.1}, last frame {:?}",
            stats.frame_count,
            stats.current_fps(),
            stats.average_fps(),
            stats.last_frame
        );
    }
}

/// 不做任何事
#[derive(Debug, Default)]
pub struct NullObserver;

impl FrameObserver for NullObserver {
    fn on_frame(&mut self, _stats: &FrameStats) {}
}

impl<F> FrameObserver for F
where
    F: FnMut(&FrameStats) + Send,
{
    fn on_frame(&mut self, stats: &FrameStats) {
        self(stats)
    }
}
