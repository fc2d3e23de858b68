//! 顯示端交接：雙緩衝幀交換
//!
//! 兩個 `Frame` 在生產端與顯示端之間循環，顯示端持有的緩衝區不會被寫入。

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};

use crate::core::error::{Error, Result};
use crate::core::ppu::ppu::PictureProcessor;
use crate::core::ppu::types::Frame;

/// 緩衝區數量
pub const FRAME_BUFFER_COUNT: usize = 2;

/// 外部顯示器 (視窗、檔案輸出等)
pub trait FramePresenter {
    fn present(&mut self, frame: &Frame) -> Result<()>;
}

impl<F> FramePresenter for F
where
    F: FnMut(&Frame) -> Result<()>,
{
    fn present(&mut self, frame: &Frame) -> Result<()> {
        self(frame)
    }
}

/// 建立一組生產端/顯示端
pub fn frame_exchange() -> (FramePublisher, FrameReceiver) {
    let (ready_tx, ready_rx) = channel::bounded(1);
    let (recycle_tx, recycle_rx) = channel::bounded(FRAME_BUFFER_COUNT);
    for _ in 0..FRAME_BUFFER_COUNT {
        // 容量剛好足夠，送出不會失敗
        let _ = recycle_tx.send(Frame::new());
    }

    (
        FramePublisher {
            ready: ready_tx,
            free: recycle_rx,
        },
        FrameReceiver {
            ready: ready_rx,
            recycle: recycle_tx,
        },
    )
}

#[derive(Debug)]
pub struct FramePublisher {
    ready: Sender<Frame>,
    free: Receiver<Frame>,
}

impl FramePublisher {
    /// 取得空閒緩衝區、渲染後送給顯示端；沒有空閒緩衝區時阻塞
    pub fn publish(&mut self, ppu: &mut PictureProcessor) -> Result<()> {
        let mut frame = self.free.recv().map_err(|_| Error::Disconnected)?;
        ppu.render_into(&mut frame)?;
        self.ready.send(frame).map_err(|_| Error::Disconnected)
    }
}

#[derive(Debug)]
pub struct FrameReceiver {
    ready: Receiver<Frame>,
    recycle: Sender<Frame>,
}

impl FrameReceiver {
    pub fn recv(&self) -> Result<Frame> {
        self.ready.recv().map_err(|_| Error::Disconnected)
    }

    /// 沒有新幀時回傳 `None`
    pub fn try_recv(&self) -> Result<Option<Frame>> {
        match self.ready.try_recv() {
            Ok(frame) => Ok(Some(frame)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(Error::Disconnected),
        }
    }

    /// 把顯示完的緩衝區還給生產端
    pub fn recycle(&self, frame: Frame) -> Result<()> {
        self.recycle.send(frame).map_err(|_| Error::Disconnected)
    }

    pub fn present_next(&self, presenter: &mut impl FramePresenter) -> Result<()> {
        let frame = self.recv()?;
        let result = presenter.present(&frame);
        self.recycle(frame)?;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ppu::background::{
        BackgroundLayout, Mirroring, NameTable, PACKED_ATTRIBUTE_BYTE_COUNT, TILE_COUNT,
    };
    use crate::core::ppu::palette::{FramePalette, SystemPalette};
    use crate::core::ppu::sprite::ObjectTable;
    use crate::core::ppu::tile::{PatternTable, Tile, PATTERN_TILE_COUNT};
    use crate::core::ppu::types::Color;
    use crate::core::ppu::vram::VideoTables;
    use std::thread;

    /// 左表全為值 1，右表全為值 0，捲動時左上角顏色會改變
    fn scrolling_ppu() -> PictureProcessor {
        let mut tiles = vec![Tile::default(); PATTERN_TILE_COUNT];
        tiles[1] = Tile::from_planes([0xFF; 8], [0; 8]);
        let patterns = PatternTable::new(&tiles).unwrap();
        let table = |fill: u8| {
            NameTable::new(&[fill; TILE_COUNT], &[0; PACKED_ATTRIBUTE_BYTE_COUNT]).unwrap()
        };
        let palette = FramePalette::from_indices(&[
            0x0F, 0x30, 0x00, 0x00, //
            0x0F, 0x00, 0x00, 0x00, //
            0x0F, 0x00, 0x00, 0x00, //
            0x0F, 0x00, 0x00, 0x00,
        ])
        .unwrap();
        let tables = VideoTables {
            system_palette: SystemPalette::nes_reference(),
            background_tiles: patterns.clone(),
            sprite_tiles: patterns,
            background_palette: palette,
            sprite_palette: palette,
            backgrounds: BackgroundLayout::new(vec![table(1), table(0)], Mirroring::Vertical)
                .unwrap(),
            sprites: ObjectTable::new(&[[0xFF, 0, 0, 0]; 64]).unwrap(),
        };
        PictureProcessor::new(tables)
    }

    #[test]
    fn test_publish_then_receive() {
        let (mut publisher, receiver) = frame_exchange();
        let mut ppu = scrolling_ppu();
        assert!(receiver.try_recv().unwrap().is_none());

        publisher.publish(&mut ppu).unwrap();
        let frame = receiver.try_recv().unwrap().unwrap();
        assert_eq!(frame.get(0, 0).unwrap(), Color::rgb(0xEC, 0xEE, 0xEC));
        receiver.recycle(frame).unwrap();
    }

    #[test]
    fn test_present_next_recycles_buffer() {
        let (mut publisher, receiver) = frame_exchange();
        let mut ppu = scrolling_ppu();
        let mut presented = Vec::new();
        let mut presenter = |frame: &Frame| -> Result<()> {
            presented.push(frame.get(0, 0)?);
            Ok(())
        };

        // 遠超過緩衝區數量，每次都必須回收才能繼續
        for i in 0..5 {
            ppu.set_scroll_position_x(if i % 2 == 0 { 0 } else { 256 });
            publisher.publish(&mut ppu).unwrap();
            receiver.present_next(&mut presenter).unwrap();
        }
        let white = Color::rgb(0xEC, 0xEE, 0xEC);
        assert_eq!(presented, vec![white, Color::BLACK, white, Color::BLACK, white]);
    }

    #[test]
    fn test_producer_thread_hands_frames_in_order() {
        let (mut publisher, receiver) = frame_exchange();
        let producer = thread::spawn(move || {
            let mut ppu = scrolling_ppu();
            for i in 0..6 {
                ppu.set_scroll_position_x(i * 256);
                publisher.publish(&mut ppu).unwrap();
            }
        });

        for i in 0..6 {
            let frame = receiver.recv().unwrap();
            let expected = if i % 2 == 0 {
                Color::rgb(0xEC, 0xEE, 0xEC)
            } else {
                Color::BLACK
            };
            assert_eq!(frame.get(0, 0).unwrap(), expected, "frame {}", i);
            // 最後一幀時生產端可能已結束
            let _ = receiver.recycle(frame);
        }
        producer.join().unwrap();
        assert!(matches!(receiver.recv(), Err(Error::Disconnected)));
    }

    #[test]
    fn test_publish_fails_once_receiver_is_gone() {
        let (mut publisher, receiver) = frame_exchange();
        drop(receiver);
        let mut ppu = scrolling_ppu();
        // 回收通道中仍有緩衝區，但送出時發現顯示端已關閉
        assert!(matches!(publisher.publish(&mut ppu), Err(Error::Disconnected)));
    }
}
