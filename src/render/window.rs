use anyhow::Result;
use minifb::{Key, Window, WindowOptions};
use opencv::core::Mat;
use opencv::prelude::*;

/// minifbを使用したプレビューウィンドウ
pub struct MinifbRenderer {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl MinifbRenderer {
    /// ウィンドウを作成（サイズ変更可）
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )?;

        Ok(Self {
            window,
            buffer: vec![0u32; width * height],
            width,
            height,
        })
    }

    /// ウィンドウが開いているか（Escで閉じる）
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// BGR Mat を表示する
    ///
    /// フレームがウィンドウより小さい部分は黒のまま、はみ出す部分は切り捨てる。
    pub fn show(&mut self, frame: &Mat) -> Result<()> {
        let owned;
        let frame = if frame.is_continuous() {
            frame
        } else {
            owned = frame.try_clone()?;
            &owned
        };
        let cols = frame.cols() as usize;
        let rows = frame.rows() as usize;
        let bytes = frame.data_bytes()?;

        self.buffer.fill(0);
        for y in 0..self.height.min(rows) {
            let row = &bytes[y * cols * 3..(y + 1) * cols * 3];
            let dst = &mut self.buffer[y * self.width..y * self.width + self.width.min(cols)];
            for (px, bgr) in dst.iter_mut().zip(row.chunks_exact(3)) {
                *px = (bgr[2] as u32) << 16 | (bgr[1] as u32) << 8 | bgr[0] as u32;
            }
        }

        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }
}
