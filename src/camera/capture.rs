use anyhow::{Context, Result};
use log::info;
use opencv::{
    core::{self, Mat},
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureAPIs},
};

use crate::config::CameraConfig;
use crate::pose::FrameSize;

/// OpenCVを使用したカメラキャプチャ
pub struct OpenCvCamera {
    capture: VideoCapture,
    width: u32,
    height: u32,
    mirror: bool,
}

impl OpenCvCamera {
    pub fn from_config(config: &CameraConfig) -> Result<Self> {
        let mut camera = Self::open_with_resolution(config.index, Some(config.width), Some(config.height))?;
        camera.mirror = config.mirror;
        Ok(camera)
    }

    /// 解像度を指定してカメラを開く
    pub fn open_with_resolution(index: i32, width: Option<u32>, height: Option<u32>) -> Result<Self> {
        let mut capture =
            VideoCapture::new(index, VideoCaptureAPIs::CAP_ANY as i32).context("Failed to open camera")?;

        if !capture.is_opened()? {
            anyhow::bail!("Camera {} is not available", index);
        }

        if let Some(w) = width {
            capture.set(videoio::CAP_PROP_FRAME_WIDTH, w as f64)?;
        }
        if let Some(h) = height {
            capture.set(videoio::CAP_PROP_FRAME_HEIGHT, h as f64)?;
        }
        capture.set(videoio::CAP_PROP_BUFFERSIZE, 1.0)?;

        let actual_width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let actual_height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        info!(
            "Camera {}: {}x{} @ {} fps",
            index,
            actual_width,
            actual_height,
            capture.get(videoio::CAP_PROP_FPS)?
        );

        Ok(Self {
            capture,
            width: actual_width,
            height: actual_height,
            mirror: false,
        })
    }

    /// 解像度を取得
    pub fn resolution(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }

    /// フレームを読み込む（BGR形式、mirror 指定時は左右反転）
    ///
    /// Err は一時的に取得できなかったことを示すので、呼び出し側は次のフレームへ進めばよい。
    pub fn read_frame(&mut self) -> Result<Mat> {
        let mut frame = Mat::default();
        let ok = self
            .capture
            .read(&mut frame)
            .context("Failed to read frame")?;

        if !ok || frame.empty() {
            anyhow::bail!("Empty frame received");
        }

        if !self.mirror {
            return Ok(frame);
        }
        let mut flipped = Mat::default();
        core::flip(&frame, &mut flipped, 1)?;
        Ok(flipped)
    }
}
