#[cfg(feature = "desktop")]
use anyhow::Result;
#[cfg(feature = "desktop")]
use opencv::{
    core::{Mat, Rect},
    prelude::*,
};

use super::landmark::{FrameSize, Landmark, LandmarkIndex, Pose};
use crate::config::PoseConfig;

/// 追跡領域の拡大率
const ROI_EXPAND: f32 = 1.25;

/// 追跡領域の計算に使うランドマークの可視性閾値
const ROI_CONFIDENCE: f32 = 0.5;

/// クロップ領域（正規化座標 0.0〜1.0）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRegion {
    pub fn full() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }
}

/// BBox（ピクセル座標）
#[derive(Debug, Clone, Copy)]
pub struct BBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// 前フレームのPoseからBBoxを推定
///
/// confidence_threshold以上のランドマークのmin/maxからBBoxを返す。
/// 有効なランドマークが2個未満ならNone。
pub fn bbox_from_landmarks(pose: &Pose, size: FrameSize, confidence_threshold: f32) -> Option<BBox> {
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    let mut count = 0u32;

    for lm in pose.landmarks.iter().filter(|l| l.is_valid(confidence_threshold)) {
        let (px, py) = lm.to_point(size);
        min_x = min_x.min(px);
        min_y = min_y.min(py);
        max_x = max_x.max(px);
        max_y = max_y.max(py);
        count += 1;
    }

    if count < 2 {
        return None;
    }

    Some(BBox {
        x: min_x,
        y: min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    })
}

/// BBoxから正方形の追跡領域を計算
///
/// - 長辺を1.25倍に拡張（中心を保持）
/// - フレーム境界にクリップ
pub fn square_region(bbox: &BBox, size: FrameSize) -> CropRegion {
    let cx = bbox.x + bbox.width / 2.0;
    let cy = bbox.y + bbox.height / 2.0;
    let side = bbox.width.max(bbox.height) * ROI_EXPAND;

    let fw = size.width as f32;
    let fh = size.height as f32;
    let x = (cx - side / 2.0).max(0.0);
    let y = (cy - side / 2.0).max(0.0);
    let w = side.min(fw - x).max(1.0);
    let h = side.min(fh - y).max(1.0);

    CropRegion {
        x: x / fw,
        y: y / fh,
        width: w / fw,
        height: h / fh,
    }
}

/// 領域をフレームから切り出す
#[cfg(feature = "desktop")]
pub fn crop_for_pose(frame: &Mat, region: &CropRegion, size: FrameSize) -> Result<Mat> {
    let fw = size.width as f32;
    let fh = size.height as f32;
    let rx = ((region.x * fw) as i32).clamp(0, size.width as i32 - 1);
    let ry = ((region.y * fh) as i32).clamp(0, size.height as i32 - 1);
    let rw = ((region.width * fw) as i32).clamp(1, size.width as i32 - rx);
    let rh = ((region.height * fh) as i32).clamp(1, size.height as i32 - ry);

    let roi = Rect::new(rx, ry, rw, rh);
    let cropped = Mat::roi(frame, roi)?;
    Ok(cropped.try_clone()?)
}

/// クロップ画像内の正規化座標をフレーム全体の正規化座標に変換
pub fn remap_pose(pose: &Pose, crop: &CropRegion) -> Pose {
    let mut landmarks = [Landmark::default(); LandmarkIndex::COUNT];
    for (dst, src) in landmarks.iter_mut().zip(pose.landmarks.iter()) {
        *dst = Landmark {
            x: crop.x + src.x * crop.width,
            y: crop.y + src.y * crop.height,
            confidence: src.confidence,
        };
    }
    Pose::new(landmarks)
}

/// 動画モードの追跡状態
///
/// 前フレームで見つかった姿勢の周辺を次の推論領域にする。
/// 見失う（存在スコア不足・推論エラー）と全画面と検出閾値に戻る。
/// 静止画モードでは常に全画面・検出閾値。
#[derive(Debug, Clone)]
pub struct PoseTracker {
    static_image_mode: bool,
    min_detection_confidence: f32,
    min_tracking_confidence: f32,
    previous: Option<Pose>,
}

impl PoseTracker {
    pub fn new(static_image_mode: bool, min_detection_confidence: f32, min_tracking_confidence: f32) -> Self {
        Self {
            static_image_mode,
            min_detection_confidence,
            min_tracking_confidence,
            previous: None,
        }
    }

    pub fn from_config(config: &PoseConfig) -> Self {
        Self::new(
            config.static_image_mode,
            config.min_detection_confidence,
            config.min_tracking_confidence,
        )
    }

    /// 追跡中か（動画モードで前フレームの姿勢がある）
    pub fn is_tracking(&self) -> bool {
        !self.static_image_mode && self.previous.is_some()
    }

    /// 今回の推論で使う存在スコアの閾値
    pub fn presence_threshold(&self) -> f32 {
        if self.is_tracking() {
            self.min_tracking_confidence
        } else {
            self.min_detection_confidence
        }
    }

    /// 今回の推論領域。None なら全画面
    pub fn tracking_region(&self, size: FrameSize) -> Option<CropRegion> {
        if !self.is_tracking() {
            return None;
        }
        let prev = self.previous.as_ref()?;
        let bbox = bbox_from_landmarks(prev, size, ROI_CONFIDENCE)?;
        Some(square_region(&bbox, size))
    }

    /// 推論結果を反映する。None（見失った・エラー）なら追跡を解除
    pub fn observe(&mut self, pose: Option<&Pose>) {
        self.previous = match pose {
            Some(pose) if !self.static_image_mode => Some(pose.clone()),
            _ => None,
        };
    }
}
