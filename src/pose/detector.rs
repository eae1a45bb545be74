use anyhow::{Context, Result};
use log::{debug, info};
use opencv::{core::Mat, prelude::*};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;

use super::crop::{crop_for_pose, remap_pose, CropRegion, PoseTracker};
use super::decode::decode_landmarks;
use super::landmark::{FrameSize, Pose};
use super::preprocess::preprocess_for_blazepose;
use crate::config::PoseConfig;

/// フレームから姿勢を推定する外部モデル
pub trait PoseEstimator {
    /// 人物が見つからなければ Ok(None)
    fn estimate(&mut self, frame: &Mat) -> Result<Option<Pose>>;
}

/// BlazePose ランドマークモデル (ONNX) による姿勢推定
///
/// 動画モードでは前フレームの姿勢の周辺だけを切り出して推論し、
/// 見失ったら全画面に戻る。
pub struct BlazePoseEstimator {
    session: Session,
    input_name: String,
    landmarks_output: String,
    presence_output: String,
    tracker: PoseTracker,
}

impl BlazePoseEstimator {
    /// ONNXモデルを読み込んで初期化
    pub fn from_config(config: &PoseConfig) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(&config.model_path)
            .with_context(|| format!("Failed to load ONNX model {}", config.model_path))?;
        info!(
            "Pose model loaded: {} (static={}, detection={}, tracking={})",
            config.model_path,
            config.static_image_mode,
            config.min_detection_confidence,
            config.min_tracking_confidence
        );

        Ok(Self {
            session,
            input_name: config.input_name.clone(),
            landmarks_output: config.landmarks_output.clone(),
            presence_output: config.presence_output.clone(),
            tracker: PoseTracker::from_config(config),
        })
    }

    pub fn is_tracking(&self) -> bool {
        self.tracker.is_tracking()
    }

    /// 領域を切り出して推論し、存在スコアが閾値未満なら None
    fn detect(&mut self, frame: &Mat) -> Result<Option<Pose>> {
        let size = FrameSize::new(frame.cols() as u32, frame.rows() as u32);
        let threshold = self.tracker.presence_threshold();

        let (input, region) = match self.tracker.tracking_region(size) {
            Some(region) => {
                let cropped = crop_for_pose(frame, &region, size)?;
                (preprocess_for_blazepose(&cropped)?, region)
            }
            None => (preprocess_for_blazepose(frame)?, CropRegion::full()),
        };

        let (raw, presence) = self.infer(input)?;
        if presence.is_nan() || presence < threshold {
            debug!("No pose (presence {:.2} < {:.2})", presence, threshold);
            return Ok(None);
        }
        Ok(Some(remap_pose(&decode_landmarks(&raw)?, &region)))
    }

    /// 推論して (ランドマーク生値, 存在スコア) を返す
    fn infer(&mut self, input: ndarray::Array4<f32>) -> Result<(Vec<f32>, f32)> {
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .context("Inference failed")?;

        let landmarks: ndarray::ArrayViewD<f32> = outputs[self.landmarks_output.as_str()]
            .try_extract_array()
            .context("Failed to extract landmark tensor")?;
        let presence: ndarray::ArrayViewD<f32> = outputs[self.presence_output.as_str()]
            .try_extract_array()
            .context("Failed to extract presence tensor")?;

        let raw = landmarks.iter().copied().collect();
        let score = presence.iter().next().copied().unwrap_or(0.0);
        Ok((raw, score))
    }
}

impl PoseEstimator for BlazePoseEstimator {
    /// 見失ったときもエラーのときも追跡を解除し、次は全画面で探す
    fn estimate(&mut self, frame: &Mat) -> Result<Option<Pose>> {
        let result = self.detect(frame);
        self.tracker
            .observe(result.as_ref().ok().and_then(|pose| pose.as_ref()));
        result
    }
}
