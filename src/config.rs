use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::game::CrouchPolicy;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub pose: PoseConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    /// カメラインデックス
    #[serde(default)]
    pub index: i32,
    #[serde(default = "default_camera_width")]
    pub width: u32,
    #[serde(default = "default_camera_height")]
    pub height: u32,
    /// 左右反転（セルフィービュー）
    #[serde(default = "default_true")]
    pub mirror: bool,
}

fn default_camera_width() -> u32 { 1280 }
fn default_camera_height() -> u32 { 960 }
fn default_true() -> bool { true }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: default_camera_width(),
            height: default_camera_height(),
            mirror: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PoseConfig {
    /// BlazePose ランドマークモデル (ONNX)
    #[serde(default = "default_model_path")]
    pub model_path: String,
    #[serde(default = "default_input_name")]
    pub input_name: String,
    /// [1, 195] (39 x 5: x, y, z, visibility, presence)
    #[serde(default = "default_landmarks_output")]
    pub landmarks_output: String,
    /// [1, 1] 人物存在スコア
    #[serde(default = "default_presence_output")]
    pub presence_output: String,
    /// true: 毎フレーム全画面で推論、false: 前フレームの周辺をトラッキング
    #[serde(default)]
    pub static_image_mode: bool,
    #[serde(default = "default_min_detection_confidence")]
    pub min_detection_confidence: f32,
    #[serde(default = "default_min_tracking_confidence")]
    pub min_tracking_confidence: f32,
    /// 骨格描画時の可視性閾値
    #[serde(default = "default_draw_threshold")]
    pub draw_threshold: f32,
}

fn default_model_path() -> String { "models/pose_landmark_full.onnx".to_string() }
fn default_input_name() -> String { "input_1".to_string() }
fn default_landmarks_output() -> String { "Identity".to_string() }
fn default_presence_output() -> String { "Identity_1".to_string() }
fn default_min_detection_confidence() -> f32 { 0.7 }
fn default_min_tracking_confidence() -> f32 { 0.7 }
fn default_draw_threshold() -> f32 { 0.5 }

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            input_name: default_input_name(),
            landmarks_output: default_landmarks_output(),
            presence_output: default_presence_output(),
            static_image_mode: false,
            min_detection_confidence: default_min_detection_confidence(),
            min_tracking_confidence: default_min_tracking_confidence(),
            draw_threshold: default_draw_threshold(),
        }
    }
}

/// ジェスチャー判定の閾値（ピクセル単位はフレーム解像度基準）
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GestureConfig {
    /// 肩の角度（度）。これ以上で腕を上げていると判定
    #[serde(default = "default_lateral_angle")]
    pub lateral_angle_deg: f32,
    /// 両手首の距離がこれ未満で「手を合わせた」
    #[serde(default = "default_hands_joined_distance")]
    pub hands_joined_distance: i32,
    /// 肩中点の基準位置からの許容幅
    #[serde(default = "default_posture_band")]
    pub posture_band: i32,
    /// 親指と反対側の肩のマンハッタン距離がこれ未満で終了ジェスチャー
    #[serde(default = "default_quit_distance")]
    pub quit_distance: i32,
    /// 開始/リスタートに必要な連続フレーム数
    #[serde(default = "default_debounce_frames")]
    pub debounce_frames: u32,
}

fn default_lateral_angle() -> f32 { crate::gesture::LATERAL_ANGLE_DEG }
fn default_hands_joined_distance() -> i32 { crate::gesture::HANDS_JOINED_DISTANCE }
fn default_posture_band() -> i32 { crate::gesture::POSTURE_BAND }
fn default_quit_distance() -> i32 { crate::gesture::QUIT_DISTANCE }
fn default_debounce_frames() -> u32 { crate::gesture::DEBOUNCE_FRAMES }

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            lateral_angle_deg: default_lateral_angle(),
            hands_joined_distance: default_hands_joined_distance(),
            posture_band: default_posture_band(),
            quit_distance: default_quit_distance(),
            debounce_frames: default_debounce_frames(),
        }
    }
}

/// ゲーム側の画面座標（クリック位置）と操作ポリシー
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ControlsConfig {
    #[serde(default = "default_start_click")]
    pub start_click: [i32; 2],
    #[serde(default = "default_restart_click")]
    pub restart_click: [i32; 2],
    #[serde(default = "default_quit_click")]
    pub quit_click: [i32; 2],
    #[serde(default)]
    pub crouch_policy: CrouchPolicy,
}

fn default_start_click() -> [i32; 2] { [1300, 800] }
fn default_restart_click() -> [i32; 2] { [963, 500] }
fn default_quit_click() -> [i32; 2] { [969, 645] }

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            start_click: default_start_click(),
            restart_click: default_restart_click(),
            quit_click: default_quit_click(),
            crouch_policy: CrouchPolicy::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct GameConfig {
    /// ゲーム開始時に起動する実行ファイル
    #[serde(default)]
    pub executable: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_window_title")]
    pub title: String,
}

fn default_window_title() -> String { "Kinetic Guy with Pose Detection".to_string() }

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: default_window_title(),
        }
    }
}

/// 消費カロリーの概算（1アクションあたり kcal）
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SessionConfig {
    #[serde(default = "default_calories_per_move")]
    pub calories_per_move: f32,
    #[serde(default = "default_calories_per_jump")]
    pub calories_per_jump: f32,
}

fn default_calories_per_move() -> f32 { 0.33 }
fn default_calories_per_jump() -> f32 { 0.166 }

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            calories_per_move: default_calories_per_move(),
            calories_per_jump: default_calories_per_jump(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Invalid config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.gesture.debounce_frames == 0 {
            anyhow::bail!("gesture.debounce_frames must be at least 1");
        }
        Ok(())
    }

    /// 読み込みに失敗した場合はデフォルト値を使う
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}; using defaults", e);
                Self::default()
            }
        }
    }
}
