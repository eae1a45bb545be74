//! 1フレーム分のランドマークからジェスチャー・姿勢を判定する分類器
//!
//! いずれも純粋関数で、閾値はピクセル単位（フレーム解像度でスケール済み）。
//! 判定結果と一緒に計測値も返すので、描画側はそれを注釈に使う。

pub mod hands;
pub mod lateral;
pub mod posture;
pub mod quit;

pub use hands::{classify_hands, HandsReading, HandsStatus};
pub use lateral::{classify_lateral, shoulder_angle, Lateral, LateralReading};
pub use posture::{classify_posture, shoulder_mid_y, Posture, PostureReading};
pub use quit::{classify_quit, QuitReading, QuitStatus};

/// 腕を上げたと判定する肩の角度（度）
pub const LATERAL_ANGLE_DEG: f32 = 95.0;
/// 両手首の距離（px）がこれ未満なら手を合わせている
pub const HANDS_JOINED_DISTANCE: i32 = 130;
/// 基準の肩の高さからの許容幅（px）
pub const POSTURE_BAND: i32 = 35;
/// 親指と反対側の肩のマンハッタン距離（px）
pub const QUIT_DISTANCE: i32 = 100;
/// 開始/リスタートに必要な連続フレーム数
pub const DEBOUNCE_FRAMES: u32 = 10;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::pose::{FrameSize, Landmark, LandmarkIndex, Pose};

    pub const SIZE: FrameSize = FrameSize { width: 1280, height: 960 };

    /// ピクセル座標で指定したランドマークだけを持つ Pose を作る
    pub fn pose_from_pixels(points: &[(LandmarkIndex, f32, f32)]) -> Pose {
        let mut pose = Pose::default();
        for &(index, px, py) in points {
            pose.landmarks[index as usize] = Landmark::new(
                px / SIZE.width as f32,
                py / SIZE.height as f32,
                1.0,
            );
        }
        pose
    }
}
