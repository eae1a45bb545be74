use std::fmt;

use crate::pose::{FrameSize, LandmarkIndex, Pose};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Posture {
    Jumping,
    Crouching,
    Standing,
}

impl fmt::Display for Posture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Posture::Jumping => "Jumping",
            Posture::Crouching => "Crouching",
            Posture::Standing => "Standing",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostureReading {
    pub verdict: Posture,
    /// 現在の肩中点のY座標（px）
    pub mid_y: i32,
    /// キャリブレーション時の肩中点のY座標（px）
    pub reference: i32,
}

/// 両肩の中点のY座標（px）
pub fn shoulder_mid_y(pose: &Pose, size: FrameSize) -> i32 {
    let (_, left_y) = pose.get(LandmarkIndex::LeftShoulder).to_pixel(size);
    let (_, right_y) = pose.get(LandmarkIndex::RightShoulder).to_pixel(size);
    (left_y + right_y).abs() / 2
}

/// 基準の高さ ± band の外に出たらジャンプ/しゃがみ
///
/// 画像座標なので上に行くほど Y は小さい。境界値は Standing。
pub fn classify_posture(pose: &Pose, size: FrameSize, reference: i32, band: i32) -> PostureReading {
    let mid_y = shoulder_mid_y(pose, size);

    let verdict = if mid_y < reference - band {
        Posture::Jumping
    } else if mid_y > reference + band {
        Posture::Crouching
    } else {
        Posture::Standing
    };

    PostureReading {
        verdict,
        mid_y,
        reference,
    }
}
