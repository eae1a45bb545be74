use std::fmt;

use crate::pose::{FrameSize, LandmarkIndex, Pose};

/// 左右の位置
///
/// 映像は左右反転されているため、左肩側の腕を上げると `HandsRight` になる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lateral {
    Center,
    HandsLeft,
    HandsRight,
}

impl fmt::Display for Lateral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Lateral::Center => "Standing",
            Lateral::HandsLeft => "Hands Left",
            Lateral::HandsRight => "Hands Right",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LateralReading {
    pub verdict: Lateral,
    /// 左肩の角度（度）
    pub left_angle: f32,
    /// 右肩の角度（度）
    pub right_angle: f32,
}

/// 肩を頂点とした、肩→肘ベクトルと鉛直下向き軸のなす角（度）
///
/// 鉛直軸の長さは肩→腰の距離を使い、余弦定理で求める。
/// 腕を下ろしていれば 0°、水平で 90°、肩より上で 90° 超。
pub fn shoulder_angle(shoulder: (f32, f32), elbow: (f32, f32), hip: (f32, f32)) -> f32 {
    let torso = distance(shoulder, hip);
    let axis_len = if torso > f32::EPSILON { torso } else { 1.0 };
    let vertical = (shoulder.0, shoulder.1 + axis_len);

    let a = distance(shoulder, elbow);
    let b = axis_len;
    let c = distance(elbow, vertical);
    if a <= f32::EPSILON {
        return 0.0;
    }

    let cos = ((a * a + b * b - c * c) / (2.0 * a * b)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

fn distance(p: (f32, f32), q: (f32, f32)) -> f32 {
    (p.0 - q.0).hypot(p.1 - q.1)
}

/// 両肩の角度から左右の位置を判定
///
/// 両方が閾値以上（両腕を上げている）なら中央。
pub fn classify_lateral(pose: &Pose, size: FrameSize, threshold_deg: f32) -> LateralReading {
    use LandmarkIndex::*;

    let left_angle = shoulder_angle(
        pose.point(LeftShoulder, size),
        pose.point(LeftElbow, size),
        pose.point(LeftHip, size),
    );
    let right_angle = shoulder_angle(
        pose.point(RightShoulder, size),
        pose.point(RightElbow, size),
        pose.point(RightHip, size),
    );

    let left_up = left_angle >= threshold_deg;
    let right_up = right_angle >= threshold_deg;
    let verdict = match (left_up, right_up) {
        (true, false) => Lateral::HandsRight,
        (false, true) => Lateral::HandsLeft,
        _ => Lateral::Center,
    };

    LateralReading {
        verdict,
        left_angle,
        right_angle,
    }
}
