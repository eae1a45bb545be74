use std::fmt;

use crate::pose::{FrameSize, LandmarkIndex, Pose};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandsStatus {
    Joined,
    NotJoined,
}

impl fmt::Display for HandsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HandsStatus::Joined => "Hands Joined",
            HandsStatus::NotJoined => "Hands Not Joined",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandsReading {
    pub verdict: HandsStatus,
    /// 両手首のユークリッド距離（px、切り捨て）
    pub distance: i32,
}

/// 両手首の距離が閾値未満なら手を合わせていると判定
pub fn classify_hands(pose: &Pose, size: FrameSize, threshold: i32) -> HandsReading {
    let (lx, ly) = pose.point(LandmarkIndex::LeftWrist, size);
    let (rx, ry) = pose.point(LandmarkIndex::RightWrist, size);
    let distance = (lx - rx).hypot(ly - ry) as i32;

    let verdict = if distance < threshold {
        HandsStatus::Joined
    } else {
        HandsStatus::NotJoined
    };

    HandsReading { verdict, distance }
}
