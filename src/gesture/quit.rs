use std::fmt;

use crate::pose::{FrameSize, LandmarkIndex, Pose};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitStatus {
    Quit,
    Game,
}

impl fmt::Display for QuitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuitStatus::Quit => "Quit",
            QuitStatus::Game => "Game",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuitReading {
    pub verdict: QuitStatus,
    /// 左親指 → 右肩
    pub left_distance: i32,
    /// 右親指 → 左肩
    pub right_distance: i32,
}

fn manhattan(p: (f32, f32), q: (f32, f32)) -> i32 {
    ((p.0 - q.0).abs() + (p.1 - q.1).abs()) as i32
}

/// 腕を胸の前で交差させ、両親指を反対側の肩に当てると終了
pub fn classify_quit(pose: &Pose, size: FrameSize, threshold: i32) -> QuitReading {
    use LandmarkIndex::*;

    let left_distance = manhattan(pose.point(LeftThumb, size), pose.point(RightShoulder, size));
    let right_distance = manhattan(pose.point(RightThumb, size), pose.point(LeftShoulder, size));

    let verdict = if left_distance < threshold && right_distance < threshold {
        QuitStatus::Quit
    } else {
        QuitStatus::Game
    };

    QuitReading {
        verdict,
        left_distance,
        right_distance,
    }
}
