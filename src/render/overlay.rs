use anyhow::Result;
use opencv::core::{Mat, Point, Scalar};
use opencv::imgproc;
use opencv::prelude::*;

use crate::game::Step;
use crate::gesture::{HandsStatus, QuitStatus};
use crate::pose::{FrameSize, Pose};
use crate::render::skeleton::SKELETON_CONNECTIONS;

fn bgr(b: f64, g: f64, r: f64) -> Scalar {
    Scalar::new(b, g, r, 0.0)
}

fn green() -> Scalar { bgr(0.0, 255.0, 0.0) }
fn red() -> Scalar { bgr(0.0, 0.0, 255.0) }
fn white() -> Scalar { bgr(255.0, 255.0, 255.0) }
fn bone() -> Scalar { bgr(49.0, 125.0, 237.0) }
fn dim() -> Scalar { bgr(128.0, 128.0, 128.0) }

fn put_label(frame: &mut Mat, text: &str, x: i32, y: i32, color: Scalar) -> Result<()> {
    imgproc::put_text(
        frame,
        text,
        Point::new(x, y),
        imgproc::FONT_HERSHEY_PLAIN,
        2.0,
        color,
        3,
        imgproc::LINE_8,
        false,
    )?;
    Ok(())
}

/// 骨格を描画
pub fn draw_skeleton(frame: &mut Mat, pose: &Pose, confidence_threshold: f32) -> Result<()> {
    let size = FrameSize::new(frame.cols() as u32, frame.rows() as u32);
    let point = |lm: &crate::pose::Landmark| {
        let (x, y) = lm.to_pixel(size);
        Point::new(x, y)
    };

    for (a, b) in SKELETON_CONNECTIONS.iter() {
        let (start, end) = (pose.get(*a), pose.get(*b));
        if start.is_valid(confidence_threshold) && end.is_valid(confidence_threshold) {
            imgproc::line(frame, point(start), point(end), bone(), 2, imgproc::LINE_8, 0)?;
        }
    }
    for lm in pose.landmarks.iter() {
        let color = if lm.is_valid(confidence_threshold) { white() } else { dim() };
        imgproc::circle(frame, point(lm), 3, color, -1, imgproc::LINE_8, 0)?;
    }
    Ok(())
}

/// 1フレーム分の判定結果をフレームに書き込む
///
/// 上段: FPS / 合掌状態と手首の距離 / 終了判定
/// 下段: 開始案内 / 左右 / 姿勢（基準線つき）
pub fn annotate(
    frame: &mut Mat,
    step: &Step,
    pose: Option<&Pose>,
    fps: Option<f32>,
    draw_threshold: f32,
) -> Result<()> {
    let width = frame.cols();
    let height = frame.rows();
    let v = &step.verdicts;

    if let Some(pose) = pose {
        if step.state.is_running() {
            draw_skeleton(frame, pose, draw_threshold)?;
        } else {
            put_label(frame, "JOIN BOTH HANDS TO START THE GAME.", 5, height - 10, green())?;
        }
    }

    if let Some(fps) = fps {
        put_label(frame, &format!("FPS: {}", fps as i32), 10, 30, green())?;
    }

    if let Some(hands) = v.hands {
        let color = if hands.verdict == HandsStatus::Joined { green() } else { red() };
        put_label(frame, &hands.verdict.to_string(), 10, 70, color)?;
        put_label(frame, &format!("Distance: {}", hands.distance), 10, 110, color)?;
    }

    if let Some(quit) = v.quit {
        let color = if quit.verdict == QuitStatus::Quit { green() } else { red() };
        put_label(frame, &quit.verdict.to_string(), 10, 150, color)?;
    }

    if let Some(lateral) = v.lateral {
        put_label(frame, &lateral.verdict.to_string(), 5, height - 50, white())?;
    }

    if let Some(posture) = v.posture {
        put_label(frame, &posture.verdict.to_string(), 5, height - 90, white())?;
        let y = posture.reference;
        imgproc::line(frame, Point::new(0, y), Point::new(width, y), white(), 2, imgproc::LINE_8, 0)?;
    }

    Ok(())
}
