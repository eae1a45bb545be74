use anyhow::Result;
use log::{debug, info, warn};
use opencv::prelude::*;
use std::time::Instant;

use crate::camera::OpenCvCamera;
use crate::config::Config;
use crate::fps::{FpsMeter, FrameClock};
use crate::game::{GameEvent, GameState, Rules};
use crate::input::{emit_all, InputEmitter};
use crate::launcher::launch_game;
use crate::pose::{BlazePoseEstimator, FrameSize, PoseEstimator};
use crate::render::{annotate, MinifbRenderer};

/// カメラ → 姿勢推定 → 判定 → 入力 → 表示 のメインループ
///
/// 終了ジェスチャー、Esc、ウィンドウを閉じるまで回り、最終状態を返す。
pub fn run<E: InputEmitter>(config: &Config, emitter: &mut E) -> Result<GameState> {
    let mut camera = OpenCvCamera::from_config(&config.camera)?;
    let resolution = camera.resolution();
    let mut estimator = BlazePoseEstimator::from_config(&config.pose)?;

    let mut renderer = if config.display.enabled {
        Some(MinifbRenderer::new(
            &config.display.title,
            resolution.width as usize,
            resolution.height as usize,
        )?)
    } else {
        None
    };

    let rules = Rules::from_config(config);
    let mut state = GameState::new();
    let mut clock = FrameClock::new();
    let mut meter = FpsMeter::new(Instant::now());
    let mut game_process = None;

    loop {
        if let Some(ref r) = renderer {
            if !r.is_open() {
                info!("Window closed");
                break;
            }
        }

        let mut frame = match camera.read_frame() {
            Ok(f) => f,
            Err(e) => {
                debug!("Frame skipped: {:#}", e);
                continue;
            }
        };
        let size = FrameSize::new(frame.cols() as u32, frame.rows() as u32);

        let pose = match estimator.estimate(&frame) {
            Ok(pose) => pose,
            Err(e) => {
                warn!("Pose estimation failed: {:#}", e);
                None
            }
        };

        let step = state.advance(pose.as_ref(), size, &rules);
        emit_all(emitter, &step.actions);

        match step.event {
            Some(GameEvent::Started) => {
                info!(
                    "Game started (shoulder reference y={})",
                    step.state.mid_y_reference.unwrap_or_default()
                );
                if game_process.is_none() {
                    match launch_game(&config.game) {
                        Ok(child) => game_process = child,
                        Err(e) => warn!("{:#}", e),
                    }
                }
            }
            Some(GameEvent::Restarted) => info!("Restart requested"),
            Some(GameEvent::Quit) => info!("Quit gesture detected"),
            None => {}
        }
        state = step.state;

        let now = Instant::now();
        let fps = clock.tick(now);
        if let Some(avg) = meter.frame(now) {
            info!(
                "FPS: {:.1} | pose: {} | tracking: {} | x={} y={}",
                avg,
                if pose.is_some() { "yes" } else { "no" },
                estimator.is_tracking(),
                state.x_pos_index,
                state.y_pos_index
            );
        }

        if let Some(ref mut r) = renderer {
            annotate(&mut frame, &step, pose.as_ref(), fps, config.pose.draw_threshold)?;
            r.show(&frame)?;
        }

        if step.is_quit() {
            break;
        }
    }

    emit_all(emitter, &state.release_held());
    Ok(state)
}
