//! 入力を送らずに判定結果だけを確認するビューア（閾値調整用）
use anyhow::Result;
use kinetic_guy::app;
use kinetic_guy::config::Config;
use kinetic_guy::input::LogEmitter;

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = Config::load_or_default(CONFIG_PATH);
    // ビューアではゲームを起動しない
    config.game.executable = None;
    config.display.enabled = true;

    println!("Pose Viewer ({})", env!("GIT_VERSION"));
    println!("Press ESC to exit");

    let state = app::run(&config, &mut LogEmitter)?;

    println!(
        "Session ended: phase={:?} x={} y={} calories={:.2}",
        state.phase, state.x_pos_index, state.y_pos_index, state.calories
    );
    Ok(())
}
