use anyhow::Result;
use kinetic_guy::app;
use kinetic_guy::config::Config;
use kinetic_guy::input::EnigoEmitter;

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load_or_default(CONFIG_PATH);

    println!("=== Kinetic Guy ({}) ===", env!("GIT_VERSION"));
    println!("Camera: #{} {}x{}", config.camera.index, config.camera.width, config.camera.height);
    println!("Model: {}", config.pose.model_path);
    println!();
    println!("  両手を合わせる      - ゲーム開始 / リスタート");
    println!("  片腕を横に上げる    - 左右移動");
    println!("  ジャンプ            - ジャンプ");
    println!("  両腕をクロスして肩  - 終了");
    println!("  ESC                 - ウィンドウを閉じて終了");
    println!();

    let mut emitter = EnigoEmitter::new()?;
    let state = app::run(&config, &mut emitter)?;

    println!("You have burnt {:.2} calories", state.calories);
    Ok(())
}
