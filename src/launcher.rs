use anyhow::{Context, Result};
use log::info;
use std::process::{Child, Command, Stdio};

use crate::config::GameConfig;

/// ゲーム本体を別プロセスで起動する（終了は待たない）
pub fn launch_game(config: &GameConfig) -> Result<Option<Child>> {
    let Some(executable) = config.executable.as_deref() else {
        return Ok(None);
    };

    let child = Command::new(executable)
        .args(&config.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to launch {}", executable))?;
    info!("Launched {} (pid {})", executable, child.id());
    Ok(Some(child))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_executable_configured() {
        assert!(launch_game(&GameConfig::default()).unwrap().is_none());
    }

    #[test]
    fn test_missing_executable_is_error() {
        let config = GameConfig {
            executable: Some("/nonexistent/kinetic-guy-game".to_string()),
            args: Vec::new(),
        };
        assert!(launch_game(&config).is_err());
    }
}
