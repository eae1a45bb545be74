use anyhow::Result;
use log::{info, warn};

use crate::game::InputAction;

/// OSへの入力注入先
pub trait InputEmitter {
    fn emit(&mut self, action: &InputAction) -> Result<()>;
}

/// 失敗しても止めずにログだけ出す（送りっぱなし）
///
/// 送信できたイベント数を返す。
pub fn emit_all<E: InputEmitter + ?Sized>(emitter: &mut E, actions: &[InputAction]) -> usize {
    let mut sent = 0;
    for action in actions {
        match emitter.emit(action) {
            Ok(()) => sent += 1,
            Err(e) => warn!("Input injection failed ({}): {:#}", action, e),
        }
    }
    sent
}

/// 実際には送らずログに出すだけ
#[derive(Debug, Default)]
pub struct LogEmitter;

impl InputEmitter for LogEmitter {
    fn emit(&mut self, action: &InputAction) -> Result<()> {
        info!("[dry-run] {}", action);
        Ok(())
    }
}

impl InputEmitter for Vec<InputAction> {
    fn emit(&mut self, action: &InputAction) -> Result<()> {
        self.push(*action);
        Ok(())
    }
}

#[cfg(feature = "desktop")]
pub use self::enigo_backend::EnigoEmitter;

#[cfg(feature = "desktop")]
mod enigo_backend {
    use anyhow::{anyhow, Result};
    use enigo::{Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};
    use log::debug;

    use super::InputEmitter;
    use crate::game::{GameKey, InputAction};

    /// enigo を使ったキーボード・マウス入力
    pub struct EnigoEmitter {
        enigo: Enigo,
    }

    impl EnigoEmitter {
        pub fn new() -> Result<Self> {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| anyhow!("Failed to initialize input backend: {:?}", e))?;
            Ok(Self { enigo })
        }
    }

    fn to_key(key: GameKey) -> Key {
        match key {
            GameKey::Left => Key::LeftArrow,
            GameKey::Right => Key::RightArrow,
            GameKey::Up => Key::UpArrow,
            GameKey::Down => Key::DownArrow,
        }
    }

    impl InputEmitter for EnigoEmitter {
        fn emit(&mut self, action: &InputAction) -> Result<()> {
            debug!("emit {}", action);
            match *action {
                InputAction::Tap(key) => self.enigo.key(to_key(key), Direction::Click),
                InputAction::Press(key) => self.enigo.key(to_key(key), Direction::Press),
                InputAction::Release(key) => self.enigo.key(to_key(key), Direction::Release),
                InputAction::Click { x, y } => self
                    .enigo
                    .move_mouse(x, y, Coordinate::Abs)
                    .and_then(|_| self.enigo.button(Button::Left, Direction::Click)),
            }
            .map_err(|e| anyhow!("{:?}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameKey;

    struct FailingOn(GameKey, Vec<InputAction>);

    impl InputEmitter for FailingOn {
        fn emit(&mut self, action: &InputAction) -> Result<()> {
            if *action == InputAction::Tap(self.0) {
                anyhow::bail!("injection refused");
            }
            self.1.push(*action);
            Ok(())
        }
    }

    #[test]
    fn test_emit_all_records_in_order() {
        let actions = [
            InputAction::Tap(GameKey::Left),
            InputAction::Press(GameKey::Up),
            InputAction::Click { x: 10, y: 20 },
        ];
        let mut recorded: Vec<InputAction> = Vec::new();
        assert_eq!(emit_all(&mut recorded, &actions), 3);
        assert_eq!(recorded, actions.to_vec());
    }

    #[test]
    fn test_emit_all_continues_after_failure() {
        let actions = [
            InputAction::Tap(GameKey::Left),
            InputAction::Tap(GameKey::Right),
            InputAction::Release(GameKey::Up),
        ];
        let mut emitter = FailingOn(GameKey::Left, Vec::new());
        assert_eq!(emit_all(&mut emitter, &actions), 2);
        assert_eq!(emitter.1, vec![InputAction::Tap(GameKey::Right), InputAction::Release(GameKey::Up)]);
    }

    #[test]
    fn test_log_emitter_accepts_everything() {
        let mut emitter = LogEmitter;
        assert_eq!(emit_all(&mut emitter, &[InputAction::Tap(GameKey::Down)]), 1);
    }
}
