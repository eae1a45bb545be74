use std::fmt;

/// ゲームに送るキー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    Left,
    Right,
    Up,
    Down,
}

/// 1フレームの判定結果から生成される入力イベント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// 押して離す
    Tap(GameKey),
    /// 押しっぱなし
    Press(GameKey),
    Release(GameKey),
    /// スクリーン座標で左クリック
    Click { x: i32, y: i32 },
}

impl InputAction {
    pub fn click(point: (i32, i32)) -> Self {
        InputAction::Click {
            x: point.0,
            y: point.1,
        }
    }
}

impl fmt::Display for InputAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputAction::Tap(key) => write!(f, "tap {:?}", key),
            InputAction::Press(key) => write!(f, "press {:?}", key),
            InputAction::Release(key) => write!(f, "release {:?}", key),
            InputAction::Click { x, y } => write!(f, "click ({}, {})", x, y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_from_point() {
        assert_eq!(InputAction::click((1300, 800)), InputAction::Click { x: 1300, y: 800 });
    }

    #[test]
    fn test_display() {
        assert_eq!(InputAction::Tap(GameKey::Left).to_string(), "tap Left");
        assert_eq!(InputAction::Release(GameKey::Up).to_string(), "release Up");
        assert_eq!(InputAction::click((1, 2)).to_string(), "click (1, 2)");
    }
}
