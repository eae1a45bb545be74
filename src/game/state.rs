use serde::Deserialize;

use super::action::{GameKey, InputAction};
use crate::config::{Config, GestureConfig};
use crate::gesture::{
    classify_hands, classify_lateral, classify_posture, classify_quit, shoulder_mid_y,
    HandsReading, HandsStatus, Lateral, LateralReading, Posture, PostureReading, QuitReading,
    QuitStatus,
};
use crate::pose::{FrameSize, Pose};

const X_LEFT: u8 = 0;
const X_CENTER: u8 = 1;
const X_RIGHT: u8 = 2;

const Y_CROUCH: u8 = 0;
const Y_STAND: u8 = 1;
const Y_JUMP: u8 = 2;

/// しゃがみ姿勢の扱い
///
/// `Ignore` はジャンプだけキーを押す従来の挙動。
/// `HoldDown` はしゃがんでいる間 Down を押し続ける。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrouchPolicy {
    #[default]
    Ignore,
    HoldDown,
}

/// 判定とクリック位置のパラメータ
#[derive(Debug, Clone, PartialEq)]
pub struct Rules {
    pub gesture: GestureConfig,
    pub start_click: (i32, i32),
    pub restart_click: (i32, i32),
    pub quit_click: (i32, i32),
    pub crouch_policy: CrouchPolicy,
    pub calories_per_move: f32,
    pub calories_per_jump: f32,
}

impl Rules {
    pub fn from_config(config: &Config) -> Self {
        let c = &config.controls;
        Self {
            gesture: config.gesture.clone(),
            start_click: (c.start_click[0], c.start_click[1]),
            restart_click: (c.restart_click[0], c.restart_click[1]),
            quit_click: (c.quit_click[0], c.quit_click[1]),
            crouch_policy: c.crouch_policy,
            calories_per_move: config.session.calories_per_move,
            calories_per_jump: config.session.calories_per_jump,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Restarted,
    Quit,
}

/// このフレームで評価された分類器の結果（評価されなかったものは None）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameVerdicts {
    pub lateral: Option<LateralReading>,
    pub hands: Option<HandsReading>,
    pub posture: Option<PostureReading>,
    pub quit: Option<QuitReading>,
}

/// 1フレーム処理した結果
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: GameState,
    /// 発行順の入力イベント
    pub actions: Vec<InputAction>,
    pub verdicts: FrameVerdicts,
    pub event: Option<GameEvent>,
}

impl Step {
    pub fn is_quit(&self) -> bool {
        self.event == Some(GameEvent::Quit)
    }
}

/// フレーム間で持ち越すゲーム状態
///
/// 値として受け取り、更新後の値を `Step` で返す。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameState {
    pub phase: Phase,
    /// 0: 左, 1: 中央, 2: 右
    pub x_pos_index: u8,
    /// 0: しゃがみ, 1: 立ち, 2: ジャンプ
    pub y_pos_index: u8,
    /// ゲーム開始時の肩中点のY座標（px）
    pub mid_y_reference: Option<i32>,
    pub hands_joined_counter: u32,
    pub calories: f32,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            phase: Phase::NotStarted,
            x_pos_index: X_CENTER,
            y_pos_index: Y_STAND,
            mid_y_reference: None,
            hands_joined_counter: 0,
            calories: 0.0,
        }
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// 1フレーム分の状態遷移
    ///
    /// 順序: 左右移動 → 終了判定 → 合掌カウント（開始/リスタート）→ ジャンプ/しゃがみ
    pub fn advance(self, pose: Option<&Pose>, size: FrameSize, rules: &Rules) -> Step {
        let mut next = self;
        let mut actions = Vec::new();
        let mut verdicts = FrameVerdicts::default();

        let pose = match pose {
            Some(pose) => pose,
            None => {
                next.hands_joined_counter = 0;
                return Step {
                    state: next,
                    actions,
                    verdicts,
                    event: None,
                };
            }
        };
        let g = &rules.gesture;

        if next.is_running() {
            let lateral = classify_lateral(pose, size, g.lateral_angle_deg);
            next.apply_lateral(lateral.verdict, rules, &mut actions);
            verdicts.lateral = Some(lateral);

            let quit = classify_quit(pose, size, g.quit_distance);
            verdicts.quit = Some(quit);
            if quit.verdict == QuitStatus::Quit {
                actions.push(InputAction::click(rules.quit_click));
                return Step {
                    state: next,
                    actions,
                    verdicts,
                    event: Some(GameEvent::Quit),
                };
            }
        }

        let mut event = None;
        let hands = classify_hands(pose, size, g.hands_joined_distance);
        verdicts.hands = Some(hands);
        if hands.verdict == HandsStatus::Joined {
            next.hands_joined_counter += 1;
            if next.hands_joined_counter >= g.debounce_frames {
                match next.phase {
                    Phase::NotStarted => {
                        next.phase = Phase::Running;
                        next.mid_y_reference = Some(shoulder_mid_y(pose, size));
                        actions.push(InputAction::click(rules.start_click));
                        event = Some(GameEvent::Started);
                    }
                    Phase::Running => {
                        actions.push(InputAction::click(rules.restart_click));
                        event = Some(GameEvent::Restarted);
                    }
                }
                next.hands_joined_counter = 0;
            }
        } else {
            next.hands_joined_counter = 0;
        }

        if let Some(reference) = next.mid_y_reference {
            let posture = classify_posture(pose, size, reference, g.posture_band);
            next.apply_posture(posture.verdict, rules, &mut actions);
            verdicts.posture = Some(posture);
        }

        Step {
            state: next,
            actions,
            verdicts,
            event,
        }
    }

    /// 位置が変わったときだけキーを送る（1フレームに1段）
    fn apply_lateral(&mut self, verdict: Lateral, rules: &Rules, actions: &mut Vec<InputAction>) {
        let x = self.x_pos_index;
        let move_left = (verdict == Lateral::HandsLeft && x != X_LEFT)
            || (verdict == Lateral::Center && x == X_RIGHT);
        let move_right = (verdict == Lateral::HandsRight && x != X_RIGHT)
            || (verdict == Lateral::Center && x == X_LEFT);

        if move_left {
            actions.push(InputAction::Tap(GameKey::Left));
            self.x_pos_index -= 1;
        } else if move_right {
            actions.push(InputAction::Tap(GameKey::Right));
            self.x_pos_index += 1;
        } else {
            return;
        }
        self.calories += rules.calories_per_move;
    }

    fn apply_posture(&mut self, verdict: Posture, rules: &Rules, actions: &mut Vec<InputAction>) {
        let hold_down = rules.crouch_policy == CrouchPolicy::HoldDown;
        match (verdict, self.y_pos_index) {
            (Posture::Jumping, Y_STAND) => {
                actions.push(InputAction::Press(GameKey::Up));
                self.y_pos_index = Y_JUMP;
                self.calories += rules.calories_per_jump;
            }
            (Posture::Crouching, Y_STAND) if hold_down => {
                actions.push(InputAction::Press(GameKey::Down));
                self.y_pos_index = Y_CROUCH;
            }
            (Posture::Standing, Y_JUMP) => {
                actions.push(InputAction::Release(GameKey::Up));
                self.y_pos_index = Y_STAND;
            }
            (Posture::Standing, Y_CROUCH) => {
                actions.push(InputAction::Release(GameKey::Down));
                self.y_pos_index = Y_STAND;
            }
            _ => {}
        }
    }

    /// 押しっぱなしのキーを離すイベント（終了時用）
    pub fn release_held(&self) -> Vec<InputAction> {
        match self.y_pos_index {
            Y_JUMP => vec![InputAction::Release(GameKey::Up)],
            Y_CROUCH => vec![InputAction::Release(GameKey::Down)],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::fixtures::{pose_from_pixels, SIZE};
    use crate::pose::LandmarkIndex::*;

    /// テスト用の体の姿勢
    #[derive(Clone, Copy)]
    struct Body {
        shoulder_y: f32,
        hands_joined: bool,
        left_arm_up: bool,
        right_arm_up: bool,
        arms_crossed: bool,
    }

    impl Body {
        fn standing() -> Self {
            Self {
                shoulder_y: 300.5,
                hands_joined: false,
                left_arm_up: false,
                right_arm_up: false,
                arms_crossed: false,
            }
        }

        fn joined(mut self) -> Self {
            self.hands_joined = true;
            self
        }

        fn at_height(mut self, y: f32) -> Self {
            self.shoulder_y = y;
            self
        }

        fn left_up(mut self) -> Self {
            self.left_arm_up = true;
            self
        }

        fn right_up(mut self) -> Self {
            self.right_arm_up = true;
            self
        }

        fn crossed(mut self) -> Self {
            self.arms_crossed = true;
            self
        }

        fn pose(&self) -> Pose {
            let sy = self.shoulder_y;
            let left_elbow = if self.left_arm_up { (900.0, sy - 150.0) } else { (800.0, sy + 150.0) };
            let right_elbow = if self.right_arm_up { (380.0, sy - 150.0) } else { (480.0, sy + 150.0) };
            let (left_wrist, right_wrist) = if self.hands_joined {
                ((650.0, sy + 200.0), (630.0, sy + 200.0))
            } else {
                ((850.0, sy + 300.0), (430.0, sy + 300.0))
            };
            let (left_thumb, right_thumb) = if self.arms_crossed {
                ((500.0, sy + 20.0), (780.0, sy + 20.0))
            } else {
                ((850.0, sy + 310.0), (430.0, sy + 310.0))
            };
            pose_from_pixels(&[
                (LeftShoulder, 800.0, sy),
                (RightShoulder, 480.0, sy),
                (LeftHip, 760.0, sy + 300.0),
                (RightHip, 520.0, sy + 300.0),
                (LeftElbow, left_elbow.0, left_elbow.1),
                (RightElbow, right_elbow.0, right_elbow.1),
                (LeftWrist, left_wrist.0, left_wrist.1),
                (RightWrist, right_wrist.0, right_wrist.1),
                (LeftThumb, left_thumb.0, left_thumb.1),
                (RightThumb, right_thumb.0, right_thumb.1),
            ])
        }
    }

    fn step(state: GameState, body: Body, rules: &Rules) -> Step {
        state.advance(Some(&body.pose()), SIZE, rules)
    }

    fn running(reference: i32) -> GameState {
        GameState {
            phase: Phase::Running,
            mid_y_reference: Some(reference),
            ..GameState::new()
        }
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::new();
        assert_eq!(state.phase, Phase::NotStarted);
        assert_eq!(state.x_pos_index, 1);
        assert_eq!(state.y_pos_index, 1);
        assert_eq!(state.mid_y_reference, None);
        assert_eq!(state.hands_joined_counter, 0);
    }

    #[test]
    fn test_nine_joined_frames_then_break_does_not_start() {
        let rules = Rules::default();
        let mut state = GameState::new();
        for i in 1..=9 {
            let s = step(state, Body::standing().joined(), &rules);
            assert!(s.actions.is_empty());
            assert_eq!(s.state.hands_joined_counter, i);
            state = s.state;
        }
        let s = step(state, Body::standing(), &rules);
        assert_eq!(s.state.phase, Phase::NotStarted);
        assert_eq!(s.state.hands_joined_counter, 0);
        assert_eq!(s.state.mid_y_reference, None);
        assert!(s.actions.is_empty());
        assert_eq!(s.event, None);
    }

    #[test]
    fn test_ten_joined_frames_start_game() {
        let rules = Rules::default();
        let mut state = GameState::new();
        for _ in 0..9 {
            state = step(state, Body::standing().joined(), &rules).state;
        }
        // 10フレーム目だけ肩の高さを変えて、そのフレームで基準が取られることを確認
        let s = step(state, Body::standing().joined().at_height(240.5), &rules);
        assert_eq!(s.event, Some(GameEvent::Started));
        assert_eq!(s.state.phase, Phase::Running);
        assert_eq!(s.state.mid_y_reference, Some(240));
        assert_eq!(s.state.hands_joined_counter, 0);
        assert_eq!(s.actions, vec![InputAction::Click { x: 1300, y: 800 }]);
        // 開始フレームでも姿勢は評価される（基準と同じなので Standing）
        assert_eq!(s.verdicts.posture.map(|p| p.verdict), Some(Posture::Standing));
        assert!(s.verdicts.lateral.is_none());
    }

    #[test]
    fn test_missing_pose_resets_counter() {
        let rules = Rules::default();
        let state = GameState {
            hands_joined_counter: 7,
            ..GameState::new()
        };
        let s = state.advance(None, SIZE, &rules);
        assert_eq!(s.state.hands_joined_counter, 0);
        assert!(s.actions.is_empty());
        assert_eq!(s.verdicts, FrameVerdicts::default());
    }

    #[test]
    fn test_restart_while_running_keeps_reference() {
        let rules = Rules::default();
        let mut state = running(300);
        for _ in 0..9 {
            let s = step(state, Body::standing().joined(), &rules);
            assert!(s.actions.is_empty());
            state = s.state;
        }
        let s = step(state, Body::standing().joined(), &rules);
        assert_eq!(s.event, Some(GameEvent::Restarted));
        assert_eq!(s.actions, vec![InputAction::Click { x: 963, y: 500 }]);
        assert_eq!(s.state.phase, Phase::Running);
        assert_eq!(s.state.mid_y_reference, Some(300));
        assert_eq!(s.state.hands_joined_counter, 0);
    }

    #[test]
    fn test_center_is_edge_triggered() {
        let rules = Rules::default();
        let mut state = running(300);
        for _ in 0..5 {
            let s = step(state, Body::standing(), &rules);
            assert_eq!(s.verdicts.lateral.map(|l| l.verdict), Some(Lateral::Center));
            assert!(s.actions.is_empty());
            state = s.state;
        }
        assert_eq!(state.x_pos_index, 1);
    }

    #[test]
    fn test_move_left_once_while_held() {
        let rules = Rules::default();
        let s = step(running(300), Body::standing().right_up(), &rules);
        assert_eq!(s.actions, vec![InputAction::Tap(GameKey::Left)]);
        assert_eq!(s.state.x_pos_index, 0);

        let s = step(s.state, Body::standing().right_up(), &rules);
        assert!(s.actions.is_empty());
        assert_eq!(s.state.x_pos_index, 0);

        // 中央に戻る
        let s = step(s.state, Body::standing(), &rules);
        assert_eq!(s.actions, vec![InputAction::Tap(GameKey::Right)]);
        assert_eq!(s.state.x_pos_index, 1);
    }

    #[test]
    fn test_move_right_one_lane_per_frame() {
        let rules = Rules::default();
        let state = GameState {
            x_pos_index: 0,
            ..running(300)
        };
        let s = step(state, Body::standing().left_up(), &rules);
        assert_eq!(s.actions, vec![InputAction::Tap(GameKey::Right)]);
        assert_eq!(s.state.x_pos_index, 1);

        let s = step(s.state, Body::standing().left_up(), &rules);
        assert_eq!(s.actions, vec![InputAction::Tap(GameKey::Right)]);
        assert_eq!(s.state.x_pos_index, 2);

        let s = step(s.state, Body::standing().left_up(), &rules);
        assert!(s.actions.is_empty());
        assert_eq!(s.state.x_pos_index, 2);

        let s = step(s.state, Body::standing(), &rules);
        assert_eq!(s.actions, vec![InputAction::Tap(GameKey::Left)]);
        assert_eq!(s.state.x_pos_index, 1);
    }

    #[test]
    fn test_lateral_ignored_before_start() {
        let rules = Rules::default();
        let s = step(GameState::new(), Body::standing().right_up(), &rules);
        assert!(s.actions.is_empty());
        assert_eq!(s.state.x_pos_index, 1);
        assert!(s.verdicts.lateral.is_none());
        assert!(s.verdicts.posture.is_none());
    }

    #[test]
    fn test_jump_press_and_release() {
        let rules = Rules::default();
        let s = step(running(300), Body::standing().at_height(200.5), &rules);
        assert_eq!(s.actions, vec![InputAction::Press(GameKey::Up)]);
        assert_eq!(s.state.y_pos_index, 2);

        // 空中にいる間は何もしない
        let s = step(s.state, Body::standing().at_height(190.5), &rules);
        assert!(s.actions.is_empty());

        let s = step(s.state, Body::standing().at_height(300.5), &rules);
        assert_eq!(s.actions, vec![InputAction::Release(GameKey::Up)]);
        assert_eq!(s.state.y_pos_index, 1);
    }

    #[test]
    fn test_crouch_ignored_by_default() {
        let rules = Rules::default();
        let s = step(running(300), Body::standing().at_height(400.5), &rules);
        assert_eq!(s.verdicts.posture.map(|p| p.verdict), Some(Posture::Crouching));
        assert!(s.actions.is_empty());
        assert_eq!(s.state.y_pos_index, 1);
    }

    #[test]
    fn test_crouch_hold_down_policy() {
        let rules = Rules {
            crouch_policy: CrouchPolicy::HoldDown,
            ..Rules::default()
        };
        let s = step(running(300), Body::standing().at_height(400.5), &rules);
        assert_eq!(s.actions, vec![InputAction::Press(GameKey::Down)]);
        assert_eq!(s.state.y_pos_index, 0);

        // しゃがみからは直接ジャンプしない
        let s2 = step(s.state, Body::standing().at_height(200.5), &rules);
        assert!(s2.actions.is_empty());

        let s = step(s.state, Body::standing().at_height(300.5), &rules);
        assert_eq!(s.actions, vec![InputAction::Release(GameKey::Down)]);
        assert_eq!(s.state.y_pos_index, 1);
    }

    #[test]
    fn test_quit_gesture() {
        let rules = Rules::default();
        let state = GameState {
            hands_joined_counter: 3,
            ..running(300)
        };
        let s = step(state, Body::standing().crossed(), &rules);
        assert!(s.is_quit());
        assert_eq!(s.actions, vec![InputAction::Click { x: 969, y: 645 }]);
        // 終了フレームでは合掌・姿勢は評価しない
        assert!(s.verdicts.hands.is_none());
        assert!(s.verdicts.posture.is_none());
        assert_eq!(s.state.hands_joined_counter, 3);
    }

    #[test]
    fn test_quit_gesture_ignored_before_start() {
        let rules = Rules::default();
        let s = step(GameState::new(), Body::standing().crossed(), &rules);
        assert!(!s.is_quit());
        assert!(s.actions.is_empty());
        assert!(s.verdicts.quit.is_none());
    }

    #[test]
    fn test_calories() {
        let rules = Rules::default();
        let s = step(running(300), Body::standing().right_up(), &rules);
        let s = step(s.state, Body::standing().right_up().at_height(200.5), &rules);
        assert_eq!(s.state.x_pos_index, 0);
        assert!((s.state.calories - (0.33 + 0.166)).abs() < 1e-5);
    }

    #[test]
    fn test_custom_debounce() {
        let mut rules = Rules::default();
        rules.gesture.debounce_frames = 2;
        let s = step(GameState::new(), Body::standing().joined(), &rules);
        assert_eq!(s.state.phase, Phase::NotStarted);
        let s = step(s.state, Body::standing().joined(), &rules);
        assert_eq!(s.state.phase, Phase::Running);
    }

    #[test]
    fn test_release_held() {
        let state = GameState {
            y_pos_index: 2,
            ..running(300)
        };
        assert_eq!(state.release_held(), vec![InputAction::Release(GameKey::Up)]);
        assert!(running(300).release_held().is_empty());
    }
}
