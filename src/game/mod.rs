pub mod action;
pub mod state;

pub use action::{GameKey, InputAction};
pub use state::{CrouchPolicy, FrameVerdicts, GameEvent, GameState, Phase, Rules, Step};
