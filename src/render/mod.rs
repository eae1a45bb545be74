#[cfg(feature = "desktop")]
pub mod overlay;
pub mod skeleton;
#[cfg(feature = "desktop")]
pub mod window;

#[cfg(feature = "desktop")]
pub use overlay::{annotate, draw_skeleton};
pub use skeleton::SKELETON_CONNECTIONS;
#[cfg(feature = "desktop")]
pub use window::MinifbRenderer;
