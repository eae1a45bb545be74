#[cfg(feature = "desktop")]
pub mod app;
#[cfg(feature = "desktop")]
pub mod camera;
pub mod config;
pub mod fps;
pub mod game;
pub mod gesture;
pub mod input;
pub mod launcher;
pub mod pose;
pub mod render;
