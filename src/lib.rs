//! dockfade library - hotkey-driven fading dock panel

pub mod app;
pub mod config;
pub mod constants;
pub mod core;
pub mod input;
pub mod platform;
pub mod renderer;
