//! Grid Snake - a time-driven snake simulation on a fixed grid
//!
//! This library provides:
//! - Core simulation: movement model, step loop, bounds policy (game module)
//! - Drawing seam, scene painter and terminal view (render module)
//! - Quit/restart key mapping for the terminal host (input module)
//! - Run counters (metrics module)
//! - Terminal and headless hosts (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
