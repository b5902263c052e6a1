//! VR Snake - path-following snake locomotion and the game around it
//!
//! This library provides:
//! - Core game logic (game module): the head trail, arc-length sampling,
//!   segment following and locomotion controller, plus food, effects,
//!   collisions and the game manager
//! - TUI rendering of a top-down view (render module)
//! - Keyboard input mapping (input module)
//! - Session metrics (metrics module)
//! - Execution modes (human, headless)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
