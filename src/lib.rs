//! Chicken Blitz - a browser arcade chicken shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, collisions, progression)
//! - `tuning`: Data-driven game balance (the single canonical difficulty curve)
//! - `settings`: User preferences persisted to LocalStorage
//! - `highscores`: Local top-10 leaderboard
//! - `audio`/`stage` (wasm only): presentation collaborators driven by sim events

pub mod highscores;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod stage;

/// Scale factor that converts a per-reference-frame speed into this tick's
/// displacement. Speeds throughout the sim are in pixels per 16 ms frame.
#[inline]
pub fn frame_scale(dt_ms: f32) -> f32 {
    dt_ms.clamp(0.0, tuning::MAX_TICK_MS) / tuning::REFERENCE_FRAME_MS
}
