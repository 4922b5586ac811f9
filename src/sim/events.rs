//! Events and the end-of-run summary handed to collaborators
//!
//! The sim never calls audio or DOM code; it pushes events into a per-tick
//! outbox that the shell drains after each update. Reactions are
//! fire-and-forget - a failed sound or missing element cannot touch the sim.

use serde::{Deserialize, Serialize};

use super::state::PowerUpKind;

/// Discrete notification emitted during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Player auto-fire released a shot
    Shoot,
    /// A chicken took bullet damage (not necessarily fatal)
    ChickenHit,
    /// The boss took bullet damage
    BossHit,
    /// The boss released a volley
    BossShoot,
    /// The player was hit; `shielded` when a shield charge absorbed it
    PlayerHit { shielded: bool },
    /// A power-up was collected
    PowerUp { kind: PowerUpKind },
    /// Level advanced
    LevelUp { level: u32 },
    /// A boss entered the screen
    BossAppear,
    /// Something died with a blast
    Explosion,
    /// The run ended
    GameOver,
}

/// Final record handed to the persistence collaborator when a run ends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub player_name: String,
    pub score: u64,
    pub level: u32,
    /// Unix timestamp (ms) supplied by the shell
    pub timestamp_ms: f64,
}
