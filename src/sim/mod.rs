//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (storage order; entities carry monotonic ids)
//! - No rendering, audio or platform dependencies
//!
//! Within a tick the fixed order is spawn -> move -> collide -> progress.

pub mod collision;
pub mod events;
pub mod motion;
pub mod progression;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use events::{GameEvent, GameSummary};
pub use rect::Rect;
pub use state::{
    ArmedWeapon, Boss, BossPattern, Bullet, BulletKind, Chicken, Difficulty, Explosion,
    ExplosionKind, GamePhase, GameState, PowerUp, PowerUpKind, Spaceship, WeaponKind,
};
pub use tick::{TickInput, fire_interval_ms, run_headless, tick};
