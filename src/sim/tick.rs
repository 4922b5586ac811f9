//! Per-frame orchestration
//!
//! One `tick` per animation frame. While running, subsystems execute in a
//! fixed order - spawn, move, collide, progress - so collisions never see
//! entities that have not moved yet, and progression never runs before the
//! tick's kills are counted.

use glam::Vec2;
use rand::Rng;

use super::events::GameEvent;
use super::state::{Bullet, GamePhase, GameState, WeaponKind};
use super::{collision, motion, progression, spawn};
use crate::tuning;

/// Input for a single tick. The sim only reads the newest values; there is
/// no input queue.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer/touch position in game-area coordinates
    pub target: Option<Vec2>,
    /// Pause toggle (one-shot)
    pub pause: bool,
}

/// Advance the game by one frame's worth of time.
///
/// `dt_ms` is clamped into `[0, MAX_TICK_MS]` before any integration, so a
/// tab-inactive gap cannot teleport entities and a negative delta cannot
/// run time backwards.
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    let dt_ms = if dt_ms.is_finite() {
        dt_ms.clamp(0.0, tuning::MAX_TICK_MS)
    } else {
        0.0
    };

    if input.pause {
        match state.phase {
            GamePhase::Running => state.phase = GamePhase::Paused,
            GamePhase::Paused => {
                state.phase = GamePhase::Running;
                // Unpausing restarts the auto-fire timer
                state.fire_timer_ms = 0.0;
            }
            _ => {}
        }
    }

    if let Some(target) = input.target {
        state.ship.target = target.clamp(Vec2::ZERO, state.screen);
    }

    match state.phase {
        GamePhase::NotStarted | GamePhase::Ended => return,
        GamePhase::Paused => {
            // The ship keeps gliding behind the pause overlay; nothing else runs
            motion::glide_ship(state, dt_ms);
            return;
        }
        GamePhase::Running => {}
    }

    state.time_ms += dt_ms;
    motion::glide_ship(state, dt_ms);
    update_weapon(state, dt_ms);
    auto_fire(state, dt_ms);

    spawn::run(state);
    motion::run(state, dt_ms);
    collision::run(state);
    progression::run(state);

    state.enforce_caps();
}

/// Armed weapon counts down and reverts to normal
fn update_weapon(state: &mut GameState, dt_ms: f32) {
    if state.weapon.kind == WeaponKind::Normal {
        return;
    }
    state.weapon.time_left_ms -= dt_ms;
    if state.weapon.time_left_ms <= 0.0 {
        state.weapon.kind = WeaponKind::Normal;
        state.weapon.time_left_ms = 0.0;
        state.fire_timer_ms = 0.0;
    }
}

/// Effective auto-fire interval for the armed weapon
pub fn fire_interval_ms(state: &GameState) -> f32 {
    if state.weapon.kind == WeaponKind::Rapid {
        tuning::RAPID_FIRE_INTERVAL_MS
    } else {
        state.base_fire_interval_ms
    }
}

/// Auto-fire runs on its own accumulator, not the render cadence
fn auto_fire(state: &mut GameState, dt_ms: f32) {
    state.fire_timer_ms += dt_ms;
    let interval = fire_interval_ms(state);
    if state.fire_timer_ms < interval {
        return;
    }
    state.fire_timer_ms -= interval;
    shoot(state);
}

/// Release one shot (three angled for spread) from the ship's nose
fn shoot(state: &mut GameState) {
    let weapon = state.weapon.kind;
    let size = weapon.bullet_size();
    let speed = weapon.bullet_speed();
    let muzzle = Vec2::new(
        state.ship.rect.pos.x + state.ship.rect.size.x / 2.0 - size.x / 2.0,
        state.ship.rect.pos.y - size.y,
    );

    let angles: &[f32] = if weapon == WeaponKind::Spread {
        &[-tuning::SPREAD_HALF_ANGLE, 0.0, tuning::SPREAD_HALF_ANGLE]
    } else {
        &[0.0]
    };

    for &angle in angles {
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            rect: super::rect::Rect::new(muzzle, size),
            vel: Vec2::new(angle.sin() * speed, -angle.cos() * speed),
            damage: weapon.damage(),
            kind: weapon.bullet_kind(),
            homing: 0.0,
        });
    }
    state.push_event(GameEvent::Shoot);
}

/// Scripted headless run used by the native demo and soak tests. Drives the
/// ship on a slow sweep for `ticks` frames and returns the final state.
pub fn run_headless(seed: u64, screen: Vec2, ticks: u32) -> GameState {
    let mut state = GameState::new(seed, screen);
    state.start("demo");
    let mut input = TickInput::default();
    let mut rng = <rand_pcg::Pcg32 as rand::SeedableRng>::seed_from_u64(seed ^ 0x5eed);

    for i in 0..ticks {
        if i % 30 == 0 {
            input.target = Some(Vec2::new(
                rng.random_range(0.0..screen.x),
                screen.y - rng.random_range(60.0..160.0),
            ));
        }
        tick(&mut state, &input, 16.0);
        input.target = None;
        if state.phase == GamePhase::Ended {
            break;
        }
    }
    state
}
