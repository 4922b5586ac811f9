//! Time-gated entity creation
//!
//! Chickens, power-ups and boss volleys are all created here, against the
//! accumulated sim clock. Boss creation itself is triggered by progression
//! (level milestones) and lives in this module too.

use glam::Vec2;
use rand::Rng;

use super::events::GameEvent;
use super::rect::Rect;
use super::state::{Boss, Bullet, BulletKind, Chicken, GameState, PowerUp, PowerUpKind};
use crate::tuning;

/// Run all periodic spawn gates for this tick
pub fn run(state: &mut GameState) {
    spawn_chickens(state);
    spawn_power_ups(state);
    boss_fire(state);
}

/// Chicken spawn gate. Suppressed entirely while a boss is active.
fn spawn_chickens(state: &mut GameState) {
    if state.boss.is_some() {
        return;
    }

    let interval = state.difficulty.effective_spawn_interval_ms();
    if state.time_ms - state.last_chicken_spawn_ms <= interval {
        return;
    }

    let cap = tuning::max_chickens(state.level);
    let batch = tuning::chickens_per_spawn(state.level);
    for _ in 0..batch {
        if state.chickens.len() >= cap {
            break;
        }
        spawn_one_chicken(state);
    }
    state.last_chicken_spawn_ms = state.time_ms;
}

fn spawn_one_chicken(state: &mut GameState) {
    let size = Vec2::new(tuning::CHICKEN_WIDTH, tuning::CHICKEN_HEIGHT);
    let x = state.rng.random_range(0.0..(state.screen.x - size.x).max(1.0));
    let speed = state.difficulty.effective_chicken_speed()
        + state.rng.random_range(0.0..tuning::CHICKEN_SPEED_JITTER);
    let health = tuning::chicken_health(state.level);
    let zigzag = state.rng.random_bool(tuning::ZIGZAG_CHANCE);
    let zigzag_dir = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let diver =
        state.level >= tuning::DIVER_MIN_LEVEL && state.rng.random_bool(tuning::DIVER_CHANCE);

    let id = state.next_entity_id();
    state.chickens.push(Chicken {
        id,
        rect: Rect::new(Vec2::new(x, -size.y), size),
        speed,
        health,
        max_health: health,
        zigzag,
        zigzag_dir,
        diver,
        dive: None,
    });
}

/// Power-up gate: random 15-25 s interval, kind uniform among the four.
fn spawn_power_ups(state: &mut GameState) {
    if state.time_ms < state.next_powerup_at_ms {
        return;
    }

    // First gate of a run just schedules; nothing drops at t=0
    if state.next_powerup_at_ms > 0.0 {
        let kind = match state.rng.random_range(0..4u8) {
            0 => PowerUpKind::Rapid,
            1 => PowerUpKind::Spread,
            2 => PowerUpKind::Shield,
            _ => PowerUpKind::Life,
        };
        let size = Vec2::splat(tuning::POWERUP_SIZE);
        let x = state.rng.random_range(0.0..(state.screen.x - size.x).max(1.0));
        let id = state.next_entity_id();
        state.power_ups.push(PowerUp {
            id,
            rect: Rect::new(Vec2::new(x, -size.y), size),
            speed: tuning::POWERUP_FALL_SPEED,
            kind,
        });
    }

    let interval = (tuning::POWERUP_INTERVAL_MIN_MS
        + state.rng.random_range(0.0..tuning::POWERUP_INTERVAL_JITTER_MS))
        / state.difficulty.powerup_chance_mult.max(0.1);
    state.next_powerup_at_ms = state.time_ms + interval;
}

/// Create the boss for the current level. Called from progression on
/// `level % BOSS_EVERY_LEVELS == 0`.
pub fn spawn_boss(state: &mut GameState) {
    let boss = Boss::new(state.level, state.screen, state.difficulty.boss_health_mult);
    log::info!(
        "Boss spawned: level {}, health {}, {} bullets per volley",
        state.level,
        boss.health,
        boss.bullet_count
    );
    state.boss = Some(boss);
    state.push_event(GameEvent::BossAppear);
}

/// Boss volley gate: fan of `bullet_count` bullets over a fixed spread.
/// From `BOSS_HOMING_LEVEL` the outermost pair homes gently on the ship.
fn boss_fire(state: &mut GameState) {
    let Some(boss) = state.boss.as_mut() else { return };

    if boss.shot_timer_ms < boss.shot_interval_ms {
        return;
    }
    boss.shot_timer_ms = 0.0;

    let count = boss.bullet_count.max(1);
    let muzzle = Vec2::new(
        boss.rect.pos.x + boss.rect.size.x / 2.0 - tuning::BOSS_BULLET_WIDTH / 2.0,
        boss.rect.pos.y + boss.rect.size.y,
    );
    let speed = tuning::boss_bullet_speed(boss.level);
    let homing_volley = boss.level >= tuning::BOSS_HOMING_LEVEL;

    let mut volley = Vec::with_capacity(count);
    for i in 0..count {
        let angle_deg = if count == 1 {
            0.0
        } else {
            -tuning::BOSS_SPREAD_DEG / 2.0
                + i as f32 * tuning::BOSS_SPREAD_DEG / (count - 1) as f32
        };
        let angle = angle_deg.to_radians();
        // Outermost pair homes; the rest fly their fan line
        let homing = if homing_volley && (i == 0 || i == count - 1) {
            tuning::BOSS_HOMING_STRENGTH
        } else {
            0.0
        };
        volley.push((
            Vec2::new(angle.sin() * speed, angle.cos() * speed),
            homing,
        ));
    }

    for (vel, homing) in volley {
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            rect: Rect::new(
                muzzle,
                Vec2::new(tuning::BOSS_BULLET_WIDTH, tuning::BOSS_BULLET_HEIGHT),
            ),
            vel,
            damage: tuning::BOSS_BULLET_DAMAGE,
            kind: BulletKind::Enemy,
            homing,
        });
    }
    state.push_event(GameEvent::BossShoot);
}
