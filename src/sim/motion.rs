//! Per-entity position integration
//!
//! Every displacement scales by `frame_scale = dt / 16ms`, so motion is
//! frame-rate independent. The ship is the only smoothed entity; everything
//! else follows its motion rule directly.

use glam::Vec2;
use rand::Rng;

use super::state::{BossPattern, GameState};
use crate::{frame_scale, tuning};

/// Glide the ship toward its pointer target with a deadzone, then clamp
/// into bounds. Runs every tick, including while paused.
pub fn glide_ship(state: &mut GameState, dt_ms: f32) {
    let scale = frame_scale(dt_ms);
    // The deadzone snap is still a move; zero elapsed time moves nothing
    if scale <= 0.0 {
        return;
    }
    let ship = &mut state.ship;
    let half = ship.rect.size * 0.5;
    let target = (ship.target - half).clamp(
        Vec2::splat(tuning::SCREEN_MARGIN),
        (state.screen - ship.rect.size - Vec2::splat(tuning::SCREEN_MARGIN))
            .max(Vec2::splat(tuning::SCREEN_MARGIN)),
    );

    let delta = target - ship.rect.pos;
    if delta.length() <= tuning::SHIP_DEADZONE {
        ship.rect.pos = target;
    } else {
        let t = (tuning::SHIP_LERP * scale).min(1.0);
        ship.rect.pos += delta * t;
    }
    ship.rect.clamp_into(state.screen, tuning::SCREEN_MARGIN);
}

/// Advance every gameplay entity by one tick
pub fn run(state: &mut GameState, dt_ms: f32) {
    // A zero delta must not roll the RNG or flip any directions
    if frame_scale(dt_ms) <= 0.0 {
        return;
    }
    update_chickens(state, dt_ms);
    update_boss(state, dt_ms);
    update_bullets(state, dt_ms);
    update_power_ups(state, dt_ms);
    update_explosions(state, dt_ms);
}

fn update_chickens(state: &mut GameState, dt_ms: f32) {
    let scale = frame_scale(dt_ms);
    let screen = state.screen;
    let player = state.ship.rect.center();
    let dive_trigger_y = screen.y * tuning::DIVE_TRIGGER_FRAC;
    let rng = &mut state.rng;

    for chicken in &mut state.chickens {
        // Divers commit once past the trigger line
        if chicken.diver && chicken.dive.is_none() && chicken.rect.pos.y > dive_trigger_y {
            let dir = (player - chicken.rect.center()).normalize_or_zero();
            chicken.dive = Some(dir * tuning::DIVE_SPEED);
        }

        if let Some(vel) = chicken.dive {
            // Steer toward the live player position, bounded per frame
            let to_player = player - chicken.rect.center();
            if to_player.length() <= tuning::DIVE_STOP_RADIUS {
                chicken.dive = None;
            } else {
                let desired = to_player.normalize_or_zero() * tuning::DIVE_SPEED;
                let steer = (tuning::DIVE_STEER * scale).min(1.0);
                let vel = vel + (desired - vel) * steer;
                chicken.rect.pos += vel * scale;
                chicken.dive = Some(vel);
                continue;
            }
        }

        chicken.rect.pos.y += chicken.speed * scale;

        if chicken.zigzag {
            chicken.rect.pos.x += chicken.zigzag_dir * tuning::ZIGZAG_SPEED * scale;
            let hit_wall = chicken.rect.pos.x <= 0.0
                || chicken.rect.pos.x >= screen.x - chicken.rect.size.x;
            if hit_wall || rng.random_bool(tuning::ZIGZAG_FLIP_CHANCE) {
                chicken.zigzag_dir = -chicken.zigzag_dir;
            }
        }
    }

    // Escaped chickens just leave; no score, no explosion
    state.chickens.retain(|c| !c.rect.below_screen(screen));
}

/// Apply the boss's active pattern formula, advance its timers, and
/// re-clamp into the top half of the screen.
fn update_boss(state: &mut GameState, dt_ms: f32) {
    let scale = frame_scale(dt_ms);
    let screen = state.screen;
    let Some(boss) = state.boss.as_mut() else { return };

    boss.shot_timer_ms += dt_ms;
    boss.pattern_elapsed_ms += dt_ms;
    if boss.pattern_elapsed_ms >= tuning::BOSS_PATTERN_MS {
        boss.pattern_elapsed_ms = 0.0;
        boss.pattern = boss.pattern.next();
        boss.anchor = boss.rect.pos;
        boss.dir = 1.0;
    }

    let t = boss.pattern_elapsed_ms / 1000.0;
    let step = boss.speed * scale;
    match boss.pattern {
        BossPattern::HorizontalSweep => {
            boss.rect.pos.x += boss.dir * step;
            if boss.rect.pos.x <= 0.0 || boss.rect.pos.x >= screen.x - boss.rect.size.x {
                boss.dir = -boss.dir;
            }
        }
        BossPattern::Zigzag => {
            boss.rect.pos.x += boss.dir * step * 1.5;
            boss.rect.pos.y = boss.anchor.y + (t * 6.0).sin() * 20.0;
            if boss.rect.pos.x <= 0.0 || boss.rect.pos.x >= screen.x - boss.rect.size.x {
                boss.dir = -boss.dir;
            }
        }
        BossPattern::CircularOrbit => {
            let radius = 60.0;
            let w = t * 2.5;
            boss.rect.pos =
                boss.anchor + Vec2::new(w.sin() * radius, (1.0 - w.cos()) * radius * 0.5);
        }
        BossPattern::VerticalBounce => {
            boss.rect.pos.y += boss.dir * step;
            if boss.rect.pos.y <= tuning::SCREEN_MARGIN
                || boss.rect.pos.y >= screen.y / 2.0 - boss.rect.size.y
            {
                boss.dir = -boss.dir;
            }
        }
        BossPattern::VerticalRush => {
            // Fast lunge down, slow recovery toward the anchor
            if boss.dir > 0.0 {
                boss.rect.pos.y += step * 3.0;
                if boss.rect.pos.y >= screen.y / 2.0 - boss.rect.size.y {
                    boss.dir = -1.0;
                }
            } else {
                boss.rect.pos.y -= step;
                if boss.rect.pos.y <= boss.anchor.y {
                    boss.dir = 1.0;
                }
            }
        }
        BossPattern::SineWave => {
            boss.rect.pos.x = boss.anchor.x + (t * 3.0).sin() * 120.0;
            boss.rect.pos.y = boss.anchor.y + (t * 6.0).sin() * 15.0;
        }
    }

    // Whatever the formula did, the boss stays in the top half
    let bounds = Vec2::new(screen.x, screen.y / 2.0 + boss.rect.size.y);
    boss.rect.clamp_into(bounds, 0.0);
}

fn update_bullets(state: &mut GameState, dt_ms: f32) {
    let scale = frame_scale(dt_ms);
    let screen = state.screen;
    let player = state.ship.rect.center();

    for bullet in &mut state.bullets {
        if bullet.homing > 0.0 {
            // Steering, not teleporting: blend velocity toward the player
            let speed = bullet.vel.length();
            let desired = (player - bullet.rect.center()).normalize_or_zero() * speed;
            let steer = (bullet.homing * scale).min(1.0);
            bullet.vel += (desired - bullet.vel) * steer;
        }
        bullet.rect.pos += bullet.vel * scale;
    }

    state
        .bullets
        .retain(|b| !b.rect.off_screen(screen, tuning::BULLET_OFFSCREEN_GRACE));
}

fn update_power_ups(state: &mut GameState, dt_ms: f32) {
    let scale = frame_scale(dt_ms);
    let screen = state.screen;
    for power_up in &mut state.power_ups {
        power_up.rect.pos.y += power_up.speed * scale;
    }
    state.power_ups.retain(|p| !p.rect.below_screen(screen));
}

fn update_explosions(state: &mut GameState, dt_ms: f32) {
    for explosion in &mut state.explosions {
        explosion.life_ms -= dt_ms;
    }
    state.explosions.retain(|e| e.life_ms > 0.0);
}
