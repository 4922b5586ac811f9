//! Pairwise overlap resolution
//!
//! Deterministic given entity positions and sizes: bullets iterate outer,
//! targets inner, in storage order; the first overlapping target consumes
//! the bullet, so one bullet hits at most one thing per tick.

use super::events::GameEvent;
use super::state::{ExplosionKind, GamePhase, GameState, PowerUpKind, WeaponKind};
use crate::tuning;

/// Resolve all collisions for this tick and apply their game-state effects
pub fn run(state: &mut GameState) {
    player_bullets_vs_enemies(state);
    enemy_bullets_vs_player(state);
    chickens_vs_player(state);
    power_ups_vs_player(state);
}

/// Player bullets against chickens first, then the boss
fn player_bullets_vs_enemies(state: &mut GameState) {
    let mut bullet_idx = 0;
    while bullet_idx < state.bullets.len() {
        if state.bullets[bullet_idx].is_enemy() {
            bullet_idx += 1;
            continue;
        }

        let bullet_rect = state.bullets[bullet_idx].rect;
        let damage = state.bullets[bullet_idx].damage;

        let hit_chicken = state
            .chickens
            .iter()
            .position(|c| bullet_rect.overlaps(&c.rect, tuning::BULLET_HIT_PAD));

        if let Some(chicken_idx) = hit_chicken {
            state.bullets.remove(bullet_idx);
            let center = state.chickens[chicken_idx].rect.center();
            state.chickens[chicken_idx].health -= damage;
            state.spawn_explosion(center, ExplosionKind::Flash);
            state.push_event(GameEvent::ChickenHit);

            if state.chickens[chicken_idx].health <= 0.0 {
                state.chickens.remove(chicken_idx);
                state.spawn_explosion(center, ExplosionKind::Blast);
                state.push_event(GameEvent::Explosion);
                state.add_score(tuning::SCORE_CHICKEN);
                state.kills_this_level += 1;
            }
            continue; // bullet consumed, same index now holds the next bullet
        }

        let boss_rect = state.boss.as_ref().map(|b| b.rect);
        if let Some(boss_rect) = boss_rect {
            if bullet_rect.overlaps(&boss_rect, tuning::BULLET_HIT_PAD) {
                state.bullets.remove(bullet_idx);
                let center = boss_rect.center();
                state.spawn_explosion(center, ExplosionKind::Flash);
                state.push_event(GameEvent::BossHit);
                state.add_score(tuning::SCORE_BOSS_HIT);

                let dead = {
                    let boss = state.boss.as_mut().expect("boss checked above");
                    boss.health -= damage;
                    boss.health <= 0.0
                };
                if dead {
                    state.boss = None;
                    state.spawn_explosion(center, ExplosionKind::Blast);
                    state.push_event(GameEvent::Explosion);
                    state.add_score(tuning::SCORE_BOSS_KILL);
                }
                continue;
            }
        }

        bullet_idx += 1;
    }
}

fn enemy_bullets_vs_player(state: &mut GameState) {
    let ship_rect = state.ship.rect;
    let mut hits = Vec::new();
    state.bullets.retain(|b| {
        if b.is_enemy() && b.rect.overlaps(&ship_rect, tuning::PLAYER_HIT_PAD) {
            hits.push(b.damage);
            false
        } else {
            true
        }
    });
    for damage in hits {
        if state.phase != GamePhase::Ended {
            state.damage_player(damage);
        }
    }
}

fn chickens_vs_player(state: &mut GameState) {
    let ship_rect = state.ship.rect;
    let mut rammed = Vec::new();
    state.chickens.retain(|c| {
        if c.rect.overlaps(&ship_rect, tuning::PLAYER_HIT_PAD) {
            rammed.push(c.rect.center());
            false
        } else {
            true
        }
    });
    for center in rammed {
        state.spawn_explosion(center, ExplosionKind::Blast);
        state.push_event(GameEvent::Explosion);
        if state.phase != GamePhase::Ended {
            state.damage_player(tuning::CHICKEN_CONTACT_DAMAGE);
        }
    }
}

/// Generous pickup radius; applies the power-up's effect and removes it
fn power_ups_vs_player(state: &mut GameState) {
    let ship_rect = state.ship.rect;
    let mut collected = Vec::new();
    state.power_ups.retain(|p| {
        if p.rect.overlaps(&ship_rect, tuning::PICKUP_PAD) {
            collected.push(p.kind);
            false
        } else {
            true
        }
    });
    for kind in collected {
        apply_power_up(state, kind);
        state.push_event(GameEvent::PowerUp { kind });
    }
}

fn apply_power_up(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Rapid => arm_weapon(state, WeaponKind::Rapid),
        PowerUpKind::Spread => arm_weapon(state, WeaponKind::Spread),
        PowerUpKind::Shield => state.shield = (state.shield + 1).min(tuning::MAX_SHIELD),
        PowerUpKind::Life => state.add_life(),
    }
}

fn arm_weapon(state: &mut GameState, kind: WeaponKind) {
    state.weapon.kind = kind;
    state.weapon.time_left_ms = tuning::WEAPON_DURATION_MS;
    // Weapon change restarts the auto-fire timer
    state.fire_timer_ms = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;
    use crate::sim::spawn;
    use crate::sim::state::{Boss, Bullet, BulletKind, Chicken, PowerUp};
    use glam::Vec2;

    fn running_state() -> GameState {
        let mut state = GameState::new(11, Vec2::new(800.0, 600.0));
        state.start("tester");
        state
    }

    fn chicken_at(id: u32, x: f32, y: f32, health: f32) -> Chicken {
        Chicken {
            id,
            rect: Rect::new(
                Vec2::new(x, y),
                Vec2::new(tuning::CHICKEN_WIDTH, tuning::CHICKEN_HEIGHT),
            ),
            speed: 2.0,
            health,
            max_health: health,
            zigzag: false,
            zigzag_dir: 1.0,
            diver: false,
            dive: None,
        }
    }

    fn bullet_at(id: u32, x: f32, y: f32, damage: f32, kind: BulletKind) -> Bullet {
        Bullet {
            id,
            rect: Rect::new(Vec2::new(x, y), Vec2::new(4.0, 12.0)),
            vel: Vec2::ZERO,
            damage,
            kind,
            homing: 0.0,
        }
    }

    #[test]
    fn test_single_hit_kills_level_one_chicken() {
        let mut state = running_state();
        state.chickens.push(chicken_at(1, 100.0, 100.0, 1.0));
        state.bullets.push(bullet_at(2, 110.0, 110.0, 10.0, BulletKind::Normal));

        run(&mut state);

        assert!(state.chickens.is_empty());
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, (tuning::SCORE_CHICKEN * state.level) as u64);
        assert_eq!(state.kills_this_level, 1);
        let events = state.take_events();
        assert!(events.contains(&GameEvent::ChickenHit));
        assert!(events.contains(&GameEvent::Explosion));
    }

    #[test]
    fn test_chicken_dies_after_ceil_health_over_damage_hits() {
        let mut state = running_state();
        let health = 25.0;
        let damage = 10.0;
        state.chickens.push(chicken_at(1, 100.0, 100.0, health));

        let expected_hits = (health / damage).ceil() as u32; // 3
        for hit in 1..=expected_hits {
            state
                .bullets
                .push(bullet_at(100 + hit, 110.0, 110.0, damage, BulletKind::Normal));
            run(&mut state);
            if hit < expected_hits {
                assert_eq!(state.chickens.len(), 1, "alive after hit {}", hit);
            }
        }
        assert!(state.chickens.is_empty(), "dies exactly on hit {}", expected_hits);
    }

    #[test]
    fn test_bullet_consumed_by_first_target_only() {
        let mut state = running_state();
        state.chickens.push(chicken_at(1, 100.0, 100.0, 20.0));
        state.chickens.push(chicken_at(2, 105.0, 100.0, 20.0));
        state.bullets.push(bullet_at(3, 110.0, 110.0, 10.0, BulletKind::Normal));

        run(&mut state);

        assert!(state.bullets.is_empty());
        // Only the first stored chicken took damage
        assert_eq!(state.chickens[0].health, 10.0);
        assert_eq!(state.chickens[1].health, 20.0);
    }

    #[test]
    fn test_boss_kill_arithmetic() {
        let mut state = running_state();
        state.level = 3;
        let health = 75.0;
        let damage = 10.0;
        let mut boss = Boss::new(3, state.screen, 1.0);
        boss.health = health;
        boss.max_health = health;
        let boss_center = boss.rect.center();
        state.boss = Some(boss);

        let hits = (health / damage).ceil() as u64; // 8
        for i in 0..hits {
            state.bullets.push(bullet_at(
                100 + i as u32,
                boss_center.x,
                boss_center.y,
                damage,
                BulletKind::Normal,
            ));
            run(&mut state);
        }

        assert!(state.boss.is_none(), "boss dies on hit {}", hits);
        // Every hit awards the hit score; the kill adds the bonus, all x level
        let expected = (hits * tuning::SCORE_BOSS_HIT as u64 + tuning::SCORE_BOSS_KILL as u64)
            * state.level as u64;
        assert_eq!(state.score, expected);
        // Boss kills do not count toward the chicken quota
        assert_eq!(state.kills_this_level, 0);
    }

    #[test]
    fn test_enemy_bullet_hits_player() {
        let mut state = running_state();
        let ship_center = state.ship.rect.center();
        state.bullets.push(bullet_at(
            1,
            ship_center.x,
            ship_center.y,
            tuning::BOSS_BULLET_DAMAGE,
            BulletKind::Enemy,
        ));
        run(&mut state);
        assert!(state.bullets.is_empty());
        assert_eq!(state.lives, tuning::STARTING_LIVES - 0.5);
        assert!(state
            .take_events()
            .contains(&GameEvent::PlayerHit { shielded: false }));
    }

    #[test]
    fn test_enemy_bullet_ignored_by_enemy_check() {
        let mut state = running_state();
        state.chickens.push(chicken_at(1, 100.0, 100.0, 1.0));
        state.bullets.push(bullet_at(2, 110.0, 110.0, 0.5, BulletKind::Enemy));
        run(&mut state);
        // Enemy fire passes through chickens
        assert_eq!(state.chickens.len(), 1);
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_chicken_ramming_costs_full_life() {
        let mut state = running_state();
        let ship_pos = state.ship.rect.pos;
        state.chickens.push(chicken_at(1, ship_pos.x, ship_pos.y, 3.0));
        run(&mut state);
        assert!(state.chickens.is_empty());
        assert_eq!(state.lives, tuning::STARTING_LIVES - 1.0);
        assert_eq!(state.explosions.len(), 1);
    }

    #[test]
    fn test_shielded_hit_consumes_charge_not_life() {
        let mut state = running_state();
        state.shield = 1;
        let ship_center = state.ship.rect.center();
        state.bullets.push(bullet_at(1, ship_center.x, ship_center.y, 0.5, BulletKind::Enemy));
        run(&mut state);
        assert_eq!(state.shield, 0);
        assert_eq!(state.lives, tuning::STARTING_LIVES);
        assert!(state
            .take_events()
            .contains(&GameEvent::PlayerHit { shielded: true }));
    }

    #[test]
    fn test_powerup_pickup_is_generous_and_arms_weapon() {
        let mut state = running_state();
        let ship = state.ship.rect;
        // Just past the edge: inside the +5 pickup band, outside a strict test
        state.power_ups.push(PowerUp {
            id: 1,
            rect: Rect::new(
                Vec2::new(ship.pos.x + ship.size.x + 2.0, ship.pos.y),
                Vec2::splat(tuning::POWERUP_SIZE),
            ),
            speed: 2.0,
            kind: PowerUpKind::Rapid,
        });
        state.fire_timer_ms = 90.0;
        run(&mut state);
        assert!(state.power_ups.is_empty());
        assert_eq!(state.weapon.kind, WeaponKind::Rapid);
        assert_eq!(state.weapon.time_left_ms, tuning::WEAPON_DURATION_MS);
        assert_eq!(state.fire_timer_ms, 0.0, "weapon change restarts auto-fire");
    }

    #[test]
    fn test_shield_powerup_stacks_to_cap() {
        let mut state = running_state();
        for _ in 0..5 {
            apply_power_up(&mut state, PowerUpKind::Shield);
        }
        assert_eq!(state.shield, tuning::MAX_SHIELD);
    }

    #[test]
    fn test_boss_volley_then_player_death_flow() {
        // Lives at 0.5, one boss bullet ends the run
        let mut state = running_state();
        state.lives = 0.5;
        state.level = 3;
        spawn::spawn_boss(&mut state);
        let ship_center = state.ship.rect.center();
        state.bullets.push(bullet_at(1, ship_center.x, ship_center.y, 0.5, BulletKind::Enemy));
        run(&mut state);
        assert_eq!(state.phase, GamePhase::Ended);
    }
}
