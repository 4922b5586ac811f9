//! Level, kill-quota and difficulty control
//!
//! Advances the level once the per-level kill quota is met and no boss is
//! on screen; clears transient entities, scales difficulty and spawns a
//! boss on the milestone levels.

use super::events::GameEvent;
use super::spawn;
use super::state::GameState;
use crate::tuning;

/// Check the quota and advance at most one level per tick
pub fn run(state: &mut GameState) {
    if state.kills_this_level < tuning::required_kills(state.level) || state.boss.is_some() {
        return;
    }
    next_level(state);
}

fn next_level(state: &mut GameState) {
    // Transient collections do not survive a level transition
    state.chickens.clear();
    state.bullets.clear();
    state.power_ups.clear();
    state.explosions.clear();

    state.level += 1;
    state.kills_this_level = 0;
    state.difficulty.increase();
    state.push_event(GameEvent::LevelUp { level: state.level });
    log::info!(
        "Level {}: spawn gate {:.0} ms, chicken speed {:.2}, quota {}",
        state.level,
        state.difficulty.spawn_interval_ms,
        state.difficulty.chicken_speed,
        tuning::required_kills(state.level)
    );

    if state.level % tuning::BOSS_EVERY_LEVELS == 0 {
        spawn::spawn_boss(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;
    use crate::sim::state::{Boss, Bullet, BulletKind};
    use glam::Vec2;

    fn running_state() -> GameState {
        let mut state = GameState::new(3, Vec2::new(800.0, 600.0));
        state.start("tester");
        state
    }

    #[test]
    fn test_no_advance_below_quota() {
        let mut state = running_state();
        state.kills_this_level = tuning::required_kills(1) - 1;
        run(&mut state);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_single_advance_per_satisfying_tick() {
        let mut state = running_state();
        // Far beyond the quota still advances exactly once
        state.kills_this_level = tuning::required_kills(1) * 10;
        run(&mut state);
        assert_eq!(state.level, 2);
        assert_eq!(state.kills_this_level, 0);
        assert!(state
            .take_events()
            .contains(&GameEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn test_boss_blocks_advance() {
        let mut state = running_state();
        state.kills_this_level = tuning::required_kills(1);
        state.boss = Some(Boss::new(3, state.screen, 1.0));
        run(&mut state);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_transition_clears_transients() {
        let mut state = running_state();
        state.kills_this_level = tuning::required_kills(1);
        state.bullets.push(Bullet {
            id: 1,
            rect: Rect::new(Vec2::ZERO, Vec2::new(4.0, 12.0)),
            vel: Vec2::ZERO,
            damage: 10.0,
            kind: BulletKind::Normal,
            homing: 0.0,
        });
        run(&mut state);
        assert!(state.bullets.is_empty());
        assert!(state.chickens.is_empty());
        assert!(state.power_ups.is_empty());
    }

    #[test]
    fn test_boss_spawns_on_milestone_levels() {
        let mut state = running_state();
        state.level = tuning::BOSS_EVERY_LEVELS - 1;
        state.kills_this_level = tuning::required_kills(state.level);
        run(&mut state);
        assert_eq!(state.level, tuning::BOSS_EVERY_LEVELS);
        assert!(state.boss.is_some());
        assert!(state.take_events().contains(&GameEvent::BossAppear));
    }

    #[test]
    fn test_difficulty_scales_with_floor() {
        let mut state = running_state();
        for _ in 0..30 {
            state.boss = None;
            state.kills_this_level = tuning::required_kills(state.level);
            run(&mut state);
        }
        assert_eq!(
            state.difficulty.spawn_interval_ms,
            tuning::SPAWN_INTERVAL_FLOOR_MS
        );
        assert!(state.difficulty.chicken_speed <= tuning::CHICKEN_SPEED_CEILING);
    }
}
