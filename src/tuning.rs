//! Data-driven game balance
//!
//! Every spawn-rate, speed, size and score formula lives here so there is
//! exactly one difficulty curve. All speeds are pixels per reference frame
//! (16 ms); all timers are milliseconds of accumulated sim time.

/// Reference frame duration - speeds are "pixels per 16 ms"
pub const REFERENCE_FRAME_MS: f32 = 16.0;
/// Largest delta a single tick may integrate (tab-inactive protection)
pub const MAX_TICK_MS: f32 = 50.0;

/// Margin kept between the ship and the screen edge
pub const SCREEN_MARGIN: f32 = 10.0;

// === Spaceship ===
pub const SHIP_WIDTH: f32 = 60.0;
pub const SHIP_HEIGHT: f32 = 40.0;
/// Exponential glide factor toward the pointer target (per reference frame)
pub const SHIP_LERP: f32 = 0.35;
/// Snap-to-target distance; avoids oscillation around the pointer
pub const SHIP_DEADZONE: f32 = 2.0;

// === Chickens ===
pub const CHICKEN_WIDTH: f32 = 40.0;
pub const CHICKEN_HEIGHT: f32 = 30.0;
/// Base fall speed at level 1
pub const CHICKEN_BASE_SPEED: f32 = 1.5;
/// Random speed jitter added on spawn
pub const CHICKEN_SPEED_JITTER: f32 = 2.0;
/// Per-level fall speed multiplier
pub const CHICKEN_SPEED_GROWTH: f32 = 1.25;
pub const CHICKEN_SPEED_CEILING: f32 = 12.0;
/// Probability a spawned chicken zigzags
pub const ZIGZAG_CHANCE: f64 = 0.5;
/// Lateral zigzag speed
pub const ZIGZAG_SPEED: f32 = 2.0;
/// Per-frame chance a zigzag reverses away from a wall
pub const ZIGZAG_FLIP_CHANCE: f64 = 0.005;

/// Level at which diver chickens start appearing
pub const DIVER_MIN_LEVEL: u32 = 4;
pub const DIVER_CHANCE: f64 = 0.15;
/// Fraction of screen height at which a diver commits to its dive
pub const DIVE_TRIGGER_FRAC: f32 = 0.3;
/// Dive steering fraction per reference frame
pub const DIVE_STEER: f32 = 0.08;
pub const DIVE_SPEED: f32 = 5.0;
/// Distance to the player at which a dive breaks off
pub const DIVE_STOP_RADIUS: f32 = 60.0;

/// Spawn gate at level 1
pub const SPAWN_INTERVAL_MS: f32 = 600.0;
/// Per-level spawn interval decay
pub const SPAWN_INTERVAL_DECAY: f32 = 0.7;
/// Spawn interval never drops below this
pub const SPAWN_INTERVAL_FLOOR_MS: f32 = 100.0;

/// Chickens created per spawn event
pub fn chickens_per_spawn(level: u32) -> usize {
    (1 + level as usize / 4).min(3)
}

/// On-screen chicken cap
pub fn max_chickens(level: u32) -> usize {
    (8 + level as usize * 2).min(20)
}

/// Chicken health by level
pub fn chicken_health(level: u32) -> f32 {
    (level / 3 + 1) as f32
}

// === Bullets ===
pub const BULLET_OFFSCREEN_GRACE: f32 = 10.0;
/// Live player+enemy bullet cap; oldest pruned first
pub const MAX_BULLETS: usize = 200;

// === Power-ups ===
pub const POWERUP_SIZE: f32 = 32.0;
pub const POWERUP_FALL_SPEED: f32 = 2.0;
pub const POWERUP_INTERVAL_MIN_MS: f32 = 15_000.0;
pub const POWERUP_INTERVAL_JITTER_MS: f32 = 10_000.0;
pub const MAX_POWERUPS: usize = 8;
/// Armed weapon duration
pub const WEAPON_DURATION_MS: f32 = 5_000.0;
pub const MAX_SHIELD: u32 = 3;
pub const MAX_LIVES: f32 = 5.0;
pub const STARTING_LIVES: f32 = 3.0;

// === Explosions ===
pub const BLAST_LIFE_MS: f32 = 500.0;
pub const FLASH_LIFE_MS: f32 = 150.0;
pub const MAX_EXPLOSIONS: usize = 64;

// === Auto-fire ===
/// Rapid weapon overrides the configured base rate
pub const RAPID_FIRE_INTERVAL_MS: f32 = 100.0;
/// Spread fan half-angle in radians (+/- 15 degrees)
pub const SPREAD_HALF_ANGLE: f32 = 15.0 * std::f32::consts::PI / 180.0;

// === Boss ===
/// A boss appears every this many levels
pub const BOSS_EVERY_LEVELS: u32 = 3;
/// Active movement pattern switches on this cadence
pub const BOSS_PATTERN_MS: f32 = 2_500.0;
/// Boss volley fan width in degrees
pub const BOSS_SPREAD_DEG: f32 = 60.0;
/// Level at which the outermost volley pair starts homing
pub const BOSS_HOMING_LEVEL: u32 = 6;
/// Homing steering fraction per reference frame
pub const BOSS_HOMING_STRENGTH: f32 = 0.05;
pub const BOSS_BULLET_WIDTH: f32 = 6.0;
pub const BOSS_BULLET_HEIGHT: f32 = 12.0;
/// Boss bullets chip half a life
pub const BOSS_BULLET_DAMAGE: f32 = 0.5;
/// A chicken ramming the ship costs a full life
pub const CHICKEN_CONTACT_DAMAGE: f32 = 1.0;

pub fn boss_size(level: u32) -> f32 {
    (80.0 + (level / 5) as f32 * 20.0).min(200.0)
}

pub fn boss_health(level: u32) -> f32 {
    (level * 25 + 50) as f32
}

pub fn boss_speed(level: u32) -> f32 {
    (1.0 + level as f32 * 0.3).min(5.0)
}

pub fn boss_shot_interval_ms(level: u32) -> f32 {
    (600.0 - level as f32 * 30.0).max(200.0)
}

pub fn boss_bullet_count(level: u32) -> usize {
    (3 + level as usize / 2).min(10)
}

pub fn boss_bullet_speed(level: u32) -> f32 {
    5.0 + (level / 2) as f32
}

// === Collision paddings ===
/// Bullets must visibly overlap an enemy
pub const BULLET_HIT_PAD: f32 = -1.0;
/// Enemies must visibly overlap the ship
pub const PLAYER_HIT_PAD: f32 = -2.0;
/// Power-up pickup is generous
pub const PICKUP_PAD: f32 = 5.0;

// === Scoring (multiplied by current level on award) ===
pub const SCORE_CHICKEN: u32 = 10;
pub const SCORE_BOSS_HIT: u32 = 50;
pub const SCORE_BOSS_KILL: u32 = 500;

/// Kill quota gating progression to the next level.
/// Strictly increasing: 37 at level 1, 50 at level 2, 65 at level 3, ...
pub fn required_kills(level: u32) -> u32 {
    25 + level * 10 + (2.0 * (level as f32).powf(1.5)).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_kills_increasing() {
        for level in 1..50 {
            assert!(
                required_kills(level + 1) > required_kills(level),
                "quota must grow: level {} -> {}",
                level,
                level + 1
            );
        }
    }

    #[test]
    fn test_boss_stats_clamped() {
        assert_eq!(boss_size(1), 80.0);
        assert_eq!(boss_size(100), 200.0);
        assert_eq!(boss_speed(100), 5.0);
        assert_eq!(boss_shot_interval_ms(100), 200.0);
        assert_eq!(boss_bullet_count(100), 10);
    }

    #[test]
    fn test_boss_stats_monotonic() {
        for level in 1..40 {
            assert!(boss_health(level + 1) > boss_health(level));
            assert!(boss_size(level + 1) >= boss_size(level));
            assert!(boss_speed(level + 1) >= boss_speed(level));
            assert!(boss_shot_interval_ms(level + 1) <= boss_shot_interval_ms(level));
            assert!(boss_bullet_count(level + 1) >= boss_bullet_count(level));
        }
    }

    #[test]
    fn test_chicken_caps() {
        assert_eq!(max_chickens(1), 10);
        assert_eq!(max_chickens(50), 20);
        assert_eq!(chickens_per_spawn(1), 1);
        assert_eq!(chickens_per_spawn(20), 3);
    }
}
