//! Game state and entity records
//!
//! All state needed to replay a run deterministically lives here: entities,
//! progression, spawn gates, timers and the seeded RNG. The per-tick event
//! outbox is the only piece excluded from serialization.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{GameEvent, GameSummary};
use super::rect::Rect;
use crate::tuning;

/// Lifecycle of a run: `NotStarted -> Running <-> Paused -> Ended`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    #[default]
    NotStarted,
    Running,
    Paused,
    Ended,
}

/// The player's ship. Exactly one; glides toward `target` each tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spaceship {
    pub rect: Rect,
    /// Latest pointer/touch position in game-area coordinates
    pub target: Vec2,
}

impl Spaceship {
    pub fn new(screen: Vec2) -> Self {
        let size = Vec2::new(tuning::SHIP_WIDTH, tuning::SHIP_HEIGHT);
        let pos = Vec2::new((screen.x - size.x) / 2.0, screen.y - size.y - 80.0);
        Self {
            rect: Rect::new(pos, size),
            target: pos + size * 0.5,
        }
    }
}

/// A falling chicken
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chicken {
    pub id: u32,
    pub rect: Rect,
    /// Fall speed (pixels per reference frame)
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub zigzag: bool,
    /// Lateral direction when zigzagging (+1 right, -1 left)
    pub zigzag_dir: f32,
    /// Will commit to a dive once past the trigger line
    pub diver: bool,
    /// Current dive velocity while diving
    pub dive: Option<Vec2>,
}

/// Who fired a bullet and with what flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletKind {
    Normal,
    Rapid,
    Spread,
    Enemy,
}

/// A projectile. Player bullets fly straight up; boss volleys fan out and
/// may home on the ship.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub rect: Rect,
    pub vel: Vec2,
    pub damage: f32,
    pub kind: BulletKind,
    /// Steering fraction per reference frame; 0 = no homing
    pub homing: f32,
}

impl Bullet {
    pub fn is_enemy(&self) -> bool {
        self.kind == BulletKind::Enemy
    }
}

/// The boss cycles through these trajectories on a fixed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPattern {
    HorizontalSweep,
    Zigzag,
    CircularOrbit,
    VerticalBounce,
    VerticalRush,
    SineWave,
}

impl BossPattern {
    /// Fixed cycle order
    pub fn next(self) -> Self {
        match self {
            BossPattern::HorizontalSweep => BossPattern::Zigzag,
            BossPattern::Zigzag => BossPattern::CircularOrbit,
            BossPattern::CircularOrbit => BossPattern::VerticalBounce,
            BossPattern::VerticalBounce => BossPattern::VerticalRush,
            BossPattern::VerticalRush => BossPattern::SineWave,
            BossPattern::SineWave => BossPattern::HorizontalSweep,
        }
    }
}

/// At most one boss exists at a time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub rect: Rect,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub pattern: BossPattern,
    /// Time spent in the current pattern
    pub pattern_elapsed_ms: f32,
    /// Reference position the active pattern's formula works from
    pub anchor: Vec2,
    /// Sweep/bounce direction (+1 or -1)
    pub dir: f32,
    pub shot_timer_ms: f32,
    pub shot_interval_ms: f32,
    pub bullet_count: usize,
    pub level: u32,
}

impl Boss {
    pub fn new(level: u32, screen: Vec2, boss_health_mult: f32) -> Self {
        let size = tuning::boss_size(level);
        let health = tuning::boss_health(level) * boss_health_mult;
        let pos = Vec2::new((screen.x - size) / 2.0, 30.0);
        Self {
            rect: Rect::new(pos, Vec2::splat(size)),
            health,
            max_health: health,
            speed: tuning::boss_speed(level),
            pattern: BossPattern::HorizontalSweep,
            pattern_elapsed_ms: 0.0,
            anchor: pos,
            dir: 1.0,
            shot_timer_ms: 0.0,
            shot_interval_ms: tuning::boss_shot_interval_ms(level),
            bullet_count: tuning::boss_bullet_count(level),
            level,
        }
    }
}

/// Collectible kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Rapid,
    Spread,
    Shield,
    Life,
}

/// A falling collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub rect: Rect,
    pub speed: f32,
    pub kind: PowerUpKind,
}

/// Visual marker kinds: a kill blast or a bullet impact flash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionKind {
    Blast,
    Flash,
}

/// A decaying visual marker (not gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub id: u32,
    pub pos: Vec2,
    pub life_ms: f32,
    pub kind: ExplosionKind,
}

/// Weapon flavors the ship can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WeaponKind {
    #[default]
    Normal,
    Rapid,
    Spread,
}

impl WeaponKind {
    /// Damage / speed / size per flavor
    pub fn damage(self) -> f32 {
        match self {
            WeaponKind::Normal => 10.0,
            WeaponKind::Rapid => 5.0,
            WeaponKind::Spread => 8.0,
        }
    }

    pub fn bullet_speed(self) -> f32 {
        match self {
            WeaponKind::Normal => 8.0,
            WeaponKind::Rapid => 12.0,
            WeaponKind::Spread => 10.0,
        }
    }

    pub fn bullet_size(self) -> Vec2 {
        match self {
            WeaponKind::Normal => Vec2::new(4.0, 12.0),
            WeaponKind::Rapid | WeaponKind::Spread => Vec2::new(3.0, 10.0),
        }
    }

    pub fn bullet_kind(self) -> BulletKind {
        match self {
            WeaponKind::Normal => BulletKind::Normal,
            WeaponKind::Rapid => BulletKind::Rapid,
            WeaponKind::Spread => BulletKind::Spread,
        }
    }
}

/// Currently armed weapon and its remaining duration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ArmedWeapon {
    pub kind: WeaponKind,
    pub time_left_ms: f32,
}

/// Level-scaled difficulty knobs plus the settings-chosen mode multipliers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Difficulty {
    /// Current chicken base speed (grows per level)
    pub chicken_speed: f32,
    /// Current spawn gate (shrinks per level, floored)
    pub spawn_interval_ms: f32,
    // Mode multipliers, fixed for the run
    pub chicken_speed_mult: f32,
    pub spawn_rate_mult: f32,
    pub boss_health_mult: f32,
    pub powerup_chance_mult: f32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            chicken_speed: tuning::CHICKEN_BASE_SPEED,
            spawn_interval_ms: tuning::SPAWN_INTERVAL_MS,
            chicken_speed_mult: 1.0,
            spawn_rate_mult: 1.0,
            boss_health_mult: 1.0,
            powerup_chance_mult: 1.0,
        }
    }
}

impl Difficulty {
    /// Reset the level-scaled knobs (run start)
    pub fn reset(&mut self) {
        self.chicken_speed = tuning::CHICKEN_BASE_SPEED;
        self.spawn_interval_ms = tuning::SPAWN_INTERVAL_MS;
    }

    /// Scale up for the next level, clamped
    pub fn increase(&mut self) {
        self.chicken_speed =
            (self.chicken_speed * tuning::CHICKEN_SPEED_GROWTH).min(tuning::CHICKEN_SPEED_CEILING);
        self.spawn_interval_ms = (self.spawn_interval_ms * tuning::SPAWN_INTERVAL_DECAY)
            .max(tuning::SPAWN_INTERVAL_FLOOR_MS);
    }

    /// Effective spawn gate including the mode multiplier
    pub fn effective_spawn_interval_ms(&self) -> f32 {
        self.spawn_interval_ms * self.spawn_rate_mult
    }

    /// Effective chicken base speed including the mode multiplier
    pub fn effective_chicken_speed(&self) -> f32 {
        self.chicken_speed * self.chicken_speed_mult
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Game area size in pixels
    pub screen: Vec2,
    pub player_name: String,

    // Progression
    pub level: u32,
    pub score: u64,
    /// Fractional: boss bullets chip 0.5
    pub lives: f32,
    /// Shield charges consumed before lives
    pub shield: u32,
    pub kills_this_level: u32,
    pub difficulty: Difficulty,

    // Entities
    pub ship: Spaceship,
    pub chickens: Vec<Chicken>,
    pub bullets: Vec<Bullet>,
    pub power_ups: Vec<PowerUp>,
    pub explosions: Vec<Explosion>,
    pub boss: Option<Boss>,
    pub weapon: ArmedWeapon,

    // Clock and gates
    /// Accumulated sim time
    pub time_ms: f32,
    pub last_chicken_spawn_ms: f32,
    /// Absolute time the next power-up may appear
    pub next_powerup_at_ms: f32,
    /// Auto-fire accumulator
    pub fire_timer_ms: f32,
    /// Settings-chosen base fire interval (rapid weapon overrides it)
    pub base_fire_interval_ms: f32,

    /// Per-tick event outbox, drained by the shell
    #[serde(skip)]
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create an idle (NotStarted) state for the given screen size
    pub fn new(seed: u64, screen: Vec2) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::NotStarted,
            screen,
            player_name: String::new(),
            level: 1,
            score: 0,
            lives: tuning::STARTING_LIVES,
            shield: 0,
            kills_this_level: 0,
            difficulty: Difficulty::default(),
            ship: Spaceship::new(screen),
            chickens: Vec::new(),
            bullets: Vec::new(),
            power_ups: Vec::new(),
            explosions: Vec::new(),
            boss: None,
            weapon: ArmedWeapon::default(),
            time_ms: 0.0,
            last_chicken_spawn_ms: 0.0,
            next_powerup_at_ms: 0.0,
            fire_timer_ms: 0.0,
            base_fire_interval_ms: 250.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Reset everything and begin a fresh run
    pub fn start(&mut self, player_name: &str) {
        self.phase = GamePhase::Running;
        self.player_name = player_name.to_string();
        self.level = 1;
        self.score = 0;
        self.lives = tuning::STARTING_LIVES;
        self.shield = 0;
        self.kills_this_level = 0;
        self.difficulty.reset();
        self.ship = Spaceship::new(self.screen);
        self.chickens.clear();
        self.bullets.clear();
        self.power_ups.clear();
        self.explosions.clear();
        self.boss = None;
        self.weapon = ArmedWeapon::default();
        self.time_ms = 0.0;
        self.last_chicken_spawn_ms = 0.0;
        self.next_powerup_at_ms = 0.0;
        self.fire_timer_ms = 0.0;
        self.events.clear();
        log::info!("Run started for '{}' (seed {})", self.player_name, self.seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Resize the game area, keeping the ship in bounds
    pub fn set_screen(&mut self, screen: Vec2) {
        self.screen = screen;
        self.ship.rect.clamp_into(screen, tuning::SCREEN_MARGIN);
        self.ship.target = self.ship.target.clamp(Vec2::ZERO, screen);
    }

    /// Award points, multiplied by the current level
    pub fn add_score(&mut self, points: u32) {
        self.score += points as u64 * self.level as u64;
    }

    /// One more life, capped
    pub fn add_life(&mut self) {
        self.lives = (self.lives + 1.0).min(tuning::MAX_LIVES);
    }

    /// Apply a hit to the player. A shield charge absorbs it whole;
    /// otherwise lives drop and the run may end.
    pub fn damage_player(&mut self, amount: f32) {
        if self.shield > 0 {
            self.shield -= 1;
            self.push_event(GameEvent::PlayerHit { shielded: true });
            return;
        }
        self.lives -= amount;
        self.push_event(GameEvent::PlayerHit { shielded: false });
        if self.lives <= 0.0 {
            self.lives = 0.0;
            self.end_game();
        }
    }

    /// Transition to Ended and emit the game-over event
    pub fn end_game(&mut self) {
        if self.phase != GamePhase::Ended {
            self.phase = GamePhase::Ended;
            self.push_event(GameEvent::GameOver);
            log::info!(
                "Game over: '{}' scored {} (level {})",
                self.player_name,
                self.score,
                self.level
            );
        }
    }

    /// Final record for the persistence collaborator
    pub fn summary(&self, timestamp_ms: f64) -> GameSummary {
        GameSummary {
            player_name: self.player_name.clone(),
            score: self.score,
            level: self.level,
            timestamp_ms,
        }
    }

    /// Spawn a decaying visual marker at `pos`
    pub fn spawn_explosion(&mut self, pos: Vec2, kind: ExplosionKind) {
        let id = self.next_entity_id();
        let life_ms = match kind {
            ExplosionKind::Blast => tuning::BLAST_LIFE_MS,
            ExplosionKind::Flash => tuning::FLASH_LIFE_MS,
        };
        self.explosions.push(Explosion { id, pos, life_ms, kind });
    }

    /// Queue an event for the shell
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain the per-tick outbox
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Bound per-tick work: prune oldest entries once a collection exceeds
    /// its cap. Unbounded growth is a correctness defect, not a slowdown.
    pub fn enforce_caps(&mut self) {
        if self.bullets.len() > tuning::MAX_BULLETS {
            let excess = self.bullets.len() - tuning::MAX_BULLETS;
            self.bullets.drain(..excess);
        }
        if self.explosions.len() > tuning::MAX_EXPLOSIONS {
            let excess = self.explosions.len() - tuning::MAX_EXPLOSIONS;
            self.explosions.drain(..excess);
        }
        if self.power_ups.len() > tuning::MAX_POWERUPS {
            let excess = self.power_ups.len() - tuning::MAX_POWERUPS;
            self.power_ups.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_state() -> GameState {
        let mut state = GameState::new(7, Vec2::new(800.0, 600.0));
        state.start("tester");
        state
    }

    #[test]
    fn test_score_multiplied_by_level() {
        let mut state = running_state();
        state.add_score(10);
        assert_eq!(state.score, 10);
        state.level = 3;
        state.add_score(10);
        assert_eq!(state.score, 40);
    }

    #[test]
    fn test_shield_absorbs_before_lives() {
        let mut state = running_state();
        state.shield = 2;
        state.damage_player(1.0);
        assert_eq!(state.shield, 1);
        assert_eq!(state.lives, tuning::STARTING_LIVES);
        state.damage_player(0.5);
        assert_eq!(state.shield, 0);
        assert_eq!(state.lives, tuning::STARTING_LIVES);
        state.damage_player(0.5);
        assert_eq!(state.lives, tuning::STARTING_LIVES - 0.5);
    }

    #[test]
    fn test_six_half_hits_end_the_game() {
        let mut state = running_state();
        for _ in 0..6 {
            state.damage_player(0.5);
        }
        assert_eq!(state.lives, 0.0);
        assert_eq!(state.phase, GamePhase::Ended);
        assert!(state.take_events().contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_lives_capped() {
        let mut state = running_state();
        for _ in 0..10 {
            state.add_life();
        }
        assert_eq!(state.lives, tuning::MAX_LIVES);
    }

    #[test]
    fn test_bullet_cap_prunes_oldest() {
        let mut state = running_state();
        for _ in 0..tuning::MAX_BULLETS + 5 {
            let id = state.next_entity_id();
            state.bullets.push(Bullet {
                id,
                rect: Rect::new(Vec2::ZERO, Vec2::new(4.0, 12.0)),
                vel: Vec2::ZERO,
                damage: 10.0,
                kind: BulletKind::Normal,
                homing: 0.0,
            });
        }
        state.enforce_caps();
        assert_eq!(state.bullets.len(), tuning::MAX_BULLETS);
        // Oldest (lowest ids) were pruned
        assert!(state.bullets.first().map(|b| b.id).unwrap_or(0) > 1);
    }

    #[test]
    fn test_start_resets_run() {
        let mut state = running_state();
        state.score = 999;
        state.level = 7;
        state.boss = Some(Boss::new(3, state.screen, 1.0));
        state.start("again");
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert!(state.boss.is_none());
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_state_roundtrips_through_json() {
        let state = running_state();
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.level, state.level);
        assert_eq!(back.ship.rect.pos, state.ship.rect.pos);
    }
}
