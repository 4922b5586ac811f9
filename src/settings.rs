//! Game settings and preferences
//!
//! Persisted separately from high scores in LocalStorage.

use serde::{Deserialize, Serialize};

/// Difficulty modes and their multiplier sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyMode {
    Easy,
    #[default]
    Normal,
    Hard,
    Extreme,
}

impl DifficultyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyMode::Easy => "Easy",
            DifficultyMode::Normal => "Normal",
            DifficultyMode::Hard => "Hard",
            DifficultyMode::Extreme => "Extreme",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyMode::Easy),
            "normal" => Some(DifficultyMode::Normal),
            "hard" => Some(DifficultyMode::Hard),
            "extreme" => Some(DifficultyMode::Extreme),
            _ => None,
        }
    }

    /// Chicken speed multiplier
    pub fn chicken_speed_mult(&self) -> f32 {
        match self {
            DifficultyMode::Easy => 0.8,
            DifficultyMode::Normal => 1.0,
            DifficultyMode::Hard => 1.3,
            DifficultyMode::Extreme => 1.6,
        }
    }

    /// Spawn interval multiplier (lower = more chickens)
    pub fn spawn_rate_mult(&self) -> f32 {
        match self {
            DifficultyMode::Easy => 1.5,
            DifficultyMode::Normal => 1.0,
            DifficultyMode::Hard => 0.8,
            DifficultyMode::Extreme => 0.6,
        }
    }

    /// Boss health multiplier
    pub fn boss_health_mult(&self) -> f32 {
        match self {
            DifficultyMode::Easy => 0.7,
            DifficultyMode::Normal => 1.0,
            DifficultyMode::Hard => 1.5,
            DifficultyMode::Extreme => 2.0,
        }
    }

    /// Power-up frequency multiplier (higher = more drops)
    pub fn powerup_chance_mult(&self) -> f32 {
        match self {
            DifficultyMode::Easy => 1.5,
            DifficultyMode::Normal => 1.0,
            DifficultyMode::Hard => 0.8,
            DifficultyMode::Extreme => 0.6,
        }
    }
}

/// Auto-fire base rate choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FireRate {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl FireRate {
    /// Shot interval in milliseconds (the rapid power-up overrides this)
    pub fn interval_ms(&self) -> f32 {
        match self {
            FireRate::Slow => 400.0,
            FireRate::Normal => 250.0,
            FireRate::Fast => 150.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Difficulty mode multipliers applied at run start
    pub difficulty: DifficultyMode,
    /// Auto-fire base rate
    pub fire_rate: FireRate,

    // === Audio ===
    pub sound_enabled: bool,
    /// Sound effects volume (0.0 - 1.0)
    pub effect_volume: f32,

    // === HUD / visuals ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Screen shake on explosions
    pub screen_shake: bool,

    // === Input ===
    /// Pointer movement scale (0.5 - 2.0)
    pub mouse_sensitivity: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: DifficultyMode::Normal,
            fire_rate: FireRate::Normal,
            sound_enabled: true,
            effect_volume: 0.7,
            show_fps: false,
            screen_shake: true,
            mouse_sensitivity: 1.0,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "chicken_blitz_settings";

    /// Effective effects volume (respects the mute switch)
    pub fn effective_volume(&self) -> f32 {
        if self.sound_enabled {
            self.effect_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Effective pointer scale, clamped to a sane range
    pub fn effective_sensitivity(&self) -> f32 {
        self.mouse_sensitivity.clamp(0.5, 2.0)
    }

    /// Copy the mode multipliers into a run's difficulty state
    pub fn apply_to(&self, difficulty: &mut crate::sim::Difficulty) {
        difficulty.chicken_speed_mult = self.difficulty.chicken_speed_mult();
        difficulty.spawn_rate_mult = self.difficulty.spawn_rate_mult();
        difficulty.boss_health_mult = self.difficulty.boss_health_mult();
        difficulty.powerup_chance_mult = self.difficulty.powerup_chance_mult();
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mute_zeroes_volume() {
        let mut settings = Settings::default();
        assert_eq!(settings.effective_volume(), 0.7);
        settings.sound_enabled = false;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_apply_difficulty_mode() {
        let mut settings = Settings::default();
        settings.difficulty = DifficultyMode::Extreme;
        let mut difficulty = crate::sim::Difficulty::default();
        settings.apply_to(&mut difficulty);
        assert_eq!(difficulty.chicken_speed_mult, 1.6);
        assert_eq!(difficulty.boss_health_mult, 2.0);
    }

    #[test]
    fn test_mode_round_trip() {
        for mode in [
            DifficultyMode::Easy,
            DifficultyMode::Normal,
            DifficultyMode::Hard,
            DifficultyMode::Extreme,
        ] {
            assert_eq!(DifficultyMode::from_str(mode.as_str()), Some(mode));
        }
    }
}
