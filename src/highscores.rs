//! High score leaderboard
//!
//! Persisted to LocalStorage, tracks the top 10 runs. Fed by the
//! `GameSummary` the sim hands off when a run ends.

use serde::{Deserialize, Serialize};

use crate::sim::GameSummary;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub player_name: String,
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "chicken_blitz_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a finished run (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add_summary(&mut self, summary: &GameSummary) -> Option<usize> {
        if !self.qualifies(summary.score) {
            return None;
        }

        let entry = HighScoreEntry {
            player_name: summary.player_name.clone(),
            score: summary.score,
            level: summary.level,
            timestamp: summary.timestamp_ms,
        };

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| summary.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load the leaderboard from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let loaded = local_storage()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten())
            .and_then(|json| serde_json::from_str::<HighScores>(&json).ok());
        match loaded {
            Some(scores) => {
                log::info!("Leaderboard loaded ({} entries)", scores.entries.len());
                scores
            }
            None => {
                log::info!("Leaderboard empty, starting fresh");
                Self::new()
            }
        }
    }

    /// Save the leaderboard to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = local_storage() else { return };
        match serde_json::to_string(self) {
            Ok(json) => {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
            }
            Err(err) => log::warn!("Could not serialize the leaderboard: {}", err),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Short age label for entries under a week old; `None` means the caller
/// should show a calendar date instead
fn age_label(age_ms: f64) -> Option<String> {
    const HOUR_MS: f64 = 3_600_000.0;
    const DAY_MS: f64 = 24.0 * HOUR_MS;

    let days = (age_ms / DAY_MS).floor();
    if days >= 7.0 {
        return None;
    }
    if days >= 2.0 {
        return Some(format!("{}d ago", days as u32));
    }
    if days >= 1.0 {
        return Some("yesterday".to_string());
    }
    let hours = (age_ms / HOUR_MS).floor();
    if hours >= 1.0 {
        return Some(format!("{}h ago", hours as u32));
    }
    Some("just now".to_string())
}

/// Age label for a leaderboard entry, e.g. "3d ago" or "2026-08-29"
#[cfg(target_arch = "wasm32")]
pub fn format_date(timestamp: f64) -> String {
    age_label(js_sys::Date::now() - timestamp).unwrap_or_else(|| {
        let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp));
        format!(
            "{:04}-{:02}-{:02}",
            date.get_full_year(),
            date.get_month() + 1,
            date.get_date()
        )
    })
}

#[cfg(not(target_arch = "wasm32"))]
pub fn format_date(timestamp: f64) -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(timestamp);
    age_label(now - timestamp).unwrap_or_else(|| "over a week ago".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, score: u64, level: u32) -> GameSummary {
        GameSummary {
            player_name: name.to_string(),
            score,
            level,
            timestamp_ms: 0.0,
        }
    }

    #[test]
    fn test_zero_score_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));
    }

    #[test]
    fn test_ranks_sorted_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_summary(&summary("a", 100, 2)), Some(1));
        assert_eq!(scores.add_summary(&summary("b", 300, 4)), Some(1));
        assert_eq!(scores.add_summary(&summary("c", 200, 3)), Some(2));
        let values: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(values, vec![300, 200, 100]);
    }

    #[test]
    fn test_board_truncates_at_ten() {
        let mut scores = HighScores::new();
        for i in 1..=15u64 {
            scores.add_summary(&summary("p", i * 10, 1));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(150));
        // 60 no longer beats the board's floor
        assert!(!scores.qualifies(60));
        assert_eq!(scores.potential_rank(145), Some(2));
    }

    #[test]
    fn test_age_label_tiers() {
        const HOUR: f64 = 3_600_000.0;
        assert_eq!(age_label(30.0 * 60_000.0).as_deref(), Some("just now"));
        assert_eq!(age_label(5.0 * HOUR).as_deref(), Some("5h ago"));
        assert_eq!(age_label(30.0 * HOUR).as_deref(), Some("yesterday"));
        assert_eq!(age_label(3.0 * 24.0 * HOUR).as_deref(), Some("3d ago"));
        // A week and older falls through to a calendar date
        assert_eq!(age_label(8.0 * 24.0 * HOUR), None);
    }
}
