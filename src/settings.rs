//! Game settings and preferences
//!
//! Persisted separately from competition saves under their own key.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KEY_SETTINGS, SnapshotStore, StoreError};
use crate::sim::Cosmetics;
use crate::tuning::Difficulty;

/// Allowed range for the two-player control split
pub const MIN_SPLIT_RATIO: f32 = 0.2;
pub const MAX_SPLIT_RATIO: f32 = 0.8;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// AI paddle and shootout difficulty
    pub difficulty: Difficulty,

    // === Visual Effects ===
    /// Screen shake on hard paddle hits
    pub screen_shake: bool,
    /// Confetti burst on goals
    pub confetti: bool,

    // === Controls ===
    /// Fraction of field height, from the top, where local two-player
    /// pointer control switches to the bottom paddle
    pub control_split_ratio: f32,

    // === Accessibility ===
    /// Reduced motion (no shake, no confetti)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            screen_shake: true,
            confetti: true,
            control_split_ratio: 0.5,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective confetti (respects reduced_motion)
    pub fn effective_confetti(&self) -> bool {
        self.confetti && !self.reduced_motion
    }

    /// Split ratio clamped to a usable range
    pub fn effective_split_ratio(&self) -> f32 {
        if self.control_split_ratio.is_finite() {
            self.control_split_ratio
                .clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO)
        } else {
            0.5
        }
    }

    /// Cosmetic switches handed to the physics engine
    pub fn cosmetics(&self) -> Cosmetics {
        Cosmetics {
            confetti: self.effective_confetti(),
            screen_shake: self.effective_screen_shake(),
        }
    }

    /// Load settings, falling back to defaults when absent or unreadable
    pub fn load(store: &dyn SnapshotStore) -> Self {
        match persistence::load_snapshot(store, KEY_SETTINGS) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn SnapshotStore) -> Result<(), StoreError> {
        persistence::save_snapshot(store, KEY_SETTINGS, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_reduced_motion_disables_effects() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_screen_shake());
        assert!(!settings.effective_confetti());
        assert_eq!(
            settings.cosmetics(),
            Cosmetics {
                confetti: false,
                screen_shake: false
            }
        );
        assert!(Settings::default().cosmetics().confetti);
    }

    #[test]
    fn test_split_ratio_clamped() {
        let mut settings = Settings::default();
        assert_eq!(settings.effective_split_ratio(), 0.5);
        settings.control_split_ratio = 0.05;
        assert_eq!(settings.effective_split_ratio(), MIN_SPLIT_RATIO);
        settings.control_split_ratio = f32::NAN;
        assert_eq!(settings.effective_split_ratio(), 0.5);
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());

        let settings = Settings {
            difficulty: Difficulty::Hard,
            confetti: false,
            ..Default::default()
        };
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let json = r#"{"version":1,"data":{"difficulty":"very-easy"}}"#;
        let mut store = MemoryStore::new();
        store.save(KEY_SETTINGS, json).unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.difficulty, Difficulty::VeryEasy);
        assert!(settings.screen_shake);
    }
}
