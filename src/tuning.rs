//! Data-driven game balance
//!
//! Each difficulty tier maps to the AI paddle reaction (physics) and to the
//! AI shot/save probabilities (penalty shootout). Harder tiers are strictly
//! harder on every axis.

use serde::{Deserialize, Serialize};

/// Difficulty tiers, easiest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    VeryEasy,
    Easy,
    #[default]
    Normal,
    Hard,
    VeryHard,
}

/// Tunables for one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTuning {
    /// Fraction of the gap to its target the AI paddle closes per tick
    pub ai_reaction: f32,
    /// Chance an AI penalty on target beats the keeper anyway
    pub ai_shot_success: f32,
    /// Chance the AI keeper reads the shot lane
    pub ai_save_success: f32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::VeryEasy,
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::VeryHard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "very-easy",
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::VeryHard => "very-hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "very-easy" | "veryeasy" => Some(Difficulty::VeryEasy),
            "easy" => Some(Difficulty::Easy),
            "normal" | "med" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "very-hard" | "veryhard" => Some(Difficulty::VeryHard),
            _ => None,
        }
    }

    pub fn tuning(&self) -> DifficultyTuning {
        match self {
            Difficulty::VeryEasy => DifficultyTuning {
                ai_reaction: 0.04,
                ai_shot_success: 0.5,
                ai_save_success: 0.2,
            },
            Difficulty::Easy => DifficultyTuning {
                ai_reaction: 0.07,
                ai_shot_success: 0.6,
                ai_save_success: 0.3,
            },
            Difficulty::Normal => DifficultyTuning {
                ai_reaction: 0.1,
                ai_shot_success: 0.7,
                ai_save_success: 0.5,
            },
            Difficulty::Hard => DifficultyTuning {
                ai_reaction: 0.13,
                ai_shot_success: 0.85,
                ai_save_success: 0.65,
            },
            Difficulty::VeryHard => DifficultyTuning {
                ai_reaction: 0.16,
                ai_shot_success: 0.95,
                ai_save_success: 0.8,
            },
        }
    }

    /// AI paddle reaction coefficient
    pub fn ai_reaction(&self) -> f32 {
        self.tuning().ai_reaction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_strictly_monotonic() {
        for pair in Difficulty::ALL.windows(2) {
            let (easier, harder) = (pair[0].tuning(), pair[1].tuning());
            assert!(harder.ai_reaction > easier.ai_reaction);
            assert!(harder.ai_shot_success > easier.ai_shot_success);
            assert!(harder.ai_save_success > easier.ai_save_success);
        }
    }

    #[test]
    fn test_probabilities_in_range() {
        for d in Difficulty::ALL {
            let t = d.tuning();
            assert!((0.0..=1.0).contains(&t.ai_shot_success));
            assert!((0.0..=1.0).contains(&t.ai_save_success));
            assert!(t.ai_reaction > 0.0 && t.ai_reaction < 1.0);
        }
    }

    #[test]
    fn test_name_round_trip() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("impossible"), None);
    }

    #[test]
    fn test_serde_uses_kebab_names() {
        let json = serde_json::to_string(&Difficulty::VeryHard).unwrap();
        assert_eq!(json, "\"very-hard\"");
    }
}
