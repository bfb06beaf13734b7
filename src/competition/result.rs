//! Match results and AI-vs-AI simulation

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which of the two listed teams a result favors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultSide {
    Team1,
    Team2,
}

/// Regulation score plus an optional shootout score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub team1_score: u32,
    pub team2_score: u32,
    /// (team1, team2) penalties, only after a tied knockout match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalties: Option<(u32, u32)>,
}

impl MatchResult {
    pub fn new(team1_score: u32, team2_score: u32) -> Self {
        Self {
            team1_score,
            team2_score,
            penalties: None,
        }
    }

    pub fn with_penalties(mut self, team1: u32, team2: u32) -> Self {
        self.penalties = Some((team1, team2));
        self
    }

    /// Regulation score level (penalties ignored)
    pub fn is_draw(&self) -> bool {
        self.team1_score == self.team2_score
    }

    /// The winning side, settling level scores on penalties.
    ///
    /// `None` for a draw without a shootout (or a level shootout).
    pub fn winner(&self) -> Option<ResultSide> {
        let (a, b) = match self.penalties {
            Some(pens) if self.is_draw() => pens,
            _ => (self.team1_score, self.team2_score),
        };
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => Some(ResultSide::Team1),
            std::cmp::Ordering::Less => Some(ResultSide::Team2),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Same result seen from the other team's perspective
    pub fn swapped(&self) -> Self {
        Self {
            team1_score: self.team2_score,
            team2_score: self.team1_score,
            penalties: self.penalties.map(|(a, b)| (b, a)),
        }
    }
}

/// Highest score `simulate_match` can produce for one side
pub const MAX_SIMULATED_GOALS: u32 = 4;

/// Simulate a fixture between two AI teams: each score uniform in 0..=4
pub fn simulate_match(rng: &mut impl Rng) -> MatchResult {
    MatchResult::new(
        rng.random_range(0..=MAX_SIMULATED_GOALS),
        rng.random_range(0..=MAX_SIMULATED_GOALS),
    )
}

/// Simulate a knockout tie: level scores go to a simulated shootout so
/// there is always a winner.
pub fn simulate_knockout_match(rng: &mut impl Rng) -> MatchResult {
    let result = simulate_match(rng);
    if !result.is_draw() {
        return result;
    }
    let winner_pens = rng.random_range(3..=5);
    let loser_pens = rng.random_range(0..winner_pens);
    if rng.random_bool(0.5) {
        result.with_penalties(winner_pens, loser_pens)
    } else {
        result.with_penalties(loser_pens, winner_pens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_winner_regulation() {
        assert_eq!(MatchResult::new(2, 1).winner(), Some(ResultSide::Team1));
        assert_eq!(MatchResult::new(0, 3).winner(), Some(ResultSide::Team2));
        assert_eq!(MatchResult::new(1, 1).winner(), None);
    }

    #[test]
    fn test_winner_on_penalties() {
        let result = MatchResult::new(1, 1).with_penalties(3, 4);
        assert_eq!(result.winner(), Some(ResultSide::Team2));
        assert!(result.is_draw());
    }

    #[test]
    fn test_swapped() {
        let result = MatchResult::new(2, 2).with_penalties(5, 4).swapped();
        assert_eq!(result.team1_score, 2);
        assert_eq!(result.penalties, Some((4, 5)));
        assert_eq!(result.winner(), Some(ResultSide::Team2));
    }

    #[test]
    fn test_simulated_scores_in_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut seen = [false; 5];
        for _ in 0..2000 {
            let result = simulate_match(&mut rng);
            assert!(result.team1_score <= MAX_SIMULATED_GOALS);
            assert!(result.team2_score <= MAX_SIMULATED_GOALS);
            assert!(result.penalties.is_none());
            seen[result.team1_score as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_knockout_always_has_winner() {
        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..2000 {
            assert!(simulate_knockout_match(&mut rng).winner().is_some());
        }
    }
}
