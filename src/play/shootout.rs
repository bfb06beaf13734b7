//! Penalty shootout
//!
//! Turn based: the human shoots, then the human keeps goal against the
//! AI, repeating until a winner is certain. Five kicks each, then sudden
//! death pairs with the human still kicking first.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::REGULATION_KICKS;
use crate::tuning::DifficultyTuning;

/// Where a kick is aimed or the keeper dives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    Left,
    Center,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Center, Lane::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Lane::Left => "left",
            Lane::Center => "center",
            Lane::Right => "right",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "left" | "l" => Some(Lane::Left),
            "center" | "centre" | "c" => Some(Lane::Center),
            "right" | "r" => Some(Lane::Right),
            _ => None,
        }
    }

    fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// One of the two lanes that are not `self`
    fn random_other(self, rng: &mut impl Rng) -> Self {
        let others: Vec<Lane> = Self::ALL.into_iter().filter(|l| *l != self).collect();
        others[rng.random_range(0..others.len())]
    }
}

/// Shootout participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kicker {
    Player,
    Ai,
}

/// Whose action the shootout is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShootoutTurn {
    /// The human picks a lane to shoot at
    PlayerShoots,
    /// The human picks a lane to dive to
    PlayerSaves,
    Finished,
}

/// One resolved kick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kick {
    pub shot: Lane,
    pub dive: Lane,
    pub goal: bool,
}

/// Final shootout result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShootoutOutcome {
    pub winner: Kicker,
    pub player_goals: u32,
    pub ai_goals: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenaltyShootout {
    tuning: DifficultyTuning,
    player_kicks: Vec<Kick>,
    ai_kicks: Vec<Kick>,
    turn: ShootoutTurn,
    winner: Option<Kicker>,
}

impl PenaltyShootout {
    pub fn new(tuning: DifficultyTuning) -> Self {
        Self {
            tuning,
            player_kicks: Vec::new(),
            ai_kicks: Vec::new(),
            turn: ShootoutTurn::PlayerShoots,
            winner: None,
        }
    }

    pub fn turn(&self) -> ShootoutTurn {
        self.turn
    }

    pub fn player_kicks(&self) -> &[Kick] {
        &self.player_kicks
    }

    pub fn ai_kicks(&self) -> &[Kick] {
        &self.ai_kicks
    }

    /// (player, ai) goals
    pub fn score(&self) -> (u32, u32) {
        (goals(&self.player_kicks), goals(&self.ai_kicks))
    }

    /// Kick pairs to display: five, or more once sudden death starts
    pub fn rounds_shown(&self) -> u32 {
        self.kick_horizon()
    }

    pub fn outcome(&self) -> Option<ShootoutOutcome> {
        let (player_goals, ai_goals) = self.score();
        self.winner.map(|winner| ShootoutOutcome {
            winner,
            player_goals,
            ai_goals,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.turn == ShootoutTurn::Finished
    }

    /// Human shoots at `lane`; the AI keeper reads it with its save
    /// probability. Ignored (returns `None`) out of turn.
    pub fn player_shoot(&mut self, lane: Lane, rng: &mut impl Rng) -> Option<Kick> {
        if self.turn != ShootoutTurn::PlayerShoots {
            return None;
        }
        let dive = if rng.random::<f32>() < self.tuning.ai_save_success {
            lane
        } else {
            lane.random_other(rng)
        };
        let kick = Kick {
            shot: lane,
            dive,
            goal: lane != dive,
        };
        self.record(Kicker::Player, kick);
        Some(kick)
    }

    /// Human dives to `lane` against an AI kick at a uniform lane. An
    /// unsaved AI kick still has to pass its shot-success roll.
    pub fn player_save(&mut self, lane: Lane, rng: &mut impl Rng) -> Option<Kick> {
        if self.turn != ShootoutTurn::PlayerSaves {
            return None;
        }
        let shot = Lane::random(rng);
        let goal = shot != lane && rng.random::<f32>() < self.tuning.ai_shot_success;
        let kick = Kick {
            shot,
            dive: lane,
            goal,
        };
        self.record(Kicker::Ai, kick);
        Some(kick)
    }

    fn record(&mut self, kicker: Kicker, kick: Kick) {
        match kicker {
            Kicker::Player => self.player_kicks.push(kick),
            Kicker::Ai => self.ai_kicks.push(kick),
        }
        log::debug!(
            "Shootout kick {:?} {} -> {:?}",
            kicker,
            if kick.goal { "scored" } else { "missed" },
            self.score()
        );

        if let Some(winner) = self.check_winner() {
            self.winner = Some(winner);
            self.turn = ShootoutTurn::Finished;
            log::info!("Shootout won by {:?} {:?}", winner, self.score());
            return;
        }
        self.turn = match kicker {
            Kicker::Player => ShootoutTurn::PlayerSaves,
            Kicker::Ai => ShootoutTurn::PlayerShoots,
        };
    }

    /// Kicks each side may take before the current pair ends
    fn kick_horizon(&self) -> u32 {
        REGULATION_KICKS
            .max(self.player_kicks.len() as u32)
            .max(self.ai_kicks.len() as u32)
    }

    fn check_winner(&self) -> Option<Kicker> {
        let taken = (self.player_kicks.len() as u32, self.ai_kicks.len() as u32);
        let (player_goals, ai_goals) = self.score();

        if taken.0 == taken.1 && taken.0 >= REGULATION_KICKS && player_goals != ai_goals {
            return Some(if player_goals > ai_goals {
                Kicker::Player
            } else {
                Kicker::Ai
            });
        }

        // Mathematical elimination against the other side's best case
        let horizon = self.kick_horizon();
        let player_left = horizon - taken.0;
        let ai_left = horizon - taken.1;
        if player_goals > ai_goals + ai_left {
            Some(Kicker::Player)
        } else if ai_goals > player_goals + player_left {
            Some(Kicker::Ai)
        } else {
            None
        }
    }
}

fn goals(kicks: &[Kick]) -> u32 {
    kicks.iter().filter(|k| k.goal).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Difficulty;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn kick(goal: bool) -> Kick {
        Kick {
            shot: Lane::Left,
            dive: if goal { Lane::Right } else { Lane::Left },
            goal,
        }
    }

    fn shootout() -> PenaltyShootout {
        PenaltyShootout::new(Difficulty::Normal.tuning())
    }

    /// Play alternating kicks from two scripts, stopping when finished
    fn play(s: &mut PenaltyShootout, player: &[bool], ai: &[bool]) -> usize {
        let mut kicks = 0;
        for i in 0..player.len().max(ai.len()) {
            for (kicker, script) in [(Kicker::Player, player), (Kicker::Ai, ai)] {
                if s.is_finished() {
                    return kicks;
                }
                if let Some(goal) = script.get(i) {
                    s.record(kicker, kick(*goal));
                    kicks += 1;
                }
            }
        }
        kicks
    }

    #[test]
    fn test_three_two_goes_the_distance() {
        let mut s = shootout();
        let kicks = play(
            &mut s,
            &[true, true, true, false, false],
            &[true, true, false, false, false],
        );
        assert_eq!(kicks, 10);
        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.winner, Kicker::Player);
        assert_eq!((outcome.player_goals, outcome.ai_goals), (3, 2));
    }

    #[test]
    fn test_early_elimination() {
        let mut s = shootout();
        // 3-0 after three pairs: AI can reach at most 2
        let kicks = play(&mut s, &[true; 5], &[false; 5]);
        assert_eq!(kicks, 6);
        assert_eq!(s.outcome().unwrap().winner, Kicker::Player);
        assert_eq!(s.score(), (3, 0));
    }

    #[test]
    fn test_ai_eliminates_player() {
        let mut s = shootout();
        // After the player's fourth kick they trail 1-3 with one kick left
        let kicks = play(&mut s, &[true, false, false, false, true], &[true; 5]);
        assert_eq!(kicks, 7);
        assert_eq!(s.outcome().unwrap().winner, Kicker::Ai);
        assert_eq!(s.score(), (1, 3));
    }

    #[test]
    fn test_sudden_death_waits_for_ai_reply() {
        let mut s = shootout();
        play(&mut s, &[true; 5], &[true; 5]);
        assert!(!s.is_finished());
        assert_eq!(s.turn(), ShootoutTurn::PlayerShoots);

        // Player scores the sixth: AI still gets its kick
        s.record(Kicker::Player, kick(true));
        assert!(!s.is_finished());
        assert_eq!(s.turn(), ShootoutTurn::PlayerSaves);
        assert_eq!(s.rounds_shown(), 6);

        s.record(Kicker::Ai, kick(false));
        assert_eq!(s.outcome().unwrap().winner, Kicker::Player);
        assert_eq!(s.score(), (6, 5));
    }

    #[test]
    fn test_sudden_death_level_pair_continues() {
        let mut s = shootout();
        play(&mut s, &[false; 5], &[false; 5]);
        s.record(Kicker::Player, kick(true));
        s.record(Kicker::Ai, kick(true));
        assert!(!s.is_finished());
        s.record(Kicker::Player, kick(false));
        s.record(Kicker::Ai, kick(true));
        assert_eq!(s.outcome().unwrap().winner, Kicker::Ai);
        assert_eq!(s.player_kicks().len(), 7);
    }

    #[test]
    fn test_out_of_turn_ignored() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut s = shootout();
        assert!(s.player_save(Lane::Left, &mut rng).is_none());
        assert!(s.player_shoot(Lane::Left, &mut rng).is_some());
        assert!(s.player_shoot(Lane::Left, &mut rng).is_none());
        assert!(s.player_save(Lane::Center, &mut rng).is_some());
        assert_eq!(s.player_kicks().len(), 1);
        assert_eq!(s.ai_kicks().len(), 1);
    }

    #[test]
    fn test_kick_rules() {
        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..200 {
            let mut s = shootout();
            let shot = s.player_shoot(Lane::Right, &mut rng).unwrap();
            assert_eq!(shot.goal, shot.shot != shot.dive);
            let save = s.player_save(Lane::Center, &mut rng).unwrap();
            if save.shot == save.dive {
                assert!(!save.goal);
            }
        }
    }

    #[test]
    fn test_keeper_reads_with_save_probability() {
        let mut rng = Pcg32::seed_from_u64(3);
        let tuning = Difficulty::VeryHard.tuning();
        let trials = 4000;
        let mut saved = 0;
        for _ in 0..trials {
            let mut s = PenaltyShootout::new(tuning);
            if !s.player_shoot(Lane::Left, &mut rng).unwrap().goal {
                saved += 1;
            }
        }
        let rate = saved as f32 / trials as f32;
        assert!((rate - tuning.ai_save_success).abs() < 0.05, "save rate {rate}");
    }

    #[test]
    fn test_random_shootouts_terminate() {
        let mut rng = Pcg32::seed_from_u64(4);
        for _ in 0..100 {
            let mut s = shootout();
            let mut steps = 0;
            while !s.is_finished() {
                let lane = Lane::ALL[steps % 3];
                match s.turn() {
                    ShootoutTurn::PlayerShoots => s.player_shoot(lane, &mut rng),
                    ShootoutTurn::PlayerSaves => s.player_save(lane, &mut rng),
                    ShootoutTurn::Finished => None,
                };
                steps += 1;
                assert!(steps < 500);
            }
            let outcome = s.outcome().unwrap();
            assert_ne!(outcome.player_goals, outcome.ai_goals);
        }
    }

    #[test]
    fn test_lane_names() {
        for lane in Lane::ALL {
            assert_eq!(Lane::from_str(lane.as_str()), Some(lane));
        }
        assert_eq!(Lane::from_str("up"), None);
    }
}
