//! Eight-team single elimination bracket

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::result::{MatchResult, ResultSide, simulate_knockout_match};
use super::team::{Team, TeamCode, find_team};

/// Teams in a bracket
pub const BRACKET_SIZE: usize = 8;

/// What a bracket node currently holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeSlot {
    /// Waiting on its feeder nodes
    Empty,
    /// Both teams known, not yet played
    Seeded { team1: TeamCode, team2: TeamCode },
    Decided {
        team1: TeamCode,
        team2: TeamCode,
        result: MatchResult,
        winner: TeamCode,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentNode {
    pub match_id: u32,
    pub slot: NodeSlot,
}

impl TournamentNode {
    fn empty(match_id: u32) -> Self {
        Self {
            match_id,
            slot: NodeSlot::Empty,
        }
    }

    pub fn teams(&self) -> Option<(&str, &str)> {
        match &self.slot {
            NodeSlot::Empty => None,
            NodeSlot::Seeded { team1, team2 } | NodeSlot::Decided { team1, team2, .. } => {
                Some((team1, team2))
            }
        }
    }

    pub fn winner(&self) -> Option<&str> {
        match &self.slot {
            NodeSlot::Decided { winner, .. } => Some(winner),
            _ => None,
        }
    }

    pub fn loser(&self) -> Option<&str> {
        match &self.slot {
            NodeSlot::Decided {
                team1,
                team2,
                winner,
                ..
            } => Some(if winner == team1 { team2 } else { team1 }),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&MatchResult> {
        match &self.slot {
            NodeSlot::Decided { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.slot, NodeSlot::Seeded { .. })
    }

    pub fn involves(&self, code: &str) -> bool {
        self.teams().is_some_and(|(a, b)| a == code || b == code)
    }

    /// Fill an empty node. False if it already has teams.
    fn seed(&mut self, team1: &str, team2: &str) -> bool {
        if self.slot != NodeSlot::Empty {
            return false;
        }
        self.slot = NodeSlot::Seeded {
            team1: team1.to_string(),
            team2: team2.to_string(),
        };
        true
    }

    /// Record the result of a seeded node. False if the node is not
    /// seeded or the result has no winner.
    fn decide(&mut self, result: MatchResult) -> bool {
        let NodeSlot::Seeded { team1, team2 } = &self.slot else {
            return false;
        };
        let winner = match result.winner() {
            Some(ResultSide::Team1) => team1.clone(),
            Some(ResultSide::Team2) => team2.clone(),
            None => return false,
        };
        self.slot = NodeSlot::Decided {
            team1: team1.clone(),
            team2: team2.clone(),
            result,
            winner,
        };
        true
    }
}

/// Display name for a round given how many rounds the bracket has
pub fn round_name(round: usize, total_rounds: usize) -> &'static str {
    match total_rounds.saturating_sub(round) {
        1 => "Final",
        2 => "Semifinal",
        3 => "Quarterfinal",
        _ => "Early round",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub player_team: TeamCode,
    /// The bracket's participants
    pub teams: Vec<Team>,
    /// Round 0 is the quarterfinal; node i and i+1 feed node i/2 of the next round
    pub rounds: Vec<Vec<TournamentNode>>,
    pub current_round: usize,
    #[serde(default)]
    pub winner: Option<TeamCode>,
}

/// Draw an eight-team bracket: the player plus seven sampled opponents,
/// shuffled into four quarterfinals. `None` if fewer than eight teams are
/// available or the player's team is unknown.
pub fn generate_tournament_bracket(
    teams: &[Team],
    player_team: &str,
    rng: &mut impl Rng,
) -> Option<Tournament> {
    let player = find_team(teams, player_team)?;
    let mut others: Vec<&Team> = teams.iter().filter(|t| t.code != player_team).collect();
    if others.len() < BRACKET_SIZE - 1 {
        log::warn!(
            "Cannot draw a bracket: {} teams available, {} needed",
            teams.len(),
            BRACKET_SIZE
        );
        return None;
    }
    others.shuffle(rng);

    let mut entrants: Vec<Team> = others
        .into_iter()
        .take(BRACKET_SIZE - 1)
        .cloned()
        .collect();
    entrants.push(player.clone());
    entrants.shuffle(rng);

    let mut match_id = 0;
    let mut rounds = Vec::new();
    let mut width = BRACKET_SIZE / 2;
    while width > 0 {
        let round: Vec<TournamentNode> = (0..width)
            .map(|_| {
                let node = TournamentNode::empty(match_id);
                match_id += 1;
                node
            })
            .collect();
        rounds.push(round);
        width /= 2;
    }

    for (node, pair) in rounds[0].iter_mut().zip(entrants.chunks(2)) {
        node.seed(&pair[0].code, &pair[1].code);
    }

    log::info!(
        "Tournament drawn for {}: {}",
        player_team,
        entrants
            .iter()
            .map(|t| t.code.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Some(Tournament {
        player_team: player_team.to_string(),
        teams: entrants,
        rounds,
        current_round: 0,
        winner: None,
    })
}

impl Tournament {
    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    pub fn current_round_name(&self) -> &'static str {
        round_name(self.current_round, self.rounds.len())
    }

    /// The player's unplayed node in the current round
    pub fn player_match(&self) -> Option<&TournamentNode> {
        if self.is_finished() {
            return None;
        }
        self.rounds
            .get(self.current_round)?
            .iter()
            .find(|n| n.is_pending() && n.involves(&self.player_team))
    }

    /// Whether the player lost any decided node
    pub fn is_player_eliminated(&self) -> bool {
        self.rounds
            .iter()
            .flatten()
            .any(|n| n.loser() == Some(self.player_team.as_str()))
    }

    /// Record a result for the current round's `team1` vs `team2` node.
    ///
    /// A result given in reversed team order is flipped to match the node.
    /// False if no such pending node exists or the result has no winner.
    pub fn record_result(&mut self, team1: &str, team2: &str, result: MatchResult) -> bool {
        let Some(round) = self.rounds.get_mut(self.current_round) else {
            return false;
        };
        for node in round.iter_mut().filter(|n| n.is_pending()) {
            let oriented = match node.teams() {
                Some((a, b)) if a == team1 && b == team2 => Some(result),
                Some((a, b)) if a == team2 && b == team1 => Some(result.swapped()),
                _ => None,
            };
            if let Some(result) = oriented {
                return node.decide(result);
            }
        }
        false
    }

    /// Simulate every remaining node of the current round and move the
    /// winners on. After the final, sets the overall winner.
    ///
    /// False if the tournament is over or the player's own match is still
    /// unplayed.
    pub fn complete_round(&mut self, rng: &mut impl Rng) -> bool {
        if self.is_finished() || self.player_match().is_some() {
            return false;
        }
        let Some(round) = self.rounds.get_mut(self.current_round) else {
            return false;
        };
        for node in round.iter_mut().filter(|n| n.is_pending()) {
            node.decide(simulate_knockout_match(rng));
        }

        let name = self.current_round_name();
        if self.current_round + 1 < self.rounds.len() {
            self.advance_winners(self.current_round);
            self.current_round += 1;
            log::info!("Tournament {} complete", name);
        } else {
            self.winner = self.rounds[self.current_round]
                .first()
                .and_then(|n| n.winner())
                .map(str::to_string);
            if let Some(winner) = &self.winner {
                log::info!("Tournament won by {}", winner);
            }
        }
        true
    }

    /// Seed next-round nodes whose two feeders are both decided
    fn advance_winners(&mut self, round: usize) {
        let Some((done, rest)) = self.rounds[round..].split_first_mut() else {
            return;
        };
        let Some(next) = rest.first_mut() else {
            return;
        };
        for (i, parent) in next.iter_mut().enumerate() {
            let feeders = (
                done.get(2 * i).and_then(|n| n.winner()),
                done.get(2 * i + 1).and_then(|n| n.winner()),
            );
            if let (Some(a), Some(b)) = feeders {
                parent.seed(a, b);
            }
        }
    }

    pub fn team(&self, code: &str) -> Option<&Team> {
        find_team(&self.teams, code)
    }
}
