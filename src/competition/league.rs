//! Double round-robin league: fixtures, table and week progression

use std::cmp::Ordering;
use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::result::{MatchResult, simulate_match};
use super::team::{Team, TeamCode, find_team};

/// Points for a win / draw / loss
pub const POINTS_WIN: u32 = 3;
pub const POINTS_DRAW: u32 = 1;
pub const POINTS_LOSS: u32 = 0;

/// A scheduled league pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    /// 1-based round (week)
    pub round: u32,
    pub home: TeamCode,
    pub away: TeamCode,
    #[serde(default)]
    pub result: Option<MatchResult>,
}

impl Fixture {
    fn new(round: u32, home: &str, away: &str) -> Self {
        Self {
            round,
            home: home.to_string(),
            away: away.to_string(),
            result: None,
        }
    }

    pub fn involves(&self, code: &str) -> bool {
        self.home == code || self.away == code
    }

    pub fn is_played(&self) -> bool {
        self.result.is_some()
    }

    /// Attach a result. Results are write-once: returns false if one is
    /// already recorded.
    pub fn record_result(&mut self, result: MatchResult) -> bool {
        if self.result.is_some() {
            return false;
        }
        self.result = Some(result);
        true
    }
}

/// Build a double round-robin schedule with the circle method.
///
/// An odd team count is padded with a bye; pairings against the bye are
/// dropped. The second half mirrors the first with venues swapped.
pub fn generate_fixtures(teams: &[Team]) -> Vec<Fixture> {
    if teams.len() < 2 {
        return Vec::new();
    }

    // None is the bye slot
    let mut schedule: Vec<Option<&str>> = teams.iter().map(|t| Some(t.code.as_str())).collect();
    if schedule.len() % 2 == 1 {
        schedule.push(None);
    }
    let n = schedule.len();
    let rounds = (n - 1) as u32;

    let mut first_half = Vec::with_capacity(rounds as usize * n / 2);
    for round in 0..rounds {
        for slot in 0..n / 2 {
            if let (Some(a), Some(b)) = (schedule[slot], schedule[n - 1 - slot]) {
                // Alternate venue by slot parity
                let fixture = if slot % 2 == 0 {
                    Fixture::new(round + 1, a, b)
                } else {
                    Fixture::new(round + 1, b, a)
                };
                first_half.push(fixture);
            }
        }
        // Keep slot 0 fixed, rotate the rest one step
        if let Some(last) = schedule.pop() {
            schedule.insert(1, last);
        }
    }

    let second_half: Vec<Fixture> = first_half
        .iter()
        .map(|f| Fixture::new(f.round + rounds, &f.away, &f.home))
        .collect();

    first_half.extend(second_half);
    first_half
}

/// One line of the league table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueTableRow {
    pub team: Team,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
}

impl LeagueTableRow {
    fn new(team: Team) -> Self {
        Self {
            team,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }

    fn add(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        match scored.cmp(&conceded) {
            Ordering::Greater => {
                self.won += 1;
                self.points += POINTS_WIN;
            }
            Ordering::Equal => {
                self.drawn += 1;
                self.points += POINTS_DRAW;
            }
            Ordering::Less => {
                self.lost += 1;
                self.points += POINTS_LOSS;
            }
        }
    }
}

/// Table ordering: points, goal difference, goals for (all descending),
/// then name ascending ignoring case. Code breaks exact name ties.
///
/// Names compare by Unicode scalar value after lowercasing, so Turkish
/// letters such as `ç` or `ş` sort after `z` rather than beside `c`/`s`.
fn table_order(a: &LeagueTableRow, b: &LeagueTableRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then(b.goal_difference.cmp(&a.goal_difference))
        .then(b.goals_for.cmp(&a.goals_for))
        .then_with(|| name_order(&a.team.name, &b.team.name))
        .then_with(|| a.team.code.cmp(&b.team.code))
}

fn name_order(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

/// Recompute the league table from scratch.
///
/// Fixtures without a result or naming an unknown team are skipped.
pub fn calculate_league_table(teams: &[Team], fixtures: &[Fixture]) -> Vec<LeagueTableRow> {
    let mut rows: Vec<LeagueTableRow> = teams.iter().cloned().map(LeagueTableRow::new).collect();
    let index: HashMap<&str, usize> = teams
        .iter()
        .enumerate()
        .map(|(i, t)| (t.code.as_str(), i))
        .collect();

    for fixture in fixtures {
        let Some(result) = fixture.result else {
            continue;
        };
        let (Some(&home), Some(&away)) = (
            index.get(fixture.home.as_str()),
            index.get(fixture.away.as_str()),
        ) else {
            continue;
        };
        rows[home].add(result.team1_score, result.team2_score);
        rows[away].add(result.team2_score, result.team1_score);
    }

    for row in &mut rows {
        row.goal_difference = row.goals_for as i32 - row.goals_against as i32;
    }
    rows.sort_by(table_order);
    rows
}

/// A league season for one human-controlled team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub player_team: TeamCode,
    pub teams: Vec<Team>,
    pub fixtures: Vec<Fixture>,
    pub table: Vec<LeagueTableRow>,
    /// Number of weeks already played
    pub current_week: u32,
}

impl League {
    /// Start a season. `None` if the player's team is not in `teams` or
    /// there are too few teams to schedule anything.
    pub fn new(teams: Vec<Team>, player_team: &str) -> Option<Self> {
        find_team(&teams, player_team)?;
        let fixtures = generate_fixtures(&teams);
        if fixtures.is_empty() {
            return None;
        }
        let table = calculate_league_table(&teams, &fixtures);
        log::info!(
            "League created: {} teams, {} fixtures, player {}",
            teams.len(),
            fixtures.len(),
            player_team
        );
        Some(Self {
            player_team: player_team.to_string(),
            teams,
            fixtures,
            table,
            current_week: 0,
        })
    }

    pub fn total_weeks(&self) -> u32 {
        self.fixtures.iter().map(|f| f.round).max().unwrap_or(0)
    }

    pub fn is_finished(&self) -> bool {
        self.current_week >= self.total_weeks()
    }

    /// Fixtures scheduled for the upcoming week
    pub fn week_fixtures(&self) -> impl Iterator<Item = &Fixture> {
        let round = self.current_week + 1;
        self.fixtures.iter().filter(move |f| f.round == round)
    }

    /// The player's unplayed fixture this week, if any (none on a bye week)
    pub fn player_fixture(&self) -> Option<&Fixture> {
        if self.is_finished() {
            return None;
        }
        self.week_fixtures()
            .find(|f| f.involves(&self.player_team) && !f.is_played())
    }

    /// Play out the current week.
    ///
    /// `player_result` is oriented home/away like the player's fixture and
    /// is required whenever the player has a fixture this week. All other
    /// fixtures of the week are simulated. Returns false (and changes
    /// nothing) if the season is over or the player's result is missing.
    pub fn play_week(&mut self, player_result: Option<MatchResult>, rng: &mut impl Rng) -> bool {
        if self.is_finished() {
            return false;
        }
        let round = self.current_week + 1;
        let player_has_fixture = self.player_fixture().is_some();
        if player_has_fixture && player_result.is_none() {
            log::warn!("Week {round}: player fixture has no result, not advancing");
            return false;
        }

        for fixture in self.fixtures.iter_mut().filter(|f| f.round == round) {
            if fixture.is_played() {
                continue;
            }
            let result = if fixture.involves(&self.player_team) {
                match player_result {
                    Some(result) => result,
                    None => continue,
                }
            } else {
                simulate_match(rng)
            };
            fixture.record_result(result);
        }

        self.table = calculate_league_table(&self.teams, &self.fixtures);
        self.current_week += 1;
        log::info!("League week {} played", round);
        if let Some(champion) = self.champion() {
            log::info!("League finished, champion {}", champion.name);
        }
        true
    }

    /// Table leader once the season is over
    pub fn champion(&self) -> Option<&Team> {
        if !self.is_finished() {
            return None;
        }
        self.table.first().map(|row| &row.team)
    }

    /// 1-based table position of the player's team
    pub fn player_position(&self) -> Option<usize> {
        self.table
            .iter()
            .position(|row| row.team.code == self.player_team)
            .map(|i| i + 1)
    }

    pub fn team(&self, code: &str) -> Option<&Team> {
        find_team(&self.teams, code)
    }
}
