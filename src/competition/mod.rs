//! League and knockout competitions
//!
//! Pure data and algorithms: fixtures, tables and brackets. Nothing here
//! knows about live matches; results come in as [`MatchResult`] values.

pub mod league;
pub mod result;
pub mod team;
pub mod tournament;

pub use league::{Fixture, League, LeagueTableRow, calculate_league_table, generate_fixtures};
pub use result::{MatchResult, ResultSide, simulate_knockout_match, simulate_match};
pub use team::{Team, TeamCode, default_teams, find_team};
pub use tournament::{
    BRACKET_SIZE, NodeSlot, Tournament, TournamentNode, generate_tournament_bracket, round_name,
};
