//! Competition hub
//!
//! Owns the saved league and tournament and the one match that may be in
//! progress. Matches are started here in exactly one context, and their
//! outcomes are routed back into that context and persisted.

use rand::Rng;

use crate::competition::{League, MatchResult, Team, Tournament, find_team, generate_tournament_bracket};
use crate::persistence::{
    self, KEY_LEAGUE, KEY_SETTINGS, KEY_TOURNAMENT, SnapshotStore, StoreError,
};
use crate::play::{Match, MatchContext, MatchOutcome, MatchSetup, Opponent};
use crate::settings::Settings;

pub struct Hub {
    store: Box<dyn SnapshotStore>,
    settings: Settings,
    teams: Vec<Team>,
    league: Option<League>,
    tournament: Option<Tournament>,
    /// Context of the match currently being played
    active: Option<MatchContext>,
}

impl Hub {
    /// Restore settings and any saved competitions from `store`
    pub fn open(store: Box<dyn SnapshotStore>, teams: Vec<Team>) -> Self {
        let settings = Settings::load(store.as_ref());
        let league: Option<League> = persistence::load_snapshot(store.as_ref(), KEY_LEAGUE);
        let tournament: Option<Tournament> =
            persistence::load_snapshot(store.as_ref(), KEY_TOURNAMENT);
        if let Some(league) = &league {
            log::info!(
                "Resuming league for {} at week {}",
                league.player_team,
                league.current_week + 1
            );
        }
        if let Some(tournament) = &tournament {
            log::info!(
                "Resuming tournament for {} ({})",
                tournament.player_team,
                tournament.current_round_name()
            );
        }
        Self {
            store,
            settings,
            teams,
            league,
            tournament,
            active: None,
        }
    }

    pub fn store(&self) -> &dyn SnapshotStore {
        self.store.as_ref()
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        if let Err(e) = self.settings.save(self.store.as_mut()) {
            log::warn!("Could not save settings: {e}");
        }
    }

    pub fn league(&self) -> Option<&League> {
        self.league.as_ref()
    }

    pub fn tournament(&self) -> Option<&Tournament> {
        self.tournament.as_ref()
    }

    pub fn active_context(&self) -> Option<MatchContext> {
        self.active
    }

    /// Start a new season, replacing any saved one
    pub fn start_league(&mut self, player_team: &str) -> bool {
        if self.active.is_some() {
            return false;
        }
        let Some(league) = League::new(self.teams.clone(), player_team) else {
            return false;
        };
        self.league = Some(league);
        self.persist_league();
        true
    }

    /// Draw a new bracket, replacing any saved one
    pub fn start_tournament(&mut self, player_team: &str, rng: &mut impl Rng) -> bool {
        if self.active.is_some() {
            return false;
        }
        let Some(tournament) = generate_tournament_bracket(&self.teams, player_team, rng) else {
            return false;
        };
        self.tournament = Some(tournament);
        self.persist_tournament();
        true
    }

    /// One-off match between any two catalog teams
    pub fn start_quick_match(&mut self, team1: &str, team2: &str, opponent: Opponent) -> Option<Match> {
        if team1 == team2 {
            return None;
        }
        let team1 = find_team(&self.teams, team1)?.clone();
        let team2 = find_team(&self.teams, team2)?.clone();
        let mut setup = self.setup(MatchContext::Quick, team1, team2);
        setup.opponent = opponent;
        self.begin(setup)
    }

    /// The player's fixture of the current league week
    pub fn start_league_match(&mut self) -> Option<Match> {
        let league = self.league.as_ref()?;
        let fixture = league.player_fixture()?;
        let opponent = if fixture.home == league.player_team {
            &fixture.away
        } else {
            &fixture.home
        };
        let team1 = league.team(&league.player_team)?.clone();
        let team2 = league.team(opponent)?.clone();
        let setup = self.setup(MatchContext::League, team1, team2);
        self.begin(setup)
    }

    /// The player's node of the current tournament round
    pub fn start_tournament_match(&mut self) -> Option<Match> {
        let tournament = self.tournament.as_ref()?;
        let (a, b) = tournament.player_match()?.teams()?;
        let opponent = if a == tournament.player_team { b } else { a };
        let team1 = tournament.team(&tournament.player_team)?.clone();
        let team2 = tournament.team(opponent)?.clone();
        let setup = self.setup(MatchContext::Tournament, team1, team2);
        self.begin(setup)
    }

    fn setup(&self, context: MatchContext, team1: Team, team2: Team) -> MatchSetup {
        let mut setup = MatchSetup::new(context, team1, team2, self.settings.difficulty);
        setup.cosmetics = self.settings.cosmetics();
        setup
    }

    fn begin(&mut self, setup: MatchSetup) -> Option<Match> {
        if self.active.is_some() {
            log::warn!(
                "Refusing to start a {} match while another is in progress",
                setup.context.as_str()
            );
            return None;
        }
        self.active = Some(setup.context);
        Some(Match::new(setup))
    }

    /// Route a finished match into its competition and save.
    ///
    /// League results complete the week (other fixtures simulated);
    /// tournament results complete the round. False if the outcome does
    /// not belong to the active match.
    pub fn finish_match(&mut self, outcome: &MatchOutcome, rng: &mut impl Rng) -> bool {
        if self.active != Some(outcome.context) {
            return false;
        }
        let recorded = match outcome.context {
            MatchContext::Quick => true,
            MatchContext::League => self.record_league(outcome, rng),
            MatchContext::Tournament => self.record_tournament(outcome, rng),
        };
        if recorded {
            self.active = None;
        }
        recorded
    }

    /// Forget an aborted match; nothing is recorded
    pub fn abandon_match(&mut self) {
        if let Some(context) = self.active.take() {
            log::info!("Abandoned {} match", context.as_str());
        }
    }

    fn record_league(&mut self, outcome: &MatchOutcome, rng: &mut impl Rng) -> bool {
        let Some(league) = self.league.as_mut() else {
            return false;
        };
        let Some(fixture) = league.player_fixture() else {
            return false;
        };
        // Re-orient from player-first to home/away
        let result: MatchResult = if fixture.home == outcome.team1 && fixture.away == outcome.team2 {
            outcome.result
        } else if fixture.home == outcome.team2 && fixture.away == outcome.team1 {
            outcome.result.swapped()
        } else {
            return false;
        };
        if !league.play_week(Some(result), rng) {
            return false;
        }
        self.persist_league();
        true
    }

    fn record_tournament(&mut self, outcome: &MatchOutcome, rng: &mut impl Rng) -> bool {
        let Some(tournament) = self.tournament.as_mut() else {
            return false;
        };
        if !tournament.record_result(&outcome.team1, &outcome.team2, outcome.result) {
            return false;
        }
        tournament.complete_round(rng);
        self.persist_tournament();
        true
    }

    /// Play a league week in which the player has a bye
    pub fn play_league_bye(&mut self, rng: &mut impl Rng) -> bool {
        if self.active.is_some() {
            return false;
        }
        let Some(league) = self.league.as_mut() else {
            return false;
        };
        if league.player_fixture().is_some() || !league.play_week(None, rng) {
            return false;
        }
        self.persist_league();
        true
    }

    /// Simulate a round the eliminated player is watching
    pub fn simulate_tournament_round(&mut self, rng: &mut impl Rng) -> bool {
        if self.active.is_some() {
            return false;
        }
        let Some(tournament) = self.tournament.as_mut() else {
            return false;
        };
        if !tournament.complete_round(rng) {
            return false;
        }
        self.persist_tournament();
        true
    }

    pub fn reset_league(&mut self) {
        self.league = None;
        self.persist_league();
    }

    pub fn reset_tournament(&mut self) {
        self.tournament = None;
        self.persist_tournament();
    }

    /// Drop both competitions and the settings
    pub fn reset_all(&mut self) {
        self.reset_league();
        self.reset_tournament();
        self.settings = Settings::default();
        if let Err(e) = self.store.remove(KEY_SETTINGS) {
            log::warn!("Could not clear settings: {e}");
        }
    }

    fn persist_league(&mut self) {
        let result = write_or_remove(self.store.as_mut(), KEY_LEAGUE, self.league.as_ref());
        if let Err(e) = result {
            log::warn!("Could not save league: {e}");
        }
    }

    fn persist_tournament(&mut self) {
        let result = write_or_remove(self.store.as_mut(), KEY_TOURNAMENT, self.tournament.as_ref());
        if let Err(e) = result {
            log::warn!("Could not save tournament: {e}");
        }
    }
}

fn write_or_remove<T: serde::Serialize>(
    store: &mut dyn SnapshotStore,
    key: &str,
    value: Option<&T>,
) -> Result<(), StoreError> {
    match value {
        Some(value) => persistence::save_snapshot(store, key, value),
        None => store.remove(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competition::default_teams;
    use crate::persistence::MemoryStore;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn hub() -> Hub {
        Hub::open(Box::new(MemoryStore::new()), default_teams())
    }

    /// Hub reopened over a copy of this hub's snapshots
    fn reopen(hub: &Hub) -> Hub {
        let mut store = MemoryStore::new();
        for key in [KEY_LEAGUE, KEY_TOURNAMENT, KEY_SETTINGS] {
            if let Ok(Some(json)) = hub.store().load(key) {
                store.save(key, &json).unwrap();
            }
        }
        Hub::open(Box::new(store), default_teams())
    }

    fn outcome(m: &Match, team1_score: u32, team2_score: u32) -> MatchOutcome {
        let setup = m.setup();
        let result = MatchResult::new(team1_score, team2_score);
        MatchOutcome {
            context: setup.context,
            team1: setup.team1.code.clone(),
            team2: setup.team2.code.clone(),
            result,
            winner: None,
        }
    }

    #[test]
    fn test_league_week_recorded_and_saved() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut hub = hub();
        assert!(hub.start_league("GS"));

        let m = hub.start_league_match().unwrap();
        assert_eq!(m.setup().team1.code, "GS");
        assert_eq!(hub.active_context(), Some(MatchContext::League));
        assert!(hub.finish_match(&outcome(&m, 3, 0), &mut rng));
        assert_eq!(hub.active_context(), None);

        let league = hub.league().unwrap();
        assert_eq!(league.current_week, 1);
        let played = league
            .fixtures
            .iter()
            .find(|f| f.round == 1 && f.involves("GS"))
            .unwrap();
        let (gs, other) = if played.home == "GS" {
            (played.result.unwrap().team1_score, played.result.unwrap().team2_score)
        } else {
            (played.result.unwrap().team2_score, played.result.unwrap().team1_score)
        };
        assert_eq!((gs, other), (3, 0));

        let restored = reopen(&hub);
        assert_eq!(restored.league(), hub.league());
    }

    #[test]
    fn test_one_match_context_at_a_time() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut hub = hub();
        hub.start_league("GS");
        hub.start_tournament("FB", &mut rng);

        let m = hub.start_league_match().unwrap();
        assert!(hub.start_tournament_match().is_none());
        assert!(hub.start_quick_match("GS", "FB", Opponent::Ai).is_none());
        assert!(!hub.start_league("TS"));

        // Outcome from the wrong context is refused
        let mut wrong = outcome(&m, 1, 0);
        wrong.context = MatchContext::Tournament;
        assert!(!hub.finish_match(&wrong, &mut rng));
        assert_eq!(hub.active_context(), Some(MatchContext::League));
    }

    #[test]
    fn test_abandon_records_nothing() {
        let mut hub = hub();
        hub.start_league("BJK");
        let _m = hub.start_league_match().unwrap();
        hub.abandon_match();
        assert_eq!(hub.active_context(), None);
        assert_eq!(hub.league().unwrap().current_week, 0);
        assert!(hub.start_league_match().is_some());
    }

    #[test]
    fn test_quick_match_records_nothing() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut hub = hub();
        assert!(hub.start_quick_match("GS", "GS", Opponent::Ai).is_none());
        assert!(hub.start_quick_match("GS", "NOPE", Opponent::Ai).is_none());
        let m = hub.start_quick_match("GS", "FB", Opponent::LocalHuman).unwrap();
        assert_eq!(m.setup().opponent, Opponent::LocalHuman);
        assert!(hub.finish_match(&outcome(&m, 0, 0), &mut rng));
        assert!(hub.league().is_none());
    }

    #[test]
    fn test_tournament_runs_to_a_winner() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut hub = hub();
        assert!(hub.start_tournament("KON", &mut rng));

        while !hub.tournament().unwrap().is_finished() {
            if hub.tournament().unwrap().is_player_eliminated() {
                assert!(hub.simulate_tournament_round(&mut rng));
                continue;
            }
            let m = hub.start_tournament_match().unwrap();
            assert!(hub.finish_match(&outcome(&m, 1, 0), &mut rng));
        }
        assert_eq!(hub.tournament().unwrap().winner.as_deref(), Some("KON"));
        assert_eq!(reopen(&hub).tournament(), hub.tournament());
    }

    #[test]
    fn test_reset_clears_saves() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut hub = hub();
        hub.start_league("GS");
        hub.start_tournament("GS", &mut rng);
        hub.update_settings(Settings {
            confetti: false,
            ..Default::default()
        });
        assert!(!reopen(&hub).settings().confetti);

        hub.reset_all();
        let restored = reopen(&hub);
        assert!(restored.league().is_none());
        assert!(restored.tournament().is_none());
        assert_eq!(restored.settings(), &Settings::default());
    }

    #[test]
    fn test_settings_flow_into_matches() {
        let mut hub = hub();
        hub.update_settings(Settings {
            reduced_motion: true,
            ..Default::default()
        });
        let m = hub.start_quick_match("GS", "FB", Opponent::Ai).unwrap();
        assert!(!m.physics().cosmetics.confetti);
        assert!(!m.physics().cosmetics.screen_shake);
    }

    #[test]
    fn test_corrupt_league_snapshot_ignored() {
        let mut store = MemoryStore::new();
        store.save(KEY_LEAGUE, "{oops").unwrap();
        let hub = Hub::open(Box::new(store), default_teams());
        assert!(hub.league().is_none());
    }
}
