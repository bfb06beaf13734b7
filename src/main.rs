//! Finger Football headless runner
//!
//! Plays quick matches, league weeks and tournament rounds with the
//! autopilot on the player's paddle. Progress is saved like the game does.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use clap::{Parser, Subcommand};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use finger_football::competition::{Team, default_teams};
    use finger_football::consts::SIM_DT;
    use finger_football::hub::Hub;
    use finger_football::platform;
    use finger_football::play::{
        Checkpoint, Lane, Match, MatchEvent, MatchOutcome, Opponent, ShootoutTurn,
    };
    use finger_football::sim::TickInput;
    use finger_football::{Difficulty, Side};

    /// Finger Football - headless match runner
    #[derive(Parser)]
    #[command(name = "finger-football")]
    #[command(about = "Play finger football matches and competitions headlessly", long_about = None)]
    struct Cli {
        #[command(subcommand)]
        command: Commands,

        /// RNG seed (random when omitted)
        #[arg(long, global = true)]
        seed: Option<u64>,

        /// very-easy, easy, normal, hard or very-hard (saved to settings)
        #[arg(long, global = true, value_parser = parse_difficulty)]
        difficulty: Option<Difficulty>,

        /// Directory for saved competitions and settings
        #[arg(long, global = true)]
        save_dir: Option<PathBuf>,

        /// JSON team catalog replacing the built-in clubs
        #[arg(long, global = true)]
        teams: Option<PathBuf>,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Play a one-off match
        Quick { team1: String, team2: String },

        /// Play league weeks, starting a season if none is saved
        League {
            /// Start a new season for this team
            #[arg(long)]
            new: Option<String>,
            /// Weeks to play
            #[arg(long, default_value_t = 1)]
            weeks: u32,
        },

        /// Play tournament rounds, drawing a bracket if none is saved
        Tournament {
            /// Draw a new bracket for this team
            #[arg(long)]
            new: Option<String>,
            /// Play every remaining round
            #[arg(long)]
            all: bool,
        },

        /// List the team catalog
        Teams,

        /// Delete saved competitions and settings
        Reset,
    }

    fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
        Difficulty::from_str(s).ok_or_else(|| {
            let names: Vec<&str> = Difficulty::ALL.iter().map(|d| d.as_str()).collect();
            format!("unknown difficulty {s:?} (expected one of {})", names.join(", "))
        })
    }

    fn load_catalog(path: &PathBuf) -> Result<Vec<Team>, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Team code from a code or name, ignoring case
    fn resolve_team(teams: &[Team], query: &str) -> Option<String> {
        let query = query.to_lowercase();
        teams
            .iter()
            .find(|t| t.code.to_lowercase() == query || t.name.to_lowercase() == query)
            .map(|t| t.code.clone())
    }

    /// Drive a match to its end, acknowledging every checkpoint and taking
    /// penalties at random lanes
    fn play_out(mut m: Match, rng: &mut Pcg32) -> Option<MatchOutcome> {
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let (home, away) = (m.setup().team1.code.clone(), m.setup().team2.code.clone());

        loop {
            for event in m.advance(SIM_DT, &input, rng) {
                match event {
                    MatchEvent::Goal { scorer, score } => {
                        let team = match scorer {
                            Side::Bottom => &home,
                            Side::Top => &away,
                        };
                        println!(
                            "  {:>3}'  GOAL {:<5} {} {}-{} {}",
                            m.minute(),
                            team,
                            home,
                            score.bottom,
                            score.top,
                            away
                        );
                    }
                    MatchEvent::Checkpoint(Checkpoint::Shootout) => {
                        println!("  Penalties!");
                    }
                    _ => {}
                }
            }

            let lane = Lane::ALL[rng.random_range(0..Lane::ALL.len())];
            let turn = m.shootout().map(|s| s.turn());
            match turn {
                Some(ShootoutTurn::PlayerShoots) => {
                    m.shoot(lane, rng);
                }
                Some(ShootoutTurn::PlayerSaves) => {
                    m.save(lane, rng);
                }
                _ => {}
            }

            match m.checkpoint() {
                Some(Checkpoint::MatchResult) => {
                    m.acknowledge();
                    return m.outcome();
                }
                Some(checkpoint) if checkpoint.needs_ack() => {
                    m.acknowledge();
                }
                _ => {}
            }
        }
    }

    fn print_outcome(outcome: &MatchOutcome) {
        let pens = outcome
            .result
            .penalties
            .map(|(a, b)| format!(" ({a}-{b} on penalties)"))
            .unwrap_or_default();
        println!(
            "{} {}-{} {}{}",
            outcome.team1, outcome.result.team1_score, outcome.result.team2_score, outcome.team2, pens
        );
    }

    fn play_league(hub: &mut Hub, weeks: u32, rng: &mut Pcg32) {
        for _ in 0..weeks {
            let Some(league) = hub.league() else {
                return;
            };
            if league.is_finished() {
                break;
            }
            println!("Week {}/{}", league.current_week + 1, league.total_weeks());

            match hub.start_league_match() {
                Some(m) => {
                    let Some(outcome) = play_out(m, rng) else {
                        hub.abandon_match();
                        return;
                    };
                    print_outcome(&outcome);
                    hub.finish_match(&outcome, rng);
                }
                None => {
                    println!("  Bye week");
                    hub.play_league_bye(rng);
                }
            }
        }

        let Some(league) = hub.league() else {
            return;
        };
        println!();
        println!(" #  Team              P  W  D  L  GF  GA  GD  Pts");
        for (i, row) in league.table.iter().enumerate() {
            let marker = if row.team.code == league.player_team { "*" } else { " " };
            println!(
                "{:>2}{} {:<16} {:>2} {:>2} {:>2} {:>2} {:>3} {:>3} {:>3} {:>4}",
                i + 1,
                marker,
                row.team.name,
                row.played,
                row.won,
                row.drawn,
                row.lost,
                row.goals_for,
                row.goals_against,
                row.goal_difference,
                row.points
            );
        }
        if let Some(champion) = league.champion() {
            println!("\nChampion: {}", champion.name);
        }
    }

    fn play_tournament(hub: &mut Hub, all: bool, rng: &mut Pcg32) {
        loop {
            let Some(tournament) = hub.tournament() else {
                return;
            };
            if tournament.is_finished() {
                break;
            }
            println!("{}", tournament.current_round_name());

            if tournament.is_player_eliminated() {
                hub.simulate_tournament_round(rng);
            } else if let Some(m) = hub.start_tournament_match() {
                let Some(outcome) = play_out(m, rng) else {
                    hub.abandon_match();
                    return;
                };
                print_outcome(&outcome);
                hub.finish_match(&outcome, rng);
            } else {
                return;
            }

            if !all {
                break;
            }
        }

        let Some(tournament) = hub.tournament() else {
            return;
        };
        for node in tournament.rounds.iter().flatten() {
            if let (Some((a, b)), Some(result)) = (node.teams(), node.result()) {
                println!(
                    "  #{} {} {}-{} {}",
                    node.match_id, a, result.team1_score, result.team2_score, b
                );
            }
        }
        if tournament.is_player_eliminated() {
            println!("{} is out", tournament.player_team);
        }
        if let Some(winner) = &tournament.winner {
            println!("\nWinner: {}", winner);
        }
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let cli = Cli::parse();
        platform::init_logging();

        let seed = cli.seed.unwrap_or_else(rand::random::<u64>);
        log::info!("Seed: {}", seed);
        let mut rng = Pcg32::seed_from_u64(seed);

        let teams = match &cli.teams {
            Some(path) => load_catalog(path)?,
            None => default_teams(),
        };
        let mut hub = Hub::open(platform::default_store_in(cli.save_dir.clone()), teams);

        if let Some(difficulty) = cli.difficulty {
            let mut settings = hub.settings().clone();
            settings.difficulty = difficulty;
            hub.update_settings(settings);
        }

        let team_code = |hub: &Hub, query: &str| {
            resolve_team(hub.teams(), query).ok_or_else(|| format!("unknown team {query:?}"))
        };

        match cli.command {
            Commands::Quick { team1, team2 } => {
                let team1 = team_code(&hub, &team1)?;
                let team2 = team_code(&hub, &team2)?;
                let m = hub
                    .start_quick_match(&team1, &team2, Opponent::Ai)
                    .ok_or("a team cannot play itself")?;
                if let Some(outcome) = play_out(m, &mut rng) {
                    print_outcome(&outcome);
                    hub.finish_match(&outcome, &mut rng);
                }
            }
            Commands::League { new, weeks } => {
                if let Some(query) = new {
                    let code = team_code(&hub, &query)?;
                    hub.start_league(&code);
                }
                if hub.league().is_none() {
                    return Err("no saved league; start one with --new <TEAM>".into());
                }
                play_league(&mut hub, weeks, &mut rng);
            }
            Commands::Tournament { new, all } => {
                if let Some(query) = new {
                    let code = team_code(&hub, &query)?;
                    if !hub.start_tournament(&code, &mut rng) {
                        return Err("not enough teams for a bracket".into());
                    }
                }
                if hub.tournament().is_none() {
                    return Err("no saved tournament; start one with --new <TEAM>".into());
                }
                play_tournament(&mut hub, all, &mut rng);
            }
            Commands::Teams => {
                for team in hub.teams() {
                    println!("{:<5} {}", team.code, team.name);
                }
            }
            Commands::Reset => {
                hub.reset_all();
                println!("Saved progress cleared");
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = cli::run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives the library directly
}
