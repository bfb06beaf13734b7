//! Match lifecycle: halves, extra time, penalties, pauses and goals
//!
//! [`Match`] is the single owner of everything a live match mutates. The
//! host calls [`Match::advance`] once per frame; it feeds the fixed-step
//! physics, the one-second match clock and the one-shot timers.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::shootout::{Kick, Lane, PenaltyShootout};
use super::timers::{TIMER_EPSILON, TimerKind, Timers};
use crate::Side;
use crate::competition::{MatchResult, ResultSide, Team, TeamCode};
use crate::consts::*;
use crate::sim::{Control, Cosmetics, PhysicsEvent, PhysicsState, TickInput, tick};
use crate::tuning::Difficulty;

/// Where a match came from; decides draws and where the result goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchContext {
    Quick,
    League,
    Tournament,
}

impl MatchContext {
    /// League draws stand; the others play extra time
    pub fn allows_extra_time(&self) -> bool {
        matches!(self, MatchContext::Quick | MatchContext::Tournament)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchContext::Quick => "quick",
            MatchContext::League => "league",
            MatchContext::Tournament => "tournament",
        }
    }
}

/// Who controls the top paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Opponent {
    Ai,
    /// Second local player sharing the screen
    LocalHuman,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    FirstHalf,
    HalfTime,
    SecondHalf,
    ExtraTimeFirst,
    ExtraTimeBreak,
    ExtraTimeSecond,
    Penalties,
    Finished,
}

impl MatchPhase {
    /// Phases in which the ball is in play and the clock runs
    pub fn is_playing(&self) -> bool {
        matches!(
            self,
            MatchPhase::FirstHalf
                | MatchPhase::SecondHalf
                | MatchPhase::ExtraTimeFirst
                | MatchPhase::ExtraTimeSecond
        )
    }
}

/// A stop in play the host has to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Checkpoint {
    /// Counting down to a (re)start; resumes by itself
    Countdown { remaining: u32 },
    /// Between periods; acknowledging starts `next`
    PhaseBreak { next: MatchPhase },
    /// Level after extra time; acknowledging starts the shootout
    Shootout,
    /// Final whistle
    MatchResult,
}

impl Checkpoint {
    /// Whether the host must acknowledge before play continues
    pub fn needs_ack(&self) -> bool {
        !matches!(self, Checkpoint::Countdown { .. })
    }
}

/// Goals per side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub bottom: u32,
    pub top: u32,
}

impl Score {
    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::Bottom => self.bottom,
            Side::Top => self.top,
        }
    }

    fn add(&mut self, side: Side) {
        match side {
            Side::Bottom => self.bottom += 1,
            Side::Top => self.top += 1,
        }
    }

    pub fn is_level(&self) -> bool {
        self.bottom == self.top
    }
}

/// Everything needed to start a match. `team1` plays the bottom paddle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSetup {
    pub context: MatchContext,
    pub team1: Team,
    pub team2: Team,
    pub opponent: Opponent,
    pub difficulty: Difficulty,
    pub cosmetics: Cosmetics,
}

impl MatchSetup {
    pub fn new(context: MatchContext, team1: Team, team2: Team, difficulty: Difficulty) -> Self {
        Self {
            context,
            team1,
            team2,
            opponent: Opponent::Ai,
            difficulty,
            cosmetics: Cosmetics::default(),
        }
    }
}

/// Finished match, oriented team1 (bottom) vs team2 (top)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub context: MatchContext,
    pub team1: TeamCode,
    pub team2: TeamCode,
    pub result: MatchResult,
    /// `None` for a league draw
    pub winner: Option<TeamCode>,
}

/// Things the host may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum MatchEvent {
    Physics(PhysicsEvent),
    Goal { scorer: Side, score: Score },
    /// Countdown dropped to the given number of seconds
    Countdown(u32),
    KickOff,
    Checkpoint(Checkpoint),
    ShootoutKick { kick: Kick },
}

#[derive(Debug, Clone)]
pub struct Match {
    setup: MatchSetup,
    phase: MatchPhase,
    /// Match minutes elapsed
    minute: u32,
    score: Score,
    physics: PhysicsState,
    checkpoint: Option<Checkpoint>,
    user_paused: bool,
    /// Scorer of a goal whose celebration is still running
    goal_pending: Option<Side>,
    /// Kickoff resets so far; parity picks the phase-start kickoff direction
    resets: u32,
    timers: Timers,
    /// Physics time not yet simulated
    accumulator: f32,
    /// Fraction of the current match minute
    clock: f32,
    shootout: Option<PenaltyShootout>,
    aborted: bool,
    result_acknowledged: bool,
    events: Vec<MatchEvent>,
}

impl Match {
    /// Set up a match and start the opening countdown
    pub fn new(setup: MatchSetup) -> Self {
        let top = match setup.opponent {
            Opponent::Ai => Control::Ai {
                reaction: setup.difficulty.ai_reaction(),
            },
            Opponent::LocalHuman => Control::Human,
        };
        let mut physics = PhysicsState::new(Control::Human, top);
        physics.cosmetics = setup.cosmetics;

        log::info!(
            "Match started ({}): {} vs {}",
            setup.context.as_str(),
            setup.team1.code,
            setup.team2.code
        );

        let mut m = Self {
            setup,
            phase: MatchPhase::FirstHalf,
            minute: 0,
            score: Score::default(),
            physics,
            checkpoint: None,
            user_paused: false,
            goal_pending: None,
            resets: 0,
            timers: Timers::default(),
            accumulator: 0.0,
            clock: 0.0,
            shootout: None,
            aborted: false,
            result_acknowledged: false,
            events: Vec::new(),
        };
        m.kickoff();
        m.start_countdown();
        m
    }

    pub fn setup(&self) -> &MatchSetup {
        &self.setup
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn physics(&self) -> &PhysicsState {
        &self.physics
    }

    pub fn checkpoint(&self) -> Option<Checkpoint> {
        self.checkpoint
    }

    pub fn shootout(&self) -> Option<&PenaltyShootout> {
        self.shootout.as_ref()
    }

    pub fn is_user_paused(&self) -> bool {
        self.user_paused
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Whether the final whistle has been acknowledged
    pub fn is_closed(&self) -> bool {
        self.result_acknowledged
    }

    /// Ball in play and clock running
    pub fn is_running(&self) -> bool {
        self.phase.is_playing()
            && self.checkpoint.is_none()
            && !self.user_paused
            && self.goal_pending.is_none()
            && !self.aborted
    }

    /// Advance by one frame of `dt` seconds.
    ///
    /// Returns everything that happened since the previous call, including
    /// shootout kicks taken in between.
    pub fn advance(&mut self, dt: f32, input: &TickInput, rng: &mut impl Rng) -> Vec<MatchEvent> {
        if self.aborted {
            return Vec::new();
        }
        // NaN would poison the accumulator for the rest of the match
        let dt = if dt.is_nan() { 0.0 } else { dt.clamp(0.0, MAX_FRAME_DT) };

        if !self.user_paused {
            for kind in self.timers.advance(dt) {
                self.on_timer(kind);
            }
        }

        if self.is_running() {
            self.clock += dt;
            while self.clock >= 1.0 - TIMER_EPSILON && self.is_running() {
                self.clock -= 1.0;
                self.minute += 1;
                self.check_period_end();
            }
        }

        self.accumulator += dt;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            for event in tick(&mut self.physics, input, rng) {
                if let PhysicsEvent::Goal { scorer } = event {
                    self.on_goal(scorer);
                }
                self.events.push(MatchEvent::Physics(event));
            }
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        std::mem::take(&mut self.events)
    }

    /// Continue past a checkpoint that needs acknowledgement.
    ///
    /// Returns false if there is nothing to acknowledge.
    pub fn acknowledge(&mut self) -> bool {
        if self.aborted {
            return false;
        }
        match self.checkpoint {
            Some(Checkpoint::PhaseBreak { next }) => {
                log::debug!("Phase {:?} -> {:?}", self.phase, next);
                self.checkpoint = None;
                self.phase = next;
                self.clock = 0.0;
                self.kickoff();
                self.start_countdown();
                true
            }
            Some(Checkpoint::Shootout) => {
                log::debug!("Penalty shootout begins");
                self.checkpoint = None;
                self.phase = MatchPhase::Penalties;
                self.shootout = Some(PenaltyShootout::new(self.setup.difficulty.tuning()));
                self.sync_pause();
                true
            }
            Some(Checkpoint::MatchResult) => {
                self.checkpoint = None;
                self.result_acknowledged = true;
                true
            }
            Some(Checkpoint::Countdown { .. }) | None => false,
        }
    }

    /// User pause, allowed during play or a countdown
    pub fn pause(&mut self) -> bool {
        if self.aborted || self.user_paused || !self.phase.is_playing() {
            return false;
        }
        match self.checkpoint {
            None => {}
            Some(Checkpoint::Countdown { .. }) => {
                self.timers.cancel(TimerKind::CountdownTick);
                self.checkpoint = None;
            }
            Some(_) => return false,
        }
        self.user_paused = true;
        self.sync_pause();
        log::debug!("Paused at {}'", self.minute);
        true
    }

    /// Leave a user pause through a fresh countdown
    pub fn resume(&mut self) -> bool {
        if self.aborted || !self.user_paused {
            return false;
        }
        self.user_paused = false;
        self.start_countdown();
        log::debug!("Resumed at {}'", self.minute);
        true
    }

    /// Whether play is stopped in a way that allows leaving the match
    pub fn is_paused(&self) -> bool {
        self.user_paused
            || self.phase == MatchPhase::Penalties
            || matches!(
                self.checkpoint,
                Some(Checkpoint::PhaseBreak { .. } | Checkpoint::Shootout)
            )
    }

    /// Leave the match while paused. Pending timers are cleared and no
    /// outcome is ever produced.
    pub fn abort(&mut self) -> bool {
        if self.aborted || self.phase == MatchPhase::Finished || !self.is_paused() {
            return false;
        }
        self.timers.clear();
        self.goal_pending = None;
        self.checkpoint = None;
        self.aborted = true;
        self.sync_pause();
        log::info!(
            "Match aborted at {}': {} vs {}",
            self.minute,
            self.setup.team1.code,
            self.setup.team2.code
        );
        true
    }

    /// Human takes a penalty
    pub fn shoot(&mut self, lane: Lane, rng: &mut impl Rng) -> Option<Kick> {
        if self.phase != MatchPhase::Penalties {
            return None;
        }
        let kick = self.shootout.as_mut()?.player_shoot(lane, rng)?;
        self.after_kick(kick);
        Some(kick)
    }

    /// Human keeps goal against an AI penalty
    pub fn save(&mut self, lane: Lane, rng: &mut impl Rng) -> Option<Kick> {
        if self.phase != MatchPhase::Penalties {
            return None;
        }
        let kick = self.shootout.as_mut()?.player_save(lane, rng)?;
        self.after_kick(kick);
        Some(kick)
    }

    /// Final result once the match is finished
    pub fn outcome(&self) -> Option<MatchOutcome> {
        if self.phase != MatchPhase::Finished || self.aborted {
            return None;
        }
        let mut result = MatchResult::new(self.score.bottom, self.score.top);
        if let Some(shootout) = self.shootout.as_ref().and_then(|s| s.outcome()) {
            result = result.with_penalties(shootout.player_goals, shootout.ai_goals);
        }
        let winner = result.winner().map(|side| match side {
            ResultSide::Team1 => self.setup.team1.code.clone(),
            ResultSide::Team2 => self.setup.team2.code.clone(),
        });
        Some(MatchOutcome {
            context: self.setup.context,
            team1: self.setup.team1.code.clone(),
            team2: self.setup.team2.code.clone(),
            result,
            winner,
        })
    }

    fn after_kick(&mut self, kick: Kick) {
        self.events.push(MatchEvent::ShootoutKick { kick });
        if self.shootout.as_ref().is_some_and(|s| s.is_finished()) {
            self.finish();
        }
    }

    fn on_timer(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::CountdownTick => {
                let Some(Checkpoint::Countdown { remaining }) = self.checkpoint else {
                    return;
                };
                if remaining > 1 {
                    self.checkpoint = Some(Checkpoint::Countdown {
                        remaining: remaining - 1,
                    });
                    self.timers.schedule(TimerKind::CountdownTick, 1.0);
                    self.events.push(MatchEvent::Countdown(remaining - 1));
                } else {
                    self.checkpoint = None;
                    self.sync_pause();
                    self.events.push(MatchEvent::KickOff);
                }
            }
            TimerKind::GoalCelebration => {
                let Some(scorer) = self.goal_pending.take() else {
                    return;
                };
                self.physics.reset_positions(scorer);
                self.resets += 1;
                self.sync_pause();
                self.events.push(MatchEvent::KickOff);
            }
        }
    }

    fn on_goal(&mut self, scorer: Side) {
        if !self.phase.is_playing() {
            return;
        }
        self.score.add(scorer);
        self.goal_pending = Some(scorer);
        self.timers.schedule(TimerKind::GoalCelebration, GOAL_DELAY_SECS);
        self.sync_pause();
        log::debug!(
            "Goal {:?} at {}': {}-{}",
            scorer,
            self.minute,
            self.score.bottom,
            self.score.top
        );
        self.events.push(MatchEvent::Goal {
            scorer,
            score: self.score,
        });
    }

    /// Runs once per elapsed match minute
    fn check_period_end(&mut self) {
        let extra_time_end = GAME_DURATION + OVERTIME_DURATION;
        let match_end = GAME_DURATION + 2 * OVERTIME_DURATION;
        match self.phase {
            MatchPhase::FirstHalf if self.minute >= HALF_TIME => {
                self.phase = MatchPhase::HalfTime;
                self.raise(Checkpoint::PhaseBreak {
                    next: MatchPhase::SecondHalf,
                });
            }
            MatchPhase::SecondHalf if self.minute >= GAME_DURATION => {
                if self.score.is_level() && self.setup.context.allows_extra_time() {
                    self.raise(Checkpoint::PhaseBreak {
                        next: MatchPhase::ExtraTimeFirst,
                    });
                } else {
                    self.finish();
                }
            }
            MatchPhase::ExtraTimeFirst if self.minute >= extra_time_end => {
                self.phase = MatchPhase::ExtraTimeBreak;
                self.raise(Checkpoint::PhaseBreak {
                    next: MatchPhase::ExtraTimeSecond,
                });
            }
            MatchPhase::ExtraTimeSecond if self.minute >= match_end => {
                if self.score.is_level() {
                    self.raise(Checkpoint::Shootout);
                } else {
                    self.finish();
                }
            }
            _ => {}
        }
    }

    fn raise(&mut self, checkpoint: Checkpoint) {
        log::debug!("Checkpoint {:?} at {}'", checkpoint, self.minute);
        self.checkpoint = Some(checkpoint);
        self.sync_pause();
        self.events.push(MatchEvent::Checkpoint(checkpoint));
    }

    fn finish(&mut self) {
        self.phase = MatchPhase::Finished;
        self.timers.clear();
        self.goal_pending = None;
        self.raise(Checkpoint::MatchResult);
        if let Some(outcome) = self.outcome() {
            log::info!(
                "Match finished: {} {}-{} {}{}",
                outcome.team1,
                outcome.result.team1_score,
                outcome.result.team2_score,
                outcome.team2,
                outcome
                    .result
                    .penalties
                    .map(|(a, b)| format!(" ({a}-{b} pens)"))
                    .unwrap_or_default()
            );
        }
    }

    /// Reset for a phase start; direction alternates with the reset count
    fn kickoff(&mut self) {
        let toward = if self.resets % 2 == 1 {
            Side::Top
        } else {
            Side::Bottom
        };
        self.physics.reset_positions(toward);
        self.resets += 1;
    }

    fn start_countdown(&mut self) {
        self.checkpoint = Some(Checkpoint::Countdown {
            remaining: COUNTDOWN_SECS,
        });
        self.timers.schedule(TimerKind::CountdownTick, 1.0);
        self.sync_pause();
        self.events.push(MatchEvent::Countdown(COUNTDOWN_SECS));
    }

    fn sync_pause(&mut self) {
        self.physics.paused = !self.is_running();
    }
}
