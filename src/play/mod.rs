//! Playing a single match: the lifecycle state machine and the penalty
//! shootout that settles level knockout games.

pub mod match_state;
pub mod shootout;
pub mod timers;

pub use match_state::{
    Checkpoint, Match, MatchContext, MatchEvent, MatchOutcome, MatchPhase, MatchSetup, Opponent,
    Score,
};
pub use shootout::{Kick, Kicker, Lane, PenaltyShootout, ShootoutOutcome, ShootoutTurn};
