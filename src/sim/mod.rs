//! Fixed-timestep physics module
//!
//! All on-field behavior lives here. This module must stay free of match
//! bookkeeping:
//! - Fixed timestep only
//! - Randomness only through an injected RNG
//! - Goals are reported as events, never counted

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Corner, EndLineResult, reflect_velocity};
pub use state::{
    Ball, BallState, Confetti, Control, Cosmetics, Effects, GoalShake, Paddle, PhysicsState,
    ScreenShake, field_center, goal_mouth,
};
pub use tick::{PhysicsEvent, TickInput, tick};
