//! Finger Football - a two-paddle football arcade game
//!
//! Core modules:
//! - `sim`: Fixed-timestep physics (ball, paddles, walls, corners, goals)
//! - `play`: Match state machine and penalty shootout
//! - `competition`: Fixtures, league table, knockout bracket
//! - `hub`: League/tournament progression across sessions
//! - `persistence`: Snapshot store with versioned envelopes
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Difficulty-driven game balance

pub mod competition;
pub mod hub;
pub mod persistence;
pub mod platform;
pub mod play;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use competition::{MatchResult, Team};
pub use settings::Settings;
pub use tuning::Difficulty;

use glam::Vec2;

/// Game configuration constants
///
/// Distances are in field units (the field is 400 wide), velocities in field
/// units per physics tick.
pub mod consts {
    /// Fixed simulation timestep (one tick per animation frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the accumulator will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Field dimensions (portrait, 1:1.6)
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 640.0;
    /// Goal-mouth width, centered on each end line
    pub const GOAL_WIDTH: f32 = 180.0;
    /// Leg length of the 45° cut in each corner
    pub const CORNER_BARRIER_SIZE: f32 = 30.0;

    /// Player disc and paddle bar
    pub const PLAYER_RADIUS: f32 = 18.0;
    pub const PADDLE_WIDTH: f32 = 70.0;
    pub const PADDLE_HEIGHT: f32 = 8.0;
    /// Pointer easing for human-controlled paddles
    pub const PLAYER_SMOOTHING_FACTOR: f32 = 0.4;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_START_SPEED: f32 = 7.0;
    /// Floor below which the ball is rescaled (prevents stalls)
    pub const BALL_MIN_SPEED: f32 = 4.0;
    /// Single cap shared by every speed boost
    pub const BALL_MAX_SPEED: f32 = 18.0;
    /// Speed added by a wall, corner or end-line bounce
    pub const WALL_BOOST: f32 = 1.0;
    /// Speed added by a paddle hit
    pub const PADDLE_BOOST: f32 = 1.2;
    /// Max launch deflection from straight ahead (60°)
    pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

    /// Per-tick multiplicative drag
    pub const DRAG: f32 = 0.998;
    pub const SPIN_DRAG: f32 = 0.97;
    /// Paddle velocity to spin transfer
    pub const SPIN_FACTOR: f32 = 0.05;
    /// Wall friction reverses and damps spin
    pub const WALL_SPIN_DAMPING: f32 = -0.5;
    /// Visual rotation per unit of vx
    pub const ROTATION_FACTOR: f32 = 0.05;

    /// Screen shake when a paddle hit exceeds this speed
    pub const HIGH_SPEED_THRESHOLD: f32 = 11.0;
    pub const SCREEN_SHAKE_MAGNITUDE: f32 = 5.0;
    pub const SCREEN_SHAKE_TICKS: u32 = 12;

    /// Decay rates per tick
    pub const HIT_FLASH_DECAY: f32 = 0.05;
    pub const GOAL_SHAKE_DECAY: f32 = 0.02;

    /// Match clock (match minutes, one per real second)
    pub const HALF_TIME: u32 = 45;
    pub const GAME_DURATION: u32 = 90;
    pub const OVERTIME_DURATION: u32 = 15;
    /// Countdown before every (re)start, in seconds
    pub const COUNTDOWN_SECS: u32 = 3;
    /// Goal celebration before the kickoff reset, in seconds
    pub const GOAL_DELAY_SECS: f32 = 3.0;

    /// Penalty shootout
    pub const REGULATION_KICKS: u32 = 5;
}

/// Which end of the field a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Side {
    /// Bottom paddle (player 1, the local player)
    Bottom,
    /// Top paddle (player 2, AI or second local player)
    Top,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Bottom => Side::Top,
            Side::Top => Side::Bottom,
        }
    }

    /// Vertical direction of a ball travelling toward this side
    #[inline]
    pub fn toward(self) -> f32 {
        match self {
            Side::Bottom => 1.0,
            Side::Top => -1.0,
        }
    }
}

/// Rescale a velocity to `speed`, keeping its direction.
///
/// Zero-length vectors are returned unchanged.
#[inline]
pub fn with_speed(vel: Vec2, speed: f32) -> Vec2 {
    let len = vel.length();
    if len > 0.0 { vel * (speed / len) } else { vel }
}
