//! Physics state and core simulation types
//!
//! Everything the engine mutates per tick lives in [`PhysicsState`]. Scores
//! are not kept here; the engine only reports goals.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Side;
use crate::consts::*;

/// Ball state - in play, or parked off the field after a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Ball is free-moving
    Live,
    /// A goal was scored; the ball waits off field for a kickoff reset
    OutOfPlay,
}

/// Trail point for ball rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub speed: f32,
}

/// Maximum number of trail points to store
pub const TRAIL_LENGTH: usize = 15;

/// Where a scored ball is parked until the kickoff reset
pub const OFF_FIELD: Vec2 = Vec2::new(-1000.0, FIELD_HEIGHT / 2.0);

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Added into vx every tick
    pub spin: f32,
    /// Visual rotation (radians)
    pub rotation: f32,
    /// Scalar speed, recomputed every live tick
    pub speed: f32,
    pub state: BallState,
    /// Trail history for rendering (newest first)
    #[serde(skip)]
    pub trail: Vec<TrailPoint>,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            pos: field_center(),
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            spin: 0.0,
            rotation: 0.0,
            speed: BALL_START_SPEED,
            state: BallState::Live,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }
}

impl Ball {
    /// Ball at the centre spot heading straight toward `toward`
    pub fn kickoff(toward: Side) -> Self {
        Self {
            vel: Vec2::new(0.0, toward.toward() * BALL_START_SPEED),
            ..Self::default()
        }
    }

    /// Record current position to trail (call each live tick)
    pub fn record_trail(&mut self) {
        self.trail.insert(
            0,
            TrailPoint {
                pos: self.pos,
                speed: self.speed,
            },
        );
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }

    /// Clear trail (on paddle hit / kickoff)
    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    pub fn is_live(&self) -> bool {
        self.state == BallState::Live
    }

    /// Park the ball off field after a goal
    pub fn take_out_of_play(&mut self) {
        self.pos = OFF_FIELD;
        self.vel = Vec2::ZERO;
        self.spin = 0.0;
        self.speed = 0.0;
        self.state = BallState::OutOfPlay;
        self.clear_trail();
    }
}

/// Who moves a paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Control {
    /// Follows a pointer with fixed easing
    Human,
    /// Tracks the ball with the given reaction coefficient
    Ai { reaction: f32 },
}

/// A player disc with its paddle bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub side: Side,
    pub pos: Vec2,
    pub radius: f32,
    pub width: f32,
    pub control: Control,
    /// Latest pointer target (human control only)
    pub target_x: f32,
    /// Hit flash, 1.0 on contact decaying to 0
    pub hit_animation: f32,
    pub prev_x: f32,
    /// Frame-to-frame x delta, transferred to the ball as spin
    pub velocity_x: f32,
}

impl Paddle {
    pub fn new(side: Side, control: Control) -> Self {
        let y = match side {
            Side::Bottom => FIELD_HEIGHT - PLAYER_RADIUS * 3.0,
            Side::Top => PLAYER_RADIUS * 3.0,
        };
        let x = FIELD_WIDTH / 2.0;
        Self {
            side,
            pos: Vec2::new(x, y),
            radius: PLAYER_RADIUS,
            width: PADDLE_WIDTH,
            control,
            target_x: x,
            hit_animation: 0.0,
            prev_x: x,
            velocity_x: 0.0,
        }
    }

    /// y of the paddle bar's contact line
    pub fn line_y(&self) -> f32 {
        match self.side {
            Side::Top => self.pos.y + self.radius - PADDLE_HEIGHT / 2.0,
            Side::Bottom => self.pos.y - self.radius + PADDLE_HEIGHT / 2.0,
        }
    }

    /// Left and right x of the paddle bar
    pub fn span(&self) -> (f32, f32) {
        (self.pos.x - self.width / 2.0, self.pos.x + self.width / 2.0)
    }

    /// Ease toward `target_x`, clamp to the field, update frame velocity
    pub fn move_toward(&mut self, target_x: f32, factor: f32) {
        self.pos.x += (target_x - self.pos.x) * factor;
        let half = self.width / 2.0;
        self.pos.x = self.pos.x.clamp(half, FIELD_WIDTH - half);
        self.velocity_x = self.pos.x - self.prev_x;
        self.prev_x = self.pos.x;
    }

    /// Start the hit flash
    pub fn trigger_hit(&mut self) {
        self.hit_animation = 1.0;
    }

    pub fn decay_hit(&mut self) {
        if self.hit_animation > 0.0 {
            self.hit_animation = (self.hit_animation - HIT_FLASH_DECAY).max(0.0);
        }
    }
}

/// Net wobble on the goal that was just scored in
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GoalShake {
    pub side: Option<Side>,
    /// 1.0 on the goal, decays to 0
    pub progress: f32,
}

/// Time-limited camera shake
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScreenShake {
    pub magnitude: f32,
    pub ticks_left: u32,
}

impl ScreenShake {
    pub fn is_active(&self) -> bool {
        self.ticks_left > 0
    }
}

/// A confetti particle (not gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Confetti {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Hue in degrees
    pub hue: f32,
    pub opacity: f32,
}

/// Particles spawned per goal
pub const CONFETTI_BURST: usize = 500;

/// Cosmetic state that keeps decaying while paused
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Effects {
    pub goal_shake: GoalShake,
    pub screen_shake: ScreenShake,
    #[serde(skip)]
    pub confetti: Vec<Confetti>,
}

/// Which cosmetic effects the engine should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cosmetics {
    pub confetti: bool,
    pub screen_shake: bool,
}

impl Default for Cosmetics {
    fn default() -> Self {
        Self {
            confetti: true,
            screen_shake: true,
        }
    }
}

/// Complete physics state for one live match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsState {
    pub ball: Ball,
    /// Player 1 (local player)
    pub bottom: Paddle,
    /// Player 2 (AI or second local player)
    pub top: Paddle,
    pub effects: Effects,
    pub cosmetics: Cosmetics,
    /// Checked at the top of every tick
    pub paused: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl PhysicsState {
    pub fn new(bottom: Control, top: Control) -> Self {
        Self {
            ball: Ball::default(),
            bottom: Paddle::new(Side::Bottom, bottom),
            top: Paddle::new(Side::Top, top),
            effects: Effects::default(),
            cosmetics: Cosmetics::default(),
            paused: true,
            time_ticks: 0,
        }
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Bottom => &self.bottom,
            Side::Top => &self.top,
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Bottom => &mut self.bottom,
            Side::Top => &mut self.top,
        }
    }

    /// Put paddles and ball back on their kickoff spots, ball heading
    /// toward `toward`. Cosmetic effects are left to decay.
    pub fn reset_positions(&mut self, toward: Side) {
        self.bottom = Paddle::new(Side::Bottom, self.bottom.control);
        self.top = Paddle::new(Side::Top, self.top.control);
        self.ball = Ball::kickoff(toward);
    }
}

/// Centre spot
#[inline]
pub fn field_center() -> Vec2 {
    Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0)
}

/// Horizontal extent of the goal mouth (same at both ends)
#[inline]
pub fn goal_mouth() -> (f32, f32) {
    let start = FIELD_WIDTH / 2.0 - GOAL_WIDTH / 2.0;
    (start, start + GOAL_WIDTH)
}
