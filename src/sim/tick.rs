//! Fixed timestep simulation tick
//!
//! One call per animation frame. Collisions resolve in a fixed precedence:
//! corners, side walls, end lines (goals), paddles.

use glam::Vec2;
use rand::Rng;

use super::collision::{
    Corner, EndLineResult, launch_from_paddle, paddle_contact, resolve_corner, resolve_end_lines,
    resolve_side_walls,
};
use super::state::{CONFETTI_BURST, Confetti, Control, GoalShake, PhysicsState, ScreenShake};
use crate::consts::*;
use crate::{Side, with_speed};

/// Reaction coefficient used when the autopilot drives the bottom paddle
pub const AUTOPILOT_REACTION: f32 = 0.12;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x for the bottom paddle (from mouse/touch position)
    pub bottom_target_x: Option<f32>,
    /// Pointer x for the top paddle when it is human-controlled
    pub top_target_x: Option<f32>,
    /// Idle/demo mode - the bottom paddle plays itself
    pub idle_mode: bool,
}

impl TickInput {
    /// Route a pointer to a paddle by splitting the field at `split_ratio`.
    ///
    /// Points below the split drive the bottom paddle; points above drive the
    /// top paddle only when it is human-controlled.
    pub fn route_pointer(&mut self, x: f32, y: f32, split_ratio: f32, top_is_human: bool) {
        if y > FIELD_HEIGHT * split_ratio {
            self.bottom_target_x = Some(x);
        } else if top_is_human {
            self.top_target_x = Some(x);
        }
    }
}

/// Things that happened during a tick, for the match and for audio/render
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicsEvent {
    /// Goal scored by `scorer`; the ball is now out of play
    Goal { scorer: Side },
    PaddleHit { side: Side, speed: f32 },
    WallBounce,
    CornerBounce(Corner),
    /// Ball bounced off the end line beside the goal of `side`
    EndLineSave { side: Side },
}

/// Advance the physics by one fixed timestep.
///
/// When paused only cosmetic state decays; ball and paddles stay frozen.
pub fn tick(state: &mut PhysicsState, input: &TickInput, rng: &mut impl Rng) -> Vec<PhysicsEvent> {
    decay_effects(state);
    state.bottom.decay_hit();
    state.top.decay_hit();

    if state.paused {
        return Vec::new();
    }

    state.time_ticks += 1;
    let mut events = Vec::new();

    if state.ball.is_live() {
        integrate_ball(state);
    }
    move_paddles(state, input);

    if !state.ball.is_live() {
        return events;
    }

    // --- CORNERS, then SIDE WALLS ---
    if let Some(corner) = resolve_corner(&mut state.ball) {
        events.push(PhysicsEvent::CornerBounce(corner));
    } else if resolve_side_walls(&mut state.ball) {
        events.push(PhysicsEvent::WallBounce);
    }

    // --- END LINES / GOALS ---
    match resolve_end_lines(&mut state.ball) {
        Some(EndLineResult::Goal { scorer }) => {
            score_goal(state, scorer, rng);
            events.push(PhysicsEvent::Goal { scorer });
            return events;
        }
        Some(EndLineResult::Save { side }) => {
            events.push(PhysicsEvent::EndLineSave { side });
        }
        None => {}
    }

    // --- PADDLES ---
    for side in [Side::Bottom, Side::Top] {
        let paddle = state.paddle(side);
        if let Some(offset) = paddle_contact(&state.ball, paddle) {
            let paddle = paddle.clone();
            launch_from_paddle(&mut state.ball, &paddle, offset);
            state.paddle_mut(side).trigger_hit();
            state.ball.clear_trail();

            let speed = state.ball.speed;
            if speed > HIGH_SPEED_THRESHOLD && state.cosmetics.screen_shake {
                state.effects.screen_shake = ScreenShake {
                    magnitude: SCREEN_SHAKE_MAGNITUDE,
                    ticks_left: SCREEN_SHAKE_TICKS,
                };
            }
            events.push(PhysicsEvent::PaddleHit { side, speed });
        }
    }

    events
}

/// Spin, drag, speed window, movement and rotation
fn integrate_ball(state: &mut PhysicsState) {
    let ball = &mut state.ball;
    ball.record_trail();

    ball.vel.x += ball.spin;
    ball.vel *= DRAG;
    ball.spin *= SPIN_DRAG;

    // Restore min <= |v| <= max (a zero vector has no direction to keep)
    let speed = ball.vel.length();
    if speed > 0.0 && speed < BALL_MIN_SPEED {
        ball.vel = with_speed(ball.vel, BALL_MIN_SPEED);
    } else if speed > BALL_MAX_SPEED {
        ball.vel = with_speed(ball.vel, BALL_MAX_SPEED);
    }
    ball.speed = ball.vel.length();

    ball.pos += ball.vel;
    ball.rotation += ball.vel.x * ROTATION_FACTOR;
}

/// Ease every paddle toward its target for this tick
fn move_paddles(state: &mut PhysicsState, input: &TickInput) {
    let ball_x = state.ball.pos.x;
    let ball_vy = state.ball.vel.y;
    let center = FIELD_WIDTH / 2.0;

    for side in [Side::Bottom, Side::Top] {
        let pointer = match side {
            Side::Bottom => input.bottom_target_x,
            Side::Top => input.top_target_x,
        };
        let autopilot = side == Side::Bottom && input.idle_mode;
        let paddle = state.paddle_mut(side);

        // Track the ball while it heads for our goal, otherwise recenter
        let tracking_target = if ball_vy * side.toward() > 0.0 {
            ball_x
        } else {
            center
        };

        let control = paddle.control;
        let (target, factor) = match control {
            _ if autopilot => (tracking_target, AUTOPILOT_REACTION),
            Control::Ai { reaction } => (tracking_target, reaction),
            Control::Human => {
                if let Some(x) = pointer {
                    paddle.target_x = x;
                }
                (paddle.target_x, PLAYER_SMOOTHING_FACTOR)
            }
        };
        paddle.move_toward(target, factor);
    }
}

/// Goal bookkeeping inside the engine: effects and parking the ball
fn score_goal(state: &mut PhysicsState, scorer: Side, rng: &mut impl Rng) {
    // The goal that was scored in is the one the conceding side defends
    let net = scorer.opponent();
    state.effects.goal_shake = GoalShake {
        side: Some(net),
        progress: 1.0,
    };

    if state.cosmetics.confetti {
        let origin = match net {
            Side::Top => Vec2::new(FIELD_WIDTH / 2.0, 0.0),
            Side::Bottom => Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT),
        };
        spawn_confetti(state, origin, rng);
    }

    state.ball.take_out_of_play();
}

fn spawn_confetti(state: &mut PhysicsState, origin: Vec2, rng: &mut impl Rng) {
    state.effects.confetti.reserve(CONFETTI_BURST);
    for _ in 0..CONFETTI_BURST {
        state.effects.confetti.push(Confetti {
            pos: origin,
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 50.0,
                (rng.random::<f32>() - 0.7) * 50.0,
            ),
            radius: rng.random::<f32>() * 4.0 + 2.0,
            hue: rng.random::<f32>() * 360.0,
            opacity: 1.0,
        });
    }
}

/// Confetti, goal shake and screen shake decay whether or not play is live
fn decay_effects(state: &mut PhysicsState) {
    let effects = &mut state.effects;

    for particle in effects.confetti.iter_mut() {
        particle.pos += particle.vel;
        particle.vel.y += 0.4;
        particle.vel.x *= 0.99;
        particle.opacity -= 0.008;
    }
    effects.confetti.retain(|p| p.opacity > 0.0);

    if effects.goal_shake.progress > 0.0 {
        effects.goal_shake.progress = (effects.goal_shake.progress - GOAL_SHAKE_DECAY).max(0.0);
    } else {
        effects.goal_shake.side = None;
    }

    if effects.screen_shake.is_active() {
        effects.screen_shake.ticks_left -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BallState, Paddle, goal_mouth};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn live_state() -> PhysicsState {
        let mut state = PhysicsState::new(Control::Human, Control::Ai { reaction: 0.1 });
        state.paused = false;
        state
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_slow_ball_rescaled_to_min_speed() {
        let mut state = live_state();
        state.ball.vel = Vec2::new(0.3, -0.4);
        let dir_before = state.ball.vel.normalize();

        tick(&mut state, &TickInput::default(), &mut rng());

        assert!(state.ball.vel.length() >= BALL_MIN_SPEED - 1e-4);
        let dir_after = state.ball.vel.normalize();
        assert!((dir_after - dir_before).length() < 1e-4);
    }

    #[test]
    fn test_zero_velocity_not_rescaled() {
        let mut state = live_state();
        state.ball.vel = Vec2::ZERO;
        tick(&mut state, &TickInput::default(), &mut rng());
        assert_eq!(state.ball.vel, Vec2::ZERO);
        assert!(state.ball.speed == 0.0);
    }

    #[test]
    fn test_fast_ball_capped() {
        let mut state = live_state();
        state.ball.vel = Vec2::new(0.0, -40.0);
        tick(&mut state, &TickInput::default(), &mut rng());
        assert!(state.ball.speed <= BALL_MAX_SPEED + 1e-4);
    }

    #[test]
    fn test_spin_bends_ball() {
        let mut state = live_state();
        state.ball.vel = Vec2::new(0.0, -7.0);
        state.ball.spin = 0.5;
        tick(&mut state, &TickInput::default(), &mut rng());
        assert!(state.ball.vel.x > 0.0);
        assert!(state.ball.spin < 0.5);
        assert!(state.ball.rotation > 0.0);
    }

    #[test]
    fn test_paused_freezes_physics_but_decays_effects() {
        let mut state = live_state();
        state.ball.vel = Vec2::new(2.0, -7.0);
        state.bottom.hit_animation = 1.0;
        state.effects.goal_shake = GoalShake {
            side: Some(Side::Top),
            progress: 1.0,
        };
        state.effects.screen_shake = ScreenShake {
            magnitude: 5.0,
            ticks_left: 3,
        };
        state.paused = true;
        let pos = state.ball.pos;

        let events = tick(&mut state, &TickInput::default(), &mut rng());

        assert!(events.is_empty());
        assert_eq!(state.ball.pos, pos);
        assert_eq!(state.time_ticks, 0);
        assert!(state.bottom.hit_animation < 1.0);
        assert!(state.effects.goal_shake.progress < 1.0);
        assert_eq!(state.effects.screen_shake.ticks_left, 2);
    }

    #[test]
    fn test_goal_fires_once_per_crossing() {
        let mut state = live_state();
        let (start, end) = goal_mouth();
        state.ball.pos = Vec2::new((start + end) / 2.0, BALL_RADIUS + 2.0);
        state.ball.vel = Vec2::new(0.0, -7.0);
        // Keep the top paddle out of the way
        state.top.pos.x = PADDLE_WIDTH / 2.0;
        state.top.control = Control::Human;
        state.top.target_x = PADDLE_WIDTH / 2.0;

        let mut goals = 0;
        let mut rng = rng();
        for _ in 0..10 {
            let events = tick(&mut state, &TickInput::default(), &mut rng);
            goals += events
                .iter()
                .filter(|e| **e == PhysicsEvent::Goal { scorer: Side::Bottom })
                .count();
        }

        assert_eq!(goals, 1);
        assert_eq!(state.ball.state, BallState::OutOfPlay);
        assert_eq!(state.effects.goal_shake.side, Some(Side::Top));
        assert!(!state.effects.confetti.is_empty());
    }

    #[test]
    fn test_crossing_outside_mouth_bounces() {
        let mut state = live_state();
        let (start, _) = goal_mouth();
        state.ball.pos = Vec2::new(start - 20.0, BALL_RADIUS + 2.0);
        state.ball.vel = Vec2::new(0.0, -7.0);

        let events = tick(&mut state, &TickInput::default(), &mut rng());

        assert!(events.contains(&PhysicsEvent::EndLineSave { side: Side::Top }));
        assert!(!events.iter().any(|e| matches!(e, PhysicsEvent::Goal { .. })));
        assert!(state.ball.vel.y > 0.0);
    }

    #[test]
    fn test_paddle_hit_speed_and_angle_bounds() {
        let mut rng = rng();
        for offset_px in [-30.0_f32, -10.0, 0.0, 12.0, 34.0] {
            let mut state = live_state();
            let paddle = Paddle::new(Side::Bottom, Control::Human);
            state.ball.pos = Vec2::new(paddle.pos.x + offset_px, paddle.line_y() - BALL_RADIUS - 4.0);
            state.ball.vel = Vec2::new(0.0, 7.0);

            let events = tick(&mut state, &TickInput::default(), &mut rng);
            let hit = events
                .iter()
                .find(|e| matches!(e, PhysicsEvent::PaddleHit { side: Side::Bottom, .. }));
            assert!(hit.is_some(), "offset {offset_px} should hit");

            // Speed entering the hit is 7 * drag
            let before = 7.0 * DRAG;
            let after = state.ball.vel.length();
            assert!(after >= before - 1e-4);
            assert!(after <= (before + PADDLE_BOOST).min(BALL_MAX_SPEED) + 1e-4);

            let angle = state.ball.vel.x.atan2(-state.ball.vel.y);
            assert!(angle.abs() <= MAX_BOUNCE_ANGLE + 1e-4);
            assert!(state.ball.vel.y < 0.0);
            assert_eq!(state.bottom.hit_animation, 1.0);
            assert!(state.ball.trail.is_empty());
        }
    }

    #[test]
    fn test_fast_paddle_hit_shakes_screen() {
        let mut state = live_state();
        let paddle = Paddle::new(Side::Bottom, Control::Human);
        state.ball.pos = Vec2::new(paddle.pos.x, paddle.line_y() - BALL_RADIUS - 4.0);
        state.ball.vel = Vec2::new(0.0, 12.0);
        tick(&mut state, &TickInput::default(), &mut rng());
        assert!(state.effects.screen_shake.is_active());
    }

    #[test]
    fn test_paddle_motion_becomes_spin() {
        let mut state = live_state();
        state.ball.pos = Vec2::new(state.bottom.pos.x, state.bottom.line_y() - BALL_RADIUS - 4.0);
        state.ball.vel = Vec2::new(0.0, 7.0);
        let input = TickInput {
            bottom_target_x: Some(state.bottom.pos.x + 20.0),
            ..Default::default()
        };
        tick(&mut state, &input, &mut rng());
        assert!(state.bottom.velocity_x > 0.0);
        assert!((state.ball.spin - state.bottom.velocity_x * SPIN_FACTOR).abs() < 1e-5);
    }

    #[test]
    fn test_ai_tracks_ball_toward_its_goal() {
        let mut state = live_state();
        state.ball.pos = Vec2::new(300.0, 320.0);
        state.ball.vel = Vec2::new(0.0, -7.0);
        let start = state.top.pos.x;
        tick(&mut state, &TickInput::default(), &mut rng());
        assert!(state.top.pos.x > start);

        // Ball heading away: recenter
        state.top.pos.x = 300.0;
        state.top.prev_x = 300.0;
        state.ball.pos = Vec2::new(300.0, 320.0);
        state.ball.vel = Vec2::new(0.0, 7.0);
        tick(&mut state, &TickInput::default(), &mut rng());
        assert!(state.top.pos.x < 300.0);
    }

    #[test]
    fn test_idle_mode_drives_bottom_paddle() {
        let mut state = live_state();
        state.ball.pos = Vec2::new(80.0, 400.0);
        state.ball.vel = Vec2::new(0.0, 7.0);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let start = state.bottom.pos.x;
        tick(&mut state, &input, &mut rng());
        assert!(state.bottom.pos.x < start);
    }

    #[test]
    fn test_route_pointer_split() {
        let mut input = TickInput::default();
        input.route_pointer(120.0, FIELD_HEIGHT * 0.8, 0.5, false);
        input.route_pointer(300.0, FIELD_HEIGHT * 0.2, 0.5, false);
        assert_eq!(input.bottom_target_x, Some(120.0));
        assert_eq!(input.top_target_x, None);

        input.route_pointer(300.0, FIELD_HEIGHT * 0.2, 0.5, true);
        assert_eq!(input.top_target_x, Some(300.0));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed and inputs produce identical results
        let mut state1 = live_state();
        let mut state2 = live_state();
        state1.ball.vel = Vec2::new(3.0, -6.0);
        state2.ball.vel = Vec2::new(3.0, -6.0);
        let mut rng1 = Pcg32::seed_from_u64(99);
        let mut rng2 = Pcg32::seed_from_u64(99);

        let inputs = [
            TickInput {
                bottom_target_x: Some(150.0),
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                bottom_target_x: Some(260.0),
                ..Default::default()
            },
        ];

        for _ in 0..200 {
            for input in &inputs {
                tick(&mut state1, input, &mut rng1);
                tick(&mut state2, input, &mut rng2);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.ball.pos, state2.ball.pos);
        assert_eq!(state1.bottom.pos, state2.bottom.pos);
    }

    #[test]
    fn test_speed_window_holds_over_long_run() {
        let mut state = live_state();
        state.ball.vel = Vec2::new(4.0, -6.0);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut rng = rng();
        for _ in 0..5000 {
            let events = tick(&mut state, &input, &mut rng);
            if events.iter().any(|e| matches!(e, PhysicsEvent::Goal { .. })) {
                let toward = if state.time_ticks % 2 == 0 { Side::Top } else { Side::Bottom };
                state.reset_positions(toward);
            }
            assert!(state.ball.vel.length() <= BALL_MAX_SPEED + 1e-3);
        }
    }

    #[test]
    fn test_ball_leaving_corner_still_bounces_off_side_wall() {
        let mut state = live_state();
        state.ball.pos = Vec2::new(10.0, 10.0);
        state.ball.vel = Vec2::new(-2.2, 3.3);
        let mut rng = rng();

        let mut wall_bounces = 0;
        for _ in 0..12 {
            let events = tick(&mut state, &TickInput::default(), &mut rng);
            assert!(!events.iter().any(|e| matches!(e, PhysicsEvent::CornerBounce(_))));
            wall_bounces += events
                .iter()
                .filter(|e| matches!(e, PhysicsEvent::WallBounce))
                .count();
            assert!(state.ball.pos.x > 0.0);
        }
        assert_eq!(wall_bounces, 1);
        assert!(state.ball.vel.x > 0.0);
    }
}
