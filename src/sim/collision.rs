//! Collision detection and response for the rectangular field
//!
//! The field is a portrait rectangle with 45° cuts in each corner and a goal
//! mouth centred on both end lines. Every response keeps the ball speed under
//! the shared cap.

use glam::Vec2;
use std::f32::consts::FRAC_1_SQRT_2;

use super::state::{Ball, Paddle, goal_mouth};
use crate::Side;
use crate::consts::*;

/// One of the four cut corners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Unit normal of the diagonal barrier, pointing into the field
    pub fn normal(self) -> Vec2 {
        let n = FRAC_1_SQRT_2;
        match self {
            Corner::TopLeft => Vec2::new(n, n),
            Corner::TopRight => Vec2::new(-n, n),
            Corner::BottomLeft => Vec2::new(n, -n),
            Corner::BottomRight => Vec2::new(-n, -n),
        }
    }
}

/// What happened at an end line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndLineResult {
    /// Ball crossed inside the goal mouth; `scorer` attacked that end
    Goal { scorer: Side },
    /// Ball bounced off the end line beside the goal defended by `side`
    Save { side: Side },
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Add `increment` to the ball speed, bounded by the global cap.
///
/// A stationary ball has no direction to scale and is left alone.
pub fn boost_speed(ball: &mut Ball, increment: f32) {
    let current = ball.vel.length();
    if current > 0.0 {
        let new_speed = (current + increment).min(BALL_MAX_SPEED);
        ball.vel *= new_speed / current;
        ball.speed = new_speed;
    }
}

/// Which corner exclusion zone (if any) the ball is in
pub fn corner_zone(pos: Vec2, radius: f32) -> Option<Corner> {
    let (w, h, b) = (FIELD_WIDTH, FIELD_HEIGHT, CORNER_BARRIER_SIZE);
    let reach = b + radius;

    if pos.x < b && pos.y < b && pos.x + pos.y < reach {
        Some(Corner::TopLeft)
    } else if pos.x > w - b && pos.y < b && (w - pos.x) + pos.y < reach {
        Some(Corner::TopRight)
    } else if pos.x < b && pos.y > h - b && pos.x + (h - pos.y) < reach {
        Some(Corner::BottomLeft)
    } else if pos.x > w - b && pos.y > h - b && (w - pos.x) + (h - pos.y) < reach {
        Some(Corner::BottomRight)
    } else {
        None
    }
}

/// Bounce off a corner barrier (swap/negate vx, vy) with a speed boost.
///
/// Returns the corner hit. A ball inside the zone that is already moving
/// away from the barrier is not a hit, so the side walls still apply.
pub fn resolve_corner(ball: &mut Ball) -> Option<Corner> {
    let corner = corner_zone(ball.pos, ball.radius)?;
    let normal = corner.normal();
    if ball.vel.dot(normal) >= 0.0 {
        return None;
    }
    ball.vel = reflect_velocity(ball.vel, normal);
    boost_speed(ball, WALL_BOOST);
    Some(corner)
}

/// Bounce off the left/right touchlines.
///
/// Wall friction reverses and damps spin. Returns true on a bounce.
pub fn resolve_side_walls(ball: &mut Ball) -> bool {
    let hit_left = ball.pos.x - ball.radius < 0.0 && ball.vel.x < 0.0;
    let hit_right = ball.pos.x + ball.radius > FIELD_WIDTH && ball.vel.x > 0.0;
    if !(hit_left || hit_right) {
        return false;
    }
    ball.vel.x = -ball.vel.x;
    boost_speed(ball, WALL_BOOST);
    ball.spin *= WALL_SPIN_DAMPING;
    true
}

/// Check the top and bottom end lines.
///
/// A crossing with x inside the goal mouth (inclusive) is a goal; anything
/// else clamps the ball back onto the field and reflects it.
pub fn resolve_end_lines(ball: &mut Ball) -> Option<EndLineResult> {
    let (goal_start, goal_end) = goal_mouth();
    let in_mouth = ball.pos.x >= goal_start && ball.pos.x <= goal_end;

    let crossed = if ball.pos.y - ball.radius < 0.0 {
        Side::Top
    } else if ball.pos.y + ball.radius > FIELD_HEIGHT {
        Side::Bottom
    } else {
        return None;
    };

    if in_mouth {
        return Some(EndLineResult::Goal {
            scorer: crossed.opponent(),
        });
    }

    match crossed {
        Side::Top => {
            ball.pos.y = ball.radius;
            ball.vel.y = ball.vel.y.abs();
        }
        Side::Bottom => {
            ball.pos.y = FIELD_HEIGHT - ball.radius;
            ball.vel.y = -ball.vel.y.abs();
        }
    }
    boost_speed(ball, WALL_BOOST);
    Some(EndLineResult::Save { side: crossed })
}

/// Signed hit offset in [-1, 1] if the ball is striking the paddle bar.
///
/// The ball must overlap the paddle line while travelling toward that
/// paddle's end, with its centre inside the bar's span.
pub fn paddle_contact(ball: &Ball, paddle: &Paddle) -> Option<f32> {
    let line = paddle.line_y();
    let (start_x, end_x) = paddle.span();
    let in_span = ball.pos.x > start_x && ball.pos.x < end_x;

    let crossing = match paddle.side {
        Side::Top => {
            ball.pos.y - ball.radius < line && ball.pos.y > paddle.pos.y && ball.vel.y < 0.0
        }
        Side::Bottom => {
            ball.pos.y + ball.radius > line && ball.pos.y < paddle.pos.y && ball.vel.y > 0.0
        }
    };

    if crossing && in_span {
        let offset = (ball.pos.x - paddle.pos.x) / (paddle.width / 2.0);
        Some(offset.clamp(-1.0, 1.0))
    } else {
        None
    }
}

/// Launch the ball off a paddle.
///
/// The hit offset maps to a deflection of up to ±60° from straight ahead,
/// speed grows by the paddle boost (capped), and the paddle's lateral
/// velocity becomes spin.
pub fn launch_from_paddle(ball: &mut Ball, paddle: &Paddle, offset: f32) {
    let angle = offset * MAX_BOUNCE_ANGLE;
    let direction = paddle.side.opponent().toward();
    let speed = (ball.speed + PADDLE_BOOST).min(BALL_MAX_SPEED);

    ball.speed = speed;
    ball.vel = Vec2::new(speed * angle.sin(), direction * speed * angle.cos());
    ball.spin = paddle.velocity_x * SPIN_FACTOR;
}
