//! One-shot timers driven by the match clock

use serde::{Deserialize, Serialize};

/// Slack for float accumulation when a timer is fed many small frames
pub const TIMER_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// One second of the pre-kickoff countdown elapsed
    CountdownTick,
    /// Goal celebration over, time for the kickoff reset
    GoalCelebration,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Timer {
    kind: TimerKind,
    remaining: f32,
}

/// Pending one-shot timers. At most one timer per kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    pending: Vec<Timer>,
}

impl Timers {
    /// Arm `kind` to fire after `secs`, replacing any pending one
    pub fn schedule(&mut self, kind: TimerKind, secs: f32) {
        self.cancel(kind);
        self.pending.push(Timer {
            kind,
            remaining: secs,
        });
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.pending.retain(|t| t.kind != kind);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|t| t.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Count every timer down by `dt` and return the ones that fired,
    /// in scheduling order. Fired timers are removed.
    pub fn advance(&mut self, dt: f32) -> Vec<TimerKind> {
        let mut fired = Vec::new();
        for timer in &mut self.pending {
            timer.remaining -= dt;
            if timer.remaining <= TIMER_EPSILON {
                fired.push(timer.kind);
            }
        }
        self.pending.retain(|t| t.remaining > TIMER_EPSILON);
        fired
    }
}
