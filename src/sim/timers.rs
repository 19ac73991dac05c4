//! Cooperative timers
//!
//! Pending actions with a countdown, advanced once per frame. Each timer runs
//! on one of two clocks: scaled game time (stops while frozen, slows under
//! SlowTime) or real time. Timers always run to completion.

use serde::{Deserialize, Serialize};

use super::state::{PowerupKind, TimedEffect};

/// Which time a timer counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clock {
    Scaled,
    Real,
}

/// What happens when a timer elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerAction {
    EffectExpired(PowerupKind),
    Respawn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer {
    action: TimerAction,
    clock: Clock,
    remaining: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, action: TimerAction, clock: Clock, delay: f32) {
        self.timers.push(Timer {
            action,
            clock,
            remaining: delay.max(0.0),
        });
    }

    /// Advance both clocks and return the actions that elapsed, earliest
    /// deadline first (ties keep scheduling order)
    pub fn advance(&mut self, scaled_dt: f32, real_dt: f32) -> Vec<TimerAction> {
        for timer in &mut self.timers {
            timer.remaining -= match timer.clock {
                Clock::Scaled => scaled_dt,
                Clock::Real => real_dt,
            };
        }

        let mut fired: Vec<Timer> = Vec::new();
        self.timers.retain(|t| {
            if t.remaining <= 0.0 {
                fired.push(t.clone());
                false
            } else {
                true
            }
        });
        fired.sort_by(|a, b| {
            a.remaining
                .partial_cmp(&b.remaining)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        fired.into_iter().map(|t| t.action).collect()
    }

    /// Whether any timer with this action is still pending
    pub fn is_pending(&self, action: TimerAction) -> bool {
        self.timers.iter().any(|t| t.action == action)
    }

    /// Pending powerup expiries
    pub fn active_effects(&self) -> Vec<TimedEffect> {
        self.timers
            .iter()
            .filter_map(|t| match t.action {
                TimerAction::EffectExpired(kind) => Some(TimedEffect {
                    kind,
                    remaining: t.remaining,
                }),
                TimerAction::Respawn => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Drop everything (full session reset only)
    pub fn clear(&mut self) {
        self.timers.clear();
    }
}
