//! Periodic powerup spawning
//!
//! Every few seconds of game time a random powerup appears somewhere in the
//! court. The host places the pickup and calls `apply_powerup` on contact.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::PowerupKind;
use crate::tuning::Tuning;

/// A powerup the host should place
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerupSpawn {
    pub kind: PowerupKind,
    pub pos: Vec2,
    pub duration: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerupSpawner {
    /// Scaled seconds until the next spawn
    until_next: f32,
}

impl PowerupSpawner {
    pub fn new<R: Rng>(tuning: &Tuning, rng: &mut R) -> Self {
        Self {
            until_next: Self::interval(tuning, rng),
        }
    }

    fn interval<R: Rng>(tuning: &Tuning, rng: &mut R) -> f32 {
        rng.random_range(tuning.powerup_spawn_min..=tuning.powerup_spawn_max)
    }

    pub fn until_next(&self) -> f32 {
        self.until_next
    }

    /// Advance by `dt` scaled seconds. At most one spawn per call; after a
    /// spawn the countdown restarts, so a long pause never queues a backlog.
    pub fn advance<R: Rng>(&mut self, dt: f32, tuning: &Tuning, rng: &mut R) -> Option<PowerupSpawn> {
        if !tuning.powerup_spawning {
            return None;
        }

        self.until_next -= dt;
        if self.until_next > 0.0 {
            return None;
        }

        let kind = PowerupKind::ALL[rng.random_range(0..PowerupKind::ALL.len())];
        let pos = Vec2::new(
            rng.random_range(tuning.play_x_min..=tuning.play_x_max),
            rng.random_range(tuning.powerup_y_min..=tuning.powerup_y_max),
        );
        self.until_next = Self::interval(tuning, rng);
        Some(PowerupSpawn {
            kind,
            pos,
            duration: tuning.powerup_duration,
        })
    }
}
