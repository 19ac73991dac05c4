//! Data-driven game balance
//!
//! Every gameplay number the rules engine uses lives here so a host can ship
//! a JSON override without rebuilding. Missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Stage;

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Lives & combo ===
    pub starting_lives: u32,
    /// Bounces in a row that earn a life (0 disables)
    pub combo_threshold: u32,

    // === Difficulty ===
    pub gravity_base: f32,
    pub gravity_per_ten_score: f32,

    // === Stages ===
    pub stage_two_score: u64,
    pub stage_three_score: u64,

    // === Powerups ===
    pub slow_time_scale: f32,
    pub powerup_duration: f32,
    pub powerup_spawning: bool,
    pub powerup_spawn_min: f32,
    pub powerup_spawn_max: f32,
    pub powerup_y_min: f32,
    pub powerup_y_max: f32,

    // === Ball ===
    pub launch_impulse: f32,
    pub respawn_delay: f32,
    pub respawn_height: f32,
    pub respawn_impulse: f32,
    pub play_x_min: f32,
    pub play_x_max: f32,
    pub paddle_bounce_boost: f32,
    pub paddle_bounce_lift: f32,
    pub paddle_bounce_jitter: f32,
    pub ball_max_speed: f32,

    // === Monetization ===
    /// Show an interstitial (when loaded) on game over
    pub interstitial_on_game_over: bool,
    pub premium_product: String,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_lives: STARTING_LIVES,
            combo_threshold: COMBO_THRESHOLD,

            gravity_base: GRAVITY_BASE,
            gravity_per_ten_score: GRAVITY_PER_TEN_SCORE,

            stage_two_score: STAGE_TWO_SCORE,
            stage_three_score: STAGE_THREE_SCORE,

            slow_time_scale: SLOW_TIME_SCALE,
            powerup_duration: POWERUP_DURATION,
            powerup_spawning: true,
            powerup_spawn_min: POWERUP_SPAWN_MIN,
            powerup_spawn_max: POWERUP_SPAWN_MAX,
            powerup_y_min: POWERUP_Y_MIN,
            powerup_y_max: POWERUP_Y_MAX,

            launch_impulse: LAUNCH_IMPULSE,
            respawn_delay: RESPAWN_DELAY,
            respawn_height: RESPAWN_HEIGHT,
            respawn_impulse: RESPAWN_IMPULSE,
            play_x_min: PLAY_X_MIN,
            play_x_max: PLAY_X_MAX,
            paddle_bounce_boost: PADDLE_BOUNCE_BOOST,
            paddle_bounce_lift: PADDLE_BOUNCE_LIFT,
            paddle_bounce_jitter: PADDLE_BOUNCE_JITTER,
            ball_max_speed: BALL_MAX_SPEED,

            interstitial_on_game_over: true,
            premium_product: PREMIUM_MUSIC_PRODUCT.to_string(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load from an optional JSON string, falling back to defaults on error
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(tuning)) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Some(Err(e)) => {
                log::warn!("Invalid tuning JSON ({}), using defaults", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Repair values that would make the rules misbehave (inverted ranges,
    /// negative speeds, a slow-time scale outside (0, 1])
    pub fn sanitized(mut self) -> Self {
        if self.play_x_min > self.play_x_max {
            std::mem::swap(&mut self.play_x_min, &mut self.play_x_max);
        }
        if self.powerup_y_min > self.powerup_y_max {
            std::mem::swap(&mut self.powerup_y_min, &mut self.powerup_y_max);
        }
        if self.powerup_spawn_min > self.powerup_spawn_max {
            std::mem::swap(&mut self.powerup_spawn_min, &mut self.powerup_spawn_max);
        }
        if self.stage_two_score > self.stage_three_score {
            std::mem::swap(&mut self.stage_two_score, &mut self.stage_three_score);
        }
        self.powerup_spawn_min = self.powerup_spawn_min.max(0.1);
        self.powerup_spawn_max = self.powerup_spawn_max.max(self.powerup_spawn_min);
        self.paddle_bounce_jitter = self.paddle_bounce_jitter.abs();
        self.ball_max_speed = self.ball_max_speed.max(0.0);
        self.respawn_delay = self.respawn_delay.max(0.0);
        if !(self.slow_time_scale > 0.0 && self.slow_time_scale <= 1.0) {
            self.slow_time_scale = SLOW_TIME_SCALE;
        }
        self.starting_lives = self.starting_lives.max(1);
        self
    }

    /// Gravity multiplier for a score: base + floor(score / 10) * step
    pub fn gravity_multiplier(&self, score: u64) -> f32 {
        self.gravity_base + (score / 10) as f32 * self.gravity_per_ten_score
    }

    /// Score at which a stage unlocks
    pub fn stage_threshold(&self, stage: Stage) -> u64 {
        match stage {
            Stage::One => 0,
            Stage::Two => self.stage_two_score,
            Stage::Three => self.stage_three_score,
        }
    }
}
