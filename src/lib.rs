//! Keepy-Up - rules engine for a keep-the-ball-bouncing arcade game
//!
//! Core modules:
//! - `sim`: Game rules, timed effects, powerup spawning (host-independent)
//! - `highscores`: Single persisted best score
//! - `persistence`: Key/value preference storage backends
//! - `services`: Ad, in-app store and cheat collaborators
//! - `audio`: Sound effect and music track identifiers
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod services;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::{HighScore, RecordCheck};
pub use services::Services;
pub use sim::{GameEvent, GamePhase, GameRules, GameState, PowerupKind, Stage};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Lives at the start of a run
    pub const STARTING_LIVES: u32 = 3;
    /// Consecutive bounces that earn a bonus life (0 disables)
    pub const COMBO_THRESHOLD: u32 = 5;

    /// Gravity multiplier at score 0
    pub const GRAVITY_BASE: f32 = 1.5;
    /// Gravity multiplier added per full 10 points
    pub const GRAVITY_PER_TEN_SCORE: f32 = 0.15;
    /// World gravity the multiplier is applied to (units/s²)
    pub const EARTH_GRAVITY: f32 = 9.81;

    /// Score milestones for stage 2 and stage 3
    pub const STAGE_TWO_SCORE: u64 = 20;
    pub const STAGE_THREE_SCORE: u64 = 40;

    /// Time scale while SlowTime is active
    pub const SLOW_TIME_SCALE: f32 = 0.6;
    /// Default powerup duration (seconds)
    pub const POWERUP_DURATION: f32 = 6.0;

    /// Longest frame `tick` will advance (seconds); longer frames are clamped
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Delay before a dropped ball comes back (scaled seconds)
    pub const RESPAWN_DELAY: f32 = 1.0;
    /// Horizontal play range (respawn and powerup placement)
    pub const PLAY_X_MIN: f32 = -3.2;
    pub const PLAY_X_MAX: f32 = 3.2;
    /// Respawn height
    pub const RESPAWN_HEIGHT: f32 = 2.0;
    /// Upward impulse on respawn
    pub const RESPAWN_IMPULSE: f32 = 6.0;

    /// Ball defaults
    pub const LAUNCH_IMPULSE: f32 = 6.5;
    /// Vertical speed multiplier on paddle contact
    pub const PADDLE_BOUNCE_BOOST: f32 = 1.15;
    /// Extra vertical speed added on paddle contact
    pub const PADDLE_BOUNCE_LIFT: f32 = 0.5;
    /// Max random horizontal nudge on paddle contact
    pub const PADDLE_BOUNCE_JITTER: f32 = 0.8;
    pub const BALL_MAX_SPEED: f32 = 14.0;

    /// Powerup spawn interval bounds (scaled seconds)
    pub const POWERUP_SPAWN_MIN: f32 = 6.0;
    pub const POWERUP_SPAWN_MAX: f32 = 12.0;
    /// Powerup vertical placement range
    pub const POWERUP_Y_MIN: f32 = -1.0;
    pub const POWERUP_Y_MAX: f32 = 2.8;

    /// Non-consumable product that unlocks the premium soundtrack
    pub const PREMIUM_MUSIC_PRODUCT: &str = "premium_music";
}
