//! Game state and event types
//!
//! Everything the rules mutate lives in `GameState`. Hosts observe changes
//! through `GameEvent`s rather than by diffing the state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::{MusicTrack, SoundEffect};
use crate::highscores::{HighScore, RecordCheck};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Out of lives; time frozen until revive or restart
    GameOver,
}

/// Visual/audio tier unlocked by score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    One,
    Two,
    Three,
}

impl Stage {
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::One => Some(Stage::Two),
            Stage::Two => Some(Stage::Three),
            Stage::Three => None,
        }
    }
}

/// Which sprite a stage change swaps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteTarget {
    Ball,
    Court,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    DoubleScore,
    SlowTime,
    Shield,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [
        PowerupKind::DoubleScore,
        PowerupKind::SlowTime,
        PowerupKind::Shield,
    ];
}

/// A pending powerup expiry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedEffect {
    pub kind: PowerupKind,
    /// Seconds left (scaled or real, depending on the kind)
    pub remaining: f32,
}

/// One-shot visual effects the host spawns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Drop,
    ComboReward,
}

/// HUD display strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: String,
    pub lives: String,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score.to_string(),
            lives: format!("x{}", state.lives),
        }
    }
}

/// Everything the engine tells its host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    HudUpdated(Hud),
    /// New multiplier for world gravity
    GravityChanged { multiplier: f32 },
    /// New global time scale (0 while game over)
    TimeScaleChanged { scale: f32 },
    PlaySound(SoundEffect),
    SwapMusic(MusicTrack),
    SwapSprite { target: SpriteTarget, stage: Stage },
    StageReached(Stage),
    SpawnEffect { kind: EffectKind, pos: Vec2 },
    /// Combo threshold reached; carries lives after the bonus
    ComboReward { lives: u32 },
    /// Initial kick at the start of a run
    BallLaunched { impulse: Vec2 },
    /// Ball left play; hide it until respawn
    BallDeactivated,
    RespawnBall { pos: Vec2, impulse: Vec2 },
    PowerupSpawned { kind: PowerupKind, pos: Vec2, duration: f32 },
    PowerupActivated { kind: PowerupKind, duration: f32 },
    PowerupExpired(PowerupKind),
    ShieldConsumed,
    HighScoreChecked(RecordCheck),
    /// Show/hide the new-record celebration
    Celebration(bool),
    GameOver { final_score: u64, record_text: String },
    Revived,
    /// Rewarded ad was requested but none is loaded
    AdUnavailable,
    /// Rewarded ad closed without granting the reward
    RewardedAdDeclined,
    PurchaseFailed { product_id: String, reason: String },
    PremiumUnlocked,
    RestartRequested,
    MenuRequested,
}

/// Complete rules state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    pub lives: u32,
    /// Bounces since the last drop or combo reward
    pub combo: u32,
    pub double_score: bool,
    pub shield: bool,
    pub high_score: HighScore,
    pub stage: Stage,
    pub phase: GamePhase,
    /// Global time multiplier the host applies (1 normal, 0 frozen)
    pub time_scale: f32,
    /// False between a drop and the respawn
    pub ball_active: bool,
    /// Premium soundtrack owned this session
    pub premium_music: bool,
    /// A rewarded ad was shown for a revive and has not reported back
    pub pending_ad_revive: bool,
}

impl GameState {
    pub fn new(starting_lives: u32, high_score: HighScore) -> Self {
        Self {
            score: 0,
            lives: starting_lives,
            combo: 0,
            double_score: false,
            shield: false,
            high_score,
            stage: Stage::One,
            phase: GamePhase::Playing,
            time_scale: 1.0,
            ball_active: true,
            premium_music: false,
            pending_ad_revive: false,
        }
    }

    /// Back to the start of a run, keeping the record and purchases
    pub fn reset(&mut self, starting_lives: u32) {
        let high_score = self.high_score;
        let premium_music = self.premium_music;
        *self = Self::new(starting_lives, high_score);
        self.premium_music = premium_music;
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert!(Stage::One < Stage::Two && Stage::Two < Stage::Three);
        assert_eq!(Stage::One.next(), Some(Stage::Two));
        assert_eq!(Stage::Three.next(), None);
    }

    #[test]
    fn test_hud_strings() {
        let mut state = GameState::new(3, HighScore::default());
        state.score = 17;
        let hud = Hud::from_state(&state);
        assert_eq!(hud.score, "17");
        assert_eq!(hud.lives, "x3");
    }

    #[test]
    fn test_reset_keeps_record_and_premium() {
        let mut state = GameState::new(3, HighScore::new(50));
        state.score = 12;
        state.lives = 0;
        state.shield = true;
        state.stage = Stage::Two;
        state.phase = GamePhase::GameOver;
        state.premium_music = true;

        state.reset(3);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert!(!state.shield);
        assert_eq!(state.stage, Stage::One);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.high_score.best(), 50);
        assert!(state.premium_music);
    }
}
