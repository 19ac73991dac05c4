//! Audio cue identifiers
//!
//! The engine never plays audio itself; it emits these as events and the host
//! maps them to clips.

use serde::{Deserialize, Serialize};

use crate::sim::Stage;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Ball hits paddle
    Bounce,
    /// Powerup collected
    Powerup,
    /// Ball dropped (also played, softer, when a shield absorbs the drop)
    LoseLife,
    /// UI button
    Click,
}

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicTrack {
    Stage1,
    Stage2,
    Stage3,
    /// Unlocked by in-app purchase
    Premium,
}

impl MusicTrack {
    pub fn for_stage(stage: Stage) -> Self {
        match stage {
            Stage::One => MusicTrack::Stage1,
            Stage::Two => MusicTrack::Stage2,
            Stage::Three => MusicTrack::Stage3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MusicTrack::Stage1 => "stage1",
            MusicTrack::Stage2 => "stage2",
            MusicTrack::Stage3 => "stage3",
            MusicTrack::Premium => "premium",
        }
    }
}
