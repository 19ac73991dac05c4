//! Game rules simulation
//!
//! All gameplay logic lives here. This module must stay host-independent:
//! - Time only advances through `GameRules::tick`
//! - Seeded RNG only
//! - Collaborators are injected, never looked up
//! - No rendering, physics or platform dependencies

pub mod ball;
pub mod rules;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timers;

pub use rules::GameRules;
pub use spawner::{PowerupSpawn, PowerupSpawner};
pub use state::{
    EffectKind, GameEvent, GamePhase, GameState, Hud, PowerupKind, SpriteTarget, Stage,
    TimedEffect,
};
pub use timers::{Clock, Scheduler, TimerAction};
