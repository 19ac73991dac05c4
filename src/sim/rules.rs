//! Game rules engine
//!
//! Owns the `GameState`, reacts to bounce/drop events from the host, runs
//! powerups, game over, revive and restart, and keeps the persisted record.
//! All handlers are synchronous and must not be re-entered.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::ball;
use super::spawner::PowerupSpawner;
use super::state::{
    EffectKind, GameEvent, GamePhase, GameState, Hud, PowerupKind, SpriteTarget, Stage,
    TimedEffect,
};
use super::timers::{Clock, Scheduler, TimerAction};
use crate::audio::{MusicTrack, SoundEffect};
use crate::consts::EARTH_GRAVITY;
use crate::highscores::{HighScore, RecordCheck};
use crate::services::{PurchaseOutcome, Services};
use crate::tuning::Tuning;

pub struct GameRules {
    pub(super) state: GameState,
    pub(super) tuning: Tuning,
    pub(super) services: Services,
    pub(super) scheduler: Scheduler,
    pub(super) spawner: PowerupSpawner,
    pub(super) rng: Pcg32,
    pub(super) events: Vec<GameEvent>,
    /// Where the ball last touched the paddle (combo effect anchor)
    last_contact: Vec2,
}

impl GameRules {
    /// Start a run. Loads the record from `services.prefs`.
    pub fn new(seed: u64, tuning: Tuning, services: Services) -> Self {
        let tuning = tuning.sanitized();
        let mut rng = Pcg32::seed_from_u64(seed);
        let high_score = HighScore::load(&*services.prefs);
        let spawner = PowerupSpawner::new(&tuning, &mut rng);

        let mut rules = Self {
            state: GameState::new(tuning.starting_lives, high_score),
            tuning,
            services,
            scheduler: Scheduler::new(),
            spawner,
            rng,
            events: Vec::new(),
            last_contact: Vec2::ZERO,
        };
        rules.announce_run_start();
        rules
    }

    // === Accessors ===

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Derived difficulty; recomputed from the score on every call
    pub fn gravity_multiplier(&self) -> f32 {
        self.tuning.gravity_multiplier(self.state.score)
    }

    /// World gravity vector the host should apply
    pub fn world_gravity(&self) -> Vec2 {
        Vec2::new(0.0, -EARTH_GRAVITY * self.gravity_multiplier())
    }

    pub fn time_scale(&self) -> f32 {
        self.state.time_scale
    }

    /// Pending powerup expiries
    pub fn active_effects(&self) -> Vec<TimedEffect> {
        self.scheduler.active_effects()
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Physics events ===

    /// Paddle contact reported by the physics host. Returns the velocity to
    /// give the ball.
    pub fn on_paddle_contact(&mut self, pos: Vec2, vel: Vec2) -> Vec2 {
        if self.state.is_game_over() {
            return vel;
        }
        let new_vel = ball::paddle_bounce(vel, &self.tuning, &mut self.rng);
        self.last_contact = pos;
        self.play(SoundEffect::Bounce);
        self.on_successful_bounce();
        new_vel
    }

    /// A juggle: score, combo, difficulty, stage milestones, HUD
    pub fn on_successful_bounce(&mut self) {
        if self.state.is_game_over() {
            log::debug!("Bounce ignored during game over");
            return;
        }

        self.state.score += if self.state.double_score { 2 } else { 1 };
        self.state.combo += 1;

        let threshold = self.tuning.combo_threshold;
        if threshold > 0 && self.state.combo >= threshold {
            self.state.combo = 0;
            self.state.lives += 1;
            log::debug!("Combo reward, lives now {}", self.state.lives);
            self.emit(GameEvent::ComboReward {
                lives: self.state.lives,
            });
            self.emit(GameEvent::SpawnEffect {
                kind: EffectKind::ComboReward,
                pos: self.last_contact,
            });
        }

        self.emit_gravity();
        self.check_stage_milestones();
        self.emit_hud();
    }

    /// Ball fell through the floor trigger at `pos`
    pub fn on_ball_dropped(&mut self, pos: Vec2) {
        if self.state.is_game_over() {
            log::debug!("Drop ignored during game over");
            return;
        }

        self.state.combo = 0;

        if self.state.shield {
            self.state.shield = false;
            log::info!("Shield absorbed a drop");
            self.play(SoundEffect::LoseLife);
            self.emit(GameEvent::ShieldConsumed);
            self.schedule_respawn();
            return;
        }

        if self.services.cheats.cheat_active() {
            log::debug!("Cheat active, no life lost");
            self.schedule_respawn();
            return;
        }

        self.state.lives = self.state.lives.saturating_sub(1);
        self.play(SoundEffect::LoseLife);
        self.emit(GameEvent::SpawnEffect {
            kind: EffectKind::Drop,
            pos,
        });
        self.emit_hud();

        if self.state.lives == 0 {
            self.enter_game_over();
        } else {
            self.schedule_respawn();
        }
    }

    // === Powerups ===

    /// Start a timed powerup. Non-positive or non-finite durations are ignored.
    pub fn apply_powerup(&mut self, kind: PowerupKind, duration: f32) {
        if !(duration.is_finite() && duration > 0.0) {
            log::debug!("Ignoring {:?} with duration {}", kind, duration);
            return;
        }
        if self.state.is_game_over() {
            log::debug!("Ignoring {:?} during game over", kind);
            return;
        }

        let action = TimerAction::EffectExpired(kind);
        match kind {
            PowerupKind::DoubleScore => {
                self.state.double_score = true;
                self.scheduler.schedule(action, Clock::Scaled, duration);
            }
            PowerupKind::Shield => {
                self.state.shield = true;
                self.scheduler.schedule(action, Clock::Scaled, duration);
            }
            PowerupKind::SlowTime => {
                self.set_time_scale(self.tuning.slow_time_scale);
                // Real time, so the effect ends even though it slows the scaled clock
                self.scheduler.schedule(action, Clock::Real, duration);
            }
        }

        log::info!("Powerup {:?} for {:.1}s", kind, duration);
        self.play(SoundEffect::Powerup);
        self.emit(GameEvent::PowerupActivated { kind, duration });
    }

    // === Game over ===

    /// Compare the current score against the record, persist a new record
    /// and tell the host which message to show
    pub fn check_for_high_score(&mut self) -> RecordCheck {
        let result = self
            .state
            .high_score
            .submit(self.state.score, &mut *self.services.prefs);
        self.emit(GameEvent::HighScoreChecked(result));
        self.emit(GameEvent::Celebration(result.is_new_record()));
        result
    }

    fn enter_game_over(&mut self) {
        self.state.phase = GamePhase::GameOver;
        self.state.ball_active = false;
        self.state.pending_ad_revive = false;
        self.set_time_scale(0.0);

        let record = self.check_for_high_score();
        log::info!(
            "Game over: score {} ({})",
            self.state.score,
            record.message()
        );
        self.emit(GameEvent::GameOver {
            final_score: self.state.score,
            record_text: record.message(),
        });

        if self.tuning.interstitial_on_game_over {
            if self.services.ads.is_interstitial_ready() {
                self.services.ads.show_interstitial();
            } else {
                log::debug!("Interstitial not loaded yet");
            }
        }
    }

    /// Ask for a rewarded ad to revive. Returns whether the ad was shown.
    pub fn revive_with_ad(&mut self) -> bool {
        self.play(SoundEffect::Click);
        if !self.state.is_game_over() {
            log::debug!("Revive requested while playing, ignored");
            return false;
        }
        if !self.services.ads.is_rewarded_ready() {
            log::info!("Rewarded ad not loaded yet");
            self.emit(GameEvent::AdUnavailable);
            return false;
        }
        self.state.pending_ad_revive = true;
        self.services.ads.show_rewarded();
        true
    }

    /// Completion of the rewarded ad started by `revive_with_ad`
    pub fn on_rewarded_ad_closed(&mut self, rewarded: bool) {
        if !self.state.pending_ad_revive {
            log::debug!("Rewarded ad closed with no revive pending");
            return;
        }
        self.state.pending_ad_revive = false;

        if !rewarded {
            log::info!("Rewarded ad closed without reward");
            self.emit(GameEvent::RewardedAdDeclined);
            return;
        }
        self.revive();
    }

    /// Revive without an ad (e.g. after a purchase)
    pub fn revive_direct(&mut self) {
        self.revive();
    }

    fn revive(&mut self) {
        if !self.state.is_game_over() {
            log::debug!("Revive ignored, game not over");
            return;
        }

        self.state.lives = 1;
        self.state.combo = 0;
        self.state.phase = GamePhase::Playing;
        let scale = self.unfrozen_time_scale();
        self.set_time_scale(scale);
        log::info!("Revived at score {}", self.state.score);

        self.emit(GameEvent::Revived);
        self.emit(GameEvent::Celebration(false));
        self.emit_hud();
        self.respawn_now();
    }

    // === Navigation ===

    /// Full reset to a fresh run. Pending timers are discarded.
    pub fn restart(&mut self) {
        self.state.reset(self.tuning.starting_lives);
        if !self.scheduler.is_empty() {
            log::debug!("Discarding pending timers");
            self.scheduler.clear();
        }
        self.spawner = PowerupSpawner::new(&self.tuning, &mut self.rng);
        self.last_contact = Vec2::ZERO;
        log::info!("Run restarted");
        self.announce_run_start();
    }

    /// Restart button
    pub fn request_restart(&mut self) {
        self.play(SoundEffect::Click);
        self.emit(GameEvent::RestartRequested);
        self.restart();
    }

    /// Menu button; the host owns the scene change
    pub fn request_menu(&mut self) {
        self.play(SoundEffect::Click);
        self.emit(GameEvent::MenuRequested);
    }

    // === In-app purchase ===

    /// Buy button
    pub fn purchase(&mut self, product_id: &str) {
        self.play(SoundEffect::Click);
        match self.services.store.initiate_purchase(product_id) {
            Ok(()) => log::info!("Purchase started: {}", product_id),
            Err(e) => {
                log::warn!("Purchase of {} failed to start: {}", product_id, e);
                self.emit(GameEvent::PurchaseFailed {
                    product_id: product_id.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Result reported by the store
    pub fn on_purchase_result(&mut self, product_id: &str, outcome: PurchaseOutcome) {
        match outcome {
            PurchaseOutcome::Success if product_id == self.tuning.premium_product => {
                log::info!("Premium music unlocked");
                self.state.premium_music = true;
                self.emit(GameEvent::SwapMusic(MusicTrack::Premium));
                self.emit(GameEvent::PremiumUnlocked);
            }
            PurchaseOutcome::Success => {
                log::info!("Purchase complete: {} (no effect)", product_id);
            }
            PurchaseOutcome::Failed(reason) => {
                log::warn!("Purchase failed: {}, reason: {}", product_id, reason);
                self.emit(GameEvent::PurchaseFailed {
                    product_id: product_id.to_string(),
                    reason,
                });
            }
            PurchaseOutcome::Cancelled => {
                log::info!("Purchase cancelled: {}", product_id);
                self.emit(GameEvent::PurchaseFailed {
                    product_id: product_id.to_string(),
                    reason: "cancelled".to_string(),
                });
            }
        }
    }

    // === Internals ===

    pub(super) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn play(&mut self, sound: SoundEffect) {
        self.emit(GameEvent::PlaySound(sound));
    }

    fn emit_hud(&mut self) {
        let hud = Hud::from_state(&self.state);
        self.emit(GameEvent::HudUpdated(hud));
    }

    fn emit_gravity(&mut self) {
        let multiplier = self.gravity_multiplier();
        self.emit(GameEvent::GravityChanged { multiplier });
    }

    pub(super) fn set_time_scale(&mut self, scale: f32) {
        if self.state.time_scale != scale {
            self.state.time_scale = scale;
            self.emit(GameEvent::TimeScaleChanged { scale });
        }
    }

    /// Time scale to resume at: slowed if a SlowTime is still running
    pub(super) fn unfrozen_time_scale(&self) -> f32 {
        if self
            .scheduler
            .is_pending(TimerAction::EffectExpired(PowerupKind::SlowTime))
        {
            self.tuning.slow_time_scale
        } else {
            1.0
        }
    }

    /// Stage changes are monotonic and fire once, on the first score at or
    /// past the threshold (a double-score jump can step over it)
    fn check_stage_milestones(&mut self) {
        while let Some(next) = self.state.stage.next() {
            if self.state.score < self.tuning.stage_threshold(next) {
                break;
            }
            self.state.stage = next;
            log::info!("Stage {:?} reached at score {}", next, self.state.score);
            self.announce_stage(next);
            self.emit(GameEvent::StageReached(next));
        }
    }

    fn announce_stage(&mut self, stage: Stage) {
        self.emit(GameEvent::SwapSprite {
            target: SpriteTarget::Ball,
            stage,
        });
        self.emit(GameEvent::SwapSprite {
            target: SpriteTarget::Court,
            stage,
        });
        if !self.state.premium_music {
            self.emit(GameEvent::SwapMusic(MusicTrack::for_stage(stage)));
        }
    }

    fn announce_run_start(&mut self) {
        self.state.time_scale = 1.0;
        self.emit(GameEvent::TimeScaleChanged { scale: 1.0 });
        self.announce_stage(Stage::One);
        if self.state.premium_music {
            self.emit(GameEvent::SwapMusic(MusicTrack::Premium));
        }
        self.emit(GameEvent::Celebration(false));
        self.emit_gravity();
        self.emit_hud();
        self.emit(GameEvent::BallLaunched {
            impulse: ball::launch_impulse(&self.tuning),
        });
    }

    fn schedule_respawn(&mut self) {
        self.state.ball_active = false;
        self.emit(GameEvent::BallDeactivated);
        self.scheduler
            .schedule(TimerAction::Respawn, Clock::Scaled, self.tuning.respawn_delay);
    }

    pub(super) fn respawn_now(&mut self) {
        self.state.ball_active = true;
        let pos = ball::respawn_position(&self.tuning, &mut self.rng);
        self.emit(GameEvent::RespawnBall {
            pos,
            impulse: ball::respawn_impulse(&self.tuning),
        });
    }
}
