//! Per-frame advancement
//!
//! The host calls `tick` once per frame with real elapsed seconds. Scaled
//! timers see `dt * time_scale`, real timers see `dt`. Long frames (an app
//! suspend, a debugger pause) are clamped to `MAX_FRAME_DT`.

use super::rules::GameRules;
use super::state::{GameEvent, GamePhase, PowerupKind};
use super::timers::TimerAction;
use crate::consts::MAX_FRAME_DT;

impl GameRules {
    /// Advance timers and the powerup spawner by `dt` real seconds
    pub fn tick(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        let dt = dt.min(MAX_FRAME_DT);
        let scaled_dt = dt * self.state.time_scale;

        for action in self.scheduler.advance(scaled_dt, dt) {
            self.complete(action);
        }

        if self.state.phase == GamePhase::Playing {
            if let Some(spawn) = self.spawner.advance(scaled_dt, &self.tuning, &mut self.rng) {
                log::debug!("Spawning {:?} at {:?}", spawn.kind, spawn.pos);
                self.emit(GameEvent::PowerupSpawned {
                    kind: spawn.kind,
                    pos: spawn.pos,
                    duration: spawn.duration,
                });
            }
        }
    }

    fn complete(&mut self, action: TimerAction) {
        match action {
            TimerAction::EffectExpired(kind) => {
                match kind {
                    // Overlapping activations each clear the flag on their own expiry
                    PowerupKind::DoubleScore => self.state.double_score = false,
                    PowerupKind::Shield => self.state.shield = false,
                    PowerupKind::SlowTime => {
                        // Game over keeps time frozen; revive picks the scale back up
                        if self.state.phase == GamePhase::Playing {
                            self.set_time_scale(1.0);
                        }
                    }
                }
                log::debug!("Powerup {:?} expired", kind);
                self.emit(GameEvent::PowerupExpired(kind));
            }
            TimerAction::Respawn => {
                if self.state.phase == GamePhase::Playing && !self.state.ball_active {
                    self.respawn_now();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use crate::services::Services;
    use crate::sim::{GameEvent, GameRules, PowerupKind};
    use crate::tuning::Tuning;

    const FRAME: f32 = 1.0 / 60.0;

    fn quiet_tuning() -> Tuning {
        Tuning {
            combo_threshold: 0,
            powerup_spawning: false,
            ..Default::default()
        }
    }

    fn run_for(rules: &mut GameRules, seconds: f32) {
        let frames = (seconds / FRAME).round() as u32;
        for _ in 0..frames {
            rules.tick(FRAME);
        }
    }

    #[test]
    fn test_double_score_window() {
        let mut rules = GameRules::new(1, quiet_tuning(), Services::default());
        rules.apply_powerup(PowerupKind::DoubleScore, 5.0);
        for _ in 0..3 {
            rules.on_successful_bounce();
        }
        assert_eq!(rules.state().score, 6);

        run_for(&mut rules, 5.1);
        assert!(!rules.state().double_score);
        rules.on_successful_bounce();
        assert_eq!(rules.state().score, 7);
    }

    #[test]
    fn test_slow_time_ends_in_real_time() {
        let mut rules = GameRules::new(1, quiet_tuning(), Services::default());
        rules.apply_powerup(PowerupKind::SlowTime, 2.0);
        assert_eq!(rules.time_scale(), 0.6);

        run_for(&mut rules, 1.9);
        assert_eq!(rules.time_scale(), 0.6);
        run_for(&mut rules, 0.2);
        assert_eq!(rules.time_scale(), 1.0);
        assert!(
            rules
                .drain_events()
                .contains(&GameEvent::PowerupExpired(PowerupKind::SlowTime))
        );
    }

    #[test]
    fn test_scaled_effects_slow_down_under_slow_time() {
        let mut rules = GameRules::new(1, quiet_tuning(), Services::default());
        rules.apply_powerup(PowerupKind::SlowTime, 10.0);
        rules.apply_powerup(PowerupKind::Shield, 3.0);

        // 3 real seconds at 0.6 is only 1.8 scaled seconds
        run_for(&mut rules, 3.0);
        assert!(rules.state().shield);
        run_for(&mut rules, 2.1);
        assert!(!rules.state().shield);
    }

    #[test]
    fn test_respawn_after_one_second() {
        let mut rules = GameRules::new(1, quiet_tuning(), Services::default());
        rules.on_ball_dropped(Vec2::new(0.0, -5.0));
        assert!(!rules.state().ball_active);
        rules.drain_events();

        run_for(&mut rules, 0.9);
        assert!(!rules.state().ball_active);
        run_for(&mut rules, 0.2);
        assert!(rules.state().ball_active);

        let respawn = rules
            .drain_events()
            .into_iter()
            .find_map(|e| match e {
                GameEvent::RespawnBall { pos, impulse } => Some((pos, impulse)),
                _ => None,
            })
            .expect("respawn event");
        assert!(respawn.0.x >= -3.2 && respawn.0.x <= 3.2);
        assert_eq!(respawn.1, Vec2::new(0.0, 6.0));
    }

    #[test]
    fn test_frozen_game_over_stops_scaled_timers() {
        let mut rules = GameRules::new(
            1,
            Tuning {
                starting_lives: 1,
                ..quiet_tuning()
            },
            Services::default(),
        );
        rules.apply_powerup(PowerupKind::DoubleScore, 1.0);
        rules.on_ball_dropped(Vec2::ZERO);
        assert!(rules.is_game_over());

        run_for(&mut rules, 5.0);
        assert_eq!(rules.time_scale(), 0.0);
        assert_eq!(rules.active_effects().len(), 1);
    }

    #[test]
    fn test_slow_time_expiry_keeps_game_over_frozen() {
        let mut rules = GameRules::new(
            1,
            Tuning {
                starting_lives: 1,
                ..quiet_tuning()
            },
            Services::default(),
        );
        rules.apply_powerup(PowerupKind::SlowTime, 1.0);
        rules.on_ball_dropped(Vec2::ZERO);
        run_for(&mut rules, 2.0);
        assert_eq!(rules.time_scale(), 0.0);

        rules.revive_direct();
        assert_eq!(rules.time_scale(), 1.0);
    }

    #[test]
    fn test_spawner_runs_only_while_playing() {
        let tuning = Tuning {
            starting_lives: 1,
            ..Default::default()
        };
        let mut rules = GameRules::new(9, tuning, Services::default());
        run_for(&mut rules, 12.5);
        let spawned = rules
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::PowerupSpawned { .. }))
            .count();
        assert!(spawned >= 1);

        rules.on_ball_dropped(Vec2::ZERO);
        rules.drain_events();
        run_for(&mut rules, 60.0);
        assert!(
            !rules
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::PowerupSpawned { .. }))
        );
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let mut rules = GameRules::new(1, quiet_tuning(), Services::default());
        rules.apply_powerup(PowerupKind::Shield, 1.0);
        rules.tick(f32::NAN);
        rules.tick(-1.0);
        rules.tick(0.0);
        assert_eq!(rules.active_effects()[0].remaining, 1.0);
    }

    fn spawn_count(rules: &mut GameRules) -> usize {
        rules
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::PowerupSpawned { .. }))
            .count()
    }

    #[test]
    fn test_huge_frames_are_clamped() {
        let mut rules = GameRules::new(3, Tuning::default(), Services::default());
        rules.apply_powerup(PowerupKind::Shield, 1.0);
        rules.drain_events();

        rules.tick(f32::MAX);
        assert!(spawn_count(&mut rules) <= 1);
        rules.tick(1.0e5);
        assert!(spawn_count(&mut rules) <= 1);

        // Two clamped frames cover 0.2 s of the 1 s shield
        assert!(rules.state().shield);
        assert!((rules.active_effects()[0].remaining - 0.8).abs() < 1e-4);
    }

    #[test]
    fn test_repeated_huge_frames_spawn_at_game_pace() {
        let mut rules = GameRules::new(3, Tuning::default(), Services::default());
        // 200 clamped frames are 20 s, so at most 20 / 6 spawns
        for _ in 0..200 {
            rules.tick(1.0e5);
        }
        let spawned = spawn_count(&mut rules);
        assert!((1..=3).contains(&spawned));
    }

    #[test]
    fn test_pending_respawn_ignored_after_revive() {
        let mut rules = GameRules::new(
            1,
            Tuning {
                starting_lives: 1,
                ..quiet_tuning()
            },
            Services::default(),
        );
        rules.apply_powerup(PowerupKind::Shield, 6.0);
        // Absorbed drop leaves a respawn timer pending
        rules.on_ball_dropped(Vec2::ZERO);
        assert_eq!(rules.state().lives, 1);
        rules.on_ball_dropped(Vec2::ZERO);
        assert!(rules.is_game_over());
        rules.drain_events();

        rules.revive_direct();
        run_for(&mut rules, 1.1);
        let respawns = rules
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::RespawnBall { .. }))
            .count();
        assert_eq!(respawns, 1);
        assert!(rules.state().ball_active);
    }
}
