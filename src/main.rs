//! Keepy-Up headless demo host
//!
//! Plays one seeded session against a toy physics model and logs what the
//! rules engine asks the host to do. Usage: `keepy-up [seed] [prefs.json]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use keepy_up::persistence::{JsonFilePrefs, MemoryPrefs};
    use keepy_up::services::Services;
    use keepy_up::sim::{GameEvent, GameRules};
    use keepy_up::tuning::Tuning;

    /// 60 Hz frames
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after ten minutes of play
    const MAX_FRAMES: u32 = 60 * 60 * 10;
    const PADDLE_Y: f32 = -3.5;
    const FLOOR_Y: f32 = -5.0;
    /// Chance the autoplayer reaches a falling ball
    const CATCH_CHANCE: f64 = 0.93;
    /// Chance the ball passes through a spawned powerup
    const PICKUP_CHANCE: f64 = 0.5;

    /// Toy ball the demo host integrates itself
    struct Ball {
        pos: Vec2,
        vel: Vec2,
        active: bool,
        /// Decided once per fall so the autoplayer does not re-roll every frame
        will_catch: Option<bool>,
    }

    pub fn run(seed: u64, prefs_path: Option<String>) {
        let services = match prefs_path {
            Some(path) => match JsonFilePrefs::open(&path) {
                Ok(prefs) => {
                    log::info!("High score persisted to {}", prefs.path().display());
                    Services::default().with_prefs(prefs)
                }
                Err(e) => {
                    log::warn!("Cannot open {} ({}), high score kept in memory", path, e);
                    Services::default().with_prefs(MemoryPrefs::new())
                }
            },
            None => Services::default(),
        };

        let mut rules = GameRules::new(seed, Tuning::default(), services);
        let mut host_rng = Pcg32::seed_from_u64(seed ^ 0x5eed);
        let mut ball = Ball {
            pos: Vec2::new(0.0, PADDLE_Y + 0.5),
            vel: Vec2::ZERO,
            active: true,
            will_catch: None,
        };

        for frame in 0..MAX_FRAMES {
            for event in rules.drain_events() {
                apply_event(&mut rules, &mut ball, &mut host_rng, event);
            }
            if rules.is_game_over() {
                log::info!("Session ended after {:.1}s", frame as f32 * FRAME_DT);
                break;
            }

            let dt = FRAME_DT * rules.time_scale();
            if ball.active {
                ball.vel += rules.world_gravity() * dt;
                ball.pos += ball.vel * dt;

                if ball.vel.y < 0.0 && ball.pos.y <= PADDLE_Y {
                    let catch = *ball
                        .will_catch
                        .get_or_insert_with(|| host_rng.random_bool(CATCH_CHANCE));
                    if catch {
                        ball.pos.y = PADDLE_Y;
                        ball.vel = rules.on_paddle_contact(ball.pos, ball.vel);
                        ball.will_catch = None;
                    } else if ball.pos.y <= FLOOR_Y {
                        ball.active = false;
                        ball.will_catch = None;
                        rules.on_ball_dropped(ball.pos);
                    }
                }
            }

            rules.tick(FRAME_DT);
        }

        let state = rules.state();
        println!(
            "Final score {} | stage {:?} | record {}",
            state.score,
            state.stage,
            state.high_score.best()
        );
    }

    fn apply_event(rules: &mut GameRules, ball: &mut Ball, rng: &mut Pcg32, event: GameEvent) {
        match event {
            GameEvent::BallLaunched { impulse } => {
                ball.vel = impulse;
                ball.active = true;
            }
            GameEvent::BallDeactivated => ball.active = false,
            GameEvent::RespawnBall { pos, impulse } => {
                log::info!("Respawn at ({:.2}, {:.2})", pos.x, pos.y);
                ball.pos = pos;
                ball.vel = impulse;
                ball.active = true;
            }
            GameEvent::PowerupSpawned { kind, duration, .. } => {
                if rng.random_bool(PICKUP_CHANCE) {
                    rules.apply_powerup(kind, duration);
                } else {
                    log::debug!("Missed {:?}", kind);
                }
            }
            GameEvent::HudUpdated(hud) => log::debug!("HUD {} {}", hud.score, hud.lives),
            GameEvent::StageReached(stage) => log::info!("Stage {:?}", stage),
            GameEvent::SwapMusic(track) => log::info!("Music -> {}", track.as_str()),
            GameEvent::ComboReward { lives } => log::info!("Combo! lives {}", lives),
            GameEvent::HighScoreChecked(check) => log::info!(
                "Record {}{}",
                check.record(),
                if check.is_new_record() { " (new)" } else { "" }
            ),
            GameEvent::GameOver {
                final_score,
                record_text,
            } => log::info!("GAME OVER {} - {}", final_score, record_text),
            other => log::trace!("{:?}", other),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::warn!("Bad seed ({}), using 1", e);
            1
        }
        None => 1,
    };
    let prefs_path = args.next();

    log::info!("Keepy-Up (native demo) starting, seed {}", seed);
    demo::run(seed, prefs_path);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
