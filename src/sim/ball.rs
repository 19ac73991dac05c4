//! Ball impulses and placement
//!
//! The host owns the rigid body; these helpers compute the velocities and
//! positions the rules want applied to it.

use glam::Vec2;
use rand::Rng;

use crate::tuning::Tuning;

/// Kick applied when a run starts
pub fn launch_impulse(tuning: &Tuning) -> Vec2 {
    Vec2::Y * tuning.launch_impulse
}

/// Kick applied when a dropped ball comes back
pub fn respawn_impulse(tuning: &Tuning) -> Vec2 {
    Vec2::Y * tuning.respawn_impulse
}

/// Random respawn point across the play width at the fixed respawn height
pub fn respawn_position<R: Rng>(tuning: &Tuning, rng: &mut R) -> Vec2 {
    let x = rng.random_range(tuning.play_x_min..=tuning.play_x_max);
    Vec2::new(x, tuning.respawn_height)
}

/// Velocity after a paddle contact: always upward, boosted, with a little
/// horizontal randomness, clamped to the max speed
pub fn paddle_bounce<R: Rng>(vel: Vec2, tuning: &Tuning, rng: &mut R) -> Vec2 {
    let jitter = tuning.paddle_bounce_jitter;
    let mut v = vel;
    v.y = v.y.abs() * tuning.paddle_bounce_boost + tuning.paddle_bounce_lift;
    v.x += rng.random_range(-jitter..=jitter);
    v.clamp_length_max(tuning.ball_max_speed)
}
