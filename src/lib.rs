//! Eight Ball - A headless 8-ball billiards engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, collisions, turns, referee)
//! - `ai`: Forward-simulation shot search for the computer opponent
//! - `config`: Data-driven table, physics and AI tuning
//! - `audio` / `input`: Capabilities injected by the host (sound, commands)
//!
//! Vectors are `glam::Vec2`, used as plain values. The in-place operators
//! (`+=`, `*=`) only appear inside the per-tick update loops.

pub mod ai;
pub mod audio;
pub mod config;
pub mod error;
pub mod input;
pub mod sim;

pub use ai::{AiOpponent, Candidate, SearchStatus, ShotSearch};
pub use audio::{SoundEffect, SoundSink};
pub use config::GameConfig;
pub use error::{ConfigError, PlacementError};
pub use input::{Command, InputSource};
pub use sim::{Ball, BallColor, Player, TurnOutcome, TurnPhase, World, WorldSnapshot};

use glam::Vec2;

/// Fixed game constants (everything tunable lives in `config`)
pub mod consts {
    /// Index of the cue ball in `World::balls`
    pub const CUE_BALL: usize = 0;
    /// Cue ball + 15 object balls
    pub const BALL_COUNT: usize = 16;
    /// Object balls per colour group
    pub const GROUP_SIZE: u8 = 7;
    /// Match score once a player has cleared their group and the black
    pub const MAX_MATCH_SCORE: u8 = 8;
    /// Every Nth search iteration restarts from a fresh random candidate
    pub const RANDOM_RESTART_INTERVAL: usize = 10;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
        assert!(normalize_angle(PI) < PI);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let v = polar_to_cartesian(10.0, PI / 2.0);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y - 10.0).abs() < 1e-5);
    }
}
