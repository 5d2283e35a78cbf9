//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-tick constants only (nothing is scaled by wall-clock time)
//! - Stable iteration order (by ball index, cue ball first)
//! - No rendering, audio or platform dependencies

pub mod ball;
pub mod collision;
pub mod referee;
pub mod turn;
pub mod world;

pub use ball::{Ball, BallColor};
pub use collision::{pocket_containing, resolve_ball_pair, resolve_cushions};
pub use referee::Player;
pub use turn::{TurnOutcome, TurnPhase, TurnState};
pub use world::{World, WorldSnapshot};
