//! Computer opponent
//!
//! Shots are chosen purely by forward simulation of the real rules and
//! physics; there is no hand-written shot selection.

pub mod evaluation;
pub mod optimizer;

pub use evaluation::{ball_spread, evaluate};
pub use optimizer::{AiOpponent, Candidate, SearchStatus, ShotSearch};
