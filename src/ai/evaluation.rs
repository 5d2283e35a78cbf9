//! Scoring a simulated turn
//!
//! Higher is better. Spread-out balls score a little (open tables are easier
//! to play), legal turns and pocketed balls score more, and winning or losing
//! the match dominates everything.

use crate::config::AiConfig;
use crate::sim::{TurnOutcome, World};

/// Sum of distances between every pair of balls still on the table
pub fn ball_spread(world: &World) -> f32 {
    let balls = world.balls();
    balls
        .iter()
        .enumerate()
        .filter(|(_, a)| a.visible)
        .map(|(i, a)| {
            balls[i + 1..]
                .iter()
                .filter(|b| b.visible)
                .map(|b| a.pos.distance(b.pos))
                .sum::<f32>()
        })
        .sum()
}

/// Score the table left behind by a concluded turn
pub fn evaluate(world: &World, outcome: &TurnOutcome, weights: &AiConfig) -> f32 {
    let mut score = 1.0 + ball_spread(world) * weights.ball_distance_weight;

    if outcome.valid {
        score += weights.valid_turn_bonus;
        score += weights.pocketed_ball_bonus * outcome.pocketed as f32;
        if outcome.game_over {
            score += weights.win_bonus;
        }
    } else {
        score -= weights.invalid_turn_penalty;
        if outcome.game_over {
            score -= weights.loss_penalty;
        }
    }

    score
}
