//! Per-turn bookkeeping

use serde::{Deserialize, Serialize};

use super::ball::BallColor;

/// Where the current turn is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Balls at rest, waiting for a shot (or a cue-ball placement)
    Aiming,
    /// A shot is in progress; the turn concludes once everything stops
    BallsMoving,
}

/// Scratch record for one turn. Created fresh at the start of every turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnState {
    /// Colour of the first ball the cue ball (or anything) touched
    pub first_collided: Option<BallColor>,
    /// Indices of pocketed balls, in pocketing order
    pub pocketed: Vec<usize>,
    /// The shooter may place the cue ball anywhere legal before shooting
    pub ball_in_hand: bool,
    /// Set when the turn is concluded
    pub is_valid: bool,
    /// Shooter's match score when the shot was taken
    pub score_at_shot: u8,
}

impl TurnState {
    pub fn new(ball_in_hand: bool) -> Self {
        Self {
            ball_in_hand,
            ..Default::default()
        }
    }

    /// Record a first contact; later contacts are ignored
    pub fn record_contact(&mut self, color: BallColor) {
        if self.first_collided.is_none() {
            self.first_collided = Some(color);
        }
    }

    /// Record a pocketed ball (each ball at most once)
    pub fn record_pocketed(&mut self, index: usize) {
        if !self.pocketed.contains(&index) {
            self.pocketed.push(index);
        }
    }
}

/// What happened when a turn concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Player who took the shot
    pub shooter: usize,
    pub valid: bool,
    /// Balls pocketed during the turn (cue ball included)
    pub pocketed: usize,
    pub game_over: bool,
    /// Set when `game_over`
    pub winner: Option<usize>,
    /// Player to take the next shot
    pub next_player: usize,
}

impl TurnOutcome {
    pub fn is_foul(&self) -> bool {
        !self.valid
    }

    /// True when the shooter won the match with this turn
    pub fn shooter_won(&self) -> bool {
        self.winner == Some(self.shooter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_contact_sticks() {
        let mut turn = TurnState::new(false);
        turn.record_contact(BallColor::Red);
        turn.record_contact(BallColor::Black);
        assert_eq!(turn.first_collided, Some(BallColor::Red));
    }

    #[test]
    fn test_outcome_helpers() {
        let outcome = TurnOutcome {
            shooter: 1,
            valid: false,
            pocketed: 0,
            game_over: true,
            winner: Some(0),
            next_player: 0,
        };
        assert!(outcome.is_foul());
        assert!(!outcome.shooter_won());
    }

    #[test]
    fn test_pocketed_order_without_duplicates() {
        let mut turn = TurnState::new(true);
        turn.record_pocketed(4);
        turn.record_pocketed(2);
        turn.record_pocketed(4);
        assert_eq!(turn.pocketed, vec![4, 2]);
        assert!(turn.ball_in_hand);
        assert!(!turn.is_valid);
    }
}
