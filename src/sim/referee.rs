//! 8-ball rules: turn legality, group assignment and game-over detection
//!
//! Every function here is total over reachable game states; nothing panics
//! or errors, a turn is simply legal or not.

use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallColor};
use crate::consts::{CUE_BALL, GROUP_SIZE, MAX_MATCH_SCORE};

/// A participant in the match
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Group colour, unset until the first legal group pocketing
    pub color: Option<BallColor>,
    /// `8 - own balls left - black left`, only tracked once a colour is set
    pub match_score: u8,
    /// Matches won, kept across re-racks
    pub overall_score: u32,
}

impl Player {
    /// Object balls of this player's group still on the table
    pub fn remaining_object_balls(&self) -> u8 {
        GROUP_SIZE.saturating_sub(self.match_score)
    }

    /// All group balls gone; only the black is left to play
    pub fn is_on_black(&self) -> bool {
        self.color.is_some() && self.match_score >= GROUP_SIZE
    }
}

fn remaining(balls: &[Ball], color: BallColor) -> u8 {
    balls.iter().filter(|b| b.visible && b.color == color).count() as u8
}

/// Score for a group colour given what is still on the table
pub fn match_score(balls: &[Ball], color: BallColor) -> u8 {
    MAX_MATCH_SCORE
        .saturating_sub(remaining(balls, color))
        .saturating_sub(remaining(balls, BallColor::Black))
}

/// Refresh `match_score` for every player that has a colour
pub fn update_match_scores(players: &mut [Player], balls: &[Ball]) {
    for player in players.iter_mut() {
        if let Some(color) = player.color {
            player.match_score = match_score(balls, color);
        }
    }
}

/// Was the first contact of the turn legal?
///
/// `player` must carry the score the shooter had when the shot was taken.
pub fn is_valid_first_touch(
    player: &Player,
    first_collided: Option<BallColor>,
    any_pocketed: bool,
) -> bool {
    let Some(first) = first_collided else {
        return false;
    };

    match player.color {
        None => first != BallColor::Black,
        Some(color) => {
            first == color
                // Clearing the last group ball excuses the contact order
                || (player.remaining_object_balls() == 1 && any_pocketed)
                || (player.match_score >= GROUP_SIZE && first == BallColor::Black)
        }
    }
}

/// Were the balls pocketed this turn legal for this player?
///
/// `player` must carry the score recomputed after this turn's pocketing.
pub fn is_valid_pocketed(player: &Player, pocketed: &[BallColor]) -> bool {
    let Some(&first) = pocketed.first() else {
        return true;
    };

    match player.color {
        Some(_) if player.match_score == MAX_MATCH_SCORE => pocketed == [BallColor::Black],
        Some(color) => pocketed.iter().all(|&c| c == color),
        None => first.is_group() && pocketed.iter().all(|&c| c == first),
    }
}

/// Full turn legality: first touch and pocketed balls must both be legal
pub fn is_valid_turn(
    at_shot: &Player,
    after: &Player,
    first_collided: Option<BallColor>,
    pocketed: &[BallColor],
) -> bool {
    is_valid_first_touch(at_shot, first_collided, !pocketed.is_empty())
        && is_valid_pocketed(after, pocketed)
}

/// Give the shooter the group they legally pocketed and the opponent the other.
///
/// Returns the colour assigned to the shooter, if an assignment happened.
pub fn assign_groups(
    players: &mut [Player; 2],
    shooter: usize,
    pocketed: &[BallColor],
) -> Option<BallColor> {
    if players[shooter].color.is_some() {
        return None;
    }
    let color = pocketed.first().copied().filter(|c| c.is_group())?;
    let other = color.complement()?;

    players[shooter].color = Some(color);
    players[1 - shooter].color = Some(other);
    Some(color)
}

/// The match is over when the black is off the table, or the cue ball went
/// down while the shooter was on (or past) the black.
pub fn is_game_over(balls: &[Ball], cue_pocketed: bool, shooter: &Player) -> bool {
    let black_gone = balls
        .iter()
        .any(|b| b.color == BallColor::Black && !b.visible);
    let cue_gone = cue_pocketed || balls.get(CUE_BALL).is_some_and(|b| !b.visible);

    black_gone || (cue_gone && shooter.match_score >= GROUP_SIZE)
}
