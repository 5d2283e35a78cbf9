//! The table: balls, players and turn progression
//!
//! `World` is the only thing that moves balls or advances turns. A host
//! calls `tick` once per frame; the AI runs private copies to completion
//! with `settle_turn`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallColor};
use super::collision::{pocket_containing, resolve_ball_pair, resolve_cushions};
use super::referee::{self, Player};
use super::turn::{TurnOutcome, TurnPhase, TurnState};
use crate::audio::{SoundEffect, SoundSink, impact_volume};
use crate::config::GameConfig;
use crate::consts::CUE_BALL;
use crate::error::PlacementError;
use crate::input::Command;

/// Everything that changes during play, detached from configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub balls: Vec<Ball>,
    pub players: [Player; 2],
    pub current_player: usize,
    pub turn: TurnState,
    pub phase: TurnPhase,
    pub last_outcome: Option<TurnOutcome>,
    pub matches_played: u32,
}

/// Live simulation state
#[derive(Debug, Clone)]
pub struct World {
    config: GameConfig,
    /// Index 0 is the cue ball; indices are stable for the whole match
    balls: Vec<Ball>,
    players: [Player; 2],
    current_player: usize,
    turn: TurnState,
    phase: TurnPhase,
    last_outcome: Option<TurnOutcome>,
    matches_played: u32,
}

impl World {
    /// Create a world with a fresh rack; player 0 breaks
    pub fn new(config: GameConfig) -> Self {
        let mut world = Self {
            config,
            balls: Vec::new(),
            players: Default::default(),
            current_player: 0,
            turn: TurnState::new(false),
            phase: TurnPhase::Aiming,
            last_outcome: None,
            matches_played: 0,
        };
        world.rack();
        world
    }

    fn rack(&mut self) {
        let ball = &self.config.ball;
        self.balls.clear();
        self.balls.push(Ball::new(BallColor::White, ball.cue_spot));
        self.balls.extend(
            ball.rack_colors
                .iter()
                .zip(ball.rack_positions())
                .map(|(&color, pos)| Ball::new(color, pos)),
        );
    }

    /// Re-rack for the next match. Overall scores are kept; the loser of the
    /// previous match breaks.
    pub fn start_new_match(&mut self) {
        let breaker = self
            .last_outcome
            .and_then(|o| o.winner)
            .map(|winner| 1 - winner)
            .unwrap_or(0);

        self.rack();
        for player in &mut self.players {
            player.color = None;
            player.match_score = 0;
        }
        self.current_player = breaker;
        self.turn = TurnState::new(false);
        self.phase = TurnPhase::Aiming;
        self.matches_played += 1;

        log::info!(
            "Match {} racked, player {} breaks (overall {}-{})",
            self.matches_played + 1,
            breaker,
            self.players[0].overall_score,
            self.players[1].overall_score
        );
    }

    // --- Commands ---

    /// Strike the cue ball. Returns false (and changes nothing) if the shot
    /// is not allowed: non-positive power, balls still moving, or no cue ball.
    pub fn shoot(&mut self, power: f32, rotation: f32) -> bool {
        if !power.is_finite()
            || power <= 0.0
            || !rotation.is_finite()
            || self.phase != TurnPhase::Aiming
        {
            return false;
        }
        let Some(cue) = self.balls.get_mut(CUE_BALL).filter(|b| b.visible) else {
            return false;
        };

        cue.shoot(power, rotation);
        self.turn.ball_in_hand = false;
        self.turn.score_at_shot = self.players[self.current_player].match_score;
        self.phase = TurnPhase::BallsMoving;
        true
    }

    /// Move the cue ball while it is in hand
    pub fn place_cue_ball(&mut self, pos: Vec2) -> Result<(), PlacementError> {
        if self.phase != TurnPhase::Aiming {
            return Err(PlacementError::BallsMoving);
        }
        if !self.turn.ball_in_hand {
            return Err(PlacementError::NotBallInHand);
        }
        self.check_placement(pos)?;

        self.balls[CUE_BALL].respot(pos);
        Ok(())
    }

    /// Dispatch a command from an `InputSource`
    pub fn apply(&mut self, command: Command) -> Result<(), PlacementError> {
        match command {
            Command::Shoot { power, rotation } => {
                if !self.shoot(power, rotation) {
                    log::debug!("Ignored shot (power {power:.2}, phase {:?})", self.phase);
                }
                Ok(())
            }
            Command::PlaceCueBall(pos) => self.place_cue_ball(pos),
        }
    }

    /// Would the cue ball be allowed at `pos` right now?
    pub fn can_place_cue_ball(&self, pos: Vec2) -> bool {
        self.phase == TurnPhase::Aiming
            && self.turn.ball_in_hand
            && self.check_placement(pos).is_ok()
    }

    /// Geometric legality of a cue-ball position: in bounds, clear of every
    /// pocket and of every other ball
    pub fn check_placement(&self, pos: Vec2) -> Result<(), PlacementError> {
        let (min, max) = self.config.table.bounds(self.config.ball.radius());
        if !(pos.x >= min.x && pos.x <= max.x && pos.y >= min.y && pos.y <= max.y) {
            return Err(PlacementError::OutOfBounds { x: pos.x, y: pos.y });
        }
        if let Some(pocket) =
            pocket_containing(pos, &self.config.table.pockets, self.config.table.pocket_radius)
        {
            return Err(PlacementError::InPocket { pocket });
        }
        let diameter = self.config.ball.diameter;
        if let Some(ball) = self
            .balls
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, b)| b.visible && b.pos.distance(pos) < diameter)
            .map(|(i, _)| i)
        {
            return Err(PlacementError::Overlapping { ball });
        }
        Ok(())
    }

    /// First legal cue-ball spot found by walking right from the cue spot in
    /// `step` increments, then row by row over the whole table.
    pub fn find_cue_spot(&self, step: f32) -> Option<Vec2> {
        let step = step.max(1.0);
        let (min, max) = self.config.table.bounds(self.config.ball.radius());
        let start = self.config.ball.cue_spot;

        let walk = |y: f32, from: f32| {
            let mut x = from;
            while x <= max.x {
                let pos = Vec2::new(x, y);
                if self.check_placement(pos).is_ok() {
                    return Some(pos);
                }
                x += step;
            }
            None
        };

        if let Some(pos) = walk(start.y, start.x) {
            return Some(pos);
        }
        let mut y = min.y;
        while y <= max.y {
            if let Some(pos) = walk(y, min.x) {
                return Some(pos);
            }
            y += self.config.ball.diameter;
        }
        None
    }

    // --- Simulation ---

    /// Advance one frame. Returns the outcome when a turn concluded this tick.
    /// A match that ended is re-racked immediately.
    pub fn tick(&mut self, sink: &mut dyn SoundSink) -> Option<TurnOutcome> {
        if self.phase != TurnPhase::BallsMoving {
            return None;
        }

        self.step_physics(sink);
        if self.is_balls_moving() {
            return None;
        }

        let outcome = self.conclude_turn();
        if outcome.game_over {
            self.start_new_match();
        }
        Some(outcome)
    }

    /// Run the current shot to rest and conclude the turn without re-racking
    /// a finished match, so the final table can still be inspected.
    pub fn settle_turn(&mut self, sink: &mut dyn SoundSink) -> Option<TurnOutcome> {
        if self.phase != TurnPhase::BallsMoving {
            return None;
        }

        let max_ticks = self.config.physics.max_settle_ticks;
        let mut ticks = 0;
        while self.is_balls_moving() && ticks < max_ticks {
            self.step_physics(sink);
            ticks += 1;
        }
        if self.is_balls_moving() {
            log::warn!("Shot still moving after {max_ticks} ticks, stopping all balls");
            for ball in &mut self.balls {
                ball.set_velocity(Vec2::ZERO);
            }
        }

        Some(self.conclude_turn())
    }

    /// One physics step: ball pairs, then cushions, movement and pockets
    fn step_physics(&mut self, sink: &mut dyn SoundSink) {
        let diameter = self.config.ball.diameter;
        let friction = self.config.physics.friction;
        let loss = self.config.physics.collision_loss;
        let min_velocity = self.config.ball.min_velocity;
        let max_speed = self.config.ai.max_power;

        let count = self.balls.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let (head, tail) = self.balls.split_at_mut(j);
                let (a, b) = (&mut head[i], &mut tail[0]);
                if let Some(impact) = resolve_ball_pair(a, b, diameter, loss) {
                    // Lower index wins between two object balls; the cue
                    // ball is index 0, so its contacts are seen first
                    let touched = if a.is_cue() { b.color } else { a.color };
                    self.turn.record_contact(touched);
                    sink.play(SoundEffect::BallCollision, impact_volume(impact, max_speed));
                }
            }
        }

        let (min, max) = self.config.table.bounds(self.config.ball.radius());
        let pockets = &self.config.table.pockets;
        let pocket_radius = self.config.table.pocket_radius;
        for (index, ball) in self.balls.iter_mut().enumerate() {
            if !ball.visible {
                continue;
            }

            if let Some(impact) = resolve_cushions(ball, min, max, friction, loss) {
                sink.play(SoundEffect::CushionHit, impact_volume(impact, max_speed));
            }
            ball.update(friction, min_velocity);

            if let Some(pocket) = pocket_containing(ball.pos, pockets, pocket_radius) {
                log::trace!("{:?} ball {index} dropped into pocket {pocket}", ball.color);
                sink.play(SoundEffect::Pocket, impact_volume(ball.vel.length(), max_speed));
                ball.hide();
                self.turn.record_pocketed(index);
            }
        }
    }

    /// Adjudicate the finished shot and hand the table to the next shooter
    pub fn conclude_turn(&mut self) -> TurnOutcome {
        let shooter = self.current_player;
        let pocketed: Vec<BallColor> = self
            .turn
            .pocketed
            .iter()
            .map(|&i| self.balls[i].color)
            .collect();
        let cue_pocketed = self.turn.pocketed.contains(&CUE_BALL);

        if !self.balls[CUE_BALL].visible {
            let spot = self
                .find_cue_spot(self.config.ai.placement_step)
                .unwrap_or(self.config.ball.cue_spot);
            self.balls[CUE_BALL].respot(spot);
        }

        referee::update_match_scores(&mut self.players, &self.balls);

        let at_shot = Player {
            match_score: self.turn.score_at_shot,
            ..self.players[shooter].clone()
        };
        let valid = referee::is_valid_turn(
            &at_shot,
            &self.players[shooter],
            self.turn.first_collided,
            &pocketed,
        );
        self.turn.is_valid = valid;

        if valid {
            if let Some(color) = referee::assign_groups(&mut self.players, shooter, &pocketed) {
                log::info!("Player {shooter} takes {color:?}");
                referee::update_match_scores(&mut self.players, &self.balls);
            }
        } else {
            log::debug!(
                "Foul by player {shooter}: first contact {:?}, pocketed {:?}",
                self.turn.first_collided,
                pocketed
            );
        }

        let game_over = referee::is_game_over(&self.balls, cue_pocketed, &self.players[shooter]);
        let winner = game_over.then(|| if valid { shooter } else { 1 - shooter });
        if let Some(winner) = winner {
            self.players[winner].overall_score += 1;
            log::info!("Player {winner} wins the match");
        }

        let next_player = if !valid || pocketed.is_empty() {
            1 - shooter
        } else {
            shooter
        };

        let outcome = TurnOutcome {
            shooter,
            valid,
            pocketed: pocketed.len(),
            game_over,
            winner,
            next_player,
        };

        self.current_player = next_player;
        self.turn = TurnState::new(!valid);
        self.phase = TurnPhase::Aiming;
        self.last_outcome = Some(outcome);
        outcome
    }

    // --- Snapshot ---

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            balls: self.balls.clone(),
            players: self.players.clone(),
            current_player: self.current_player,
            turn: self.turn.clone(),
            phase: self.phase,
            last_outcome: self.last_outcome,
            matches_played: self.matches_played,
        }
    }

    /// Overwrite all mutable state. Reuses existing allocations.
    pub fn restore(&mut self, snapshot: &WorldSnapshot) {
        self.balls.clone_from(&snapshot.balls);
        self.players.clone_from(&snapshot.players);
        self.current_player = snapshot.current_player;
        self.turn.clone_from(&snapshot.turn);
        self.phase = snapshot.phase;
        self.last_outcome = snapshot.last_outcome;
        self.matches_played = snapshot.matches_played;
    }

    pub fn from_snapshot(config: GameConfig, snapshot: &WorldSnapshot) -> Self {
        let mut world = Self::new(config);
        world.restore(snapshot);
        world
    }

    // --- Queries ---

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn cue_ball(&self) -> &Ball {
        &self.balls[CUE_BALL]
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn current_player(&self) -> usize {
        self.current_player
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn last_outcome(&self) -> Option<&TurnOutcome> {
        self.last_outcome.as_ref()
    }

    /// Completed matches since this world was created
    pub fn matches_played(&self) -> u32 {
        self.matches_played
    }

    pub fn is_ball_in_hand(&self) -> bool {
        self.turn.ball_in_hand
    }

    /// Validity of the most recently concluded turn (true before any shot)
    pub fn is_turn_valid(&self) -> bool {
        self.last_outcome.is_none_or(|o| o.valid)
    }

    pub fn is_game_over(&self) -> bool {
        referee::is_game_over(
            &self.balls,
            self.turn.pocketed.contains(&CUE_BALL),
            &self.players[self.current_player],
        )
    }

    pub fn is_balls_moving(&self) -> bool {
        self.balls.iter().any(|b| b.moving)
    }

    pub fn pocketed_this_turn(&self) -> usize {
        self.turn.pocketed.len()
    }
}
