//! Ball entity: motion, friction and visibility

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::polar_to_cartesian;

/// Ball colours. Red and yellow are the two groups players are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallColor {
    White,
    Black,
    Red,
    Yellow,
}

impl BallColor {
    /// True for the two assignable groups
    pub fn is_group(self) -> bool {
        matches!(self, BallColor::Red | BallColor::Yellow)
    }

    /// The other group colour (white and black have none)
    pub fn complement(self) -> Option<BallColor> {
        match self {
            BallColor::Red => Some(BallColor::Yellow),
            BallColor::Yellow => Some(BallColor::Red),
            BallColor::White | BallColor::Black => None,
        }
    }
}

/// A ball on the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub color: BallColor,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Cleared when pocketed; hidden balls take no part in the simulation
    pub visible: bool,
    /// Mirrors `vel != 0` and is kept in sync by every mutator
    pub moving: bool,
}

impl Ball {
    pub fn new(color: BallColor, pos: Vec2) -> Self {
        Self {
            color,
            pos,
            vel: Vec2::ZERO,
            visible: true,
            moving: false,
        }
    }

    pub fn is_cue(&self) -> bool {
        self.color == BallColor::White
    }

    /// Strike the ball. Power is the initial speed in px/tick.
    pub fn shoot(&mut self, power: f32, angle: f32) {
        self.set_velocity(polar_to_cartesian(power, angle));
    }

    /// Replace the velocity, keeping `moving` consistent
    pub fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
        self.moving = vel != Vec2::ZERO;
    }

    /// Advance one tick. Friction is applied before the displacement.
    pub fn update(&mut self, friction: f32, min_velocity: f32) {
        if !self.moving {
            return;
        }

        self.vel *= 1.0 - friction;
        self.pos += self.vel;

        if self.vel.length() < min_velocity {
            self.vel = Vec2::ZERO;
            self.moving = false;
        }
    }

    /// Take the ball off the table (pocketed)
    pub fn hide(&mut self) {
        self.visible = false;
        self.vel = Vec2::ZERO;
        self.moving = false;
    }

    /// Put the ball back at rest at `pos`
    pub fn respot(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.moving = false;
        self.visible = true;
    }
}
