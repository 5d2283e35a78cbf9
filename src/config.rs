//! Game configuration
//!
//! Everything the simulation is tuned by: table geometry, ball geometry,
//! physics constants and AI weights. Loaded from JSON; any field left out
//! falls back to the stock value.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::BallColor;

/// Table geometry (pixels)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Full table width including cushions
    pub width: f32,
    /// Full table height including cushions
    pub height: f32,
    /// Cushion thickness on every side
    pub cushion_width: f32,
    /// Pocket centers
    pub pockets: Vec<Vec2>,
    pub pocket_radius: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            width: 1500.0,
            height: 825.0,
            cushion_width: 57.0,
            pockets: vec![
                Vec2::new(62.0, 62.0),
                Vec2::new(750.0, 32.0),
                Vec2::new(1438.0, 62.0),
                Vec2::new(62.0, 763.0),
                Vec2::new(750.0, 793.0),
                Vec2::new(1438.0, 763.0),
            ],
            pocket_radius: 46.0,
        }
    }
}

impl TableConfig {
    /// Range a ball center of the given radius may occupy (min, max corners)
    pub fn bounds(&self, ball_radius: f32) -> (Vec2, Vec2) {
        let inset = self.cushion_width + ball_radius;
        (
            Vec2::new(inset, inset),
            Vec2::new(self.width - inset, self.height - inset),
        )
    }
}

/// Ball geometry and starting layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    pub diameter: f32,
    /// Speed (px/tick) below which a ball is snapped to rest
    pub min_velocity: f32,
    /// Where the cue ball starts and is re-spotted
    pub cue_spot: Vec2,
    /// Rack apex (ball nearest the cue ball)
    pub rack_apex: Vec2,
    /// Extra space between racked balls so the rack does not start in contact
    pub rack_gap: f32,
    /// Colours of the 15 racked balls, row by row from the apex
    pub rack_colors: Vec<BallColor>,
}

impl Default for BallConfig {
    fn default() -> Self {
        use BallColor::{Black, Red, Yellow};
        Self {
            diameter: 38.0,
            min_velocity: 0.05,
            cue_spot: Vec2::new(413.0, 412.5),
            rack_apex: Vec2::new(1022.0, 412.5),
            rack_gap: 1.0,
            rack_colors: vec![
                Red, // apex
                Yellow, Red,
                Red, Black, Yellow, // black in the middle of row 3
                Yellow, Red, Yellow, Red,
                Red, Yellow, Red, Yellow, Yellow,
            ],
        }
    }
}

impl BallConfig {
    pub fn radius(&self) -> f32 {
        self.diameter / 2.0
    }

    /// Triangle rack positions, apex pointing at the cue ball, rows spreading right
    pub fn rack_positions(&self) -> Vec<Vec2> {
        let gap = self.diameter + self.rack_gap;
        let row_offset = gap * 0.866; // sqrt(3)/2

        let mut positions = Vec::with_capacity(15);
        for row in 0..5 {
            for slot in 0..=row {
                let v_offset = slot as f32 - row as f32 / 2.0;
                positions.push(Vec2::new(
                    self.rack_apex.x + row as f32 * row_offset,
                    self.rack_apex.y + v_offset * gap,
                ));
            }
        }
        positions
    }
}

/// Per-tick physics constants (not time-scaled)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fraction of velocity lost every tick
    pub friction: f32,
    /// Fraction of velocity lost on every ball or cushion impact
    pub collision_loss: f32,
    /// Hard cap on ticks when settling a simulated shot
    pub max_settle_ticks: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            friction: 0.018,
            collision_loss: 0.018,
            max_settle_ticks: 20_000,
        }
    }
}

/// Computer opponent search and scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Candidates simulated per decision
    pub iterations: usize,
    pub min_power: f32,
    pub max_power: f32,
    /// Max power offset when mutating the best candidate
    pub power_variance: f32,
    /// Scale of the rotation offset (divided by the best evaluation)
    pub rotation_variance: f32,
    /// Cue-ball walk step when placing a ball in hand
    pub placement_step: f32,
    pub ball_distance_weight: f32,
    pub valid_turn_bonus: f32,
    pub pocketed_ball_bonus: f32,
    pub win_bonus: f32,
    pub invalid_turn_penalty: f32,
    pub loss_penalty: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            min_power: 5.0,
            max_power: 30.0,
            power_variance: 5.0,
            rotation_variance: 1.0,
            placement_step: 5.0,
            ball_distance_weight: 0.0001,
            valid_turn_bonus: 10.0,
            pocketed_ball_bonus: 25.0,
            win_bonus: 1000.0,
            invalid_turn_penalty: 30.0,
            loss_penalty: 1000.0,
        }
    }
}

/// Complete configuration handed to a `World`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub table: TableConfig,
    pub ball: BallConfig,
    pub physics: PhysicsConfig,
    pub ai: AiConfig,
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject configurations the simulation cannot run sensibly
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        let (min, max) = self.table.bounds(self.ball.radius());
        if self.ball.diameter <= 0.0 {
            return invalid(format!("ball diameter must be positive, got {}", self.ball.diameter));
        }
        if min.x >= max.x || min.y >= max.y {
            return invalid("table is too small for its cushions and balls".into());
        }
        if self.table.pockets.is_empty() || self.table.pocket_radius <= 0.0 {
            return invalid("table needs at least one pocket with a positive radius".into());
        }
        if self.ball.min_velocity <= 0.0 {
            return invalid("min_velocity must be positive".into());
        }
        for (name, value) in [
            ("friction", self.physics.friction),
            ("collision_loss", self.physics.collision_loss),
        ] {
            if !(0.0..1.0).contains(&value) {
                return invalid(format!("{name} must be in [0, 1), got {value}"));
            }
        }
        if self.physics.friction == 0.0 {
            return invalid("friction must be non-zero so balls come to rest".into());
        }
        if self.ai.iterations == 0 {
            return invalid("ai.iterations must be at least 1".into());
        }
        if !(0.0 < self.ai.min_power && self.ai.min_power < self.ai.max_power) {
            return invalid(format!(
                "ai power range must satisfy 0 < min < max, got {}..{}",
                self.ai.min_power, self.ai.max_power
            ));
        }
        for (name, value) in [
            ("ai.power_variance", self.ai.power_variance),
            ("ai.rotation_variance", self.ai.rotation_variance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{name} must be finite and non-negative, got {value}"));
            }
        }
        if self.ai.placement_step <= 0.0 {
            return invalid("ai.placement_step must be positive".into());
        }

        let colors = &self.ball.rack_colors;
        let count = |c: BallColor| colors.iter().filter(|&&x| x == c).count();
        if colors.len() != 15
            || count(BallColor::Red) != 7
            || count(BallColor::Yellow) != 7
            || count(BallColor::Black) != 1
        {
            return invalid("rack must hold 7 red, 7 yellow and 1 black ball".into());
        }

        let in_bounds = |p: Vec2| p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y;
        if !in_bounds(self.ball.cue_spot) {
            return invalid("cue_spot lies outside the playing area".into());
        }
        if !self.ball.rack_positions().into_iter().all(in_bounds) {
            return invalid("rack does not fit inside the playing area".into());
        }

        Ok(())
    }
}
