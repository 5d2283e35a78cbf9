//! Command capability
//!
//! Whatever drives a player (mouse and cue stick, a network peer, the AI)
//! hands the world `Command`s through an `InputSource`.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::World;

/// Inbound commands accepted by the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Strike the cue ball. Ignored unless `power > 0`.
    Shoot { power: f32, rotation: f32 },
    /// Move the cue ball while it is in hand
    PlaceCueBall(Vec2),
}

/// Produces commands for the player whose turn it is
pub trait InputSource {
    /// Called while the world is waiting for a shot. `None` means "not yet".
    fn next_command(&mut self, world: &World) -> Option<Command>;
}

/// Replays a fixed list of commands, one per call
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    commands: VecDeque<Command>,
}

impl ScriptedInput {
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn next_command(&mut self, _world: &World) -> Option<Command> {
        self.commands.pop_front()
    }
}
