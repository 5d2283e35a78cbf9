//! Error types for rejected commands and bad configuration

use std::path::PathBuf;

use thiserror::Error;

/// Why a cue-ball placement was refused. The world is left unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error("cue ball is not in hand")]
    NotBallInHand,
    #[error("balls are still moving")]
    BallsMoving,
    #[error("position ({x:.1}, {y:.1}) is outside the playing area")]
    OutOfBounds { x: f32, y: f32 },
    #[error("position is inside pocket {pocket}")]
    InPocket { pocket: usize },
    #[error("position overlaps ball {ball}")]
    Overlapping { ball: usize },
}

/// Configuration loading / validation failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
