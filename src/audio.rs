//! Sound capability
//!
//! The simulation never talks to an audio device. It reports impacts to a
//! `SoundSink` supplied by the host; the AI's private simulations use
//! `Silent`.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Two balls hit each other
    BallCollision,
    /// Ball bounced off a cushion
    CushionHit,
    /// Ball dropped into a pocket
    Pocket,
}

/// Receives sound events from the simulation
pub trait SoundSink {
    /// `volume` is in [0, 1], derived from impact speed
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl SoundSink for Silent {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
}

/// Keeps every event, for tests and replays
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub events: Vec<(SoundEffect, f32)>,
}

impl Recorder {
    pub fn count(&self, effect: SoundEffect) -> usize {
        self.events.iter().filter(|(e, _)| *e == effect).count()
    }
}

impl SoundSink for Recorder {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        self.events.push((effect, volume));
    }
}

/// Map an impact speed (px/tick) to a playback volume
#[inline]
pub fn impact_volume(speed: f32, max_speed: f32) -> f32 {
    if max_speed <= 0.0 {
        return 0.0;
    }
    (speed / max_speed).clamp(0.0, 1.0)
}
