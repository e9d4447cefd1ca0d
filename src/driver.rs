//! Step-rate driver
//!
//! Decouples simulation rate from frame rate: each rendered frame runs a whole
//! number of fixed ticks. Fast-forward and slow-motion scale that count;
//! pausing runs none. No wall-clock time ever reaches the simulation.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::consts::PLAYBACK_FACTOR;
use crate::sim::Simulation;

/// Playback speed selected for a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackSpeed {
    #[default]
    Normal,
    #[value(aliases = ["fast", "fast_forward"])]
    FastForward,
    #[value(aliases = ["slow", "slow_motion"])]
    SlowMotion,
}

impl PlaybackSpeed {
    /// Ticks to run this frame given the normal-speed count.
    /// Slow motion divides with truncation and may yield zero.
    pub fn ticks_per_frame(self, base: u32) -> u32 {
        match self {
            PlaybackSpeed::Normal => base,
            PlaybackSpeed::FastForward => base.saturating_mul(PLAYBACK_FACTOR),
            PlaybackSpeed::SlowMotion => base / PLAYBACK_FACTOR,
        }
    }
}

/// Per-frame playback controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameControls {
    pub paused: bool,
    pub speed: PlaybackSpeed,
}

impl FrameControls {
    pub fn running(speed: PlaybackSpeed) -> Self {
        Self {
            paused: false,
            speed,
        }
    }

    pub fn paused() -> Self {
        Self {
            paused: true,
            speed: PlaybackSpeed::Normal,
        }
    }
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Ticks actually run
    pub ticks: u32,
    /// Win flag after the frame
    pub won: bool,
}

/// Runs a configurable number of ticks per rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDriver {
    base_ticks_per_frame: u32,
}

impl StepDriver {
    pub fn new(base_ticks_per_frame: u32) -> Self {
        Self {
            base_ticks_per_frame,
        }
    }

    /// Ticks the given controls would run
    pub fn ticks_for(&self, controls: FrameControls) -> u32 {
        if controls.paused {
            0
        } else {
            controls.speed.ticks_per_frame(self.base_ticks_per_frame)
        }
    }

    /// Advance the simulation for one rendered frame
    pub fn advance(&self, sim: &mut Simulation, controls: FrameControls) -> FrameReport {
        let ticks = self.ticks_for(controls);
        for _ in 0..ticks {
            sim.step();
        }
        log::trace!("Frame ran {} ticks ({:?})", ticks, controls.speed);
        FrameReport {
            ticks,
            won: sim.is_won(),
        }
    }
}

impl Default for StepDriver {
    fn default() -> Self {
        Self::new(crate::consts::TICKS_PER_FRAME)
    }
}
