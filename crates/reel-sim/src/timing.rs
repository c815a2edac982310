//! Spin animation timing
//!
//! The core never sleeps. A shell calls [`SpinAnimation::tick`] once per
//! animation frame (every `frame_interval_ms` in real time, or as fast as it
//! likes in a headless run) and settles the spin when the animation reports
//! [`AnimationStep::Complete`].

use serde::{Deserialize, Serialize};

/// Timing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingProfile {
    /// Reference timing: 3 s spin at 50 ms frames
    Normal,
    /// Short spin
    Turbo,
    /// No animation; settles on the first tick
    Instant,
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self::Normal
    }
}

/// Detailed timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Profile type
    pub profile: TimingProfile,
    /// Total spin animation length (ms)
    pub spin_duration_ms: u32,
    /// Interval between animation frames (ms)
    pub frame_interval_ms: u32,
}

impl TimingConfig {
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            spin_duration_ms: 3000,
            frame_interval_ms: 50,
        }
    }

    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            spin_duration_ms: 1000,
            frame_interval_ms: 50,
        }
    }

    pub fn instant() -> Self {
        Self {
            profile: TimingProfile::Instant,
            spin_duration_ms: 0,
            frame_interval_ms: 0,
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Instant => Self::instant(),
        }
    }

    /// Number of ticks until the spin completes
    pub fn total_ticks(&self) -> u32 {
        if self.frame_interval_ms == 0 {
            return 0;
        }
        self.spin_duration_ms / self.frame_interval_ms
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

/// Result of one animation tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStep {
    /// Intermediate frame (1-based frame number)
    Frame(u32),
    /// Animation finished; the spin should settle now
    Complete,
}

/// Tick counter for one spin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinAnimation {
    total_ticks: u32,
    current_tick: u32,
}

impl SpinAnimation {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            total_ticks: timing.total_ticks(),
            current_tick: 0,
        }
    }

    /// Advance one frame
    pub fn tick(&mut self) -> AnimationStep {
        self.current_tick = self.current_tick.saturating_add(1);
        if self.current_tick >= self.total_ticks {
            AnimationStep::Complete
        } else {
            AnimationStep::Frame(self.current_tick)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_tick >= self.total_ticks
    }

    pub fn current_tick(&self) -> u32 {
        self.current_tick
    }

    pub fn total_ticks(&self) -> u32 {
        self.total_ticks
    }

    /// Fraction of the animation played, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.total_ticks == 0 {
            return 1.0;
        }
        (self.current_tick as f64 / self.total_ticks as f64).min(1.0)
    }
}
