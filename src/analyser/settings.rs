use crate::config::{DEFAULT_FRAME_LEN, FRAME_CAPACITY, SAMPLE_RATE_PRESETS};
use crate::error::{Error, Result};

/// The three build-time sample rates a host can pick from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatePreset {
    First,
    Second,
    Third,
}

impl RatePreset {
    pub const fn hz(self) -> u32 {
        match self {
            RatePreset::First => SAMPLE_RATE_PRESETS[0],
            RatePreset::Second => SAMPLE_RATE_PRESETS[1],
            RatePreset::Third => SAMPLE_RATE_PRESETS[2],
        }
    }
}

/// Frame geometry and sample rate used by the next acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    frame_length: usize,
    sample_rate: u32,
}

impl Settings {
    pub const fn new() -> Self {
        Self {
            frame_length: DEFAULT_FRAME_LEN,
            sample_rate: RatePreset::First.hz(),
        }
    }

    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Accepts any length the frame buffer can hold; callers outside the
    /// crate only reach this through the preset commands
    pub(crate) fn set_frame_length(&mut self, len: usize) -> Result<()> {
        if len == 0 || len > FRAME_CAPACITY {
            return Err(Error::FrameTooLong);
        }
        self.frame_length = len;
        Ok(())
    }

    pub fn select_rate(&mut self, preset: RatePreset) {
        self.sample_rate = preset.hz();
    }

    /// Time between sample starts, `round(1e6 / rate)` microseconds
    pub fn sampling_period_us(&self) -> u32 {
        (1_000_000 + self.sample_rate / 2) / self.sample_rate
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}
