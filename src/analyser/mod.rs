//! Sampling and command engine
//!
//! One cycle is: poll at most one command byte, acquire a full frame with
//! busy-wait timing, then stream the frame if the host asked for audio.
//! Configuration only changes between frames.

pub mod command;
pub mod filter;
pub mod frame;
pub mod settings;
pub mod timing;

use embedded_hal::digital::v2::OutputPin;
use embedded_hal::serial::{Read, Write};
use ufmt::uwrite;

pub use command::Command;
pub use filter::{clip_sample, DcBlocker};
pub use frame::Frame;
pub use settings::{RatePreset, Settings};
pub use timing::{wait_period, MicrosClock};

use crate::config::FILTER_DECAY;
use crate::drivers::{LedBank, SampleSource, SerialConsole};
use crate::error::Result;

/// Operating mode, numbered as the host selects it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    /// Power-on state, nothing is transmitted
    Setup = 0,
    /// Reserved for transform output, nothing is transmitted yet
    SpectralAnalysis = 1,
    /// Every frame is written to the serial link
    AudioStream = 2,
}

pub struct Analyser<S, I, P, C> {
    console: SerialConsole<S>,
    input: I,
    leds: LedBank<P>,
    clock: C,
    mode: Mode,
    settings: Settings,
    filter: DcBlocker,
    frame: Frame,
}

impl<S, I, P, C> Analyser<S, I, P, C>
where
    S: Read<u8> + Write<u8>,
    I: SampleSource,
    P: OutputPin,
    C: MicrosClock,
{
    pub fn new(console: SerialConsole<S>, input: I, leds: LedBank<P>, clock: C) -> Self {
        Self {
            console,
            input,
            leds,
            clock,
            mode: Mode::Setup,
            settings: Settings::new(),
            filter: DcBlocker::new(FILTER_DECAY),
            frame: Frame::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn leds(&self) -> &LedBank<P> {
        &self.leds
    }

    #[cfg(test)]
    pub(crate) fn set_frame_length(&mut self, len: usize) -> Result<()> {
        self.settings.set_frame_length(len)
    }

    /// Startup banner; the host reads frame geometry from these lines
    pub fn announce(&mut self) -> Result<()> {
        self.console.write_line("Setup Complete")?;
        uwrite!(self.console, "Sample no: {}", self.settings.frame_length())?;
        self.console.end_line()?;
        uwrite!(self.console, "Sample freq: {}", self.settings.sample_rate())?;
        self.console.end_line()
    }

    /// Run one full cycle: command, acquisition, output
    pub fn run_cycle(&mut self) -> Result<()> {
        self.poll_command()?;
        self.acquire_frame()?;
        if self.mode == Mode::SpectralAnalysis {
            self.compute_spectrum();
        }
        self.emit_frame()
    }

    /// Handle at most one pending command byte. Returns the decoded command,
    /// or `None` when nothing was waiting.
    pub fn poll_command(&mut self) -> Result<Option<Command>> {
        let byte = match self.console.read_byte()? {
            Some(byte) => byte,
            None => return Ok(None),
        };

        let command = Command::decode(byte);
        match command {
            Command::FrameLength(len) => self.settings.set_frame_length(len)?,
            Command::SampleRate(preset) => self.settings.select_rate(preset),
            Command::SetMode(mode) => self.mode = mode,
            Command::SelectLed(logical) => self.leds.select(logical)?,
            Command::Unknown(_) => {}
        }

        if command.is_known() {
            self.console.write_bytes(b"Received: ")?;
            self.console.write_byte(byte)?;
            self.console.end_line()?;
        } else {
            self.console.write_line("Command Not Found")?;
        }

        #[cfg(feature = "debug")]
        match command {
            Command::FrameLength(len) => self.debug("frame", len as u32)?,
            Command::SampleRate(_) => self.debug("period us", self.settings.sampling_period_us())?,
            _ => {}
        }

        Ok(Some(command))
    }

    /// Fill the frame with `frame_length` filtered samples, one per sampling
    /// period. Blocks for the whole frame.
    pub fn acquire_frame(&mut self) -> Result<()> {
        let period = self.settings.sampling_period_us();
        let slots = self.frame.begin(self.settings.frame_length())?;

        for slot in slots.iter_mut() {
            let start = self.clock.micros();
            let raw = self.input.read_sample()?;
            *slot = clip_sample(self.filter.tick(raw));
            wait_period(&mut self.clock, start, period);
        }
        Ok(())
    }

    /// Frequency-domain stage for `SpectralAnalysis`; nothing to do until a
    /// transform is fitted.
    pub fn compute_spectrum(&mut self) {}

    /// Write the last frame verbatim when streaming audio
    pub fn emit_frame(&mut self) -> Result<()> {
        if self.mode != Mode::AudioStream {
            return Ok(());
        }
        for byte in self.frame.bytes() {
            self.console.write_byte(byte)?;
        }
        Ok(())
    }

    // Print formatted debug info
    #[cfg(feature = "debug")]
    fn debug(&mut self, msg: &str, val: u32) -> Result<()> {
        uwrite!(self.console, "[DBG] {}: {}", msg, val)?;
        self.console.end_line()
    }

    /// Print a failed cycle and carry on. Best effort: if the link itself
    /// failed there is nowhere left to report to.
    pub fn report(&mut self, err: crate::error::Error) {
        uwrite!(self.console, "Error: {}", err.as_str()).ok();
        self.console.end_line().ok();
    }
}

#[cfg(test)]
mod tests;
