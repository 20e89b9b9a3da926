//! Single-byte host commands
//!
//! | byte        | effect                              |
//! |-------------|-------------------------------------|
//! | `a` .. `d`  | frame length 256 / 512 / 800 / 1024 |
//! | `0`         | first sample rate preset            |
//! | `1`, `2`    | mode by ordinal                     |
//! | `3` .. `7`  | light that LED, others off          |
//! | `8`, `9`    | second / third sample rate preset   |

use super::settings::RatePreset;
use super::Mode;
use crate::config::FRAME_LEN_PRESETS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    FrameLength(usize),
    SampleRate(RatePreset),
    SetMode(Mode),
    /// Logical LED number
    SelectLed(u8),
    Unknown(u8),
}

const LETTERS: [(u8, usize); 4] = [
    (b'a', FRAME_LEN_PRESETS[0]),
    (b'b', FRAME_LEN_PRESETS[1]),
    (b'c', FRAME_LEN_PRESETS[2]),
    (b'd', FRAME_LEN_PRESETS[3]),
];

const DIGITS: [Command; 10] = [
    Command::SampleRate(RatePreset::First),
    Command::SetMode(Mode::SpectralAnalysis),
    Command::SetMode(Mode::AudioStream),
    Command::SelectLed(3),
    Command::SelectLed(4),
    Command::SelectLed(5),
    Command::SelectLed(6),
    Command::SelectLed(7),
    Command::SampleRate(RatePreset::Second),
    Command::SampleRate(RatePreset::Third),
];

impl Command {
    pub fn decode(byte: u8) -> Self {
        if byte.is_ascii_digit() {
            return DIGITS[(byte - b'0') as usize];
        }
        LETTERS
            .iter()
            .find(|(letter, _)| *letter == byte)
            .map(|&(_, len)| Command::FrameLength(len))
            .unwrap_or(Command::Unknown(byte))
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Command::Unknown(_))
    }
}
