//! Error type shared by the drivers and the acquisition engine

/// Failures reported by the peripherals behind the engine.
///
/// Host commands never fail; an unknown byte is answered, not escalated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Serial transport rejected a read or write
    Serial,
    /// Analog conversion failed
    Adc,
    /// An indicator LED could not be driven
    Pin,
    /// Requested frame length is zero or exceeds the frame buffer
    FrameTooLong,
}

impl Error {
    /// Short name used in diagnostic lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Error::Serial => "serial",
            Error::Adc => "adc",
            Error::Pin => "pin",
            Error::FrameTooLong => "frame too long",
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
