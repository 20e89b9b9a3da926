use embedded_hal::serial::{Read, Write};

use crate::error::{Error, Result};

/// Line-oriented console on top of a byte serial transport.
///
/// Implements [`ufmt::uWrite`] so diagnostics can be formatted with
/// `uwrite!` without pulling in `core::fmt`.
pub struct SerialConsole<S> {
    serial: S,
}

impl<S> SerialConsole<S>
where
    S: Read<u8> + Write<u8>,
{
    pub fn new(serial: S) -> Self {
        Self { serial }
    }

    /// Take the next received byte, if any. Never blocks.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        match self.serial.read() {
            Ok(byte) => Ok(Some(byte)),
            Err(nb::Error::WouldBlock) => Ok(None),
            Err(nb::Error::Other(_)) => Err(Error::Serial),
        }
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        nb::block!(self.serial.write(byte)).map_err(|_| Error::Serial)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    pub fn write_line(&mut self, s: &str) -> Result<()> {
        self.write_bytes(s.as_bytes())?;
        self.end_line()
    }

    pub fn end_line(&mut self) -> Result<()> {
        self.write_bytes(b"\r\n")
    }
}

impl<S> ufmt::uWrite for SerialConsole<S>
where
    S: Read<u8> + Write<u8>,
{
    type Error = Error;

    fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_bytes(s.as_bytes())
    }
}
