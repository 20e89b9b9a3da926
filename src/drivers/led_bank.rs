use embedded_hal::digital::v2::OutputPin;

use crate::config::{LED_COUNT, LED_FIRST, LED_WIRING};
use crate::error::{Error, Result};

/// Map a logical LED number (as typed by the host) to its index in the
/// physically ordered pin array.
pub fn physical_index(logical: u8) -> Option<usize> {
    let slot = logical.checked_sub(LED_FIRST)? as usize;
    let bit = *LED_WIRING.get(slot)?;
    Some((bit - LED_FIRST) as usize)
}

/// Row of indicator LEDs driven as a one-hot selector.
///
/// `pins[k]` is the pin wired to board position `LED_FIRST + k`; all logical
/// to physical translation goes through [`physical_index`].
pub struct LedBank<P> {
    pins: [P; LED_COUNT],
    lit: Option<u8>,
}

impl<P: OutputPin> LedBank<P> {
    /// Take ownership of the pins and switch them all off
    pub fn new(pins: [P; LED_COUNT]) -> Result<Self> {
        let mut bank = Self { pins, lit: None };
        bank.set_all(false)?;
        Ok(bank)
    }

    /// Light the LED with the given logical number and turn the rest off
    pub fn select(&mut self, logical: u8) -> Result<()> {
        let target = physical_index(logical).ok_or(Error::Pin)?;
        for (idx, pin) in self.pins.iter_mut().enumerate() {
            let res = if idx == target {
                pin.set_high()
            } else {
                pin.set_low()
            };
            res.map_err(|_| Error::Pin)?;
        }
        self.lit = Some(logical);
        Ok(())
    }

    pub fn set_all(&mut self, state: bool) -> Result<()> {
        for pin in self.pins.iter_mut() {
            let res = if state { pin.set_high() } else { pin.set_low() };
            res.map_err(|_| Error::Pin)?;
        }
        self.lit = None;
        Ok(())
    }

    /// Logical number of the LED currently lit
    pub fn lit(&self) -> Option<u8> {
        self.lit
    }
}
