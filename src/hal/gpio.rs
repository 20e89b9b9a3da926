use avr_device::atmega128a::PORTA;
use core::convert::Infallible;
use embedded_hal::digital::v2::OutputPin;

use crate::config::{LED_COUNT, LED_FIRST};

/// One PORTA bit configured as a push-pull output.
///
/// Holds only the bit mask; every access is a read-modify-write of PORTA
/// inside a critical section.
pub struct PortAPin {
    mask: u8,
}

impl OutputPin for PortAPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        avr_device::interrupt::free(|_| unsafe {
            (*PORTA::ptr()).porta.modify(|r, w| w.bits(r.bits() & !self.mask));
        });
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        avr_device::interrupt::free(|_| unsafe {
            (*PORTA::ptr()).porta.modify(|r, w| w.bits(r.bits() | self.mask));
        });
        Ok(())
    }
}

/// Split off the LED row PA3..PA7 as outputs, in board order
pub fn led_pins(port: PORTA) -> [PortAPin; LED_COUNT] {
    let pins: [PortAPin; LED_COUNT] =
        core::array::from_fn(|k| PortAPin { mask: 1 << (LED_FIRST + k as u8) });
    let ddr = pins.iter().fold(0u8, |acc, pin| acc | pin.mask);
    port.ddra.modify(|r, w| unsafe { w.bits(r.bits() | ddr) });
    pins
}
