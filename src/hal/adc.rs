use avr_device::atmega128a::ADC;
use core::convert::Infallible;
use embedded_hal::adc::{Channel, OneShot};

use crate::config::ADC_CHANNEL;

const ADEN: u8 = 1 << 7;
const ADSC: u8 = 1 << 6;
const REFS_AVCC: u8 = 0x40;
const MUX_MASK: u8 = 0x1F;

#[derive(Clone, Copy)]
#[repr(u8)]
pub enum AdcPrescaler {
    Div2 = 1,
    Div4 = 2,
    Div8 = 3,
    Div16 = 4,
    Div32 = 5,
    Div64 = 6,
    Div128 = 7,
}

/// Single-ended microphone input, ADC0 (PF0) on the board
pub struct Adc0;

impl Channel<Adc> for Adc0 {
    type ID = u8;

    fn channel() -> u8 {
        ADC_CHANNEL
    }
}

/// 10-bit converter, AVCC reference, single conversions on demand
pub struct Adc {
    adc: ADC,
    converting: Option<u8>,
}

impl Adc {
    /// Div16 gives a 1 MHz conversion clock at 16 MHz, about 13 us per
    /// sample, which leaves room for the filter at the fastest rate preset.
    pub fn new(adc: ADC, prescaler: AdcPrescaler) -> Self {
        adc.admux.write(|w| unsafe { w.bits(REFS_AVCC) });
        adc.adcsra.write(|w| unsafe { w.bits(ADEN | prescaler as u8) });
        Self {
            adc,
            converting: None,
        }
    }

    fn start(&mut self, channel: u8) {
        self.adc
            .admux
            .modify(|r, w| unsafe { w.bits((r.bits() & !MUX_MASK) | (channel & MUX_MASK)) });
        self.adc.adcsra.modify(|r, w| unsafe { w.bits(r.bits() | ADSC) });
        self.converting = Some(channel);
    }

    fn busy(&self) -> bool {
        self.adc.adcsra.read().bits() & ADSC != 0
    }
}

impl<CH> OneShot<Adc, u16, CH> for Adc
where
    CH: Channel<Adc, ID = u8>,
{
    type Error = Infallible;

    fn read(&mut self, _pin: &mut CH) -> nb::Result<u16, Infallible> {
        let channel = CH::channel();
        match self.converting {
            Some(_) if self.busy() => Err(nb::Error::WouldBlock),
            Some(current) if current == channel => {
                self.converting = None;
                Ok(self.adc.adc.read().bits())
            }
            _ => {
                self.start(channel);
                Err(nb::Error::WouldBlock)
            }
        }
    }
}
