use core::marker::PhantomData;

use embedded_hal::adc::{Channel, OneShot};

use crate::error::{Error, Result};

/// Anything that yields one raw conversion per call
pub trait SampleSource {
    fn read_sample(&mut self) -> Result<u16>;
}

/// A single ADC channel bound to its converter.
///
/// Conversions are started and waited on with `nb::block!`; at the prescaler
/// the firmware uses this is a few tens of microseconds.
pub struct AnalogInput<ADC, A, CH> {
    adc: A,
    channel: CH,
    _adc: PhantomData<ADC>,
}

impl<ADC, A, CH> AnalogInput<ADC, A, CH>
where
    A: OneShot<ADC, u16, CH>,
    CH: Channel<ADC>,
{
    pub fn new(adc: A, channel: CH) -> Self {
        Self {
            adc,
            channel,
            _adc: PhantomData,
        }
    }
}

impl<ADC, A, CH> SampleSource for AnalogInput<ADC, A, CH>
where
    A: OneShot<ADC, u16, CH>,
    CH: Channel<ADC>,
{
    fn read_sample(&mut self) -> Result<u16> {
        nb::block!(self.adc.read(&mut self.channel)).map_err(|_| Error::Adc)
    }
}
