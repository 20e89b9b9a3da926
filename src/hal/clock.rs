//! Microsecond clock on Timer0

use avr_device::atmega128a::TC0;
use avr_device::interrupt::Mutex;
use core::cell::Cell;

use crate::analyser::MicrosClock;
use crate::config::CPU_FREQ_HZ;

// Timer0 clock select for clk/64 (Timer0 has its own prescaler table)
const CS_DIV64: u8 = 0b100;
const PRESCALER: u32 = 64;
const US_PER_TICK: u32 = PRESCALER * 1_000_000 / CPU_FREQ_HZ;
const TOIE0: u8 = 1 << 0;
const TOV0: u8 = 1 << 0;

static OVERFLOWS: Mutex<Cell<u32>> = Mutex::new(Cell::new(0));

/// Free-running counter, 4 us resolution at 16 MHz.
///
/// Wraps after 2^32 us, a little under 72 minutes of uptime.
pub struct Timer0Clock {
    tc0: TC0,
}

impl Timer0Clock {
    pub fn new(tc0: TC0) -> Self {
        tc0.tcnt0.write(|w| unsafe { w.bits(0) });
        tc0.tccr0.write(|w| unsafe { w.bits(CS_DIV64) });
        tc0.timsk.modify(|r, w| unsafe { w.bits(r.bits() | TOIE0) });
        Self { tc0 }
    }
}

impl MicrosClock for Timer0Clock {
    fn micros(&mut self) -> u32 {
        avr_device::interrupt::free(|cs| {
            let mut overflows = OVERFLOWS.borrow(cs).get();
            let count = self.tc0.tcnt0.read().bits();
            // Overflow pending but not yet serviced
            if self.tc0.tifr.read().bits() & TOV0 != 0 && count < 255 {
                overflows = overflows.wrapping_add(1);
            }
            ((overflows << 8) | count as u32).wrapping_mul(US_PER_TICK)
        })
    }
}

#[avr_device::interrupt(atmega128a)]
fn TIMER0_OVF() {
    avr_device::interrupt::free(|cs| {
        let overflows = OVERFLOWS.borrow(cs);
        overflows.set(overflows.get().wrapping_add(1));
    });
}
