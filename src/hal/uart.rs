use avr_device::atmega128a::USART0;
use avr_device::interrupt::Mutex;
use core::cell::RefCell;
use core::convert::Infallible;

use crate::config::{CPU_FREQ_HZ, UART_BAUD};

// Buffer size must be power of 2 for efficient masking
const BUFFER_SIZE: usize = 64;
const BUFFER_MASK: usize = BUFFER_SIZE - 1;

// Double-speed mode divisor, rounded to nearest
const UBRR: u16 = ((CPU_FREQ_HZ + 4 * UART_BAUD) / (8 * UART_BAUD) - 1) as u16;

const RXC: u8 = 1 << 7;
const UDRE: u8 = 1 << 5;
const U2X: u8 = 1 << 1;
const RXCIE: u8 = 1 << 7;
const RXEN: u8 = 1 << 4;
const TXEN: u8 = 1 << 3;
const UCSZ_8BIT: u8 = 0b11 << 1;

struct Buffer {
    data: [u8; BUFFER_SIZE],
    write_idx: usize,
    read_idx: usize,
}

impl Buffer {
    const fn new() -> Self {
        Self {
            data: [0; BUFFER_SIZE],
            write_idx: 0,
            read_idx: 0,
        }
    }

    // Drops the byte when full
    fn write(&mut self, byte: u8) -> bool {
        let next_write = (self.write_idx + 1) & BUFFER_MASK;
        if next_write != self.read_idx {
            self.data[self.write_idx] = byte;
            self.write_idx = next_write;
            true
        } else {
            false
        }
    }

    fn read(&mut self) -> Option<u8> {
        if self.read_idx != self.write_idx {
            let byte = self.data[self.read_idx];
            self.read_idx = (self.read_idx + 1) & BUFFER_MASK;
            Some(byte)
        } else {
            None
        }
    }
}

// Filled by the receive interrupt so commands typed during a frame survive
static RX_BUFFER: Mutex<RefCell<Buffer>> = Mutex::new(RefCell::new(Buffer::new()));

/// USART0 at [`UART_BAUD`], 8N1.
///
/// Reception is interrupt driven into a ring buffer; transmission polls the
/// data register directly.
pub struct Uart {
    usart: USART0,
}

impl Uart {
    pub fn new(usart: USART0) -> Self {
        usart.ubrr0h.write(|w| unsafe { w.bits((UBRR >> 8) as u8) });
        usart.ubrr0l.write(|w| unsafe { w.bits(UBRR as u8) });
        usart.ucsr0a.write(|w| unsafe { w.bits(U2X) });
        usart.ucsr0c.write(|w| unsafe { w.bits(UCSZ_8BIT) });
        usart.ucsr0b.write(|w| unsafe { w.bits(RXCIE | RXEN | TXEN) });

        Self { usart }
    }
}

impl embedded_hal::serial::Read<u8> for Uart {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        avr_device::interrupt::free(|cs| RX_BUFFER.borrow(cs).borrow_mut().read())
            .ok_or(nb::Error::WouldBlock)
    }
}

impl embedded_hal::serial::Write<u8> for Uart {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        if self.usart.ucsr0a.read().bits() & UDRE == 0 {
            return Err(nb::Error::WouldBlock);
        }
        self.usart.udr0.write(|w| unsafe { w.bits(byte) });
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        if self.usart.ucsr0a.read().bits() & UDRE == 0 {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }
}

#[avr_device::interrupt(atmega128a)]
fn USART0_RX() {
    // SAFETY: only the data and status registers are touched, the ISR owns
    // the read side of the receiver
    let usart = unsafe { &*USART0::ptr() };
    while usart.ucsr0a.read().bits() & RXC != 0 {
        let byte = usart.udr0.read().bits();
        avr_device::interrupt::free(|cs| {
            RX_BUFFER.borrow(cs).borrow_mut().write(byte);
        });
    }
}
