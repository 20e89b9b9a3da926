pub mod adc;
pub mod clock;
pub mod gpio;
pub mod uart;

// Re-export commonly used types
pub use adc::{Adc, Adc0, AdcPrescaler};
pub use clock::Timer0Clock;
pub use gpio::{led_pins, PortAPin};
pub use uart::Uart;
