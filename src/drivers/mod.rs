pub mod analog_input;
pub mod led_bank;
pub mod serial_console;

pub use analog_input::{AnalogInput, SampleSource};
pub use led_bank::LedBank;
pub use serial_console::SerialConsole;
