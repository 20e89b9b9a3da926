#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]

#[cfg(target_arch = "avr")]
mod firmware {
    use avr_device::atmega128a::Peripherals;
    use panic_halt as _;

    use spectrum_analyser::drivers::{AnalogInput, LedBank, SerialConsole};
    use spectrum_analyser::hal::{led_pins, Adc, Adc0, AdcPrescaler, Timer0Clock, Uart};
    use spectrum_analyser::Analyser;

    #[avr_device::entry]
    fn main() -> ! {
        let dp = match Peripherals::take() {
            Some(dp) => dp,
            None => loop {},
        };

        let mut console = SerialConsole::new(Uart::new(dp.USART0));
        let input = AnalogInput::<Adc, _, _>::new(Adc::new(dp.ADC, AdcPrescaler::Div16), Adc0);
        let clock = Timer0Clock::new(dp.TC0);
        let leds = match LedBank::new(led_pins(dp.PORTA)) {
            Ok(leds) => leds,
            Err(_) => {
                console.write_line("Failed to initialize LEDs!").ok();
                loop {}
            }
        };

        // Enable interrupts globally
        unsafe { avr_device::interrupt::enable() };

        let mut analyser = Analyser::new(console, input, leds, clock);
        analyser.announce().ok();

        loop {
            if let Err(err) = analyser.run_cycle() {
                analyser.report(err);
            }
        }
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {
    eprintln!("spectrum_analyser firmware only runs on the ATmega128; build with an AVR target");
}
