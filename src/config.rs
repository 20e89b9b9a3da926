//! Build-time configuration for the spectrum analyser firmware

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate. One-byte samples at 9 kHz need at least 90 kbit/s.
pub const UART_BAUD: u32 = 230_400;

/// Capacity of the preallocated frame buffer, in samples
pub const FRAME_CAPACITY: usize = 1024;

/// Frame lengths selectable with the `a`..`d` commands
pub const FRAME_LEN_PRESETS: [usize; 4] = [256, 512, 800, 1024];

/// Frame length after power-on
pub const DEFAULT_FRAME_LEN: usize = FRAME_CAPACITY;

/// Sample rates in Hz selectable with the `0`, `8` and `9` commands.
/// The first entry is the power-on rate.
pub const SAMPLE_RATE_PRESETS: [u32; 3] = [4_000, 7_000, 9_000];

/// Pole of the DC-blocking filter
pub const FILTER_DECAY: f32 = 0.995;

/// Filtered samples are clipped to +/- this value before narrowing to `i8`
pub const SAMPLE_CLIP: f32 = 127.0;

/// ADC input the microphone is wired to
pub const ADC_CHANNEL: u8 = 0;

/// Number of indicator LEDs
pub const LED_COUNT: usize = 5;

/// Lowest LED identifier, both as command digit and as PORTA bit
pub const LED_FIRST: u8 = 3;

/// Physical PORTA bit for each logical LED, indexed by `logical - LED_FIRST`.
/// LEDs 6 and 7 are mounted the wrong way round on the board.
pub const LED_WIRING: [u8; LED_COUNT] = [3, 4, 5, 7, 6];

const _: () = {
    let mut i = 0;
    while i < FRAME_LEN_PRESETS.len() {
        assert!(FRAME_LEN_PRESETS[i] > 0 && FRAME_LEN_PRESETS[i] <= FRAME_CAPACITY);
        i += 1;
    }
    assert!(DEFAULT_FRAME_LEN > 0 && DEFAULT_FRAME_LEN <= FRAME_CAPACITY);

    let mut j = 0;
    while j < SAMPLE_RATE_PRESETS.len() {
        assert!(SAMPLE_RATE_PRESETS[j] > 0 && SAMPLE_RATE_PRESETS[j] <= 1_000_000);
        j += 1;
    }

    let mut k = 0;
    while k < LED_COUNT {
        let bit = LED_WIRING[k];
        assert!(bit >= LED_FIRST && bit < LED_FIRST + LED_COUNT as u8);
        k += 1;
    }
};
