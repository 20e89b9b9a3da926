use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use super::timing::tests::SteppingClock;
use super::*;
use crate::config::{FRAME_LEN_PRESETS, LED_COUNT};
use crate::error::Error;

#[derive(Default)]
struct LinkState {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
}

/// Serial link with a host-side handle for scripting input and reading output
#[derive(Clone, Default)]
struct Link(Rc<RefCell<LinkState>>);

impl Link {
    fn send(&self, bytes: &[u8]) {
        self.0.borrow_mut().rx.extend(bytes.iter().copied());
    }

    fn pending(&self) -> usize {
        self.0.borrow().rx.len()
    }

    fn take_output(&self) -> Vec<u8> {
        core::mem::take(&mut self.0.borrow_mut().tx)
    }
}

impl Read<u8> for Link {
    type Error = Infallible;

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        self.0.borrow_mut().rx.pop_front().ok_or(nb::Error::WouldBlock)
    }
}

impl Write<u8> for Link {
    type Error = Infallible;

    fn write(&mut self, word: u8) -> nb::Result<(), Infallible> {
        self.0.borrow_mut().tx.push(word);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        Ok(())
    }
}

#[derive(Clone)]
struct FakePin(Rc<Cell<bool>>);

impl OutputPin for FakePin {
    type Error = Infallible;

    fn set_low(&mut self) -> core::result::Result<(), Infallible> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Infallible> {
        self.0.set(true);
        Ok(())
    }
}

/// Replays a fixed list of conversions, repeating the last one
struct ScriptedInput {
    samples: Vec<u16>,
    next: usize,
}

impl SampleSource for ScriptedInput {
    fn read_sample(&mut self) -> Result<u16> {
        let idx = self.next.min(self.samples.len() - 1);
        self.next += 1;
        Ok(self.samples[idx])
    }
}

struct DeadInput;

impl SampleSource for DeadInput {
    fn read_sample(&mut self) -> Result<u16> {
        Err(Error::Adc)
    }
}

type TestAnalyser<I> = Analyser<Link, I, FakePin, SteppingClock>;

struct Rig<I> {
    analyser: TestAnalyser<I>,
    link: Link,
    levels: Vec<Rc<Cell<bool>>>,
}

impl<I: SampleSource> Rig<I> {
    fn with_input(input: I) -> Self {
        let link = Link::default();
        let levels: Vec<Rc<Cell<bool>>> = (0..LED_COUNT).map(|_| Rc::new(Cell::new(true))).collect();
        let pins: Vec<FakePin> = levels.iter().map(|l| FakePin(l.clone())).collect();
        let pins: [FakePin; LED_COUNT] = pins.try_into().ok().unwrap();

        let analyser = Analyser::new(
            SerialConsole::new(link.clone()),
            input,
            LedBank::new(pins).unwrap(),
            SteppingClock::new(0, 1),
        );
        Self { analyser, link, levels }
    }

    /// Pin levels in board order, positions 3..=7
    fn levels(&self) -> Vec<bool> {
        self.levels.iter().map(|l| l.get()).collect()
    }

    fn command(&mut self, byte: u8) -> Command {
        self.link.send(&[byte]);
        self.analyser.poll_command().unwrap().unwrap()
    }
}

fn rig(samples: &[u16]) -> Rig<ScriptedInput> {
    Rig::with_input(ScriptedInput {
        samples: samples.to_vec(),
        next: 0,
    })
}

#[test]
fn announces_frame_geometry() {
    let mut rig = rig(&[0]);
    rig.analyser.announce().unwrap();
    assert_eq!(
        rig.link.take_output(),
        b"Setup Complete\r\nSample no: 1024\r\nSample freq: 4000\r\n"
    );
}

#[test]
fn starts_idle_with_leds_off() {
    let rig = rig(&[0]);
    assert_eq!(rig.analyser.mode(), Mode::Setup);
    assert_eq!(rig.analyser.settings().frame_length(), 1024);
    assert_eq!(rig.analyser.settings().sample_rate(), 4000);
    assert_eq!(rig.levels(), [false; LED_COUNT]);
}

#[test]
fn poll_without_input_does_nothing() {
    let mut rig = rig(&[0]);
    assert_eq!(rig.analyser.poll_command(), Ok(None));
    assert!(rig.link.take_output().is_empty());
    assert_eq!(rig.analyser.mode(), Mode::Setup);
}

#[test]
fn consumes_one_byte_per_poll() {
    let mut rig = rig(&[0]);
    rig.link.send(b"29");

    assert_eq!(rig.analyser.poll_command(), Ok(Some(Command::SetMode(Mode::AudioStream))));
    assert_eq!(rig.link.pending(), 1);
    assert_eq!(rig.analyser.settings().sample_rate(), 4000);

    rig.analyser.poll_command().unwrap();
    assert_eq!(rig.link.pending(), 0);
    assert_eq!(rig.analyser.settings().sample_rate(), 9000);
}

#[test]
fn letter_sets_frame_length_and_echoes() {
    let mut rig = rig(&[0]);
    rig.command(b'b');
    assert_eq!(rig.analyser.settings().frame_length(), 512);
    assert_eq!(rig.link.take_output(), b"Received: b\r\n");

    rig.command(b'c');
    assert_eq!(rig.analyser.settings().frame_length(), 800);
}

#[test]
fn rate_digits_pick_presets() {
    let mut rig = rig(&[0]);
    rig.command(b'8');
    assert_eq!(rig.analyser.settings().sample_rate(), 7000);
    rig.command(b'9');
    assert_eq!(rig.analyser.settings().sample_rate(), 9000);
    assert_eq!(rig.link.take_output(), b"Received: 8\r\nReceived: 9\r\n");
}

#[test]
fn rate_reset_is_idempotent() {
    let mut rig = rig(&[0]);
    rig.command(b'9');
    rig.command(b'0');
    let after_first = *rig.analyser.settings();
    rig.command(b'0');
    assert_eq!(*rig.analyser.settings(), after_first);
    assert_eq!(after_first.sample_rate(), 4000);
}

#[test]
fn mode_changes_leave_geometry_alone() {
    let mut rig = rig(&[0]);
    rig.command(b'a');
    rig.command(b'8');
    let before = *rig.analyser.settings();

    rig.command(b'2');
    assert_eq!(rig.analyser.mode(), Mode::AudioStream);
    rig.command(b'1');
    assert_eq!(rig.analyser.mode(), Mode::SpectralAnalysis);
    rig.command(b'2');
    assert_eq!(rig.analyser.mode(), Mode::AudioStream);

    assert_eq!(*rig.analyser.settings(), before);
}

#[test]
fn led_selection_is_one_hot() {
    let mut rig = rig(&[0]);
    rig.command(b'5');
    assert_eq!(rig.levels(), [false, false, true, false, false]);
    assert_eq!(rig.analyser.leds().lit(), Some(5));

    rig.command(b'5');
    assert_eq!(rig.levels(), [false, false, true, false, false]);

    rig.command(b'3');
    assert_eq!(rig.levels(), [true, false, false, false, false]);
}

#[test]
fn swapped_leds_keep_logical_numbering() {
    let mut rig = rig(&[0]);
    rig.command(b'6');
    // board position 7 is the last pin
    assert_eq!(rig.levels(), [false, false, false, false, true]);
    assert_eq!(rig.link.take_output(), b"Received: 6\r\n");

    rig.command(b'7');
    assert_eq!(rig.levels(), [false, false, false, true, false]);
    assert_eq!(rig.link.take_output(), b"Received: 7\r\n");
}

#[test]
fn unknown_byte_changes_nothing() {
    let mut rig = rig(&[0]);
    rig.command(b'4');
    rig.link.take_output();
    let mode = rig.analyser.mode();
    let settings = *rig.analyser.settings();
    let levels = rig.levels();

    assert_eq!(rig.command(b'z'), Command::Unknown(b'z'));

    assert_eq!(rig.analyser.mode(), mode);
    assert_eq!(*rig.analyser.settings(), settings);
    assert_eq!(rig.levels(), levels);
    assert_eq!(rig.analyser.leds().lit(), Some(4));
    assert_eq!(rig.link.take_output(), b"Command Not Found\r\n");
}

#[test]
fn constant_input_from_cold_start() {
    let mut rig = rig(&[10, 10, 10, 10]);
    rig.analyser.set_frame_length(4).unwrap();
    rig.analyser.acquire_frame().unwrap();
    assert_eq!(rig.analyser.frame().as_slice(), &[10, 9, 9, 9]);
}

#[test]
fn filter_state_carries_across_frames() {
    let mut rig = rig(&[10]);
    rig.analyser.set_frame_length(2).unwrap();
    rig.analyser.acquire_frame().unwrap();
    assert_eq!(rig.analyser.frame().as_slice(), &[10, 9]);

    // 9.85, 9.80: no fresh 10 at the start of the second frame
    rig.analyser.acquire_frame().unwrap();
    assert_eq!(rig.analyser.frame().as_slice(), &[9, 9]);
}

#[test]
fn large_offsets_are_clipped() {
    // Hold full scale long enough for the output to settle near 138, then
    // drop to zero: the step lands near -886 and decays slowly.
    let mut samples = vec![1023u16; 400];
    samples.push(0);
    let mut rig = rig(&samples);
    rig.command(b'b');
    rig.analyser.acquire_frame().unwrap();

    let frame = rig.analyser.frame().as_slice();
    assert_eq!(frame.len(), 512);
    assert!(frame[..400].iter().all(|&s| s == 127));
    assert!(frame[400..].iter().all(|&s| s == -127));
}

#[test]
fn frame_length_only_follows_presets() {
    let mut rig = rig(&[0]);
    for byte in 0..=u8::MAX {
        rig.command(byte);
        let len = rig.analyser.settings().frame_length();
        assert!(FRAME_LEN_PRESETS.contains(&len), "byte {} gave length {}", byte, len);
    }
    assert_eq!(rig.link.pending(), 0);
}

#[test]
fn frame_takes_length_over_rate() {
    for (rate_cmd, len_cmd, len, period) in [
        (b'0', b'a', 256u32, 250u32),
        (b'8', b'b', 512, 143),
        (b'9', b'c', 800, 111),
    ] {
        let mut rig = rig(&[512]);
        rig.command(rate_cmd);
        rig.command(len_cmd);

        let start = rig.analyser.clock.now;
        rig.analyser.acquire_frame().unwrap();
        let elapsed = rig.analyser.clock.now - start;

        // each sample overshoots its period by at most one clock step
        let ideal = len * period;
        assert!(elapsed >= ideal, "{} < {}", elapsed, ideal);
        assert!(elapsed <= ideal + len, "{} > {}", elapsed, ideal + len);
        assert_eq!(rig.analyser.frame().len(), len as usize);
    }
}

#[test]
fn streams_frame_only_in_audio_mode() {
    let mut rig = rig(&[10]);
    rig.analyser.set_frame_length(4).unwrap();

    rig.analyser.run_cycle().unwrap();
    assert!(rig.link.take_output().is_empty());

    rig.link.send(b"2");
    rig.analyser.run_cycle().unwrap();
    let mut expected = b"Received: 2\r\n".to_vec();
    expected.extend(rig.analyser.frame().bytes());
    assert_eq!(rig.link.take_output(), expected);
    assert_eq!(expected.len(), 13 + 4);
}

#[test]
fn spectral_mode_is_silent() {
    let mut rig = rig(&[10]);
    rig.analyser.set_frame_length(8).unwrap();
    rig.link.send(b"1");
    rig.analyser.run_cycle().unwrap();
    assert_eq!(rig.analyser.mode(), Mode::SpectralAnalysis);
    assert_eq!(rig.link.take_output(), b"Received: 1\r\n");

    rig.analyser.run_cycle().unwrap();
    assert!(rig.link.take_output().is_empty());
}

#[test]
fn streams_negative_samples_as_twos_complement() {
    let mut rig = rig(&[1000, 0]);
    rig.analyser.set_frame_length(2).unwrap();
    rig.command(b'2');
    rig.link.take_output();

    rig.analyser.acquire_frame().unwrap();
    rig.analyser.emit_frame().unwrap();
    // 1000 clips to 127, then 0 - 1000 + 995 = -5
    assert_eq!(rig.analyser.frame().as_slice(), &[127, -5]);
    assert_eq!(rig.link.take_output(), [0x7fu8, 0xfb]);
}

#[test]
fn adc_failure_aborts_cycle() {
    let mut rig = Rig::with_input(DeadInput);
    rig.link.send(b"2");
    assert_eq!(rig.analyser.run_cycle(), Err(Error::Adc));
    assert_eq!(rig.analyser.mode(), Mode::AudioStream);

    rig.analyser.report(Error::Adc);
    assert_eq!(rig.link.take_output(), b"Received: 2\r\nError: adc\r\n");
}
