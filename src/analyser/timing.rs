/// Free-running microsecond counter that wraps at `u32::MAX`
pub trait MicrosClock {
    fn micros(&mut self) -> u32;
}

/// Spin until `period_us` microseconds have passed since `start`.
///
/// The deadline is compared without wrap handling: if the counter wraps
/// before the deadline is reached the wait ends at once, shortening that one
/// sample period.
#[inline]
pub fn wait_period<C: MicrosClock>(clock: &mut C, start: u32, period_us: u32) {
    let deadline = start.wrapping_add(period_us);
    loop {
        let now = clock.micros();
        if now >= deadline || now < start {
            break;
        }
    }
}
