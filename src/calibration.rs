//! On-target timing measurements
//!
//! Used to pick the loop correction for a new clock or HAL: measure how many
//! cycles a wait, a pin toggle or a full word really takes with interrupts
//! masked, and compare against the requested counts.

use core::ops::Range;

use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::clock::CycleClock;
use crate::interrupt::{InterruptGuard, InterruptLock};
use crate::pin::PinDriver;
use crate::transmitter::BitstreamTransmitter;

/// One busy-wait measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSample {
    /// Cycles passed to `wait_cycles`
    pub requested: u32,
    /// Cycles observed around the call
    pub measured: u32,
}

impl WaitSample {
    /// Cycles spent beyond the requested count
    pub const fn overhead(self) -> u32 {
        self.measured.saturating_sub(self.requested)
    }
}

/// Cycles elapsed while running `f`
#[inline(always)]
pub fn measure_cycles<C: CycleClock, F: FnOnce()>(clock: &C, f: F) -> u32 {
    let start = clock.now();
    f();
    clock.now().wrapping_sub(start)
}

/// Measure `wait_cycles` for every count in `requested`
///
/// All samples are taken inside one masked section. At most `K` samples are
/// collected.
pub fn measure_wait_table<C, L, const K: usize>(
    clock: &C,
    lock: &mut L,
    requested: Range<u32>,
) -> Vec<WaitSample, K>
where
    C: CycleClock,
    L: InterruptLock,
{
    let mut samples = Vec::new();
    {
        let _guard = InterruptGuard::new(lock);
        for cycles in requested.take(K) {
            let measured = measure_cycles(clock, || clock.wait_cycles(cycles));
            // `take(K)` keeps the vector within capacity
            let _ = samples.push(WaitSample {
                requested: cycles,
                measured,
            });
        }
    }

    #[cfg(feature = "esp32-log")]
    for sample in &samples {
        println!(
            "[calibration] wait {} -> {} cycles",
            sample.requested, sample.measured
        );
    }

    samples
}

/// Largest overhead across `samples`, or 0 if empty
pub fn max_overhead(samples: &[WaitSample]) -> u32 {
    samples
        .iter()
        .map(|sample| sample.overhead())
        .max()
        .unwrap_or(0)
}

/// Cycles for one high/low toggle of the pin mask
pub fn measure_pin_toggle<C, P, L>(clock: &C, pin: &mut P, lock: &mut L) -> u32
where
    C: CycleClock,
    P: PinDriver,
    L: InterruptLock,
{
    let mask = pin.mask();
    pin.set_low(mask);
    let cycles = {
        let _guard = InterruptGuard::new(lock);
        measure_cycles(clock, || {
            pin.set_high(mask);
            pin.set_low(mask);
        })
    };

    #[cfg(feature = "esp32-log")]
    println!("[calibration] pin toggle -> {} cycles", cycles);

    cycles
}

/// Cycles to emit a single word
pub fn measure_word<C, P, L>(transmitter: &mut BitstreamTransmitter<C, P, L>, word: u32) -> u32
where
    C: CycleClock,
    P: PinDriver,
    L: InterruptLock,
{
    measure_words(transmitter, [word])
}

/// Cycles to emit a word sequence, latch hold excluded
pub fn measure_words<C, P, L, I>(transmitter: &mut BitstreamTransmitter<C, P, L>, words: I) -> u32
where
    C: CycleClock,
    P: PinDriver,
    L: InterruptLock,
    I: IntoIterator<Item = u32>,
{
    let cycles = transmitter.emit_timed(words);

    #[cfg(feature = "esp32-log")]
    println!("[calibration] words -> {} cycles", cycles);

    cycles
}
