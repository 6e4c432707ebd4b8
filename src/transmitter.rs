//! Bit-banged one-wire transmitter
//!
//! Every bit is a high pulse followed by a low pulse; the pulse widths
//! decide whether it reads as 0 or 1. Words go out in order, bytes within a
//! word from bits 31..24 down to 7..0, bits within a byte MSB first. The
//! whole bit loop runs with interrupts masked because one late edge shifts
//! every following pixel.

use embedded_hal::delay::DelayNs;
use embedded_hal_async::delay::DelayNs as AsyncDelayNs;

use crate::clock::CycleClock;
use crate::interrupt::{InterruptGuard, InterruptLock};
use crate::pin::PinDriver;
use crate::timing::ProtocolTiming;

/// Drives one pin with a cycle-timed pulse train
pub struct BitstreamTransmitter<C, P, L> {
    clock: C,
    pin: P,
    lock: L,
    timing: ProtocolTiming,
}

impl<C, P, L> BitstreamTransmitter<C, P, L>
where
    C: CycleClock,
    P: PinDriver,
    L: InterruptLock,
{
    /// Bind a clock, pin and lock with pulse widths for that clock
    pub const fn new(clock: C, pin: P, lock: L, timing: ProtocolTiming) -> Self {
        Self {
            clock,
            pin,
            lock,
            timing,
        }
    }

    /// Pulse widths in use
    pub const fn timing(&self) -> &ProtocolTiming {
        &self.timing
    }

    /// Cycle counter
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Output pin
    pub const fn pin(&self) -> &P {
        &self.pin
    }

    /// Transmit `words` without the latch hold
    ///
    /// The pin is forced low before the lock is taken and again before it is
    /// released. Pass an iterator that is cheap to advance, such as
    /// [`PixelBuffer::words`](crate::PixelBuffer::words): it is pulled inside
    /// the lock, in the low phase of the previous word's last bit.
    pub fn emit<I>(&mut self, words: I)
    where
        I: IntoIterator<Item = u32>,
    {
        self.emit_timed(words);
    }

    /// Transmit `words`, then hold the line low for the latch interval
    ///
    /// The hold runs after the lock is released.
    pub fn send<I, D>(&mut self, words: I, delay: &mut D)
    where
        I: IntoIterator<Item = u32>,
        D: DelayNs,
    {
        self.emit(words);
        delay.delay_us(reset_micros(&self.timing));
    }

    /// Like [`send`](Self::send), but the latch hold yields to the executor
    pub async fn send_async<I, D>(&mut self, words: I, delay: &mut D)
    where
        I: IntoIterator<Item = u32>,
        D: AsyncDelayNs,
    {
        self.emit(words);
        delay.delay_us(reset_micros(&self.timing)).await;
    }

    /// Transmit `words` and return the cycles spent in the bit loop
    ///
    /// The two counter reads sit inside the lock, outside any pulse.
    pub(crate) fn emit_timed<I>(&mut self, words: I) -> u32
    where
        I: IntoIterator<Item = u32>,
    {
        let mask = self.pin.mask();
        self.pin.set_low(mask);

        let _guard = InterruptGuard::new(&mut self.lock);
        let start = self.clock.now();
        for word in words {
            write_word(&self.clock, &mut self.pin, mask, &self.timing, word);
        }
        let end = self.clock.now();
        self.pin.set_low(mask);

        end.wrapping_sub(start)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn reset_micros(timing: &ProtocolTiming) -> u32 {
    timing.reset.as_micros().min(u64::from(u32::MAX)) as u32
}

#[inline(always)]
fn write_word<C: CycleClock, P: PinDriver>(
    clock: &C,
    pin: &mut P,
    mask: u32,
    timing: &ProtocolTiming,
    word: u32,
) {
    for byte in word.to_be_bytes() {
        for bit in (0..8).rev() {
            let pulse = timing.pulse(byte & (1 << bit) != 0);
            pin.set_high(mask);
            clock.wait_cycles(pulse.high);
            pin.set_low(mask);
            clock.wait_cycles(pulse.low);
        }
    }
}
