//! Protocol timing
//!
//! Pulse widths are given in nanoseconds by the LED datasheet and converted
//! to CPU cycles for one fixed clock. Each converted width is then reduced by
//! a correction that accounts for the cost of entering the wait loop and
//! toggling the pin. A correction larger than a nominal width is rejected
//! during const evaluation, so a bad preset fails to compile instead of
//! wrapping to a huge wait.

use embassy_time::Duration;

/// Cycles spent outside the wait itself for every pulse phase
pub const LOOP_CORRECTION_CYCLES: u32 = 15;

/// Latch hold after the last bit
pub const DEFAULT_RESET: Duration = Duration::from_millis(10);

/// WS2812B nominal pulse widths
pub const WS2812B_NANOS: NanosTiming = NanosTiming {
    zero_high: 400,
    zero_low: 850,
    one_high: 800,
    one_low: 450,
};

/// Datasheet pulse widths in nanoseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NanosTiming {
    /// T0H
    pub zero_high: u32,
    /// T0L
    pub zero_low: u32,
    /// T1H
    pub one_high: u32,
    /// T1L
    pub one_low: u32,
}

/// High and low phase of one encoded bit, in cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseTiming {
    /// Cycles spent high
    pub high: u32,
    /// Cycles spent low
    pub low: u32,
}

impl PulseTiming {
    /// Total cycles spent waiting for this bit
    pub const fn total(self) -> u32 {
        self.high + self.low
    }
}

/// Complete timing table for one protocol at one clock speed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolTiming {
    /// Pulse encoding a logical 0
    pub zero: PulseTiming,
    /// Pulse encoding a logical 1
    pub one: PulseTiming,
    /// Idle-low hold that latches the frame
    pub reset: Duration,
}

impl ProtocolTiming {
    /// WS2812B on an 80 MHz core (ESP8266 default)
    pub const WS2812B_80MHZ: Self =
        Self::from_nanos(80, WS2812B_NANOS, LOOP_CORRECTION_CYCLES, DEFAULT_RESET);
    /// WS2812B on a 160 MHz core
    pub const WS2812B_160MHZ: Self =
        Self::from_nanos(160, WS2812B_NANOS, LOOP_CORRECTION_CYCLES, DEFAULT_RESET);
    /// WS2812B on a 240 MHz core (ESP32 default)
    pub const WS2812B_240MHZ: Self =
        Self::from_nanos(240, WS2812B_NANOS, LOOP_CORRECTION_CYCLES, DEFAULT_RESET);

    /// Derive a cycle table from nanosecond widths
    ///
    /// # Panics
    /// If `correction` exceeds any converted pulse width. In a const context
    /// this is a compile error.
    pub const fn from_nanos(
        clock_mhz: u32,
        nanos: NanosTiming,
        correction: u32,
        reset: Duration,
    ) -> Self {
        Self {
            zero: PulseTiming {
                high: corrected(nanos_to_cycles(nanos.zero_high, clock_mhz), correction),
                low: corrected(nanos_to_cycles(nanos.zero_low, clock_mhz), correction),
            },
            one: PulseTiming {
                high: corrected(nanos_to_cycles(nanos.one_high, clock_mhz), correction),
                low: corrected(nanos_to_cycles(nanos.one_low, clock_mhz), correction),
            },
            reset,
        }
    }

    /// Pulse for a single bit value
    #[inline(always)]
    pub const fn pulse(&self, bit: bool) -> PulseTiming {
        if bit { self.one } else { self.zero }
    }

    /// Longest wait a single bit can take
    pub const fn max_bit_cycles(&self) -> u32 {
        let zero = self.zero.total();
        let one = self.one.total();
        if zero > one { zero } else { one }
    }

    /// Upper bound of waited cycles for `words` transmission words
    ///
    /// Excludes pin and loop overhead, which the correction already covers.
    pub const fn frame_cycles(&self, words: usize) -> u64 {
        words as u64 * 32 * self.max_bit_cycles() as u64
    }
}

/// Convert nanoseconds to cycles of a `clock_mhz` clock, truncating
#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
pub const fn nanos_to_cycles(nanos: u32, clock_mhz: u32) -> u32 {
    (nanos as u64 * clock_mhz as u64 / 1000) as u32
}

const fn corrected(nominal: u32, correction: u32) -> u32 {
    match nominal.checked_sub(correction) {
        Some(cycles) => cycles,
        None => panic!("loop correction exceeds nominal pulse width"),
    }
}
