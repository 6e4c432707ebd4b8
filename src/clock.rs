//! Cycle counter access and busy waiting

/// Free-running CPU cycle counter
pub trait CycleClock {
    /// Current counter value, wrapping on overflow
    fn now(&self) -> u32;

    /// Spin until at least `cycles` cycles have passed since entry
    ///
    /// Never yields. The elapsed count is taken as a wrapping difference, so
    /// a counter overflow during the wait does not end it early.
    #[inline(always)]
    fn wait_cycles(&self, cycles: u32) {
        let start = self.now();
        while self.now().wrapping_sub(start) < cycles {}
    }
}

impl<C: CycleClock + ?Sized> CycleClock for &C {
    #[inline(always)]
    fn now(&self) -> u32 {
        (**self).now()
    }

    #[inline(always)]
    fn wait_cycles(&self, cycles: u32) {
        (**self).wait_cycles(cycles);
    }
}

/// Xtensa `CCOUNT` special register (ESP8266, ESP32, ESP32-S2/S3)
#[cfg(target_arch = "xtensa")]
#[derive(Debug, Default, Clone, Copy)]
pub struct XtensaCycleClock;

#[cfg(target_arch = "xtensa")]
impl CycleClock for XtensaCycleClock {
    #[inline(always)]
    fn now(&self) -> u32 {
        let count: u32;
        // Safety: reading CCOUNT has no side effects
        unsafe {
            core::arch::asm!("rsr.ccount {0}", out(reg) count, options(nostack));
        }
        count
    }
}

/// Cortex-M DWT cycle counter
///
/// Not available on ARMv6-M (Cortex-M0/M0+).
#[cfg(feature = "cortex-m")]
#[derive(Debug)]
pub struct DwtCycleClock {
    _enabled: (),
}

#[cfg(feature = "cortex-m")]
impl DwtCycleClock {
    /// Enable tracing and start the cycle counter
    pub fn new(
        dcb: &mut cortex_m::peripheral::DCB,
        dwt: &mut cortex_m::peripheral::DWT,
    ) -> Self {
        dcb.enable_trace();
        dwt.enable_cycle_counter();
        Self { _enabled: () }
    }
}

#[cfg(feature = "cortex-m")]
impl CycleClock for DwtCycleClock {
    #[inline(always)]
    fn now(&self) -> u32 {
        cortex_m::peripheral::DWT::cycle_count()
    }
}
