//! Output pin abstraction
//!
//! The transmitter only needs a bit mask and two register-style writes that
//! drive every pin in the mask at once.

use embedded_hal::digital::OutputPin;

/// Pin(s) driven by the transmitter
///
/// Both writes must be a single store with no read-modify-write, so every
/// pin in the mask changes level together. Pins are expected to be
/// configured as outputs before the first frame.
pub trait PinDriver {
    /// Mask of the controlled pin(s)
    fn mask(&self) -> u32;

    /// Drive the pins in `mask` high
    fn set_high(&mut self, mask: u32);

    /// Drive the pins in `mask` low
    fn set_low(&mut self, mask: u32);
}

/// GPIO number and its output register mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioPin {
    number: u8,
    mask: u32,
}

impl GpioPin {
    /// Highest pin number addressable through a 32-bit output register
    pub const MAX_NUMBER: u8 = 31;

    /// Pin with mask `1 << number`
    ///
    /// # Panics
    /// If `number` is above [`GpioPin::MAX_NUMBER`].
    pub const fn new(number: u8) -> Self {
        assert!(number <= Self::MAX_NUMBER, "GPIO number out of range");
        Self {
            number,
            mask: 1 << number,
        }
    }

    /// GPIO number
    pub const fn number(self) -> u8 {
        self.number
    }

    /// Output register mask for this pin
    pub const fn mask(self) -> u32 {
        self.mask
    }
}

/// Write-1-to-set / write-1-to-clear register addresses
pub mod registers {
    /// ESP8266 `GPIO_OUT_W1TS`
    pub const ESP8266_OUT_W1TS: usize = 0x6000_0304;
    /// ESP8266 `GPIO_OUT_W1TC`
    pub const ESP8266_OUT_W1TC: usize = 0x6000_0308;
    /// ESP32 `GPIO_OUT_W1TS_REG`
    pub const ESP32_OUT_W1TS: usize = 0x3FF4_4008;
    /// ESP32 `GPIO_OUT_W1TC_REG`
    pub const ESP32_OUT_W1TC: usize = 0x3FF4_400C;
}

/// Pin driven through a pair of set/clear registers
///
/// Writing a mask to the set register raises exactly those pins, writing it
/// to the clear register lowers them. Other pins are untouched.
#[derive(Debug)]
pub struct RegisterPin {
    pin: GpioPin,
    set_register: *mut u32,
    clear_register: *mut u32,
}

impl RegisterPin {
    /// Bind `pin` to a set/clear register pair
    ///
    /// # Safety
    /// `set_register` and `clear_register` must be the addresses of the
    /// write-1-to-set and write-1-to-clear output registers, valid for
    /// volatile 32-bit writes for the lifetime of this value. The pin must
    /// be configured as an output and not driven by anything else.
    pub unsafe fn new(pin: GpioPin, set_register: usize, clear_register: usize) -> Self {
        Self {
            pin,
            set_register: set_register as *mut u32,
            clear_register: clear_register as *mut u32,
        }
    }

    /// Pin driven by this register pair
    pub const fn pin(&self) -> GpioPin {
        self.pin
    }
}

impl PinDriver for RegisterPin {
    #[inline(always)]
    fn mask(&self) -> u32 {
        self.pin.mask()
    }

    #[inline(always)]
    fn set_high(&mut self, mask: u32) {
        // Safety: address validity is guaranteed by the constructor contract
        unsafe { core::ptr::write_volatile(self.set_register, mask) }
    }

    #[inline(always)]
    fn set_low(&mut self, mask: u32) {
        // Safety: address validity is guaranteed by the constructor contract
        unsafe { core::ptr::write_volatile(self.clear_register, mask) }
    }
}

/// Adapter for any `embedded-hal` output pin
///
/// The mask is ignored; the wrapped pin is the only one driven. Timing is
/// only as consistent as the HAL's `set_high`/`set_low`, so the loop
/// correction has to be measured for the concrete HAL.
#[derive(Debug)]
pub struct OutputPinDriver<P> {
    pin: P,
}

impl<P: OutputPin> OutputPinDriver<P> {
    /// Wrap a configured output pin
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> PinDriver for OutputPinDriver<P> {
    fn mask(&self) -> u32 {
        1
    }

    #[inline(always)]
    fn set_high(&mut self, _mask: u32) {
        // The line has no error channel
        let _ = self.pin.set_high();
    }

    #[inline(always)]
    fn set_low(&mut self, _mask: u32) {
        let _ = self.pin.set_low();
    }
}
