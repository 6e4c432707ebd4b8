//! Bit-banged WS2812 LED strip driver
#![no_std]
#![cfg_attr(target_arch = "xtensa", feature(asm_experimental_arch))]

pub mod buffer;
pub mod calibration;
pub mod clock;
pub mod color;
pub mod interrupt;
pub mod pin;
pub mod strip;
pub mod timing;
pub mod transmitter;

pub use buffer::{PixelBuffer, Words};
pub use clock::CycleClock;
pub use color::{Color, Rgb};
pub use interrupt::{GlobalInterruptLock, InterruptGuard, InterruptLock};
pub use pin::{GpioPin, OutputPinDriver, PinDriver, RegisterPin};
pub use strip::LedStrip;
pub use timing::{NanosTiming, ProtocolTiming, PulseTiming};
pub use transmitter::BitstreamTransmitter;

pub use embassy_time::Duration;

/// Abstract LED output trait
///
/// Anything that can show a frame of colors.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}
