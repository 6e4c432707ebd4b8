//! LED strip bound to one pin
//!
//! Owns the pixel buffer and the transmitter. Sends are not synchronized:
//! one task owns one strip.

use core::ops::{Index, IndexMut};

use embedded_hal::delay::DelayNs;
use embedded_hal_async::delay::DelayNs as AsyncDelayNs;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::buffer::PixelBuffer;
use crate::clock::CycleClock;
use crate::color::{Color, Rgb};
use crate::interrupt::InterruptLock;
use crate::pin::PinDriver;
use crate::transmitter::BitstreamTransmitter;

/// Strip of `N` LEDs
///
/// `D` provides the latch hold after each frame. Pass a blocking
/// [`DelayNs`] for [`send`](Self::send) or an async one for
/// [`send_async`](Self::send_async); `embassy_time::Delay` is both.
pub struct LedStrip<const N: usize, C, P, L, D> {
    buffer: PixelBuffer<N>,
    transmitter: BitstreamTransmitter<C, P, L>,
    delay: D,
}

impl<const N: usize, C, P, L, D> LedStrip<N, C, P, L, D>
where
    C: CycleClock,
    P: PinDriver,
    L: InterruptLock,
{
    /// Create a strip with every pixel black
    pub fn new(transmitter: BitstreamTransmitter<C, P, L>, delay: D) -> Self {
        #[cfg(feature = "esp32-log")]
        println!(
            "[LedStrip.new] {} leds, {} words, mask {:#010x}",
            N,
            PixelBuffer::<N>::WORD_COUNT,
            transmitter.pin().mask()
        );
        Self {
            buffer: PixelBuffer::new(),
            transmitter,
            delay,
        }
    }

    /// Number of LEDs
    pub const fn size(&self) -> usize {
        N
    }

    /// # Panics
    /// If `index >= N`.
    pub fn get(&self, index: usize) -> Color {
        self.buffer.get(index)
    }

    /// # Panics
    /// If `index >= N`.
    pub fn set(&mut self, index: usize, color: Color) {
        self.buffer.set(index, color);
    }

    /// Set every pixel to black
    ///
    /// Does not transmit.
    pub fn reset(&mut self) {
        #[cfg(feature = "esp32-log")]
        println!("[LedStrip.reset] clearing {} leds", N);
        self.buffer.reset();
    }

    /// Set every pixel to `color`
    pub fn fill(&mut self, color: Color) {
        self.buffer.fill(color);
    }

    /// Overwrite pixels from the start of the strip
    ///
    /// Items past the end of the strip are ignored; pixels past the end of
    /// `colors` keep their value.
    pub fn write_colors<I>(&mut self, colors: I)
    where
        I: IntoIterator,
        I::Item: Into<Color>,
    {
        for (slot, color) in self.buffer.pixels_mut().iter_mut().zip(colors) {
            *slot = color.into();
        }
    }

    /// Pixel storage
    pub fn buffer(&self) -> &PixelBuffer<N> {
        &self.buffer
    }

    /// Underlying transmitter
    pub fn transmitter(&self) -> &BitstreamTransmitter<C, P, L> {
        &self.transmitter
    }

    /// Underlying transmitter, mutable (for calibration)
    pub fn transmitter_mut(&mut self) -> &mut BitstreamTransmitter<C, P, L> {
        &mut self.transmitter
    }
}

impl<const N: usize, C, P, L, D> LedStrip<N, C, P, L, D>
where
    C: CycleClock,
    P: PinDriver,
    L: InterruptLock,
    D: DelayNs,
{
    /// Transmit the buffer and wait for the latch interval
    ///
    /// Blocks for the whole frame; the bit loop cannot be interrupted.
    pub fn send(&mut self) {
        self.transmitter.send(self.buffer.words(), &mut self.delay);
    }
}

impl<const N: usize, C, P, L, D> LedStrip<N, C, P, L, D>
where
    C: CycleClock,
    P: PinDriver,
    L: InterruptLock,
    D: AsyncDelayNs,
{
    /// Transmit the buffer, then yield during the latch interval
    pub async fn send_async(&mut self) {
        self.transmitter
            .send_async(self.buffer.words(), &mut self.delay)
            .await;
    }
}

impl<const N: usize, C, P, L, D> Index<usize> for LedStrip<N, C, P, L, D> {
    type Output = Color;

    fn index(&self, index: usize) -> &Color {
        &self.buffer[index]
    }
}

impl<const N: usize, C, P, L, D> IndexMut<usize> for LedStrip<N, C, P, L, D> {
    fn index_mut(&mut self, index: usize) -> &mut Color {
        &mut self.buffer[index]
    }
}

impl<const N: usize, C, P, L, D> OutputDriver for LedStrip<N, C, P, L, D>
where
    C: CycleClock,
    P: PinDriver,
    L: InterruptLock,
    D: DelayNs,
{
    fn write(&mut self, colors: &[Rgb]) {
        self.write_colors(colors.iter().copied());
        self.send();
    }
}
