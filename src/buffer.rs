//! Packed pixel storage
//!
//! One owned allocation, two views: pixel `i` occupies bytes `[3i, 3i + 3)`,
//! and transmission word `w` is bytes `[4w, 4w + 4)` read big-endian, so the
//! byte that goes out first sits in bits 31..24. The byte length is rounded
//! up to whole words; the trailing padding reads as zero and is transmitted
//! with the last word.
//!
//! [`Words`] is built before transmission starts: full words are a plain
//! 4-byte load, and the zero-padded tail word is computed up front, so the
//! bit loop never does index arithmetic between words.

use core::ops::{Index, IndexMut};
use core::slice::ChunksExact;

use crate::color::Color;

// `as_bytes` relies on `Color` being three packed bytes
const _: () = assert!(core::mem::size_of::<Color>() == 3);
const _: () = assert!(core::mem::align_of::<Color>() == 1);

/// Number of 32-bit transmission words for `pixels` pixels
pub const fn word_count(pixels: usize) -> usize {
    (3 * pixels).div_ceil(4)
}

/// Fixed-size pixel buffer for a strip of `N` LEDs
#[derive(Debug, Clone)]
pub struct PixelBuffer<const N: usize> {
    pixels: [Color; N],
}

impl<const N: usize> PixelBuffer<N> {
    /// Number of pixels
    pub const LEN: usize = N;
    /// Number of transmission words
    pub const WORD_COUNT: usize = word_count(N);
    /// Buffer length in bytes, padding included
    pub const BYTE_LEN: usize = 4 * Self::WORD_COUNT;

    /// Create a new buffer with every pixel black
    pub const fn new() -> Self {
        Self {
            pixels: [Color::BLACK; N],
        }
    }

    /// Number of pixels
    pub const fn len(&self) -> usize {
        N
    }

    /// True for a zero-length strip
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Set every pixel to black
    pub fn reset(&mut self) {
        self.fill(Color::BLACK);
    }

    /// Set every pixel to `color`
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Pixel at `index`
    ///
    /// # Panics
    /// If `index >= N`.
    pub fn get(&self, index: usize) -> Color {
        self[index]
    }

    /// Overwrite pixel at `index`
    ///
    /// # Panics
    /// If `index >= N`.
    pub fn set(&mut self, index: usize, color: Color) {
        self[index] = color;
    }

    /// All pixels in strip order
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// All pixels in strip order, mutable
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Pixel bytes in transmission order, padding excluded
    pub fn as_bytes(&self) -> &[u8] {
        // Safety: `Color` is `#[repr(C)]` with three `u8` fields, size 3 and
        // align 1 (checked above), so `[Color; N]` is exactly `3 * N`
        // initialized bytes
        unsafe { core::slice::from_raw_parts(self.pixels.as_ptr().cast::<u8>(), 3 * N) }
    }

    /// Byte at `index` of the packed layout
    ///
    /// Padding bytes past the last pixel read as zero.
    ///
    /// # Panics
    /// If `index >= BYTE_LEN`.
    pub fn byte(&self, index: usize) -> u8 {
        assert!(index < Self::BYTE_LEN, "byte index out of range");
        self.as_bytes().get(index).copied().unwrap_or(0)
    }

    /// Transmission word at `index`
    ///
    /// # Panics
    /// If `index >= WORD_COUNT`.
    pub fn word(&self, index: usize) -> u32 {
        assert!(index < Self::WORD_COUNT, "word index out of range");
        let start = index * 4;
        let mut bytes = [0u8; 4];
        for (offset, byte) in bytes.iter_mut().enumerate() {
            *byte = self.byte(start + offset);
        }
        u32::from_be_bytes(bytes)
    }

    /// All transmission words in order
    pub fn words(&self) -> Words<'_> {
        Words::new(self.as_bytes())
    }
}

/// Transmission words over packed pixel bytes
///
/// The padded tail word is assembled in [`Words::new`], so `next` is a
/// 4-byte load or a move.
#[derive(Debug, Clone)]
pub struct Words<'a> {
    chunks: ChunksExact<'a, u8>,
    tail: Option<u32>,
}

impl<'a> Words<'a> {
    /// Split `bytes` into big-endian words, zero-filling the last one
    pub fn new(bytes: &'a [u8]) -> Self {
        let chunks = bytes.chunks_exact(4);
        let remainder = chunks.remainder();
        let tail = if remainder.is_empty() {
            None
        } else {
            let mut padded = [0u8; 4];
            padded[..remainder.len()].copy_from_slice(remainder);
            Some(u32::from_be_bytes(padded))
        };
        Self { chunks, tail }
    }
}

impl Iterator for Words<'_> {
    type Item = u32;

    #[inline(always)]
    fn next(&mut self) -> Option<u32> {
        match self.chunks.next() {
            Some(&[b0, b1, b2, b3]) => Some(u32::from_be_bytes([b0, b1, b2, b3])),
            _ => self.tail.take(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.chunks.len() + usize::from(self.tail.is_some());
        (len, Some(len))
    }
}

impl ExactSizeIterator for Words<'_> {}

impl<const N: usize> Default for PixelBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Index<usize> for PixelBuffer<N> {
    type Output = Color;

    fn index(&self, index: usize) -> &Color {
        &self.pixels[index]
    }
}

impl<const N: usize> IndexMut<usize> for PixelBuffer<N> {
    fn index_mut(&mut self, index: usize) -> &mut Color {
        &mut self.pixels[index]
    }
}
