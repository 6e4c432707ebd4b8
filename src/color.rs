//! Pixel color model
//!
//! [`Color`] keeps its channels in the order the LED shifts them in
//! (green, red, blue). Constructors still take red, green, blue.

use core::ops::{Add, Mul, Sub};

use smart_leds::RGB8;

/// `smart-leds` color, for interop with other drivers
pub type Rgb = RGB8;

/// RGB8 color stored in wire order
///
/// The field order is part of the device contract: the first byte on the
/// line is green, then red, then blue.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Green channel
    pub green: u8,
    /// Red channel
    pub red: u8,
    /// Blue channel
    pub blue: u8,
}

impl Color {
    /// All channels off
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// All channels full
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a color from red, green and blue channels
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { green, red, blue }
    }

    /// Create a color from a u32 value (0xRRGGBB format)
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_u32(color: u32) -> Self {
        Self::new(
            ((color >> 16) & 0xFF) as u8,
            ((color >> 8) & 0xFF) as u8,
            (color & 0xFF) as u8,
        )
    }

    /// Channel bytes in transmission order
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.green, self.red, self.blue]
    }

    /// Build a color from channel bytes in transmission order
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self {
            green: bytes[0],
            red: bytes[1],
            blue: bytes[2],
        }
    }

    /// Scale every channel by `fraction / 255`, truncating
    ///
    /// # Panics
    /// If `fraction` is 255. The fraction is a brightness level in `[0, 255)`.
    pub const fn scale(self, fraction: u8) -> Self {
        assert!(fraction < u8::MAX, "scale fraction must be below 255");
        Self {
            green: scale_channel(self.green, fraction),
            red: scale_channel(self.red, fraction),
            blue: scale_channel(self.blue, fraction),
        }
    }

    /// Add `delta` to every channel, clamping into `[0, 255]`
    pub const fn offset(self, delta: i32) -> Self {
        Self {
            green: offset_channel(self.green, delta),
            red: offset_channel(self.red, delta),
            blue: offset_channel(self.blue, delta),
        }
    }
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
const fn scale_channel(value: u8, fraction: u8) -> u8 {
    (value as u16 * fraction as u16 / 255) as u8
}

#[inline]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless
)]
const fn offset_channel(value: u8, delta: i32) -> u8 {
    let shifted = (value as i32).saturating_add(delta);
    if shifted < 0 {
        0
    } else if shifted > 255 {
        255
    } else {
        shifted as u8
    }
}

impl Mul<u8> for Color {
    type Output = Color;

    fn mul(self, fraction: u8) -> Color {
        self.scale(fraction)
    }
}

impl Mul<Color> for u8 {
    type Output = Color;

    fn mul(self, color: Color) -> Color {
        color.scale(self)
    }
}

impl Add<i32> for Color {
    type Output = Color;

    fn add(self, delta: i32) -> Color {
        self.offset(delta)
    }
}

impl Sub<i32> for Color {
    type Output = Color;

    fn sub(self, delta: i32) -> Color {
        self.offset(delta.saturating_neg())
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::new(rgb.r, rgb.g, rgb.b)
    }
}

impl From<Color> for Rgb {
    fn from(color: Color) -> Self {
        Rgb {
            r: color.red,
            g: color.green,
            b: color.blue,
        }
    }
}
