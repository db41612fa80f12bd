use bytemuck::{Pod, Zeroable};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An opaque 8-bit color. This is what octree nodes store.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[repr(C)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn with_alpha(self, a: u8) -> Rgba8 {
        Rgba8::new(self.r, self.g, self.b, a)
    }

    /// The per-channel average of `colors`, rounded to nearest. Every color has the same weight.
    ///
    /// Returns `None` if `colors` is empty.
    pub fn average(colors: impl IntoIterator<Item = Rgb8>) -> Option<Self> {
        let mut sum = [0u32; 3];
        let mut count = 0u32;
        for c in colors {
            sum[0] += c.r as u32;
            sum[1] += c.g as u32;
            sum[2] += c.b as u32;
            count += 1;
        }

        if count == 0 {
            return None;
        }

        let half = count / 2;
        Some(Self::new(
            ((sum[0] + half) / count) as u8,
            ((sum[1] + half) / count) as u8,
            ((sum[2] + half) / count) as u8,
        ))
    }
}

impl From<[u8; 3]> for Rgb8 {
    #[inline]
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// An 8-bit color with alpha. This is the pixel format of the frame color buffer, and also the type of an object's tint.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[repr(C)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(self) -> Rgb8 {
        Rgb8::new(self.r, self.g, self.b)
    }

    /// Multiplies each channel by the matching `tint` channel, treating both as fractions of 255:
    /// `round(c * t / 255)`.
    #[inline]
    pub fn tinted(self, tint: Rgba8) -> Self {
        Self::new(
            mul_channel(self.r, tint.r),
            mul_channel(self.g, tint.g),
            mul_channel(self.b, tint.b),
            mul_channel(self.a, tint.a),
        )
    }
}

impl From<[u8; 4]> for Rgba8 {
    #[inline]
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Rgba8> for [u8; 4] {
    #[inline]
    fn from(c: Rgba8) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

impl From<Rgb8> for Rgba8 {
    #[inline]
    fn from(c: Rgb8) -> Self {
        c.with_alpha(255)
    }
}

#[inline]
fn mul_channel(c: u8, t: u8) -> u8 {
    ((c as u32 * t as u32 + 127) / 255) as u8
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
