//! Conversion of `FrameBuffers` to `image` buffers, for dumping frames to PNG while debugging.
//!
//! Frame rows start at the bottom of the screen, image rows at the top, so both encoders flip vertically.

pub use image;

use octoraster_render::{DepthQuantizer, FrameBuffers};

use image::{ImageBuffer, Luma, Pixel, Rgba, RgbaImage};
use std::path::Path;

pub type DepthImage = ImageBuffer<Luma<u16>, Vec<u16>>;

pub fn encode_color(buffers: &FrameBuffers) -> RgbaImage {
    encode_image(buffers, |i| {
        let c = buffers.color()[i];

        Rgba([c.r, c.g, c.b, c.a])
    })
}

/// Depths are quantized with `quantizer`, then scaled to the full `u16` range so the image is viewable.
pub fn encode_depth(buffers: &FrameBuffers, quantizer: &DepthQuantizer) -> DepthImage {
    let max = quantizer.max_value() as u64;
    encode_image(buffers, |i| {
        let q = quantizer.quantize(buffers.depth()[i]) as u64;

        Luma([(q * u16::MAX as u64 / max) as u16])
    })
}

/// Writes the color buffer to a PNG file.
pub fn save_color_png(buffers: &FrameBuffers, path: impl AsRef<Path>) -> image::ImageResult<()> {
    encode_color(buffers).save_with_format(path, image::ImageFormat::Png)
}

fn encode_image<P>(buffers: &FrameBuffers, pixel: impl Fn(usize) -> P) -> ImageBuffer<P, Vec<<P as Pixel>::Subpixel>>
where
    P: Pixel + 'static,
{
    let (width, height) = (buffers.width(), buffers.height());

    let mut img = ImageBuffer::new(width as u32, height as u32);
    for y in 0..height {
        let img_y = (height - 1 - y) as u32;
        for x in 0..width {
            *img.get_pixel_mut(x as u32, img_y) = pixel(buffers.index(x, y));
        }
    }

    img
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
