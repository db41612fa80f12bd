use octoraster_core::Rgba8;

/// The color and depth targets of one frame, stored row-major from the bottom row up: pixel `(x, y)` is at index
/// `x + y * width`.
///
/// Depth is view-space Z, smaller is closer, and a cleared pixel holds `f32::INFINITY`.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffers {
    width: usize,
    height: usize,
    color: Vec<Rgba8>,
    depth: Vec<f32>,
}

impl FrameBuffers {
    /// Cleared buffers of `width x height` pixels.
    pub fn new(width: usize, height: usize) -> Self {
        let len = width * height;

        Self {
            width,
            height,
            color: vec![Rgba8::TRANSPARENT; len],
            depth: vec![f32::INFINITY; len],
        }
    }

    /// Reallocates for a new size, returning whether the size changed. The contents are unspecified until the next
    /// `clear`.
    pub fn resize(&mut self, width: usize, height: usize) -> bool {
        if (width, height) == (self.width, self.height) {
            return false;
        }

        let len = width * height;
        self.width = width;
        self.height = height;
        self.color.resize(len, Rgba8::TRANSPARENT);
        self.depth.resize(len, f32::INFINITY);

        true
    }

    pub fn clear(&mut self, background: Rgba8) {
        self.color.fill(background);
        self.depth.fill(f32::INFINITY);
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);

        x + y * self.width
    }

    #[inline]
    pub fn color(&self) -> &[Rgba8] {
        &self.color
    }

    /// The color buffer as tightly packed RGBA bytes, ready for upload.
    #[inline]
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.color)
    }

    #[inline]
    pub fn depth(&self) -> &[f32] {
        &self.depth
    }

    #[inline]
    pub fn color_at(&self, x: usize, y: usize) -> Rgba8 {
        self.color[self.index(x, y)]
    }

    #[inline]
    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth[self.index(x, y)]
    }

    #[inline]
    pub(crate) fn targets_mut(&mut self) -> (&mut [Rgba8], &mut [f32]) {
        (&mut self.color, &mut self.depth)
    }
}

/// Maps view depth onto a fixed-point range `0..=2^bits - 1` spanning the clip planes. Depths outside the planes
/// saturate, and an uncovered pixel (`f32::INFINITY`) maps to the maximum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthQuantizer {
    near: f32,
    scale: f32,
    max: u32,
}

impl DepthQuantizer {
    /// `bits` must be in `1..=24` for every quantized value to be exactly representable by the float math.
    pub fn new(near: f32, far: f32, bits: u8) -> Self {
        debug_assert!((1..=24).contains(&bits));
        debug_assert!(far > near);

        let max = (1u32 << bits) - 1;
        // An infinite far plane collapses every finite depth onto 0.
        let scale = if far.is_finite() { max as f32 / (far - near) } else { 0.0 };

        Self { near, scale, max }
    }

    #[inline]
    pub fn max_value(&self) -> u32 {
        self.max
    }

    #[inline]
    pub fn quantize(&self, z: f32) -> u32 {
        if !z.is_finite() {
            return self.max;
        }

        ((z - self.near) * self.scale).clamp(0.0, self.max as f32) as u32
    }

    /// `quantize` rescaled to `[0, 1]`.
    #[inline]
    pub fn normalize(&self, z: f32) -> f32 {
        self.quantize(z) as f32 / self.max as f32
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
