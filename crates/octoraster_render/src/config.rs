use octoraster_core::Rgba8;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The order in which the children of a node are visited. Any order renders the same image, but visiting near children
/// first lets the occlusion test reject more of the far ones.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum ChildOrder {
    /// Octant index order, `0b000` through `0b111`.
    #[default]
    Ascending,
    /// Sorted by the view depth of each child's corner of the object's root cube, nearest first.
    NearestFirst,
}

/// Tunables of a `FrameRenderer`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RasterConfig {
    /// Nodes whose projected cell diameter is at most this many pixels are drawn as leaves with their averaged color.
    /// Zero only stops at true leaves.
    pub lod_pixels: f32,
    /// Maximum footprint error, in pixels, tolerated when switching a perspective subtree to orthographic projection.
    /// Zero never switches.
    pub ortho_switch_pixels: f32,
    /// Renders at `display / resolution_divisor` and leaves upscaling to the compositor. In `1..=8`.
    pub resolution_divisor: u32,
    /// Precision of the quantized depth produced by `FrameRenderer::depth_quantizer`. In `8..=22`.
    pub depth_buffer_bits: u8,
    pub child_order: ChildOrder,
    /// Shifts each octree so the center of its voxel bounds, rather than the center of its root cube, sits at the object
    /// origin.
    pub center_on_bounds: bool,
    /// Color of pixels that no voxel covers.
    pub background: Rgba8,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            lod_pixels: 1.0,
            ortho_switch_pixels: 1.0,
            resolution_divisor: 1,
            depth_buffer_bits: 22,
            child_order: ChildOrder::Ascending,
            center_on_bounds: true,
            background: Rgba8::TRANSPARENT,
        }
    }
}

impl RasterConfig {
    pub const RESOLUTION_DIVISORS: std::ops::RangeInclusive<u32> = 1..=8;
    pub const DEPTH_BUFFER_BITS: std::ops::RangeInclusive<u8> = 8..=22;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.lod_pixels.is_finite() && self.lod_pixels >= 0.0) {
            return Err(ConfigError::LodPixels(self.lod_pixels));
        }
        if !(self.ortho_switch_pixels.is_finite() && self.ortho_switch_pixels >= 0.0) {
            return Err(ConfigError::OrthoSwitchPixels(self.ortho_switch_pixels));
        }
        if !Self::RESOLUTION_DIVISORS.contains(&self.resolution_divisor) {
            return Err(ConfigError::ResolutionDivisor(self.resolution_divisor));
        }
        if !Self::DEPTH_BUFFER_BITS.contains(&self.depth_buffer_bits) {
            return Err(ConfigError::DepthBufferBits(self.depth_buffer_bits));
        }

        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("LOD threshold must be a finite number of pixels >= 0, got {0}")]
    LodPixels(f32),
    #[error("orthographic switch threshold must be a finite number of pixels >= 0, got {0}")]
    OrthoSwitchPixels(f32),
    #[error("resolution divisor must be in 1..=8, got {0}")]
    ResolutionDivisor(u32),
    #[error("depth buffer bits must be in 8..=22, got {0}")]
    DepthBufferBits(u8),
    #[error("near clip plane must be > 0, got {0}")]
    NearPlane(f32),
    #[error("far clip plane ({far}) must be beyond the near clip plane ({near})")]
    FarPlane { near: f32, far: f32 },
    #[error("vertical field of view must be in (0, pi) radians, got {0}")]
    FieldOfView(f32),
    #[error("orthographic half height must be > 0, got {0}")]
    OrthoHalfHeight(f32),
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(RasterConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_out_of_range_tunables() {
        let bad = [
            (
                RasterConfig {
                    lod_pixels: -1.0,
                    ..Default::default()
                },
                ConfigError::LodPixels(-1.0),
            ),
            (
                RasterConfig {
                    ortho_switch_pixels: f32::INFINITY,
                    ..Default::default()
                },
                ConfigError::OrthoSwitchPixels(f32::INFINITY),
            ),
            (
                RasterConfig {
                    resolution_divisor: 0,
                    ..Default::default()
                },
                ConfigError::ResolutionDivisor(0),
            ),
            (
                RasterConfig {
                    resolution_divisor: 9,
                    ..Default::default()
                },
                ConfigError::ResolutionDivisor(9),
            ),
            (
                RasterConfig {
                    depth_buffer_bits: 23,
                    ..Default::default()
                },
                ConfigError::DepthBufferBits(23),
            ),
        ];
        for (config, error) in bad {
            assert_eq!(config.validate(), Err(error));
        }

        assert!(matches!(
            RasterConfig {
                lod_pixels: f32::NAN,
                ..Default::default()
            }
            .validate(),
            Err(ConfigError::LodPixels(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_partial_ron() {
        let config: RasterConfig = ron::from_str(
            "(lod_pixels: 2.5, child_order: NearestFirst, background: (r: 1, g: 2, b: 3, a: 255))",
        )
        .unwrap();

        assert_eq!(
            config,
            RasterConfig {
                lod_pixels: 2.5,
                child_order: ChildOrder::NearestFirst,
                background: Rgba8::new(1, 2, 3, 255),
                ..Default::default()
            }
        );
    }
}
