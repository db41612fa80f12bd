//! The core data types shared by the octoraster crates:
//! - `Rgb8` and `Rgba8`: 8-bit colors, with the tint multiply used when writing voxels to a frame
//! - `OctantIndex`: the `0bZYX` bit pattern that addresses the 8 children of an octree node
//! - `Aabb3`: a floating point axis-aligned bounding box

pub mod aabb;
pub mod color;
pub mod octant;

pub use aabb::Aabb3;
pub use color::{Rgb8, Rgba8};
pub use octant::{OctantIndex, OCTANT_SIGNS};

pub use glam;

/// The deepest octree that can be imported or rendered. A tree of depth `D` has `D + 1` levels, and the rasterizer's
/// traversal stack holds one frame per level.
pub const MAX_OCTREE_DEPTH: u8 = 31;

pub mod prelude {
    pub use super::{Aabb3, OctantIndex, Rgb8, Rgba8, MAX_OCTREE_DEPTH, OCTANT_SIGNS};
}
