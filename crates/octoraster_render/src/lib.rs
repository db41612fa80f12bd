//! A software rasterizer for sparse voxel octrees.
//!
//! Each frame, the `FrameRenderer` draws a list of `VoxelObject`s into a color and depth `FrameBuffers`. Every object is
//! traversed front to back from its root, with three ways of cutting the traversal short:
//!   - occlusion: a node whose screen rectangle is already covered by nearer depths is skipped with its whole subtree
//!   - level of detail: a node whose projection fits in `lod_pixels` is drawn as a single rectangle of its average color
//!   - orthographic promotion: once the perspective error over a subtree falls below `ortho_switch_pixels`, its children
//!     are projected with cheap screen-space offsets instead of per-node divisions
//!
//! ```
//! use octoraster_render::prelude::*;
//! use octoraster_storage::Octree;
//! use octoraster_core::{glam::Vec3, Rgb8};
//! use std::sync::Arc;
//!
//! let mut camera = Camera::perspective(1.0, 0.1, 100.0).unwrap();
//! camera.look_at(Vec3::new(0.0, 0.0, -10.0), Vec3::ZERO, Vec3::Y);
//!
//! let objects = [VoxelObject::new(Arc::new(Octree::from_leaf(Rgb8::WHITE)))];
//! let mut renderer = FrameRenderer::new(RasterConfig::default()).unwrap();
//! let stats = renderer.render(&camera, 64, 48, &objects);
//!
//! assert_eq!(stats.leaves, 1);
//! ```

pub mod buffers;
pub mod camera;
pub mod config;
pub mod frame;
pub mod object;
pub mod projector;
pub mod rasterizer;
pub mod stats;

pub use buffers::*;
pub use camera::*;
pub use config::*;
pub use frame::*;
pub use object::*;
pub use projector::*;
pub use rasterizer::*;
pub use stats::*;

pub mod prelude {
    pub use super::{
        Camera, ChildOrder, DepthQuantizer, FrameBuffers, FrameRenderer, OctreeRasterizer, Projection, RasterConfig,
        RasterStats, VoxelObject,
    };
}
