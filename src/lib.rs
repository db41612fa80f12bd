//! Software rasterization of sparse voxel octrees.
//!
//! This library is organized into several crates:
//! - **core**: colors, octant addressing and bounding boxes
//! - **storage**: the immutable `Octree`, its builder, importers and a shared asset library
//! - **render**: cameras, frame buffers and the hierarchical octree rasterizer
//! - **image**: conversion of frame buffers to images (behind the `image` feature)
//!
//! A frame is rendered by loading octrees into an `OctreeLibrary`, placing them in the world as `VoxelObject`s, and
//! calling `FrameRenderer::render` with a `Camera`. The result is a color and view-depth `FrameBuffers`, with row 0 at
//! the bottom of the screen, ready for the host to composite.

pub use octoraster_core as core;
pub use octoraster_render as render;
pub use octoraster_storage as storage;

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::render::prelude::*;
    pub use super::storage::prelude::*;
}

#[cfg(feature = "image")]
pub use octoraster_image as image;

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
