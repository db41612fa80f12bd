//! Sparse voxel octrees for the octoraster renderer.
//!
//! An `Octree` is immutable once built. The ways to get one are:
//!   - `OctreeBuilder`: insert voxels one at a time, then compute the level-of-detail colors bottom-up
//!   - `read_binary`: parse the compact binary node stream, with its attribute channel header
//!   - `read_point_list`: parse a plain-text list of `x y z r g b` voxels in a 256^3 volume
//!
//! Imported octrees are usually shared through an `OctreeLibrary`, which hands out one `Arc<Octree>` per asset.

pub mod builder;
pub mod error;
pub mod import;
pub mod library;
pub mod octree;

pub use builder::*;
pub use error::*;
pub use import::*;
pub use library::*;
pub use octree::*;

pub mod prelude {
    pub use super::{
        read_binary, read_point_list, BinaryImportOptions, ImportError, Octree, OctreeBuilder,
        OctreeLibrary, OctreeNode, OctreeVisitor, VisitStatus, VisitedNode,
    };
}
