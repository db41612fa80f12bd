use octoraster_core::{glam::Affine3A, Rgba8};
use octoraster_storage::Octree;

use std::sync::Arc;

/// One placed instance of an octree. The host updates these between frames; the renderer only reads them.
#[derive(Clone, Debug)]
pub struct VoxelObject {
    /// Objects whose octree is not loaded yet are skipped.
    pub octree: Option<Arc<Octree>>,
    pub world_from_local: Affine3A,
    /// With `size_from_octree`, the edge length of one voxel in local units. Otherwise the edge length of the whole root
    /// cube.
    pub scale: f32,
    pub size_from_octree: bool,
    /// Multiplied into every voxel color.
    pub tint: Rgba8,
    pub enabled: bool,
}

impl VoxelObject {
    /// A unit-sized, untinted, enabled object at the origin.
    pub fn new(octree: Arc<Octree>) -> Self {
        Self {
            octree: Some(octree),
            world_from_local: Affine3A::IDENTITY,
            scale: 1.0,
            size_from_octree: false,
            tint: Rgba8::WHITE,
            enabled: true,
        }
    }

    pub fn with_transform(mut self, world_from_local: Affine3A) -> Self {
        self.world_from_local = world_from_local;
        self
    }

    pub fn with_scale(mut self, scale: f32, size_from_octree: bool) -> Self {
        self.scale = scale;
        self.size_from_octree = size_from_octree;
        self
    }

    pub fn with_tint(mut self, tint: Rgba8) -> Self {
        self.tint = tint;
        self
    }

    /// The octree to draw this frame, if any.
    #[inline]
    pub fn renderable(&self) -> Option<&Octree> {
        if self.enabled {
            self.octree.as_deref()
        } else {
            None
        }
    }
}
