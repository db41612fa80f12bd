//! Seeds the traversal of one object: where its root cube lands in view and screen space, how big it is, and the offsets
//! from a node's center to the centers of its children.
//!
//! # Local space
//!
//! The root cube of an object spans `[-1, 1]^3` in *cube units* before scaling by `half_size`. Octree voxel coordinates
//! (centered, see `Octree::bounds`) map onto cube units by `v * 2 / edge_length`, optionally shifted by `offset` so that the
//! center of the voxel bounds, rather than the center of the root cube, sits at the object origin.

use crate::{ChildOrder, VoxelObject, ViewConstants};

use octoraster_core::{
    glam::{Affine3A, Vec3, Vec4},
    OctantIndex,
};
use octoraster_storage::Octree;

use float_ord::FloatOrd;

/// Where an object's octree sits in the object's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OctreePlacement {
    /// Half the edge length of the root cube in local units.
    pub half_size: f32,
    /// Shift of the root cube, in cube units.
    pub offset: Vec3,
    edge_length: f32,
}

impl OctreePlacement {
    pub fn new(object: &VoxelObject, octree: &Octree, center_on_bounds: bool) -> Self {
        let edge_length = octree.edge_length() as f32;
        let mut half_size = object.scale * 0.5;
        if object.size_from_octree {
            half_size *= edge_length;
        }
        let offset = if center_on_bounds {
            octree.bounds().center() * 2.0 / edge_length
        } else {
            Vec3::ZERO
        };

        Self {
            half_size,
            offset,
            edge_length,
        }
    }

    /// Maps centered voxel coordinates to local space.
    #[inline]
    pub fn local_from_voxel(&self, v: Vec3) -> Vec3 {
        (v * 2.0 / self.edge_length - self.offset) * self.half_size
    }

    #[inline]
    pub fn cube_center(&self) -> Vec3 {
        -self.offset * self.half_size
    }

    #[inline]
    pub fn cube_corner(&self, corner: OctantIndex) -> Vec3 {
        (corner.sign() - self.offset) * self.half_size
    }

    /// The corners of the octree's voxel bounds in world space.
    pub fn world_bounds_corners(&self, octree: &Octree, world_from_local: &Affine3A) -> [Vec3; 8] {
        octree
            .bounds()
            .corners()
            .map(|c| world_from_local.transform_point3(self.local_from_voxel(c)))
    }

    /// Distance from `eye` to the nearest corner of the world-space voxel bounds.
    pub fn nearest_corner_distance(&self, octree: &Octree, world_from_local: &Affine3A, eye: Vec3) -> f32 {
        self.world_bounds_corners(octree, world_from_local)
            .iter()
            .map(|&c| FloatOrd(c.distance(eye)))
            .min()
            .map_or(f32::INFINITY, |d| d.0)
    }
}

/// The offset from a node's center to the center of one child, in the coordinates of the node's projection mode:
/// view space for perspective nodes; pixels for X and Y of orthographic nodes, with Z still in view space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChildOffset {
    pub octant: OctantIndex,
    pub delta: Vec3,
}

impl ChildOffset {
    pub const ZERO: Self = Self {
        octant: OctantIndex::ALL[0],
        delta: Vec3::ZERO,
    };
}

/// Radii of a node at some level of the tree.
///
/// - `x`, `y`: half width and half height of an orthographic footprint in pixels, inset by half a pixel
/// - `z`: larger of the two half extents in pixels, without the inset
/// - `w`: bounding radius in view units, used for clipping, depth bounds and perspective footprints
pub type LevelRadius = Vec4;

/// The starting state of one object's traversal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootProjection {
    /// Perspective: the view-space center of the root cube. Orthographic: its pixel position and view depth.
    pub center: Vec3,
    pub orthographic: bool,
    pub radius: LevelRadius,
    /// Child offsets of the root, in visiting order.
    pub offsets: [ChildOffset; 8],
}

impl RootProjection {
    pub fn new(
        placement: &OctreePlacement,
        view_from_local: &Affine3A,
        view: &ViewConstants,
        child_order: ChildOrder,
    ) -> Self {
        let center = view_from_local.transform_point3(placement.cube_center());
        let corners = OctantIndex::ALL.map(|o| view_from_local.transform_point3(placement.cube_corner(o)));
        let bounding_radius = corners
            .iter()
            .map(|c| FloatOrd(c.distance(center)))
            .max()
            .map_or(0.0, |r| r.0);

        let (center, deltas, radius) = if view.orthographic {
            let center_px = view.project(center);
            let center = center_px.extend(center.z);
            let deltas = corners.map(|c| view.project(c).extend(c.z) - center);
            let rx = deltas.iter().fold(0.0f32, |m, d| m.max(d.x.abs()));
            let ry = deltas.iter().fold(0.0f32, |m, d| m.max(d.y.abs()));

            (center, deltas, Vec4::new(rx - 0.5, ry - 0.5, rx.max(ry), bounding_radius))
        } else {
            let deltas = corners.map(|c| c - center);
            let r = bounding_radius;

            (center, deltas, Vec4::new(r - 0.5, r - 0.5, r, r))
        };

        let mut offsets = [ChildOffset::ZERO; 8];
        for (offset, (octant, delta)) in offsets.iter_mut().zip(OctantIndex::ALL.into_iter().zip(deltas)) {
            *offset = ChildOffset {
                octant,
                delta: delta * 0.5,
            };
        }
        if child_order == ChildOrder::NearestFirst {
            offsets.sort_by_key(|o| FloatOrd(corners[o.octant.as_usize()].z));
        }

        Self {
            center,
            orthographic: view.orthographic,
            radius,
            offsets,
        }
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
