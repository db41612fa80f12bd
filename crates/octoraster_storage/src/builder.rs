use crate::{ImportError, Octree, OctreeNode};

use octoraster_core::{OctantIndex, Rgb8, MAX_OCTREE_DEPTH};

/// Builds an `Octree` one voxel at a time. Branch colors are computed bottom-up in `build`, once every voxel is known.
///
/// All voxels live at the deepest level, so a node is a leaf iff it is one of the inserted voxels.
#[derive(Debug)]
pub struct OctreeBuilder {
    depth: u8,
    root: Option<BuildNode>,
}

#[derive(Debug, Default)]
struct BuildNode {
    color: Rgb8,
    children: [Option<Box<BuildNode>>; 8],
}

impl OctreeBuilder {
    /// A builder for an octree covering the lattice cube `[0, 2^depth)^3`.
    pub fn new(depth: u8) -> Result<Self, ImportError> {
        if depth > MAX_OCTREE_DEPTH {
            return Err(ImportError::TooDeep {
                depth: depth as u32,
                max: MAX_OCTREE_DEPTH,
            });
        }

        Ok(Self { depth, root: None })
    }

    #[inline]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Sets the color of the voxel at `point`. Inserting the same point again overwrites its color.
    pub fn insert(&mut self, point: [u32; 3], color: Rgb8) -> Result<(), ImportError> {
        let edge_length = 1u32 << self.depth;
        if point.iter().any(|&c| c >= edge_length) {
            return Err(ImportError::PointOutOfRange { point, edge_length });
        }

        let [x, y, z] = point;
        let mut node = self.root.get_or_insert_with(BuildNode::default);
        for level in (0..self.depth).rev() {
            let octant = OctantIndex::from_bits(
                (x >> level) & 1 == 1,
                (y >> level) & 1 == 1,
                (z >> level) & 1 == 1,
            );
            node = &mut **node.children[octant.as_usize()].get_or_insert_with(Default::default);
        }
        node.color = color;

        Ok(())
    }

    pub fn build(self) -> Result<Octree, ImportError> {
        let root = self.root.ok_or(ImportError::Empty)?;

        Octree::new(root.finish(), self.depth)
    }
}

impl BuildNode {
    fn finish(self) -> OctreeNode {
        if self.children.iter().all(Option::is_none) {
            return OctreeNode::leaf(self.color);
        }

        let mut children = Box::<crate::Children>::default();
        for (dst, src) in children.iter_mut().zip(self.children) {
            *dst = src.map(|child| child.finish());
        }

        OctreeNode::branch(children)
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
