//! The `Octree` is an immutable tree of colored voxels. It is built once by an importer or `OctreeBuilder` and then shared
//! read-only, typically behind an `Arc`, by any number of renderable objects.
//!
//! Every node is either a leaf, holding the final color of a cube of voxels, or a branch, holding up to 8 children and the
//! average color of those children. The branch color lets a renderer draw the whole subtree as a single cube once it is
//! too small on screen to be worth descending.
//!
//! # Coordinates
//!
//! An octree of depth `D` covers the voxel lattice `[0, 2^D)^3`. A node at level `L` (the root is level 0) covers a cube of
//! edge length `2^(D - L)` and child `i` of a node covers the sub-cube whose minimum is offset by the bits of `i`, in the
//! `0bZYX` format of `OctantIndex`.
//!
//! The `bounds` of an octree are given in *centered* voxel units, i.e. lattice coordinates minus `2^(D - 1)`, such that the
//! root cube is centered on the origin.
//!
//! # Traversal
//!
//! ```
//! use octoraster_core::prelude::*;
//! use octoraster_storage::prelude::*;
//!
//! let mut builder = OctreeBuilder::new(2).unwrap();
//! builder.insert([0, 0, 0], Rgb8::new(255, 0, 0)).unwrap();
//! builder.insert([3, 3, 3], Rgb8::new(0, 0, 255)).unwrap();
//! let octree = builder.build().unwrap();
//!
//! let mut leaves = 0;
//! octree.visit_preorder(&mut |visit: &VisitedNode<'_>| {
//!     if visit.node.is_leaf() {
//!         leaves += 1;
//!     }
//!     VisitStatus::Continue
//! });
//! assert_eq!(leaves, 2);
//! ```

use crate::ImportError;

use octoraster_core::{
    glam::{UVec3, Vec3},
    Aabb3, OctantIndex, Rgb8, MAX_OCTREE_DEPTH,
};

/// The child slots of a branch, indexed by `OctantIndex`.
pub type Children = [Option<OctreeNode>; 8];

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OctreeNode {
    Leaf { color: Rgb8 },
    Branch { color: Rgb8, children: Box<Children> },
}

impl OctreeNode {
    #[inline]
    pub fn leaf(color: Rgb8) -> Self {
        Self::Leaf { color }
    }

    /// Makes a branch whose color is the unweighted average of its present children. `children` must not be empty; a node
    /// without children is a leaf.
    pub fn branch(children: Box<Children>) -> Self {
        debug_assert!(
            children.iter().any(Option::is_some),
            "a branch needs at least one child"
        );

        let color =
            Rgb8::average(children.iter().flatten().map(OctreeNode::color)).unwrap_or_default();

        Self::Branch { color, children }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// The final color of a leaf, or the averaged stand-in color of a branch.
    #[inline]
    pub fn color(&self) -> Rgb8 {
        match self {
            Self::Leaf { color } | Self::Branch { color, .. } => *color,
        }
    }

    #[inline]
    pub fn child(&self, octant: OctantIndex) -> Option<&OctreeNode> {
        match self {
            Self::Leaf { .. } => None,
            Self::Branch { children, .. } => children[octant.as_usize()].as_ref(),
        }
    }

    /// Bit `i` is set iff child `i` is present.
    #[inline]
    pub fn child_mask(&self) -> u8 {
        self.children()
            .fold(0, |mask, (octant, _)| mask | (1 << octant.get()))
    }

    /// The present children, in ascending octant order.
    #[inline]
    pub fn children(&self) -> impl Iterator<Item = (OctantIndex, &OctreeNode)> {
        let slots: &[Option<OctreeNode>] = match self {
            Self::Leaf { .. } => &[],
            Self::Branch { children, .. } => &children[..],
        };

        OctantIndex::ALL
            .into_iter()
            .zip(slots)
            .filter_map(|(octant, slot)| slot.as_ref().map(|child| (octant, child)))
    }

    /// The number of levels below this node. A leaf has height 0.
    pub fn height(&self) -> u32 {
        self.children()
            .map(|(_, child)| child.height() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// A sparse voxel octree with level-of-detail colors. Immutable once constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct Octree {
    root: OctreeNode,
    depth: u8,
    node_count: usize,
    bounds: Aabb3,
}

impl Octree {
    /// Wraps a finished node tree covering a cube of edge length `2^depth`.
    ///
    /// Fails if `depth` exceeds `MAX_OCTREE_DEPTH` or if the tree has more levels than `depth` allows.
    pub fn new(root: OctreeNode, depth: u8) -> Result<Self, ImportError> {
        if depth > MAX_OCTREE_DEPTH {
            return Err(ImportError::TooDeep {
                depth: depth as u32,
                max: MAX_OCTREE_DEPTH,
            });
        }
        let height = root.height();
        if height > depth as u32 {
            return Err(ImportError::TooDeep { depth: height, max: depth });
        }

        let half_edge = (1u64 << depth) as f32 * 0.5;
        let mut node_count = 0;
        let mut bounds: Option<Aabb3> = None;
        visit_node_in_preorder(
            &root,
            0,
            UVec3::ZERO,
            1 << depth,
            &mut |visit: &VisitedNode<'_>| {
                node_count += 1;
                if visit.node.is_leaf() {
                    let cell = Aabb3::from_min_and_shape(
                        visit.minimum.as_vec3() - Vec3::splat(half_edge),
                        Vec3::splat(visit.edge_length as f32),
                    );
                    bounds = Some(match bounds {
                        Some(b) => b.union(&cell),
                        None => cell,
                    });
                }

                VisitStatus::Continue
            },
        );

        Ok(Self {
            root,
            depth,
            node_count,
            // Every tree has at least one leaf.
            bounds: bounds.unwrap_or_else(|| {
                Aabb3::from_center_and_half_extents(Vec3::ZERO, Vec3::splat(half_edge))
            }),
        })
    }

    /// An octree of depth 0: one voxel of `color`.
    pub fn from_leaf(color: Rgb8) -> Self {
        Self {
            root: OctreeNode::leaf(color),
            depth: 0,
            node_count: 1,
            bounds: Aabb3::from_center_and_half_extents(Vec3::ZERO, Vec3::splat(0.5)),
        }
    }

    #[inline]
    pub fn root(&self) -> &OctreeNode {
        &self.root
    }

    /// The edge length of the root cube is `2^depth` voxels.
    #[inline]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    #[inline]
    pub fn edge_length(&self) -> u32 {
        1 << self.depth
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// The box enclosing every leaf cell, in centered voxel units.
    #[inline]
    pub fn bounds(&self) -> &Aabb3 {
        &self.bounds
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        self.visit_preorder(&mut |visit: &VisitedNode<'_>| {
            if visit.node.is_leaf() {
                count += 1;
            }

            VisitStatus::Continue
        });

        count
    }

    /// Visit every node, parents before children and siblings in ascending octant order.
    pub fn visit_preorder(&self, visitor: &mut impl OctreeVisitor) -> VisitStatus {
        visit_node_in_preorder(&self.root, 0, UVec3::ZERO, self.edge_length(), visitor)
    }
}

fn visit_node_in_preorder(
    node: &OctreeNode,
    level: u8,
    minimum: UVec3,
    edge_length: u32,
    visitor: &mut impl OctreeVisitor,
) -> VisitStatus {
    let status = visitor.visit_node(&VisitedNode {
        node,
        level,
        minimum,
        edge_length,
    });

    if node.is_leaf() || status != VisitStatus::Continue {
        return status;
    }

    let half_edge_length = edge_length >> 1;
    for (octant, child) in node.children() {
        let child_minimum = minimum
            + half_edge_length * UVec3::new(octant.x_bit(), octant.y_bit(), octant.z_bit());
        match visit_node_in_preorder(child, level + 1, child_minimum, half_edge_length, visitor) {
            VisitStatus::Continue => (),
            VisitStatus::ExitEarly => return VisitStatus::ExitEarly,
            VisitStatus::Stop => continue,
        }
    }

    VisitStatus::Continue
}

/// A node as seen during traversal, with the lattice cube it covers.
#[derive(Clone, Copy, Debug)]
pub struct VisitedNode<'a> {
    pub node: &'a OctreeNode,
    /// The root is level 0.
    pub level: u8,
    pub minimum: UVec3,
    pub edge_length: u32,
}

pub trait OctreeVisitor {
    fn visit_node(&mut self, node: &VisitedNode<'_>) -> VisitStatus;
}

impl<F> OctreeVisitor for F
where
    F: FnMut(&VisitedNode<'_>) -> VisitStatus,
{
    #[inline]
    fn visit_node(&mut self, node: &VisitedNode<'_>) -> VisitStatus {
        (self)(node)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VisitStatus {
    /// Continue traversing this branch.
    Continue,
    /// Stop traversing this branch.
    Stop,
    /// Stop traversing the entire tree. No further nodes will be visited.
    ExitEarly,
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

    use pretty_assertions::assert_eq;

    fn branch_with(slots: &[(u8, OctreeNode)]) -> OctreeNode {
        let mut children = Box::<Children>::default();
        for (i, node) in slots {
            children[*i as usize] = Some(node.clone());
        }

        OctreeNode::branch(children)
    }

    #[test]
    fn branch_color_is_average_of_present_children() {
        let node = branch_with(&[
            (1, OctreeNode::leaf(Rgb8::new(0, 0, 0))),
            (6, OctreeNode::leaf(Rgb8::new(100, 200, 50))),
        ]);

        assert!(!node.is_leaf());
        assert_eq!(node.color(), Rgb8::new(50, 100, 25));
        assert_eq!(node.child_mask(), 0b0100_0010);
        assert_eq!(
            node.children().map(|(o, _)| o.get()).collect::<Vec<_>>(),
            vec![1, 6]
        );
        assert!(node.child(OctantIndex::ALL[0]).is_none());
        assert_eq!(
            node.child(OctantIndex::ALL[6]).map(OctreeNode::color),
            Some(Rgb8::new(100, 200, 50))
        );
    }

    #[test]
    fn bounds_cover_leaf_cells_in_centered_units() {
        // Depth 2: lattice [0, 4), centered [-2, 2). One leaf at lattice (3, 0, 1).
        let leaf = OctreeNode::leaf(Rgb8::WHITE);
        // Level 1 octant: x = 1, y = 0, z = 0. Level 2 octant: x = 1, y = 0, z = 1.
        let inner = branch_with(&[(0b101, leaf)]);
        let root = branch_with(&[(0b001, inner)]);
        let octree = Octree::new(root, 2).unwrap();

        assert_eq!(octree.node_count(), 3);
        assert_eq!(octree.leaf_count(), 1);
        assert_eq!(
            *octree.bounds(),
            Aabb3::from_min_max(Vec3::new(1.0, -2.0, -1.0), Vec3::new(2.0, -1.0, 0.0))
        );
    }

    #[test]
    fn coarse_leaves_cover_their_whole_cube() {
        let root = branch_with(&[(7, OctreeNode::leaf(Rgb8::WHITE))]);
        let octree = Octree::new(root, 3).unwrap();

        assert_eq!(
            *octree.bounds(),
            Aabb3::from_min_max(Vec3::ZERO, Vec3::splat(4.0))
        );
    }

    #[test]
    fn tree_taller_than_depth_is_rejected() {
        let root = branch_with(&[(0, branch_with(&[(0, OctreeNode::leaf(Rgb8::WHITE))]))]);

        assert!(matches!(
            Octree::new(root.clone(), 1),
            Err(ImportError::TooDeep { depth: 2, max: 1 })
        ));
        assert!(Octree::new(root, 2).is_ok());
        assert!(matches!(
            Octree::new(OctreeNode::leaf(Rgb8::WHITE), MAX_OCTREE_DEPTH + 1),
            Err(ImportError::TooDeep { .. })
        ));
    }

    #[test]
    fn single_leaf_octree() {
        let octree = Octree::from_leaf(Rgb8::new(1, 2, 3));

        assert_eq!(octree.depth(), 0);
        assert_eq!(octree.edge_length(), 1);
        assert_eq!(octree.node_count(), 1);
        assert_eq!(Octree::new(OctreeNode::leaf(Rgb8::new(1, 2, 3)), 0).unwrap(), octree);
    }

    #[test]
    fn visitor_can_prune_and_exit_early() {
        let root = branch_with(&[
            (0, branch_with(&[(3, OctreeNode::leaf(Rgb8::WHITE))])),
            (5, OctreeNode::leaf(Rgb8::BLACK)),
        ]);
        let octree = Octree::new(root, 2).unwrap();

        let mut levels = Vec::new();
        octree.visit_preorder(&mut |visit: &VisitedNode<'_>| {
            levels.push(visit.level);
            if visit.level == 1 {
                VisitStatus::Stop
            } else {
                VisitStatus::Continue
            }
        });
        assert_eq!(levels, vec![0, 1, 1]);

        let mut visited = 0;
        let status = octree.visit_preorder(&mut |_: &VisitedNode<'_>| {
            visited += 1;
            if visited == 2 {
                VisitStatus::ExitEarly
            } else {
                VisitStatus::Continue
            }
        });
        assert_eq!(status, VisitStatus::ExitEarly);
        assert_eq!(visited, 2);
    }
}
