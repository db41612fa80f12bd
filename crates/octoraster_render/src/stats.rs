use std::ops::AddAssign;

/// Counts of what the rasterizer did with the nodes it visited.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RasterStats {
    /// Nodes popped off the traversal stack, including culled ones.
    pub processed: u64,
    /// Nodes projected with orthographic math.
    pub orthographic: u64,
    /// Nodes projected with perspective math.
    pub perspective: u64,
    /// Nodes skipped because their footprint was off screen or every covered pixel was already closer.
    pub occluded: u64,
    /// Inner nodes whose children were visited.
    pub descended: u64,
    /// Nodes drawn as a rectangle of more than one pixel.
    pub leaves: u64,
    /// Nodes drawn as a single pixel.
    pub pixel_leaves: u64,
    /// Perspective nodes switched to orthographic projection for the rest of their subtree.
    pub promoted: u64,
}

impl RasterStats {
    /// All nodes that were drawn, whatever their size.
    #[inline]
    pub fn drawn(&self) -> u64 {
        self.leaves + self.pixel_leaves
    }
}

impl AddAssign for RasterStats {
    fn add_assign(&mut self, rhs: Self) {
        self.processed += rhs.processed;
        self.orthographic += rhs.orthographic;
        self.perspective += rhs.perspective;
        self.occluded += rhs.occluded;
        self.descended += rhs.descended;
        self.leaves += rhs.leaves;
        self.pixel_leaves += rhs.pixel_leaves;
        self.promoted += rhs.promoted;
    }
}
