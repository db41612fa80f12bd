use thiserror::Error;

/// Everything that can abort an octree import. A failed import never produces a partial `Octree`.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read octree data: {0}")]
    Io(#[from] std::io::Error),

    #[error("octree data ended unexpectedly at byte {offset}")]
    UnexpectedEof { offset: u64 },

    #[error("octree depth {depth} exceeds the supported maximum of {max}")]
    TooDeep { depth: u32, max: u8 },

    #[error("malformed attribute header: {0}")]
    MalformedHeader(String),

    #[error("attribute channel `{0}` is not declared in the header")]
    MissingChannel(String),

    #[error("branch node at byte {offset} lies below the deepest octree level")]
    BranchAtMaxDepth { offset: u64 },

    #[error("point list line {line}: {reason}")]
    InvalidPointLine { line: usize, reason: String },

    #[error("point {point:?} lies outside an octree of edge length {edge_length}")]
    PointOutOfRange { point: [u32; 3], edge_length: u32 },

    #[error("no voxels to build an octree from")]
    Empty,
}
