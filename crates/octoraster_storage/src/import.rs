//! Loading an `Octree` from the two asset formats: the compact binary node stream and the plain-text point list.
//!
//! Every importer either returns a complete `Octree` or an `ImportError`; nothing is left half-built.

mod binary;
mod point_list;

pub use binary::*;
pub use point_list::*;
