//! The binary octree format.
//!
//! ```text
//! header := attribute_count:u8 { name_len:u8 name:[u8; name_len] width:u8 }* depth:u8
//! node   := mask:u8 (mask == 0 ? leaf_bytes:[u8; voxel_len] : node{popcount(mask)})
//! ```
//!
//! `voxel_len` is the sum of all attribute widths. The children of a branch follow it in ascending octant order, and each
//! leaf stores the bytes of every attribute channel back to back, in header order. Attribute names are matched
//! case-insensitively.

use crate::{Children, ImportError, Octree, OctreeNode};

use octoraster_core::{OctantIndex, Rgb8, MAX_OCTREE_DEPTH};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::ops::Range;
use std::path::Path;

/// Selects which attribute channels feed the voxel colors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BinaryImportOptions {
    /// Required. Must be at least 3 bytes wide; bytes past the first 3 are ignored.
    pub color_channel: String,
    /// Parsed and skipped. Voxels are drawn unshaded.
    pub normal_channel: Option<String>,
    /// When present, each color byte `c` is darkened to `c * ao / 255`.
    pub ao_channel: Option<String>,
    /// The stream uses Z as its up axis. Swaps the Y and Z child bits so the octree comes out Y-up.
    pub z_up: bool,
}

impl Default for BinaryImportOptions {
    fn default() -> Self {
        Self {
            color_channel: "color".into(),
            normal_channel: Some("normal".into()),
            ao_channel: None,
            z_up: true,
        }
    }
}

/// Parses a binary octree from `reader`. The reader is consumed byte by byte, so wrap files in a `BufReader`.
pub fn read_binary(reader: impl Read, options: &BinaryImportOptions) -> Result<Octree, ImportError> {
    let mut reader = ByteReader::new(reader);
    let layout = LeafLayout::read(&mut reader, options)?;

    let depth = reader.read_u8()?;
    if depth > MAX_OCTREE_DEPTH {
        return Err(ImportError::TooDeep {
            depth: depth as u32,
            max: MAX_OCTREE_DEPTH,
        });
    }

    let mut leaf_bytes = vec![0; layout.voxel_len];
    let root = read_node(&mut reader, &layout, options.z_up, depth, &mut leaf_bytes)?;
    let octree = Octree::new(root, depth)?;

    tracing::debug!(
        depth = octree.depth(),
        nodes = octree.node_count(),
        bytes = reader.offset,
        "imported binary octree"
    );

    Ok(octree)
}

pub fn from_slice(bytes: &[u8], options: &BinaryImportOptions) -> Result<Octree, ImportError> {
    read_binary(bytes, options)
}

pub fn from_file(path: impl AsRef<Path>, options: &BinaryImportOptions) -> Result<Octree, ImportError> {
    let file = File::open(path)?;

    read_binary(BufReader::new(file), options)
}

/// Writes `octree` in the binary format with a single 3-byte `color` channel and no axis conversion, i.e. it reads back
/// unchanged with `z_up: false`.
pub fn write_binary(octree: &Octree, writer: impl Write) -> io::Result<()> {
    let mut writer = BufWriter::new(writer);
    let name = b"color";
    writer.write_all(&[1, name.len() as u8])?;
    writer.write_all(name)?;
    writer.write_all(&[3, octree.depth()])?;
    write_node(octree.root(), &mut writer)?;

    writer.flush()
}

fn write_node(node: &OctreeNode, writer: &mut impl Write) -> io::Result<()> {
    match node {
        OctreeNode::Leaf { color } => writer.write_all(&[0, color.r, color.g, color.b]),
        OctreeNode::Branch { .. } => {
            writer.write_all(&[node.child_mask()])?;
            for (_, child) in node.children() {
                write_node(child, writer)?;
            }

            Ok(())
        }
    }
}

/// Where the interesting channels sit within the bytes of one leaf.
#[derive(Debug)]
struct LeafLayout {
    voxel_len: usize,
    color: Range<usize>,
    ao: Option<Range<usize>>,
}

impl LeafLayout {
    fn read(reader: &mut ByteReader<impl Read>, options: &BinaryImportOptions) -> Result<Self, ImportError> {
        let mut voxel_len = 0;
        let mut color = None;
        let mut normal = None;
        let mut ao = None;

        let count = reader.read_u8()?;
        for _ in 0..count {
            let name_len = reader.read_u8()? as usize;
            let mut name = vec![0; name_len];
            reader.read_exact(&mut name)?;
            let name = String::from_utf8_lossy(&name).into_owned();
            let width = reader.read_u8()? as usize;

            let range = voxel_len..voxel_len + width;
            voxel_len += width;

            // The first matching option wins when one name is used for several purposes.
            if color.is_none() && name.eq_ignore_ascii_case(&options.color_channel) {
                if width < 3 {
                    return Err(ImportError::MalformedHeader(format!(
                        "color channel `{}` is {} bytes wide, expected at least 3",
                        name, width
                    )));
                }
                color = Some(range);
            } else if normal.is_none() && matches_option(&name, &options.normal_channel) {
                normal = Some(range);
            } else if ao.is_none() && matches_option(&name, &options.ao_channel) {
                if width == 0 {
                    return Err(ImportError::MalformedHeader(format!(
                        "ambient occlusion channel `{}` has no bytes",
                        name
                    )));
                }
                ao = Some(range);
            }
        }

        let color = color.ok_or_else(|| ImportError::MissingChannel(options.color_channel.clone()))?;
        if let (Some(name), None) = (&options.normal_channel, &normal) {
            tracing::warn!(channel = %name, "normal channel not found");
        }
        if let (Some(name), None) = (&options.ao_channel, &ao) {
            tracing::warn!(channel = %name, "ambient occlusion channel not found");
        }

        Ok(Self { voxel_len, color, ao })
    }

    fn leaf_color(&self, bytes: &[u8]) -> Rgb8 {
        let color = &bytes[self.color.clone()];
        let mut rgb = [color[0], color[1], color[2]];
        if let Some(ao) = &self.ao {
            let ao = &bytes[ao.clone()];
            for (c, channel) in rgb.iter_mut().enumerate() {
                let factor = ao[c.min(ao.len() - 1)];
                *channel = ((*channel as u32 * factor as u32) / 255) as u8;
            }
        }

        Rgb8::from(rgb)
    }
}

fn matches_option(name: &str, option: &Option<String>) -> bool {
    option.as_deref().map_or(false, |o| name.eq_ignore_ascii_case(o))
}

fn read_node(
    reader: &mut ByteReader<impl Read>,
    layout: &LeafLayout,
    z_up: bool,
    levels_below: u8,
    leaf_bytes: &mut [u8],
) -> Result<OctreeNode, ImportError> {
    let mask_offset = reader.offset;
    let mask = reader.read_u8()?;

    if mask == 0 {
        reader.read_exact(leaf_bytes)?;

        return Ok(OctreeNode::leaf(layout.leaf_color(leaf_bytes)));
    }

    if levels_below == 0 {
        return Err(ImportError::BranchAtMaxDepth { offset: mask_offset });
    }

    let mut children = Box::<Children>::default();
    for octant in OctantIndex::iter_mask(mask) {
        let child = read_node(reader, layout, z_up, levels_below - 1, leaf_bytes)?;
        let slot = if z_up { octant.swap_yz() } else { octant };
        children[slot.as_usize()] = Some(child);
    }

    Ok(OctreeNode::branch(children))
}

/// Tracks the stream position for error reporting.
struct ByteReader<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> ByteReader<R> {
    fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    fn read_u8(&mut self) -> Result<u8, ImportError> {
        let mut byte = [0];
        self.read_exact(&mut byte)?;

        Ok(byte[0])
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ImportError> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.offset += buf.len() as u64;

                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(ImportError::UnexpectedEof { offset: self.offset })
            }
            Err(e) => Err(e.into()),
        }
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
