use crate::{ImportError, Octree, OctreeBuilder};

use octoraster_core::Rgb8;

/// Point lists always describe a 256^3 volume.
pub const POINT_LIST_DEPTH: u8 = 8;

/// Parses a plain-text point list: one voxel per line as `x y z r g b`, separated by tabs or spaces. Blank lines are
/// skipped, and a point listed twice keeps its last color.
pub fn read_point_list(text: &str) -> Result<Octree, ImportError> {
    let mut builder = OctreeBuilder::new(POINT_LIST_DEPTH)?;
    let edge_length = 1u32 << POINT_LIST_DEPTH;

    let mut points = 0;
    for (i, line) in text.lines().enumerate() {
        let line_number = i + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != 6 {
            return Err(invalid_line(line_number, format!("expected 6 fields, found {}", fields.len())));
        }

        let mut point = [0; 3];
        for (axis, field) in point.iter_mut().zip(&fields[..3]) {
            *axis = field
                .parse::<u32>()
                .ok()
                .filter(|&c| c < edge_length)
                .ok_or_else(|| {
                    invalid_line(
                        line_number,
                        format!("coordinate `{}` is not in 0..{}", field, edge_length),
                    )
                })?;
        }

        let mut rgb = [0; 3];
        for (channel, field) in rgb.iter_mut().zip(&fields[3..]) {
            *channel = field.parse::<u8>().map_err(|_| {
                invalid_line(line_number, format!("color `{}` is not in 0..=255", field))
            })?;
        }

        builder.insert(point, Rgb8::from(rgb))?;
        points += 1;
    }

    let octree = builder.build()?;

    tracing::debug!(
        points,
        nodes = octree.node_count(),
        "imported point list octree"
    );

    Ok(octree)
}

fn invalid_line(line: usize, reason: String) -> ImportError {
    ImportError::InvalidPointLine { line, reason }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
