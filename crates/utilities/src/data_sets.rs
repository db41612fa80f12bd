use octoraster_core::prelude::*;
use octoraster_storage::{Octree, OctreeBuilder};

// Fixture octrees are always built from valid points, so failures here are bugs in the fixture itself.

/// Every voxel of a `2^depth` cube, colored by position so that averaged branch colors differ from the leaves.
pub fn full_cube_octree(depth: u8) -> Octree {
    octree_from_fn(depth, |p| Some(gradient_color(p, depth)))
}

/// A solid ball inscribed in a `2^depth` cube.
pub fn sphere_octree(depth: u8, color: Rgb8) -> Octree {
    let half = (1u32 << depth) as f32 * 0.5;
    let radius = half - 1.0;
    octree_from_fn(depth, |[x, y, z]| {
        let d = [x, y, z].map(|c| c as f32 + 0.5 - half);
        (d[0] * d[0] + d[1] * d[1] + d[2] * d[2] < radius * radius).then(|| color)
    })
}

/// A slab of voxels `thickness` deep along Z, covering all of X and Y, starting at Z = 0.
pub fn slab_octree(depth: u8, thickness: u32, color: Rgb8) -> Octree {
    octree_from_fn(depth, |[_, _, z]| (z < thickness).then(|| color))
}

/// The text of a point list describing the same ball as `sphere_octree(8, color)`.
pub fn sphere_point_list(color: Rgb8) -> String {
    let mut text = String::new();
    sphere_octree(8, color).visit_preorder(&mut |visit: &octoraster_storage::VisitedNode<'_>| {
        if visit.node.is_leaf() {
            let p = visit.minimum;
            let c = visit.node.color();
            text.push_str(&format!("{}\t{}\t{}\t{}\t{}\t{}\n", p.x, p.y, p.z, c.r, c.g, c.b));
        }
        octoraster_storage::VisitStatus::Continue
    });

    text
}

fn gradient_color([x, y, z]: [u32; 3], depth: u8) -> Rgb8 {
    let scale = |c: u32| ((c << 8) >> depth).min(255) as u8;

    Rgb8::new(scale(x), scale(y), scale(z))
}

fn octree_from_fn(depth: u8, f: impl Fn([u32; 3]) -> Option<Rgb8>) -> Octree {
    let edge_length = 1u32 << depth;
    let mut builder = OctreeBuilder::new(depth).expect("fixture depth too large");
    for z in 0..edge_length {
        for y in 0..edge_length {
            for x in 0..edge_length {
                if let Some(color) = f([x, y, z]) {
                    builder.insert([x, y, z], color).expect("fixture point out of range");
                }
            }
        }
    }

    builder.build().expect("fixture octree is empty")
}
