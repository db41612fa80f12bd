//! The hierarchical octree rasterizer.
//!
//! Each object is drawn by a depth-first walk over its octree, driven by an explicit stack with one frame per level. A
//! visited node is first culled against the clip planes and then projected to a screen rectangle. From there it either
//! becomes a leaf (a true leaf, or an inner node too small on screen to be worth descending) and is written with a
//! depth test, or it is tested for occlusion at its nearest possible depth and its children are pushed.
//!
//! # Level tables
//!
//! Nodes on the same level of one object have the same size and the same offsets to their children, so those are computed
//! once per level rather than once per node. The table for level `L + 1` is the table for level `L` halved. Tables are
//! derived lazily on first descent and stay valid until the traversal leaves a subtree whose projection mode differs from
//! its parent's.
//!
//! # Orthographic promotion
//!
//! Far from the eye, the perspective scale barely changes across a node, and projecting the node's corners once gives
//! pixel offsets that are accurate enough for its whole subtree. Such a node is switched to orthographic mode: its center
//! and child offsets become pixel coordinates, and descendants are placed by adding offsets.

use crate::{ChildOffset, FrameBuffers, LevelRadius, RasterConfig, RasterStats, RootProjection, ViewConstants};

use octoraster_core::{
    glam::{Vec2, Vec3, Vec4},
    Rgba8, MAX_OCTREE_DEPTH,
};
use octoraster_storage::{Octree, OctreeNode};

const MAX_LEVELS: usize = MAX_OCTREE_DEPTH as usize + 1;

/// Draws octrees into `FrameBuffers`. Holds only scratch space, so one instance can draw any number of objects and frames,
/// one at a time.
pub struct OctreeRasterizer {
    levels: Box<[LevelTable; MAX_LEVELS]>,
}

impl Default for OctreeRasterizer {
    fn default() -> Self {
        Self {
            levels: Box::new([LevelTable::EMPTY; MAX_LEVELS]),
        }
    }
}

impl OctreeRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `octree` starting from `root`. `view` must describe a target of the same size as `buffers`.
    pub fn rasterize(
        &mut self,
        octree: &Octree,
        root: &RootProjection,
        tint: Rgba8,
        view: &ViewConstants,
        config: &RasterConfig,
        buffers: &mut FrameBuffers,
    ) -> RasterStats {
        debug_assert_eq!((view.width, view.height), (buffers.width(), buffers.height()));
        debug_assert!(octree.depth() <= MAX_OCTREE_DEPTH);

        self.levels[0] = LevelTable {
            offsets: root.offsets,
            radius: root.radius,
        };

        let width = buffers.width();
        let (color, depth) = buffers.targets_mut();
        let lod_radius = config.lod_pixels * 0.5;
        let mut traversal = Traversal {
            levels: &mut self.levels,
            valid_levels: 1,
            color,
            depth,
            width,
            view,
            lod_radius,
            lod_factor: lod_radius / view.scale,
            switch_pixels: config.ortho_switch_pixels,
            tint,
            stats: RasterStats::default(),
        };
        traversal.run(StackFrame {
            node: octree.root(),
            center: root.center,
            orthographic: root.orthographic,
            cursor: 0,
        });

        traversal.stats
    }
}

#[derive(Clone, Copy, Debug)]
struct LevelTable {
    offsets: [ChildOffset; 8],
    radius: LevelRadius,
}

impl LevelTable {
    const EMPTY: Self = Self {
        offsets: [ChildOffset::ZERO; 8],
        radius: Vec4::ZERO,
    };

    /// The table of the level below. Pixel radii lose another quarter pixel to keep the half-pixel inset.
    fn halved(&self) -> Self {
        let r = self.radius;

        Self {
            offsets: self.offsets.map(|o| ChildOffset {
                octant: o.octant,
                delta: o.delta * 0.5,
            }),
            radius: Vec4::new(r.x * 0.5 - 0.25, r.y * 0.5 - 0.25, r.z * 0.5, r.w * 0.5),
        }
    }
}

#[derive(Clone, Copy)]
struct StackFrame<'a> {
    node: &'a OctreeNode,
    /// Perspective: view-space center. Orthographic: pixel position and view depth.
    center: Vec3,
    orthographic: bool,
    /// Next entry of the level's offsets table to try.
    cursor: u8,
}

enum Step {
    Visit,
    NextChild,
    Ascend,
}

enum Outcome {
    Done,
    Descend,
}

struct Traversal<'r> {
    levels: &'r mut [LevelTable; MAX_LEVELS],
    /// Tables `0..valid_levels` are consistent with the current stack.
    valid_levels: usize,
    color: &'r mut [Rgba8],
    depth: &'r mut [f32],
    width: usize,
    view: &'r ViewConstants,
    /// Orthographic nodes resolve as leaves at this pixel half extent.
    lod_radius: f32,
    /// Perspective nodes resolve as leaves at this ratio of radius to depth.
    lod_factor: f32,
    switch_pixels: f32,
    tint: Rgba8,
    stats: RasterStats,
}

impl Traversal<'_> {
    fn run(&mut self, root: StackFrame<'_>) {
        let mut stack = [root; MAX_LEVELS];
        let mut level = 0;
        let mut step = Step::Visit;

        loop {
            step = match step {
                Step::Visit => match self.visit(&mut stack[level], level) {
                    Outcome::Done => Step::Ascend,
                    Outcome::Descend => Step::NextChild,
                },
                Step::NextChild => match self.next_child(&mut stack[level], level) {
                    None => Step::Ascend,
                    Some((node, delta)) => {
                        let parent = stack[level];
                        level += 1;
                        debug_assert!(level < MAX_LEVELS);
                        if level == self.valid_levels {
                            self.levels[level] = self.levels[level - 1].halved();
                            self.valid_levels += 1;
                        }
                        stack[level] = StackFrame {
                            node,
                            center: parent.center + delta,
                            orthographic: parent.orthographic,
                            cursor: 0,
                        };

                        Step::Visit
                    }
                },
                Step::Ascend => {
                    if level == 0 {
                        break;
                    }
                    let child_orthographic = stack[level].orthographic;
                    level -= 1;
                    if stack[level].orthographic != child_orthographic {
                        // The tables below were derived in the child's projection mode.
                        self.valid_levels = level + 1;
                    }

                    Step::NextChild
                }
            };
        }
    }

    fn next_child<'a>(&self, frame: &mut StackFrame<'a>, level: usize) -> Option<(&'a OctreeNode, Vec3)> {
        let offsets = &self.levels[level].offsets;
        while let Some(offset) = offsets.get(frame.cursor as usize) {
            frame.cursor += 1;
            if let Some(child) = frame.node.child(offset.octant) {
                return Some((child, offset.delta));
            }
        }

        None
    }

    fn visit(&mut self, frame: &mut StackFrame<'_>, level: usize) -> Outcome {
        self.stats.processed += 1;

        let view = self.view;
        let r = self.levels[level].radius;
        let z = frame.center.z;
        let closest = z - r.w;
        let farthest = z + r.w;
        if closest > view.far || farthest < view.near {
            return Outcome::Done;
        }

        let is_leaf = frame.node.is_leaf();
        if z < view.near {
            // The center is behind the near plane, so nothing sensible can be projected.
            return if is_leaf { Outcome::Done } else { self.descend() };
        }
        let straddles_near = closest < view.near;

        let mut try_promotion = false;
        let (resolved, min, max) = if frame.orthographic {
            self.stats.orthographic += 1;

            let resolved = is_leaf || r.z <= self.lod_radius;
            if straddles_near && !resolved {
                return self.descend();
            }
            let center = frame.center.truncate();
            let half = Vec2::new(r.x, r.y);

            (resolved, center - half, center + half)
        } else {
            self.stats.perspective += 1;

            let closest_clamped = closest.max(view.near);
            let resolved = is_leaf || r.w <= self.lod_factor * closest_clamped;
            if straddles_near && !resolved {
                return self.descend();
            }
            let k_closest = view.scale / closest_clamped;
            let k_center = view.scale / z;
            // Cheap estimate of the error; `promote_to_orthographic` checks the corners.
            try_promotion = !resolved && (k_closest - k_center) * r.w < self.switch_pixels * 0.5;

            let center = Vec2::new(
                view.half_width + frame.center.x * k_center,
                view.half_height + frame.center.y * k_center,
            );
            let half = Vec2::splat(r.w * k_closest - 0.5);

            (resolved, center - half, center + half)
        };

        let rect = match PixelRect::clip(min, max, view.width, view.height) {
            Some(rect) => rect,
            None => {
                self.stats.occluded += 1;
                return Outcome::Done;
            }
        };

        if resolved {
            let color = Rgba8::from(frame.node.color()).tinted(self.tint);
            self.write(&rect, z, color);
            if rect.is_single_pixel() {
                self.stats.pixel_leaves += 1;
            } else {
                self.stats.leaves += 1;
            }

            return Outcome::Done;
        }

        if !self.any_farther(&rect, closest) {
            self.stats.occluded += 1;
            return Outcome::Done;
        }

        if try_promotion {
            let table = &mut self.levels[level];
            if let Some(promotion) =
                promote_to_orthographic(frame.center, &table.offsets, r.w, view, self.switch_pixels)
            {
                table.offsets = promotion.offsets;
                table.radius = promotion.radius;
                frame.center = promotion.center;
                frame.orthographic = true;
                self.valid_levels = level + 1;
                self.stats.promoted += 1;
            }
        }

        self.descend()
    }

    #[inline]
    fn descend(&mut self) -> Outcome {
        self.stats.descended += 1;

        Outcome::Descend
    }

    fn write(&mut self, rect: &PixelRect, depth: f32, color: Rgba8) {
        for y in rect.y0..=rect.y1 {
            let row = y * self.width;
            let span = row + rect.x0..=row + rect.x1;
            for (d, c) in self.depth[span.clone()].iter_mut().zip(&mut self.color[span]) {
                if depth < *d {
                    *d = depth;
                    *c = color;
                }
            }
        }
    }

    /// Whether any covered pixel is farther than `depth`, i.e. could still be overwritten by something at `depth`.
    fn any_farther(&self, rect: &PixelRect, depth: f32) -> bool {
        (rect.y0..=rect.y1).any(|y| {
            let row = y * self.width;
            self.depth[row + rect.x0..=row + rect.x1].iter().any(|&d| d > depth)
        })
    }
}

/// An inclusive range of pixels.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct PixelRect {
    x0: usize,
    x1: usize,
    y0: usize,
    y1: usize,
}

impl PixelRect {
    /// Clamps a footprint to `[0, width - 0.5] x [0, height - 0.5]` and takes the pixels containing its corners. `None`
    /// when nothing is left.
    fn clip(min: Vec2, max: Vec2, width: usize, height: usize) -> Option<Self> {
        let min = min.max(Vec2::ZERO).floor();
        let max = max
            .min(Vec2::new(width as f32 - 0.5, height as f32 - 0.5))
            .floor();
        if !(max.x >= min.x && max.y >= min.y) {
            return None;
        }

        Some(Self {
            x0: min.x as usize,
            x1: max.x as usize,
            y0: min.y as usize,
            y1: max.y as usize,
        })
    }

    #[inline]
    fn is_single_pixel(&self) -> bool {
        self.x0 == self.x1 && self.y0 == self.y1
    }
}

/// A perspective node re-expressed in orthographic mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Promotion {
    /// Pixel position and view depth.
    pub center: Vec3,
    /// Pixel offsets to the children, in the same order as the perspective offsets.
    pub offsets: [ChildOffset; 8],
    pub radius: LevelRadius,
}

/// Projects the 8 corners of a perspective node, given its view-space `center` and child `offsets`, and returns the
/// equivalent orthographic node if the perspective scale varies by less than `max_error_pixels` of footprint across it.
pub(crate) fn promote_to_orthographic(
    center: Vec3,
    offsets: &[ChildOffset; 8],
    bounding_radius: f32,
    view: &ViewConstants,
    max_error_pixels: f32,
) -> Option<Promotion> {
    let center_px = view.project(center);

    let mut px_min = Vec2::splat(f32::INFINITY);
    let mut px_max = Vec2::splat(f32::NEG_INFINITY);
    let mut k_min = f32::INFINITY;
    let mut k_max = 0.0f32;
    let mut promoted = *offsets;
    for offset in promoted.iter_mut() {
        // Child offsets are half the offsets to the corners.
        let corner = center + offset.delta * 2.0;
        if corner.z <= 0.0 {
            return None;
        }
        let k = view.scale / corner.z;
        let px = Vec2::new(view.half_width + corner.x * k, view.half_height + corner.y * k);
        px_min = px_min.min(px);
        px_max = px_max.max(px);
        k_min = k_min.min(k);
        k_max = k_max.max(k);

        offset.delta = ((px - center_px) * 0.5).extend((corner.z - center.z) * 0.5);
    }

    let error = (k_max - k_min) * bounding_radius;
    if !(error < max_error_pixels) {
        return None;
    }

    let half = (px_max - px_min) * 0.5;

    Some(Promotion {
        center: center_px.extend(center.z),
        offsets: promoted,
        radius: Vec4::new(half.x - 0.5, half.y - 0.5, half.x.max(half.y), bounding_radius),
    })
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

    use crate::{Camera, ChildOrder, OctreePlacement, VoxelObject};

    use octoraster_core::{
        glam::{Affine3A, Vec3},
        OctantIndex, Rgb8,
    };
    use pretty_assertions::assert_eq;
    use std::f32::consts::FRAC_PI_2;
    use std::sync::Arc;
    use utilities::{
        data_sets::{full_cube_octree, slab_octree, sphere_octree},
        test::{ascii_coverage, test_print},
    };

    const RED: Rgb8 = Rgb8::new(200, 100, 50);

    struct Scene {
        camera: Camera,
        config: RasterConfig,
        buffers: FrameBuffers,
        rasterizer: OctreeRasterizer,
    }

    impl Scene {
        fn new(camera: Camera, size: usize) -> Self {
            Self {
                camera,
                config: RasterConfig::default(),
                buffers: FrameBuffers::new(size, size),
                rasterizer: OctreeRasterizer::new(),
            }
        }

        fn view(&self) -> ViewConstants {
            self.camera.view_constants(self.buffers.width(), self.buffers.height())
        }

        fn draw(&mut self, object: &VoxelObject) -> RasterStats {
            let view = self.view();
            let octree = object.octree.as_deref().unwrap();
            let placement = OctreePlacement::new(object, octree, self.config.center_on_bounds);
            let view_from_local = self.camera.view_from_world() * object.world_from_local;
            let root = RootProjection::new(&placement, &view_from_local, &view, self.config.child_order);

            self.rasterizer
                .rasterize(octree, &root, object.tint, &view, &self.config, &mut self.buffers)
        }

        fn covered(&self) -> usize {
            self.buffers.depth().iter().filter(|d| d.is_finite()).count()
        }

        fn print(&self) {
            let b = &self.buffers;
            test_print(ascii_coverage(b.width(), b.height(), |x, y| b.depth_at(x, y).is_finite()));
        }
    }

    fn leaf_at(color: Rgb8, scale: f32, position: Vec3) -> VoxelObject {
        VoxelObject::new(Arc::new(Octree::from_leaf(color)))
            .with_scale(scale, false)
            .with_transform(Affine3A::from_translation(position))
    }

    fn assert_filled_square(buffers: &FrameBuffers, pixels: std::ops::RangeInclusive<usize>, color: Rgba8, depth: f32) {
        for y in 0..buffers.height() {
            for x in 0..buffers.width() {
                if pixels.contains(&x) && pixels.contains(&y) {
                    assert_eq!((buffers.color_at(x, y), buffers.depth_at(x, y)), (color, depth), "({}, {})", x, y);
                } else {
                    assert_eq!(
                        (buffers.color_at(x, y), buffers.depth_at(x, y)),
                        (Rgba8::TRANSPARENT, f32::INFINITY),
                        "({}, {})",
                        x,
                        y
                    );
                }
            }
        }
    }

    #[test]
    fn single_leaf_perspective_footprint() {
        let mut scene = Scene::new(Camera::perspective(FRAC_PI_2, 0.1, 100.0).unwrap(), 64);
        let tint = Rgba8::new(255, 128, 0, 200);
        let object = leaf_at(RED, 2.0, Vec3::new(0.0, 0.0, 10.0)).with_tint(tint);

        let stats = scene.draw(&object);
        scene.print();

        // The cube's bounding radius is sqrt(3), projected at the depth of its nearest point.
        let r = 3f32.sqrt();
        let half = r * (scene.view().scale / (10.0 - r)) - 0.5;
        let lo = (32.0 - half).floor() as usize;
        let hi = (32.0 + half).floor() as usize;
        assert_eq!((lo, hi), (25, 38));
        assert_filled_square(&scene.buffers, lo..=hi, Rgba8::new(200, 50, 0, 200), 10.0);
        assert_eq!(
            stats,
            RasterStats {
                processed: 1,
                perspective: 1,
                leaves: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn single_leaf_orthographic_footprint() {
        // 4 pixels per unit.
        let mut scene = Scene::new(Camera::orthographic(8.0, 0.1, 100.0).unwrap(), 64);
        let object = leaf_at(RED, 2.0, Vec3::new(0.0, 0.0, 10.0));

        scene.draw(&object);

        assert_filled_square(&scene.buffers, 28..=35, Rgba8::from(RED), 10.0);
    }

    #[test]
    fn nearer_full_screen_object_hides_farther_one() {
        let camera = Camera::perspective(FRAC_PI_2, 0.1, 100.0).unwrap();
        let far = VoxelObject::new(Arc::new(full_cube_octree(3)))
            .with_scale(0.25, true)
            .with_transform(Affine3A::from_translation(Vec3::new(0.0, 0.0, 10.0)));
        let near = leaf_at(Rgb8::new(0, 255, 0), 12.0, Vec3::new(0.0, 0.0, 5.0));

        let mut near_first = Scene::new(camera, 64);
        near_first.draw(&near);
        let stats = near_first.draw(&far);
        // The root of the far object is rejected without descending.
        assert_eq!(stats.descended, 0);
        assert_eq!(stats.occluded, 1);

        let mut far_first = Scene::new(camera, 64);
        far_first.draw(&far);
        far_first.draw(&near);

        for scene in [&near_first, &far_first] {
            assert!(scene.buffers.color().iter().all(|&c| c == Rgba8::new(0, 255, 0, 255)));
            assert!(scene.buffers.depth().iter().all(|&d| d == 5.0));
        }
    }

    #[test]
    fn object_beyond_far_plane_writes_nothing() {
        let mut scene = Scene::new(Camera::perspective(1.0, 0.1, 100.0).unwrap(), 32);
        let object = VoxelObject::new(Arc::new(full_cube_octree(3)))
            .with_transform(Affine3A::from_translation(Vec3::new(0.0, 0.0, 200.0)));

        let stats = scene.draw(&object);

        assert_eq!(
            stats,
            RasterStats {
                processed: 1,
                ..Default::default()
            }
        );
        assert_eq!(scene.buffers, FrameBuffers::new(32, 32));
    }

    #[test]
    fn object_behind_the_eye_writes_nothing() {
        let mut scene = Scene::new(Camera::perspective(1.0, 0.1, 100.0).unwrap(), 32);
        let object = VoxelObject::new(Arc::new(full_cube_octree(2)))
            .with_transform(Affine3A::from_translation(Vec3::new(0.0, 0.0, -5.0)));

        scene.draw(&object);

        assert_eq!(scene.covered(), 0);
    }

    #[test]
    fn camera_inside_an_object_still_draws_the_voxels_in_front() {
        let mut scene = Scene::new(Camera::perspective(FRAC_PI_2, 0.1, 100.0).unwrap(), 32);
        // A 16-unit cube of 2-unit voxels, centered on the eye.
        let object = VoxelObject::new(Arc::new(full_cube_octree(3))).with_scale(2.0, true);

        let stats = scene.draw(&object);

        assert!(stats.descended > 0);
        assert_eq!(scene.covered(), 32 * 32);
        assert!(scene.buffers.depth().iter().all(|&d| d > 0.0));
    }

    #[test]
    fn draw_order_does_not_change_the_image() {
        let camera = Camera::orthographic(20.0, 0.1, 1000.0).unwrap();
        let objects: Vec<VoxelObject> = (0..6)
            .map(|i| {
                let i = i as f32;
                VoxelObject::new(Arc::new(sphere_octree(4, Rgb8::new(40 * i as u8, 255, 0))))
                    .with_scale(1.5, true)
                    .with_transform(Affine3A::from_translation(Vec3::new(
                        (i * 7.3) % 20.0 - 10.0,
                        (i * 4.1) % 16.0 - 8.0,
                        50.0 + i * 3.7,
                    )))
            })
            .collect();

        let mut forward = Scene::new(camera, 96);
        for object in &objects {
            forward.draw(object);
        }
        let mut backward = Scene::new(camera, 96);
        for object in objects.iter().rev() {
            backward.draw(object);
        }

        assert!(forward.covered() > 0);
        assert_eq!(forward.buffers, backward.buffers);
    }

    #[test]
    fn raising_lod_never_descends_more() {
        // 2 pixels per unit and a 32x32 slab of 1-unit voxels fills the whole target.
        let camera = Camera::orthographic(16.0, 0.1, 100.0).unwrap();
        let object = VoxelObject::new(Arc::new(slab_octree(5, 1, Rgb8::WHITE)))
            .with_scale(1.0, true)
            .with_transform(Affine3A::from_translation(Vec3::new(0.0, 0.0, 50.0)));

        let mut previous: Option<RasterStats> = None;
        for lod in [0.0, 1.0, 2.0, 4.0, 8.0, 16.0, 64.0] {
            let mut scene = Scene::new(camera, 64);
            scene.config.lod_pixels = lod;
            let stats = scene.draw(&object);

            assert_eq!(scene.covered(), 64 * 64, "lod {}", lod);
            if lod == 0.0 {
                assert_eq!(stats.drawn(), 32 * 32);
            }
            if let Some(previous) = previous {
                assert!(stats.descended <= previous.descended, "lod {}", lod);
            }
            previous = Some(stats);
        }
        assert_eq!(previous.map(|s| (s.descended, s.drawn())), Some((0, 1)));
    }

    #[test]
    fn promotion_matches_perspective_within_threshold() {
        let camera = Camera::perspective(FRAC_PI_2, 0.1, 1000.0).unwrap();
        let view = camera.view_constants(64, 64);
        let center = Vec3::new(3.0, 2.0, 100.0);
        let offsets = OctantIndex::ALL.map(|octant| ChildOffset {
            octant,
            delta: octant.sign() * 0.5,
        });
        let radius = 3f32.sqrt();

        let promotion = promote_to_orthographic(center, &offsets, radius, &view, 1.0).unwrap();

        assert_eq!(promotion.center.truncate(), view.project(center));
        assert_eq!(promotion.center.z, center.z);
        for (exact, approx) in offsets.iter().zip(&promotion.offsets) {
            assert_eq!(exact.octant, approx.octant);
            let child_px = view.project(center + exact.delta);
            let approx_px = promotion.center.truncate() + approx.delta.truncate();
            assert!((child_px - approx_px).abs().max_element() < 1.0);
        }
        // The cube spans about two thirds of a pixel.
        assert!(promotion.radius.z > 0.3 && promotion.radius.z < 0.4);

        // Near the eye the scale varies far too much.
        let near = Vec3::new(0.0, 0.0, 3.0);
        assert_eq!(promote_to_orthographic(near, &offsets, radius, &view, 1.0), None);
    }

    #[test]
    fn promoted_subtrees_look_like_perspective_ones() {
        let camera = Camera::perspective(FRAC_PI_2, 0.1, 1000.0).unwrap();
        let object = VoxelObject::new(Arc::new(sphere_octree(5, Rgb8::WHITE)))
            .with_scale(1.0, true)
            .with_transform(Affine3A::from_translation(Vec3::new(4.0, -3.0, 40.0)));

        let mut exact = Scene::new(camera, 128);
        exact.config.ortho_switch_pixels = 0.0;
        let exact_stats = exact.draw(&object);
        let mut promoted = Scene::new(camera, 128);
        let promoted_stats = promoted.draw(&object);
        promoted.print();

        assert_eq!(exact_stats.promoted, 0);
        assert_eq!(exact_stats.orthographic, 0);
        assert!(promoted_stats.promoted > 0);
        assert!(promoted_stats.orthographic > 0);

        let covered = exact.covered();
        let differing = exact
            .buffers
            .depth()
            .iter()
            .zip(promoted.buffers.depth())
            .filter(|(a, b)| a.is_finite() != b.is_finite())
            .count();
        assert!(covered > 1000);
        assert!(differing * 4 < covered, "{} of {} pixels differ", differing, covered);
    }

    #[test]
    fn rasterizer_is_reusable_across_objects() {
        let camera = Camera::perspective(1.0, 0.1, 1000.0).unwrap();
        let big = VoxelObject::new(Arc::new(sphere_octree(5, Rgb8::WHITE)))
            .with_scale(1.0, true)
            .with_transform(Affine3A::from_translation(Vec3::new(0.0, 0.0, 80.0)));
        let small = leaf_at(RED, 1.0, Vec3::new(0.0, 0.0, 20.0));

        let mut reused = Scene::new(camera, 64);
        reused.draw(&big);
        reused.draw(&small);

        let mut fresh = Scene::new(camera, 64);
        fresh.draw(&big);
        fresh.rasterizer = OctreeRasterizer::new();
        fresh.draw(&small);

        assert_eq!(reused.buffers, fresh.buffers);
    }

    #[test]
    fn clip_handles_edges() {
        let clip = |min: (f32, f32), max: (f32, f32)| PixelRect::clip(min.into(), max.into(), 8, 4);

        assert_eq!(
            clip((-3.0, -3.0), (100.0, 100.0)),
            Some(PixelRect {
                x0: 0,
                x1: 7,
                y0: 0,
                y1: 3
            })
        );
        assert_eq!(
            clip((2.2, 1.9), (2.8, 1.95)),
            Some(PixelRect {
                x0: 2,
                x1: 2,
                y0: 1,
                y1: 1
            })
        );
        // Inverted by a negative inset.
        assert_eq!(clip((3.6, 1.0), (2.9, 2.0)), None);
        assert_eq!(clip((-5.0, 0.0), (-0.5, 2.0)), None);
        assert_eq!(clip((8.0, 0.0), (9.0, 2.0)), None);
    }
}
