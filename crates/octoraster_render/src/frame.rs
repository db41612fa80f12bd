use crate::{
    Camera, ConfigError, DepthQuantizer, FrameBuffers, OctreePlacement, OctreeRasterizer, RasterConfig, RasterStats,
    RootProjection, VoxelObject,
};

use float_ord::FloatOrd;

/// Renders whole frames: owns the frame buffers and the rasterizer scratch space, and decides which objects to draw and
/// in what order.
pub struct FrameRenderer {
    config: RasterConfig,
    buffers: FrameBuffers,
    rasterizer: OctreeRasterizer,
    draw_order: Vec<(FloatOrd<f32>, usize)>,
}

impl FrameRenderer {
    pub fn new(config: RasterConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            buffers: FrameBuffers::new(0, 0),
            rasterizer: OctreeRasterizer::new(),
            draw_order: Vec::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: RasterConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;

        Ok(())
    }

    /// The result of the last `render`.
    #[inline]
    pub fn buffers(&self) -> &FrameBuffers {
        &self.buffers
    }

    /// Quantizes depths of frames rendered with `camera` at the configured `depth_buffer_bits`.
    pub fn depth_quantizer(&self, camera: &Camera) -> DepthQuantizer {
        DepthQuantizer::new(camera.near(), camera.far(), self.config.depth_buffer_bits)
    }

    /// The size of the buffers for a display of `display_width x display_height` pixels.
    pub fn internal_size(&self, display_width: usize, display_height: usize) -> (usize, usize) {
        let divisor = self.config.resolution_divisor as usize;

        ((display_width / divisor).max(1), (display_height / divisor).max(1))
    }

    /// Clears the buffers and draws every enabled object that has an octree, nearest first.
    pub fn render(
        &mut self,
        camera: &Camera,
        display_width: usize,
        display_height: usize,
        objects: &[VoxelObject],
    ) -> RasterStats {
        let (width, height) = self.internal_size(display_width, display_height);
        if self.buffers.resize(width, height) {
            tracing::debug!(width, height, "resized frame buffers");
        }
        self.buffers.clear(self.config.background);

        let view = camera.view_constants(width, height);
        let view_from_world = camera.view_from_world();
        let eye = camera.position();

        // Drawing near objects first lets them occlude more of the far ones.
        self.draw_order.clear();
        for (i, object) in objects.iter().enumerate() {
            if let Some(octree) = object.renderable() {
                let placement = OctreePlacement::new(object, octree, self.config.center_on_bounds);
                let distance = placement.nearest_corner_distance(octree, &object.world_from_local, eye);
                self.draw_order.push((FloatOrd(distance), i));
            }
        }
        self.draw_order.sort_unstable();

        let mut stats = RasterStats::default();
        for &(_, i) in &self.draw_order {
            let object = &objects[i];
            let octree = match object.renderable() {
                Some(octree) => octree,
                None => continue,
            };
            let _span = tracing::trace_span!("rasterize_object", index = i).entered();

            let placement = OctreePlacement::new(object, octree, self.config.center_on_bounds);
            let view_from_local = view_from_world * object.world_from_local;
            let root = RootProjection::new(&placement, &view_from_local, &view, self.config.child_order);
            stats += self
                .rasterizer
                .rasterize(octree, &root, object.tint, &view, &self.config, &mut self.buffers);
        }

        tracing::trace!(objects = self.draw_order.len(), ?stats, "rendered frame");

        stats
    }

    /// Indices into the `objects` of the last `render`, in the order they were drawn.
    pub fn draw_order(&self) -> impl Iterator<Item = usize> + '_ {
        self.draw_order.iter().map(|&(_, i)| i)
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
