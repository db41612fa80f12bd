//! The camera and the per-frame constants derived from it.
//!
//! View space is left-handed: +X is right, +Y is up and +Z points forward, away from the eye. Depth is view-space Z.
//!
//! Screen space is measured in pixels with the origin at the bottom-left corner of the target. Pixel `(x, y)` covers
//! `[x, x + 1) x [y, y + 1)`, so row 0 is the bottom row.

use crate::ConfigError;

use octoraster_core::glam::{Affine3A, Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    /// Vertical field of view in radians.
    Perspective { vertical_fov: f32 },
    /// Half of the view height in world units.
    Orthographic { half_height: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    projection: Projection,
    near: f32,
    far: f32,
    world_from_view: Affine3A,
}

impl Camera {
    pub fn perspective(vertical_fov: f32, near: f32, far: f32) -> Result<Self, ConfigError> {
        if !(vertical_fov > 0.0 && vertical_fov < std::f32::consts::PI) {
            return Err(ConfigError::FieldOfView(vertical_fov));
        }

        Self::new(Projection::Perspective { vertical_fov }, near, far)
    }

    pub fn orthographic(half_height: f32, near: f32, far: f32) -> Result<Self, ConfigError> {
        if !(half_height > 0.0 && half_height.is_finite()) {
            return Err(ConfigError::OrthoHalfHeight(half_height));
        }

        Self::new(Projection::Orthographic { half_height }, near, far)
    }

    fn new(projection: Projection, near: f32, far: f32) -> Result<Self, ConfigError> {
        if !(near > 0.0 && near.is_finite()) {
            return Err(ConfigError::NearPlane(near));
        }
        // An infinite far plane is allowed.
        if !(far > near) {
            return Err(ConfigError::FarPlane { near, far });
        }

        Ok(Self {
            projection,
            near,
            far,
            world_from_view: Affine3A::IDENTITY,
        })
    }

    #[inline]
    pub fn projection(&self) -> Projection {
        self.projection
    }

    #[inline]
    pub fn is_orthographic(&self) -> bool {
        matches!(self.projection, Projection::Orthographic { .. })
    }

    #[inline]
    pub fn near(&self) -> f32 {
        self.near
    }

    #[inline]
    pub fn far(&self) -> f32 {
        self.far
    }

    #[inline]
    pub fn world_from_view(&self) -> Affine3A {
        self.world_from_view
    }

    #[inline]
    pub fn view_from_world(&self) -> Affine3A {
        self.world_from_view.inverse()
    }

    /// The eye position in world space.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.world_from_view.translation.into()
    }

    pub fn set_world_from_view(&mut self, world_from_view: Affine3A) {
        self.world_from_view = world_from_view;
    }

    pub fn with_world_from_view(mut self, world_from_view: Affine3A) -> Self {
        self.set_world_from_view(world_from_view);
        self
    }

    /// Places the eye at `eye`, looking towards `target`.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.world_from_view = Affine3A::look_at_lh(eye, target, up).inverse();
    }

    /// Constants for rendering into a `width x height` target.
    pub fn view_constants(&self, width: usize, height: usize) -> ViewConstants {
        let half_width = width as f32 * 0.5;
        let half_height = height as f32 * 0.5;
        let (orthographic, scale) = match self.projection {
            Projection::Perspective { vertical_fov } => (false, half_height / (vertical_fov * 0.5).tan()),
            Projection::Orthographic { half_height: h } => (true, half_height / h),
        };

        ViewConstants {
            width,
            height,
            half_width,
            half_height,
            near: self.near,
            far: self.far,
            orthographic,
            scale,
        }
    }
}

/// Everything the projector and rasterizer need to know about the camera and target for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewConstants {
    pub width: usize,
    pub height: usize,
    pub half_width: f32,
    pub half_height: f32,
    pub near: f32,
    pub far: f32,
    pub orthographic: bool,
    /// Perspective: the zoom factor, i.e. pixels per world unit at depth 1. Orthographic: pixels per world unit.
    pub scale: f32,
}

impl ViewConstants {
    /// Pixels per world unit at view depth `z`.
    #[inline]
    pub fn pixels_per_unit(&self, z: f32) -> f32 {
        if self.orthographic {
            self.scale
        } else {
            self.scale / z
        }
    }

    /// Screen position of a view-space point. In perspective, `p.z` must be positive.
    #[inline]
    pub fn project(&self, p: Vec3) -> Vec2 {
        let k = self.pixels_per_unit(p.z);

        Vec2::new(self.half_width + p.x * k, self.half_height + p.y * k)
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
