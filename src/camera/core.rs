use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::geometry::Ray;
use crate::options::CameraOptions;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Camera {
    /// Camera at `eye` looking at the origin, projection taken from
    /// `options`.
    #[must_use]
    pub fn new(eye: Vec3, aspect: f32, options: &CameraOptions) -> Self {
        Self {
            eye,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        }
    }

    /// World-to-view matrix.
    #[must_use]
    pub fn build_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection matrix ([0,1] depth range).
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.build_projection() * self.build_view()
    }

    /// World-space ray from the eye through a screen pixel.
    ///
    /// `screen` is in pixels with the origin at the top-left corner;
    /// `viewport` is the drawable size in pixels. Returns `None` for an
    /// empty viewport or a projection that cannot be inverted.
    #[must_use]
    pub fn screen_ray(&self, screen: Vec2, viewport: Vec2) -> Option<Ray> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        let ndc = Vec2::new(
            screen.x / viewport.x * 2.0 - 1.0,
            1.0 - screen.y / viewport.y * 2.0,
        );

        let inverse = self.build_matrix().inverse();
        let clip = inverse * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        if clip.w == 0.0 {
            return None;
        }
        let point = clip.truncate() / clip.w;

        let ray = Ray::new(self.eye, (point - self.eye).normalize_or_zero());
        ray.is_traceable().then_some(ray)
    }
}
