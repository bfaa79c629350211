use glam::{Mat4, Vec2, Vec3};

use crate::camera::core::Camera;
use crate::geometry::Ray;
use crate::options::CameraOptions;

/// Turntable-style view: the camera stays on the +Z axis looking at the
/// origin while the molecule itself is rotated by a model matrix.
#[derive(Debug, Clone)]
pub struct OrbitController {
    /// Camera looking at the origin.
    pub camera: Camera,
    model: Mat4,
    /// Distance chosen by the last [`fit`](Self::fit); drives the light
    /// placement.
    zoom: f32,
    rotate_speed: f32,
    zoom_speed: f32,
}

impl OrbitController {
    /// Controller with an identity model and the camera at `(0, 0, 1)`.
    #[must_use]
    pub fn new(options: &CameraOptions, aspect: f32) -> Self {
        Self {
            camera: Camera::new(Vec3::Z, aspect, options),
            model: Mat4::IDENTITY,
            zoom: 1.0,
            rotate_speed: options.rotate_speed,
            zoom_speed: options.zoom_speed,
        }
    }

    /// Current molecule model matrix.
    #[must_use]
    pub fn model(&self) -> Mat4 {
        self.model
    }

    /// Fitted camera distance.
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Rotate the molecule by a mouse drag of `delta` pixels.
    ///
    /// Horizontal motion turns about Y, vertical about X; the increment is
    /// applied in view space on top of the accumulated rotation.
    pub fn rotate(&mut self, delta: Vec2) {
        let increment = Mat4::from_rotation_y(
            (delta.x * self.rotate_speed).to_radians(),
        ) * Mat4::from_rotation_x((delta.y * self.rotate_speed).to_radians());
        self.model = increment * self.model;
    }

    /// Dolly the camera along its view axis. Positive deltas move closer.
    pub fn zoom_by(&mut self, delta: f32) {
        self.camera.eye.z -= delta * self.zoom_speed;
    }

    /// Update the aspect ratio after a viewport resize. Zero-sized
    /// viewports are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.camera.aspect = width as f32 / height as f32;
        }
    }

    /// Place the camera so a molecule centred on the origin fills the view.
    ///
    /// `furthest` is the largest centre distance from the origin and
    /// `max_radius` the largest atom radius.
    pub fn fit(&mut self, furthest: f32, max_radius: f32) {
        let half_fovy = (self.camera.fovy * 0.5).to_radians();
        self.zoom = furthest / half_fovy.tan() + max_radius;
        self.camera.eye = Vec3::new(0.0, 0.0, self.zoom);
        self.camera.target = Vec3::ZERO;
        self.model = Mat4::IDENTITY;
    }

    /// Ray through a screen pixel, expressed in the molecule's local frame.
    #[must_use]
    pub fn local_ray(&self, screen: Vec2, viewport: Vec2) -> Option<Ray> {
        self.camera
            .screen_ray(screen, viewport)
            .map(|ray| ray.to_local(&self.model))
    }
}
