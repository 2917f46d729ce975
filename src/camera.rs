//! Fixed perspective camera
//!
//! Looks down at the dig site from one corner. Produces the view-projection
//! matrix for the renderer and turns canvas clicks into world rays.

use glam::{Mat4, Vec3};

use crate::sim::Ray;

/// Camera pose and projection
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Viewport width / height
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(10.0, 9.0, 10.0),
            target: Vec3::new(0.0, -2.5, 0.0),
            fov_y: 50f32.to_radians(),
            near: 0.1,
            far: 100.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Camera {
    /// Default pose for a viewport of the given size
    pub fn for_viewport(width: f32, height: f32) -> Self {
        let mut camera = Self::default();
        camera.set_viewport(width, height);
        camera
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    /// Projection with wgpu's 0..1 depth range
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// World ray through a point on the canvas (pixels, origin top-left)
    pub fn screen_ray(&self, x: f32, y: f32, width: f32, height: f32) -> Ray {
        let ndc_x = 2.0 * x / width.max(1.0) - 1.0;
        let ndc_y = 1.0 - 2.0 * y / height.max(1.0);

        let inv = self.view_proj().inverse();
        let near = inv.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));

        Ray::new(near, far - near)
    }
}
