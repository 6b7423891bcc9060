//! Perspective camera and NDC → world ray conversion.

use glam::{Mat4, Vec2, Vec3};

/// A world-space ray with unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Right-handed perspective camera looking at `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 10.0),
            target: Vec3::new(0.0, 5.0, -7.0),
            up: Vec3::Y,
            fov_y_deg: 50.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_deg.to_radians(),
            self.aspect.max(f32::EPSILON),
            self.near,
            self.far,
        )
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Ray from the camera through a point in normalized device coordinates
    /// (`[-1, 1]²`, +y up).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = (self.projection_matrix() * self.view_matrix()).inverse();
        // perspective_rh maps depth to [0, 1]
        let near = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray {
            origin: self.position,
            direction: (far - near).normalize_or_zero(),
        }
    }
}
