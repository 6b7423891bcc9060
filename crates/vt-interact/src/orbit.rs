//! Orbit camera controls.
//!
//! The camera sits on a sphere around `target`. Polar angle is measured
//! from +Y, azimuth around +Y starting at +Z.

use glam::Vec3;
use vt_core::{Span, ViewportConstraints};
use vt_render::Camera;

/// The camera-control collaborator the viewport clamps each tick.
pub trait OrbitControls {
    fn target(&self) -> Vec3;
    fn set_target(&mut self, target: Vec3);
    /// Apply pending input and write the resulting pose into `camera`.
    fn update(&mut self, camera: &mut Camera);
}

/// Spherical coordinates of the camera relative to the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    /// Angle from +Y.
    pub polar: f32,
    /// Angle around +Y, zero on +Z.
    pub azimuth: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return Self {
                radius: 0.0,
                polar: 0.0,
                azimuth: 0.0,
            };
        }
        Self {
            radius,
            polar: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            azimuth: offset.x.atan2(offset.z),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let s = self.polar.sin() * self.radius;
        Vec3::new(
            s * self.azimuth.sin(),
            self.polar.cos() * self.radius,
            s * self.azimuth.cos(),
        )
    }
}

/// Constrained orbit rig. Input is accumulated between ticks and applied
/// on `update`.
#[derive(Debug, Clone)]
pub struct OrbitRig {
    target: Vec3,
    spherical: Spherical,
    polar: Span,
    azimuth: Span,
    distance: Span,
    pending_azimuth: f32,
    pending_polar: f32,
    pending_dolly: f32,
}

impl OrbitRig {
    pub fn new(camera: &Camera, constraints: &ViewportConstraints) -> Self {
        Self {
            target: camera.target,
            spherical: Spherical::from_offset(camera.position - camera.target),
            polar: constraints.polar_angle,
            azimuth: constraints.azimuth,
            distance: constraints.distance,
            pending_azimuth: 0.0,
            pending_polar: 0.0,
            pending_dolly: 1.0,
        }
    }

    /// Queue a rotation, in radians.
    pub fn rotate(&mut self, d_azimuth: f32, d_polar: f32) {
        self.pending_azimuth += d_azimuth;
        self.pending_polar += d_polar;
    }

    /// Queue a dolly; `factor > 1` moves away from the target.
    pub fn dolly(&mut self, factor: f32) {
        if factor > 0.0 {
            self.pending_dolly *= factor;
        }
    }

    /// Queue a pan by a world-space offset.
    pub fn pan(&mut self, delta: Vec3) {
        self.target += delta;
    }

    pub fn spherical(&self) -> Spherical {
        self.spherical
    }
}

impl OrbitControls for OrbitRig {
    fn target(&self) -> Vec3 {
        self.target
    }

    fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    fn update(&mut self, camera: &mut Camera) {
        let s = &mut self.spherical;
        s.azimuth = self.azimuth.clamp(s.azimuth + self.pending_azimuth);
        s.polar = self
            .polar
            .clamp(s.polar + self.pending_polar)
            .clamp(f32::EPSILON, std::f32::consts::PI - f32::EPSILON);
        s.radius = self.distance.clamp(s.radius * self.pending_dolly);

        self.pending_azimuth = 0.0;
        self.pending_polar = 0.0;
        self.pending_dolly = 1.0;

        camera.target = self.target;
        camera.position = self.target + s.to_offset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn spherical_round_trips_default_pose() {
        let cam = Camera::default();
        let s = Spherical::from_offset(cam.position - cam.target);
        assert!((s.radius - 17.0).abs() < 1e-5);
        assert!((s.polar - FRAC_PI_2).abs() < 1e-5);
        assert!(s.azimuth.abs() < 1e-5);
        assert!(close(s.to_offset(), cam.position - cam.target));
    }

    #[test]
    fn update_keeps_default_pose() {
        let mut cam = Camera::default();
        let mut rig = OrbitRig::new(&cam, &ViewportConstraints::default());
        rig.update(&mut cam);
        assert!(close(cam.position, Camera::default().position));
    }

    #[test]
    fn rotation_and_dolly_are_clamped() {
        let mut cam = Camera::default();
        let mut rig = OrbitRig::new(&cam, &ViewportConstraints::default());
        rig.rotate(10.0, -10.0);
        rig.dolly(100.0);
        rig.update(&mut cam);

        let s = rig.spherical();
        assert!((s.azimuth - FRAC_PI_4).abs() < 1e-5);
        assert!((s.polar - FRAC_PI_4).abs() < 1e-5);
        assert_eq!(s.radius, 40.0);
        assert!(((cam.position - cam.target).length() - 40.0).abs() < 1e-3);
    }
}
