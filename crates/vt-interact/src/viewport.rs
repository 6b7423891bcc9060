//! Viewport bookkeeping: pointer → NDC mapping, resize handling, and the
//! per-tick clamp of the orbit controls' pan target.

use crate::orbit::OrbitControls;
use glam::{Vec2, Vec3};
use vt_core::ViewportConstraints;
use vt_render::{Camera, Renderer};

/// Upper bound on the device pixel ratio handed to the renderer.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// The drawing surface's bounding rectangle, in client pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewportRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn aspect(&self) -> Option<f32> {
        (self.width > 0.0 && self.height > 0.0).then(|| self.width / self.height)
    }
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    constraints: ViewportConstraints,
    rect: ViewportRect,
    pixel_ratio: f32,
}

impl ViewportController {
    pub fn new(constraints: ViewportConstraints, rect: ViewportRect) -> Self {
        Self {
            constraints,
            rect,
            pixel_ratio: 1.0,
        }
    }

    pub fn constraints(&self) -> &ViewportConstraints {
        &self.constraints
    }

    pub fn rect(&self) -> ViewportRect {
        self.rect
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Clamp each component of `target` into the pan box.
    pub fn limit_pan(&self, target: &mut Vec3) {
        *target = self.constraints.pan.clamp(*target);
    }

    /// Per-tick camera step: clamp the pan target, then let the controls
    /// update the camera.
    pub fn tick(&self, controls: &mut dyn OrbitControls, camera: &mut Camera) {
        let mut target = controls.target();
        self.limit_pan(&mut target);
        controls.set_target(target);
        controls.update(camera);
    }

    /// Apply a new surface size. A zero-area rect is stored but leaves the
    /// camera and renderer untouched.
    pub fn on_resize(
        &mut self,
        rect: ViewportRect,
        device_pixel_ratio: f32,
        camera: &mut Camera,
        renderer: &mut dyn Renderer,
    ) {
        self.rect = rect;
        self.pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(MAX_PIXEL_RATIO)
        } else {
            log::debug!("unusable pixel ratio {device_pixel_ratio}, using 1");
            1.0
        };
        let Some(aspect) = rect.aspect() else {
            log::debug!("ignoring resize to empty surface {rect:?}");
            return;
        };
        camera.aspect = aspect;
        renderer.resize(rect.width, rect.height, self.pixel_ratio);
    }

    /// Map client coordinates to normalized device coordinates relative to
    /// the surface rect. `None` while the surface has no area.
    pub fn pointer_to_ndc(&self, client_x: f32, client_y: f32) -> Option<Vec2> {
        let r = self.rect;
        if r.width <= 0.0 || r.height <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            ((client_x - r.left) / r.width) * 2.0 - 1.0,
            -((client_y - r.top) / r.height) * 2.0 + 1.0,
        ))
    }
}
