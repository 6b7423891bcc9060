//! Camera projection, pointer rays, and hit testing for the showroom scene.
//!
//! Drawing itself belongs to the host renderer; [`Renderer`] is the seam
//! the interaction loop drives.

pub mod camera;
pub mod hit;

pub use camera::{Camera, Ray};
pub use hit::{Hit, cast_ray, intersect_ray, resolve_first_interactive};

use vt_core::SceneGraph;

/// The external rendering collaborator.
pub trait Renderer {
    /// Draw one frame.
    fn render(&mut self, scene: &SceneGraph, camera: &Camera);

    /// Resize the drawing surface. `pixel_ratio` is already capped.
    fn resize(&mut self, width: f32, height: f32, pixel_ratio: f32);
}
