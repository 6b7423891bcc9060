//! WASM bridge for Vitrine — exposes the interaction engine to the
//! showroom page.
//!
//! Compiled via `wasm-pack build --target web`. The page keeps drawing
//! with its own renderer and orbit controls; each frame it hands the
//! controls' pose to [`ShowroomCanvas::tick`] and applies the returned
//! scales and clamped pose.

mod host;
mod report;

use glam::Vec3;
use host::{BrowserHost, install_console_hooks};
use report::{ClickReport, FrameReport, LoadReport, to_json};
use vt_core::{InteractionConfig, LoadFailure, SceneGraph, import_scene_json};
use vt_interact::{InteractionController, OrbitControls, ViewportRect};
use vt_render::{Camera, Renderer};
use wasm_bindgen::prelude::*;

/// Orbit controls living on the page. The pose arrives with every tick
/// and the clamped pose goes back out in the frame report.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PageOrbit {
    target: Vec3,
    position: Vec3,
}

impl OrbitControls for PageOrbit {
    fn target(&self) -> Vec3 {
        self.target
    }

    fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    fn update(&mut self, camera: &mut Camera) {
        camera.target = self.target;
        camera.position = self.position;
    }
}

/// The page draws; this only counts frames and remembers the last size.
#[derive(Debug, Default)]
struct PageRenderer {
    frames: u64,
    size: Option<(f32, f32, f32)>,
}

impl Renderer for PageRenderer {
    fn render(&mut self, _scene: &SceneGraph, _camera: &Camera) {
        self.frames += 1;
    }

    fn resize(&mut self, width: f32, height: f32, pixel_ratio: f32) {
        self.size = Some((width, height, pixel_ratio));
    }
}

/// The main WASM-facing controller.
///
/// All pointer and frame callbacks from the page go through this struct.
#[wasm_bindgen]
pub struct ShowroomCanvas {
    controller: InteractionController<BrowserHost>,
    orbit: PageOrbit,
    renderer: PageRenderer,
}

#[wasm_bindgen]
impl ShowroomCanvas {
    /// Create a controller from the interaction config JSON. `overlay_id`
    /// names the element that hosts the modal `<iframe>`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: &str,
        overlay_id: &str,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> Result<ShowroomCanvas, JsValue> {
        install_console_hooks();

        let config = InteractionConfig::from_json(config_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let rect = ViewportRect::new(left as f32, top as f32, width as f32, height as f32);
        let controller = InteractionController::new(&config, BrowserHost::new(overlay_id), rect);
        let camera = controller.camera();
        Ok(Self {
            orbit: PageOrbit {
                target: camera.target,
                position: camera.position,
            },
            controller,
            renderer: PageRenderer::default(),
        })
    }

    /// Install a scene snapshot. Returns JSON
    /// `{"ok":true,"warnings":[...],"introClip":"..."}` or
    /// `{"ok":false,"error":"..."}`.
    pub fn load_scene(&mut self, scene_json: &str) -> String {
        match import_scene_json(scene_json) {
            Ok(scene) => {
                let warnings = self.controller.on_load_complete(scene).to_vec();
                to_json(&LoadReport::loaded(&warnings, self.controller.intro_clip()))
            }
            Err(failure) => {
                self.controller.on_load_failure(&failure);
                to_json(&LoadReport::failed(&failure))
            }
        }
    }

    /// The page's own loader failed.
    pub fn report_load_failure(&mut self, reason: &str) {
        self.controller.on_load_failure(&LoadFailure::new(reason));
    }

    pub fn is_loaded(&self) -> bool {
        self.controller.is_loaded()
    }

    pub fn intro_clip(&self) -> Option<String> {
        self.controller.intro_clip().map(str::to_string)
    }

    pub fn handle_pointer_move(&mut self, client_x: f64, client_y: f64) {
        self.controller
            .on_pointer_move(client_x as f32, client_y as f32);
    }

    pub fn handle_pointer_leave(&mut self) {
        self.controller.on_pointer_leave();
    }

    /// Returns JSON `{"action":{...}}`, with `null` when nothing ran.
    pub fn handle_click(&mut self, client_x: f64, client_y: f64) -> String {
        let action = self.controller.on_click(client_x as f32, client_y as f32);
        to_json(&ClickReport { action })
    }

    pub fn resize(
        &mut self,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        device_pixel_ratio: f64,
    ) {
        let rect = ViewportRect::new(left as f32, top as f32, width as f32, height as f32);
        self.controller
            .on_resize(rect, device_pixel_ratio as f32, &mut self.renderer);
    }

    /// Capped pixel ratio the page should hand its renderer.
    pub fn pixel_ratio(&self) -> f64 {
        self.controller.viewport().pixel_ratio() as f64
    }

    /// One frame. Takes the orbit controls' current target and camera
    /// position and returns a [`FrameReport`] as JSON.
    #[allow(clippy::too_many_arguments)]
    pub fn tick(
        &mut self,
        dt_seconds: f64,
        target_x: f64,
        target_y: f64,
        target_z: f64,
        camera_x: f64,
        camera_y: f64,
        camera_z: f64,
    ) -> String {
        self.orbit = PageOrbit {
            target: Vec3::new(target_x as f32, target_y as f32, target_z as f32),
            position: Vec3::new(camera_x as f32, camera_y as f32, camera_z as f32),
        };
        let transition =
            self.controller
                .tick(dt_seconds as f32, &mut self.orbit, &mut self.renderer);
        if let Some(t) = &transition {
            log::debug!("hover {:?} → {:?}", t.from.map(|g| g.id), t.to.map(|g| g.id));
        }
        let camera = *self.controller.camera();
        let report = FrameReport::new(
            self.controller.drain_scale_writes(),
            camera.target,
            camera.position,
            self.controller.hover_state().group().map(|g| g.id.to_string()),
        );
        to_json(&report)
    }

    /// Close the modal overlay. Returns `true` if one was open.
    pub fn close_modal(&mut self) -> bool {
        self.controller.close_modal()
    }
}

// ─── Standalone validation (no canvas needed) ────────────────────────────

/// Validate an interaction config. Returns JSON `{"ok":true}` or
/// `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_config(config_json: &str) -> String {
    match InteractionConfig::from_json(config_json) {
        Ok(_) => r#"{"ok":true}"#.to_string(),
        Err(e) => to_json(&LoadReport::failed(e)),
    }
}
