//! The interaction loop.
//!
//! Owns the scene graph and every interaction component. Event callbacks
//! only record the pointer (or dispatch a click); hover is evaluated once
//! per tick so highlights follow camera motion under a still pointer.
//!
//! A tick runs pointer read → hover → animations → camera step → draw.
//! The hover ray is cast with the pose the previous tick drew, which is
//! the pose the user was looking at when the pointer was last read.

use crate::animation::{AnimationScheduler, Easing, ScaleWrite};
use crate::dispatch::{ActionDispatcher, NavigationHost};
use crate::hover::{HoverState, HoverStateMachine, HoverTransition};
use crate::input::{InputEvent, PointerState};
use crate::orbit::OrbitControls;
use crate::viewport::{ViewportController, ViewportRect};
use glam::Vec2;
use vt_core::{
    ActionTarget, EntityId, InteractionConfig, InteractionError, InteractionRegistry,
    InteractionTable, LoadFailure, LoadedScene, RegistrationWarning, SceneGraph,
};
use vt_render::{Camera, Renderer, cast_ray, resolve_first_interactive};

pub struct InteractionController<H: NavigationHost> {
    graph: SceneGraph,
    clips: Vec<String>,
    table: InteractionTable,
    /// `None` until the first scene load completes.
    registry: Option<InteractionRegistry>,
    pointer: PointerState,
    hover: HoverStateMachine,
    animations: AnimationScheduler,
    dispatcher: ActionDispatcher<H>,
    viewport: ViewportController,
    camera: Camera,
    /// Scale writes not yet collected by the host.
    pending_writes: Vec<ScaleWrite>,
}

impl<H: NavigationHost> InteractionController<H> {
    pub fn new(config: &InteractionConfig, host: H, rect: ViewportRect) -> Self {
        let table = config.table();
        let mut camera = Camera::default();
        if let Some(aspect) = rect.aspect() {
            camera.aspect = aspect;
        }
        Self {
            graph: SceneGraph::new(),
            clips: Vec::new(),
            dispatcher: ActionDispatcher::new(host, &table),
            table,
            registry: None,
            pointer: PointerState::default(),
            hover: HoverStateMachine::from_config(config),
            animations: AnimationScheduler::new(Easing::default()),
            viewport: ViewportController::new(config.viewport_constraints, rect),
            camera,
            pending_writes: Vec::new(),
        }
    }

    // ─── Scene lifecycle ─────────────────────────────────────────────────

    /// Replace the scene and rebuild the registry. Group roots come back
    /// at baseline scale; those writes are queued for the host.
    pub fn on_load_complete(&mut self, scene: LoadedScene) -> &[RegistrationWarning] {
        self.hover.forget();
        self.animations.reset();
        self.pending_writes.clear();

        self.graph = scene.graph;
        self.clips = scene.clips;
        let registry = InteractionRegistry::build(&mut self.graph, &self.table);
        self.pending_writes.extend(registry.roots().into_iter().filter_map(|root| {
            self.graph
                .scale_at(root.index)
                .map(|scale| ScaleWrite { target: root, scale })
        }));
        if let Some(clip) = self.intro_clip() {
            log::info!("intro clip `{clip}` plays once");
        }
        self.registry.insert(registry).warnings()
    }

    /// The scene could not be loaded. Interaction stays inert (or keeps the
    /// previous scene) and the loop keeps running.
    pub fn on_load_failure(&mut self, failure: &LoadFailure) {
        log::warn!("{failure}; interaction stays on the previous scene");
    }

    pub fn is_loaded(&self) -> bool {
        self.registry.is_some()
    }

    /// First animation clip of the loaded asset, played once on load.
    pub fn intro_clip(&self) -> Option<&str> {
        self.clips.first().map(String::as_str)
    }

    // ─── Input ───────────────────────────────────────────────────────────

    pub fn on_pointer_move(&mut self, client_x: f32, client_y: f32) {
        match self.viewport.pointer_to_ndc(client_x, client_y) {
            Some(ndc) => self.pointer.set(ndc),
            None => self.pointer.clear(),
        }
    }

    pub fn on_pointer_leave(&mut self) {
        self.pointer.clear();
    }

    /// Resolve the click at its own coordinates and run the mapped action.
    /// Returns the action that ran.
    pub fn on_click(&mut self, client_x: f32, client_y: f32) -> Option<ActionTarget> {
        let ndc = self.viewport.pointer_to_ndc(client_x, client_y)?;
        self.pointer.set(ndc);
        let id = self.resolve(ndc)?;
        let registry = self.registry.as_ref()?;
        match self.dispatcher.dispatch(id, registry) {
            Ok(action) => Some(action),
            Err(InteractionError::UnresolvedAction { id }) => {
                log::debug!("click on {id} has no action");
                None
            }
            Err(err) => {
                log::warn!("click on {id} failed: {err}");
                None
            }
        }
    }

    pub fn on_resize(
        &mut self,
        rect: ViewportRect,
        device_pixel_ratio: f32,
        renderer: &mut dyn Renderer,
    ) {
        self.viewport
            .on_resize(rect, device_pixel_ratio, &mut self.camera, renderer);
    }

    /// Route a normalized event. Returns the action a click ran, if any.
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        renderer: &mut dyn Renderer,
    ) -> Option<ActionTarget> {
        match *event {
            InputEvent::PointerMove { x, y } => {
                self.on_pointer_move(x, y);
                None
            }
            InputEvent::PointerLeave => {
                self.on_pointer_leave();
                None
            }
            InputEvent::Click { x, y } => self.on_click(x, y),
            InputEvent::Resize { rect, pixel_ratio } => {
                self.on_resize(rect, pixel_ratio, renderer);
                None
            }
        }
    }

    // ─── Tick ────────────────────────────────────────────────────────────

    /// One render tick. Returns the hover transition this tick scheduled,
    /// if any.
    pub fn tick(
        &mut self,
        dt: f32,
        controls: &mut dyn OrbitControls,
        renderer: &mut dyn Renderer,
    ) -> Option<HoverTransition> {
        let transition = match &self.registry {
            Some(registry) => {
                let resolved = self.pointer.ndc().and_then(|ndc| {
                    let hits = cast_ray(ndc, &self.camera, &self.graph);
                    resolve_first_interactive(&hits, registry)
                });
                self.hover
                    .evaluate(resolved, registry, &mut self.animations, &self.graph)
            }
            None => None,
        };

        let writes = self.animations.advance(dt, &mut self.graph);
        self.pending_writes.extend(writes);

        self.viewport.tick(controls, &mut self.camera);
        renderer.render(&self.graph, &self.camera);
        transition
    }

    /// Interactive id under `ndc` with the current camera.
    pub fn resolve(&self, ndc: Vec2) -> Option<EntityId> {
        let registry = self.registry.as_ref()?;
        let hits = cast_ray(ndc, &self.camera, &self.graph);
        resolve_first_interactive(&hits, registry)
    }

    // ─── Overlay ─────────────────────────────────────────────────────────

    /// Close the modal overlay, releasing its resource. Returns `true` if
    /// one was open.
    pub fn close_modal(&mut self) -> bool {
        self.dispatcher.close_modal().unwrap_or_else(|err| {
            log::warn!("closing overlay failed: {err}");
            false
        })
    }

    pub fn open_modal(&self) -> Option<&str> {
        self.dispatcher.open_modal()
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Take every scale write since the last call.
    pub fn drain_scale_writes(&mut self) -> Vec<ScaleWrite> {
        std::mem::take(&mut self.pending_writes)
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn registry(&self) -> Option<&InteractionRegistry> {
        self.registry.as_ref()
    }

    pub fn hover_state(&self) -> HoverState {
        self.hover.state()
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn animations(&self) -> &AnimationScheduler {
        &self.animations
    }

    pub fn host(&self) -> &H {
        self.dispatcher.host()
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.dispatcher.host_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::tests::RecordingHost;
    use crate::orbit::OrbitRig;
    use glam::Vec3;
    use pretty_assertions::assert_eq;
    use vt_core::{Aabb, SceneEntity};

    struct NullRenderer;

    impl Renderer for NullRenderer {
        fn render(&mut self, _scene: &SceneGraph, _camera: &Camera) {}
        fn resize(&mut self, _width: f32, _height: f32, _pixel_ratio: f32) {}
    }

    fn scene() -> LoadedScene {
        let mut graph = SceneGraph::new();
        let grp = graph.add_entity(
            graph.root,
            SceneEntity::group("ct_box_grp")
                .with_position(Vec3::new(0.0, 5.0, -3.0))
                .with_scale(0.5),
        );
        graph.add_entity(
            grp,
            SceneEntity::mesh("ct_box", Aabb::from_center_size(Vec3::ZERO, Vec3::ONE)),
        );
        LoadedScene {
            graph,
            clips: vec!["Intro".into()],
        }
    }

    fn controller() -> InteractionController<RecordingHost> {
        let mut config = InteractionConfig {
            interactive_ids: vec![EntityId::intern("ct_box")],
            ..InteractionConfig::default()
        };
        config.actions.insert(
            EntityId::intern("ct_box"),
            ActionTarget::Navigate {
                address: "/src/Box.html".into(),
            },
        );
        InteractionController::new(
            &config,
            RecordingHost::default(),
            ViewportRect::new(0.0, 0.0, 800.0, 450.0),
        )
    }

    #[test]
    fn events_before_load_do_nothing() {
        let mut c = controller();
        let mut rig = OrbitRig::new(c.camera(), c.viewport().constraints());
        c.on_pointer_move(400.0, 225.0);
        assert!(c.tick(0.016, &mut rig, &mut NullRenderer).is_none());
        assert_eq!(c.on_click(400.0, 225.0), None);
        assert!(c.host().calls.is_empty());
        assert!(!c.is_loaded());
    }

    #[test]
    fn load_resets_roots_and_reports_intro_clip() {
        let mut c = controller();
        let warnings = c.on_load_complete(scene()).len();
        assert_eq!(warnings, 0);
        assert_eq!(c.intro_clip(), Some("Intro"));
        let grp = c.registry().unwrap().group_root(EntityId::intern("ct_box")).unwrap();
        assert_eq!(grp.id, EntityId::intern("ct_box_grp"));
        assert_eq!(c.graph().scale_at(grp.index), Some(1.0));
        assert_eq!(
            c.drain_scale_writes(),
            vec![ScaleWrite {
                target: grp,
                scale: 1.0
            }]
        );
        assert!(c.drain_scale_writes().is_empty());
    }

    #[test]
    fn center_pointer_hovers_then_click_navigates() {
        let mut c = controller();
        c.on_load_complete(scene());
        let mut rig = OrbitRig::new(c.camera(), c.viewport().constraints());

        c.on_pointer_move(400.0, 225.0);
        let t = c.tick(0.016, &mut rig, &mut NullRenderer).unwrap();
        assert_eq!(t.to.map(|g| g.id), Some(EntityId::intern("ct_box_grp")));
        assert!(c.tick(0.016, &mut rig, &mut NullRenderer).is_none());

        let action = c.on_click(400.0, 225.0);
        assert_eq!(
            action,
            Some(ActionTarget::Navigate {
                address: "/src/Box.html".into()
            })
        );
        assert_eq!(c.host().calls, vec!["navigate /src/Box.html"]);
    }

    #[test]
    fn hover_ray_uses_the_pose_drawn_last_tick() {
        let mut c = controller();
        c.on_load_complete(scene());
        let mut rig = OrbitRig::new(c.camera(), c.viewport().constraints());
        c.on_pointer_move(400.0, 225.0);
        c.tick(0.016, &mut rig, &mut NullRenderer);

        // Swing the target off the box; the camera follows at the end of
        // the next tick, after hover has already been evaluated.
        rig.pan(Vec3::new(4.0, 0.0, 0.0));
        assert!(c.tick(0.016, &mut rig, &mut NullRenderer).is_none());
        assert_eq!(c.camera().target.x, 4.0);

        let t = c.tick(0.016, &mut rig, &mut NullRenderer).unwrap();
        assert_eq!(t.to, None);
    }

    #[test]
    fn click_on_empty_space_is_a_no_op() {
        let mut c = controller();
        c.on_load_complete(scene());
        assert_eq!(c.on_click(5.0, 5.0), None);
        assert!(c.host().calls.is_empty());
    }
}
