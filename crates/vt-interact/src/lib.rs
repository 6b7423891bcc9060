//! Pointer interaction for the showroom scene: hover highlighting, click
//! dispatch, and viewport constraints.
//!
//! [`InteractionController`] ties the pieces together. Hosts feed it input
//! events and call [`InteractionController::tick`] once per frame.

pub mod animation;
pub mod controller;
pub mod dispatch;
pub mod hover;
pub mod input;
pub mod orbit;
pub mod viewport;

pub use animation::{AnimationScheduler, Easing, ScaleWrite, TaskHandle, TaskState};
pub use controller::InteractionController;
pub use dispatch::{ActionDispatcher, NavigationHost, mailto_uri};
pub use hover::{HoverState, HoverStateMachine, HoverTransition};
pub use input::{InputEvent, PointerState};
pub use orbit::{OrbitControls, OrbitRig, Spherical};
pub use viewport::{MAX_PIXEL_RATIO, ViewportController, ViewportRect};
