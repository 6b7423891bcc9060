pub mod config;
pub mod error;
pub mod id;
pub mod import;
pub mod model;
pub mod registry;

pub use config::{
    ActionTarget, InteractionConfig, InteractionTable, LinkedSet, PanBox, Span,
    ViewportConstraints,
};
pub use error::{ConfigError, InteractionError, LoadFailure, RegistrationWarning};
pub use id::EntityId;
pub use import::{LoadedScene, SceneDescription, import_scene, import_scene_json};
pub use model::*;
pub use registry::{GroupRoot, InteractionRegistry, LinkedNodes};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
