//! Scene snapshot import.
//!
//! The asset loader (glTF + Draco, decoded by the host) hands over a flat
//! JSON description of the loaded model. This module turns it into a
//! [`SceneGraph`]; decoding itself is out of scope.
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": "Monster_grp", "kind": "group", "position": [0, 0, -3] },
//!     { "id": "Monster", "parent": "Monster_grp", "kind": "mesh",
//!       "bounds": { "min": [-0.5, 0, -0.5], "max": [0.5, 1.8, 0.5] } }
//!   ],
//!   "clips": ["Intro"]
//! }
//! ```

use crate::error::LoadFailure;
use crate::id::EntityId;
use crate::model::{Aabb, EntityKind, SceneEntity, SceneGraph, Transform};
use glam::{Quat, Vec3};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKindDesc {
    Group,
    Mesh,
}

/// One node of the host's flattened model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDesc {
    /// Authored name; empty or missing names get a generated id.
    #[serde(default)]
    pub id: Option<String>,
    /// Parent name. Missing or unknown parents attach to the scene root.
    #[serde(default)]
    pub parent: Option<String>,
    pub kind: NodeKindDesc,
    #[serde(default)]
    pub bounds: Option<Aabb>,
    #[serde(default)]
    pub position: Option<Vec3>,
    /// Quaternion `[x, y, z, w]`.
    #[serde(default)]
    pub rotation: Option<Quat>,
    #[serde(default)]
    pub scale: Option<Vec3>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub helper: bool,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub nodes: Vec<NodeDesc>,
    /// Animation clip names shipped with the model.
    #[serde(default)]
    pub clips: Vec<String>,
}

/// What the loader hands over on completion.
#[derive(Debug, Clone, Default)]
pub struct LoadedScene {
    pub graph: SceneGraph,
    pub clips: Vec<String>,
}

/// Parse a JSON snapshot into a loaded scene.
pub fn import_scene_json(json: &str) -> Result<LoadedScene, LoadFailure> {
    let desc: SceneDescription = serde_json::from_str(json)?;
    import_scene(&desc)
}

/// Build a scene graph from a description. Parents must precede children.
pub fn import_scene(desc: &SceneDescription) -> Result<LoadedScene, LoadFailure> {
    let mut graph = SceneGraph::new();
    // Parent lookup is by the most recent node with that name, which is
    // how exporters that repeat names nest them.
    let mut by_name: HashMap<String, NodeIndex> = HashMap::new();

    for (i, node) in desc.nodes.iter().enumerate() {
        let kind = match node.kind {
            NodeKindDesc::Group => EntityKind::Group,
            NodeKindDesc::Mesh => {
                let bounds = node.bounds.ok_or_else(|| {
                    LoadFailure::new(format!(
                        "mesh node #{i} ({}) has no bounds",
                        node.id.as_deref().unwrap_or("unnamed")
                    ))
                })?;
                EntityKind::Mesh { bounds }
            }
        };

        let id = match node.id.as_deref() {
            Some(name) if !name.is_empty() => EntityId::intern(name),
            _ => EntityId::anonymous(),
        };

        let parent = match node.parent.as_deref() {
            Some(p) => match by_name.get(p) {
                Some(idx) => *idx,
                None => {
                    log::warn!("node {id}: parent `{p}` not found, attaching to root");
                    graph.root
                }
            },
            None => graph.root,
        };

        let defaults = Transform::default();
        let mut entity = SceneEntity::new(id, kind);
        entity.transform = Transform {
            position: node.position.unwrap_or(defaults.position),
            rotation: node.rotation.map(Quat::normalize).unwrap_or(defaults.rotation),
            scale: node.scale.unwrap_or(defaults.scale),
        };
        entity.visible = node.visible;
        entity.helper = node.helper;

        let idx = graph.add_entity(parent, entity);
        by_name.insert(id.as_str().to_string(), idx);
    }

    log::info!(
        "imported scene: {} entities, {} clips",
        graph.len(),
        desc.clips.len()
    );

    Ok(LoadedScene {
        graph,
        clips: desc.clips.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn imports_nested_nodes() {
        let json = r#"{
            "nodes": [
                { "id": "Grp", "kind": "group", "position": [1, 0, 0] },
                { "id": "Box", "parent": "Grp", "kind": "mesh",
                  "bounds": { "min": [-1, -1, -1], "max": [1, 1, 1] },
                  "scale": [2, 2, 2] },
                { "kind": "mesh", "bounds": { "min": [0, 0, 0], "max": [1, 1, 1] },
                  "visible": false }
            ],
            "clips": ["Intro"]
        }"#;
        let loaded = import_scene_json(json).unwrap();
        let g = &loaded.graph;
        assert_eq!(g.len(), 3);
        assert_eq!(loaded.clips, vec!["Intro".to_string()]);

        let grp = g.index_of(EntityId::intern("Grp")).unwrap();
        let bx = g.index_of(EntityId::intern("Box")).unwrap();
        assert_eq!(g.parent(bx), Some(grp));
        assert_eq!(g.parent(grp), Some(g.root));
        assert_eq!(g.scale_of(EntityId::intern("Box")), Some(2.0));
    }

    #[test]
    fn unknown_parent_attaches_to_root() {
        let json = r#"{ "nodes": [ { "id": "Orphan", "parent": "Ghost", "kind": "group" } ] }"#;
        let loaded = import_scene_json(json).unwrap();
        let idx = loaded.graph.index_of(EntityId::intern("Orphan")).unwrap();
        assert_eq!(loaded.graph.parent(idx), Some(loaded.graph.root));
    }

    #[test]
    fn mesh_without_bounds_is_a_load_failure() {
        let json = r#"{ "nodes": [ { "id": "Bad", "kind": "mesh" } ] }"#;
        let err = import_scene_json(json).unwrap_err();
        assert!(err.reason.contains("Bad"));
    }

    #[test]
    fn malformed_json_is_a_load_failure() {
        assert!(import_scene_json("{\"nodes\": [").is_err());
    }
}
