//! Core scene-graph data model.
//!
//! The loaded model is a tree where nodes are scene entities (groups and
//! meshes) and edges represent parent→child containment. The graph is
//! written by the asset-load collaborator; the interaction core only reads
//! it, except for the scale field which hover animations drive.

use crate::id::EntityId;
use glam::{Mat4, Quat, Vec3};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Rest-state scale factor (no highlight).
pub const BASELINE_SCALE: f32 = 1.0;

// ─── Geometry ────────────────────────────────────────────────────────────

/// Axis-aligned bounding box in an entity's local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Create a box from its center and full extents.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Slab test. Returns the ray parameter of the first intersection in
    /// front of the origin, or the exit parameter when the origin is inside.
    ///
    /// `dir` need not be normalized; the returned value is in units of `dir`.
    pub fn ray_intersection(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let inv = dir.recip();

        let t1 = (self.min - origin) * inv;
        let t2 = (self.max - origin) * inv;

        let tmin = t1.min(t2).max_element();
        let tmax = t1.max(t2).min_element();

        // Entire box behind the origin, or no overlap between slabs
        if tmax < 0.0 || tmin > tmax || tmin.is_nan() || tmax.is_nan() {
            return None;
        }

        Some(if tmin < 0.0 { tmax } else { tmin })
    }
}

// ─── Transform ───────────────────────────────────────────────────────────

/// Local transform relative to the parent entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::splat(BASELINE_SCALE),
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// The scale the hover animations read and write. Authored models may
    /// carry non-uniform scale; the x component is taken as representative.
    pub fn uniform_scale(&self) -> f32 {
        self.scale.x
    }
}

// ─── Scene Graph Nodes ───────────────────────────────────────────────────

/// The entity kinds in the scene tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Root of the scene (the model is attached below it).
    Root,
    /// Transform-only node.
    Group,
    /// Renderable geometry with local-space bounds.
    Mesh { bounds: Aabb },
}

/// A single entity in the scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub transform: Transform,
    /// Hidden entities (and everything below them) are never hit.
    pub visible: bool,
    /// Helpers (light gizmos, bounding guides) are excluded from picking.
    pub helper: bool,
}

impl SceneEntity {
    pub fn new(id: EntityId, kind: EntityKind) -> Self {
        Self {
            id,
            kind,
            transform: Transform::default(),
            visible: true,
            helper: false,
        }
    }

    pub fn group(name: &str) -> Self {
        Self::new(EntityId::intern(name), EntityKind::Group)
    }

    pub fn mesh(name: &str, bounds: Aabb) -> Self {
        Self::new(EntityId::intern(name), EntityKind::Mesh { bounds })
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.transform.scale = Vec3::splat(scale);
        self
    }

    pub fn is_geometry(&self) -> bool {
        matches!(self.kind, EntityKind::Mesh { .. })
    }
}

// ─── Scene Graph ─────────────────────────────────────────────────────────

/// The loaded scene — a tree of `SceneEntity` values.
///
/// Edges go from parent → child.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    /// The underlying directed graph.
    pub graph: StableDiGraph<SceneEntity, ()>,

    /// The root node index.
    pub root: NodeIndex,

    /// Index from EntityId → NodeIndex. Names may repeat in authored models;
    /// the first entity registered under a name wins. The scene root is
    /// never indexed.
    pub id_index: HashMap<EntityId, NodeIndex>,
}

/// One concrete node plus the name it was authored with.
///
/// Runtime state (hover groups, tweens, scale writes) follows the index;
/// the name is kept for config lookups and for reporting to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub id: EntityId,
    pub index: NodeIndex,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a new empty scene graph with a root node.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root_id = EntityId::intern("root");
        let root = graph.add_node(SceneEntity::new(root_id, EntityKind::Root));

        Self {
            graph,
            root,
            id_index: HashMap::new(),
        }
    }

    /// Add an entity as a child of `parent`. Returns the new node's index.
    pub fn add_entity(&mut self, parent: NodeIndex, entity: SceneEntity) -> NodeIndex {
        let id = entity.id;
        let idx = self.graph.add_node(entity);
        self.graph.add_edge(parent, idx, ());
        self.id_index.entry(id).or_insert(idx);
        idx
    }

    /// Number of entities below the root.
    pub fn len(&self) -> usize {
        self.graph.node_count().saturating_sub(1)
    }

    /// True when nothing has been loaded under the root.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up an entity by name.
    pub fn get_by_id(&self, id: EntityId) -> Option<&SceneEntity> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Get the index for an EntityId.
    pub fn index_of(&self, id: EntityId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Get the parent index of a node.
    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Get children of a node in insertion order.
    ///
    /// Sorts by `NodeIndex` so the result is deterministic regardless of
    /// how `petgraph` iterates its adjacency list.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    /// Depth-first, pre-order traversal of every entity below the root.
    pub fn traverse(&self, mut visit: impl FnMut(NodeIndex, &SceneEntity)) {
        let mut stack: Vec<NodeIndex> = self.children(self.root).into_iter().rev().collect();
        while let Some(idx) = stack.pop() {
            visit(idx, &self.graph[idx]);
            stack.extend(self.children(idx).into_iter().rev());
        }
    }

    /// Ancestor chain of `idx`, nearest parent first, ending at the root.
    pub fn ancestors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut chain = Vec::new();
        let mut current = self.parent(idx);
        while let Some(p) = current {
            chain.push(p);
            current = self.parent(p);
        }
        chain
    }

    /// Composed local → world matrix of a node.
    pub fn world_matrix(&self, idx: NodeIndex) -> Mat4 {
        let mut m = self.graph[idx].transform.matrix();
        let mut current = self.parent(idx);
        while let Some(p) = current {
            m = self.graph[p].transform.matrix() * m;
            current = self.parent(p);
        }
        m
    }

    /// Pair a node with its name.
    pub fn node_ref(&self, index: NodeIndex) -> Option<NodeRef> {
        self.graph.node_weight(index).map(|e| NodeRef { id: e.id, index })
    }

    /// Current uniform scale of a node, if it exists.
    pub fn scale_at(&self, index: NodeIndex) -> Option<f32> {
        self.graph
            .node_weight(index)
            .map(|e| e.transform.uniform_scale())
    }

    /// Current uniform scale of the first entity registered under `id`.
    pub fn scale_of(&self, id: EntityId) -> Option<f32> {
        self.index_of(id).and_then(|idx| self.scale_at(idx))
    }

    /// Write a uniform scale to a node. Returns `false` if the node does
    /// not exist.
    pub fn set_uniform_scale_at(&mut self, index: NodeIndex, value: f32) -> bool {
        match self.graph.node_weight_mut(index) {
            Some(entity) => {
                entity.transform.scale = Vec3::splat(value);
                true
            }
            None => false,
        }
    }
}
