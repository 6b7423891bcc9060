//! Interaction registry: interactive id → group root, id → linked set.
//!
//! Built once, after the scene graph finishes loading, and immutable
//! afterwards. All ancestor walks happen here so the per-tick hit path
//! is a couple of hash lookups.
//!
//! Names are only trusted inside the configured interactive set. Group
//! roots and their linked members are resolved to concrete nodes here.

use crate::config::{InteractionTable, LinkedSet};
use crate::error::RegistrationWarning;
use crate::id::EntityId;
use crate::model::{BASELINE_SCALE, NodeRef, SceneGraph};
use glam::Vec3;
use petgraph::graph::NodeIndex;
use smallvec::{SmallVec, smallvec};
use std::collections::HashMap;

/// The topmost ancestor below the scene root that hover feedback scales.
pub type GroupRoot = NodeRef;

/// Nodes that scale together with a group root, root first.
pub type LinkedNodes = SmallVec<[NodeRef; 4]>;

#[derive(Debug, Clone, Default)]
pub struct InteractionRegistry {
    /// Interactive id → its group root.
    groups: HashMap<EntityId, GroupRoot>,
    /// Explicit linked sets; ids without an entry are singletons.
    linked: HashMap<EntityId, LinkedSet>,
    /// Group root node → the nodes its linked set resolved to.
    members: HashMap<NodeIndex, LinkedNodes>,
    /// Geometry node → nearest interactive id at or above it.
    owners: HashMap<NodeIndex, EntityId>,
    warnings: Vec<RegistrationWarning>,
}

impl InteractionRegistry {
    /// Register every configured interactive id found in `graph` and reset
    /// each group root to baseline scale.
    pub fn build(graph: &mut SceneGraph, table: &InteractionTable) -> Self {
        let mut registry = Self::default();

        // Pass 1: interactive nodes and their roots. First node with a
        // given name wins when the model repeats names.
        let mut interactive_nodes: HashMap<NodeIndex, EntityId> = HashMap::new();
        let mut found: Vec<(EntityId, NodeIndex)> = Vec::new();
        graph.traverse(|idx, entity| {
            if table.is_interactive(entity.id) && !found.iter().any(|(id, _)| *id == entity.id) {
                found.push((entity.id, idx));
            }
        });

        for (id, idx) in found {
            let root = group_root(graph, idx);
            graph.graph[root].transform.scale = Vec3::splat(BASELINE_SCALE);
            let root_id = graph.graph[root].id;
            log::debug!("interactive {id} → group root {root_id}");
            registry.groups.insert(
                id,
                GroupRoot {
                    id: root_id,
                    index: root,
                },
            );
            interactive_nodes.insert(idx, id);
        }

        // Pass 2: geometry ownership, nearest interactive ancestor wins.
        let mut stack: Vec<(NodeIndex, Option<EntityId>)> =
            graph.children(graph.root).into_iter().map(|c| (c, None)).collect();
        while let Some((idx, inherited)) = stack.pop() {
            let owner = interactive_nodes.get(&idx).copied().or(inherited);
            if let Some(owner) = owner
                && graph.graph[idx].is_geometry()
            {
                registry.owners.insert(idx, owner);
            }
            stack.extend(graph.children(idx).into_iter().map(|c| (c, owner)));
        }

        // Linked sets, as declared.
        for (&id, entry) in &table.entries {
            if !entry.linked.is_empty() {
                registry.linked.insert(id, entry.linked.clone());
            }
        }

        // Hover is keyed by group root. Carry a set declared on an
        // interactive id over to its root when the root has none of its own.
        for (&id, root) in &registry.groups {
            if root.id == id || table.linked(root.id).is_some() {
                continue;
            }
            let Some(declared) = table.linked(id) else {
                continue;
            };
            let mut set: LinkedSet = smallvec![root.id];
            for &member in declared.iter().filter(|m| **m != id) {
                let inside_root = graph
                    .index_of(member)
                    .is_some_and(|m| m == root.index || graph.ancestors(m).contains(&root.index));
                if !inside_root && !set.contains(&member) {
                    set.push(member);
                }
            }
            registry.linked.insert(root.id, set);
        }

        // Resolve each root's set to nodes. The root is always its own
        // node, whatever else shares its name.
        for root in registry.roots() {
            let mut nodes: LinkedNodes = smallvec![root];
            for member in registry.lookup_linked(root.id) {
                if member == root.id {
                    continue;
                }
                match graph.index_of(member).and_then(|idx| graph.node_ref(idx)) {
                    Some(node) if !nodes.contains(&node) => nodes.push(node),
                    Some(_) => {}
                    None => log::debug!("linked entity {member} missing from scene"),
                }
            }
            registry.members.insert(root.index, nodes);
        }

        for &id in &table.interactive {
            if !registry.groups.contains_key(&id) {
                let warning = RegistrationWarning { id };
                log::warn!("{warning}");
                registry.warnings.push(warning);
            }
        }

        log::info!(
            "interaction registry built: {} interactive, {} geometry nodes, {} missing",
            registry.groups.len(),
            registry.owners.len(),
            registry.warnings.len()
        );
        registry
    }

    /// Group root id for an interactive id.
    pub fn lookup_group(&self, id: EntityId) -> Option<EntityId> {
        self.groups.get(&id).map(|g| g.id)
    }

    pub fn group_root(&self, id: EntityId) -> Option<GroupRoot> {
        self.groups.get(&id).copied()
    }

    /// Linked set for `id`, or `{id}`.
    pub fn lookup_linked(&self, id: EntityId) -> LinkedSet {
        self.linked
            .get(&id)
            .cloned()
            .unwrap_or_else(|| smallvec![id])
    }

    /// Nodes hover scales for `root`, or just the root itself.
    pub fn linked_nodes(&self, root: GroupRoot) -> LinkedNodes {
        self.members
            .get(&root.index)
            .cloned()
            .unwrap_or_else(|| smallvec![root])
    }

    /// Interactive id that a hit on this geometry node counts as.
    pub fn owner_of(&self, idx: NodeIndex) -> Option<EntityId> {
        self.owners.get(&idx).copied()
    }

    /// Distinct group roots, for hosts mirroring the baseline reset.
    pub fn roots(&self) -> Vec<GroupRoot> {
        let mut roots: Vec<GroupRoot> = Vec::new();
        for root in self.groups.values() {
            if !roots.contains(root) {
                roots.push(*root);
            }
        }
        roots.sort_by_key(|r| r.index);
        roots
    }

    pub fn warnings(&self) -> &[RegistrationWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Walk up until the parent is the scene root.
fn group_root(graph: &SceneGraph, idx: NodeIndex) -> NodeIndex {
    let mut top = idx;
    while let Some(parent) = graph.parent(top) {
        if parent == graph.root {
            break;
        }
        top = parent;
    }
    top
}
