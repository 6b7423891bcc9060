//! Hit testing: pointer ray → ordered entity hits.
//!
//! Walks the scene tree once per cast, composing world matrices on the way
//! down, and intersects the ray with each visible mesh's bounds in the
//! mesh's local space. Results are sorted nearest first.

use crate::camera::{Camera, Ray};
use glam::{Mat4, Vec2};
use vt_core::model::{EntityKind, SceneGraph};
use vt_core::{EntityId, InteractionRegistry, NodeIndex};

/// Determinants below this are treated as collapsed (zero-scale) geometry.
const MIN_DETERMINANT: f32 = 1e-12;

/// One intersected entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub entity: EntityId,
    pub index: NodeIndex,
    /// World-space distance from the ray origin.
    pub distance: f32,
}

/// Cast a ray from `ndc` through `camera` and return every visible,
/// non-helper mesh it crosses, nearest first.
pub fn cast_ray(ndc: Vec2, camera: &Camera, graph: &SceneGraph) -> Vec<Hit> {
    intersect_ray(&camera.ray_from_ndc(ndc), graph)
}

/// Intersect an explicit world-space ray with the scene.
pub fn intersect_ray(ray: &Ray, graph: &SceneGraph) -> Vec<Hit> {
    let mut hits = Vec::new();
    if ray.direction == glam::Vec3::ZERO {
        return hits;
    }

    let root_world = graph.graph[graph.root].transform.matrix();
    let mut stack: Vec<(NodeIndex, Mat4)> = graph
        .children(graph.root)
        .into_iter()
        .map(|c| (c, root_world))
        .collect();

    while let Some((idx, parent_world)) = stack.pop() {
        let entity = &graph.graph[idx];
        // Hidden subtrees are skipped entirely
        if !entity.visible {
            continue;
        }
        let world = parent_world * entity.transform.matrix();

        if let EntityKind::Mesh { bounds } = &entity.kind
            && !entity.helper
            && world.determinant().abs() > MIN_DETERMINANT
        {
            let inv = world.inverse();
            // The local ray keeps the world parameterization, so `t` is
            // the world distance along the unit world direction.
            let local_origin = inv.transform_point3(ray.origin);
            let local_dir = inv.transform_vector3(ray.direction);
            if let Some(t) = bounds.ray_intersection(local_origin, local_dir) {
                hits.push(Hit {
                    entity: entity.id,
                    index: idx,
                    distance: t,
                });
            }
        }

        stack.extend(graph.children(idx).into_iter().map(|c| (c, world)));
    }

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    log::trace!("ray hit {} entities", hits.len());
    hits
}

/// The nearest hit that counts as an interactive entity, as its
/// interactive id. Occluded interactive entities are never chosen.
pub fn resolve_first_interactive(
    hits: &[Hit],
    registry: &InteractionRegistry,
) -> Option<EntityId> {
    hits.iter().find_map(|hit| {
        let candidate = registry.owner_of(hit.index).unwrap_or(hit.entity);
        registry.lookup_group(candidate).map(|_| candidate)
    })
}
