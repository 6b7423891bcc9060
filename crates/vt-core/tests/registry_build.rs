//! Integration tests: scene snapshot import → registry build.
//!
//! Exercises the full `vt-core` pipeline with the shipped showroom config:
//! JSON snapshot → SceneGraph → InteractionRegistry.

use pretty_assertions::assert_eq;
use vt_core::{EntityId, InteractionConfig, InteractionRegistry, import_scene_json};

const SCENE: &str = include_str!("fixtures/showroom_scene.json");
const CONFIG: &str = include_str!("../../../config/showroom.json");

fn id(s: &str) -> EntityId {
    EntityId::intern(s)
}

fn build() -> (vt_core::SceneGraph, InteractionRegistry) {
    let config = InteractionConfig::from_json(CONFIG).expect("shipped config is valid");
    let mut loaded = import_scene_json(SCENE).expect("fixture imports");
    let registry = InteractionRegistry::build(&mut loaded.graph, &config.table());
    (loaded.graph, registry)
}

// ─── Group roots ─────────────────────────────────────────────────────────

#[test]
fn every_present_id_maps_to_a_root_below_scene_root() {
    let config = InteractionConfig::from_json(CONFIG).unwrap();
    let (graph, registry) = build();

    for &iid in &config.interactive_ids {
        let Some(root) = registry.group_root(iid) else {
            assert!(graph.get_by_id(iid).is_none(), "{iid} present but unregistered");
            continue;
        };
        assert_eq!(
            graph.parent(root.index),
            Some(graph.root),
            "root of {iid} is not a direct child of the scene root"
        );
        let chain = graph.ancestors(root.index);
        assert_eq!(chain.last(), Some(&graph.root));
    }
}

#[test]
fn nested_meshes_resolve_to_their_group() {
    let (_, registry) = build();
    assert_eq!(registry.lookup_group(id("Monster")), Some(id("Monster_grp")));
    assert_eq!(registry.lookup_group(id("Screen")), Some(id("Screen_grp")));
    assert_eq!(registry.lookup_group(id("Screen_body")), Some(id("Screen_grp")));
    assert_eq!(registry.lookup_group(id("Chair")), Some(id("Chair")));
}

#[test]
fn roots_are_reset_to_baseline() {
    let (graph, _) = build();
    // Authored at 0.8 in the fixture
    assert_eq!(graph.scale_of(id("Monster_grp")), Some(1.0));
}

#[test]
fn full_fixture_has_no_registration_warnings() {
    let (_, registry) = build();
    assert!(registry.warnings().is_empty(), "{:?}", registry.warnings());
    assert_eq!(registry.len(), 11);
}

// ─── Linked sets ─────────────────────────────────────────────────────────

#[test]
fn glass_is_linked_to_its_group_root() {
    let (_, registry) = build();
    assert_eq!(
        registry.lookup_linked(id("Monster_grp")).to_vec(),
        vec![id("Monster_grp"), id("Monster_glass")]
    );
    assert_eq!(
        registry.lookup_linked(id("Hickap_grp")).to_vec(),
        vec![id("Hickap_grp"), id("Hickap_glass")]
    );
    assert_eq!(registry.lookup_linked(id("Chair")).to_vec(), vec![id("Chair")]);
}

#[test]
fn glass_nodes_scale_with_their_roots() {
    let (graph, registry) = build();
    let root = registry.group_root(id("Monster")).unwrap();
    let nodes: Vec<_> = registry.linked_nodes(root).iter().map(|n| n.index).collect();
    assert_eq!(
        nodes,
        vec![root.index, graph.index_of(id("Monster_glass")).unwrap()]
    );
}

// ─── Shipped config ──────────────────────────────────────────────────────

#[test]
fn every_shipped_action_is_reachable() {
    let config = InteractionConfig::from_json(CONFIG).unwrap();
    let (_, registry) = build();
    // A click resolves to an interactive id, then falls back to its root
    let roots: Vec<EntityId> = registry.roots().iter().map(|r| r.id).collect();
    for key in config.actions.keys() {
        assert!(
            config.interactive_ids.contains(key) || roots.contains(key),
            "action on {key} can never be dispatched"
        );
    }
}

// ─── Partial scenes ──────────────────────────────────────────────────────

#[test]
fn partial_scene_warns_for_each_missing_id() {
    let config = InteractionConfig::from_json(CONFIG).unwrap();
    let mut loaded = import_scene_json(
        r#"{ "nodes": [ { "id": "Chair", "kind": "mesh",
             "bounds": { "min": [0, 0, 0], "max": [1, 1, 1] } } ] }"#,
    )
    .unwrap();
    let registry = InteractionRegistry::build(&mut loaded.graph, &config.table());

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.warnings().len(), config.interactive_ids.len() - 1);
    assert!(
        registry
            .warnings()
            .iter()
            .all(|w| w.id != id("Chair"))
    );
}
