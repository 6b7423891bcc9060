//! Static interaction configuration.
//!
//! Loaded once at startup from JSON. The scattered id lists (interactive,
//! linked, actions) collapse into one declarative [`InteractionTable`]
//! keyed by entity id.
//!
//! ```json
//! {
//!   "interactiveIds": ["Monster", "Chair"],
//!   "linkedGroups": { "Monster": ["Monster_glass"] },
//!   "actions": { "Chair": { "kind": "navigate", "address": "/src/Chair.html" } },
//!   "viewportConstraints": {
//!     "polarAngle": [0.785, 1.848],
//!     "azimuth": [-0.785, 0.785],
//!     "distance": [5, 40],
//!     "pan": [[-5, 3, -10], [5, 7, 5]]
//!   },
//!   "highlightScaleFactor": 1.2,
//!   "animationDurationSeconds": 0.3
//! }
//! ```

use crate::error::ConfigError;
use crate::id::EntityId;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::f32::consts::PI;

/// Entities that highlight and reset together. Always contains its key.
pub type LinkedSet = SmallVec<[EntityId; 4]>;

// ─── Actions ─────────────────────────────────────────────────────────────

/// What a click on an interactive entity does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ActionTarget {
    /// Replace the current page address.
    Navigate { address: String },
    /// Load a resource into the overlay surface.
    #[serde(rename_all = "camelCase")]
    OpenModal { resource_path: String },
    /// Open an absolute address, in a new browsing context when `new_context`.
    #[serde(rename_all = "camelCase")]
    ExternalLink {
        address: String,
        #[serde(default = "default_true")]
        new_context: bool,
    },
    /// Compose a mail to `address`.
    Mail { address: String },
}

fn default_true() -> bool {
    true
}

// ─── Viewport constraints ────────────────────────────────────────────────

/// Inclusive `[min, max]` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.max(self.min).min(self.max)
    }
}

impl From<[f32; 2]> for Span {
    fn from([min, max]: [f32; 2]) -> Self {
        Self { min, max }
    }
}

impl From<Span> for [f32; 2] {
    fn from(s: Span) -> Self {
        [s.min, s.max]
    }
}

/// Box the orbit target may pan within, `[min3, max3]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[Vec3; 2]", into = "[Vec3; 2]")]
pub struct PanBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl PanBox {
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Clamp each axis independently.
    pub fn clamp(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            v.x.max(self.min.x).min(self.max.x),
            v.y.max(self.min.y).min(self.max.y),
            v.z.max(self.min.z).min(self.max.z),
        )
    }
}

impl From<[Vec3; 2]> for PanBox {
    fn from([min, max]: [Vec3; 2]) -> Self {
        Self { min, max }
    }
}

impl From<PanBox> for [Vec3; 2] {
    fn from(b: PanBox) -> Self {
        [b.min, b.max]
    }
}

/// Static camera constraints; read-only at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConstraints {
    /// Radians from the up axis.
    pub polar_angle: Span,
    /// Radians around the up axis.
    pub azimuth: Span,
    pub distance: Span,
    pub pan: PanBox,
}

impl Default for ViewportConstraints {
    fn default() -> Self {
        Self {
            polar_angle: Span::new(PI / 4.0, PI / 1.7),
            azimuth: Span::new(-PI / 4.0, PI / 4.0),
            distance: Span::new(5.0, 40.0),
            pan: PanBox::new(Vec3::new(-5.0, 3.0, -10.0), Vec3::new(5.0, 7.0, 5.0)),
        }
    }
}

// ─── Interaction config ──────────────────────────────────────────────────

/// The static configuration consumed at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionConfig {
    pub interactive_ids: Vec<EntityId>,
    pub linked_groups: HashMap<EntityId, Vec<EntityId>>,
    pub actions: HashMap<EntityId, ActionTarget>,
    pub viewport_constraints: ViewportConstraints,
    pub highlight_scale_factor: f32,
    pub animation_duration_seconds: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            interactive_ids: Vec::new(),
            linked_groups: HashMap::new(),
            actions: HashMap::new(),
            viewport_constraints: ViewportConstraints::default(),
            highlight_scale_factor: 1.2,
            animation_duration_seconds: 0.3,
        }
    }
}

impl InteractionConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject inverted ranges and nonsensical scalars.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.viewport_constraints;
        let spans = [
            ("polarAngle", c.polar_angle),
            ("azimuth", c.azimuth),
            ("distance", c.distance),
            ("pan.x", Span::new(c.pan.min.x, c.pan.max.x)),
            ("pan.y", Span::new(c.pan.min.y, c.pan.max.y)),
            ("pan.z", Span::new(c.pan.min.z, c.pan.max.z)),
        ];
        for (field, span) in spans {
            if span.min > span.max || span.min.is_nan() || span.max.is_nan() {
                return Err(ConfigError::InvalidRange {
                    field: field.to_string(),
                    min: span.min,
                    max: span.max,
                });
            }
        }
        if !(self.highlight_scale_factor > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "highlightScaleFactor".to_string(),
                value: self.highlight_scale_factor,
            });
        }
        if !(self.animation_duration_seconds >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "animationDurationSeconds".to_string(),
                value: self.animation_duration_seconds,
            });
        }
        Ok(())
    }

    /// Collapse the id lists into one table.
    pub fn table(&self) -> InteractionTable {
        let mut table = InteractionTable::default();

        for &id in &self.interactive_ids {
            if !table.interactive.contains(&id) {
                table.interactive.push(id);
            }
        }

        for (&id, members) in &self.linked_groups {
            let entry = table.entries.entry(id).or_default();
            entry.linked = linked_with_self(id, members);
        }

        for (&id, action) in &self.actions {
            table.entries.entry(id).or_default().action = Some(action.clone());
        }

        table
    }
}

fn linked_with_self(id: EntityId, members: &[EntityId]) -> LinkedSet {
    let mut set = LinkedSet::new();
    set.push(id);
    for &m in members {
        if !set.contains(&m) {
            set.push(m);
        }
    }
    set
}

// ─── Interaction table ───────────────────────────────────────────────────

/// Per-id declarative entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableEntry {
    /// Empty means "just this id".
    pub linked: LinkedSet,
    pub action: Option<ActionTarget>,
}

/// `id → { linked, action }`, plus the ordered interactive set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionTable {
    /// Interactive ids in configuration order, deduplicated.
    pub interactive: Vec<EntityId>,
    pub entries: HashMap<EntityId, TableEntry>,
}

impl InteractionTable {
    pub fn is_interactive(&self, id: EntityId) -> bool {
        self.interactive.contains(&id)
    }

    /// Declared linked set, if any was configured for `id`.
    pub fn linked(&self, id: EntityId) -> Option<&LinkedSet> {
        self.entries
            .get(&id)
            .map(|e| &e.linked)
            .filter(|set| !set.is_empty())
    }

    pub fn action(&self, id: EntityId) -> Option<&ActionTarget> {
        self.entries.get(&id).and_then(|e| e.action.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_full_config() {
        let json = r#"{
            "interactiveIds": ["Monster", "Chair", "Monster"],
            "linkedGroups": { "Monster": ["Monster_glass"] },
            "actions": {
                "Chair": { "kind": "navigate", "address": "/src/Chair.html" },
                "Stars_01": { "kind": "externalLink", "address": "https://example.com" },
                "Stars_02": { "kind": "mail", "address": "hello@example.com" },
                "Stars_03": { "kind": "openModal", "resourcePath": "/videos/reel.mp4" }
            },
            "viewportConstraints": { "pan": [[-5, 3, -5], [5, 7, 5]] },
            "highlightScaleFactor": 1.5
        }"#;
        let config = InteractionConfig::from_json(json).unwrap();
        assert_eq!(config.highlight_scale_factor, 1.5);
        assert_eq!(config.animation_duration_seconds, 0.3);
        assert_eq!(
            config.viewport_constraints.pan,
            PanBox::new(Vec3::new(-5.0, 3.0, -5.0), Vec3::new(5.0, 7.0, 5.0))
        );
        assert_eq!(
            config.actions[&EntityId::intern("Stars_01")],
            ActionTarget::ExternalLink {
                address: "https://example.com".into(),
                new_context: true,
            }
        );

        let table = config.table();
        assert_eq!(
            table.interactive,
            vec![EntityId::intern("Monster"), EntityId::intern("Chair")]
        );
        let linked: Vec<&str> = table
            .linked(EntityId::intern("Monster"))
            .unwrap()
            .iter()
            .map(|id| id.as_str())
            .collect();
        assert_eq!(linked, vec!["Monster", "Monster_glass"]);
        assert!(table.linked(EntityId::intern("Chair")).is_none());
        assert!(table.action(EntityId::intern("Chair")).is_some());
    }

    #[test]
    fn rejects_inverted_range() {
        let json = r#"{ "viewportConstraints": { "distance": [40, 5] } }"#;
        let err = InteractionConfig::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { ref field, .. } if field == "distance"));
    }

    #[test]
    fn rejects_non_positive_highlight() {
        let json = r#"{ "highlightScaleFactor": 0 }"#;
        assert!(matches!(
            InteractionConfig::from_json(json),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn pan_box_clamps_per_axis() {
        let pan = PanBox::new(Vec3::new(-5.0, 3.0, -5.0), Vec3::new(5.0, 7.0, 5.0));
        assert_eq!(pan.clamp(Vec3::splat(100.0)), Vec3::new(5.0, 7.0, 5.0));
        assert_eq!(pan.clamp(Vec3::new(0.0, 0.0, -9.0)), Vec3::new(0.0, 3.0, -5.0));
    }

    #[test]
    fn linked_set_always_contains_key() {
        let mut config = InteractionConfig::default();
        config.linked_groups.insert(
            EntityId::intern("G1"),
            vec![EntityId::intern("G1_glass"), EntityId::intern("G1")],
        );
        let table = config.table();
        let set = table.linked(EntityId::intern("G1")).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set[0], EntityId::intern("G1"));
    }
}
