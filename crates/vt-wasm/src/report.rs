//! JSON payloads handed back to the page.

use glam::Vec3;
use serde::Serialize;
use vt_core::{ActionTarget, RegistrationWarning};
use vt_interact::ScaleWrite;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub ok: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro_clip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoadReport {
    pub fn loaded(warnings: &[RegistrationWarning], intro_clip: Option<&str>) -> Self {
        Self {
            ok: true,
            warnings: warnings.iter().map(|w| w.id.to_string()).collect(),
            intro_clip: intro_clip.map(str::to_string),
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            ok: false,
            warnings: Vec::new(),
            intro_clip: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ScaleEntry {
    pub id: String,
    pub scale: f32,
}

impl From<ScaleWrite> for ScaleEntry {
    fn from(w: ScaleWrite) -> Self {
        Self {
            id: w.target.id.to_string(),
            scale: w.scale,
        }
    }
}

/// Everything the page applies after one tick: scales to copy onto its
/// meshes and the clamped camera pose.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    pub scale_writes: Vec<ScaleEntry>,
    pub target: [f32; 3],
    pub position: [f32; 3],
    pub hovered: Option<String>,
}

impl FrameReport {
    pub fn new(
        writes: Vec<ScaleWrite>,
        target: Vec3,
        position: Vec3,
        hovered: Option<String>,
    ) -> Self {
        Self {
            scale_writes: writes.into_iter().map(ScaleEntry::from).collect(),
            target: target.to_array(),
            position: position.to_array(),
            hovered,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClickReport {
    pub action: Option<ActionTarget>,
}

/// Serialize, falling back to an error object.
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        let escaped = e.to_string().replace('\\', "\\\\").replace('"', "\\\"");
        format!(r#"{{"ok":false,"error":"Serialization error: {escaped}"}}"#)
    })
}
