//! Input abstraction layer.
//!
//! Normalizes the host's pointer, click, and resize callbacks into a
//! unified `InputEvent` enum, and holds the last committed pointer
//! position that each tick reads.

use crate::viewport::ViewportRect;
use glam::Vec2;

/// A normalized input event from the host page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved, in client (page) pixels.
    PointerMove { x: f32, y: f32 },

    /// Pointer left the drawing surface.
    PointerLeave,

    /// Click / activate, in client pixels.
    Click { x: f32, y: f32 },

    /// Viewport resized.
    Resize {
        rect: ViewportRect,
        /// Device pixel ratio reported by the host (uncapped).
        pixel_ratio: f32,
    },
}

impl InputEvent {
    pub fn from_pointer_move(x: f32, y: f32) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn from_click(x: f32, y: f32) -> Self {
        Self::Click { x, y }
    }

    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<(f32, f32)> {
        match self {
            Self::PointerMove { x, y } | Self::Click { x, y } => Some((*x, *y)),
            _ => None,
        }
    }
}

/// Last-known pointer position in normalized device coordinates.
///
/// Written by event callbacks, read once at the start of each tick.
/// `None` until the pointer first enters the surface, and again after
/// it leaves.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    ndc: Option<Vec2>,
}

impl PointerState {
    pub fn set(&mut self, ndc: Vec2) {
        self.ndc = Some(ndc);
    }

    pub fn clear(&mut self) {
        self.ndc = None;
    }

    pub fn ndc(&self) -> Option<Vec2> {
        self.ndc
    }
}
