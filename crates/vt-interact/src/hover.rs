//! Hover state machine.
//!
//! Evaluated once per render tick with the group resolved under the latest
//! pointer, so hover follows the camera even when the pointer is still.
//! A transition resets the previous group's linked set and highlights the
//! new one; an unchanged group schedules nothing. Groups are compared by
//! node, so two roots that share a name are still two groups.

use crate::animation::AnimationScheduler;
use vt_core::{
    BASELINE_SCALE, EntityId, GroupRoot, InteractionConfig, InteractionRegistry, LinkedNodes,
    SceneGraph,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Idle,
    Hovering(GroupRoot),
}

impl HoverState {
    pub fn group(&self) -> Option<GroupRoot> {
        match self {
            HoverState::Idle => None,
            HoverState::Hovering(id) => Some(*id),
        }
    }
}

/// What one evaluation scheduled. Resets are scheduled before highlights.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverTransition {
    pub from: Option<GroupRoot>,
    pub to: Option<GroupRoot>,
    /// Nodes sent back to baseline.
    pub reset: LinkedNodes,
    /// Nodes scaled up.
    pub highlight: LinkedNodes,
}

#[derive(Debug, Clone)]
pub struct HoverStateMachine {
    state: HoverState,
    highlight_scale: f32,
    duration: f32,
}

impl HoverStateMachine {
    pub fn new(highlight_factor: f32, duration: f32) -> Self {
        Self {
            state: HoverState::Idle,
            highlight_scale: BASELINE_SCALE * highlight_factor,
            duration,
        }
    }

    pub fn from_config(config: &InteractionConfig) -> Self {
        Self::new(
            config.highlight_scale_factor,
            config.animation_duration_seconds,
        )
    }

    pub fn state(&self) -> HoverState {
        self.state
    }

    /// Feed the interactive id resolved under the pointer this tick.
    pub fn evaluate(
        &mut self,
        resolved: Option<EntityId>,
        registry: &InteractionRegistry,
        animations: &mut AnimationScheduler,
        graph: &SceneGraph,
    ) -> Option<HoverTransition> {
        let new_group = resolved.and_then(|id| registry.group_root(id));
        let current = self.state.group();
        if new_group == current {
            return None;
        }

        let mut transition = HoverTransition {
            from: current,
            to: new_group,
            reset: LinkedNodes::new(),
            highlight: LinkedNodes::new(),
        };

        if let Some(prev) = current {
            transition.reset = self.schedule(
                registry.linked_nodes(prev),
                BASELINE_SCALE,
                animations,
                graph,
            );
        }
        if let Some(next) = new_group {
            transition.highlight = self.schedule(
                registry.linked_nodes(next),
                self.highlight_scale,
                animations,
                graph,
            );
        }

        self.state = match new_group {
            Some(root) => HoverState::Hovering(root),
            None => HoverState::Idle,
        };
        log::debug!(
            "hover {:?} → {:?}",
            transition.from.map(|g| g.id),
            transition.to.map(|g| g.id)
        );
        Some(transition)
    }

    /// Return to `Idle` without animating. Used when the scene is replaced.
    pub fn forget(&mut self) {
        self.state = HoverState::Idle;
    }

    /// Tween every present member of `set` to `to` with identical timing.
    fn schedule(
        &self,
        set: LinkedNodes,
        to: f32,
        animations: &mut AnimationScheduler,
        graph: &SceneGraph,
    ) -> LinkedNodes {
        let mut scheduled = LinkedNodes::new();
        for node in set {
            let Some(from) = graph.scale_at(node.index) else {
                log::debug!("linked entity {} missing from scene, skipped", node.id);
                continue;
            };
            animations.animate_scale(node, from, to, self.duration);
            scheduled.push(node);
        }
        scheduled
    }
}
