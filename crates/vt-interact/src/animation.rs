//! Scale tweens with overwrite semantics.
//!
//! Every task carries a [`TaskHandle`], a shared cancellation token.
//! Starting a task for a target invalidates the handle of the task already
//! running on that target; the scheduler checks the handle before every
//! interpolation step and drops invalidated tasks without writing.
//! Tasks are never queued.

use std::cell::Cell;
use std::rc::Rc;
use vt_core::{NodeIndex, NodeRef, SceneGraph};

/// Lifecycle of an animation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Created,
    Running,
    Completed,
    Cancelled,
}

/// Shared view of a task's lifecycle; doubles as its cancellation token.
#[derive(Debug, Clone)]
pub struct TaskHandle(Rc<Cell<TaskState>>);

impl TaskHandle {
    fn new() -> Self {
        Self(Rc::new(Cell::new(TaskState::Created)))
    }

    pub fn state(&self) -> TaskState {
        self.0.get()
    }

    /// Created or running.
    pub fn is_live(&self) -> bool {
        matches!(self.state(), TaskState::Created | TaskState::Running)
    }

    fn set(&self, state: TaskState) {
        self.0.set(state);
    }

    fn cancel(&self) {
        if self.is_live() {
            self.set(TaskState::Cancelled);
        }
    }
}

/// Easing curve. All variants are monotonic on `[0, 1]` with
/// `f(0) = 0` and `f(1) = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    EaseIn,
    /// Quadratic ease-out; the feel of the page's original tweens.
    #[default]
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// A scale value written to the graph during `advance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleWrite {
    pub target: NodeRef,
    pub scale: f32,
}

#[derive(Debug)]
struct AnimationTask {
    target: NodeRef,
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    easing: Easing,
    handle: TaskHandle,
}

impl AnimationTask {
    fn value_at(&self, elapsed: f32) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let k = self.easing.apply(elapsed / self.duration);
        self.from + (self.to - self.from) * k
    }
}

/// Runs per-target scale tweens.
#[derive(Debug, Default)]
pub struct AnimationScheduler {
    /// At most one task per target, in start order.
    tasks: Vec<AnimationTask>,
    easing: Easing,
    started: u64,
}

impl AnimationScheduler {
    pub fn new(easing: Easing) -> Self {
        Self {
            tasks: Vec::new(),
            easing,
            started: 0,
        }
    }

    /// Start tweening `target` from `from` to `to` over `duration` seconds,
    /// cancelling any task already running on the same node.
    pub fn animate_scale(
        &mut self,
        target: NodeRef,
        from: f32,
        to: f32,
        duration: f32,
    ) -> TaskHandle {
        if let Some(pos) = self
            .tasks
            .iter()
            .position(|t| t.target.index == target.index)
        {
            let prior = self.tasks.remove(pos);
            prior.handle.cancel();
            log::trace!("tween on {} overwritten", target.id);
        }

        let handle = TaskHandle::new();
        self.tasks.push(AnimationTask {
            target,
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing: self.easing,
            handle: handle.clone(),
        });
        self.started += 1;
        handle
    }

    /// Step every live task by `dt` seconds and write the scales into
    /// `graph`. Finished tasks land exactly on their end value.
    pub fn advance(&mut self, dt: f32, graph: &mut SceneGraph) -> Vec<ScaleWrite> {
        let mut writes = Vec::new();
        let dt = dt.max(0.0);

        self.tasks.retain_mut(|task| {
            if !task.handle.is_live() {
                return false;
            }
            task.handle.set(TaskState::Running);
            task.elapsed += dt;

            let done = task.elapsed >= task.duration;
            let value = if done {
                task.to
            } else {
                task.value_at(task.elapsed)
            };

            if graph.set_uniform_scale_at(task.target.index, value) {
                writes.push(ScaleWrite {
                    target: task.target,
                    scale: value,
                });
            } else {
                log::debug!("tween target {} missing from scene", task.target.id);
            }

            if done {
                task.handle.set(TaskState::Completed);
            }
            !done
        });

        writes
    }

    /// Drop every task. Only used when the scene graph is replaced.
    pub fn reset(&mut self) {
        for task in self.tasks.drain(..) {
            task.handle.cancel();
        }
    }

    pub fn is_animating(&self, index: NodeIndex) -> bool {
        self.tasks.iter().any(|t| t.target.index == index)
    }

    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }

    /// Total tasks started since construction.
    pub fn started_count(&self) -> u64 {
        self.started
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vt_core::SceneEntity;

    fn graph_with(name: &str) -> (SceneGraph, NodeRef) {
        let mut g = SceneGraph::new();
        let idx = g.add_entity(g.root, SceneEntity::group(name));
        let node = g.node_ref(idx).unwrap();
        (g, node)
    }

    #[test]
    fn easing_endpoints_and_monotonic() {
        for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
            let mut prev = 0.0;
            for i in 1..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!(v >= prev, "{easing:?} not monotonic at {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn task_runs_to_completion() {
        let (mut g, node) = graph_with("anim_complete");
        let mut s = AnimationScheduler::new(Easing::Linear);
        let handle = s.animate_scale(node, 1.0, 2.0, 1.0);
        assert_eq!(handle.state(), TaskState::Created);

        let w = s.advance(0.5, &mut g);
        assert_eq!(w, vec![ScaleWrite { target: node, scale: 1.5 }]);
        assert_eq!(handle.state(), TaskState::Running);

        s.advance(0.6, &mut g);
        assert_eq!(g.scale_at(node.index), Some(2.0));
        assert_eq!(handle.state(), TaskState::Completed);
        assert!(!s.is_animating(node.index));
    }

    #[test]
    fn second_call_overwrites_first() {
        let (mut g, node) = graph_with("anim_overwrite");
        let mut s = AnimationScheduler::new(Easing::EaseOut);

        let first = s.animate_scale(node, 1.0, 1.2, 0.3);
        s.advance(0.1, &mut g);
        let mid = g.scale_at(node.index).unwrap();
        let second = s.animate_scale(node, mid, 1.0, 0.3);

        assert_eq!(first.state(), TaskState::Cancelled);
        assert_eq!(s.active_count(), 1);

        for _ in 0..10 {
            s.advance(0.05, &mut g);
        }
        assert_eq!(g.scale_at(node.index), Some(1.0));
        assert_eq!(second.state(), TaskState::Completed);
        assert_eq!(first.state(), TaskState::Cancelled);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let (mut g, node) = graph_with("anim_instant");
        let mut s = AnimationScheduler::default();
        s.animate_scale(node, 1.0, 3.0, 0.0);
        s.advance(0.0, &mut g);
        assert_eq!(g.scale_at(node.index), Some(3.0));
        assert_eq!(s.active_count(), 0);
    }

    #[test]
    fn same_name_on_two_nodes_is_two_targets() {
        let mut g = SceneGraph::new();
        let a = g.add_entity(g.root, SceneEntity::group("anim_twin"));
        let b = g.add_entity(g.root, SceneEntity::group("anim_twin"));
        let (a, b) = (g.node_ref(a).unwrap(), g.node_ref(b).unwrap());

        let mut s = AnimationScheduler::default();
        let ha = s.animate_scale(a, 1.0, 2.0, 1.0);
        let hb = s.animate_scale(b, 1.0, 3.0, 1.0);
        assert!(ha.is_live() && hb.is_live());
        assert_eq!(s.started_count(), 2);

        s.advance(1.0, &mut g);
        assert_eq!(g.scale_at(a.index), Some(2.0));
        assert_eq!(g.scale_at(b.index), Some(3.0));
    }

    #[test]
    fn missing_target_is_dropped_quietly() {
        let mut g = SceneGraph::new();
        let mut s = AnimationScheduler::default();
        let ghost = NodeRef {
            id: vt_core::EntityId::intern("anim_ghost"),
            index: NodeIndex::new(42),
        };
        s.animate_scale(ghost, 1.0, 2.0, 0.1);
        assert!(s.advance(0.2, &mut g).is_empty());
        assert_eq!(s.active_count(), 0);
    }
}
