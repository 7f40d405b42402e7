//! Rebalancing instrumentation.
//!
//! The tree reports each retrace decision to a caller-supplied
//! [`RebalanceObserver`].  The default [`NoopObserver`] compiles away;
//! [`TracingObserver`] forwards events to `tracing`; `Vec<RebalanceEvent>`
//! records them for later inspection.
//!
//! Node indices in events are arena slots, readable through
//! [`AvlTree::node`](crate::AvlTree::node) while the tree is unchanged.

use std::fmt;

/// Which structural edit a retrace walk is repairing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Retrace {
    Insertion,
    Deletion,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rotation {
    Left,
    Right,
    LeftRight,
    RightLeft,
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rotation::Left => "left",
            Rotation::Right => "right",
            Rotation::LeftRight => "left-right",
            Rotation::RightLeft => "right-left",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RebalanceEvent {
    /// `pivot` was out of balance; `new_root` replaced it as subtree root.
    Rotated {
        retrace: Retrace,
        rotation: Rotation,
        pivot: u32,
        new_root: u32,
    },
    /// `node`'s subtree height changed; the walk moves on to its parent.
    Propagated {
        retrace: Retrace,
        node: u32,
        bf: i8,
    },
    /// `node` took up the change without a height change; the walk stops.
    Absorbed {
        retrace: Retrace,
        node: u32,
        bf: i8,
    },
    /// The walk ran past the tree root.
    ReachedRoot { retrace: Retrace },
}

/// Hook invoked at rotation and retrace decision points.
pub trait RebalanceObserver {
    fn observe(&mut self, event: RebalanceEvent);
}

/// Ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl RebalanceObserver for NoopObserver {
    #[inline(always)]
    fn observe(&mut self, _event: RebalanceEvent) {}
}

/// Emits rotations at `debug` and the rest of the walk at `trace`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl RebalanceObserver for TracingObserver {
    fn observe(&mut self, event: RebalanceEvent) {
        match event {
            RebalanceEvent::Rotated {
                retrace,
                rotation,
                pivot,
                new_root,
            } => tracing::debug!(?retrace, %rotation, pivot, new_root, "avl: rotated"),
            RebalanceEvent::Propagated { retrace, node, bf } => {
                tracing::trace!(?retrace, node, bf, "avl: height change propagates")
            }
            RebalanceEvent::Absorbed { retrace, node, bf } => {
                tracing::trace!(?retrace, node, bf, "avl: height change absorbed")
            }
            RebalanceEvent::ReachedRoot { retrace } => {
                tracing::trace!(?retrace, "avl: retrace reached root")
            }
        }
    }
}

impl RebalanceObserver for Vec<RebalanceEvent> {
    fn observe(&mut self, event: RebalanceEvent) {
        self.push(event);
    }
}

impl<O: RebalanceObserver + ?Sized> RebalanceObserver for &mut O {
    fn observe(&mut self, event: RebalanceEvent) {
        (**self).observe(event);
    }
}
