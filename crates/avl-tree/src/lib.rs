//! Arena-based AVL tree map.
//!
//! [`AvlTree`] is an ordered key/value container that keeps every subtree's
//! height imbalance within one, giving O(log n) `insert`, `get` and `remove`.
//! Balance factors are maintained incrementally by the retrace walks and
//! rotations; they are never recomputed from subtree heights outside of the
//! [`inspect`] tooling.
//!
//! Nodes are stored in an [`Arena`] and linked by `Option<u32>` slot indices.
//! Children are reachable only through their parent's `l` / `r` slot (or the
//! tree root); the `p` back-link is a plain index used to walk upward.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`arena`] | Slot arena with free-list reuse |
//! | [`types`] | [`Node`] link trait, [`Side`], balance constants |
//! | [`util`] | Link helpers: `first`, `sibling`, child-side tests |
//! | [`avl`] | [`AvlNode`], rotations and retrace walks, [`AvlTree`] |
//! | [`observe`] | [`RebalanceObserver`] hook and stock observers |
//! | [`inspect`] | [`AvlInspect`] height/invariant checks, debug `print` |
//!
//! ```
//! use avl_tree::{AvlInspect, AvlTree};
//!
//! let mut tree = AvlTree::new();
//! for k in [10, 20, 15] {
//!     tree.insert(k, k * 2);
//! }
//! assert_eq!(tree.get(&15), Some(&30));
//! assert_eq!(tree.remove(&20), Some(40));
//! assert_eq!(tree.get(&20), None);
//! tree.check().unwrap();
//! ```

pub mod arena;
pub mod avl;
pub mod inspect;
pub mod observe;
pub mod types;
pub mod util;

pub use arena::Arena;
pub use avl::{AvlNode, AvlTree};
pub use inspect::{AvlInspect, InvariantViolation};
pub use observe::{NoopObserver, RebalanceEvent, RebalanceObserver, Retrace, Rotation, TracingObserver};
pub use types::{Node, Side};
