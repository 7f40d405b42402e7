//! Verification helpers.
//!
//! Everything here reads the tree only through its public structural view
//! ([`AvlTree::root_index`], [`AvlTree::node`] and the [`Node`] links) and
//! recomputes subtree heights from scratch, so a drift in the incrementally
//! maintained balance factors shows up as a [`InvariantViolation`].

use std::fmt::Debug;

use thiserror::Error;

use crate::avl::{AvlNode, AvlTree};
use crate::observe::RebalanceObserver;
use crate::types::{Node, Side};

/// First structural invariant found broken by [`AvlInspect::check`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("root node {0} has a parent link")]
    RootHasParent(u32),
    #[error("link to vacant arena slot {0}")]
    DanglingLink(u32),
    #[error("{side:?} child {child} of node {parent} points back at {actual:?}")]
    BrokenParentLink {
        parent: u32,
        child: u32,
        side: Side,
        actual: Option<u32>,
    },
    #[error("node {node} is out of balance: subtree heights differ by {difference}")]
    Unbalanced { node: u32, difference: i64 },
    #[error("node {node} stores balance factor {actual}, subtree heights give {expected}")]
    BalanceFactorMismatch { node: u32, expected: i64, actual: i8 },
    #[error("node {node} is out of key order")]
    OrderViolation { node: u32 },
    #[error("tree reports {reported} entries but {counted} nodes are reachable")]
    LengthMismatch { reported: usize, counted: usize },
}

/// Read-only checks over a tree's structure.
pub trait AvlInspect {
    /// Height of the subtree rooted at `node`, in nodes; an empty subtree has
    /// height 0.
    fn subtree_height(&self, node: Option<u32>) -> usize;

    /// Height of the whole tree.
    fn height(&self) -> usize;

    /// Nodes reachable from the root.
    fn count_nodes(&self) -> usize;

    /// Whether every node's subtree heights differ by at most one.
    fn is_avl(&self) -> bool;

    /// Whether every stored balance factor equals its recomputed height
    /// difference.
    fn valid_balance_factors(&self) -> bool;

    /// Checks ordering, balance, balance factors, parent links and length.
    fn check(&self) -> Result<(), InvariantViolation>;
}

impl<K, V, O> AvlInspect for AvlTree<K, V, O>
where
    K: Ord,
    O: RebalanceObserver,
{
    fn subtree_height(&self, node: Option<u32>) -> usize {
        match node.and_then(|i| self.node(i)) {
            None => 0,
            Some(n) => 1 + self.subtree_height(n.l()).max(self.subtree_height(n.r())),
        }
    }

    fn height(&self) -> usize {
        self.subtree_height(self.root_index())
    }

    fn count_nodes(&self) -> usize {
        fn count<K, V, O: RebalanceObserver>(tree: &AvlTree<K, V, O>, node: Option<u32>) -> usize {
            match node.and_then(|i| tree.node(i)) {
                None => 0,
                Some(n) => 1 + count(tree, n.l()) + count(tree, n.r()),
            }
        }
        count(self, self.root_index())
    }

    fn is_avl(&self) -> bool {
        all_nodes(self, self.root_index(), &mut |_, n| {
            height_difference(self, n).abs() <= 1
        })
    }

    fn valid_balance_factors(&self) -> bool {
        all_nodes(self, self.root_index(), &mut |_, n| {
            height_difference(self, n) == i64::from(n.bf())
        })
    }

    fn check(&self) -> Result<(), InvariantViolation> {
        let Some(root) = self.root_index() else {
            return match self.len() {
                0 => Ok(()),
                reported => Err(InvariantViolation::LengthMismatch {
                    reported,
                    counted: 0,
                }),
            };
        };
        let node = self.node(root).ok_or(InvariantViolation::DanglingLink(root))?;
        if node.p().is_some() {
            return Err(InvariantViolation::RootHasParent(root));
        }

        let mut counted = 0;
        check_subtree(self, root, None, None, &mut counted)?;
        if counted != self.len() {
            return Err(InvariantViolation::LengthMismatch {
                reported: self.len(),
                counted,
            });
        }
        Ok(())
    }
}

fn height_difference<K, V, O>(tree: &AvlTree<K, V, O>, n: &AvlNode<K, V>) -> i64
where
    K: Ord,
    O: RebalanceObserver,
{
    tree.subtree_height(n.l()) as i64 - tree.subtree_height(n.r()) as i64
}

fn all_nodes<K, V, O, F>(tree: &AvlTree<K, V, O>, node: Option<u32>, pred: &mut F) -> bool
where
    O: RebalanceObserver,
    F: FnMut(u32, &AvlNode<K, V>) -> bool,
{
    let Some(i) = node else {
        return true;
    };
    let Some(n) = tree.node(i) else {
        return false;
    };
    pred(i, n) && all_nodes(tree, n.l(), pred) && all_nodes(tree, n.r(), pred)
}

/// Validates the subtree at `idx` against the exclusive key bounds and
/// returns its height.
fn check_subtree<K, V, O>(
    tree: &AvlTree<K, V, O>,
    idx: u32,
    lower: Option<&K>,
    upper: Option<&K>,
    counted: &mut usize,
) -> Result<usize, InvariantViolation>
where
    K: Ord,
    O: RebalanceObserver,
{
    let node = tree.node(idx).ok_or(InvariantViolation::DanglingLink(idx))?;
    *counted += 1;

    let key = node.key();
    if lower.is_some_and(|lo| key <= lo) || upper.is_some_and(|hi| key >= hi) {
        return Err(InvariantViolation::OrderViolation { node: idx });
    }

    let mut heights = [0usize; 2];
    for (slot, side) in [Side::Left, Side::Right].into_iter().enumerate() {
        let Some(child) = node.child(side) else {
            continue;
        };
        let child_node = tree.node(child).ok_or(InvariantViolation::DanglingLink(child))?;
        if child_node.p() != Some(idx) {
            return Err(InvariantViolation::BrokenParentLink {
                parent: idx,
                child,
                side,
                actual: child_node.p(),
            });
        }
        heights[slot] = match side {
            Side::Left => check_subtree(tree, child, lower, Some(key), counted)?,
            Side::Right => check_subtree(tree, child, Some(key), upper, counted)?,
        };
    }

    let expected = heights[0] as i64 - heights[1] as i64;
    if expected.abs() > 1 {
        return Err(InvariantViolation::Unbalanced {
            node: idx,
            difference: expected,
        });
    }
    if expected != i64::from(node.bf()) {
        return Err(InvariantViolation::BalanceFactorMismatch {
            node: idx,
            expected,
            actual: node.bf(),
        });
    }
    Ok(1 + heights[0].max(heights[1]))
}

/// Debug dump of the subtree at `node`, one line per node with its slot,
/// balance factor and entry.
pub fn print<K, V, O>(tree: &AvlTree<K, V, O>, node: Option<u32>, tab: &str) -> String
where
    K: Debug,
    V: Debug,
    O: RebalanceObserver,
{
    match node.and_then(|i| tree.node(i).map(|n| (i, n))) {
        None => "∅".to_string(),
        Some((i, n)) => {
            let left = print(tree, n.l(), &format!("{tab}  "));
            let right = print(tree, n.r(), &format!("{tab}  "));
            format!(
                "Node[{i}] [bf={}] {{ {:?} = {:?} }}\n{tab}L={left}\n{tab}R={right}",
                n.bf(),
                n.key(),
                n.value()
            )
        }
    }
}
