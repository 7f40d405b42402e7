//! AVL structural algorithm: positional search, rotations, insertion and
//! deletion with their retrace walks.
//!
//! Balance factors are kept up to date incrementally.  Nothing here measures
//! a subtree height; that lives in [`crate::inspect`] and exists only to
//! cross-check the numbers maintained below.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::mem;

use crate::arena::Arena;
use crate::observe::{RebalanceEvent, RebalanceObserver, Retrace, Rotation};
use crate::types::{Node, Side, BALANCED, LEFT_HEAVY, RIGHT_HEAVY};
use crate::util::{first, get_l, get_p, get_r, link, replace_in_parent, side_of};

use super::types::AvlNode;

pub(crate) type Nodes<K, V> = Arena<AvlNode<K, V>>;

#[inline]
fn bf<K, V>(arena: &Nodes<K, V>, i: u32) -> i8 {
    arena[i].bf
}

#[inline]
fn set_bf<K, V>(arena: &mut Nodes<K, V>, i: u32, v: i8) {
    arena[i].bf = v;
}

/// Positional search.
///
/// Returns the node holding `key`, or the node that would become its parent
/// if it were inserted now, or `None` for an empty tree.
pub(crate) fn search<K, V, Q>(arena: &Nodes<K, V>, root: Option<u32>, key: &Q) -> Option<u32>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut curr = root?;
    loop {
        let next = match key.cmp(arena[curr].k.borrow()) {
            Ordering::Less => get_l(arena, curr),
            Ordering::Greater => get_r(arena, curr),
            Ordering::Equal => return Some(curr),
        };
        match next {
            Some(next) => curr = next,
            None => return Some(curr),
        }
    }
}

/// Node holding exactly `key`.
pub(crate) fn find<K, V, Q>(arena: &Nodes<K, V>, root: Option<u32>, key: &Q) -> Option<u32>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    search(arena, root, key).filter(|&i| key.cmp(arena[i].k.borrow()) == Ordering::Equal)
}

/// Left rotation at `x`.  Returns the new subtree root (`x`'s former right
/// child).
///
/// The balance factors of the rotating pair are derived from their old
/// values alone, so this stays exact for the intermediate ±2 state seen
/// during rebalancing and for either half of a double rotation.
pub(crate) fn rotate_left<K, V>(arena: &mut Nodes<K, V>, root: &mut Option<u32>, x: u32) -> u32 {
    let y = get_r(arena, x).expect("left rotation pivot has a right child");
    let orphan = get_l(arena, y);

    replace_in_parent(arena, root, x, Some(y));
    link(arena, y, Side::Left, Some(x));
    link(arena, x, Side::Right, orphan);

    let mut xbf = bf(arena, x);
    let mut ybf = bf(arena, y);
    xbf += 1 - ybf.min(0);
    ybf += 1 + xbf.max(0);
    set_bf(arena, x, xbf);
    set_bf(arena, y, ybf);
    y
}

/// Right rotation at `x`, mirror of [`rotate_left`].
pub(crate) fn rotate_right<K, V>(arena: &mut Nodes<K, V>, root: &mut Option<u32>, x: u32) -> u32 {
    let y = get_l(arena, x).expect("right rotation pivot has a left child");
    let orphan = get_r(arena, y);

    replace_in_parent(arena, root, x, Some(y));
    link(arena, y, Side::Right, Some(x));
    link(arena, x, Side::Left, orphan);

    let mut xbf = bf(arena, x);
    let mut ybf = bf(arena, y);
    xbf += -1 - ybf.max(0);
    ybf += -1 + xbf.min(0);
    set_bf(arena, x, xbf);
    set_bf(arena, y, ybf);
    y
}

pub(crate) fn rotate_left_right<K, V>(arena: &mut Nodes<K, V>, root: &mut Option<u32>, x: u32) -> u32 {
    let l = get_l(arena, x).expect("left-right rotation pivot has a left child");
    rotate_left(arena, root, l);
    rotate_right(arena, root, x)
}

pub(crate) fn rotate_right_left<K, V>(arena: &mut Nodes<K, V>, root: &mut Option<u32>, x: u32) -> u32 {
    let r = get_r(arena, x).expect("right-left rotation pivot has a right child");
    rotate_right(arena, root, r);
    rotate_left(arena, root, x)
}

pub(crate) fn rotate<K, V>(
    arena: &mut Nodes<K, V>,
    root: &mut Option<u32>,
    x: u32,
    rotation: Rotation,
) -> u32 {
    match rotation {
        Rotation::Left => rotate_left(arena, root, x),
        Rotation::Right => rotate_right(arena, root, x),
        Rotation::LeftRight => rotate_left_right(arena, root, x),
        Rotation::RightLeft => rotate_right_left(arena, root, x),
    }
}

/// Rotation that repairs a node whose `heavy` side is two levels taller,
/// given the balance factor of its child on that side.
fn rotation_for(heavy: Side, child_bf: i8) -> Rotation {
    match heavy {
        Side::Left if child_bf == RIGHT_HEAVY => Rotation::LeftRight,
        Side::Left => Rotation::Right,
        Side::Right if child_bf == LEFT_HEAVY => Rotation::RightLeft,
        Side::Right => Rotation::Left,
    }
}

fn rebalance<K, V, O>(
    arena: &mut Nodes<K, V>,
    root: &mut Option<u32>,
    pivot: u32,
    heavy: Side,
    retrace: Retrace,
    observer: &mut O,
) -> u32
where
    O: RebalanceObserver,
{
    let child = arena[pivot]
        .child(heavy)
        .expect("heavy side of an unbalanced node is non-empty");
    let rotation = rotation_for(heavy, bf(arena, child));
    let new_root = rotate(arena, root, pivot, rotation);
    observer.observe(RebalanceEvent::Rotated {
        retrace,
        rotation,
        pivot,
        new_root,
    });
    new_root
}

/// Inserts `key` / `value`, overwriting and returning the old value when the
/// key is already present.
pub(crate) fn insert<K, V, O>(
    arena: &mut Nodes<K, V>,
    root: &mut Option<u32>,
    key: K,
    value: V,
    observer: &mut O,
) -> Option<V>
where
    K: Ord,
    O: RebalanceObserver,
{
    let Some(parent) = search(arena, *root, &key) else {
        *root = Some(arena.alloc(AvlNode::new(key, value, None)));
        return None;
    };

    let side = match key.cmp(&arena[parent].k) {
        Ordering::Equal => return Some(mem::replace(&mut arena[parent].v, value)),
        Ordering::Less => Side::Left,
        Ordering::Greater => Side::Right,
    };
    let n = arena.alloc(AvlNode::new(key, value, Some(parent)));
    arena[parent].set_child(side, Some(n));
    retrace_insertion(arena, root, n, observer);
    None
}

/// Walks up from a freshly attached leaf.  At most one rotation happens: it
/// restores the subtree to its pre-insertion height, so nothing above it
/// changes.
fn retrace_insertion<K, V, O>(arena: &mut Nodes<K, V>, root: &mut Option<u32>, inserted: u32, observer: &mut O)
where
    O: RebalanceObserver,
{
    let retrace = Retrace::Insertion;
    let mut current = inserted;
    while let Some(parent) = get_p(arena, current) {
        let grown = side_of(arena, parent, current);
        let pbf = bf(arena, parent) + grown.weight();
        set_bf(arena, parent, pbf);

        if pbf == BALANCED {
            observer.observe(RebalanceEvent::Absorbed {
                retrace,
                node: parent,
                bf: pbf,
            });
            return;
        }
        if pbf != LEFT_HEAVY && pbf != RIGHT_HEAVY {
            rebalance(arena, root, parent, grown, retrace, observer);
            return;
        }

        observer.observe(RebalanceEvent::Propagated {
            retrace,
            node: parent,
            bf: pbf,
        });
        current = parent;
    }
    observer.observe(RebalanceEvent::ReachedRoot { retrace });
}

/// Unlinks `target` and returns its key and value.
///
/// A target with two children is not unlinked itself: it takes over its
/// in-order successor's entry and the successor's node is released instead.
pub(crate) fn remove<K, V, O>(
    arena: &mut Nodes<K, V>,
    root: &mut Option<u32>,
    target: u32,
    observer: &mut O,
) -> (K, V)
where
    O: RebalanceObserver,
{
    match (get_l(arena, target), get_r(arena, target)) {
        (Some(_), Some(r)) => {
            let succ = first(arena, Some(r)).expect("non-empty subtree has a leftmost node");
            let succ_parent = get_p(arena, succ).expect("in-order successor has a parent");
            let side = side_of(arena, succ_parent, succ);
            let succ_right = get_r(arena, succ);
            link(arena, succ_parent, side, succ_right);

            let AvlNode { k, v, .. } = arena.release(succ);
            let node = &mut arena[target];
            let k = mem::replace(&mut node.k, k);
            let v = mem::replace(&mut node.v, v);

            retrace_deletion(arena, root, succ_parent, side, observer);
            (k, v)
        }
        (child, None) | (None, child) => {
            let parent = get_p(arena, target).map(|p| (p, side_of(arena, p, target)));
            replace_in_parent(arena, root, target, child);
            let AvlNode { k, v, .. } = arena.release(target);

            if let Some((p, side)) = parent {
                retrace_deletion(arena, root, p, side, observer);
            }
            (k, v)
        }
    }
}

/// Walks up from `start`, whose `shrunk` subtree just lost one level.
///
/// Unlike insertion, a rotation here may itself shorten the subtree (unless
/// the heavy child was balanced), in which case the walk carries on from the
/// rotated subtree's new root.
fn retrace_deletion<K, V, O>(
    arena: &mut Nodes<K, V>,
    root: &mut Option<u32>,
    start: u32,
    shrunk: Side,
    observer: &mut O,
) where
    O: RebalanceObserver,
{
    let retrace = Retrace::Deletion;
    let mut node = start;
    let mut shrunk = shrunk;
    loop {
        let old_bf = bf(arena, node);
        let new_bf = old_bf - shrunk.weight();
        set_bf(arena, node, new_bf);

        let subtree = if old_bf == BALANCED {
            observer.observe(RebalanceEvent::Absorbed {
                retrace,
                node,
                bf: new_bf,
            });
            return;
        } else if new_bf == BALANCED {
            observer.observe(RebalanceEvent::Propagated {
                retrace,
                node,
                bf: new_bf,
            });
            node
        } else {
            let new_root = rebalance(arena, root, node, shrunk.opposite(), retrace, observer);
            if bf(arena, new_root) != BALANCED {
                return;
            }
            new_root
        };

        let Some(parent) = get_p(arena, subtree) else {
            observer.observe(RebalanceEvent::ReachedRoot { retrace });
            return;
        };
        shrunk = side_of(arena, parent, subtree);
        node = parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::NoopObserver;

    fn build(keys: &[i32]) -> (Nodes<i32, i32>, Option<u32>) {
        let mut arena = Nodes::new();
        let mut root = None;
        for &k in keys {
            insert(&mut arena, &mut root, k, k * 10, &mut NoopObserver);
        }
        (arena, root)
    }

    fn key_at(arena: &Nodes<i32, i32>, i: Option<u32>) -> Option<i32> {
        i.map(|i| arena[i].k)
    }

    #[test]
    fn search_returns_would_be_parent() {
        let (arena, root) = build(&[20, 10, 30]);
        assert_eq!(key_at(&arena, search(&arena, root, &10)), Some(10));
        assert_eq!(key_at(&arena, search(&arena, root, &5)), Some(10));
        assert_eq!(key_at(&arena, search(&arena, root, &25)), Some(30));
        assert_eq!(find(&arena, root, &25), None);
        assert_eq!(search(&Nodes::<i32, i32>::new(), None, &1), None);
    }

    #[test]
    fn duplicate_insert_returns_previous_value() {
        let (mut arena, mut root) = build(&[1, 2]);
        let old = insert(&mut arena, &mut root, 2, 99, &mut NoopObserver);
        assert_eq!(old, Some(20));
        assert_eq!(arena.len(), 2);
        let i = find(&arena, root, &2).unwrap();
        assert_eq!(arena[i].v, 99);
    }

    #[test]
    fn single_left_rotation_relinks_root() {
        let (arena, root) = build(&[1, 2, 3]);
        let r = root.unwrap();
        assert_eq!(arena[r].k, 2);
        assert_eq!(arena[r].p, None);
        assert_eq!(key_at(&arena, arena[r].l), Some(1));
        assert_eq!(key_at(&arena, arena[r].r), Some(3));
        for i in [r, arena[r].l.unwrap(), arena[r].r.unwrap()] {
            assert_eq!(arena[i].bf, BALANCED);
        }
    }

    #[test]
    fn double_rotation_updates_all_three_balance_factors() {
        // 50 with left 20 (children 10, 30 (child 40)) and right 60:
        // inserting 40 makes 20 right-heavy under a left-heavy 50.
        let (arena, root) = build(&[50, 20, 60, 10, 30, 40]);
        let r = root.unwrap();
        assert_eq!(arena[r].k, 30);
        let l = arena[r].l.unwrap();
        let rr = arena[r].r.unwrap();
        assert_eq!(arena[l].k, 20);
        assert_eq!(arena[rr].k, 50);
        assert_eq!(arena[r].bf, BALANCED);
        assert_eq!(arena[l].bf, LEFT_HEAVY);
        assert_eq!(arena[rr].bf, BALANCED);
    }

    #[test]
    fn rotation_around_balanced_child_keeps_height() {
        // Removing 1 leaves 2 with a balanced right child 4 (children 3, 5).
        let (mut arena, mut root) = build(&[2, 1, 4, 3, 5]);
        let target = find(&arena, root, &1).unwrap();
        let (k, v) = remove(&mut arena, &mut root, target, &mut NoopObserver);
        assert_eq!((k, v), (1, 10));

        let r = root.unwrap();
        assert_eq!(arena[r].k, 4);
        assert_eq!(arena[r].bf, LEFT_HEAVY);
        let l = arena[r].l.unwrap();
        assert_eq!(arena[l].k, 2);
        assert_eq!(arena[l].bf, RIGHT_HEAVY);
    }

    #[test]
    fn two_children_removal_keeps_target_slot() {
        let (mut arena, mut root) = build(&[10, 5, 20, 15, 25]);
        let target = root.unwrap();
        let (k, _) = remove(&mut arena, &mut root, target, &mut NoopObserver);
        assert_eq!(k, 10);
        assert_eq!(root, Some(target));
        assert_eq!(arena[target].k, 15);
        assert_eq!(arena.len(), 4);
    }
}
