//! Link helpers shared by the AVL core and the inspection tooling.
//!
//! These only touch `p` / `l` / `r`; they know nothing about keys or
//! balance factors.

use crate::arena::Arena;
use crate::types::{Node, Side};

#[inline]
pub(crate) fn get_p<N: Node>(arena: &Arena<N>, idx: u32) -> Option<u32> {
    arena[idx].p()
}

#[inline]
pub(crate) fn get_l<N: Node>(arena: &Arena<N>, idx: u32) -> Option<u32> {
    arena[idx].l()
}

#[inline]
pub(crate) fn get_r<N: Node>(arena: &Arena<N>, idx: u32) -> Option<u32> {
    arena[idx].r()
}

#[inline]
pub(crate) fn set_p<N: Node>(arena: &mut Arena<N>, idx: u32, v: Option<u32>) {
    arena[idx].set_p(v);
}

/// Puts `child` into `parent`'s slot on `side` and points `child` back at
/// `parent`.
#[inline]
pub(crate) fn link<N: Node>(arena: &mut Arena<N>, parent: u32, side: Side, child: Option<u32>) {
    arena[parent].set_child(side, child);
    if let Some(c) = child {
        set_p(arena, c, Some(parent));
    }
}

/// Side of `parent` that `child` hangs from.
#[inline]
pub(crate) fn side_of<N: Node>(arena: &Arena<N>, parent: u32, child: u32) -> Side {
    if get_l(arena, parent) == Some(child) {
        Side::Left
    } else {
        Side::Right
    }
}

/// Makes `new` take `old`'s place under `old`'s parent, or at the tree root
/// when `old` has no parent.  `old`'s own links are left untouched.
pub(crate) fn replace_in_parent<N: Node>(
    arena: &mut Arena<N>,
    root: &mut Option<u32>,
    old: u32,
    new: Option<u32>,
) {
    match get_p(arena, old) {
        Some(p) => {
            let side = side_of(arena, p, old);
            link(arena, p, side, new);
        }
        None => {
            *root = new;
            if let Some(n) = new {
                set_p(arena, n, None);
            }
        }
    }
}

pub fn is_left_child<N: Node>(arena: &Arena<N>, idx: u32) -> bool {
    get_p(arena, idx).is_some_and(|p| get_l(arena, p) == Some(idx))
}

pub fn is_right_child<N: Node>(arena: &Arena<N>, idx: u32) -> bool {
    get_p(arena, idx).is_some_and(|p| get_r(arena, p) == Some(idx))
}

/// The other child of `idx`'s parent.
pub fn sibling<N: Node>(arena: &Arena<N>, idx: u32) -> Option<u32> {
    let p = get_p(arena, idx)?;
    match side_of(arena, p, idx) {
        Side::Left => get_r(arena, p),
        Side::Right => get_l(arena, p),
    }
}

/// Leftmost node under `root`.
pub fn first<N: Node>(arena: &Arena<N>, root: Option<u32>) -> Option<u32> {
    let mut curr = root;
    while let Some(idx) = curr {
        match get_l(arena, idx) {
            Some(l) => curr = Some(l),
            None => return Some(idx),
        }
    }
    curr
}
