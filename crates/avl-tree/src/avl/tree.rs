use std::borrow::Borrow;
use std::fmt;

use crate::observe::{NoopObserver, RebalanceObserver};
use crate::util as links;

use super::types::AvlNode;
use super::util::{self, Nodes};

/// Ordered key/value map kept height-balanced under the AVL discipline.
///
/// Mutation takes `&mut self` and lookups take `&self`, so any number of
/// readers or a single writer can hold the tree at a time.  To share it across
/// threads, put the whole tree behind one `RwLock`.
///
/// The observer `O` sees every rebalancing decision; see [`crate::observe`].
pub struct AvlTree<K, V, O = NoopObserver>
where
    O: RebalanceObserver,
{
    arena: Nodes<K, V>,
    root: Option<u32>,
    observer: O,
}

impl<K, V> AvlTree<K, V> {
    pub fn new() -> Self {
        Self::with_observer(NoopObserver)
    }
}

impl<K, V> Default for AvlTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, O> AvlTree<K, V, O>
where
    O: RebalanceObserver,
{
    pub fn with_observer(observer: O) -> Self {
        Self {
            arena: Nodes::new(),
            root: None,
            observer,
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// Arena slot of the root node.
    pub fn root_index(&self) -> Option<u32> {
        self.root
    }

    /// Read-only view of the node in slot `idx`, or `None` if the slot is not
    /// in use.
    pub fn node(&self, idx: u32) -> Option<&AvlNode<K, V>> {
        self.arena.get(idx)
    }

    /// Whether slot `idx` holds a node that is its parent's left child.
    pub fn is_left_child(&self, idx: u32) -> bool {
        self.arena.get(idx).is_some() && links::is_left_child(&self.arena, idx)
    }

    pub fn is_right_child(&self, idx: u32) -> bool {
        self.arena.get(idx).is_some() && links::is_right_child(&self.arena, idx)
    }

    /// The other child of slot `idx`'s parent.
    pub fn sibling(&self, idx: u32) -> Option<u32> {
        self.arena.get(idx)?;
        links::sibling(&self.arena, idx)
    }

    /// Slots ever allocated, including ones freed by removals and waiting to
    /// be reused.
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }
}

impl<K, V, O> AvlTree<K, V, O>
where
    K: Ord,
    O: RebalanceObserver,
{
    /// Inserts `value` under `key`.  An existing entry is overwritten in place
    /// and its previous value returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        util::insert(&mut self.arena, &mut self.root, key, value, &mut self.observer)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|i| &self.arena[i].v)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let idx = self.find(key)?;
        Some(&mut self.arena[idx].v)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Removes `key`, returning its value.  Removing an absent key does
    /// nothing.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let target = self.find(key)?;
        Some(util::remove(
            &mut self.arena,
            &mut self.root,
            target,
            &mut self.observer,
        ))
    }

    /// Arena slot holding `key`.
    pub fn find<Q>(&self, key: &Q) -> Option<u32>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        util::find(&self.arena, self.root, key)
    }

    /// Positional search: the slot holding `key`, or the slot that would
    /// become its parent, or `None` when the tree is empty.
    pub fn search<Q>(&self, key: &Q) -> Option<u32>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        util::search(&self.arena, self.root, key)
    }
}

impl<K, V, O> Extend<(K, V)> for AvlTree<K, V, O>
where
    K: Ord,
    O: RebalanceObserver,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K, V, O> fmt::Debug for AvlTree<K, V, O>
where
    K: fmt::Debug,
    V: fmt::Debug,
    O: RebalanceObserver,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::inspect::print(self, self.root, ""))
    }
}
