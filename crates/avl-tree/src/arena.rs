//! Slot arena backing the tree's nodes.
//!
//! Every node is addressed by a `u32` slot index.  Released slots go on a free
//! list and are handed out again by later allocations, so a long-lived tree
//! with churn does not grow without bound.  Looking up a released slot with
//! [`Arena::get`] yields `None`.

use std::ops::{Index, IndexMut};

#[derive(Clone, Debug)]
pub struct Arena<N> {
    slots: Vec<Option<N>>,
    free: Vec<u32>,
    len: usize,
}

impl<N> Arena<N> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Stores `node` and returns its slot index.
    pub fn alloc(&mut self, node: N) -> u32 {
        self.len += 1;
        if let Some(idx) = self.free.pop() {
            self.slots[idx as usize] = Some(node);
            return idx;
        }
        self.slots.push(Some(node));
        (self.slots.len() - 1) as u32
    }

    /// Takes the node out of slot `idx`, making the slot reusable.
    ///
    /// Panics if the slot is already vacant.
    pub fn release(&mut self, idx: u32) -> N {
        let node = self.slots[idx as usize]
            .take()
            .expect("released arena slot is live");
        self.free.push(idx);
        self.len -= 1;
        node
    }

    pub fn get(&self, idx: u32) -> Option<&N> {
        self.slots.get(idx as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, idx: u32) -> Option<&mut N> {
        self.slots.get_mut(idx as usize).and_then(Option::as_mut)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots ever allocated, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }
}

impl<N> Default for Arena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Index<u32> for Arena<N> {
    type Output = N;

    fn index(&self, idx: u32) -> &N {
        self.get(idx).expect("linked arena slot is live")
    }
}

impl<N> IndexMut<u32> for Arena<N> {
    fn index_mut(&mut self, idx: u32) -> &mut N {
        self.get_mut(idx).expect("linked arena slot is live")
    }
}

#[cfg(test)]
mod tests {
    use super::Arena;

    #[test]
    fn released_slots_are_recycled() {
        let mut arena = Arena::new();
        let a = arena.alloc("a");
        let b = arena.alloc("b");
        assert_eq!(arena.len(), 2);

        assert_eq!(arena.release(a), "a");
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.len(), 1);

        let c = arena.alloc("c");
        assert_eq!(c, a);
        assert_eq!(arena[c], "c");
        assert_eq!(arena[b], "b");
        assert_eq!(arena.capacity(), 2);
    }

    #[test]
    fn out_of_range_lookup_is_none() {
        let arena: Arena<u8> = Arena::new();
        assert!(arena.is_empty());
        assert_eq!(arena.get(7), None);
    }

    #[test]
    #[should_panic(expected = "released arena slot is live")]
    fn double_release_panics() {
        let mut arena = Arena::new();
        let a = arena.alloc(1);
        arena.release(a);
        arena.release(a);
    }
}
