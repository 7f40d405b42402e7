use crate::types::{Node, BALANCED};

/// One stored key/value pair and its position in the tree.
#[derive(Clone, Debug)]
pub struct AvlNode<K, V> {
    pub(crate) p: Option<u32>,
    pub(crate) l: Option<u32>,
    pub(crate) r: Option<u32>,
    pub(crate) k: K,
    pub(crate) v: V,
    /// Balance factor, `height(left) - height(right)`.
    pub(crate) bf: i8,
}

impl<K, V> AvlNode<K, V> {
    pub(crate) fn new(k: K, v: V, p: Option<u32>) -> Self {
        Self {
            p,
            l: None,
            r: None,
            k,
            v,
            bf: BALANCED,
        }
    }

    pub fn key(&self) -> &K {
        &self.k
    }

    pub fn value(&self) -> &V {
        &self.v
    }

    pub fn bf(&self) -> i8 {
        self.bf
    }

    pub fn is_leaf(&self) -> bool {
        self.l.is_none() && self.r.is_none()
    }
}

impl<K, V> Node for AvlNode<K, V> {
    fn p(&self) -> Option<u32> {
        self.p
    }

    fn l(&self) -> Option<u32> {
        self.l
    }

    fn r(&self) -> Option<u32> {
        self.r
    }

    fn set_p(&mut self, v: Option<u32>) {
        self.p = v;
    }

    fn set_l(&mut self, v: Option<u32>) {
        self.l = v;
    }

    fn set_r(&mut self, v: Option<u32>) {
        self.r = v;
    }
}
