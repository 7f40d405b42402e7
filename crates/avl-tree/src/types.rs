//! Node link trait and shared tree vocabulary.
//!
//! Nodes live in an [`Arena`](crate::arena::Arena) and refer to each other
//! with `Option<u32>` slot indices.  `l` / `r` are the owning child slots;
//! `p` is a plain back-reference used only to walk upward.

/// Binary tree links (`p`, `l`, `r`).
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);

    /// Child slot on `side`.
    fn child(&self, side: Side) -> Option<u32> {
        match side {
            Side::Left => self.l(),
            Side::Right => self.r(),
        }
    }

    fn set_child(&mut self, side: Side, v: Option<u32>) {
        match side {
            Side::Left => self.set_l(v),
            Side::Right => self.set_r(v),
        }
    }
}

/// Which child slot of a parent a node occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Balance-factor contribution of one extra level on this side.
    ///
    /// Balance factors are `height(left) - height(right)`, so growing the left
    /// side adds [`LEFT_HEAVY`] and growing the right side adds [`RIGHT_HEAVY`].
    pub fn weight(self) -> i8 {
        match self {
            Side::Left => LEFT_HEAVY,
            Side::Right => RIGHT_HEAVY,
        }
    }
}

pub const LEFT_HEAVY: i8 = 1;
pub const RIGHT_HEAVY: i8 = -1;
pub const BALANCED: i8 = 0;
