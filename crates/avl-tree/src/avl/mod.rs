//! AVL tree: node record, structural algorithm and the public map type.

pub mod tree;
pub mod types;
pub(crate) mod util;

pub use tree::AvlTree;
pub use types::AvlNode;
