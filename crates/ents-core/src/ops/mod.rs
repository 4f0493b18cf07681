pub mod relation_ops;
pub mod traversal;
pub mod tree;

pub use relation_ops::{
    ancestors, checked_connect, connect, connect_and_prune, descendants, disconnect,
    parental_conflicts, set_exclusive, set_overlap, siblings, Edge,
};
pub use tree::{Tree, ROOT_NAME};
