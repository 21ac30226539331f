//! Menu tree invariants and assembly.
//!
//! Items of one location form a forest at most
//! [`MAX_MENU_DEPTH`](cms_shared::constants::MAX_MENU_DEPTH) levels deep.

pub mod assembler;
pub mod forest;

pub use assembler::{assemble_tree, prune_inactive, MenuTreeNode};
pub use forest::{MenuForest, MoveCheck};

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Node not found: {0}")]
    NodeNotFound(Uuid),

    #[error("Parent not found: {0}")]
    ParentNotFound(Uuid),

    #[error("Cycle detected at node {0}")]
    Cycle(Uuid),

    #[error("Node {id} sits at level {depth}")]
    DepthExceeded { id: Uuid, depth: u32 },
}
