//! Arena view of one menu location's items.
//!
//! Every depth question is answered from a single bulk load of the location,
//! so no query is issued per tree level. Cycles in stored data are reported
//! as [`TreeError::Cycle`] instead of being cut off by a hop limit.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use cms_shared::constants::MAX_MENU_DEPTH;

use super::TreeError;
use crate::domain::MenuItem;

#[derive(Debug)]
struct ForestNode {
    id: Uuid,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Outcome of a re-parent check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCheck {
    pub can_move: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_depth: Option<u32>,
}

impl MoveCheck {
    fn allowed(total_depth: u32) -> Self {
        Self {
            can_move: true,
            reason: None,
            total_depth: Some(total_depth),
        }
    }

    fn rejected(reason: String, total_depth: Option<u32>) -> Self {
        Self {
            can_move: false,
            reason: Some(reason),
            total_depth,
        }
    }
}

#[derive(Debug, Default)]
pub struct MenuForest {
    nodes: Vec<ForestNode>,
    index: HashMap<Uuid, usize>,
}

impl MenuForest {
    /// Builds the arena from `(id, parent_id)` links. A parent id missing from
    /// the set makes the node a root. Duplicate ids keep the first link.
    pub fn from_links<I>(links: I) -> Self
    where
        I: IntoIterator<Item = (Uuid, Option<Uuid>)>,
    {
        let mut forest = Self::default();
        let mut parents = Vec::new();

        for (id, parent_id) in links {
            if forest.index.contains_key(&id) {
                continue;
            }
            forest.index.insert(id, forest.nodes.len());
            forest.nodes.push(ForestNode {
                id,
                parent: None,
                children: Vec::new(),
            });
            parents.push(parent_id);
        }

        for (idx, parent_id) in parents.into_iter().enumerate() {
            let parent = parent_id.and_then(|pid| forest.index.get(&pid).copied());
            if let Some(parent_idx) = parent {
                forest.nodes[idx].parent = Some(parent_idx);
                forest.nodes[parent_idx].children.push(idx);
            }
        }

        forest
    }

    pub fn from_items(items: &[MenuItem]) -> Self {
        Self::from_links(items.iter().map(|item| (item.id, item.parent_id)))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.index.contains_key(id)
    }

    fn lookup(&self, id: &Uuid) -> Result<usize, TreeError> {
        self.index.get(id).copied().ok_or(TreeError::NodeNotFound(*id))
    }

    /// Number of nodes from `idx` up to its root, both included.
    fn chain_len(&self, idx: usize) -> Result<u32, TreeError> {
        let mut visited = HashSet::new();
        let mut level = 0;
        let mut current = Some(idx);

        while let Some(i) = current {
            if !visited.insert(i) {
                return Err(TreeError::Cycle(self.nodes[i].id));
            }
            level += 1;
            current = self.nodes[i].parent;
        }

        Ok(level)
    }

    /// Level of an existing node, root = 1.
    pub fn depth_of(&self, id: &Uuid) -> Result<u32, TreeError> {
        self.chain_len(self.lookup(id)?)
    }

    /// Level a new child of `parent` would occupy; `None` places it at the root.
    pub fn depth_for_parent(&self, parent: Option<&Uuid>) -> Result<u32, TreeError> {
        match parent {
            None => Ok(1),
            Some(parent_id) => {
                let idx = self
                    .index
                    .get(parent_id)
                    .copied()
                    .ok_or(TreeError::ParentNotFound(*parent_id))?;
                Ok(self.chain_len(idx)? + 1)
            }
        }
    }

    /// Deepest level below `id`, counting `id` itself as 1. Breadth-first.
    pub fn subtree_depth(&self, id: &Uuid) -> Result<u32, TreeError> {
        let root = self.lookup(id)?;
        let mut visited = HashSet::from([root]);
        let mut frontier = vec![root];
        let mut depth = 0;

        while !frontier.is_empty() {
            depth += 1;
            let mut next = Vec::new();
            for idx in frontier {
                for &child in &self.nodes[idx].children {
                    if !visited.insert(child) {
                        return Err(TreeError::Cycle(self.nodes[child].id));
                    }
                    next.push(child);
                }
            }
            frontier = next;
        }

        Ok(depth)
    }

    /// True when `ancestor` sits on the parent chain of `id` (or is `id`).
    pub fn is_in_subtree_of(&self, ancestor: &Uuid, id: &Uuid) -> Result<bool, TreeError> {
        let target = self.lookup(ancestor)?;
        let mut visited = HashSet::new();
        let mut current = Some(self.lookup(id)?);

        while let Some(i) = current {
            if i == target {
                return Ok(true);
            }
            if !visited.insert(i) {
                return Err(TreeError::Cycle(self.nodes[i].id));
            }
            current = self.nodes[i].parent;
        }

        Ok(false)
    }

    /// Decides whether `id` together with its subtree may hang under `new_parent`.
    pub fn check_move(&self, id: &Uuid, new_parent: Option<&Uuid>) -> Result<MoveCheck, TreeError> {
        self.lookup(id)?;

        if let Some(parent_id) = new_parent {
            if !self.contains(parent_id) {
                return Err(TreeError::ParentNotFound(*parent_id));
            }
            if self.is_in_subtree_of(id, parent_id)? {
                return Ok(MoveCheck::rejected(
                    "Cannot move a menu item under itself or one of its descendants".to_string(),
                    None,
                ));
            }
        }

        let new_depth = self.depth_for_parent(new_parent)?;
        let subtree_depth = self.subtree_depth(id)?;
        let total_depth = new_depth + subtree_depth - 1;

        debug!(
            item_id = %id,
            new_depth,
            subtree_depth,
            total_depth,
            "Computed prospective menu depth"
        );

        if total_depth > MAX_MENU_DEPTH {
            return Ok(MoveCheck::rejected(
                format!(
                    "Maximum menu depth exceeded: the moved item would reach level {} (max {} levels)",
                    total_depth, MAX_MENU_DEPTH
                ),
                Some(total_depth),
            ));
        }

        Ok(MoveCheck::allowed(total_depth))
    }

    /// Checks the depth bound for every node.
    pub fn validate(&self) -> Result<(), TreeError> {
        for idx in 0..self.nodes.len() {
            let depth = self.chain_len(idx)?;
            if depth > MAX_MENU_DEPTH {
                return Err(TreeError::DepthExceeded {
                    id: self.nodes[idx].id,
                    depth,
                });
            }
        }
        Ok(())
    }
}
