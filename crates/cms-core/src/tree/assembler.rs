//! Flat rows to nested menu tree (read path, no validation).

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::MenuItem;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuTreeNode {
    #[serde(flatten)]
    pub item: MenuItem,
    pub children: Vec<MenuTreeNode>,
}

/// Nests `items` under their parents. Items whose parent is null or missing
/// from the list become roots. Sibling order follows input order.
pub fn assemble_tree(items: Vec<MenuItem>) -> Vec<MenuTreeNode> {
    let mut index: HashMap<Uuid, usize> = HashMap::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        index.entry(item.id).or_insert(idx);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); items.len()];
    let mut roots = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        match item.parent_id.and_then(|pid| index.get(&pid).copied()) {
            Some(parent_idx) => children[parent_idx].push(idx),
            None => roots.push(idx),
        }
    }

    let mut slots: Vec<Option<MenuItem>> = items.into_iter().map(Some).collect();
    roots
        .into_iter()
        .filter_map(|idx| build_node(idx, &mut slots, &children))
        .collect()
}

fn build_node(
    idx: usize,
    slots: &mut [Option<MenuItem>],
    children: &[Vec<usize>],
) -> Option<MenuTreeNode> {
    let item = slots[idx].take()?;
    let nested = children[idx]
        .iter()
        .filter_map(|&child| build_node(child, slots, children))
        .collect();

    Some(MenuTreeNode {
        item,
        children: nested,
    })
}

/// Drops inactive nodes together with everything below them.
pub fn prune_inactive(nodes: Vec<MenuTreeNode>) -> Vec<MenuTreeNode> {
    nodes
        .into_iter()
        .filter(|node| node.item.is_active)
        .map(|node| MenuTreeNode {
            children: prune_inactive(node.children),
            item: node.item,
        })
        .collect()
}
