//! Parent/child tree building from flat rows
//!
//! Categories and navigation items are stored flat with a nullable
//! `parent_id`. [`build_tree`] groups them into a forest:
//!
//! - siblings are ordered by `(sort_order, id)`
//! - a row whose parent is not in the input becomes a root
//! - rows caught in a parent cycle can never be reached from a root;
//!   they are dropped (and logged)

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use shared::models::{Category, LocalizedCategory, LocalizedNavItem, NavigationItem};

/// A row that can be placed in a tree
pub trait TreeItem {
    fn id(&self) -> i64;
    fn parent_id(&self) -> Option<i64>;
    fn sort_order(&self) -> i32;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode<T> {
    #[serde(flatten)]
    pub item: T,
    pub children: Vec<TreeNode<T>>,
}

impl<T> TreeNode<T> {
    /// Transform every item, keeping the shape
    pub fn map<U>(self, f: &impl Fn(T) -> U) -> TreeNode<U> {
        TreeNode {
            item: f(self.item),
            children: self.children.into_iter().map(|c| c.map(f)).collect(),
        }
    }
}

/// Group flat rows into a forest.
pub fn build_tree<T: TreeItem>(rows: Vec<T>) -> Vec<TreeNode<T>> {
    let mut items: HashMap<i64, T> = HashMap::with_capacity(rows.len());
    for row in rows {
        let id = row.id();
        if items.contains_key(&id) {
            tracing::warn!(id, "Duplicate tree row ignored");
            continue;
        }
        items.insert(id, row);
    }

    // (sort_order, id) keys sort siblings directly
    let mut roots: Vec<(i32, i64)> = Vec::new();
    let mut children: HashMap<i64, Vec<(i32, i64)>> = HashMap::new();
    for item in items.values() {
        let key = (item.sort_order(), item.id());
        match item.parent_id() {
            Some(pid) if items.contains_key(&pid) => children.entry(pid).or_default().push(key),
            _ => roots.push(key),
        }
    }
    roots.sort_unstable();
    for siblings in children.values_mut() {
        siblings.sort_unstable();
    }

    let forest = roots
        .into_iter()
        .filter_map(|(_, id)| attach(id, &mut items, &children))
        .collect();

    if !items.is_empty() {
        let mut ids: Vec<i64> = items.into_keys().collect();
        ids.sort_unstable();
        tracing::warn!(?ids, "Dropping tree rows caught in a parent cycle");
    }

    forest
}

fn attach<T>(
    id: i64,
    items: &mut HashMap<i64, T>,
    children: &HashMap<i64, Vec<(i32, i64)>>,
) -> Option<TreeNode<T>> {
    let item = items.remove(&id)?;
    let kids = children
        .get(&id)
        .map(|siblings| {
            siblings
                .iter()
                .filter_map(|&(_, child)| attach(child, items, children))
                .collect()
        })
        .unwrap_or_default();
    Some(TreeNode {
        item,
        children: kids,
    })
}

/// Depth-first search for a node
pub fn find<T: TreeItem>(nodes: &[TreeNode<T>], id: i64) -> Option<&TreeNode<T>> {
    nodes.iter().find_map(|node| {
        if node.item.id() == id {
            Some(node)
        } else {
            find(&node.children, id)
        }
    })
}

/// Ids of `id` and everything below it (preorder). Empty when `id` is not in the forest.
pub fn descendant_ids<T: TreeItem>(nodes: &[TreeNode<T>], id: i64) -> Vec<i64> {
    find(nodes, id)
        .map(|node| {
            flatten(std::slice::from_ref(node))
                .into_iter()
                .map(|(_, item)| item.id())
                .collect()
        })
        .unwrap_or_default()
}

/// Preorder walk with depth (roots are depth 0)
pub fn flatten<T>(nodes: &[TreeNode<T>]) -> Vec<(usize, &T)> {
    fn walk<'a, T>(nodes: &'a [TreeNode<T>], depth: usize, out: &mut Vec<(usize, &'a T)>) {
        for node in nodes {
            out.push((depth, &node.item));
            walk(&node.children, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(nodes, 0, &mut out);
    out
}

/// Root → `id` chain over flat rows. Stops at a missing parent or a repeated id.
pub fn breadcrumb<T: TreeItem>(rows: &[T], id: i64) -> Vec<&T> {
    let by_id: HashMap<i64, &T> = rows.iter().map(|r| (r.id(), r)).collect();
    let mut seen = HashSet::new();
    let mut chain = Vec::new();
    let mut cursor = by_id.get(&id).copied();

    while let Some(row) = cursor {
        if !seen.insert(row.id()) {
            break;
        }
        chain.push(row);
        cursor = row.parent_id().and_then(|pid| by_id.get(&pid).copied());
    }

    chain.reverse();
    chain
}

/// Drop nodes failing `keep`, together with their subtrees
pub fn prune<T>(nodes: Vec<TreeNode<T>>, keep: &impl Fn(&T) -> bool) -> Vec<TreeNode<T>> {
    nodes
        .into_iter()
        .filter(|node| keep(&node.item))
        .map(|node| TreeNode {
            item: node.item,
            children: prune(node.children, keep),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParentError {
    #[error("parent {0} does not exist")]
    Missing(i64),
    #[error("item {id} cannot be moved below itself (parent {parent_id})")]
    Cycle { id: i64, parent_id: i64 },
}

/// Check that `parent_id` is a valid parent for `id` (`None` for a new row):
/// it must be among `rows` and must not be `id` or one of its descendants.
pub fn check_parent<T: TreeItem>(rows: Vec<T>, id: Option<i64>, parent_id: i64) -> Result<(), ParentError> {
    if !rows.iter().any(|r| r.id() == parent_id) {
        return Err(ParentError::Missing(parent_id));
    }
    if let Some(id) = id
        && (id == parent_id || descendant_ids(&build_tree(rows), id).contains(&parent_id))
    {
        return Err(ParentError::Cycle { id, parent_id });
    }
    Ok(())
}

// ── TreeItem impls ──

impl TreeItem for Category {
    fn id(&self) -> i64 {
        self.id
    }
    fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }
    fn sort_order(&self) -> i32 {
        self.sort_order
    }
}

impl TreeItem for LocalizedCategory {
    fn id(&self) -> i64 {
        self.id
    }
    fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }
    fn sort_order(&self) -> i32 {
        self.sort_order
    }
}

impl TreeItem for NavigationItem {
    fn id(&self) -> i64 {
        self.id
    }
    fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }
    fn sort_order(&self) -> i32 {
        self.sort_order
    }
}

impl TreeItem for LocalizedNavItem {
    fn id(&self) -> i64 {
        self.id
    }
    fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }
    fn sort_order(&self) -> i32 {
        self.sort_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        parent: Option<i64>,
        order: i32,
    }

    impl TreeItem for Row {
        fn id(&self) -> i64 {
            self.id
        }
        fn parent_id(&self) -> Option<i64> {
            self.parent
        }
        fn sort_order(&self) -> i32 {
            self.order
        }
    }

    fn row(id: i64, parent: Option<i64>, order: i32) -> Row {
        Row { id, parent, order }
    }

    fn ids<T: TreeItem>(nodes: &[TreeNode<T>]) -> Vec<i64> {
        nodes.iter().map(|n| n.item.id()).collect()
    }

    #[test]
    fn test_build_groups_and_sorts() {
        let tree = build_tree(vec![
            row(1, None, 2),
            row(2, None, 1),
            row(3, Some(1), 5),
            row(4, Some(1), 0),
            row(5, Some(4), 0),
        ]);

        assert_eq!(ids(&tree), vec![2, 1]);
        let one = &tree[1];
        assert_eq!(ids(&one.children), vec![4, 3]);
        assert_eq!(ids(&one.children[0].children), vec![5]);
        assert_eq!(flatten(std::slice::from_ref(one)).len(), 4);
    }

    #[test]
    fn test_equal_sort_order_falls_back_to_id() {
        let tree = build_tree(vec![row(9, None, 0), row(3, None, 0), row(5, None, 0)]);
        assert_eq!(ids(&tree), vec![3, 5, 9]);
    }

    #[test]
    fn test_orphan_becomes_root() {
        let tree = build_tree(vec![row(1, None, 0), row(2, Some(404), 0)]);
        assert_eq!(ids(&tree), vec![1, 2]);
    }

    #[test]
    fn test_cycle_members_are_dropped() {
        let tree = build_tree(vec![
            row(1, None, 0),
            row(2, Some(3), 0),
            row(3, Some(2), 0),
            row(4, Some(4), 0),
            row(5, Some(1), 0),
        ]);
        assert_eq!(ids(&tree), vec![1]);
        assert_eq!(ids(&tree[0].children), vec![5]);
        assert_eq!(flatten(&tree).len(), 2);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let tree = build_tree(vec![row(1, None, 0), row(1, None, 7)]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].item.order, 0);
    }

    #[test]
    fn test_empty_input() {
        let tree: Vec<TreeNode<Row>> = build_tree(vec![]);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_descendant_ids_and_find() {
        let tree = build_tree(vec![
            row(1, None, 0),
            row(2, Some(1), 0),
            row(3, Some(2), 0),
            row(4, None, 1),
        ]);
        assert_eq!(descendant_ids(&tree, 1), vec![1, 2, 3]);
        assert_eq!(descendant_ids(&tree, 3), vec![3]);
        assert!(descendant_ids(&tree, 99).is_empty());
        assert_eq!(find(&tree, 3).map(|n| n.item.id), Some(3));
    }

    #[test]
    fn test_flatten_depths() {
        let tree = build_tree(vec![row(1, None, 0), row(2, Some(1), 0), row(3, None, 1)]);
        let flat: Vec<(usize, i64)> = flatten(&tree).into_iter().map(|(d, r)| (d, r.id)).collect();
        assert_eq!(flat, vec![(0, 1), (1, 2), (0, 3)]);
    }

    #[test]
    fn test_breadcrumb() {
        let rows = vec![row(1, None, 0), row(2, Some(1), 0), row(3, Some(2), 0)];
        let chain: Vec<i64> = breadcrumb(&rows, 3).iter().map(|r| r.id).collect();
        assert_eq!(chain, vec![1, 2, 3]);
        assert!(breadcrumb(&rows, 42).is_empty());
    }

    #[test]
    fn test_breadcrumb_is_cycle_safe() {
        let rows = vec![row(1, Some(2), 0), row(2, Some(1), 0)];
        let chain: Vec<i64> = breadcrumb(&rows, 1).iter().map(|r| r.id).collect();
        assert_eq!(chain, vec![2, 1]);
    }

    #[test]
    fn test_prune_removes_subtree() {
        let tree = build_tree(vec![
            row(1, None, 0),
            row(2, Some(1), 0),
            row(3, Some(2), 0),
            row(4, Some(1), 1),
        ]);
        let pruned = prune(tree, &|r: &Row| r.id != 2);
        assert_eq!(flatten(&pruned).into_iter().map(|(_, r)| r.id).collect::<Vec<_>>(), vec![1, 4]);
    }

    #[test]
    fn test_check_parent() {
        let rows = || vec![row(1, None, 0), row(2, Some(1), 0), row(3, Some(2), 0), row(4, None, 1)];

        assert_eq!(check_parent(rows(), None, 3), Ok(()));
        assert_eq!(check_parent(rows(), Some(2), 4), Ok(()));
        assert_eq!(check_parent(rows(), None, 99), Err(ParentError::Missing(99)));
        assert_eq!(
            check_parent(rows(), Some(2), 2),
            Err(ParentError::Cycle { id: 2, parent_id: 2 })
        );
        assert_eq!(
            check_parent(rows(), Some(1), 3),
            Err(ParentError::Cycle { id: 1, parent_id: 3 })
        );
        // moving a node up under its grandparent is fine
        assert_eq!(check_parent(rows(), Some(3), 1), Ok(()));
    }

    #[test]
    fn test_map_keeps_shape() {
        let tree = build_tree(vec![row(1, None, 0), row(2, Some(1), 0)]);
        let mapped: Vec<TreeNode<i64>> = tree.into_iter().map(|n| n.map(&|r: Row| r.id * 10)).collect();
        assert_eq!(mapped[0].item, 10);
        assert_eq!(mapped[0].children[0].item, 20);
    }
}
