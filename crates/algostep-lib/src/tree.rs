//! Arena-backed binary tree used by the BST and heap visualizations.
//!
//! Nodes live in a `Vec` and refer to each other by arena index. Child links
//! are exclusive (each node has at most one parent); parent links are plain
//! indices used for lookups only. Cloning a [`Tree`] therefore deep-copies
//! the whole structure with every link still valid in the copy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Session-unique node identity, stable across snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id source owned by a single visualization session.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator that continues after the ids already used by `tree`.
    pub fn after(tree: &Tree) -> Self {
        let next = tree
            .nodes
            .iter()
            .map(|node| node.id.0 + 1)
            .max()
            .unwrap_or(0);
        Self { next }
    }

    pub fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// Visual state of a node in a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightType {
    #[default]
    None,
    Current,
    Comparing,
    Path,
    Visited,
    Inserting,
    Rotating,
}

/// Which child slot of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Left => "left",
            Side::Right => "right",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub value: i64,
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub parent: Option<usize>,
    /// Current drawing position; a renderer eases it toward the target.
    pub x: f32,
    pub y: f32,
    /// Position assigned by the last layout pass.
    pub target_x: f32,
    pub target_y: f32,
    pub depth: usize,
    pub highlight: HighlightType,
}

impl TreeNode {
    pub fn child(&self, side: Side) -> Option<usize> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Spacing used by [`Tree::layout`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub horizontal_spacing: f32,
    pub vertical_spacing: f32,
    pub origin_x: f32,
    pub origin_y: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_spacing: 48.0,
            vertical_spacing: 64.0,
            origin_x: 24.0,
            origin_y: 32.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tree {
    nodes: Vec<TreeNode>,
    root: Option<usize>,
    #[serde(skip)]
    layout: LayoutConfig,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: LayoutConfig) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Build a BST from `values` without recording any steps.
    pub fn from_bst_values(values: &[i64], ids: &mut IdAllocator) -> Self {
        let mut tree = Self::new();
        for &value in values {
            let mut cursor = tree.root;
            let mut slot = None;
            while let Some(index) = cursor {
                let side = bst_side(value, tree.nodes[index].value);
                slot = Some((index, side));
                cursor = tree.nodes[index].child(side);
            }
            match slot {
                None => {
                    tree.insert_root(value, ids.allocate());
                }
                Some((parent, side)) => {
                    tree.attach(parent, side, value, ids.allocate());
                }
            }
        }
        tree
    }

    /// Complete binary tree over `values`: slot `i` has children `2i + 1`
    /// and `2i + 2`, and arena index `i` is array index `i`.
    pub fn from_level_order(values: &[i64], ids: &[NodeId]) -> Self {
        debug_assert_eq!(values.len(), ids.len());
        let len = values.len();
        let nodes = values
            .iter()
            .zip(ids)
            .enumerate()
            .map(|(index, (&value, &id))| TreeNode {
                id,
                value,
                left: Some(2 * index + 1).filter(|&child| child < len),
                right: Some(2 * index + 2).filter(|&child| child < len),
                parent: index.checked_sub(1).map(|p| p / 2),
                x: 0.0,
                y: 0.0,
                target_x: 0.0,
                target_y: 0.0,
                depth: 0,
                highlight: HighlightType::None,
            })
            .collect();
        let mut tree = Self {
            nodes,
            root: (len > 0).then_some(0),
            layout: LayoutConfig::default(),
        };
        tree.layout();
        for node in &mut tree.nodes {
            node.x = node.target_x;
            node.y = node.target_y;
        }
        tree
    }

    pub fn root(&self) -> Option<usize> {
        self.root
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<&TreeNode> {
        self.index_of(id).and_then(|index| self.nodes.get(index))
    }

    pub(crate) fn id_at(&self, index: usize) -> NodeId {
        self.nodes[index].id
    }

    pub(crate) fn value_at(&self, index: usize) -> i64 {
        self.nodes[index].value
    }

    /// Ids from the root down to `index`, following parent links.
    pub fn ancestry(&self, index: usize) -> Vec<NodeId> {
        self.ancestor_indices(index)
            .into_iter()
            .map(|index| self.nodes[index].id)
            .collect()
    }

    /// Arena indices from the root down to `index`.
    pub(crate) fn ancestor_indices(&self, index: usize) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut cursor = Some(index);
        while let Some(current) = cursor {
            chain.push(current);
            cursor = self.nodes[current].parent;
        }
        chain.reverse();
        chain
    }

    pub(crate) fn insert_root(&mut self, value: i64, id: NodeId) -> usize {
        debug_assert!(self.root.is_none(), "tree already has a root");
        let index = self.push_node(value, id, None);
        self.root = Some(index);
        self.layout();
        let node = &mut self.nodes[index];
        node.x = node.target_x;
        node.y = node.target_y;
        index
    }

    /// Hang a new node in the empty `side` slot of `parent`.
    pub(crate) fn attach(&mut self, parent: usize, side: Side, value: i64, id: NodeId) -> usize {
        debug_assert!(self.nodes[parent].child(side).is_none(), "slot is occupied");
        let index = self.push_node(value, id, Some(parent));
        match side {
            Side::Left => self.nodes[parent].left = Some(index),
            Side::Right => self.nodes[parent].right = Some(index),
        }
        let (x, y) = (self.nodes[parent].x, self.nodes[parent].y);
        let node = &mut self.nodes[index];
        node.x = x;
        node.y = y;
        self.layout();
        index
    }

    fn push_node(&mut self, value: i64, id: NodeId, parent: Option<usize>) -> usize {
        self.nodes.push(TreeNode {
            id,
            value,
            left: None,
            right: None,
            parent,
            x: 0.0,
            y: 0.0,
            target_x: 0.0,
            target_y: 0.0,
            depth: 0,
            highlight: HighlightType::None,
        });
        self.nodes.len() - 1
    }

    pub(crate) fn clear_highlights(&mut self) {
        for node in &mut self.nodes {
            node.highlight = HighlightType::None;
        }
    }

    pub(crate) fn set_highlight(&mut self, index: usize, highlight: HighlightType) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.highlight = highlight;
        }
    }

    /// Recompute `depth` and write layout targets: x from in-order rank,
    /// y from depth.
    pub fn layout(&mut self) {
        let config = self.layout;
        let order = self.in_order_indices();
        for (rank, &index) in order.iter().enumerate() {
            self.nodes[index].target_x = config.origin_x + rank as f32 * config.horizontal_spacing;
        }

        let mut stack: Vec<(usize, usize)> = self.root.map(|root| (root, 0)).into_iter().collect();
        while let Some((index, depth)) = stack.pop() {
            let node = &mut self.nodes[index];
            node.depth = depth;
            node.target_y = config.origin_y + depth as f32 * config.vertical_spacing;
            if let Some(right) = node.right {
                stack.push((right, depth + 1));
            }
            if let Some(left) = node.left {
                stack.push((left, depth + 1));
            }
        }
    }

    /// Arena indices in in-order sequence.
    pub fn in_order_indices(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut cursor = self.root;
        while cursor.is_some() || !stack.is_empty() {
            while let Some(index) = cursor {
                stack.push(index);
                cursor = self.nodes[index].left;
            }
            if let Some(index) = stack.pop() {
                order.push(index);
                cursor = self.nodes[index].right;
            }
        }
        order
    }

    pub fn in_order_values(&self) -> Vec<i64> {
        self.in_order_indices()
            .into_iter()
            .map(|index| self.nodes[index].value)
            .collect()
    }

    /// Number of levels; 0 for an empty tree.
    pub fn height(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| node.depth + 1)
            .max()
            .unwrap_or(0)
    }

    /// Left subtrees strictly smaller, right subtrees greater or equal.
    pub fn is_valid_bst(&self) -> bool {
        let mut stack: Vec<(usize, Option<i64>, Option<i64>)> =
            self.root.map(|root| (root, None, None)).into_iter().collect();
        while let Some((index, low, high)) = stack.pop() {
            let node = &self.nodes[index];
            let below = low.is_some_and(|low| node.value < low);
            let above = high.is_some_and(|high| node.value >= high);
            if below || above {
                return false;
            }
            if let Some(left) = node.left {
                stack.push((left, low, Some(node.value)));
            }
            if let Some(right) = node.right {
                stack.push((right, Some(node.value), high));
            }
        }
        true
    }
}

/// BST comparator: strictly smaller goes left, everything else right.
pub(crate) fn bst_side(value: i64, node_value: i64) -> Side {
    if value < node_value {
        Side::Left
    } else {
        Side::Right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_is_monotonic_and_resumable() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate(), NodeId(0));
        assert_eq!(ids.allocate(), NodeId(1));

        let tree = Tree::from_bst_values(&[3, 1], &mut IdAllocator::new());
        assert_eq!(IdAllocator::after(&tree).allocate(), NodeId(2));
    }

    #[test]
    fn bst_construction_keeps_invariant_and_duplicates_go_right() {
        let tree = Tree::from_bst_values(&[5, 3, 8, 5, 1], &mut IdAllocator::new());
        assert!(tree.is_valid_bst());
        assert_eq!(tree.in_order_values(), vec![1, 3, 5, 5, 8]);

        let root = tree.node(tree.root().unwrap()).unwrap();
        let right = tree.node(root.right.unwrap()).unwrap();
        let duplicate = tree.node(right.left.unwrap()).unwrap();
        assert_eq!(duplicate.value, 5);
    }

    #[test]
    fn layout_assigns_depth_and_in_order_columns() {
        let tree = Tree::from_bst_values(&[2, 1, 3], &mut IdAllocator::new());
        let config = LayoutConfig::default();
        let by_value = |value: i64| tree.nodes().iter().find(|n| n.value == value).unwrap();

        assert_eq!(by_value(2).depth, 0);
        assert_eq!(by_value(1).depth, 1);
        assert!(by_value(1).target_x < by_value(2).target_x);
        assert!(by_value(2).target_x < by_value(3).target_x);
        assert_eq!(by_value(3).target_y, config.origin_y + config.vertical_spacing);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn new_nodes_start_at_parent_position() {
        let mut tree = Tree::new();
        let mut ids = IdAllocator::new();
        let root = tree.insert_root(10, ids.allocate());
        let child = tree.attach(root, Side::Left, 4, ids.allocate());

        let parent = tree.node(root).unwrap();
        let node = tree.node(child).unwrap();
        assert_eq!((node.x, node.y), (parent.x, parent.y));
        assert_eq!(node.parent, Some(root));
        assert_eq!(tree.ancestry(child), vec![parent.id, node.id]);
    }

    #[test]
    fn level_order_tree_matches_array_shape() {
        let ids: Vec<NodeId> = (0..5).map(NodeId).collect();
        let tree = Tree::from_level_order(&[9, 7, 8, 1, 2], &ids);

        let root = tree.node(0).unwrap();
        assert_eq!((root.left, root.right), (Some(1), Some(2)));
        assert_eq!(tree.node(1).unwrap().right, Some(4));
        assert_eq!(tree.node(4).unwrap().parent, Some(1));
        assert_eq!(tree.node(2).unwrap().left, None);
        assert_eq!(tree.height(), 3);
    }

    #[test]
    fn clone_is_independent() {
        let mut tree = Tree::from_bst_values(&[2, 1], &mut IdAllocator::new());
        let snapshot = tree.clone();
        tree.set_highlight(0, HighlightType::Current);

        assert_eq!(snapshot.node(0).unwrap().highlight, HighlightType::None);
        assert_eq!(tree.node(0).unwrap().highlight, HighlightType::Current);
    }

    #[test]
    fn empty_tree_is_trivially_valid() {
        let tree = Tree::new();
        assert!(tree.is_valid_bst());
        assert!(tree.in_order_values().is_empty());
        assert_eq!(tree.height(), 0);
    }
}
