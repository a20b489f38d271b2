//! Tree and heap step generators.
//!
//! This module provides:
//! - [`bst_insert`] / [`bst_insert_into`] and [`bst_search`] over a BST
//! - [`in_order`], [`pre_order`], [`post_order`] and [`level_order`] traversals
//! - [`build_heap`] and [`heap_sort`] over an array-backed max heap
//!
//! Each generator owns a private copy of its tree or array and yields
//! snapshots. Highlights exist only on the snapshot handed out with a step,
//! so the next step always starts from a clean slate. Empty input produces a
//! single terminal step.

mod bst;
mod heap;
mod traversal;

pub use bst::{bst_insert, bst_insert_into, bst_search, BstInsertSteps, BstSearchSteps};
pub use heap::{build_heap, heap_sort, is_max_heap, HeapSteps};
pub use traversal::{
    in_order, level_order, post_order, pre_order, traverse, DepthFirstSteps, LevelOrderSteps,
    TraversalOrder,
};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{suggest_names, Error, Result};
use crate::tree::{HighlightType, NodeId, Tree};

/// Tree algorithms that can be visualised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TreeAlgorithm {
    BstInsert,
    BstSearch,
    InOrder,
    PreOrder,
    PostOrder,
    LevelOrder,
    BuildHeap,
    HeapSort,
}

impl TreeAlgorithm {
    pub const ALL: [TreeAlgorithm; 8] = [
        TreeAlgorithm::BstInsert,
        TreeAlgorithm::BstSearch,
        TreeAlgorithm::InOrder,
        TreeAlgorithm::PreOrder,
        TreeAlgorithm::PostOrder,
        TreeAlgorithm::LevelOrder,
        TreeAlgorithm::BuildHeap,
        TreeAlgorithm::HeapSort,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TreeAlgorithm::BstInsert => "bst-insert",
            TreeAlgorithm::BstSearch => "bst-search",
            TreeAlgorithm::InOrder => "in-order",
            TreeAlgorithm::PreOrder => "pre-order",
            TreeAlgorithm::PostOrder => "post-order",
            TreeAlgorithm::LevelOrder => "level-order",
            TreeAlgorithm::BuildHeap => "build-heap",
            TreeAlgorithm::HeapSort => "heap-sort",
        }
    }

    /// Heap algorithms yield [`HeapStep`]s; the rest yield [`TreeStep`]s.
    pub fn is_heap(self) -> bool {
        matches!(self, TreeAlgorithm::BuildHeap | TreeAlgorithm::HeapSort)
    }
}

impl fmt::Display for TreeAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TreeAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == normalized)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|a| a.name()).collect();
                Error::UnknownAlgorithm {
                    name: s.to_string(),
                    suggestions: suggest_names(&normalized, &names, 3),
                }
            })
    }
}

/// Kind of event recorded by a [`TreeStep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeOperation {
    Insert,
    Compare,
    Found,
    NotFound,
    TraverseLeft,
    Visit,
    Complete,
}

/// One discrete event in a BST or traversal run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeStep {
    /// Tree snapshot carrying this step's highlights.
    pub tree: Tree,
    pub current: Option<NodeId>,
    pub visited: Vec<NodeId>,
    /// Search path or call stack; the queue for level-order traversal.
    pub path: Vec<NodeId>,
    /// Values emitted so far (traversal order, or the final in-order
    /// sequence after BST insertion).
    pub output: Vec<i64>,
    pub operation: TreeOperation,
    pub description: String,
    pub comparisons: usize,
    pub is_complete: bool,
}

/// Kind of event recorded by a [`HeapStep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeapOperation {
    Compare,
    Swap,
    Swapped,
    Complete,
}

/// One discrete event in a heap build or heap sort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeapStep {
    /// Level-order tree view of `array`; node ids follow array slots.
    pub tree: Tree,
    pub array: Vec<i64>,
    pub highlighted: Vec<usize>,
    /// Slots being exchanged; set on the two steps around a swap.
    pub swap: Option<(usize, usize)>,
    /// Slots `heap_size..` hold the sorted suffix during heap sort.
    pub heap_size: usize,
    pub operation: HeapOperation,
    pub description: String,
    pub comparisons: usize,
    pub swaps: usize,
    pub is_complete: bool,
}

/// Clone `tree` and apply `marks` in order; later marks win.
fn highlighted(tree: &Tree, marks: impl IntoIterator<Item = (usize, HighlightType)>) -> Tree {
    let mut snapshot = tree.clone();
    snapshot.clear_highlights();
    for (index, highlight) in marks {
        snapshot.set_highlight(index, highlight);
    }
    snapshot
}

fn ids(tree: &Tree, indices: &[usize]) -> Vec<NodeId> {
    indices.iter().map(|&index| tree.id_at(index)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_algorithm_names_round_trip() {
        for algorithm in TreeAlgorithm::ALL {
            assert_eq!(algorithm.name().parse::<TreeAlgorithm>().unwrap(), algorithm);
        }
        assert_eq!(
            "heap_sort".parse::<TreeAlgorithm>().unwrap(),
            TreeAlgorithm::HeapSort
        );
    }

    #[test]
    fn unknown_tree_algorithm_suggests() {
        let error = "in-ordr".parse::<TreeAlgorithm>().expect_err("unknown");
        assert!(error.to_string().contains("in-order"));
    }

    #[test]
    fn only_heap_algorithms_are_heap() {
        let heaps: Vec<_> = TreeAlgorithm::ALL
            .into_iter()
            .filter(|a| a.is_heap())
            .collect();
        assert_eq!(heaps, vec![TreeAlgorithm::BuildHeap, TreeAlgorithm::HeapSort]);
    }

    #[test]
    fn highlighted_snapshot_leaves_source_clean() {
        let tree = Tree::from_bst_values(&[2, 1], &mut crate::tree::IdAllocator::new());
        let snapshot = highlighted(&tree, [(0, HighlightType::Path), (0, HighlightType::Current)]);
        assert_eq!(snapshot.node(0).unwrap().highlight, HighlightType::Current);
        assert_eq!(tree.node(0).unwrap().highlight, HighlightType::None);
    }
}
