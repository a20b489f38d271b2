//! algostep library entry points.
//!
//! This crate decomposes classic algorithms into replayable step sequences:
//! grid pathfinding (BFS, DFS, Dijkstra, A*), BST insertion and search, tree
//! traversals, and heap build/sort. Every generator is a plain [`Iterator`]
//! that owns a private copy of its input and yields self-contained
//! snapshots, so consumers (renderers, the CLI, the challenge checker) can
//! pause, rewind or compare runs without worrying about shared state.
//!

pub mod challenge;
pub mod error;
pub mod grid;
pub mod output;
pub mod pathfinding;
pub mod tree;
pub mod tree_steps;

pub use challenge::{
    check_constraints, evaluate_run, load_challenge, star_rating, AlgorithmId, Challenge,
    ChallengeOutcome, Constraint, ConstraintReport,
};
pub use error::{Error, Result};
pub use grid::{create_grid, manhattan_distance, reconstruct_path, Coord, Grid, GridCell};
pub use output::{RenderMode, RunSummary, TreeRunSummary};
pub use pathfinding::{
    a_star, bfs, dfs, dijkstra, select_generator, FrontierEntry, PathAlgorithm,
    PathfindingGenerator, PathfindingStep, StepOutcome,
};
pub use tree::{HighlightType, IdAllocator, LayoutConfig, NodeId, Tree, TreeNode};
pub use tree_steps::{
    bst_insert, bst_insert_into, bst_search, build_heap, heap_sort, in_order, is_max_heap,
    level_order, post_order, pre_order, HeapOperation, HeapStep, TreeAlgorithm, TreeOperation,
    TreeStep,
};

#[cfg(test)]
pub(crate) mod test_helpers;
