use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

use crate::tree::{HighlightType, Tree};

use super::{highlighted, ids, TreeOperation, TreeStep};

/// Depth-first visiting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalOrder {
    InOrder,
    PreOrder,
    PostOrder,
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TraversalOrder::InOrder => "in-order",
            TraversalOrder::PreOrder => "pre-order",
            TraversalOrder::PostOrder => "post-order",
        })
    }
}

pub fn in_order(tree: &Tree) -> DepthFirstSteps {
    traverse(tree, TraversalOrder::InOrder)
}

pub fn pre_order(tree: &Tree) -> DepthFirstSteps {
    traverse(tree, TraversalOrder::PreOrder)
}

pub fn post_order(tree: &Tree) -> DepthFirstSteps {
    traverse(tree, TraversalOrder::PostOrder)
}

/// Depth-first traversal of a copy of `tree` in the given order.
pub fn traverse(tree: &Tree, order: TraversalOrder) -> DepthFirstSteps {
    DepthFirstSteps::new(tree, order)
}

/// Pending work of the emulated recursion.
#[derive(Debug, Clone, Copy)]
enum Frame {
    /// Call on a node: push it onto the call stack.
    Enter(usize),
    /// Emit the node's value.
    Process(usize),
    /// Return from the node: pop it off the call stack.
    Leave(usize),
}

/// Step generator for recursive traversals, driven by an explicit frame
/// stack instead of the call stack.
///
/// In-order yields a `TraverseLeft` step when a node is entered and a
/// `Visit` step when it is processed; pre- and post-order yield one `Visit`
/// per node. `path` is the call stack at each step.
#[derive(Debug, Clone)]
pub struct DepthFirstSteps {
    tree: Tree,
    order: TraversalOrder,
    frames: Vec<Frame>,
    call_stack: Vec<usize>,
    visited: Vec<usize>,
    output: Vec<i64>,
    finished: bool,
}

impl DepthFirstSteps {
    fn new(tree: &Tree, order: TraversalOrder) -> Self {
        tracing::debug!(%order, nodes = tree.len(), "starting traversal");
        Self {
            tree: tree.clone(),
            order,
            frames: tree.root().map(Frame::Enter).into_iter().collect(),
            call_stack: Vec::new(),
            visited: Vec::new(),
            output: Vec::new(),
            finished: false,
        }
    }

    fn push_child(&mut self, child: Option<usize>) {
        if let Some(child) = child {
            self.frames.push(Frame::Enter(child));
        }
    }

    fn step(&self, operation: TreeOperation, current: usize, description: String) -> TreeStep {
        let marks = self
            .visited
            .iter()
            .map(|&index| (index, HighlightType::Visited))
            .chain(self.call_stack.iter().map(|&index| (index, HighlightType::Path)))
            .chain(std::iter::once((current, HighlightType::Current)));
        TreeStep {
            tree: highlighted(&self.tree, marks),
            current: Some(self.tree.id_at(current)),
            visited: ids(&self.tree, &self.visited),
            path: ids(&self.tree, &self.call_stack),
            output: self.output.clone(),
            operation,
            description,
            comparisons: 0,
            is_complete: false,
        }
    }

    fn visit(&mut self, index: usize) -> TreeStep {
        let value = self.tree.value_at(index);
        self.visited.push(index);
        self.output.push(value);
        self.step(
            TreeOperation::Visit,
            index,
            format!("Visit {value} ({} order): output is now {:?}", self.order, self.output),
        )
    }

    fn complete(&mut self) -> TreeStep {
        self.finished = true;
        let marks = self
            .visited
            .iter()
            .map(|&index| (index, HighlightType::Visited));
        let description = if self.tree.is_empty() {
            "The tree is empty: nothing to traverse".to_string()
        } else {
            format!("{} traversal complete: {:?}", self.order, self.output)
        };
        TreeStep {
            tree: highlighted(&self.tree, marks),
            current: None,
            visited: ids(&self.tree, &self.visited),
            path: Vec::new(),
            output: self.output.clone(),
            operation: TreeOperation::Complete,
            description,
            comparisons: 0,
            is_complete: true,
        }
    }
}

impl Iterator for DepthFirstSteps {
    type Item = TreeStep;

    fn next(&mut self) -> Option<TreeStep> {
        if self.finished {
            return None;
        }

        while let Some(frame) = self.frames.pop() {
            match frame {
                Frame::Enter(index) => {
                    let (left, right) = self
                        .tree
                        .node(index)
                        .map(|node| (node.left, node.right))
                        .unwrap_or_default();
                    self.call_stack.push(index);
                    self.frames.push(Frame::Leave(index));
                    match self.order {
                        TraversalOrder::PreOrder => {
                            self.push_child(right);
                            self.push_child(left);
                            return Some(self.visit(index));
                        }
                        TraversalOrder::InOrder => {
                            self.push_child(right);
                            self.frames.push(Frame::Process(index));
                            self.push_child(left);
                            let value = self.tree.value_at(index);
                            let description = if left.is_some() {
                                format!("At {value}: descend into the left subtree first")
                            } else {
                                format!("At {value}: no left subtree")
                            };
                            return Some(self.step(TreeOperation::TraverseLeft, index, description));
                        }
                        TraversalOrder::PostOrder => {
                            self.frames.push(Frame::Process(index));
                            self.push_child(right);
                            self.push_child(left);
                        }
                    }
                }
                Frame::Process(index) => return Some(self.visit(index)),
                Frame::Leave(index) => {
                    let returned = self.call_stack.pop();
                    debug_assert_eq!(returned, Some(index), "call stack out of step with frames");
                }
            }
        }

        Some(self.complete())
    }
}

/// Breadth-first (level-order) traversal of a copy of `tree`.
pub fn level_order(tree: &Tree) -> LevelOrderSteps {
    LevelOrderSteps::new(tree)
}

/// Step generator for level-order traversal.
///
/// One `Visit` step per dequeued node; the step's `path` holds the queue
/// contents after the node's children have been enqueued.
#[derive(Debug, Clone)]
pub struct LevelOrderSteps {
    tree: Tree,
    queue: VecDeque<usize>,
    visited: Vec<usize>,
    output: Vec<i64>,
    finished: bool,
}

impl LevelOrderSteps {
    fn new(tree: &Tree) -> Self {
        tracing::debug!(nodes = tree.len(), "starting level-order traversal");
        Self {
            tree: tree.clone(),
            queue: tree.root().into_iter().collect(),
            visited: Vec::new(),
            output: Vec::new(),
            finished: false,
        }
    }
}

impl Iterator for LevelOrderSteps {
    type Item = TreeStep;

    fn next(&mut self) -> Option<TreeStep> {
        if self.finished {
            return None;
        }

        let visited_marks = |visited: &[usize]| {
            visited
                .iter()
                .map(|&index| (index, HighlightType::Visited))
                .collect::<Vec<_>>()
        };

        let Some(index) = self.queue.pop_front() else {
            self.finished = true;
            let description = if self.tree.is_empty() {
                "The tree is empty: nothing to traverse".to_string()
            } else {
                format!("level-order traversal complete: {:?}", self.output)
            };
            return Some(TreeStep {
                tree: highlighted(&self.tree, visited_marks(&self.visited)),
                current: None,
                visited: ids(&self.tree, &self.visited),
                path: Vec::new(),
                output: self.output.clone(),
                operation: TreeOperation::Complete,
                description,
                comparisons: 0,
                is_complete: true,
            });
        };

        let (value, left, right, depth) = match self.tree.node(index) {
            Some(node) => (node.value, node.left, node.right, node.depth),
            None => return self.next(),
        };
        self.visited.push(index);
        self.output.push(value);
        self.queue.extend(left);
        self.queue.extend(right);

        let queued: Vec<usize> = self.queue.iter().copied().collect();
        let marks = visited_marks(&self.visited)
            .into_iter()
            .chain(queued.iter().map(|&queued| (queued, HighlightType::Path)))
            .chain(std::iter::once((index, HighlightType::Current)));
        Some(TreeStep {
            tree: highlighted(&self.tree, marks),
            current: Some(self.tree.id_at(index)),
            visited: ids(&self.tree, &self.visited),
            path: ids(&self.tree, &queued),
            output: self.output.clone(),
            operation: TreeOperation::Visit,
            description: format!(
                "Dequeue {value} at depth {depth}; {} nodes waiting",
                queued.len()
            ),
            comparisons: 0,
            is_complete: false,
        })
    }
}
