use std::collections::VecDeque;

use crate::tree::{bst_side, HighlightType, IdAllocator, NodeId, Side, Tree};

use super::{highlighted, ids, TreeOperation, TreeStep};

/// Insert `values` one by one into an empty BST.
pub fn bst_insert(values: &[i64]) -> BstInsertSteps {
    BstInsertSteps::new(Tree::new(), IdAllocator::new(), values)
}

/// Insert `values` into a copy of `tree`; new ids continue after the tree's.
pub fn bst_insert_into(tree: &Tree, values: &[i64]) -> BstInsertSteps {
    BstInsertSteps::new(tree.clone(), IdAllocator::after(tree), values)
}

/// Where the insertion of the current value stands.
#[derive(Debug, Clone, Copy)]
enum Descent {
    /// Compare `value` against the node at `index` next.
    At { value: i64, index: usize },
    /// Comparisons are done; `value` goes into the empty `side` slot.
    Attach { value: i64, parent: usize, side: Side },
}

/// Step generator for repeated BST insertion.
///
/// Yields one `Compare` step per node on each descent and one `Insert` step
/// per value, then a final `Complete` step whose `output` is the in-order
/// sequence of the finished tree.
#[derive(Debug, Clone)]
pub struct BstInsertSteps {
    tree: Tree,
    ids: IdAllocator,
    pending: VecDeque<i64>,
    descent: Option<Descent>,
    path: Vec<usize>,
    inserted: Vec<NodeId>,
    comparisons: usize,
    finished: bool,
}

impl BstInsertSteps {
    fn new(tree: Tree, ids: IdAllocator, values: &[i64]) -> Self {
        tracing::debug!(
            existing = tree.len(),
            values = values.len(),
            "starting bst insertion"
        );
        Self {
            tree,
            ids,
            pending: values.iter().copied().collect(),
            descent: None,
            path: Vec::new(),
            inserted: Vec::new(),
            comparisons: 0,
            finished: false,
        }
    }

    fn step(
        &self,
        operation: TreeOperation,
        current: Option<usize>,
        highlight: HighlightType,
        description: String,
    ) -> TreeStep {
        let trail = self
            .path
            .iter()
            .map(|&index| (index, HighlightType::Path))
            .chain(current.map(|index| (index, highlight)));
        TreeStep {
            tree: highlighted(&self.tree, trail),
            current: current.map(|index| self.tree.id_at(index)),
            visited: self.inserted.clone(),
            path: ids(&self.tree, &self.path),
            output: Vec::new(),
            operation,
            description,
            comparisons: self.comparisons,
            is_complete: false,
        }
    }

    fn insert_root(&mut self, value: i64) -> TreeStep {
        let id = self.ids.allocate();
        let index = self.tree.insert_root(value, id);
        self.inserted.push(id);
        self.path = vec![index];
        self.step(
            TreeOperation::Insert,
            Some(index),
            HighlightType::Inserting,
            format!("The tree is empty, so {value} becomes the root"),
        )
    }

    fn compare(&mut self, value: i64, index: usize) -> TreeStep {
        self.comparisons += 1;
        let node_value = self.tree.value_at(index);
        let side = bst_side(value, node_value);
        self.descent = Some(match self.tree.node(index).and_then(|node| node.child(side)) {
            Some(child) => Descent::At {
                value,
                index: child,
            },
            None => Descent::Attach {
                value,
                parent: index,
                side,
            },
        });

        let description = match side {
            Side::Left => format!("{value} < {node_value}, so go left"),
            Side::Right => format!("{value} >= {node_value}, so go right"),
        };
        self.reached = Some(index);
        self.step(
            TreeOperation::Compare,
            Some(index),
            HighlightType::Comparing,
            description,
        )
    }

    fn attach(&mut self, value: i64, parent: usize, side: Side) -> TreeStep {
        let id = self.ids.allocate();
        let parent_value = self.tree.value_at(parent);
        let index = self.tree.attach(parent, side, value, id);
        self.inserted.push(id);
        self.reached = Some(index);
        tracing::trace!(value, %id, "inserted bst node");
        self.step(
            TreeOperation::Insert,
            Some(index),
            HighlightType::Inserting,
            format!("Found an empty {side} slot under {parent_value}: insert {value}"),
        )
    }

    fn complete(&mut self) -> TreeStep {
        self.finished = true;
        self.path.clear();
        let output = self.tree.in_order_values();
        let mut step = self.step(
            TreeOperation::Complete,
            None,
            HighlightType::None,
            format!(
                "Inserted {} values; the tree holds {} nodes in sorted order",
                self.inserted.len(),
                self.tree.len()
            ),
        );
        step.output = output;
        step.is_complete = true;
        step
    }
}

impl Iterator for BstInsertSteps {
    type Item = TreeStep;

    fn next(&mut self) -> Option<TreeStep> {
        if self.finished {
            return None;
        }
        loop {
            match self.descent.take() {
                Some(Descent::At { value, index }) => return Some(self.compare(value, index)),
                Some(Descent::Attach {
                    value,
                    parent,
                    side,
                }) => return Some(self.attach(value, parent, side)),
                None => {
                    let Some(value) = self.pending.pop_front() else {
                        return Some(self.complete());
                    };
                    self.path.clear();
                    match self.tree.root() {
                        None => return Some(self.insert_root(value)),
                        Some(root) => self.descent = Some(Descent::At { value, index: root }),
                    }
                }
            }
        }
    }
}

/// Search a copy of `tree` for `target`.
pub fn bst_search(tree: &Tree, target: i64) -> BstSearchSteps {
    BstSearchSteps::new(tree, target)
}

/// Step generator for BST lookup.
///
/// Yields one `Compare` step per node on the search path, then either a
/// `Found` or a `NotFound` terminal step.
#[derive(Debug, Clone)]
pub struct BstSearchSteps {
    tree: Tree,
    target: i64,
    cursor: Option<usize>,
    found: Option<usize>,
    /// Deepest node compared so far; the search path is its ancestry.
    reached: Option<usize>,
    comparisons: usize,
    finished: bool,
}

impl BstSearchSteps {
    fn new(tree: &Tree, target: i64) -> Self {
        tracing::debug!(nodes = tree.len(), target, "starting bst search");
        Self {
            tree: tree.clone(),
            target,
            cursor: tree.root(),
            found: None,
            reached: None,
            comparisons: 0,
            finished: false,
        }
    }

    fn step(
        &self,
        operation: TreeOperation,
        current: Option<usize>,
        highlight: HighlightType,
        description: String,
    ) -> TreeStep {
        let walked = self
            .reached
            .map(|index| self.tree.ancestor_indices(index))
            .unwrap_or_default();
        let trail = walked
            .iter()
            .map(|&index| (index, HighlightType::Path))
            .chain(current.map(|index| (index, highlight)));
        let path = ids(&self.tree, &walked);
        TreeStep {
            tree: highlighted(&self.tree, trail),
            current: current.map(|index| self.tree.id_at(index)),
            visited: path.clone(),
            path,
            output: Vec::new(),
            operation,
            description,
            comparisons: self.comparisons,
            is_complete: false,
        }
    }
}

impl Iterator for BstSearchSteps {
    type Item = TreeStep;

    fn next(&mut self) -> Option<TreeStep> {
        if self.finished {
            return None;
        }
        let target = self.target;

        if let Some(index) = self.found {
            self.finished = true;
            let mut step = self.step(
                TreeOperation::Found,
                Some(index),
                HighlightType::Current,
                format!("Found {target} after {} comparisons", self.comparisons),
            );
            step.output = vec![target];
            step.is_complete = true;
            return Some(step);
        }

        let Some(index) = self.cursor else {
            self.finished = true;
            let description = if self.tree.is_empty() {
                format!("The tree is empty, so {target} is not present")
            } else {
                format!("Fell off the tree: {target} is not present")
            };
            let mut step = self.step(
                TreeOperation::NotFound,
                None,
                HighlightType::None,
                description,
            );
            step.is_complete = true;
            return Some(step);
        };

        self.comparisons += 1;
        self.reached = Some(index);
        let node_value = self.tree.value_at(index);
        let description = if target == node_value {
            self.found = Some(index);
            format!("{target} == {node_value}: match")
        } else {
            let side = bst_side(target, node_value);
            self.cursor = self.tree.node(index).and_then(|node| node.child(side));
            match side {
                Side::Left => format!("{target} < {node_value}, so search left"),
                Side::Right => format!("{target} > {node_value}, so search right"),
            }
        };
        Some(self.step(
            TreeOperation::Compare,
            Some(index),
            HighlightType::Comparing,
            description,
        ))
    }
}
