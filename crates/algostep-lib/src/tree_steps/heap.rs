use crate::tree::{HighlightType, NodeId, Tree};

use super::{highlighted, HeapOperation, HeapStep};

/// Turn a copy of `values` into a max heap, one heapify event at a time.
pub fn build_heap(values: &[i64]) -> HeapSteps {
    HeapSteps::new(values, Mode::Build)
}

/// Build a max heap from `values`, then repeatedly move the root behind the
/// shrinking heap until the array is sorted ascending.
pub fn heap_sort(values: &[i64]) -> HeapSteps {
    HeapSteps::new(values, Mode::Sort)
}

/// Every parent is greater than or equal to both of its children.
pub fn is_max_heap(values: &[i64]) -> bool {
    (1..values.len()).all(|child| values[(child - 1) / 2] >= values[child])
}

fn child_slots(index: usize, size: usize) -> impl Iterator<Item = usize> {
    [2 * index + 1, 2 * index + 2]
        .into_iter()
        .filter(move |&child| child < size)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Build,
    Sort,
}

#[derive(Debug, Clone, Copy)]
enum SiftStage {
    Compare,
    /// `largest` beat the parent; announce the swap.
    Decide { largest: usize },
    /// Perform the announced swap.
    Apply { largest: usize },
}

/// A heapify call in progress at `index` over the first `size` slots.
#[derive(Debug, Clone, Copy)]
struct Sift {
    index: usize,
    size: usize,
    stage: SiftStage,
}

/// Moving the root to slot `end` during heap sort.
#[derive(Debug, Clone, Copy)]
struct Extract {
    end: usize,
    applied: bool,
}

/// Step generator for heap construction and heap sort.
///
/// Heapify yields `Compare` before inspecting a node's children; when a
/// child wins it yields `Swap` (decision) and `Swapped` (after the exchange)
/// and continues at that child. At every `Compare` step each slot after the
/// one being sifted is at least as large as its children inside
/// `..heap_size`. The whole of `..heap_size` is a max heap only once the
/// build finishes and again each time an extraction's sift settles.
#[derive(Debug, Clone)]
pub struct HeapSteps {
    mode: Mode,
    heap: Vec<i64>,
    ids: Vec<NodeId>,
    heap_size: usize,
    build_next: Option<usize>,
    sift: Option<Sift>,
    extract: Option<Extract>,
    comparisons: usize,
    swaps: usize,
    finished: bool,
}

impl HeapSteps {
    fn new(values: &[i64], mode: Mode) -> Self {
        let len = values.len();
        tracing::debug!(?mode, len, "starting heap run");
        Self {
            mode,
            heap: values.to_vec(),
            ids: (0..len as u32).map(NodeId).collect(),
            heap_size: len,
            build_next: (len / 2).checked_sub(1),
            sift: None,
            extract: (mode == Mode::Sort && len > 1).then(|| Extract {
                end: len - 1,
                applied: false,
            }),
            comparisons: 0,
            swaps: 0,
            finished: false,
        }
    }

    fn step(
        &self,
        operation: HeapOperation,
        highlighted_slots: Vec<usize>,
        swap: Option<(usize, usize)>,
        description: String,
    ) -> HeapStep {
        let view = Tree::from_level_order(&self.heap, &self.ids);
        let sorted = (self.heap_size..self.heap.len()).map(|slot| (slot, HighlightType::Visited));
        let focus = highlighted_slots
            .iter()
            .enumerate()
            .map(|(rank, &slot)| {
                let highlight = if rank == 0 {
                    HighlightType::Current
                } else {
                    HighlightType::Comparing
                };
                (slot, highlight)
            });
        let swapping = swap
            .into_iter()
            .flat_map(|(a, b)| [(a, HighlightType::Rotating), (b, HighlightType::Rotating)]);

        HeapStep {
            tree: highlighted(&view, sorted.chain(focus).chain(swapping)),
            array: self.heap.clone(),
            highlighted: highlighted_slots,
            swap,
            heap_size: self.heap_size,
            operation,
            description,
            comparisons: self.comparisons,
            swaps: self.swaps,
            is_complete: false,
        }
    }

    fn advance_sift(&mut self, sift: Sift) -> HeapStep {
        let Sift { index, size, stage } = sift;
        let parent = self.heap[index];
        match stage {
            SiftStage::Compare => {
                let children: Vec<usize> = child_slots(index, size).collect();
                let mut largest = index;
                for &child in &children {
                    self.comparisons += 1;
                    if self.heap[child] > self.heap[largest] {
                        largest = child;
                    }
                }
                let description = if children.is_empty() {
                    format!("Heapify slot {index} ({parent}): no children, nothing to sink")
                } else if largest == index {
                    format!("Heapify slot {index} ({parent}): already larger than its children")
                } else {
                    format!(
                        "Heapify slot {index} ({parent}): child {} is larger",
                        self.heap[largest]
                    )
                };
                if largest != index {
                    self.sift = Some(Sift {
                        stage: SiftStage::Decide { largest },
                        ..sift
                    });
                }
                let mut slots = vec![index];
                slots.extend(children);
                self.step(HeapOperation::Compare, slots, None, description)
            }
            SiftStage::Decide { largest } => {
                self.sift = Some(Sift {
                    stage: SiftStage::Apply { largest },
                    ..sift
                });
                let description = format!(
                    "Swap {parent} (slot {index}) with {} (slot {largest})",
                    self.heap[largest]
                );
                self.step(
                    HeapOperation::Swap,
                    vec![index, largest],
                    Some((index, largest)),
                    description,
                )
            }
            SiftStage::Apply { largest } => {
                self.heap.swap(index, largest);
                self.swaps += 1;
                self.sift = Some(Sift {
                    index: largest,
                    size,
                    stage: SiftStage::Compare,
                });
                let description = format!(
                    "Swapped: {} now sits at slot {index}, continue at slot {largest}",
                    self.heap[index]
                );
                self.step(
                    HeapOperation::Swapped,
                    vec![index, largest],
                    Some((index, largest)),
                    description,
                )
            }
        }
    }

    fn advance_extract(&mut self, extract: Extract) -> HeapStep {
        let Extract { end, applied } = extract;
        if !applied {
            self.extract = Some(Extract {
                applied: true,
                ..extract
            });
            let description = format!(
                "Move the maximum {} behind the heap, swapping with {} at slot {end}",
                self.heap[0], self.heap[end]
            );
            return self.step(HeapOperation::Swap, vec![0, end], Some((0, end)), description);
        }

        self.heap.swap(0, end);
        self.swaps += 1;
        self.heap_size = end;
        self.sift = Some(Sift {
            index: 0,
            size: end,
            stage: SiftStage::Compare,
        });
        self.extract = (end > 1).then(|| Extract {
            end: end - 1,
            applied: false,
        });
        let description = format!(
            "{} is in its final slot {end}; the heap shrinks to {end} slots",
            self.heap[end]
        );
        self.step(
            HeapOperation::Swapped,
            vec![0, end],
            Some((0, end)),
            description,
        )
    }

    fn complete(&mut self) -> HeapStep {
        self.finished = true;
        let description = match (self.mode, self.heap.is_empty()) {
            (_, true) => "The array is empty: nothing to do".to_string(),
            (Mode::Build, false) => format!("Max heap built: {:?}", self.heap),
            (Mode::Sort, false) => {
                self.heap_size = 0;
                format!("Sorted: {:?}", self.heap)
            }
        };
        tracing::debug!(
            comparisons = self.comparisons,
            swaps = self.swaps,
            "heap run complete"
        );
        let mut step = self.step(HeapOperation::Complete, Vec::new(), None, description);
        step.is_complete = true;
        step
    }
}

impl Iterator for HeapSteps {
    type Item = HeapStep;

    fn next(&mut self) -> Option<HeapStep> {
        if self.finished {
            return None;
        }
        if let Some(sift) = self.sift.take() {
            return Some(self.advance_sift(sift));
        }
        if let Some(index) = self.build_next {
            self.build_next = index.checked_sub(1);
            return Some(self.advance_sift(Sift {
                index,
                size: self.heap.len(),
                stage: SiftStage::Compare,
            }));
        }
        if let Some(extract) = self.extract.take() {
            return Some(self.advance_extract(extract));
        }
        Some(self.complete())
    }
}
