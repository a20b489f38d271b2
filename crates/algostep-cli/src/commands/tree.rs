//! Tree command handler: BST operations, traversals and heap runs over a
//! list of values.

use anyhow::{bail, Context, Result};
use clap::Args;

use algostep_lib::tree_steps::{self, TraversalOrder};
use algostep_lib::{
    bst_insert, bst_search, build_heap, heap_sort, level_order, IdAllocator, Tree, TreeAlgorithm,
    TreeRunSummary,
};

use crate::output::{OutputFormat, TreeReport, TreeSteps};

/// Arguments for the tree command.
#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    /// Tree algorithm, e.g. bst-insert, in-order or heap-sort.
    #[arg(long)]
    pub algorithm: TreeAlgorithm,

    /// Comma-separated values; inserted into a BST for tree algorithms.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub values: Vec<i64>,

    /// Value to look for (bst-search only).
    #[arg(long, allow_hyphen_values = true)]
    pub target: Option<i64>,

    /// Print every step instead of only the final state.
    #[arg(long)]
    pub steps: bool,
}

/// Run the selected tree algorithm and build its report.
pub fn run_tree(args: &TreeArgs) -> Result<TreeReport> {
    let algorithm = args.algorithm;
    let values = &args.values;
    if algorithm == TreeAlgorithm::BstSearch && args.target.is_none() {
        bail!("bst-search needs --target");
    }

    let report = if algorithm.is_heap() {
        let steps: Vec<_> = match algorithm {
            TreeAlgorithm::HeapSort => heap_sort(values).collect(),
            _ => build_heap(values).collect(),
        };
        let last = steps.last().context("heap run produced no steps")?;
        TreeReport {
            summary: TreeRunSummary::from_heap_step(algorithm, last, steps.len()),
            trace: TreeSteps::Heap(if args.steps { steps } else { Vec::new() }),
        }
    } else {
        let tree = Tree::from_bst_values(values, &mut IdAllocator::new());
        let steps: Vec<_> = match algorithm {
            TreeAlgorithm::BstInsert => bst_insert(values).collect(),
            TreeAlgorithm::BstSearch => {
                bst_search(&tree, args.target.unwrap_or_default()).collect()
            }
            TreeAlgorithm::InOrder => {
                tree_steps::traverse(&tree, TraversalOrder::InOrder).collect()
            }
            TreeAlgorithm::PreOrder => {
                tree_steps::traverse(&tree, TraversalOrder::PreOrder).collect()
            }
            TreeAlgorithm::PostOrder => {
                tree_steps::traverse(&tree, TraversalOrder::PostOrder).collect()
            }
            _ => level_order(&tree).collect(),
        };
        let last = steps.last().context("tree run produced no steps")?;
        TreeReport {
            summary: TreeRunSummary::from_tree_step(algorithm, last, steps.len()),
            trace: TreeSteps::Tree(if args.steps { steps } else { Vec::new() }),
        }
    };
    Ok(report)
}

/// Handle the tree subcommand.
pub fn handle_tree(args: &TreeArgs, format: OutputFormat) -> Result<()> {
    let report = run_tree(args)?;
    tracing::info!(
        algorithm = %args.algorithm,
        values = args.values.len(),
        steps = report.summary.steps,
        "tree run finished"
    );
    print!("{}", format.render_tree(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(algorithm: TreeAlgorithm, values: &[i64]) -> TreeArgs {
        TreeArgs {
            algorithm,
            values: values.to_vec(),
            target: None,
            steps: false,
        }
    }

    #[test]
    fn search_requires_target() {
        let error = run_tree(&args(TreeAlgorithm::BstSearch, &[1, 2])).expect_err("no target");
        assert!(error.to_string().contains("--target"));
    }

    #[test]
    fn traversals_run_over_bst_of_values() {
        let report = run_tree(&args(TreeAlgorithm::PreOrder, &[5, 3, 8])).unwrap();
        assert_eq!(report.summary.values, vec![5, 3, 8]);

        let report = run_tree(&args(TreeAlgorithm::LevelOrder, &[5, 8, 3, 9])).unwrap();
        assert_eq!(report.summary.values, vec![5, 3, 8, 9]);
    }

    #[test]
    fn heap_sort_reports_sorted_array() {
        let mut request = args(TreeAlgorithm::HeapSort, &[4, 10, 3, 5, 1]);
        request.steps = true;
        let report = run_tree(&request).unwrap();
        assert_eq!(report.summary.values, vec![1, 3, 4, 5, 10]);
        let recorded = match &report.trace {
            TreeSteps::Heap(steps) => steps.len(),
            TreeSteps::Tree(_) => 0,
        };
        assert_eq!(recorded, report.summary.steps);
    }

    #[test]
    fn search_reports_found_value() {
        let mut request = args(TreeAlgorithm::BstSearch, &[5, 3, 8]);
        request.target = Some(8);
        let report = run_tree(&request).unwrap();
        assert_eq!(report.summary.values, vec![8]);
        assert!(report.summary.description.starts_with("Found 8"));
    }
}
