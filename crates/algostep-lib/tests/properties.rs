use std::collections::VecDeque;

use algostep_lib::{
    build_heap, bst_insert, create_grid, heap_sort, in_order, is_max_heap, select_generator, Coord,
    Grid, IdAllocator, PathAlgorithm, Tree,
};
use proptest::prelude::*;

/// Random grid: dimensions, an obstacle mask, and start/end cell indices.
fn grids() -> impl Strategy<Value = Grid> {
    (1usize..8, 1usize..8).prop_flat_map(|(rows, cols)| {
        let cells = rows * cols;
        (
            Just((rows, cols)),
            proptest::collection::vec(prop::bool::weighted(0.3), cells),
            0..cells,
            0..cells,
        )
            .prop_map(|((rows, cols), mask, start, end)| {
                let obstacles: Vec<Coord> = mask
                    .iter()
                    .enumerate()
                    .filter(|(_, wall)| **wall)
                    .map(|(index, _)| Coord::new(index / cols, index % cols))
                    .collect();
                let start = Coord::new(start / cols, start % cols);
                let end = Coord::new(end / cols, end % cols);
                create_grid(rows, cols, start, end, &obstacles)
            })
    })
}

/// Reference shortest distance in moves, computed straight from the cell
/// flags.
fn brute_force_distance(grid: &Grid) -> Option<usize> {
    let (start, end) = (grid.start()?, grid.end()?);
    let mut distance = vec![None; grid.rows() * grid.cols()];
    let index = |coord: Coord| coord.row * grid.cols() + coord.col;
    distance[index(start)] = Some(0usize);
    let mut queue = VecDeque::from([start]);
    while let Some(coord) = queue.pop_front() {
        let here = distance[index(coord)]?;
        let candidates = [
            coord.row.checked_sub(1).map(|row| Coord::new(row, coord.col)),
            Some(Coord::new(coord.row + 1, coord.col)),
            coord.col.checked_sub(1).map(|col| Coord::new(coord.row, col)),
            Some(Coord::new(coord.row, coord.col + 1)),
        ];
        for next in candidates.into_iter().flatten() {
            let open = grid.cell(next).is_some_and(|cell| !cell.is_obstacle);
            if open && distance[index(next)].is_none() {
                distance[index(next)] = Some(here + 1);
                queue.push_back(next);
            }
        }
    }
    distance[index(end)]
}

proptest! {
    #[test]
    fn every_run_terminates_once(grid in grids()) {
        let bound = grid.rows() * grid.cols() + 1;
        for algorithm in PathAlgorithm::ALL {
            let steps: Vec<_> = select_generator(algorithm, &grid).collect();
            prop_assert!(steps.len() <= bound, "{} took {} steps", algorithm, steps.len());
            prop_assert_eq!(steps.iter().filter(|step| step.is_complete).count(), 1);
            prop_assert!(steps.last().is_some_and(|step| step.is_complete));
        }
    }

    #[test]
    fn bfs_matches_brute_force_distance(grid in grids()) {
        let last = select_generator(PathAlgorithm::Bfs, &grid).last().expect("terminal step");
        match brute_force_distance(&grid) {
            Some(moves) => {
                prop_assert!(last.found_path());
                prop_assert_eq!(last.path_length - 1, moves);
            }
            None => {
                prop_assert!(!last.found_path());
                prop_assert!(last.path.is_empty());
            }
        }
    }

    #[test]
    fn weighted_searches_agree_with_bfs(grid in grids()) {
        let length = |algorithm| {
            select_generator(algorithm, &grid)
                .last()
                .map(|step| (step.path_length, step.nodes_visited))
                .expect("terminal step")
        };
        let (bfs_length, _) = length(PathAlgorithm::Bfs);
        let (dijkstra_length, dijkstra_nodes) = length(PathAlgorithm::Dijkstra);
        let (a_star_length, a_star_nodes) = length(PathAlgorithm::AStar);

        prop_assert_eq!(dijkstra_length, bfs_length);
        prop_assert_eq!(a_star_length, bfs_length);
        prop_assert!(a_star_nodes <= dijkstra_nodes);
    }

    #[test]
    fn paths_are_contiguous_and_avoid_walls(grid in grids()) {
        for algorithm in PathAlgorithm::ALL {
            let last = select_generator(algorithm, &grid).last().expect("terminal step");
            for pair in last.path.windows(2) {
                prop_assert_eq!(algostep_lib::manhattan_distance(pair[0], pair[1]), 1);
            }
            for coord in &last.path {
                prop_assert!(!grid.cell(*coord).expect("in bounds").is_obstacle);
            }
        }
    }

    #[test]
    fn earlier_grid_snapshots_never_change(grid in grids()) {
        let mut generator = select_generator(PathAlgorithm::AStar, &grid);
        let first = generator.next().expect("at least one step");
        let frozen = first.clone();
        for _ in generator.by_ref() {}
        prop_assert_eq!(first, frozen);
    }

    #[test]
    fn replaying_a_run_yields_identical_steps(grid in grids()) {
        for algorithm in PathAlgorithm::ALL {
            let first: Vec<_> = select_generator(algorithm, &grid).collect();
            let second: Vec<_> = select_generator(algorithm, &grid).collect();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn interleaved_generators_do_not_interfere(
        left in grids(),
        right in grids(),
        pair in (0usize..4, 0usize..4)
    ) {
        let (first, second) = (PathAlgorithm::ALL[pair.0], PathAlgorithm::ALL[pair.1]);
        let separate_left: Vec<_> = select_generator(first, &left).collect();
        let separate_right: Vec<_> = select_generator(second, &right).collect();

        let mut left_run = select_generator(first, &left);
        let mut right_run = select_generator(second, &right);
        let (mut woven_left, mut woven_right) = (Vec::new(), Vec::new());
        loop {
            let a = left_run.next();
            let b = right_run.next();
            if a.is_none() && b.is_none() {
                break;
            }
            woven_left.extend(a);
            woven_right.extend(b);
        }
        prop_assert_eq!(woven_left, separate_left);
        prop_assert_eq!(woven_right, separate_right);
    }

    #[test]
    fn bst_insert_yields_sorted_contents(values in proptest::collection::vec(-50i64..50, 0..30)) {
        let last = bst_insert(&values).last().expect("terminal step");
        let mut sorted = values.clone();
        sorted.sort();
        prop_assert_eq!(&last.output, &sorted);
        prop_assert!(last.tree.is_valid_bst());

        let tree = Tree::from_bst_values(&values, &mut IdAllocator::new());
        let traversal = in_order(&tree).last().expect("terminal step");
        prop_assert_eq!(traversal.output, sorted);
    }

    #[test]
    fn earlier_tree_snapshots_never_change(values in proptest::collection::vec(-50i64..50, 1..20)) {
        let mut generator = bst_insert(&values);
        let first = generator.next().expect("at least one step");
        let frozen = first.clone();
        for _ in generator.by_ref() {}
        prop_assert_eq!(first, frozen);
    }

    #[test]
    fn heap_sort_sorts(values in proptest::collection::vec(-100i64..100, 0..40)) {
        let last = heap_sort(&values).last().expect("terminal step");
        let mut sorted = values.clone();
        sorted.sort_unstable();
        prop_assert_eq!(last.array, sorted);
    }

    #[test]
    fn build_heap_satisfies_heap_property(
        values in proptest::collection::vec(-100i64..100, 0..40)
    ) {
        let last = build_heap(&values).last().expect("terminal step");
        prop_assert!(is_max_heap(&last.array));
        let mut before = values.clone();
        let mut after = last.array.clone();
        before.sort_unstable();
        after.sort_unstable();
        prop_assert_eq!(before, after);
    }
}
