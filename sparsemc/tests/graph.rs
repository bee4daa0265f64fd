use rand::{Rng, SeedableRng, rngs::StdRng};
use sparsemc::{Direction, GraphTransitions, MatrixBuilder, SparseMatrix};

/// A random matrix over *states* states. With *grouped* every state gets up to three
/// rows, some of them empty, otherwise the matrix is square.
fn random_matrix(rng: &mut StdRng, states: usize, grouped: bool) -> SparseMatrix<f64> {
    let mut shape = Vec::new();
    for _ in 0..states {
        let choices = if grouped { rng.random_range(1..=3) } else { 1 };
        shape.push(choices);
    }
    let rows: usize = shape.iter().sum();
    let mut builder = MatrixBuilder::new(rows, states, rows * 2, grouped, true);
    let mut row = 0;
    for choices in shape {
        if grouped {
            builder.new_row_group(row);
        }
        for _ in 0..choices {
            if !rng.random_bool(0.2) {
                for _ in 0..rng.random_range(1..=3) {
                    builder.add_next_value(row, rng.random_range(0..states), 0.5);
                }
            }
            row += 1;
        }
    }
    builder.build()
}

fn sorted(mut edges: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    edges.sort_unstable();
    edges
}

#[test]
fn backward_is_the_transpose_of_forward() {
    let mut rng = StdRng::seed_from_u64(42);
    for round in 0..50 {
        let states = rng.random_range(1..40);
        let matrix = random_matrix(&mut rng, states, round % 2 == 0);
        let forward = GraphTransitions::new(&matrix, Direction::Forward);
        let backward = GraphTransitions::new(&matrix, Direction::Backward);

        assert_eq!(forward.state_count(), states);
        assert_eq!(backward.state_count(), states);
        assert_eq!(forward.transition_count(), matrix.entry_count());
        assert_eq!(backward.transition_count(), matrix.entry_count());

        let reversed = backward.iter().map(|(target, source)| (source, target)).collect();
        assert_eq!(sorted(forward.iter().collect()), sorted(reversed));
    }
}

#[test]
fn predecessors_are_sorted_by_source() {
    let mut rng = StdRng::seed_from_u64(7);
    let matrix = random_matrix(&mut rng, 25, true);
    let backward = GraphTransitions::new(&matrix, Direction::Backward);
    for state in 0..backward.state_count() {
        assert!(backward.successors(state).is_sorted());
    }
}

#[test]
fn forward_follows_the_row_groups() {
    let mut rng = StdRng::seed_from_u64(3);
    let matrix = random_matrix(&mut rng, 20, true);
    let forward = GraphTransitions::new(&matrix, Direction::Forward);
    for state in 0..matrix.row_group_count() {
        let columns: Vec<_> = matrix
            .row_group(state)
            .iter()
            .map(|entry| entry.column)
            .collect();
        assert_eq!(forward.successors(state), columns.as_slice());
    }
}

#[test]
fn explicit_choice_indices_match_row_groups() {
    let mut rng = StdRng::seed_from_u64(11);
    let matrix = random_matrix(&mut rng, 15, true);
    let groups = matrix.row_group_indications().unwrap().to_vec();
    for direction in [Direction::Forward, Direction::Backward] {
        assert_eq!(
            GraphTransitions::with_choice_indices(&matrix, &groups, direction),
            GraphTransitions::new(&matrix, direction)
        );
    }
}
