//! Graph structure of a transition relation.
//!
//! Graph algorithms like reachability, SCC decomposition or the qualitative
//! $\mathrm{Prob}_0$/$\mathrm{Prob}_1$ fixpoints only need to know which states can
//! move to which other states. [`GraphTransitions`] flattens a [`SparseMatrix`] into
//! exactly that: a list of successors (or predecessors) per state, without choices
//! and without values.

use std::{fmt::Display, ops::Range};

use log::debug;

use crate::linalg::{fields::PseudoField, is_offset_table, sparse::SparseMatrix};

/// Direction of the stored adjacency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Store the successors of every state.
    Forward,
    /// Store the predecessors of every state.
    Backward,
}

/// Which rows of the matrix belong to which state.
#[derive(Clone, Copy)]
enum Grouping<'a> {
    /// Row $s$ belongs to state $s$.
    Trivial,
    /// The rows of state $s$ are `choice_indices[s]..choice_indices[s + 1]`.
    Choices(&'a [usize]),
}

impl Grouping<'_> {
    fn rows(self, state: usize) -> Range<usize> {
        match self {
            Grouping::Trivial => state..state + 1,
            Grouping::Choices(choice_indices) => choice_indices[state]..choice_indices[state + 1],
        }
    }
}

/// Successor (or predecessor) lists of all states in CSR form.
///
/// The neighbors of state $s$ are stored in
/// `successors[state_indications[s]..state_indications[s + 1]]`. For a nondeterministic
/// matrix the rows of all choices of a state are merged, so a neighbor reachable via
/// several choices (or several entries) is listed several times and the number of
/// stored transitions always equals the number of matrix entries.
#[derive(Debug, PartialEq, Eq)]
pub struct GraphTransitions {
    successors: Box<[usize]>,
    state_indications: Box<[usize]>,
}

impl GraphTransitions {
    /// Builds the graph of *matrix*, using its row groups as states if it has any.
    ///
    /// # Panics
    ///
    /// Panics if the matrix has trivial row grouping but is not square.
    pub fn new<F: PseudoField>(matrix: &SparseMatrix<F>, direction: Direction) -> Self {
        match matrix.row_group_indications() {
            Some(choice_indices) => Self::with_choice_indices(matrix, choice_indices, direction),
            None => {
                assert!(
                    matrix.row_count() == matrix.column_count(),
                    "Matrix must be square. (Rows: {}, Columns: {})",
                    matrix.row_count(),
                    matrix.column_count()
                );
                Self::build(matrix, Grouping::Trivial, matrix.row_count(), direction)
            }
        }
    }

    /// Builds the graph of *matrix* where the rows of state $s$ are
    /// `choice_indices[s]..choice_indices[s + 1]`.
    ///
    /// # Panics
    ///
    /// Panics if *choice_indices* does not cover all rows of the matrix or if the
    /// matrix has a column for which there is no state.
    pub fn with_choice_indices<F: PseudoField>(
        matrix: &SparseMatrix<F>,
        choice_indices: &[usize],
        direction: Direction,
    ) -> Self {
        assert!(
            is_offset_table(choice_indices, matrix.row_count(), false),
            "Choice indices do not cover the rows of the matrix."
        );
        let states = choice_indices.len() - 1;
        assert!(
            matrix.column_count() <= states,
            "Matrix has {} columns but only {states} states.",
            matrix.column_count()
        );
        Self::build(matrix, Grouping::Choices(choice_indices), states, direction)
    }

    fn build<F: PseudoField>(
        matrix: &SparseMatrix<F>,
        grouping: Grouping<'_>,
        states: usize,
        direction: Direction,
    ) -> Self {
        debug!(
            "Building {direction:?} graph transitions for {states} states and {} transitions.",
            matrix.entry_count()
        );
        let transitions = match direction {
            Direction::Forward => Self::forward(matrix, grouping, states),
            Direction::Backward => Self::backward(matrix, grouping, states),
        };
        debug_assert!(is_offset_table(
            &transitions.state_indications,
            transitions.successors.len(),
            false
        ));
        transitions
    }

    fn forward<F: PseudoField>(
        matrix: &SparseMatrix<F>,
        grouping: Grouping<'_>,
        states: usize,
    ) -> Self {
        let state_indications: Box<[usize]> = match grouping {
            // The row offsets of the matrix already are the state offsets.
            Grouping::Trivial => matrix.row_indications().into(),
            Grouping::Choices(choice_indices) => {
                let row_indications = matrix.row_indications();
                choice_indices[..states]
                    .iter()
                    .map(|&first_row| row_indications[first_row])
                    .chain(std::iter::once(matrix.entry_count()))
                    .collect()
            }
        };

        let mut successors = Vec::with_capacity(matrix.entry_count());
        for state in 0..states {
            for row in grouping.rows(state) {
                successors.extend(matrix.row(row).iter().map(|entry| entry.column));
            }
        }

        Self {
            successors: successors.into(),
            state_indications,
        }
    }

    /// Transposes the relation with a counting sort.
    fn backward<F: PseudoField>(
        matrix: &SparseMatrix<F>,
        grouping: Grouping<'_>,
        states: usize,
    ) -> Self {
        let transitions = matrix.entry_count();

        // Step 1️⃣: Count the predecessors of every state.
        let mut state_indications = vec![0; states + 1];
        for (_, target) in edges(matrix, grouping, states) {
            state_indications[target + 1] += 1;
        }

        // Step 2️⃣: Accumulate the counts into offsets and put the sentinel at the end.
        for state in 1..states {
            state_indications[state] += state_indications[state - 1];
        }
        state_indications[states] = transitions;

        // Step 3️⃣: Place every source at the next free slot of its target. Sources are
        // visited in ascending order, so predecessor lists end up sorted.
        let mut next_free = state_indications[..states].to_vec();
        let mut successors = vec![0; transitions];
        for (source, target) in edges(matrix, grouping, states) {
            successors[next_free[target]] = source;
            next_free[target] += 1;
        }

        Self {
            successors: successors.into(),
            state_indications: state_indications.into(),
        }
    }

    pub fn state_count(&self) -> usize {
        self.state_indications.len() - 1
    }

    pub fn transition_count(&self) -> usize {
        self.successors.len()
    }

    pub fn state_indications(&self) -> &[usize] {
        &self.state_indications
    }

    /// Returns the positions of the successors of *state* in the flat successor list.
    ///
    /// # Panics
    ///
    /// Panics if *state* is out of bounds.
    pub fn successor_range(&self, state: usize) -> Range<usize> {
        self.state_indications[state]..self.state_indications[state + 1]
    }

    /// Returns the successors (predecessors for [`Direction::Backward`]) of *state*.
    ///
    /// # Panics
    ///
    /// Panics if *state* is out of bounds.
    pub fn successors(&self, state: usize) -> &[usize] {
        &self.successors[self.successor_range(state)]
    }

    /// Iterates over all stored `(state, neighbor)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.state_count()).flat_map(move |state| {
            self.successors(state)
                .iter()
                .map(move |&neighbor| (state, neighbor))
        })
    }

    /// The number of bytes occupied by the graph.
    pub fn size_in_memory(&self) -> usize {
        std::mem::size_of::<Self>()
            + (self.successors.len() + self.state_indications.len()) * std::mem::size_of::<usize>()
    }
}

/// Iterates over all `(source, target)` pairs of *matrix* in ascending source order.
fn edges<'a, F: PseudoField>(
    matrix: &'a SparseMatrix<F>,
    grouping: Grouping<'a>,
    states: usize,
) -> impl Iterator<Item = (usize, usize)> + 'a {
    (0..states).flat_map(move |state| {
        grouping.rows(state).flat_map(move |row| {
            matrix.row(row).iter().map(move |entry| (state, entry.column))
        })
    })
}

impl Display for GraphTransitions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "successors ({})", self.successors.len())?;
        for successor in self.successors.iter() {
            write!(f, "{successor} ")?;
        }
        writeln!(f)?;
        writeln!(f, "state indications ({})", self.state_indications.len())?;
        for offset in self.state_indications.iter() {
            write!(f, "{offset} ")?;
        }
        Ok(())
    }
}
