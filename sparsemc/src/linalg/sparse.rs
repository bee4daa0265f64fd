//! Row-compressed sparse matrices with optional row grouping.

use std::{fmt::Display, ops::Range};

use ndarray::Array2;
use rayon::prelude::*;

use super::{MatrixEntry, fields::PseudoField, is_offset_table};

/// An immutable sparse matrix in row-compressed (CSR) form.
///
/// The entries of row $r$ are stored in `entries[row_indications[r]..row_indications[r + 1]]`.
///
/// Optionally, the rows are partitioned into *row groups*. For a Markov decision
/// process each group corresponds to a state and each row of the group to one of the
/// nondeterministic choices of the state. Group $s$ owns the rows
/// `row_group_indications[s]..row_group_indications[s + 1]`. A matrix without row
/// grouping has *trivial* row grouping, i.e., every row forms its own group.
///
/// Matrices are created with a [`MatrixBuilder`](super::builder::MatrixBuilder) and
/// never change afterward.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseMatrix<F> {
    column_count: usize,
    entries: Box<[MatrixEntry<F>]>,
    row_indications: Box<[usize]>,
    row_group_indications: Option<Box<[usize]>>,
}

impl<F: PseudoField> SparseMatrix<F> {
    pub(crate) fn from_parts(
        column_count: usize,
        entries: Box<[MatrixEntry<F>]>,
        row_indications: Box<[usize]>,
        row_group_indications: Option<Box<[usize]>>,
    ) -> Self {
        debug_assert!(is_offset_table(&row_indications, entries.len(), false));
        debug_assert!(row_group_indications.as_ref().is_none_or(|groups| is_offset_table(
            groups,
            row_indications.len() - 1,
            true
        )));
        debug_assert!(entries.iter().all(|entry| entry.column < column_count));
        Self {
            column_count,
            entries,
            row_indications,
            row_group_indications,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_indications.len() - 1
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// The number of stored entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// The number of row groups, which equals the row count for trivial row grouping.
    pub fn row_group_count(&self) -> usize {
        match &self.row_group_indications {
            Some(groups) => groups.len() - 1,
            None => self.row_count(),
        }
    }

    pub fn has_trivial_row_grouping(&self) -> bool {
        self.row_group_indications.is_none()
    }

    pub fn row_indications(&self) -> &[usize] {
        &self.row_indications
    }

    pub fn row_group_indications(&self) -> Option<&[usize]> {
        self.row_group_indications.as_deref()
    }

    pub fn entries(&self) -> &[MatrixEntry<F>] {
        &self.entries
    }

    /// Returns the entries of the given *row*.
    ///
    /// # Panics
    ///
    /// Panics if the access is out-of-bounds.
    pub fn row(&self, row: usize) -> &[MatrixEntry<F>] {
        &self.entries[self.row_indications[row]..self.row_indications[row + 1]]
    }

    /// Returns the range of rows belonging to the given row *group*.
    ///
    /// # Panics
    ///
    /// Panics if the access is out-of-bounds.
    pub fn row_group_rows(&self, group: usize) -> Range<usize> {
        match &self.row_group_indications {
            Some(groups) => groups[group]..groups[group + 1],
            None => {
                assert!(group < self.row_count(), "Out-of-bounds access.");
                group..group + 1
            }
        }
    }

    /// Returns the entries of all rows of the given row *group*.
    ///
    /// The rows of a group are adjacent, so this is a single slice.
    pub fn row_group(&self, group: usize) -> &[MatrixEntry<F>] {
        let rows = self.row_group_rows(group);
        &self.entries[self.row_indications[rows.start]..self.row_indications[rows.end]]
    }

    /// Computes the sum of the values of the given *row*.
    pub fn row_sum(&self, row: usize) -> F {
        let mut sum = F::zero();
        for entry in self.row(row) {
            sum.add_assign(&entry.value);
        }
        sum
    }

    /// Computes the sums of all rows.
    pub fn row_sums(&self) -> Vec<F> {
        (0..self.row_count())
            .into_par_iter()
            .map(|row| self.row_sum(row))
            .collect()
    }

    /// Checks whether every non-empty row sums up to one.
    pub fn is_stochastic(&self) -> bool {
        (0..self.row_count()).into_par_iter().all(|row| {
            self.row(row).is_empty() || self.row_sum(row).cmp_eq(&F::one())
        })
    }

    /// The number of bytes occupied by the matrix.
    pub fn size_in_memory(&self) -> usize {
        let groups = self.row_group_indications.as_ref().map_or(0, |groups| groups.len());
        std::mem::size_of::<Self>()
            + self.entries.len() * std::mem::size_of::<MatrixEntry<F>>()
            + (self.row_indications.len() + groups) * std::mem::size_of::<usize>()
    }

    /// Converts the matrix into a dense array. Entries sharing a cell are summed.
    pub fn to_dense(&self) -> Array2<F> {
        let mut dense = Array2::from_elem((self.row_count(), self.column_count), F::zero());
        for row in 0..self.row_count() {
            for entry in self.row(row) {
                dense[(row, entry.column)].add_assign(&entry.value);
            }
        }
        dense
    }
}

/// Writes the matrix as an explicit transition list.
///
/// Every entry becomes a line `group choice column value` where *choice* is the
/// position of the row within its group. The output can be read back with
/// [`parse_transitions`](crate::formats::tra::parse_transitions).
impl<F: PseudoField> Display for SparseMatrix<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for group in 0..self.row_group_count() {
            let rows = self.row_group_rows(group);
            for row in rows.clone() {
                for entry in self.row(row) {
                    writeln!(
                        f,
                        "{} {} {} {}",
                        group,
                        row - rows.start,
                        entry.column,
                        entry.value
                    )?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::linalg::{builder::MatrixBuilder, fields::rational::Rational};
    use crate::linalg::fields::FromRational;

    use super::*;

    /// Two states, the first with two choices.
    fn mdp() -> SparseMatrix<f64> {
        let mut builder = MatrixBuilder::new(3, 2, 4, true, true);
        builder.new_row_group(0);
        builder.add_next_value(0, 0, 0.5);
        builder.add_next_value(0, 1, 0.5);
        builder.add_next_value(1, 1, 1.0);
        builder.new_row_group(2);
        builder.add_next_value(2, 1, 1.0);
        builder.build()
    }

    #[test]
    fn csr_invariant() {
        let matrix = mdp();
        assert!(is_offset_table(
            matrix.row_indications(),
            matrix.entry_count(),
            false
        ));
        assert!(is_offset_table(
            matrix.row_group_indications().unwrap(),
            matrix.row_count(),
            true
        ));
    }

    #[test]
    fn rows_and_groups() {
        let matrix = mdp();
        assert_eq!(matrix.row_count(), 3);
        assert_eq!(matrix.column_count(), 2);
        assert_eq!(matrix.entry_count(), 4);
        assert_eq!(matrix.row_group_count(), 2);
        assert_eq!(
            matrix.row(0),
            &[MatrixEntry::new(0, 0.5), MatrixEntry::new(1, 0.5)]
        );
        assert_eq!(matrix.row_group_rows(0), 0..2);
        let columns: Vec<_> = matrix.row_group(0).iter().map(|entry| entry.column).collect();
        assert_eq!(columns, vec![0, 1, 1]);
        assert_eq!(matrix.row_group(1), &[MatrixEntry::new(1, 1.0)]);
    }

    #[test]
    fn trivial_grouping_treats_rows_as_groups() {
        let mut builder = MatrixBuilder::new(2, 2, 2, false, true);
        builder.add_next_value(0, 1, 1.0);
        builder.add_next_value(1, 0, 1.0);
        let matrix = builder.build();
        assert!(matrix.has_trivial_row_grouping());
        assert_eq!(matrix.row_group_count(), 2);
        assert_eq!(matrix.row_group_rows(1), 1..2);
        assert_eq!(matrix.row_group(1), matrix.row(1));
    }

    #[test]
    fn sums_and_stochasticity() {
        let matrix = mdp();
        assert_eq!(matrix.row_sums(), vec![1.0, 1.0, 1.0]);
        assert!(matrix.is_stochastic());

        let mut builder = MatrixBuilder::new(1, 1, 1, false, false);
        builder.add_next_value(0, 0, 0.3);
        assert!(!builder.build().is_stochastic());
    }

    #[test]
    fn exact_stochasticity_with_rationals() {
        let third = Rational::from_rational("1", "3").unwrap();
        let mut builder = MatrixBuilder::new(1, 3, 3, false, false);
        for column in 0..3 {
            builder.add_next_value(0, column, third.clone());
        }
        assert!(builder.build().is_stochastic());
    }

    #[test]
    fn dense_view_sums_duplicates() {
        let mut builder = MatrixBuilder::new(1, 2, 2, false, false);
        builder.add_next_value(0, 1, 0.25);
        builder.add_next_value(0, 1, 0.75);
        let dense = builder.build().to_dense();
        assert_eq!(dense.shape(), &[1, 2]);
        assert_eq!(dense[(0, 0)], 0.0);
        assert_eq!(dense[(0, 1)], 1.0);
    }

    #[test]
    fn display_as_transition_list() {
        assert_eq!(
            mdp().to_string(),
            "0 0 0 0.5\n0 0 1 0.5\n0 1 1 1\n1 0 1 1\n"
        );
    }

    #[test]
    fn memory_grows_with_entries() {
        let matrix = mdp();
        assert!(matrix.size_in_memory() >= 4 * std::mem::size_of::<MatrixEntry<f64>>());
    }
}
