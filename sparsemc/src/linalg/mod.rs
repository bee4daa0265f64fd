//! Data structures for sparse transition matrices.

use itertools::Itertools;

pub mod builder;
pub mod fields;
pub mod sparse;

/// A nonzero entry of a [`SparseMatrix`](sparse::SparseMatrix): the column and the
/// value stored in it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatrixEntry<F> {
    pub column: usize,
    pub value: F,
}

impl<F> MatrixEntry<F> {
    pub fn new(column: usize, value: F) -> Self {
        Self { column, value }
    }
}

/// Checks that *offsets* is a valid offset table into an array of length *end*.
///
/// The first offset must be $0$, the last *end*, and the offsets must be
/// non-decreasing (strictly increasing if *strict* is set).
pub(crate) fn is_offset_table(offsets: &[usize], end: usize, strict: bool) -> bool {
    offsets.first() == Some(&0)
        && offsets.last() == Some(&end)
        && offsets
            .iter()
            .tuple_windows()
            .all(|(lhs, rhs)| if strict { lhs < rhs } else { lhs <= rhs })
}
