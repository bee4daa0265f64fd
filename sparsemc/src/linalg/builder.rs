//! Incremental construction of [`SparseMatrix`] values.

use std::collections::TryReserveError;

use super::{MatrixEntry, fields::PseudoField, sparse::SparseMatrix};

/// Write-once builder for a [`SparseMatrix`].
///
/// Entries have to be supplied row by row: the row of every call to
/// [`add_next_value`](Self::add_next_value) must not be smaller than the row of the
/// previous call. Violating this is a bug in the caller and panics.
///
/// ```
/// use sparsemc::MatrixBuilder;
///
/// let mut builder = MatrixBuilder::new(3, 2, 3, true, false);
/// builder.new_row_group(0);
/// builder.add_next_value(0, 1, 1.0);
/// builder.add_next_value(1, 0, 0.5);
/// builder.add_next_value(1, 1, 0.5);
/// builder.new_row_group(2);
/// builder.add_next_value(2, 1, 1.0);
/// let matrix = builder.build();
///
/// assert_eq!(matrix.row_count(), 3);
/// assert_eq!(matrix.row_group_count(), 2);
/// assert_eq!(matrix.row_group(0).len(), 3);
/// ```
#[derive(Debug)]
pub struct MatrixBuilder<F> {
    /// Row count given on construction, enforced by [`build`](Self::build) if
    /// `force_dimensions` is set.
    row_count: usize,
    /// Column count given on construction, enforced by [`build`](Self::build) if
    /// `force_dimensions` is set.
    column_count: usize,
    force_dimensions: bool,
    row_grouping: bool,

    entries: Vec<MatrixEntry<F>>,
    /// Start offsets of all rows opened so far.
    row_indications: Vec<usize>,
    row_group_indications: Vec<usize>,

    last_row: Option<usize>,
    highest_column: Option<usize>,
}

impl<F: PseudoField> MatrixBuilder<F> {
    /// Creates a builder for a matrix with the given dimensions and number of entries.
    ///
    /// The dimensions are used to reserve memory. If *force_dimensions* is set, the
    /// built matrix has exactly *rows* rows and *columns* columns, padding trailing
    /// empty rows. Otherwise, the dimensions are derived from the inserted entries.
    pub fn new(
        rows: usize,
        columns: usize,
        entries: usize,
        row_grouping: bool,
        force_dimensions: bool,
    ) -> Self {
        let mut row_indications = Vec::with_capacity(rows + 1);
        row_indications.push(0);
        Self {
            row_count: rows,
            column_count: columns,
            force_dimensions,
            row_grouping,
            entries: Vec::with_capacity(entries),
            row_indications,
            row_group_indications: Vec::with_capacity(if row_grouping { rows + 1 } else { 0 }),
            last_row: None,
            highest_column: None,
        }
    }

    /// Like [`new`](Self::new) but reports a failure to reserve the memory instead of
    /// aborting.
    pub fn try_new(
        rows: usize,
        columns: usize,
        entries: usize,
        row_grouping: bool,
        force_dimensions: bool,
    ) -> Result<Self, TryReserveError> {
        let mut builder = Self::new(0, columns, 0, row_grouping, force_dimensions);
        builder.row_count = rows;
        builder.entries.try_reserve_exact(entries)?;
        builder.row_indications.try_reserve_exact(rows)?;
        if row_grouping {
            builder
                .row_group_indications
                .try_reserve_exact(rows.saturating_add(1))?;
        }
        Ok(builder)
    }

    /// Starts a new row group beginning at *first_row*.
    ///
    /// # Panics
    ///
    /// Panics if the builder has no row grouping, if the first group does not start at
    /// row $0$, or if *first_row* is not greater than the start of the previous group
    /// and every row written so far.
    pub fn new_row_group(&mut self, first_row: usize) {
        assert!(self.row_grouping, "Matrix builder has no row grouping.");
        match self.row_group_indications.last() {
            Some(&previous) => assert!(
                first_row > previous,
                "Row groups must be strictly increasing. (First row: {first_row}, previous group: {previous})"
            ),
            None => assert!(first_row == 0, "The first row group must start at row 0."),
        }
        if let Some(last_row) = self.last_row {
            assert!(
                first_row > last_row,
                "Row group starting at {first_row} would contain the already written row {last_row}."
            );
        }
        self.row_group_indications.push(first_row);
    }

    /// Appends an entry with the given *value* at *row* and *column*.
    ///
    /// # Panics
    ///
    /// Panics if *row* is smaller than the row of a previous call, if *row* lies before
    /// the current row group, or if the entry is out of the forced dimensions.
    pub fn add_next_value(&mut self, row: usize, column: usize, value: F) {
        if let Some(last_row) = self.last_row {
            assert!(
                row >= last_row,
                "Rows must be added in non-decreasing order. (Row: {row}, last row: {last_row})"
            );
        }
        if let Some(&group_start) = self.row_group_indications.last() {
            assert!(
                row >= group_start,
                "Row {row} lies before the current row group starting at {group_start}."
            );
        }
        if self.force_dimensions {
            assert!(
                row < self.row_count && column < self.column_count,
                "Entry ({row}, {column}) exceeds the forced dimensions {} x {}.",
                self.row_count,
                self.column_count
            );
        }
        self.open_rows(row + 1);
        self.entries.push(MatrixEntry::new(column, value));
        self.last_row = Some(row);
        self.highest_column = Some(self.highest_column.map_or(column, |c| c.max(column)));
    }

    /// The number of entries added so far.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Makes sure offsets for the first *rows* rows are recorded. Rows opened here
    /// start at the current end of the entries.
    fn open_rows(&mut self, rows: usize) {
        while self.row_indications.len() < rows {
            self.row_indications.push(self.entries.len());
        }
    }

    /// Finalizes the matrix.
    pub fn build(mut self) -> SparseMatrix<F> {
        let mut row_count = self.last_row.map_or(0, |row| row + 1);
        if let Some(&group_start) = self.row_group_indications.last() {
            row_count = row_count.max(group_start + 1);
        }
        let column_count = if self.force_dimensions {
            assert!(
                row_count <= self.row_count,
                "Matrix has {row_count} rows but {} were forced.",
                self.row_count
            );
            row_count = self.row_count;
            self.column_count
        } else {
            self.highest_column.map_or(0, |column| column + 1)
        };

        self.open_rows(row_count);
        self.row_indications.push(self.entries.len());

        let row_group_indications = if self.row_grouping {
            assert!(
                row_count == 0 || !self.row_group_indications.is_empty(),
                "Matrix with row grouping has rows but no row groups."
            );
            self.row_group_indications.push(row_count);
            Some(self.row_group_indications.into())
        } else {
            None
        };

        SparseMatrix::from_parts(
            column_count,
            self.entries.into(),
            self.row_indications.into(),
            row_group_indications,
        )
    }
}
