//! The explicit transition-list format.
//!
//! Every line of a transition file describes one entry of the transition matrix of a
//! Markov decision process:
//!
//! ```text
//! <source> <choice> <target> <probability> [ignored...]
//! ```
//!
//! Lines are sorted by source state and, within a state, by choice. Choices of a state
//! are numbered 0, 1, 2, ... without gaps. Lines with the same source and choice form
//! one row of the matrix, i.e., one probability distribution. An optional first line not starting with a digit (a format hint
//! such as `mdp`) is skipped. The fourth column of PRISM exports may carry an action
//! label, everything after the value is ignored.
//!
//! Transition *reward* files have the same format with non-negative rewards instead of
//! probabilities. Their rows are aligned to the rows of an already parsed transition
//! matrix.
//!
//! The input is scanned twice. The first pass computes the dimensions of the matrix,
//! the second pass fills a [`MatrixBuilder`] of exactly that size. Both passes run the
//! same row layout to map lines to rows, so they cannot disagree on the dimensions.

use std::ops::Range;

use log::{debug, error, info, warn};

use crate::linalg::{builder::MatrixBuilder, fields::PseudoField};

use super::{Cursor, ParseError, ParseResult, ParserSettings};

/// Parses a transition file.
///
/// States without outgoing transitions are deadlocks. With
/// [`ParserSettings::fix_deadlocks`] they get a self-loop, otherwise the whole file is
/// rejected after reporting all of them.
pub fn parse_transitions<F: PseudoField>(
    input: &str,
    settings: &ParserSettings,
) -> Result<ParseResult<F>, ParseError> {
    parse(input, Layout::Transitions, settings.fix_deadlocks)
}

/// Parses a transition reward file for the transition matrix of *reference*.
///
/// The reward matrix has the same rows, row groups and columns as the reference
/// matrix. Rows for which the file lists no rewards stay empty.
pub fn parse_rewards<F: PseudoField, G: PseudoField>(
    input: &str,
    reference: &ParseResult<G>,
) -> Result<ParseResult<F>, ParseError> {
    let row_mapping = reference.row_mapping.as_slice();
    if row_mapping.first() != Some(&0) || row_mapping.windows(2).any(|rows| rows[0] >= rows[1]) {
        return Err(ParseError::Range(
            "The row mapping of the transition matrix is not strictly increasing.".to_owned(),
        ));
    }
    let layout = Layout::Rewards {
        row_mapping,
        columns: reference.matrix.column_count(),
        entries: reference.matrix.entry_count(),
    };
    parse(input, layout, false)
}

/// Sizing information computed by the first pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct FirstPassResult {
    pub highest_state_index: usize,
    pub number_of_nonzero_entries: usize,
    pub number_of_choices: usize,
}

/// Where the rows of the matrix come from.
#[derive(Clone, Copy, Debug)]
enum Layout<'r> {
    /// Rows are allocated in the order of the file.
    Transitions,
    /// Rows are dictated by an existing transition matrix.
    Rewards {
        row_mapping: &'r [usize],
        columns: usize,
        entries: usize,
    },
}

impl Layout<'_> {
    fn is_rewards(&self) -> bool {
        matches!(self, Layout::Rewards { .. })
    }
}

/// Every state needs at least one row offset, so no matrix can have more states.
const MAX_STATES: usize = isize::MAX as usize / std::mem::size_of::<usize>();

/// A single line of the input.
#[derive(Debug)]
struct Line<F> {
    number: usize,
    source: usize,
    choice: usize,
    target: usize,
    value: F,
}

impl<F: PseudoField> Line<F> {
    fn parse(number: usize, text: &str) -> Result<Self, ParseError> {
        let mut cursor = Cursor::new(text, number);
        let line = Self {
            number,
            source: cursor.consume_usize()?,
            choice: cursor.consume_usize()?,
            target: cursor.consume_usize()?,
            value: cursor.consume_rational()?,
        };
        let highest = line.source.max(line.target);
        if highest >= MAX_STATES {
            return Err(line.error(format!(
                "State index {highest} is out of range, at most {MAX_STATES} states are supported."
            )));
        }
        Ok(line)
    }

    fn error(&self, message: String) -> ParseError {
        ParseError::Format {
            line: self.number,
            message,
        }
    }
}

/// Iterates over the lines of *input*, skipping blank lines and the format hint.
fn lines<F: PseudoField>(input: &str) -> impl Iterator<Item = Result<Line<F>, ParseError>> + '_ {
    let mut first = true;
    input
        .lines()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .filter(move |(_, text)| {
            let is_hint = first && !text.trim_start().starts_with(|c: char| c.is_ascii_digit());
            first = false;
            !is_hint
        })
        .map(|(idx, text)| Line::parse(idx + 1, text))
}

/// What a pass does with the rows laid out by [`RowLayout`].
trait Pass<F> {
    /// Called once per state in ascending order with the first row of the state.
    fn begin_state(&mut self, state: usize, first_row: usize);

    /// Called for a run of consecutive *states* without outgoing transitions. The
    /// states get one row each starting at *first_row* and have not been announced
    /// with [`Pass::begin_state`].
    fn deadlocks(&mut self, states: Range<usize>, first_row: usize);

    /// Called for every line with the row it belongs to.
    fn entry(&mut self, row: usize, line: Line<F>) -> Result<(), ParseError>;

    /// The highest state index of the matrix.
    fn highest_state(&self) -> usize;
}

/// Maps the `(source, choice)` pairs of the lines to matrix rows.
struct RowLayout<'r> {
    layout: Layout<'r>,
    last: Option<(usize, usize)>,
    current_row: usize,
    /// The number of rows allocated so far.
    next_row: usize,
}

impl<'r> RowLayout<'r> {
    fn new(layout: Layout<'r>) -> Self {
        Self {
            layout,
            last: None,
            current_row: 0,
            next_row: 0,
        }
    }

    /// The first state that has not been visited yet.
    fn next_state(&self) -> usize {
        self.last.map_or(0, |(source, _)| source + 1)
    }

    /// Returns the row of *line*, announcing new states and deadlocks to *pass*.
    fn advance<F: PseudoField>(
        &mut self,
        line: &Line<F>,
        pass: &mut impl Pass<F>,
    ) -> Result<usize, ParseError> {
        if let Layout::Rewards { columns, .. } = self.layout {
            if line.target >= columns {
                return Err(ParseError::Range(format!(
                    "Line {}: target state {} does not exist in the transition matrix with {columns} columns.",
                    line.number, line.target
                )));
            }
        }
        if let Some((source, choice)) = self.last {
            if line.source < source {
                return Err(line.error(format!(
                    "The current source state {} is smaller than the last one {source}.",
                    line.source
                )));
            }
            if line.source == source {
                if line.choice < choice {
                    return Err(line.error(format!(
                        "The current choice {} of state {source} is smaller than the last one {choice}.",
                        line.choice
                    )));
                }
                if line.choice == choice {
                    return Ok(self.current_row);
                }
            }
        }
        let new_state = self.last.is_none_or(|(source, _)| source != line.source);

        match self.layout {
            Layout::Transitions => {
                // Choice c of state s is row row_mapping[s] + c.
                let expected = match self.last {
                    Some((source, choice)) if source == line.source => choice + 1,
                    _ => 0,
                };
                if line.choice != expected {
                    return Err(line.error(format!(
                        "Expected choice {expected} of state {} but found choice {}.",
                        line.source, line.choice
                    )));
                }
                if new_state {
                    let first_deadlock = self.next_state();
                    self.reserve_deadlocks::<F>(first_deadlock..line.source, pass);
                    pass.begin_state(line.source, self.next_row);
                }
                self.current_row = self.next_row;
                self.next_row += 1;
            }
            Layout::Rewards { row_mapping, .. } => {
                let states = row_mapping.len() - 1;
                if line.source >= states {
                    return Err(ParseError::Range(format!(
                        "Line {}: state {} does not exist in the transition matrix with {states} states.",
                        line.number, line.source
                    )));
                }
                let first_row = row_mapping[line.source];
                let choices = row_mapping[line.source + 1] - first_row;
                if line.choice >= choices {
                    return Err(ParseError::Range(format!(
                        "Line {}: state {} has only {choices} choice(s) in the transition matrix but choice {} was given.",
                        line.number, line.source, line.choice
                    )));
                }
                if new_state {
                    for state in self.next_state()..=line.source {
                        pass.begin_state(state, row_mapping[state]);
                    }
                }
                self.current_row = first_row + line.choice;
            }
        }

        self.last = Some((line.source, line.choice));
        Ok(self.current_row)
    }

    /// Announces all states after the last line and returns the total number of rows.
    fn finish<F>(&mut self, pass: &mut impl Pass<F>) -> usize {
        match self.layout {
            Layout::Transitions => {
                let first_deadlock = self.next_state();
                self.reserve_deadlocks::<F>(first_deadlock..pass.highest_state() + 1, pass);
                self.next_row
            }
            Layout::Rewards { row_mapping, .. } => {
                let states = row_mapping.len() - 1;
                for state in self.next_state()..states {
                    pass.begin_state(state, row_mapping[state]);
                }
                row_mapping[states]
            }
        }
    }

    /// Reserves one row for each of the *states*, which have no outgoing transitions.
    fn reserve_deadlocks<F>(&mut self, states: Range<usize>, pass: &mut impl Pass<F>) {
        if !states.is_empty() {
            let rows = states.len();
            pass.deadlocks(states, self.next_row);
            self.next_row += rows;
        }
    }
}

/// Runs *pass* over all lines of *input* and returns the number of rows.
fn scan<F: PseudoField>(
    input: &str,
    layout: Layout<'_>,
    pass: &mut impl Pass<F>,
) -> Result<usize, ParseError> {
    let mut rows = RowLayout::new(layout);
    let mut empty = true;
    for line in lines::<F>(input) {
        let line = line?;
        let row = rows.advance(&line, pass)?;
        pass.entry(row, line)?;
        empty = false;
    }
    if empty {
        return Err(ParseError::Empty);
    }
    Ok(rows.finish::<F>(pass))
}

/// The first pass: computes the dimensions and validates the values.
struct Sizing {
    rewards: bool,
    result: FirstPassResult,
}

impl<F: PseudoField> Pass<F> for Sizing {
    fn begin_state(&mut self, _state: usize, _first_row: usize) {}

    fn deadlocks(&mut self, states: Range<usize>, _first_row: usize) {
        // Space for the self-loops.
        self.result.number_of_nonzero_entries += states.len();
    }

    fn entry(&mut self, _row: usize, line: Line<F>) -> Result<(), ParseError> {
        if self.rewards {
            if line.value.is_negative() {
                error!("Expected a non-negative reward value but got {}.", line.value);
                return Err(line.error(format!(
                    "Expected a non-negative reward value but got {}.",
                    line.value
                )));
            }
        } else if !line.value.is_probability() {
            error!("Expected a probability but got {}.", line.value);
            return Err(line.error(format!(
                "Expected a probability in [0, 1] but got {}.",
                line.value
            )));
        }
        self.result.highest_state_index = self
            .result
            .highest_state_index
            .max(line.source)
            .max(line.target);
        self.result.number_of_nonzero_entries += 1;
        Ok(())
    }

    fn highest_state(&self) -> usize {
        self.result.highest_state_index
    }
}

/// The second pass: writes the entries into the builder.
struct Filling<F> {
    builder: MatrixBuilder<F>,
    row_mapping: Vec<usize>,
    deadlocks: Vec<usize>,
    fix_deadlocks: bool,
    highest_state: usize,
}

impl<F: PseudoField> Pass<F> for Filling<F> {
    fn begin_state(&mut self, state: usize, first_row: usize) {
        debug_assert_eq!(self.row_mapping.len(), state);
        self.row_mapping.push(first_row);
        self.builder.new_row_group(first_row);
    }

    fn deadlocks(&mut self, states: Range<usize>, first_row: usize) {
        for (state, row) in states.zip(first_row..) {
            self.begin_state(state, row);
            self.deadlocks.push(state);
            if self.fix_deadlocks {
                warn!("State {state} has no outgoing transitions. A self-loop was inserted.");
                self.builder.add_next_value(row, state, F::one());
            } else {
                error!("State {state} has no outgoing transitions.");
            }
        }
    }

    fn entry(&mut self, row: usize, line: Line<F>) -> Result<(), ParseError> {
        self.builder.add_next_value(row, line.target, line.value);
        Ok(())
    }

    fn highest_state(&self) -> usize {
        self.highest_state
    }
}

fn first_pass<F: PseudoField>(input: &str, layout: Layout<'_>) -> Result<FirstPassResult, ParseError> {
    let mut sizing = Sizing {
        rewards: layout.is_rewards(),
        result: FirstPassResult::default(),
    };
    sizing.result.number_of_choices = scan::<F>(input, layout, &mut sizing)?;
    Ok(sizing.result)
}

/// Checks that a reward matrix fits into the transition matrix it refers to.
///
/// Rows and columns are checked line by line while laying out the rows, only the
/// number of entries is left.
fn reconcile(first_pass: &mut FirstPassResult, layout: Layout<'_>) -> Result<(), ParseError> {
    let Layout::Rewards {
        row_mapping,
        columns,
        entries,
    } = layout
    else {
        return Ok(());
    };
    debug_assert_eq!(first_pass.number_of_choices, row_mapping[row_mapping.len() - 1]);
    debug_assert!(first_pass.highest_state_index < columns);
    if first_pass.number_of_nonzero_entries > entries {
        error!("The reward matrix has more entries than the transition matrix.");
        return Err(ParseError::Range(format!(
            "The reward matrix has {} entries but the transition matrix only {entries}. There must be a reward for a non-existent transition.",
            first_pass.number_of_nonzero_entries
        )));
    }
    first_pass.highest_state_index = columns - 1;
    Ok(())
}

fn parse<F: PseudoField>(
    input: &str,
    layout: Layout<'_>,
    fix_deadlocks: bool,
) -> Result<ParseResult<F>, ParseError> {
    let mut first_pass = first_pass::<F>(input, layout)?;
    debug!("First pass finished: {first_pass:?}");
    reconcile(&mut first_pass, layout)?;

    info!(
        "Attempting to create matrix of size {} x {} with {} entries.",
        first_pass.number_of_choices,
        first_pass.highest_state_index + 1,
        first_pass.number_of_nonzero_entries
    );
    let capacity = || ParseError::Capacity {
        rows: first_pass.number_of_choices,
        columns: first_pass.highest_state_index + 1,
        entries: first_pass.number_of_nonzero_entries,
    };
    let builder = MatrixBuilder::try_new(
        first_pass.number_of_choices,
        first_pass.highest_state_index + 1,
        first_pass.number_of_nonzero_entries,
        true,
        true,
    )
    .map_err(|_| capacity())?;
    let mut row_mapping = Vec::new();
    row_mapping
        .try_reserve_exact(first_pass.highest_state_index + 2)
        .map_err(|_| capacity())?;
    let mut filling = Filling {
        builder,
        row_mapping,
        deadlocks: Vec::new(),
        fix_deadlocks,
        highest_state: first_pass.highest_state_index,
    };
    let rows = scan::<F>(input, layout, &mut filling)?;

    if !filling.deadlocks.is_empty() && !fix_deadlocks {
        return Err(ParseError::Deadlocks {
            states: filling.deadlocks,
        });
    }
    if rows != first_pass.number_of_choices {
        return Err(ParseError::Inconsistent {
            what: "rows",
            expected: first_pass.number_of_choices,
            found: rows,
        });
    }
    if filling.builder.entry_count() != first_pass.number_of_nonzero_entries {
        return Err(ParseError::Inconsistent {
            what: "entries",
            expected: first_pass.number_of_nonzero_entries,
            found: filling.builder.entry_count(),
        });
    }

    filling.row_mapping.push(rows);
    Ok(ParseResult {
        matrix: filling.builder.build(),
        row_mapping: filling.row_mapping,
        deadlocks: filling.deadlocks,
    })
}

#[cfg(test)]
mod tests {
    use crate::formats::ErrorKind;
    use crate::linalg::{MatrixEntry, fields::rational::Rational};

    use super::*;

    fn transitions(input: &str, fix_deadlocks: bool) -> Result<ParseResult<f64>, ParseError> {
        parse_transitions(input, &ParserSettings::default().with_fix_deadlocks(fix_deadlocks))
    }

    const MDP: &str = "mdp\n0 0 1 0.5\n0 0 2 0.5\n0 1 0 1\n1 0 2 1.0 tau\n\n2 0 2 1\n";

    #[test]
    fn first_pass_sizes_the_matrix() {
        let result = first_pass::<f64>(MDP, Layout::Transitions).unwrap();
        assert_eq!(
            result,
            FirstPassResult {
                highest_state_index: 2,
                number_of_nonzero_entries: 5,
                number_of_choices: 4,
            }
        );
    }

    #[test]
    fn parses_nondeterministic_transitions() {
        let result = transitions(MDP, false).unwrap();
        let matrix = &result.matrix;
        assert_eq!(matrix.row_count(), 4);
        assert_eq!(matrix.column_count(), 3);
        assert_eq!(matrix.entry_count(), 5);
        assert_eq!(result.row_mapping, vec![0, 2, 3, 4]);
        assert_eq!(matrix.row_group_indications(), Some(&result.row_mapping[..]));
        assert_eq!(
            matrix.row(0),
            &[MatrixEntry::new(1, 0.5), MatrixEntry::new(2, 0.5)]
        );
        assert_eq!(matrix.row(1), &[MatrixEntry::new(0, 1.0)]);
        assert_eq!(matrix.row_group(1), &[MatrixEntry::new(2, 1.0)]);
        assert!(result.deadlocks.is_empty());
        assert!(matrix.is_stochastic());
    }

    #[test]
    fn fixes_deadlocks_with_self_loops() {
        let result = transitions("0 0 1 1.0\n2 0 0 1.0\n", true).unwrap();
        assert_eq!(result.deadlocks, vec![1]);
        assert_eq!(result.row_mapping, vec![0, 1, 2, 3]);
        assert_eq!(result.matrix.row(1), &[MatrixEntry::new(1, 1.0)]);
        assert_eq!(result.matrix.row_group(1), &[MatrixEntry::new(1, 1.0)]);
    }

    #[test]
    fn rejects_deadlocks_after_reporting_all() {
        let err = transitions("0 0 1 1.0\n2 0 0 1.0\n", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);

        let err = transitions("0 0 4 1.0\n2 0 0 1.0\n", false).unwrap_err();
        match err {
            ParseError::Deadlocks { states } => assert_eq!(states, vec![1, 3, 4]),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn fixes_leading_and_trailing_deadlocks() {
        let result = transitions("1 0 3 1\n", true).unwrap();
        assert_eq!(result.deadlocks, vec![0, 2, 3]);
        assert_eq!(result.row_mapping, vec![0, 1, 2, 3, 4]);
        assert_eq!(result.matrix.row(0), &[MatrixEntry::new(0, 1.0)]);
        assert_eq!(result.matrix.row(1), &[MatrixEntry::new(3, 1.0)]);
        assert_eq!(result.matrix.row(3), &[MatrixEntry::new(3, 1.0)]);
        assert_eq!(result.matrix.column_count(), 4);
    }

    #[test]
    fn probabilities_must_be_bounded() {
        for input in ["0 0 0 1.5\n", "0 0 0 -0.1\n"] {
            match transitions(input, true) {
                Err(ParseError::Format { line, .. }) => assert_eq!(line, 1),
                other => panic!("unexpected result {other:?}"),
            }
        }
    }

    #[test]
    fn sources_must_not_decrease() {
        match transitions("2 0 0 1.0\n1 0 0 1.0\n", true) {
            Err(ParseError::Format { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("smaller than the last one 2"));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn choices_must_not_decrease() {
        let err = transitions("0 1 0 1.0\n0 0 0 1.0\n", true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn choices_are_numbered_densely() {
        for (input, expected_line) in [
            ("0 0 0 1\n0 2 0 1\n", 2),
            ("0 1 0 1\n", 1),
            ("0 0 1 1\n1 1 0 1\n", 2),
            ("0 0 2 1\n2 1 0 1\n", 2),
        ] {
            match transitions(input, true) {
                Err(ParseError::Format { line, message }) => {
                    assert_eq!(line, expected_line, "{input:?}");
                    assert!(message.contains("Expected choice"), "{message}");
                }
                other => panic!("unexpected result {other:?} for {input:?}"),
            }
        }
    }

    #[test]
    fn state_indices_must_be_addressable() {
        let input = format!("0 0 {} 1\n", usize::MAX);
        match transitions(&input, true) {
            Err(ParseError::Format { line, .. }) => assert_eq!(line, 1),
            other => panic!("unexpected result {other:?}"),
        }
        let input = format!("{} 0 0 1\n", MAX_STATES);
        assert_eq!(transitions(&input, true).unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn oversized_matrices_are_rejected_before_filling() {
        let input = format!("0 0 {} 1\n", MAX_STATES - 1);
        let err = transitions(&input, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capacity);
        let err = transitions(&input, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capacity);
    }

    #[test]
    fn malformed_tokens() {
        for input in ["0 0 x 1.0\n", "0 0 0\n", "0 0 0 0,5\n", "0 -1 0 1\n"] {
            assert_eq!(
                transitions(input, true).unwrap_err().kind(),
                ErrorKind::Format,
                "{input:?}"
            );
        }
    }

    #[test]
    fn empty_input() {
        assert!(matches!(transitions("", true), Err(ParseError::Empty)));
        assert!(matches!(transitions("mdp\n\n", true), Err(ParseError::Empty)));
    }

    #[test]
    fn exact_rational_values() {
        let result = parse_transitions::<Rational>(
            "0 0 0 1/3\n0 0 1 2/3\n1 0 1 1\n",
            &ParserSettings::default(),
        )
        .unwrap();
        assert_eq!(result.matrix.row(0)[0].value.to_string(), "1/3");
        assert!(result.matrix.is_stochastic());
    }

    /// Three states with two choices each.
    fn reference() -> ParseResult<f64> {
        let input = "0 0 1 1\n0 1 2 1\n1 0 2 1\n1 1 0 1\n2 0 0 1\n2 1 1 1\n";
        transitions(input, false).unwrap()
    }

    #[test]
    fn rewards_align_to_transitions() {
        let reference = reference();
        assert_eq!(reference.row_mapping, vec![0, 2, 4, 6]);

        let rewards = parse_rewards::<f64, _>("0 1 2 5\n2 0 0 3.5\n", &reference).unwrap();
        assert_eq!(rewards.matrix.row_count(), 6);
        assert_eq!(rewards.matrix.column_count(), 3);
        assert_eq!(rewards.row_mapping, reference.row_mapping);
        assert_eq!(
            rewards.matrix.row_group_indications(),
            reference.matrix.row_group_indications()
        );
        assert!(rewards.matrix.row(0).is_empty());
        assert_eq!(rewards.matrix.row(1), &[MatrixEntry::new(2, 5.0)]);
        assert!(rewards.matrix.row_group(1).is_empty());
        assert_eq!(rewards.matrix.row(4), &[MatrixEntry::new(0, 3.5)]);
        assert!(rewards.matrix.row(5).is_empty());
    }

    #[test]
    fn rewards_outside_the_reference_are_range_errors() {
        let reference = reference();
        for input in ["2 2 0 1\n", "3 0 0 1\n", "0 0 3 1\n"] {
            let err = parse_rewards::<f64, _>(input, &reference).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Range, "{input:?}");
        }
    }

    #[test]
    fn reward_targets_are_checked_on_every_line() {
        let reference = reference();
        for input in [
            "0 0 1 1\n0 0 7 1\n".to_owned(),
            format!("0 0 {} 1\n", MAX_STATES - 1),
        ] {
            let err = parse_rewards::<f64, _>(&input, &reference).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Range, "{input:?}");
        }
        let input = format!("0 0 {} 1\n", usize::MAX);
        assert_eq!(
            parse_rewards::<f64, _>(&input, &reference).unwrap_err().kind(),
            ErrorKind::Format
        );
    }

    #[test]
    fn rewards_address_the_declared_choices() {
        let reference = transitions("0 0 0 1\n0 1 1 1\n1 0 1 1\n", false).unwrap();
        assert_eq!(reference.row_mapping, vec![0, 2, 3]);

        let rewards = parse_rewards::<f64, _>("0 1 1 5\n", &reference).unwrap();
        assert!(rewards.matrix.row(0).is_empty());
        assert_eq!(rewards.matrix.row(1), &[MatrixEntry::new(1, 5.0)]);

        let err = parse_rewards::<f64, _>("0 2 0 5\n", &reference).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn rewards_with_too_many_entries_are_range_errors() {
        let reference = transitions("0 0 0 1\n", false).unwrap();
        let err = parse_rewards::<f64, _>("0 0 0 1\n0 0 0 2\n", &reference).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn rewards_must_not_be_negative() {
        let reference = reference();
        assert!(parse_rewards::<f64, _>("0 0 1 0\n0 1 2 7\n", &reference).is_ok());
        let err = parse_rewards::<f64, _>("0 0 1 -1\n", &reference).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
