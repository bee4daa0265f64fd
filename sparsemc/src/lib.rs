//! Explicit-state storage for probabilistic model checking.
//!
//! The transition relation of a Markov chain or a Markov decision process (MDP) is
//! stored as a [`SparseMatrix`] in row-compressed form. For MDPs the rows are
//! partitioned into *row groups*, one group per state and one row per nondeterministic
//! choice of that state.
//!
//! - [`MatrixBuilder`] constructs matrices row by row.
//! - [`GraphTransitions`] extracts the successor or predecessor relation of a matrix
//!   for graph algorithms.
//! - [`formats::tra`] reads explicit transition and transition-reward lists.
//!
//! ```
//! use sparsemc::{Direction, GraphTransitions, ParserSettings, formats::tra};
//!
//! let input = "0 0 1 0.5\n0 0 2 0.5\n0 1 2 1\n1 0 1 1\n2 0 2 1\n";
//! let result = tra::parse_transitions::<f64>(input, &ParserSettings::default()).unwrap();
//! assert_eq!(result.matrix.row_count(), 4);
//! assert_eq!(result.row_mapping, vec![0, 2, 3, 4]);
//!
//! let backward = GraphTransitions::new(&result.matrix, Direction::Backward);
//! assert_eq!(backward.successors(2), &[0, 0, 2]);
//! ```

pub mod formats;
pub mod graph;
pub mod linalg;

pub use formats::{ParseError, ParseResult, ParserSettings};
pub use graph::{Direction, GraphTransitions};
pub use linalg::{MatrixEntry, builder::MatrixBuilder, sparse::SparseMatrix};
