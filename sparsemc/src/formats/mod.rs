//! Input file formats.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use log::{error, info};
use thiserror::Error;

use crate::linalg::{fields::PseudoField, sparse::SparseMatrix};

pub mod tra;

/// The different kinds of [`ParseError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The file could not be read.
    Io,
    /// The file is malformed.
    Format,
    /// A reward file does not fit the transition matrix it refers to.
    Range,
    /// The matrix described by the file does not fit into memory.
    Capacity,
    /// The two passes of the parser disagree.
    Internal,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Line {line}: {message}")]
    Format { line: usize, message: String },
    #[error("The input contains no transitions.")]
    Empty,
    #[error(
        "{} state(s) have no outgoing transitions, the first one is {}. Enable deadlock fixing to insert self-loops.",
        .states.len(),
        .states.first().copied().unwrap_or_default()
    )]
    Deadlocks { states: Vec<usize> },
    #[error("{0}")]
    Range(String),
    #[error("Unable to allocate a matrix of size {rows} x {columns} with {entries} entries.")]
    Capacity {
        rows: usize,
        columns: usize,
        entries: usize,
    },
    #[error("The second pass produced {found} {what} but the first pass reserved {expected}.")]
    Inconsistent {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Io { .. } => ErrorKind::Io,
            ParseError::Format { .. } | ParseError::Empty | ParseError::Deadlocks { .. } => {
                ErrorKind::Format
            }
            ParseError::Range(_) => ErrorKind::Range,
            ParseError::Capacity { .. } => ErrorKind::Capacity,
            ParseError::Inconsistent { .. } => ErrorKind::Internal,
        }
    }
}

/// Options for parsing transition files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParserSettings {
    /// Insert a self-loop for every state without outgoing transitions instead of
    /// rejecting the file.
    pub fix_deadlocks: bool,
}

impl ParserSettings {
    pub fn with_fix_deadlocks(mut self, fix_deadlocks: bool) -> Self {
        self.fix_deadlocks = fix_deadlocks;
        self
    }
}

/// A parsed transition or reward matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseResult<F> {
    /// The matrix with one row group per state.
    pub matrix: SparseMatrix<F>,
    /// The first row of every state followed by the number of rows.
    pub row_mapping: Vec<usize>,
    /// States for which a self-loop has been inserted.
    pub deadlocks: Vec<usize>,
}

impl<F> ParseResult<F> {
    pub fn state_count(&self) -> usize {
        self.row_mapping.len() - 1
    }
}

/// Reads and parses the transition file at *path*.
pub fn read_transitions<F: PseudoField>(
    path: impl AsRef<Path>,
    settings: &ParserSettings,
) -> Result<ParseResult<F>, ParseError> {
    let path = path.as_ref();
    let source = read(path)?;
    info!("Parsing transitions from {}.", path.display());
    tra::parse_transitions(&source, settings)
        .inspect_err(|err| error!("Error while parsing {}: {err}", path.display()))
}

/// Reads and parses the reward file at *path* whose rows are aligned to *reference*.
pub fn read_rewards<F: PseudoField, G: PseudoField>(
    path: impl AsRef<Path>,
    reference: &ParseResult<G>,
) -> Result<ParseResult<F>, ParseError> {
    let path = path.as_ref();
    let source = read(path)?;
    info!("Parsing transition rewards from {}.", path.display());
    tra::parse_rewards(&source, reference)
        .inspect_err(|err| error!("Error while parsing {}: {err}", path.display()))
}

fn read(path: &Path) -> Result<String, ParseError> {
    std::fs::read_to_string(path).map_err(|source| {
        error!(
            "Error while parsing {}: File does not exist or is not readable.",
            path.display()
        );
        ParseError::Io {
            path: path.to_owned(),
            source,
        }
    })
}

/// Tokenizer for a single line of input.
pub(crate) struct Cursor<'i> {
    tail: &'i str,
    line: usize,
}

impl<'i> Cursor<'i> {
    pub fn new(input: &'i str, line: usize) -> Self {
        let mut this = Self { tail: input, line };
        this.consume_whitespace();
        this
    }

    fn error(&self, message: String) -> ParseError {
        ParseError::Format {
            line: self.line,
            message,
        }
    }

    pub fn consume_whitespace(&mut self) {
        self.tail = self.tail.trim_start()
    }

    /// Consumes *tag* if the input continues with it.
    pub fn try_consume_tag(&mut self, tag: &str) -> bool {
        match self.tail.strip_prefix(tag) {
            Some(tail) => {
                self.tail = tail;
                self.consume_whitespace();
                true
            }
            None => false,
        }
    }

    /// Consumes a numeric token. The token has to be followed by whitespace, the end of
    /// the line, or a `/`.
    pub fn consume_number(&mut self) -> Result<&'i str, ParseError> {
        let length = self
            .tail
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+')))
            .unwrap_or(self.tail.len());
        let rest = &self.tail[length..];
        if length == 0 || rest.starts_with(|c: char| !c.is_whitespace() && c != '/') {
            return Err(self.error(format!("Expected number but found `{}`.", self.tail)));
        }
        let number = &self.tail[..length];
        self.tail = rest;
        self.consume_whitespace();
        Ok(number)
    }

    pub fn consume_usize(&mut self) -> Result<usize, ParseError> {
        let number = self.consume_number()?;
        usize::from_str(number)
            .map_err(|_| self.error(format!("Unable to convert number {number} to usize.")))
    }

    /// Consumes a value written as a decimal number or as a fraction `n/d`.
    pub fn consume_rational<F: PseudoField>(&mut self) -> Result<F, ParseError> {
        let numerator = self.consume_number()?;
        let denominator = if self.try_consume_tag("/") {
            self.consume_number()?
        } else {
            "1"
        };
        F::from_rational(numerator, denominator).ok_or_else(|| {
            self.error(format!(
                "Unable to convert {numerator}/{denominator} to a number."
            ))
        })
    }
}
