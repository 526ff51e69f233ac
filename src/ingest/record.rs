//! Record normalization
//!
//! A record line is `"<value> <path>"`: exactly two whitespace-separated
//! tokens, an `i64` followed by a path over `{0, 1}`.

use thiserror::Error;

use crate::path::{PathError, TreePath};

/// Parsed `(value, path)` record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Value to attach
    pub value: i64,
    /// Target node
    pub path: TreePath,
    /// Line counter value the record was read at
    pub line: usize,
}

/// Reasons a line is rejected before reaching the tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Line did not split into exactly two tokens
    #[error("format error on line {line}: expected `<value> <path>`, found {tokens} token(s)")]
    Format {
        /// Line number
        line: usize,
        /// Number of tokens found
        tokens: usize,
    },

    /// Second token is not a valid path
    #[error("invalid path on line {line}: {source}")]
    InvalidPath {
        /// Line number
        line: usize,
        /// Parse failure
        source: PathError,
    },

    /// First token is not an integer
    #[error("non-numeric value on line {line}: '{token}'")]
    NonNumeric {
        /// Line number
        line: usize,
        /// Token that failed to parse
        token: String,
    },
}

impl RecordError {
    /// Line the error refers to
    pub fn line(&self) -> usize {
        match self {
            RecordError::Format { line, .. }
            | RecordError::InvalidPath { line, .. }
            | RecordError::NonNumeric { line, .. } => *line,
        }
    }
}

/// Parse one raw line
///
/// Blank lines yield `Ok(None)`. The path is checked before the value, so
/// a line wrong in both places reports the path.
pub fn normalize(line: usize, raw: &str) -> Result<Option<Record>, RecordError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let [value, path] = tokens[..] else {
        return Err(RecordError::Format {
            line,
            tokens: tokens.len(),
        });
    };

    let path = TreePath::parse(path).map_err(|source| RecordError::InvalidPath { line, source })?;
    let value = value.parse::<i64>().map_err(|_| RecordError::NonNumeric {
        line,
        token: value.to_string(),
    })?;

    Ok(Some(Record { value, path, line }))
}
