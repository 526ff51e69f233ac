//! # Path-addressed binary trees
//!
//! Builds a binary tree from `(value, path)` records, where a path is a
//! string of `'0'`/`'1'` bits describing a left/right descent from the root,
//! and validates that every node on every inserted path carries a value.
//!
//! ## Pipeline
//!
//! 1. **Normalize**: each text line `"<value> <path>"` is checked and parsed
//! 2. **Insert**: values land on their node; intermediate nodes are created
//!    as valueless placeholders, conflicting values are refused
//! 3. **Resolve gaps**: valueless ancestors are requested from a [`ValueSource`]
//! 4. **Validate**: an ordered [`ValidationReport`] lists whatever is still wrong
//!
//! ## Usage Example
//!
//! ```
//! use pathtree::{PathTree, TreePath};
//!
//! let mut tree = PathTree::new();
//! tree.insert(5, &"01".parse::<TreePath>()?).unwrap();
//!
//! let missing: Vec<String> = tree
//!     .find_missing_ancestors()
//!     .iter()
//!     .map(ToString::to_string)
//!     .collect();
//! assert_eq!(missing, ["0"]);
//!
//! tree.insert(7, &"0".parse::<TreePath>()?).unwrap();
//! assert!(tree.validate().is_clean());
//! # Ok::<(), pathtree::PathError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod path;    // Validated bit paths
pub mod tree;    // Tree storage, insertion and validation
pub mod ingest;  // Record normalization and gap resolution
pub mod console; // Line-oriented terminal front end

pub use console::{Console, MenuExit};
pub use ingest::{
    Coordinator, GapValueError, LineOutcome, Phase, Record, RecordError, SourceError, ValueSource,
};
pub use path::{PathError, TreePath};
pub use tree::{
    Direction, InsertError, InsertOutcome, Node, PathTree, Sideways, ValidationIssue,
    ValidationReport, Walk, ROOT_VALUE,
};

use thiserror::Error;

/// Configuration for one tree-building session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Word that ends interactive input (compared case-insensitively)
    pub sentinel: String,

    /// Print session statistics alongside the report
    pub verbose: bool,

    /// Marker printed in front of each reported issue
    pub bullet: char,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sentinel: "end".to_string(),
            verbose: false,
            bullet: '•',
        }
    }
}

impl SessionConfig {
    /// Replace the end-of-input sentinel
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    /// Enable or disable statistics output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Replace the issue bullet
    pub fn with_bullet(mut self, bullet: char) -> Self {
        self.bullet = bullet;
        self
    }

    /// Whether `line` is the end-of-input sentinel
    pub fn is_sentinel(&self, line: &str) -> bool {
        line.trim().eq_ignore_ascii_case(&self.sentinel)
    }
}

/// Errors that can end a session or one of its ingestion attempts
#[derive(Error, Debug)]
pub enum SessionError {
    /// Operation requested in the wrong session phase
    #[error("cannot {operation} while the session is {phase}")]
    Phase {
        /// Operation that was refused
        operation: &'static str,
        /// Phase the session was in
        phase: Phase,
    },

    /// Input source failed or ran dry
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Tree refused a value the session had to store
    #[error("tree refused a resolved value: {0}")]
    Tree(#[from] InsertError),
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::Source(SourceError::Io(err))
    }
}
