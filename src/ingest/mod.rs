//! Ingestion coordinator
//!
//! Turns raw text lines into tree insertions, asks a [`ValueSource`] for
//! the ancestors nobody supplied, and runs the final validation.
//!
//! Session phases:
//!
//! ```text
//! Idle -> Ingesting -> [GapResolution] -> Validated -> Done
//! ```
//!
//! `GapResolution` is only entered when gaps exist after ingestion. Once
//! [`Coordinator::end_input`] has closed the record stream, no further
//! records are accepted, whatever the phase.

mod gaps;
mod record;

pub use gaps::{parse_gap_value, GapValueError, ValueSource};
pub use record::{normalize, Record, RecordError};

use std::collections::BTreeSet;
use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::path::TreePath;
use crate::tree::{InsertError, InsertOutcome, PathTree, ValidationReport};
use crate::SessionError;

/// Failures of the input side of a session
#[derive(Debug, Error)]
pub enum SourceError {
    /// Batch input could not be opened or read
    #[error("cannot read {}: {source}", path.display())]
    Unavailable {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O failure
        source: io::Error,
    },

    /// Input ended while a response was still required
    #[error("input ended while waiting for {0}")]
    Exhausted(String),

    /// Other read or write failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Where a session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing read yet
    Idle,
    /// Accepting records
    Ingesting,
    /// Filling valueless ancestors
    GapResolution,
    /// Final report produced
    Validated,
    /// Report handed out; session over
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Ingesting => "ingesting",
            Phase::GapResolution => "resolving gaps",
            Phase::Validated => "validated",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Result of feeding one line to the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Whitespace-only line, ignored without counting
    Blank,

    /// Line refused before reaching the tree
    Rejected(RecordError),

    /// Record inserted
    Inserted {
        /// Parsed record
        record: Record,
        /// Effect on the target node
        outcome: InsertOutcome,
    },

    /// Record refused by the tree
    Conflict {
        /// Parsed record
        record: Record,
        /// Conflict raised by the tree
        error: InsertError,
    },
}

/// Owns one tree for the duration of a session
#[derive(Debug)]
pub struct Coordinator {
    tree: PathTree,
    line: usize,
    phase: Phase,
    input_closed: bool,
    report: Option<ValidationReport>,
}

impl Coordinator {
    /// Start an idle session with an empty tree
    pub fn new() -> Self {
        Self {
            tree: PathTree::new(),
            line: 1,
            phase: Phase::Idle,
            input_closed: false,
            report: None,
        }
    }

    /// Tree built so far
    pub fn tree(&self) -> &PathTree {
        &self.tree
    }

    /// Give up the session and keep the tree
    pub fn into_tree(self) -> PathTree {
        self.tree
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number the next non-blank line will be reported under
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// Restart line numbering at 1 (used when an input attempt is abandoned)
    pub fn reset_line_counter(&mut self) {
        self.line = 1;
    }

    fn require(&self, operation: &'static str, allowed: &[Phase]) -> Result<(), SessionError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(SessionError::Phase {
                operation,
                phase: self.phase,
            })
        }
    }

    fn require_open(&self, operation: &'static str) -> Result<(), SessionError> {
        self.require(operation, &[Phase::Idle, Phase::Ingesting])?;
        if self.input_closed {
            return Err(SessionError::Phase {
                operation,
                phase: self.phase,
            });
        }
        Ok(())
    }

    /// Whether [`Coordinator::end_input`] has closed the record stream
    pub fn is_input_closed(&self) -> bool {
        self.input_closed
    }

    fn enter(&mut self, phase: Phase) {
        if self.phase != phase {
            info!(from = %self.phase, to = %phase, "Session phase change");
            self.phase = phase;
        }
    }

    /// Normalize one raw line and insert it
    ///
    /// Every non-blank line advances the line counter, whether it is
    /// inserted, rejected or refused as a conflict.
    pub fn ingest_line(&mut self, raw: &str) -> Result<LineOutcome, SessionError> {
        self.require_open("ingest records")?;
        self.enter(Phase::Ingesting);

        let record = match normalize(self.line, raw) {
            Ok(None) => return Ok(LineOutcome::Blank),
            Ok(Some(record)) => record,
            Err(err) => {
                warn!(line = self.line, error = %err, "Rejected input line");
                self.line += 1;
                return Ok(LineOutcome::Rejected(err));
            }
        };
        self.line += 1;

        debug!(line = record.line, value = record.value, path = %record.path, "Ingesting record");
        Ok(match self.tree.insert(record.value, &record.path) {
            Ok(outcome) => LineOutcome::Inserted { record, outcome },
            Err(error) => LineOutcome::Conflict { record, error },
        })
    }

    /// Feed several lines in order
    pub fn ingest_lines<I, S>(&mut self, lines: I) -> Result<Vec<LineOutcome>, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .map(|line| self.ingest_line(line.as_ref()))
            .collect()
    }

    /// Close the record stream and report the gaps left behind
    ///
    /// Later calls to [`Coordinator::ingest_line`] or `end_input` fail with
    /// [`SessionError::Phase`]; gap resolution and validation stay open.
    pub fn end_input(&mut self) -> Result<&BTreeSet<TreePath>, SessionError> {
        self.require_open("end input")?;
        self.input_closed = true;
        info!(line = self.line, "Record stream closed");
        if !self.tree.find_missing_ancestors().is_empty() {
            self.enter(Phase::GapResolution);
        }
        Ok(self.tree.missing_paths())
    }

    /// Ask `source` for every missing ancestor, shortest path first
    ///
    /// Each path is requested until a well-formed integer arrives; refused
    /// responses go back to the source through [`ValueSource::rejected`].
    /// Only a failing source ends the loop early.
    pub fn resolve_gaps<S>(&mut self, source: &mut S) -> Result<Vec<(TreePath, i64)>, SessionError>
    where
        S: ValueSource + ?Sized,
    {
        self.require(
            "resolve gaps",
            &[Phase::Idle, Phase::Ingesting, Phase::GapResolution],
        )?;

        let missing = self.tree.find_missing_ancestors().clone();
        if missing.is_empty() {
            return Ok(Vec::new());
        }
        self.enter(Phase::GapResolution);
        source.announce(&missing)?;

        let mut filled = Vec::with_capacity(missing.len());
        for path in missing {
            let value = loop {
                let raw = source.request(&path)?;
                match parse_gap_value(&raw) {
                    Ok(value) => break value,
                    Err(reason) => {
                        debug!(%path, error = %reason, "Refused gap value");
                        source.rejected(&path, &reason)?;
                    }
                }
            };

            // The node is valueless, so a conflict here is a tree bug
            self.tree.insert(value, &path)?;
            filled.push((path, value));
        }

        info!(filled = filled.len(), "Resolved missing ancestors");
        Ok(filled)
    }

    /// Run the final validation (once per session)
    pub fn validate(&mut self) -> Result<&ValidationReport, SessionError> {
        self.require(
            "validate",
            &[Phase::Idle, Phase::Ingesting, Phase::GapResolution],
        )?;
        let report = self.tree.validate();
        self.enter(Phase::Validated);
        Ok(self.report.insert(report))
    }

    /// Hand out the validation report and close the session
    pub fn finish(&mut self) -> Result<ValidationReport, SessionError> {
        self.require("finish", &[Phase::Validated])?;
        self.enter(Phase::Done);
        Ok(self.report.take().unwrap_or_default())
    }
}
