//! Gap resolution contract
//!
//! After ingestion, ancestors without a value are requested one by one from
//! a [`ValueSource`]. A response is accepted only once it is a non-empty
//! integer; anything else is reported back and requested again.

use std::collections::BTreeSet;

use thiserror::Error;

use super::SourceError;
use crate::path::TreePath;

/// Why a gap response was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GapValueError {
    /// Nothing but whitespace was supplied
    #[error("value cannot be empty")]
    Empty,

    /// Response is not an `i64`
    #[error("'{0}' is not an integer")]
    NotInteger(String),
}

/// Supplier of values for missing ancestors
pub trait ValueSource {
    /// Called once with the full set of gaps before the first request
    fn announce(&mut self, _missing: &BTreeSet<TreePath>) -> Result<(), SourceError> {
        Ok(())
    }

    /// Produce one raw response for `path`
    ///
    /// Blocks until a response is available. Returning an error abandons
    /// gap resolution altogether.
    fn request(&mut self, path: &TreePath) -> Result<String, SourceError>;

    /// Told that the last response for `path` was refused
    fn rejected(&mut self, _path: &TreePath, _reason: &GapValueError) -> Result<(), SourceError> {
        Ok(())
    }
}

/// Parse a gap response
pub fn parse_gap_value(raw: &str) -> Result<i64, GapValueError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(GapValueError::Empty);
    }
    raw.parse()
        .map_err(|_| GapValueError::NotInteger(raw.to_string()))
}
