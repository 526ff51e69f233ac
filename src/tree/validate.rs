//! Whole-tree integrity check
//!
//! Validation never fails: every problem becomes a [`ValidationIssue`]
//! and the ordered list is handed back to the caller.

use std::fmt;

use tracing::info;

use super::{Node, PathTree, ROOT_VALUE};
use crate::path::TreePath;

/// One problem found by [`PathTree::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ValidationIssue {
    /// Root does not hold [`ROOT_VALUE`]
    RootIntegrity {
        /// Value found at the root
        found: Option<i64>,
    },

    /// Known path whose node is absent or structural
    NodeWithoutValue(TreePath),

    /// Ancestor of a known path that never received a value
    MissingIntermediate(TreePath),
}

impl ValidationIssue {
    /// Path the issue refers to (`None` for the root)
    pub fn path(&self) -> Option<&TreePath> {
        match self {
            ValidationIssue::RootIntegrity { .. } => None,
            ValidationIssue::NodeWithoutValue(path)
            | ValidationIssue::MissingIntermediate(path) => Some(path),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::RootIntegrity { found: Some(found) } => {
                write!(f, "root holds {found}, expected {ROOT_VALUE}")
            }
            ValidationIssue::RootIntegrity { found: None } => {
                write!(f, "root has no value, expected {ROOT_VALUE}")
            }
            ValidationIssue::NodeWithoutValue(path) => write!(f, "node '{path}' has no value"),
            ValidationIssue::MissingIntermediate(path) => {
                write!(f, "missing intermediate node '{path}'")
            }
        }
    }
}

/// Ordered validation result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// No issues at all
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of issues
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Same as [`ValidationReport::is_clean`]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues in report order
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Iterate over issues in report order
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationIssue> {
        self.issues.iter()
    }

    /// Issue messages in report order
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// One `"<bullet> <message>"` line per issue
    pub fn render(&self, bullet: char) -> String {
        self.issues
            .iter()
            .map(|issue| format!("{bullet} {issue}\n"))
            .collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render('•'))
    }
}

impl IntoIterator for ValidationReport {
    type Item = ValidationIssue;
    type IntoIter = std::vec::IntoIter<ValidationIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a ValidationIssue;
    type IntoIter = std::slice::Iter<'a, ValidationIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}

impl PathTree {
    /// Check the whole tree
    ///
    /// Order of the report:
    /// 1. root integrity
    /// 2. known paths without a value, shortest first
    /// 3. missing intermediate nodes, shortest first
    ///
    /// Only the missing-ancestor cache is refreshed; the tree is not touched.
    pub fn validate(&mut self) -> ValidationReport {
        let mut issues = Vec::new();

        if self.root.value() != Some(ROOT_VALUE) {
            issues.push(ValidationIssue::RootIntegrity {
                found: self.root.value(),
            });
        }

        issues.extend(
            self.known
                .iter()
                .filter(|path| !self.lookup(path).is_some_and(Node::has_value))
                .cloned()
                .map(ValidationIssue::NodeWithoutValue),
        );

        issues.extend(
            self.find_missing_ancestors()
                .iter()
                .cloned()
                .map(ValidationIssue::MissingIntermediate),
        );

        info!(issues = issues.len(), "Validated tree");
        ValidationReport { issues }
    }
}
