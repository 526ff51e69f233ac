//! Path-addressed binary tree
//!
//! Values are attached to nodes addressed by [`TreePath`]s. Nodes along a
//! path are created lazily; the ones nobody assigned a value stay
//! structural until a later insertion fills them.
//!
//! The tree remembers every path it has seen (plus all prefixes) so that
//! gaps can be found and reported without walking the whole structure.

mod node;
mod render;
mod traversal;
mod validate;

pub use node::Node;
pub use render::Sideways;
pub use traversal::{descend, Direction, Walk};
pub use validate::{ValidationIssue, ValidationReport};

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::{debug, warn};

use crate::path::{PathError, TreePath};

/// Value held by the root (path `""`)
pub const ROOT_VALUE: i64 = 0;

/// What a successful insertion did to its target node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Node did not exist and was created with the value
    Created,

    /// Structural node received its first value
    Assigned,

    /// Node already held the same value
    Unchanged,
}

/// Errors produced by insertion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    /// Target node already holds a different value
    #[error("conflict at node '{path}': {value} != {existing}")]
    Conflict {
        /// Target path
        path: TreePath,
        /// Value that was refused
        value: i64,
        /// Value the node keeps
        existing: i64,
    },

    /// Raw path text did not parse
    #[error("invalid path: {0}")]
    Path(#[from] PathError),
}

/// Binary tree built from `(value, path)` insertions
#[derive(Debug)]
pub struct PathTree {
    /// Root node, value fixed at [`ROOT_VALUE`]
    root: Node,

    /// Every inserted path and all of its prefixes
    known: BTreeSet<TreePath>,

    /// Gaps found by the last [`PathTree::find_missing_ancestors`] call
    missing: BTreeSet<TreePath>,

    /// Conflicts refused so far, oldest first
    conflicts: Vec<InsertError>,
}

impl PathTree {
    /// Create a tree holding only the root
    pub fn new() -> Self {
        Self {
            root: Node::with_value(ROOT_VALUE),
            known: BTreeSet::new(),
            missing: BTreeSet::new(),
            conflicts: Vec::new(),
        }
    }

    /// Attach `value` to the node at `path`
    ///
    /// Intermediate nodes are created as structural placeholders. A node
    /// that already holds a different value is left untouched and the
    /// conflict is logged and returned. `path` and all of its prefixes
    /// become known even when the insertion conflicts.
    pub fn insert(&mut self, value: i64, path: &TreePath) -> Result<InsertOutcome, InsertError> {
        self.known.extend(path.prefixes());

        let mut current = &mut self.root;
        for direction in path.directions().take(path.len() - 1) {
            current = current.child_or_insert(direction);
        }

        let slot = current.child_slot(path.last());
        let created = slot.is_none();
        let node = slot.get_or_insert_with(|| Box::new(Node::structural()));

        let outcome = match node.value() {
            None => {
                node.set_value(value);
                if created {
                    InsertOutcome::Created
                } else {
                    InsertOutcome::Assigned
                }
            }
            Some(existing) if existing == value => InsertOutcome::Unchanged,
            Some(existing) => {
                let err = InsertError::Conflict {
                    path: path.clone(),
                    value,
                    existing,
                };
                warn!(%path, value, existing, "Refusing conflicting value");
                self.conflicts.push(err.clone());
                return Err(err);
            }
        };

        debug!(%path, value, ?outcome, "Inserted value");
        Ok(outcome)
    }

    /// Parse `path` and insert; malformed text never touches the tree
    pub fn insert_str(&mut self, value: i64, path: &str) -> Result<InsertOutcome, InsertError> {
        let path = TreePath::parse(path)?;
        self.insert(value, &path)
    }

    /// Node at `path`, which may be structural
    pub fn lookup(&self, path: &TreePath) -> Option<&Node> {
        descend(&self.root, path)
    }

    /// Value at `path`, if the node exists and has one
    pub fn value_at(&self, path: &TreePath) -> Option<i64> {
        self.lookup(path).and_then(Node::value)
    }

    /// Recompute the set of ancestors that have no value
    ///
    /// Every strict prefix of every known path whose node is absent or
    /// structural ends up in the result. The scan always starts from
    /// scratch; only the cached set is updated.
    pub fn find_missing_ancestors(&mut self) -> &BTreeSet<TreePath> {
        let mut missing = BTreeSet::new();
        for path in &self.known {
            for ancestor in path.ancestors() {
                let valued = self.lookup(&ancestor).is_some_and(Node::has_value);
                if !valued {
                    missing.insert(ancestor);
                }
            }
        }

        debug!(known = self.known.len(), missing = missing.len(), "Scanned for missing ancestors");
        self.missing = missing;
        &self.missing
    }

    /// Root node
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Known paths, shortest first
    pub fn known_paths(&self) -> &BTreeSet<TreePath> {
        &self.known
    }

    /// Result of the last missing-ancestor scan
    pub fn missing_paths(&self) -> &BTreeSet<TreePath> {
        &self.missing
    }

    /// Conflicts refused so far
    pub fn conflicts(&self) -> &[InsertError] {
        &self.conflicts
    }

    /// Latest refused conflict
    pub fn last_conflict(&self) -> Option<&InsertError> {
        self.conflicts.last()
    }

    /// Number of valued nodes below the root
    pub fn len(&self) -> usize {
        Walk::new(&self.root)
            .filter(|(_, node)| node.has_value())
            .count()
    }

    /// Whether no path has been seen yet
    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Sideways text rendering
    pub fn sideways(&self) -> Sideways<'_> {
        Sideways::new(&self.root)
    }
}
