//! Descent along paths and whole-tree walks
//!
//! A direction is one bit: `0` = left child, `1` = right child.
//! Lookups recompute the target node from the root on every call.

use super::Node;
use crate::path::TreePath;

/// Which child a step descends into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Bit `0`
    Left,

    /// Bit `1`
    Right,
}

impl Direction {
    /// Direction encoded by `bit`
    #[inline]
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    /// Bit encoding this direction
    #[inline]
    pub fn bit(self) -> bool {
        matches!(self, Direction::Right)
    }

    /// Direction spelled by `ch`, if it is `'0'` or `'1'`
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '0' => Some(Direction::Left),
            '1' => Some(Direction::Right),
            _ => None,
        }
    }

    /// Text form used in paths
    pub fn as_char(self) -> char {
        match self {
            Direction::Left => '0',
            Direction::Right => '1',
        }
    }
}

/// Follow `path` from `root`; `None` as soon as a child is absent
pub fn descend<'a>(root: &'a Node, path: &TreePath) -> Option<&'a Node> {
    path.directions()
        .try_fold(root, |node, direction| node.child(direction))
}

/// Pre-order walk over every node below the root
///
/// Yields each node together with its path, left subtree before right.
/// Stack depth is bounded by tree height.
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<(TreePath, &'a Node)>,
}

impl<'a> Walk<'a> {
    /// Start below `root` (the root itself is not yielded)
    pub fn new(root: &'a Node) -> Self {
        let mut walk = Self { stack: Vec::new() };
        walk.push_children(None, root);
        walk
    }

    fn push_children(&mut self, parent: Option<&TreePath>, node: &'a Node) {
        // Right first so left pops first
        for direction in [Direction::Right, Direction::Left] {
            if let Some(child) = node.child(direction) {
                let path = match parent {
                    Some(parent) => parent.child(direction),
                    None => TreePath::step(direction),
                };
                self.stack.push((path, child));
            }
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (TreePath, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        self.push_children(Some(&path), node);
        Some((path, node))
    }
}
