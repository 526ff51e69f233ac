//! Tree node representation
//!
//! Node = optional value + two exclusively owned children.
//! A node without a value is structural: it exists only so a deeper
//! path can hang below it.

use std::fmt;

use super::Direction;

/// One position in the tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Assigned value, unset for structural nodes
    value: Option<i64>,

    /// Child at bit `0`
    left: Option<Box<Node>>,

    /// Child at bit `1`
    right: Option<Box<Node>>,
}

impl Node {
    /// Create a valued node without children
    pub fn with_value(value: i64) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    /// Create a structural (valueless) node
    pub fn structural() -> Self {
        Self::default()
    }

    /// Assigned value
    #[inline]
    pub fn value(&self) -> Option<i64> {
        self.value
    }

    /// Whether a value has been assigned
    #[inline]
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Check if leaf (no children at all)
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Child in `direction`, if present
    pub fn child(&self, direction: Direction) -> Option<&Node> {
        match direction {
            Direction::Left => self.left.as_deref(),
            Direction::Right => self.right.as_deref(),
        }
    }

    pub(crate) fn set_value(&mut self, value: i64) {
        self.value = Some(value);
    }

    pub(crate) fn child_slot(&mut self, direction: Direction) -> &mut Option<Box<Node>> {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    /// Child in `direction`, creating a structural one if absent
    pub(crate) fn child_or_insert(&mut self, direction: Direction) -> &mut Node {
        self.child_slot(direction)
            .get_or_insert_with(|| Box::new(Node::structural()))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "{value}"),
            None => f.write_str("?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_node_gains_children_lazily() {
        let mut node = Node::structural();
        assert!(!node.has_value());
        assert!(node.is_leaf());

        node.child_or_insert(Direction::Right).set_value(4);
        assert!(!node.is_leaf());
        assert!(node.child(Direction::Left).is_none());
        assert_eq!(node.child(Direction::Right).and_then(Node::value), Some(4));

        // Existing child is reused, not replaced
        node.child_or_insert(Direction::Right);
        assert_eq!(node.child(Direction::Right).and_then(Node::value), Some(4));
    }

    #[test]
    fn test_display() {
        assert_eq!(Node::with_value(-3).to_string(), "-3");
        assert_eq!(Node::structural().to_string(), "?");
    }
}
