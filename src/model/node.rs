//! Node (a recorded location) in the exploration graph.

use std::collections::{BTreeMap, BTreeSet};

use super::Direction;

/// Node identifier: the node's position in the node sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A physical location with up to four passages.
///
/// Each key of `branches` is an absolute direction with a passage; the
/// value is the node on the other side, or `None` while unexplored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node {
    pub branches: BTreeMap<Direction, Option<NodeId>>,
    pub description: String,
}

impl Node {
    /// A node with every given direction unexplored.
    pub fn with_branches(dirs: impl IntoIterator<Item = Direction>) -> Self {
        Self {
            branches: dirs.into_iter().map(|d| (d, None)).collect(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Link `dir` to `target`, adding the passage if it was not recorded.
    pub fn link(&mut self, dir: Direction, target: NodeId) {
        self.branches.insert(dir, Some(target));
    }

    pub fn branch(&self, dir: Direction) -> Option<NodeId> {
        self.branches.get(&dir).copied().flatten()
    }

    pub fn has_branch(&self, dir: Direction) -> bool {
        self.branches.contains_key(&dir)
    }

    pub fn is_unexplored(&self, dir: Direction) -> bool {
        matches!(self.branches.get(&dir), Some(None))
    }

    pub fn directions(&self) -> BTreeSet<Direction> {
        self.branches.keys().copied().collect()
    }

    pub fn unexplored(&self) -> impl Iterator<Item = Direction> + '_ {
        self.branches
            .iter()
            .filter(|(_, target)| target.is_none())
            .map(|(d, _)| *d)
    }

    /// Resolved passages as `(direction, target)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (Direction, NodeId)> + '_ {
        self.branches
            .iter()
            .filter_map(|(d, target)| target.map(|t| (*d, t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_and_query() {
        let mut node = Node::with_branches([Direction::Backward, Direction::Right]);
        assert!(node.is_unexplored(Direction::Right));
        assert!(!node.has_branch(Direction::Left));

        node.link(Direction::Backward, NodeId(3));
        assert_eq!(node.branch(Direction::Backward), Some(NodeId(3)));
        assert_eq!(node.unexplored().collect::<Vec<_>>(), vec![Direction::Right]);
        assert_eq!(node.edges().count(), 1);
    }
}
