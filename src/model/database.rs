//! The exploration database: node sequence plus visit log.

use chrono::NaiveDateTime;

use super::{Direction, LogEntry, Node, NodeId};
use crate::{Error, Result};

/// Description given to the root node by [`Database::begin`].
pub const ROOT_DESCRIPTION: &str = "root node";

/// Whole-map state owned by one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    pub nodes: Vec<Node>,
    pub log: Vec<LogEntry>,
}

/// A resolved edge `(from, dir, to)` whose reverse slot on `to` points elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymmetryViolation {
    pub from: NodeId,
    pub dir: Direction,
    pub to: NodeId,
    pub found: Option<NodeId>,
}

impl Database {
    /// A fresh map: the root node with one unexplored passage ahead.
    pub fn begin(now: NaiveDateTime) -> Self {
        Self {
            nodes: vec![Node::with_branches([Direction::Forward]).with_description(ROOT_DESCRIPTION)],
            log: vec![LogEntry::new(NodeId::ROOT, Direction::Forward, now)],
        }
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| Error::NotFound(format!("Node {id}")))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| Error::NotFound(format!("Node {id}")))
    }

    pub fn last_entry(&self) -> Result<&LogEntry> {
        self.log
            .last()
            .ok_or_else(|| Error::NotFound("log entry (log is empty)".into()))
    }

    /// Absolute direction the explorer currently faces.
    pub fn facing(&self) -> Result<Direction> {
        Ok(self.last_entry()?.afterturn)
    }

    /// Node the explorer last stood at.
    pub fn current_node(&self) -> Result<NodeId> {
        Ok(self.last_entry()?.node)
    }

    pub fn next_node_id(&self) -> NodeId {
        NodeId(self.nodes.len())
    }

    pub fn last_node_id(&self) -> Option<NodeId> {
        self.nodes.len().checked_sub(1).map(NodeId)
    }

    pub fn push_node(&mut self, node: Node) -> NodeId {
        let id = self.next_node_id();
        self.nodes.push(node);
        id
    }

    pub fn append_log(&mut self, entry: LogEntry) {
        self.log.push(entry);
    }

    pub fn iter_nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// First node whose `dir` passage already leads to `target`.
    pub fn find_linked(&self, dir: Direction, target: NodeId) -> Option<NodeId> {
        self.iter_nodes()
            .find(|(_, node)| node.branch(dir) == Some(target))
            .map(|(id, _)| id)
    }

    /// Number of passages still unexplored across the whole map.
    pub fn unexplored_count(&self) -> usize {
        self.nodes.iter().map(|n| n.unexplored().count()).sum()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges().count()).sum()
    }

    /// Resolved edges whose reverse side is known but disagrees.
    ///
    /// A reverse slot that is missing or still unexplored is not a
    /// violation: the other side may simply not have been walked yet.
    pub fn symmetry_violations(&self) -> Vec<SymmetryViolation> {
        let mut out = Vec::new();
        for (from, node) in self.iter_nodes() {
            for (dir, to) in node.edges() {
                let found = self.nodes.get(to.0).and_then(|n| n.branch(dir.opposite()));
                if found.is_some_and(|back| back != from) {
                    out.push(SymmetryViolation { from, dir, to, found });
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-05-01T10:00:00", "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn test_begin_creates_root() {
        let db = Database::begin(now());
        assert_eq!(db.nodes.len(), 1);
        assert_eq!(db.nodes[0].description, ROOT_DESCRIPTION);
        assert!(db.nodes[0].is_unexplored(Direction::Forward));
        assert_eq!(db.current_node().unwrap(), NodeId::ROOT);
        assert_eq!(db.facing().unwrap(), Direction::Forward);
        assert_eq!(db.unexplored_count(), 1);
    }

    #[test]
    fn test_find_linked() {
        let mut db = Database::begin(now());
        let mut node = Node::with_branches([Direction::Backward]);
        node.link(Direction::Backward, NodeId::ROOT);
        let id = db.push_node(node);
        assert_eq!(id, NodeId(1));
        assert_eq!(db.find_linked(Direction::Backward, NodeId::ROOT), Some(id));
        assert_eq!(db.find_linked(Direction::Left, NodeId::ROOT), None);
    }

    #[test]
    fn test_symmetry_violation_detected() {
        let mut db = Database::begin(now());
        let mut a = Node::with_branches([Direction::Backward]);
        a.link(Direction::Backward, NodeId::ROOT);
        db.push_node(a);
        db.push_node(Node::with_branches([Direction::Backward]));
        db.nodes[0].link(Direction::Forward, NodeId(1));
        assert!(db.symmetry_violations().is_empty());

        // Node 1 still claims root via backward, but root forward is node 2.
        db.nodes[0].link(Direction::Forward, NodeId(2));
        let violations = db.symmetry_violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].from, NodeId(1));
        assert_eq!(violations[0].found, Some(NodeId(2)));

        db.nodes[2].link(Direction::Backward, NodeId(1));
        let violations = db.symmetry_violations();
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_missing_node_is_not_found() {
        let db = Database::begin(now());
        assert!(matches!(db.node(NodeId(9)), Err(Error::NotFound(_))));
    }
}
