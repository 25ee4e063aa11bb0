//! Undo engine: roll back the most recent step.

use crate::model::{Database, LogEntry, NodeId};
use crate::{Error, Result};

/// What an undo removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoReport {
    pub entry: LogEntry,
    /// Set when the undone step was the one that created the newest node.
    pub deleted_node: Option<NodeId>,
}

/// Pop the last log entry, and the node it created if nothing was built on it.
///
/// A node is deleted only when it is the newest one and no remaining log
/// entry refers to it; a step that re-entered a known node leaves the map
/// alone. Passages that led to a deleted node become unexplored again. The
/// root entry is never removed.
pub fn undo(db: &mut Database) -> Result<UndoReport> {
    if db.log.len() <= 1 {
        return Err(Error::NothingToUndo);
    }
    let entry = db.log.pop().ok_or(Error::NothingToUndo)?;

    let created_by_entry = entry.node != NodeId::ROOT
        && Some(entry.node) == db.last_node_id()
        && !db.log.iter().any(|e| e.node == entry.node);

    let deleted_node = if created_by_entry {
        db.nodes.pop();
        for node in &mut db.nodes {
            for target in node.branches.values_mut() {
                if *target == Some(entry.node) {
                    *target = None;
                }
            }
        }
        tracing::info!(node = %entry.node, "deleted last node");
        Some(entry.node)
    } else {
        None
    };

    Ok(UndoReport { entry, deleted_node })
}
