//! Append-only visit log.

use chrono::NaiveDateTime;

use super::{Direction, NodeId};

/// One explorer step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Node the explorer is standing at.
    pub node: NodeId,
    /// Absolute direction the explorer faces when leaving `node`.
    pub afterturn: Direction,
    pub time_enter: NaiveDateTime,
}

impl LogEntry {
    pub fn new(node: NodeId, afterturn: Direction, time_enter: NaiveDateTime) -> Self {
        Self { node, afterturn, time_enter }
    }
}
