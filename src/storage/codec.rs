//! JSON encoding of the database.
//!
//! Decoding runs in two phases: `serde_json` fills the raw records below
//! with plain strings and integers, then [`RawDatabase::validate`] converts
//! direction names, parses timestamps and checks every reference. Nothing
//! half-decoded ever reaches the model.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::{Database, Direction, LogEntry, Node, NodeId};
use crate::{Error, Result};

/// Timestamp layout written to disk (ISO-8601, local time, no offset).
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDatabase {
    pub nodes: Vec<RawNode>,
    pub log: Vec<RawLogEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub branches: BTreeMap<String, Option<usize>>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLogEntry {
    pub afterturn: String,
    pub time_enter: String,
    pub node: usize,
}

impl From<&Database> for RawDatabase {
    fn from(db: &Database) -> Self {
        Self {
            nodes: db
                .nodes
                .iter()
                .map(|node| RawNode {
                    branches: node
                        .branches
                        .iter()
                        .map(|(d, target)| (d.name().to_string(), target.map(|t| t.0)))
                        .collect(),
                    description: node.description.clone(),
                })
                .collect(),
            log: db
                .log
                .iter()
                .map(|entry| RawLogEntry {
                    afterturn: entry.afterturn.name().to_string(),
                    time_enter: entry.time_enter.format(TIME_FORMAT).to_string(),
                    node: entry.node.0,
                })
                .collect(),
        }
    }
}

impl RawDatabase {
    /// Second decoding phase: turn raw records into a checked [`Database`].
    pub fn validate(self) -> Result<Database> {
        if self.nodes.is_empty() {
            return Err(Error::Load("database has no nodes".into()));
        }
        let node_count = self.nodes.len();
        let check_ref = |index: usize, context: &str| -> Result<NodeId> {
            if index < node_count {
                Ok(NodeId(index))
            } else {
                Err(Error::Load(format!(
                    "{context} refers to node {index}, but only {node_count} exist"
                )))
            }
        };

        let mut nodes = Vec::with_capacity(node_count);
        for (i, raw) in self.nodes.into_iter().enumerate() {
            let mut node = Node::default().with_description(raw.description);
            for (name, target) in raw.branches {
                let dir = parse_direction(&name)?;
                let target = target
                    .map(|t| check_ref(t, &format!("branch {name} of node {i}")))
                    .transpose()?;
                node.branches.insert(dir, target);
            }
            nodes.push(node);
        }

        let mut log = Vec::with_capacity(self.log.len());
        for (i, raw) in self.log.into_iter().enumerate() {
            let node = check_ref(raw.node, &format!("log entry {i}"))?;
            let afterturn = parse_direction(&raw.afterturn)?;
            let time_enter = parse_time(&raw.time_enter)?;
            log.push(LogEntry::new(node, afterturn, time_enter));
        }

        match log.first() {
            None => return Err(Error::Load("log is empty".into())),
            Some(first) if first.node != NodeId::ROOT || first.afterturn != Direction::Forward => {
                return Err(Error::Load(format!(
                    "first log entry must be the root facing forward, found node {} facing {}",
                    first.node, first.afterturn
                )));
            }
            Some(_) => {}
        }

        Ok(Database { nodes, log })
    }
}

fn parse_direction(name: &str) -> Result<Direction> {
    Direction::from_name(name).ok_or_else(|| Error::Load(format!("unknown direction name '{name}'")))
}

fn parse_time(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIME_FORMAT)
        .map_err(|e| Error::Load(format!("bad timestamp '{text}': {e}")))
}

pub fn encode(db: &Database) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(&RawDatabase::from(db)).map_err(|e| Error::Load(format!("encode: {e}")))
}

pub fn decode(bytes: &[u8]) -> Result<Database> {
    let raw: RawDatabase =
        serde_json::from_slice(bytes).map_err(|e| Error::Load(format!("parse: {e}")))?;
    raw.validate()
}
