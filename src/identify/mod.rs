//! Consistency & identification engine.
//!
//! Decides, on every arrival, whether the explorer stands at a node that is
//! already known, at a brand-new node, or at one that only the operator can
//! tell apart. Ambiguity is resolved through an injected [`Disambiguator`],
//! so this module never touches the console.

use std::collections::BTreeSet;

use crate::model::{Database, Direction, Node, NodeId, join_names};
use crate::{Error, Result};

/// What the explorer reports on arrival.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observation {
    /// Passages seen besides the one behind, relative to the facing.
    pub relative: BTreeSet<Direction>,
    /// Label for the node if it turns out to be new.
    pub description: String,
}

impl Observation {
    pub fn new(relative: impl IntoIterator<Item = Direction>) -> Self {
        Self {
            relative: relative.into_iter().collect(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A node offered to the operator when the arrival is ambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: NodeId,
    pub description: String,
}

/// The operator's answer to an ambiguous arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Existing(NodeId),
    New(String),
}

/// Resolves ambiguous arrivals. The console prompt is one implementation;
/// tests pass closures.
pub trait Disambiguator {
    fn choose(&mut self, candidates: &[Candidate]) -> Result<Choice>;
}

impl<F> Disambiguator for F
where
    F: FnMut(&[Candidate]) -> Result<Choice>,
{
    fn choose(&mut self, candidates: &[Candidate]) -> Result<Choice> {
        self(candidates)
    }
}

/// Where the explorer turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// A node that was already on the map.
    Known(NodeId),
    /// A node created by this step.
    Created(NodeId),
}

impl Arrival {
    pub fn id(self) -> NodeId {
        match self {
            Arrival::Known(id) | Arrival::Created(id) => id,
        }
    }
}

/// Resolve the explorer's location and link the edge just walked.
///
/// On error the database may hold no changes from this call: every check
/// runs before the first mutation.
pub fn identify(
    db: &mut Database,
    observation: &Observation,
    disambiguator: &mut dyn Disambiguator,
) -> Result<Arrival> {
    let facing = db.facing()?;
    let behind = facing.opposite();
    let last_node = db.current_node()?;
    db.node(last_node)?;

    let mut abs_branches: BTreeSet<Direction> =
        observation.relative.iter().map(|&r| r + facing).collect();
    abs_branches.insert(behind);

    let arrival = match db.find_linked(behind, last_node) {
        Some(id) => {
            let node = db.node(id)?;
            let stored = node.directions();
            if stored != abs_branches {
                tracing::warn!(node = %id, "reported passages conflict with the map");
                return Err(Error::TopologyConflict {
                    node: id,
                    description: node.description.clone(),
                    reported: join_names(observation.relative.iter().copied()),
                    stored: join_names(stored.iter().map(|&d| d - facing)),
                });
            }
            tracing::debug!(node = %id, "arrived at known node");
            Arrival::Known(id)
        }
        None if observation.relative.len() <= 1 => {
            Arrival::Created(create_node(db, &abs_branches, behind, last_node, &observation.description))
        }
        None => {
            let candidates = candidates(db, &abs_branches, behind);
            tracing::debug!(count = candidates.len(), "ambiguous arrival");
            match disambiguator.choose(&candidates)? {
                Choice::Existing(id) => {
                    if !candidates.iter().any(|c| c.id == id) {
                        return Err(Error::InvalidArgument(format!(
                            "node {id} is not a candidate for this location"
                        )));
                    }
                    db.node_mut(id)?.link(behind, last_node);
                    Arrival::Known(id)
                }
                Choice::New(description) => {
                    Arrival::Created(create_node(db, &abs_branches, behind, last_node, &description))
                }
            }
        }
    };

    db.node_mut(last_node)?.link(facing, arrival.id());
    Ok(arrival)
}

/// Nodes with exactly these passages that were never entered from `behind`.
pub fn candidates(db: &Database, abs_branches: &BTreeSet<Direction>, behind: Direction) -> Vec<Candidate> {
    db.iter_nodes()
        .filter(|(_, node)| node.directions() == *abs_branches && node.is_unexplored(behind))
        .map(|(id, node)| Candidate { id, description: node.description.clone() })
        .collect()
}

fn create_node(
    db: &mut Database,
    abs_branches: &BTreeSet<Direction>,
    behind: Direction,
    last_node: NodeId,
    description: &str,
) -> NodeId {
    let mut node = Node::with_branches(abs_branches.iter().copied()).with_description(description);
    node.link(behind, last_node);
    let id = db.push_node(node);
    tracing::debug!(node = %id, "created node");
    id
}
