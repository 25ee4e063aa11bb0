//! Guidance engine — breadth-first search for the next unexplored passage.
//!
//! The search visits each node's passages in a fixed order derived from the
//! explorer's facing at the start node, which gives wall-following routes
//! rather than strict shortest paths. When nothing unexplored is reachable
//! the engine produces the walk back to the root instead.

use std::cmp::Reverse;
use std::collections::VecDeque;

use chrono::NaiveDateTime;
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::model::{Database, Direction, LogEntry, NodeId};
use crate::{Error, Result};

/// What the explorer should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guidance {
    /// Leave the current node in this direction.
    Turn {
        /// Turn relative to the current facing.
        relative: Direction,
        /// The same direction in the map's frame.
        absolute: Direction,
        /// Hops from the current node to the unexplored passage.
        distance: usize,
    },
    /// Everything reachable is explored; walk `route` back to the root.
    Complete { route: Vec<RouteStep> },
}

/// One hop of the walk back to the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStep {
    /// Node the hop leaves from.
    pub from: NodeId,
    /// Turn relative to the facing carried from the previous hop.
    pub turn: Direction,
    pub absolute: Direction,
    pub description: String,
}

/// Sort key for the visiting order: relative direction plus a right turn.
/// Higher keys are visited first.
fn visit_key(dir: Direction, facing: Direction) -> u8 {
    (dir - facing + Direction::Right).index()
}

/// Parent record: the node a BFS node was reached from and the passage used.
type Parent = Option<(NodeId, Direction)>;

/// Run the search from `start` without touching the database.
///
/// `force_turn` is a relative direction; it only takes effect for an
/// unexplored passage of `start` itself.
pub fn plan(
    db: &Database,
    start: NodeId,
    facing: Direction,
    force_turn: Option<Direction>,
) -> Result<Guidance> {
    let mut distance: HashMap<NodeId, usize> = HashMap::new();
    let mut parent: HashMap<NodeId, Parent> = HashMap::new();
    let mut frontier = VecDeque::new();

    distance.insert(start, 0);
    parent.insert(start, None);
    frontier.push_back(start);

    // Parent record and depth of the unexplored placeholder.
    let mut unexplored: Option<((NodeId, Direction), usize)> = None;

    'search: while let Some(current) = frontier.pop_front() {
        let node = db.node(current)?;
        let depth = distance[&current];

        let mut dirs: SmallVec<[Direction; 4]> = node.branches.keys().copied().collect();
        dirs.sort_by_key(|&d| Reverse(visit_key(d, facing)));

        for dir in dirs {
            match node.branch(dir) {
                None => {
                    unexplored = Some(((current, dir), depth + 1));
                    if current == start && Some(dir - facing) == force_turn {
                        tracing::debug!(dir = %dir, "forced turn selected");
                        break 'search;
                    }
                }
                Some(next) if !distance.contains_key(&next) => {
                    distance.insert(next, depth + 1);
                    parent.insert(next, Some((current, dir)));
                    frontier.push_back(next);
                }
                Some(_) => {}
            }
        }

        if unexplored.is_some() {
            break;
        }
    }

    match unexplored {
        Some(((mut from, mut dir), hops)) => {
            while from != start {
                (from, dir) = parent
                    .get(&from)
                    .copied()
                    .flatten()
                    .ok_or_else(|| Error::NotFound(format!("BFS parent of node {from}")))?;
            }
            tracing::debug!(absolute = %dir, hops, "unexplored passage found");
            Ok(Guidance::Turn { relative: dir - facing, absolute: dir, distance: hops })
        }
        None => route_home(db, &parent, facing).map(|route| Guidance::Complete { route }),
    }
}

/// Follow parent records from the root back to the search start, then
/// replay them forward as turns.
fn route_home(
    db: &Database,
    parent: &HashMap<NodeId, Parent>,
    mut facing: Direction,
) -> Result<Vec<RouteStep>> {
    let mut hops = Vec::new();
    let mut current = NodeId::ROOT;
    loop {
        let record = parent
            .get(&current)
            .ok_or_else(|| Error::NotFound("route back to the root node".into()))?;
        match *record {
            Some((from, dir)) => {
                hops.push((from, dir));
                current = from;
            }
            None => break,
        }
    }

    let mut route = Vec::with_capacity(hops.len());
    for (from, dir) in hops.into_iter().rev() {
        route.push(RouteStep {
            from,
            turn: dir - facing,
            absolute: dir,
            description: db.node(from)?.description.clone(),
        });
        facing = dir;
    }
    Ok(route)
}

/// Plan from `start` and record the decision in the log.
///
/// A turn logs the direction taken; completion logs `forward`, since the
/// walk home resets the explorer's frame of reference.
pub fn guide(
    db: &mut Database,
    start: NodeId,
    facing: Direction,
    force_turn: Option<Direction>,
    now: NaiveDateTime,
) -> Result<Guidance> {
    let guidance = plan(db, start, facing, force_turn)?;
    let afterturn = match &guidance {
        Guidance::Turn { absolute, .. } => *absolute,
        Guidance::Complete { .. } => Direction::Forward,
    };
    db.append_log(LogEntry::new(start, afterturn, now));
    Ok(guidance)
}
