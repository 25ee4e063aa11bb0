//! Session layer: one command against one stored map.
//!
//! Each method loads the database once, runs the engines against the
//! in-memory copy and saves at most once, after every check has passed.
//! An error leaves the stored map exactly as it was.

use std::io::Write;

use chrono::NaiveDateTime;

use crate::guidance::{self, Guidance};
use crate::identify::{self, Arrival, Disambiguator, Observation};
use crate::model::{Database, Direction, NodeId};
use crate::storage::StorageBackend;
use crate::undo::{self, UndoReport};
use crate::{Result, export};

/// One explorer step as reported on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkRequest {
    pub observation: Observation,
    /// Relative direction that overrides the heuristic at the current node.
    pub force_turn: Option<Direction>,
    pub now: NaiveDateTime,
}

impl ForkRequest {
    pub fn new(relative: impl IntoIterator<Item = Direction>, now: NaiveDateTime) -> Self {
        Self {
            observation: Observation::new(relative),
            force_turn: None,
            now,
        }
    }

    /// Build a request from letters as typed (`"wd"`, `"a"`, ...).
    pub fn parse(dirs: &str, force_turn: Option<&str>, now: NaiveDateTime) -> Result<Self> {
        let relative = Direction::parse_letters(dirs)?;
        let force_turn = match force_turn {
            Some(letters) => {
                let mut parsed = Direction::parse_letters(letters)?;
                if parsed.len() != 1 {
                    return Err(crate::Error::InvalidArgument(format!(
                        "forced turn must be a single letter, got '{letters}'"
                    )));
                }
                parsed.pop()
            }
            None => None,
        };
        Ok(Self { force_turn, ..Self::new(relative, now) })
    }

    pub fn with_force_turn(mut self, turn: Direction) -> Self {
        self.force_turn = Some(turn);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.observation.description = description.into();
        self
    }
}

/// Outcome of a fork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkReport {
    pub arrival: Arrival,
    pub description: String,
    /// Facing on arrival, which relative turns are measured from.
    pub facing: Direction,
    pub guidance: Guidance,
}

/// Summary of a stored map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub nodes: usize,
    pub log_len: usize,
    pub unexplored: usize,
    pub current: NodeId,
    pub facing: Direction,
}

/// The primary entry point. An `Explorer` wraps a storage backend and runs
/// explorer commands against it.
pub struct Explorer<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> Explorer<B> {
    /// Create an Explorer with the given backend.
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// Access the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Start a new map, replacing any stored one.
    pub fn begin(&self, now: NaiveDateTime) -> Result<Database> {
        if self.backend.exists()? {
            tracing::warn!("replacing existing map");
        }
        let db = Database::begin(now);
        self.backend.save(&db)?;
        tracing::info!("started new map");
        Ok(db)
    }

    /// Record an arrival and decide where to go next.
    pub fn fork(&self, request: &ForkRequest, disambiguator: &mut dyn Disambiguator) -> Result<ForkReport> {
        // Phase 1: Load
        let mut db = self.backend.load()?;
        let facing = db.facing()?;

        // Phase 2: Identify
        let arrival = identify::identify(&mut db, &request.observation, disambiguator)?;

        // Phase 3: Guide
        let guidance = guidance::guide(&mut db, arrival.id(), facing, request.force_turn, request.now)?;

        // Phase 4: Persist
        self.backend.save(&db)?;
        tracing::info!(node = %arrival.id(), "fork recorded");

        Ok(ForkReport {
            arrival,
            description: db.node(arrival.id())?.description.clone(),
            facing,
            guidance,
        })
    }

    /// Roll back the most recent step.
    pub fn undo(&self) -> Result<UndoReport> {
        let mut db = self.backend.load()?;
        let report = undo::undo(&mut db)?;
        self.backend.save(&db)?;
        tracing::info!(node = %report.entry.node, "undid step");
        Ok(report)
    }

    pub fn status(&self) -> Result<Status> {
        let db = self.backend.load()?;
        Ok(Status {
            nodes: db.nodes.len(),
            log_len: db.log.len(),
            unexplored: db.unexplored_count(),
            current: db.current_node()?,
            facing: db.facing()?,
        })
    }

    /// Write the stored map as a Cypher script.
    pub fn export_cypher(&self, writer: &mut dyn Write) -> Result<()> {
        let db = self.backend.load()?;
        export::export_cypher_dump(&db, writer)
    }
}
