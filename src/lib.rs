//! # indoor-mapper — Incremental Exploration of Unmapped Spaces
//!
//! Builds a directional graph of a building, cave or maze one step at a
//! time while someone walks it, and tells them which way to go next so
//! the whole space gets covered with little backtracking. Once nothing is
//! left unexplored it gives the walk back to the starting point.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `StorageBackend` is the contract between the engines and storage
//! 2. **Plain model**: `Database`, `Node`, `LogEntry` are pure data, no I/O
//! 3. **Absolute frame**: every stored `Direction` is absolute; relative turns are computed
//! 4. **All-or-nothing**: a command either persists its whole effect or nothing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use indoor_mapper::{Explorer, ForkRequest, Guidance, MemoryBackend};
//! use indoor_mapper::identify::{Candidate, Choice};
//! use indoor_mapper::Result;
//!
//! # fn example() -> Result<()> {
//! let explorer = Explorer::with_backend(MemoryBackend::new());
//! let now = chrono::Local::now().naive_local();
//! explorer.begin(now)?;
//!
//! // Walked forward from the start; a new passage opens to the right.
//! let request = ForkRequest::parse("d", None, now)?;
//! let report = explorer.fork(&request, &mut |_: &[Candidate]| -> Result<Choice> { Ok(Choice::New(String::new())) })?;
//!
//! if let Guidance::Turn { relative, .. } = report.guidance {
//!     println!("You should turn {relative}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage Backends
//!
//! | Backend | Description |
//! |---------|-------------|
//! | File | JSON file, replaced atomically on save |
//! | Memory | In-memory bytes for testing/embedding |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod identify;
pub mod guidance;
pub mod undo;
pub mod storage;
pub mod session;
pub mod export;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{Database, Direction, LogEntry, Node, NodeId};

// ============================================================================
// Re-exports: Engines
// ============================================================================

pub use identify::{Arrival, Disambiguator, Observation};
pub use guidance::{Guidance, RouteStep};
pub use undo::UndoReport;

// ============================================================================
// Re-exports: Storage & Session
// ============================================================================

pub use storage::{BackendConfig, FileBackend, MemoryBackend, StorageBackend};
pub use session::{Explorer, ForkReport, ForkRequest, Status};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reported passages contradict a node the map already knows.
    #[error(
        "Topology conflict at node {node} ({description}): \
         you gave directions [{reported}] that conflict with stored [{stored}]"
    )]
    TopologyConflict {
        node: NodeId,
        description: String,
        /// Reported relative directions.
        reported: String,
        /// Stored directions, relative to the same facing.
        stored: String,
    },

    #[error("Invalid direction letter '{0}' (expected one of w, d, s, a)")]
    InvalidDirection(char),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Load error: {0}")]
    Load(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Nothing to undo: only the root entry is left")]
    NothingToUndo,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
