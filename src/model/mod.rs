//! # Exploration Graph Model
//!
//! Plain data for the map: directions, nodes, the visit log, and the
//! database holding them.
//!
//! Design rule: no I/O and no serde here. Encoding lives in
//! `storage::codec`, which converts to and from these types.

pub mod direction;
pub mod node;
pub mod log;
pub mod database;

pub use direction::{Direction, join_names};
pub use node::{Node, NodeId};
pub use log::LogEntry;
pub use database::{Database, SymmetryViolation, ROOT_DESCRIPTION};
