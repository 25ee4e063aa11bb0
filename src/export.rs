//! Cypher DUMP export — serialize an exploration map as Cypher statements.
//!
//! Produces a script that loads the map into Neo4j or any Cypher-compatible
//! database for inspection and visualization.
//!
//! ```text
//! Database → export_cypher_dump() → CREATE / MATCH…CREATE statements
//!   → paste into Neo4j Browser, or pipe into cypher-shell
//! ```

use std::io::Write;

use crate::model::*;
use crate::Result;

/// Relationship type used for a walked passage.
pub const PASSAGE: &str = "PASSAGE";

/// Export a map as a Cypher DUMP script.
///
/// One `CREATE` per node, carrying its id, description and the absolute
/// directions still unexplored, then one relationship per resolved branch.
/// Both sides of a passage are exported, since each side records its own
/// direction.
pub fn export_cypher_dump(db: &Database, writer: &mut dyn Write) -> Result<()> {
    // Header
    writeln!(writer, "// indoor-mapper Cypher DUMP")?;
    writeln!(writer, "// Nodes: {}", db.nodes.len())?;
    writeln!(writer, "// Passages: {}", db.edge_count())?;
    writeln!(writer, "// Unexplored: {}", db.unexplored_count())?;
    writeln!(writer)?;

    for (id, node) in db.iter_nodes() {
        let unexplored: Vec<String> = node.unexplored().map(|d| quote(d.name())).collect();
        writeln!(
            writer,
            "CREATE (n:Location {{_id: {}, description: {}, unexplored: [{}]}});",
            id,
            quote(&node.description),
            unexplored.join(", "),
        )?;
    }

    writeln!(writer)?;
    writeln!(writer, "// Passages")?;

    for (id, node) in db.iter_nodes() {
        for (dir, target) in node.edges() {
            writeln!(
                writer,
                "MATCH (a:Location {{_id: {}}}), (b:Location {{_id: {}}}) CREATE (a)-[:{} {{direction: {}}}]->(b);",
                id,
                target,
                PASSAGE,
                quote(dir.name()),
            )?;
        }
    }

    Ok(())
}

/// Format a string as a Cypher literal.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}
