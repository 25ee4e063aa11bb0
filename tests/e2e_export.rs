//! Export test: explore a little, dump the map as Cypher, check the script.

use chrono::NaiveDateTime;

use indoor_mapper::identify::{Candidate, Choice};
use indoor_mapper::{Explorer, ForkRequest, MemoryBackend};

fn now() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2024-05-01T10:00:00", "%Y-%m-%dT%H:%M:%S").unwrap()
}

fn explored() -> Explorer<MemoryBackend> {
    let explorer = Explorer::with_backend(MemoryBackend::new());
    explorer.begin(now()).unwrap();
    let request = ForkRequest::parse("d", None, now()).unwrap().with_description("Ada's bend");
    explorer
        .fork(&request, &mut |_: &[Candidate]| -> indoor_mapper::Result<Choice> {
            panic!("no disambiguation expected")
        })
        .unwrap();
    explorer
}

fn dump(explorer: &Explorer<MemoryBackend>) -> String {
    let mut buf = Vec::new();
    explorer.export_cypher(&mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn test_export_node_statements() {
    let dump = dump(&explored());

    let creates: Vec<&str> = dump.lines().filter(|l| l.starts_with("CREATE")).collect();
    assert_eq!(creates.len(), 2, "Expected 2 CREATE statements, got {}", creates.len());
    assert_eq!(
        creates[0],
        "CREATE (n:Location {_id: 0, description: 'root node', unexplored: []});"
    );
    assert_eq!(
        creates[1],
        "CREATE (n:Location {_id: 1, description: 'Ada\\'s bend', unexplored: ['right']});"
    );
}

#[test]
fn test_export_passage_statements() {
    let dump = dump(&explored());

    let matches: Vec<&str> = dump.lines().filter(|l| l.starts_with("MATCH")).collect();
    assert_eq!(matches.len(), 2);
    assert!(matches.contains(
        &"MATCH (a:Location {_id: 0}), (b:Location {_id: 1}) CREATE (a)-[:PASSAGE {direction: 'forward'}]->(b);"
    ));
    assert!(matches.contains(
        &"MATCH (a:Location {_id: 1}), (b:Location {_id: 0}) CREATE (a)-[:PASSAGE {direction: 'backward'}]->(b);"
    ));
}

#[test]
fn test_export_header() {
    let dump = dump(&explored());
    assert!(dump.starts_with("// indoor-mapper Cypher DUMP\n"));
    assert!(dump.contains("// Nodes: 2\n"));
    assert!(dump.contains("// Passages: 2\n"));
    assert!(dump.contains("// Unexplored: 1\n"));
}
