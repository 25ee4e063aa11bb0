//! Map invariants under random exploration sessions.
//!
//! Drives `Explorer` with arbitrary junction reports and arbitrary operator
//! answers, and checks what must hold after every step: passages stay
//! symmetric, failed forks write nothing, and undo never leaves a map the
//! loader rejects.

use chrono::NaiveDateTime;
use proptest::prelude::*;

use indoor_mapper::identify::{Candidate, Choice};
use indoor_mapper::{Database, Direction, Error, Explorer, ForkRequest, MemoryBackend, StorageBackend};

// ============================================================================
// Helpers
// ============================================================================

fn now() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2024-05-01T10:00:00", "%Y-%m-%dT%H:%M:%S").unwrap()
}

#[derive(Debug, Clone)]
enum Step {
    /// Passages as a bit set over forward, right, left, and which candidate
    /// the operator picks if asked (`None` describes a new node).
    Fork { passages: u8, pick: Option<usize> },
    Undo,
}

fn fork_step() -> impl Strategy<Value = Step> {
    (0u8..8, proptest::option::of(0usize..8)).prop_map(|(passages, pick)| Step::Fork { passages, pick })
}

fn any_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => fork_step(),
        1 => Just(Step::Undo),
    ]
}

fn relative(passages: u8) -> Vec<Direction> {
    [Direction::Forward, Direction::Right, Direction::Left]
        .into_iter()
        .enumerate()
        .filter(|(bit, _)| passages & (1 << bit) != 0)
        .map(|(_, d)| d)
        .collect()
}

/// Run one fork. Returns false when it was rejected as a topology conflict.
fn run_fork(explorer: &Explorer<MemoryBackend>, passages: u8, pick: Option<usize>) -> Result<bool, TestCaseError> {
    let before = explorer.backend().snapshot().unwrap();
    let request = ForkRequest::new(relative(passages), now());
    let mut operator = |c: &[Candidate]| -> indoor_mapper::Result<Choice> {
        Ok(match pick {
            Some(i) if !c.is_empty() => Choice::Existing(c[i % c.len()].id),
            _ => Choice::New(String::new()),
        })
    };

    match explorer.fork(&request, &mut operator) {
        Ok(_) => Ok(true),
        Err(Error::TopologyConflict { .. }) => {
            prop_assert_eq!(explorer.backend().snapshot().unwrap(), before);
            Ok(false)
        }
        Err(other) => Err(TestCaseError::fail(format!("fork failed: {other}"))),
    }
}

fn dangling_log_entries(db: &Database) -> usize {
    db.log.iter().filter(|e| e.node.0 >= db.nodes.len()).count()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn passages_stay_symmetric(steps in prop::collection::vec(fork_step(), 1..30)) {
        let explorer = Explorer::with_backend(MemoryBackend::new());
        explorer.begin(now()).unwrap();

        for step in steps {
            let Step::Fork { passages, pick } = step else { continue };
            if run_fork(&explorer, passages, pick)? {
                let db = explorer.backend().load().unwrap();
                prop_assert!(
                    db.symmetry_violations().is_empty(),
                    "asymmetric passages: {:?}",
                    db.symmetry_violations()
                );
            }
        }
    }

    #[test]
    fn undo_always_leaves_a_loadable_map(steps in prop::collection::vec(any_step(), 1..30)) {
        let explorer = Explorer::with_backend(MemoryBackend::new());
        explorer.begin(now()).unwrap();

        for step in steps {
            match step {
                Step::Fork { passages, pick } => {
                    run_fork(&explorer, passages, pick)?;
                }
                Step::Undo => {
                    let nodes_before = explorer.backend().load().unwrap().nodes.len();
                    match explorer.undo() {
                        Ok(report) => {
                            let db = explorer.backend().load();
                            prop_assert!(db.is_ok(), "undo saved an unloadable map: {:?}", db.err());
                            let db = db.unwrap();
                            prop_assert_eq!(dangling_log_entries(&db), 0);
                            let expected = nodes_before - usize::from(report.deleted_node.is_some());
                            prop_assert_eq!(db.nodes.len(), expected);
                        }
                        Err(Error::NothingToUndo) => {}
                        Err(other) => prop_assert!(false, "undo failed: {}", other),
                    }
                }
            }
        }
    }
}
