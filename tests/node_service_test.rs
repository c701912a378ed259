//! Service-level behavior: serialized mutations, concurrent readers, renames.

use std::thread;

use nestedset::application::services::NodeService;
use nestedset::application::ApplicationError;
use nestedset::domain::{check_rows, DomainError, NodeId, NodeRow};
use nestedset::infrastructure::MemoryRowStore;
use nestedset::util::testing;

#[test]
fn given_parallel_writers_when_inserting_children_then_invariants_hold() {
    testing::init_test_setup();
    let svc = NodeService::new(MemoryRowStore::new());
    let root = svc.create_root("Root").unwrap();
    let branches: Vec<NodeRow> = (0..4)
        .map(|i| svc.create_child(&format!("branch-{i}"), root.id).unwrap())
        .collect();

    thread::scope(|s| {
        for branch in &branches {
            let svc = &svc;
            s.spawn(move || {
                for j in 0..25 {
                    svc.create_child(&format!("{}-{j}", branch.name), branch.id)
                        .unwrap();
                }
            });
        }
    });

    let rows = svc.all_rows().unwrap();
    assert_eq!(rows.len(), 1 + 4 + 4 * 25);
    check_rows(&rows).unwrap();
    let root = svc.read_node(root.id).unwrap().unwrap();
    assert_eq!(root.right - root.left + 1, 2 * rows.len() as i64);
    for branch in &branches {
        assert_eq!(svc.find_immediate_children(branch.id).unwrap().len(), 25);
    }
}

#[test]
fn given_writers_and_readers_when_running_together_then_readers_never_see_half_shift() {
    let svc = NodeService::new(MemoryRowStore::new());
    let root_id = svc.create_root("Root").unwrap().id;

    thread::scope(|s| {
        let writer = &svc;
        s.spawn(move || {
            for i in 0..50 {
                let child = writer.create_child(&format!("n{i}"), root_id).unwrap();
                if i % 3 == 0 {
                    writer.delete_subtree(child.id).unwrap();
                }
            }
        });
        for _ in 0..3 {
            let reader = &svc;
            s.spawn(move || {
                for _ in 0..50 {
                    let rows = reader.all_rows().unwrap();
                    check_rows(&rows).unwrap();
                }
            });
        }
    });

    svc.check_invariants().unwrap();
    assert_eq!(svc.find_immediate_children(root_id).unwrap().len(), 33);
}

#[test]
fn given_node_when_renaming_then_bounds_unchanged() {
    let svc = NodeService::new(MemoryRowStore::new());
    let root = svc.create_root("Root").unwrap();
    let a = svc.create_child("A", root.id).unwrap();

    let renamed = svc.rename_node(a.id, "Alpha").unwrap();

    assert_eq!(renamed.name, "Alpha");
    assert_eq!((renamed.left, renamed.right, renamed.depth), (a.left, a.right, a.depth));
    assert_eq!(svc.read_node(a.id).unwrap().unwrap().name, "Alpha");
}

#[test]
fn given_unknown_id_when_renaming_then_not_found() {
    let svc = NodeService::new(MemoryRowStore::new());

    let err = svc.rename_node(NodeId(9), "Ghost").unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::NotFound(NodeId(9)))
    ));
}

#[test]
fn given_corrupted_row_when_reading_with_verification_then_invariant_violation() {
    let store = MemoryRowStore::from_rows(vec![
        NodeRow::new(1, "Root", 1, 4, 0),
        NodeRow::new(2, "Broken", 3, 2, 1),
    ]);
    let svc = NodeService::new(store);

    let err = svc.find_descendants(NodeId(1)).unwrap_err();

    assert!(matches!(
        err.as_domain(),
        Some(DomainError::InvariantViolation { .. })
    ));
}

#[test]
fn given_corrupted_row_when_verification_disabled_then_rows_returned_as_stored() {
    let store = MemoryRowStore::from_rows(vec![
        NodeRow::new(1, "Root", 1, 4, 0),
        NodeRow::new(2, "Broken", 3, 2, 1),
    ]);
    let svc = NodeService::new(store).with_verify_reads(false);

    let rows = svc.all_rows().unwrap();

    assert_eq!(rows.len(), 2);
    assert!(svc.check_invariants().is_err());
}
