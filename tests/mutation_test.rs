//! Boundary mutation tests: insert/delete shifts keep the encoding intact.

use rstest::rstest;

use nestedset::application::services::NodeService;
use nestedset::application::ApplicationError;
use nestedset::domain::{check_rows, DomainError, NodeId, NodeRow};
use nestedset::infrastructure::MemoryRowStore;
use nestedset::util::testing;

fn service() -> NodeService<MemoryRowStore> {
    testing::init_test_setup();
    NodeService::new(MemoryRowStore::new())
}

fn bounds(svc: &NodeService<MemoryRowStore>, id: NodeId) -> (i64, i64, u32) {
    let row = svc.read_node(id).unwrap().expect("row exists");
    (row.left, row.right, row.depth)
}

/// Every row except `skip`, reduced to `(id, left, right, depth)`.
fn snapshot(svc: &NodeService<MemoryRowStore>, skip: Option<NodeId>) -> Vec<(NodeId, i64, i64, u32)> {
    svc.all_rows()
        .unwrap()
        .into_iter()
        .filter(|r| Some(r.id) != skip)
        .map(|r| (r.id, r.left, r.right, r.depth))
        .collect()
}

// ============================================================
// Boundary math
// ============================================================

#[test]
fn given_empty_tree_when_adding_and_removing_child_then_root_bounds_round_trip() {
    let svc = service();

    let x = svc.create_root("X").unwrap();
    assert_eq!((x.left, x.right, x.depth), (1, 2, 0));

    let y = svc.create_child("Y", x.id).unwrap();
    assert_eq!((y.left, y.right, y.depth), (2, 3, 1));
    assert_eq!(bounds(&svc, x.id), (1, 4, 0));

    svc.delete_subtree(y.id).unwrap();
    assert_eq!(bounds(&svc, x.id), (1, 2, 0));
    assert!(svc.read_node(y.id).unwrap().is_none());
}

#[test]
fn given_two_trees_when_growing_first_then_second_keeps_its_shape() {
    let svc = service();
    let first = svc.create_root("First").unwrap();
    let second = svc.create_root("Second").unwrap();
    let s1 = svc.create_child("S1", second.id).unwrap();
    let s2 = svc.create_child("S2", s1.id).unwrap();

    svc.create_child("F1", first.id).unwrap();

    assert_eq!(bounds(&svc, second.id), (5, 10, 0));
    assert_eq!(bounds(&svc, s1.id), (6, 9, 1));
    assert_eq!(bounds(&svc, s2.id), (7, 8, 2));
    svc.check_invariants().unwrap();
}

#[test]
fn given_middle_subtree_when_deleting_then_right_siblings_move_by_width() {
    let svc = service();
    let root = svc.create_root("Root").unwrap();
    let a = svc.create_child("A", root.id).unwrap();
    let b = svc.create_child("B", root.id).unwrap();
    svc.create_child("B1", b.id).unwrap();
    svc.create_child("B2", b.id).unwrap();
    let c = svc.create_child("C", root.id).unwrap();
    let c1 = svc.create_child("C1", c.id).unwrap();

    let removed = svc.delete_subtree(b.id).unwrap();

    assert_eq!(removed, 3);
    assert_eq!(bounds(&svc, root.id), (1, 8, 0));
    assert_eq!(bounds(&svc, a.id), (2, 3, 1));
    assert_eq!(bounds(&svc, c.id), (4, 7, 1));
    assert_eq!(bounds(&svc, c1.id), (5, 6, 2));
    svc.check_invariants().unwrap();
}

#[test]
fn given_root_when_deleting_then_whole_tree_goes_and_later_roots_move_left() {
    let svc = service();
    let first = svc.create_root("First").unwrap();
    svc.create_child("F1", first.id).unwrap();
    let second = svc.create_root("Second").unwrap();

    svc.delete_subtree(first.id).unwrap();

    assert_eq!(svc.all_rows().unwrap().len(), 1);
    assert_eq!(bounds(&svc, second.id), (1, 2, 0));
}

// ============================================================
// Failures abort before any write
// ============================================================

#[rstest]
#[case::create_child(|svc: &NodeService<MemoryRowStore>| svc.create_child("x", NodeId(404)).map(|_| ()))]
#[case::delete(|svc: &NodeService<MemoryRowStore>| svc.delete_subtree(NodeId(404)).map(|_| ()))]
#[case::rename(|svc: &NodeService<MemoryRowStore>| svc.rename_node(NodeId(404), "x").map(|_| ()))]
fn given_unknown_id_when_mutating_then_not_found_and_no_row_moves(
    #[case] op: fn(&NodeService<MemoryRowStore>) -> Result<(), ApplicationError>,
) {
    let svc = service();
    let root = svc.create_root("Root").unwrap();
    svc.create_child("A", root.id).unwrap();
    let before = snapshot(&svc, None);

    let err = op(&svc).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::NotFound(NodeId(404)))
    ));
    assert_eq!(snapshot(&svc, None), before);
}

// ============================================================
// Insert-delete round trip
// ============================================================

#[rstest]
#[case::under_root("Root")]
#[case::under_inner("A")]
#[case::under_leaf("A1")]
#[case::under_last_root("Other")]
fn given_populated_forest_when_insert_then_delete_then_other_rows_restored(#[case] parent: &str) {
    let svc = service();
    let root = svc.create_root("Root").unwrap();
    let a = svc.create_child("A", root.id).unwrap();
    svc.create_child("A1", a.id).unwrap();
    svc.create_child("B", root.id).unwrap();
    svc.create_root("Other").unwrap();

    let parent_id = svc
        .all_rows()
        .unwrap()
        .into_iter()
        .find(|r| r.name == parent)
        .map(|r| r.id)
        .unwrap();
    let before = snapshot(&svc, None);

    let n = svc.create_child("N", parent_id).unwrap();
    svc.check_invariants().unwrap();
    svc.delete_subtree(n.id).unwrap();

    assert_eq!(snapshot(&svc, Some(n.id)), before);
}

// ============================================================
// Invariant preservation over long mutation sequences
// ============================================================

/// Small deterministic generator so failures reproduce.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound.max(1)
    }
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(42)]
#[case(2024)]
fn given_random_mutation_script_when_applied_then_invariants_hold_after_each_step(#[case] seed: u64) {
    let svc = service();
    let mut rng = Lcg(seed);

    for step in 0..200 {
        let rows: Vec<NodeRow> = svc.all_rows().unwrap();
        match rng.next(10) {
            0 => {
                svc.create_root(&format!("r{step}")).unwrap();
            }
            1..=6 if !rows.is_empty() => {
                let parent = &rows[rng.next(rows.len())];
                svc.create_child(&format!("c{step}"), parent.id).unwrap();
            }
            7 | 8 if !rows.is_empty() => {
                let victim = &rows[rng.next(rows.len())];
                let expected = (victim.right - victim.left + 1) / 2;
                let removed = svc.delete_subtree(victim.id).unwrap();
                assert_eq!(removed as i64, expected, "step {step}");
            }
            _ => {
                svc.create_root(&format!("r{step}")).unwrap();
            }
        }

        let rows = svc.all_rows().unwrap();
        if let Err(e) = check_rows(&rows) {
            panic!("step {step} (seed {seed}) broke the encoding: {e}\n{rows:#?}");
        }
    }
}
