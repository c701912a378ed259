//! Interval query tests: descendants, immediate children, ancestors, parent.

use rstest::{fixture, rstest};

use nestedset::application::services::NodeService;
use nestedset::domain::{DomainError, NodeId, NodeRow};
use nestedset::infrastructure::MemoryRowStore;
use nestedset::util::testing;

/// Root[1,10] { A[2,5] { B[3,4] }, C[6,9] { D[7,8] } }
#[fixture]
fn catalog() -> NodeService<MemoryRowStore> {
    testing::init_test_setup();
    NodeService::new(MemoryRowStore::from_rows(vec![
        NodeRow::new(1, "Root", 1, 10, 0),
        NodeRow::new(2, "A", 2, 5, 1),
        NodeRow::new(3, "B", 3, 4, 2),
        NodeRow::new(4, "C", 6, 9, 1),
        NodeRow::new(5, "D", 7, 8, 2),
    ]))
}

fn names(rows: &[NodeRow]) -> Vec<&str> {
    rows.iter().map(|r| r.name.as_str()).collect()
}

// ============================================================
// Immediate children
// ============================================================

#[rstest]
fn given_root_when_finding_immediate_children_then_returns_a_and_c_only(
    catalog: NodeService<MemoryRowStore>,
) {
    let children = catalog.find_immediate_children(NodeId(1)).unwrap();
    assert_eq!(names(&children), vec!["A", "C"]);
}

#[rstest]
#[case(2, vec!["B"])]
#[case(4, vec!["D"])]
#[case(3, vec![])]
fn given_node_when_finding_immediate_children_then_returns_next_level(
    catalog: NodeService<MemoryRowStore>,
    #[case] id: u64,
    #[case] expected: Vec<&str>,
) {
    let children = catalog.find_immediate_children(NodeId(id)).unwrap();
    assert_eq!(names(&children), expected);
}

#[test]
fn given_children_added_through_service_when_listing_then_insert_order_is_left_order() {
    let svc = NodeService::new(MemoryRowStore::new());
    let root = svc.create_root("Root").unwrap();
    for name in ["first", "second", "third"] {
        let child = svc.create_child(name, root.id).unwrap();
        svc.create_child(&format!("{name}-leaf"), child.id).unwrap();
    }

    let children = svc.find_immediate_children(root.id).unwrap();

    assert_eq!(names(&children), vec!["first", "second", "third"]);
}

// ============================================================
// Descendants
// ============================================================

#[rstest]
fn given_root_when_finding_descendants_then_preorder_with_itself_first(
    catalog: NodeService<MemoryRowStore>,
) {
    let rows = catalog.find_descendants(NodeId(1)).unwrap();
    assert_eq!(names(&rows), vec!["Root", "A", "B", "C", "D"]);
}

#[rstest]
fn given_unknown_id_when_finding_descendants_then_not_found(catalog: NodeService<MemoryRowStore>) {
    let err = catalog.find_descendants(NodeId(77)).unwrap_err();
    assert_eq!(err.as_domain(), Some(&DomainError::NotFound(NodeId(77))));
}

// ============================================================
// Ancestor chain and parent
// ============================================================

#[rstest]
fn given_leaf_when_finding_ancestor_chain_then_includes_node_itself_last(
    catalog: NodeService<MemoryRowStore>,
) {
    let chain = catalog.find_ancestor_chain(NodeId(5)).unwrap();
    assert_eq!(names(&chain), vec!["Root", "C", "D"]);
}

#[rstest]
fn given_root_when_finding_ancestor_chain_then_only_root(catalog: NodeService<MemoryRowStore>) {
    let chain = catalog.find_ancestor_chain(NodeId(1)).unwrap();
    assert_eq!(names(&chain), vec!["Root"]);
}

/// The chain contains the node, so its reconstructed leaf is the node
/// itself; the strict parent is what `find_parent` reports.
#[rstest]
fn given_chain_when_reconstructed_then_leaf_is_node_and_parent_is_second_deepest(
    catalog: NodeService<MemoryRowStore>,
) {
    let chain = catalog.find_ancestor_chain(NodeId(5)).unwrap();
    let tree = catalog.reconstruct_tree(&chain).unwrap().unwrap();
    let leaves = catalog.leaves_of(&tree);
    assert_eq!(names(&leaves), vec!["D"]);

    let parent = catalog.find_parent(NodeId(5)).unwrap().unwrap();
    assert_eq!(parent.name, "C");
    assert_eq!(parent.id, chain[chain.len() - 2].id);
}

#[rstest]
#[case(2, Some("Root"))]
#[case(3, Some("A"))]
#[case(4, Some("Root"))]
#[case(1, None)]
fn given_node_when_finding_parent_then_returns_strict_parent(
    catalog: NodeService<MemoryRowStore>,
    #[case] id: u64,
    #[case] expected: Option<&str>,
) {
    let parent = catalog.find_parent(NodeId(id)).unwrap();
    assert_eq!(parent.as_ref().map(|p| p.name.as_str()), expected);
}

#[test]
fn given_two_trees_when_finding_ancestors_then_other_tree_is_not_included() {
    let svc = NodeService::new(MemoryRowStore::new());
    let first = svc.create_root("First").unwrap();
    let f1 = svc.create_child("F1", first.id).unwrap();
    svc.create_root("Second").unwrap();

    let chain = svc.find_ancestor_chain(f1.id).unwrap();

    assert_eq!(names(&chain), vec!["First", "F1"]);
}
