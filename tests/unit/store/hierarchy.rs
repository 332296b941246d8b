use super::*;
use crate::dataset::model::TreeLiteral;

fn dataset() -> HierarchyDataset {
    // A -> (B -> D), C
    HierarchyDataset {
        source: TreeLiteral::leaf("A").with_children(vec![
            TreeLiteral::leaf("B").with_children(vec![TreeLiteral::leaf("D")]),
            TreeLiteral::leaf("C"),
        ]),
        links: vec![
            LinkRecord {
                source: "A".into(),
                target: "B".into(),
                kind: "x".to_string(),
            },
            LinkRecord {
                source: "B".into(),
                target: "D".into(),
                kind: "y".to_string(),
            },
        ],
    }
}

fn build(ds: &HierarchyDataset, known: &[&str], policy: IntegrityPolicy) -> VisResult<Hierarchy> {
    let mut report = IntegrityReport::default();
    Hierarchy::build(ds, |id| known.contains(&id.as_str()), policy, &mut report)
}

#[test]
fn preorder_visits_parent_before_children() {
    let h = build(&dataset(), &["A", "B", "C", "D"], IntegrityPolicy::Strict).unwrap();
    let order: Vec<&str> = h.preorder().iter().map(ItemId::as_str).collect();
    assert_eq!(order, ["A", "B", "D", "C"]);
    assert_eq!(h.root().item.as_str(), "A");
    assert_eq!(h.get("D").unwrap().depth, 2);
    assert_eq!(h.max_depth(), 2);
}

#[test]
fn ancestor_scenario() {
    let h = build(&dataset(), &["A", "B", "C", "D"], IntegrityPolicy::Strict).unwrap();
    assert!(h.is_ancestor_of("A", "D"));
    assert!(!h.is_ancestor_of("D", "A"));
    assert!(h.related("D", "A"));
    assert!(h.related("A", "D"));
    assert!(!h.related("B", "C"));
    assert!(!h.related("D", "C"));
    assert!(h.related("B", "B"));
}

#[test]
fn related_is_symmetric_over_all_pairs() {
    let h = build(&dataset(), &["A", "B", "C", "D"], IntegrityPolicy::Strict).unwrap();
    let ids = ["A", "B", "C", "D", "Z"];
    for a in ids {
        for b in ids {
            assert_eq!(h.related(a, b), h.related(b, a), "{a} {b}");
            assert_eq!(
                h.related(a, b),
                h.is_ancestor_of(a, b) || h.is_ancestor_of(b, a)
            );
        }
    }
}

#[test]
fn ancestors_walk_to_root() {
    let h = build(&dataset(), &["A", "B", "C", "D"], IntegrityPolicy::Strict).unwrap();
    let path: Vec<&str> = h
        .ancestors("D")
        .unwrap()
        .into_iter()
        .map(ItemId::as_str)
        .collect();
    assert_eq!(path, ["D", "B", "A"]);
    assert!(h.ancestors("nope").is_err());
}

#[test]
fn link_kinds_are_keyed_by_parent_child() {
    let h = build(&dataset(), &["A", "B", "C", "D"], IntegrityPolicy::Strict).unwrap();
    let a = h.index_of("A").unwrap();
    let b = h.index_of("B").unwrap();
    let c = h.index_of("C").unwrap();
    assert_eq!(h.link_kind(a, b), Some("x"));
    assert_eq!(h.link_kind(a, c), None);
    assert_eq!(h.links().count(), 3);
}

#[test]
fn unknown_subtree_is_dropped_when_lenient() {
    let mut report = IntegrityReport::default();
    let h = Hierarchy::build(
        &dataset(),
        |id| id.as_str() != "B",
        IntegrityPolicy::Lenient,
        &mut report,
    )
    .unwrap();
    let order: Vec<&str> = h.preorder().iter().map(ItemId::as_str).collect();
    assert_eq!(order, ["A", "C"]);
    // the B subtree plus both links touching B or D
    assert_eq!(report.dropped.len(), 3);
}

#[test]
fn unknown_node_fails_when_strict() {
    let err = build(&dataset(), &["A", "B", "C"], IntegrityPolicy::Strict).unwrap_err();
    assert!(matches!(err, VisError::NotFound { .. }));
}

#[test]
fn unknown_root_always_fails() {
    let err = build(&dataset(), &["B"], IntegrityPolicy::Lenient).unwrap_err();
    assert!(matches!(err, VisError::DataIntegrity(_)));
}

#[test]
fn link_that_is_not_a_tree_edge_is_reported() {
    let mut ds = dataset();
    ds.links.push(LinkRecord {
        source: "C".into(),
        target: "D".into(),
        kind: "z".to_string(),
    });
    let mut report = IntegrityReport::default();
    Hierarchy::build(
        &ds,
        |_| true,
        IntegrityPolicy::Lenient,
        &mut report,
    )
    .unwrap();
    assert_eq!(report.dropped.len(), 1);
    assert!(build(&ds, &["A", "B", "C", "D"], IntegrityPolicy::Strict).is_err());
}
