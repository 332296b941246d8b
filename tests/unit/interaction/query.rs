use super::*;
use crate::{
    dataset::model::{GraphDataset, HierarchyDataset, ItemRecord, LinkRecord, TreeLiteral},
    store::entity::IntegrityPolicy,
};

fn store() -> EntityStore {
    let item = |id: &str| ItemRecord {
        id: id.into(),
        name: id.to_string(),
        image: String::new(),
        genres: vec![],
    };
    let graph = GraphDataset {
        nodes: ["A", "B", "C", "D", "E"].into_iter().map(item).collect(),
        edges: vec![
            LinkRecord {
                source: "A".into(),
                target: "B".into(),
                kind: "x".to_string(),
            },
            LinkRecord {
                source: "C".into(),
                target: "D".into(),
                kind: "y".to_string(),
            },
        ],
    };
    let tree = HierarchyDataset {
        source: TreeLiteral::leaf("A").with_children(vec![
            TreeLiteral::leaf("B").with_children(vec![TreeLiteral::leaf("D")]),
            TreeLiteral::leaf("C"),
        ]),
        links: vec![],
    };
    EntityStore::load(&graph, &tree, IntegrityPolicy::Strict).unwrap()
}

const IDS: [&str; 6] = ["A", "B", "C", "D", "E", "missing"];

#[test]
fn adjacency_is_symmetric_for_every_pair() {
    let s = store();
    for a in IDS {
        for b in IDS {
            assert_eq!(adjacent(&s, a, b), adjacent(&s, b, a), "{a} {b}");
        }
    }
    assert!(adjacent(&s, "B", "A"));
    assert!(!adjacent(&s, "A", "C"));
}

#[test]
fn related_is_the_symmetric_closure_of_ancestry() {
    let s = store();
    let h = s.hierarchy();
    for a in IDS {
        for b in IDS {
            assert_eq!(
                related(&s, a, b),
                h.is_ancestor_of(a, b) || h.is_ancestor_of(b, a),
                "{a} {b}"
            );
        }
    }
}

#[test]
fn ancestor_scenario() {
    let s = store();
    assert!(is_ancestor(&s, "D", "A"));
    assert!(is_ancestor(&s, "A", "D"));
    assert!(!is_ancestor(&s, "B", "C"));
    // E is an item but not in the hierarchy
    assert!(!is_ancestor(&s, "E", "A"));
}
