use super::*;
use crate::{
    dataset::model::{GraphDataset, HierarchyDataset, ItemRecord, LinkRecord, TreeLiteral},
    store::entity::IntegrityPolicy,
};

fn ctx() -> VisContext {
    let item = |id: &str| ItemRecord {
        id: id.into(),
        name: format!("Name {id}"),
        image: format!("{id}.png"),
        genres: vec!["rock".to_string()],
    };
    let graph = GraphDataset {
        nodes: ["A", "B", "C", "D"].into_iter().map(item).collect(),
        edges: vec![
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
    };
    // D is in the graph only.
    let tree = HierarchyDataset {
        source: TreeLiteral::leaf("A")
            .with_children(vec![TreeLiteral::leaf("B"), TreeLiteral::leaf("C")]),
        links: vec![],
    };
    let store = EntityStore::load(&graph, &tree, IntegrityPolicy::Strict).unwrap();
    VisContext::new(EngineConfig::default(), store).unwrap()
}

#[test]
fn section_kind_indices_follow_scroll_order() {
    for (i, kind) in SectionKind::ALL.into_iter().enumerate() {
        assert_eq!(kind.index(), i);
        assert_eq!(SectionKind::from_index(i), Some(kind));
    }
    assert_eq!(SectionKind::from_index(5), None);
    assert_eq!(SectionKind::HorizontalList.name(), "horizontal_list");
}

#[test]
fn new_context_starts_hidden_without_layout() {
    let c = ctx();
    assert_eq!(c.layout, LayoutKind::None);
    assert!(!c.force.is_running());
    assert!(c.scene.items.iter().all(|h| h.opacity == 0.0));
    assert_eq!(c.scene.items.len(), 4);
}

#[test]
fn graph_section_starts_force_and_binds_edges() {
    let mut c = ctx();
    c.show_title().unwrap();
    c.show_graph().unwrap();
    c.animator.finish_all(&mut c.scene);

    assert_eq!(c.layout, LayoutKind::Force);
    assert!(c.force.is_running());
    assert_eq!(c.controller.mode(), HoverMode::Graph);
    assert!(c.scene.edges.iter().all(|e| e.interactive && e.opacity == 1.0));
    assert!(c.scene.items.iter().all(|h| h.visible && h.opacity == 1.0));
    assert!(c.scene.legend.interactive);
    assert!(c.scene.titles.iter().all(|t| t.opacity == 0.0));
}

#[test]
fn tree_section_moves_members_and_hides_the_rest() {
    let mut c = ctx();
    c.show_graph().unwrap();
    c.show_tree().unwrap();
    c.animator.finish_all(&mut c.scene);

    assert!(!c.force.is_running());
    assert_eq!(c.layout, LayoutKind::Tree);
    for id in ["A", "B", "C"] {
        let h = c.scene.item(id).unwrap();
        assert_eq!(Some(h.position), c.tree.position_of(id), "{id}");
        assert_eq!(h.opacity, 1.0);
        assert_eq!(h.image_size, 50.0);
    }
    assert_eq!(c.scene.item("D").unwrap().opacity, 0.0);
    assert_eq!(c.scene.node_offset, Vec2::new(0.0, 50.0));
    assert!(c.scene.nodes_above_tree_links);
    assert!(c.scene.edges.iter().all(|e| !e.interactive && e.opacity == 0.0));
    assert!(c.scene.tree_links.iter().all(|l| l.opacity == 1.0));
    assert!(!c.scene.legend.interactive);
}

#[test]
fn sync_only_copies_force_positions_in_graph_layout() {
    let mut c = ctx();
    c.show_tree().unwrap();
    c.animator.finish_all(&mut c.scene);
    let before = c.scene.item("A").unwrap().position;

    c.force.reheat(1.0);
    c.force.step();
    c.sync_force_positions();
    assert_eq!(c.scene.item("A").unwrap().position, before);
}

#[test]
fn names_section_attaches_one_label_per_member() {
    let mut c = ctx();
    c.show_list().unwrap();
    c.show_names().unwrap();
    c.show_names().unwrap();
    c.animator.finish_all(&mut c.scene);

    let a = c.scene.item("A").unwrap();
    let label = a.label.as_ref().unwrap();
    assert_eq!(label.text, "Name A");
    assert_eq!(label.offset, Vec2::new(50.0, 5.0));
    assert_eq!(Some(a.position), c.vertical.position_of("A"));
    assert!(c.scene.item("D").unwrap().label.is_none());

    c.show_list().unwrap();
    assert!(c.scene.items.iter().all(|h| h.label.is_none()));
}

#[test]
fn list_section_shrinks_members_to_list_size() {
    let mut c = ctx();
    c.show_tree().unwrap();
    c.show_list().unwrap();
    c.animator.finish_all(&mut c.scene);

    assert_eq!(c.layout, LayoutKind::HorizontalList);
    assert_eq!(c.controller.mode(), HoverMode::HorizontalList);
    assert_eq!(c.scene.node_offset, Vec2::ZERO);
    for id in ["A", "B", "C"] {
        let h = c.scene.item(id).unwrap();
        assert_eq!(h.image_size, 24.0);
        assert_eq!(Some(h.position), c.horizontal.position_of(id));
    }
}
