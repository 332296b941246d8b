use super::*;
use crate::{
    animation::{animator::Millis, ease::Ease},
    dataset::model::{GraphDataset, HierarchyDataset, ItemRecord, LinkRecord, TreeLiteral},
    foundation::{
        color::CategoryPalette,
        core::{Size, Vec2, Viewport},
    },
    layout::tree::tidy_tree,
    scene::model::{Label, SceneStyle},
    store::entity::IntegrityPolicy,
};

struct Fixture {
    store: EntityStore,
    scene: Scene,
    animator: Animator,
    ctl: InteractionController,
}

impl Fixture {
    fn new() -> Self {
        let item = |id: &str| ItemRecord {
            id: id.into(),
            name: format!("Name {id}"),
            image: format!("{id}.png"),
            genres: vec![],
        };
        let graph = GraphDataset {
            nodes: ["A", "B", "C"].into_iter().map(item).collect(),
            edges: vec![LinkRecord {
                source: "A".into(),
                target: "B".into(),
                kind: "x".to_string(),
            }],
        };
        let tree = HierarchyDataset {
            source: TreeLiteral::leaf("A").with_children(vec![TreeLiteral::leaf("B")]),
            links: vec![],
        };
        let store = EntityStore::load(&graph, &tree, IntegrityPolicy::Strict).unwrap();
        let geom = tidy_tree(store.hierarchy(), Size::new(700.0, 500.0));
        let style = SceneStyle {
            viewport: Viewport::default(),
            title: String::new(),
            subtitle: String::new(),
            image_size: 50.0,
            tree_link_offset: Vec2::new(0.0, 50.0),
            legend_inset: Vec2::new(100.0, 20.0),
        };
        let mut scene = Scene::build(&store, &geom, &mut CategoryPalette::default(), &style);
        for h in &mut scene.items {
            h.opacity = 1.0;
            h.visible = true;
        }
        for e in &mut scene.edges {
            e.opacity = 1.0;
            e.interactive = true;
        }
        scene.legend.interactive = true;
        Self {
            store,
            scene,
            animator: Animator::new(Ease::Linear),
            ctl: InteractionController::new(HoverStyle::default()),
        }
    }

    fn bind(&mut self, mode: HoverMode) {
        let mut s = Surface {
            store: &self.store,
            scene: &mut self.scene,
            animator: &mut self.animator,
        };
        self.ctl.bind(mode, &mut s);
    }

    fn hover(&mut self, id: &str) -> bool {
        let mut s = Surface {
            store: &self.store,
            scene: &mut self.scene,
            animator: &mut self.animator,
        };
        self.ctl.hover_item(&mut s, id, Point::new(5.0, 6.0))
    }

    fn unhover(&mut self) -> bool {
        let mut s = Surface {
            store: &self.store,
            scene: &mut self.scene,
            animator: &mut self.animator,
        };
        self.ctl.unhover_item(&mut s)
    }

    fn settle(&mut self) {
        let now = Millis(self.animator.now().0 + 10_000);
        self.animator.advance(&mut self.scene, now);
    }

    fn item(&self, id: &str) -> &crate::scene::model::ItemHandle {
        self.scene.item(id).unwrap()
    }
}

#[test]
fn graph_hover_highlights_neighbors_and_dims_the_rest() {
    let mut f = Fixture::new();
    f.bind(HoverMode::Graph);
    assert!(f.hover("A"));

    assert_eq!(f.item("A").highlight, Highlight::Focused);
    assert_eq!(f.item("B").highlight, Highlight::Adjacent);
    assert_eq!(f.item("C").highlight, Highlight::Dimmed);
    assert_eq!(f.scene.tooltip.text, "Name A");
    assert_eq!(f.scene.tooltip.anchor, Point::new(5.0, 6.0));
    assert!(f.scene.legend.entries[0].emphasized);

    f.settle();
    assert_eq!(f.item("A").image_size, 80.0);
    assert_eq!(f.item("B").image_size, 66.0);
    assert_eq!(f.item("C").image_size, 50.0);
    assert_eq!(f.item("B").opacity, 1.0);
    assert!((f.scene.tooltip.opacity - 0.7).abs() < 1e-12);
    assert_eq!(f.scene.edges[0].opacity, 1.0);
}

#[test]
fn graph_hover_hides_edges_not_touching_the_item() {
    let mut f = Fixture::new();
    f.bind(HoverMode::Graph);
    f.hover("C");
    f.settle();
    assert_eq!(f.scene.edges[0].opacity, 0.0);
    assert!(!f.scene.legend.entries[0].emphasized);
}

#[test]
fn hover_exit_restores_everything() {
    let mut f = Fixture::new();
    f.bind(HoverMode::Graph);
    f.hover("C");
    f.settle();
    assert!(f.unhover());
    f.settle();
    for id in ["A", "B", "C"] {
        assert_eq!(f.item(id).highlight, Highlight::Normal);
        assert_eq!(f.item(id).image_size, 50.0);
    }
    assert_eq!(f.scene.tooltip.opacity, 0.0);
    assert_eq!(f.scene.edges[0].opacity, 1.0);
    assert_eq!(f.ctl.hovered(), None);
}

#[test]
fn events_are_ignored_without_a_mode_or_handle() {
    let mut f = Fixture::new();
    assert!(!f.hover("A"));
    assert!(!f.unhover());
    f.bind(HoverMode::Graph);
    assert!(!f.hover("nobody"));
    assert_eq!(f.animator.in_flight(), 0);
}

#[test]
fn tree_hover_uses_ancestry_and_skips_items_outside_the_hierarchy() {
    let mut f = Fixture::new();
    f.bind(HoverMode::Tree);
    assert!(!f.item("C").interactive);
    assert!(!f.hover("C"));

    assert!(f.hover("B"));
    assert_eq!(f.item("B").highlight, Highlight::Focused);
    assert_eq!(f.item("A").highlight, Highlight::Adjacent);
    assert_eq!(f.item("C").highlight, Highlight::Normal);
    f.settle();
    assert_eq!(f.item("A").image_size, 66.0);
}

#[test]
fn list_hover_raises_and_dims() {
    let mut f = Fixture::new();
    f.bind(HoverMode::HorizontalList);
    assert_eq!(f.ctl.default_size(), 24.0);
    f.hover("A");
    assert_eq!(f.item("B").highlight, Highlight::Dimmed);
    assert_eq!(f.scene.draw_order.last(), Some(&0));
    assert_eq!(f.scene.tooltip.text, "Name A");
    f.unhover();
    f.settle();
    assert_eq!(f.item("A").image_size, 24.0);
    assert_eq!(f.item("B").highlight, Highlight::Normal);
}

#[test]
fn vertical_list_emphasizes_label_instead_of_tooltip() {
    let mut f = Fixture::new();
    for h in &mut f.scene.items {
        h.label = Some(Label {
            text: h.name.clone(),
            offset: Vec2::new(50.0, 5.0),
            emphasized: false,
        });
    }
    f.bind(HoverMode::VerticalList);
    f.hover("B");
    assert!(f.item("B").label.as_ref().unwrap().emphasized);
    assert!(f.scene.tooltip.text.is_empty());
    f.unhover();
    assert!(!f.item("B").label.as_ref().unwrap().emphasized);
}

#[test]
fn legend_hover_isolates_a_category_in_graph_mode() {
    let mut f = Fixture::new();
    f.bind(HoverMode::Graph);
    let mut s = Surface {
        store: &f.store,
        scene: &mut f.scene,
        animator: &mut f.animator,
    };
    assert!(f.ctl.hover_legend(&mut s, "x"));
    assert_eq!(s.scene.items[0].image_size, 66.0);
    assert_eq!(s.scene.items[2].image_size, 50.0);
    assert!(f.ctl.hover_legend(&mut s, "other"));
    assert!(f.ctl.unhover_legend(&mut s));
    assert_eq!(s.scene.items[0].image_size, 50.0);
    f.settle();
    assert_eq!(f.scene.edges[0].opacity, 1.0);
}

#[test]
fn edge_hover_emphasizes_its_legend_entry() {
    let mut f = Fixture::new();
    f.bind(HoverMode::Tree);
    let mut s = Surface {
        store: &f.store,
        scene: &mut f.scene,
        animator: &mut f.animator,
    };
    assert!(!f.ctl.hover_edge(&mut s, 0));
    f.ctl.bind(HoverMode::Graph, &mut s);
    assert!(!f.ctl.hover_edge(&mut s, 7));
    assert!(f.ctl.hover_edge(&mut s, 0));
    assert!(s.scene.legend.entries[0].emphasized);
    assert!(f.ctl.unhover_edge(&mut s));
    assert!(!s.scene.legend.entries[0].emphasized);
}

#[test]
fn rebinding_mid_hover_drops_hover_styling() {
    let mut f = Fixture::new();
    f.bind(HoverMode::Graph);
    f.hover("A");
    f.settle();
    assert_eq!(f.item("A").image_size, 80.0);

    f.bind(HoverMode::None);
    f.settle();
    for id in ["A", "B", "C"] {
        assert_eq!(f.item(id).highlight, Highlight::Normal, "{id}");
        assert_eq!(f.item(id).image_size, 50.0, "{id}");
    }
    assert!(f.scene.legend.entries.iter().all(|e| !e.emphasized));
    assert_eq!(f.ctl.hovered(), None);
}

#[test]
fn rebinding_after_legend_hover_restores_sizes() {
    let mut f = Fixture::new();
    f.bind(HoverMode::Graph);
    let mut s = Surface {
        store: &f.store,
        scene: &mut f.scene,
        animator: &mut f.animator,
    };
    assert!(f.ctl.hover_legend(&mut s, "x"));
    assert_eq!(s.scene.items[0].image_size, 66.0);
    f.ctl.bind(HoverMode::Tree, &mut s);
    assert!(s.scene.items.iter().all(|h| h.image_size == 50.0));
}

#[test]
fn rebinding_clears_label_emphasis() {
    let mut f = Fixture::new();
    for h in &mut f.scene.items {
        h.label = Some(Label {
            text: h.name.clone(),
            offset: Vec2::new(50.0, 5.0),
            emphasized: false,
        });
    }
    f.bind(HoverMode::VerticalList);
    f.hover("B");
    assert!(f.item("B").label.as_ref().unwrap().emphasized);
    f.bind(HoverMode::HorizontalList);
    assert!(!f.item("B").label.as_ref().unwrap().emphasized);
    assert!(f.scene.items.iter().all(|h| h.highlight == Highlight::Normal));
}
