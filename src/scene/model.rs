use std::collections::HashMap;

use crate::{
    animation::animator::{AnimValue, Animatable, Channel, PropKey, Target},
    foundation::{
        color::{CategoryPalette, Rgb8},
        core::{ItemId, Point, Vec2, Viewport},
    },
    layout::tree::TreeGeometry,
    store::entity::EntityStore,
};

/// Static inputs the scene needs beyond the store and tree geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneStyle {
    pub viewport: Viewport,
    pub title: String,
    pub subtitle: String,
    pub image_size: f64,
    pub tree_link_offset: Vec2,
    /// Legend origin measured back from the right edge, and down from the top.
    pub legend_inset: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleRole {
    Title,
    Subtitle,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TitleHandle {
    pub role: TitleRole,
    pub text: String,
    pub position: Point,
    pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LegendEntry {
    pub category: String,
    pub color: Rgb8,
    pub emphasized: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Legend {
    pub origin: Point,
    pub opacity: f64,
    pub entries: Vec<LegendEntry>,
    /// Whether legend hover is bound.
    pub interactive: bool,
}

impl Legend {
    pub fn clear_emphasis(&mut self) {
        for e in &mut self.entries {
            e.emphasized = false;
        }
    }

    pub fn emphasize(&mut self, category: &str) {
        for e in &mut self.entries {
            if e.category == category {
                e.emphasized = true;
            }
        }
    }
}

/// Drawn line for one relationship; endpoints follow the items it connects.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct EdgeHandle {
    pub source: ItemId,
    pub target: ItemId,
    pub kind: String,
    pub color: Rgb8,
    pub from: Point,
    pub to: Point,
    pub opacity: f64,
    pub interactive: bool,
    #[serde(skip)]
    ends: (usize, usize),
}

impl EdgeHandle {
    pub fn ends(&self) -> (usize, usize) {
        self.ends
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TreeLinkHandle {
    pub parent: ItemId,
    pub child: ItemId,
    pub kind: Option<String>,
    /// `None` when the hierarchy gave the link no type.
    pub color: Option<Rgb8>,
    pub from: Point,
    pub to: Point,
    pub opacity: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    #[default]
    Normal,
    Focused,
    Adjacent,
    /// Rendered greyscale.
    Dimmed,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Label {
    pub text: String,
    pub offset: Vec2,
    pub emphasized: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ItemHandle {
    pub id: ItemId,
    pub name: String,
    pub image: String,
    pub position: Point,
    pub opacity: f64,
    pub image_size: f64,
    pub visible: bool,
    pub highlight: Highlight,
    pub label: Option<Label>,
    /// Whether item hover is bound.
    pub interactive: bool,
}

impl ItemHandle {
    pub fn is_dimmed(&self) -> bool {
        self.highlight == Highlight::Dimmed
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Tooltip {
    pub text: String,
    pub anchor: Point,
    pub opacity: f64,
}

/// Everything the host draws, keyed so any layout can address an item by id.
///
/// Item, edge and tree-link handles are created once and never removed; layouts only change their
/// properties.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Scene {
    pub viewport: Viewport,
    pub titles: Vec<TitleHandle>,
    pub legend: Legend,
    pub edges: Vec<EdgeHandle>,
    pub tree_links: Vec<TreeLinkHandle>,
    pub tree_link_offset: Vec2,
    pub items: Vec<ItemHandle>,
    /// Item slots back to front.
    pub draw_order: Vec<usize>,
    pub node_offset: Vec2,
    pub nodes_above_tree_links: bool,
    pub tooltip: Tooltip,
    #[serde(skip)]
    index: HashMap<ItemId, usize>,
    #[serde(skip)]
    incident_edges: Vec<Vec<usize>>,
}

impl Scene {
    /// Build every handle hidden. Items start at the origin until a layout places them.
    pub fn build(
        store: &EntityStore,
        tree: &TreeGeometry,
        palette: &mut CategoryPalette,
        style: &SceneStyle,
    ) -> Self {
        let vp = style.viewport;
        let titles = vec![
            TitleHandle {
                role: TitleRole::Title,
                text: style.title.clone(),
                position: Point::new(vp.width / 2.0, vp.height / 3.0),
                opacity: 0.0,
            },
            TitleHandle {
                role: TitleRole::Subtitle,
                text: style.subtitle.clone(),
                position: Point::new(vp.width / 2.0, vp.height / 3.0 + vp.height / 5.0),
                opacity: 0.0,
            },
        ];

        let legend = Legend {
            origin: Point::new(vp.width - style.legend_inset.x, style.legend_inset.y),
            opacity: 0.0,
            entries: store
                .categories()
                .iter()
                .map(|c| LegendEntry {
                    category: c.clone(),
                    color: palette.color(c),
                    emphasized: false,
                })
                .collect(),
            interactive: false,
        };

        let mut incident_edges = vec![Vec::new(); store.len()];
        let edges = store
            .relationships()
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let (s, t) = r.ends();
                incident_edges[s].push(i);
                if t != s {
                    incident_edges[t].push(i);
                }
                EdgeHandle {
                    source: r.source.clone(),
                    target: r.target.clone(),
                    kind: r.kind.clone(),
                    color: palette.color(&r.kind),
                    from: Point::ZERO,
                    to: Point::ZERO,
                    opacity: 0.0,
                    interactive: false,
                    ends: (s, t),
                }
            })
            .collect();

        let tree_links = tree
            .links()
            .iter()
            .map(|l| TreeLinkHandle {
                parent: l.parent.clone(),
                child: l.child.clone(),
                kind: l.kind.clone(),
                color: l.kind.as_deref().map(|k| palette.color(k)),
                from: l.from,
                to: l.to,
                opacity: 0.0,
            })
            .collect();

        let items: Vec<ItemHandle> = store
            .items()
            .iter()
            .map(|it| ItemHandle {
                id: it.id.clone(),
                name: it.name.clone(),
                image: it.image.clone(),
                position: Point::ZERO,
                opacity: 0.0,
                image_size: style.image_size,
                visible: false,
                highlight: Highlight::Normal,
                label: None,
                interactive: false,
            })
            .collect();
        let index = items
            .iter()
            .enumerate()
            .map(|(i, h)| (h.id.clone(), i))
            .collect();

        Self {
            viewport: vp,
            titles,
            legend,
            edges,
            tree_links,
            tree_link_offset: style.tree_link_offset,
            draw_order: (0..items.len()).collect(),
            items,
            node_offset: Vec2::ZERO,
            nodes_above_tree_links: false,
            tooltip: Tooltip::default(),
            index,
            incident_edges,
        }
    }

    #[cfg(test)]
    pub(crate) fn empty(viewport: Viewport) -> Self {
        Self {
            viewport,
            titles: Vec::new(),
            legend: Legend {
                origin: Point::ZERO,
                opacity: 0.0,
                entries: Vec::new(),
                interactive: false,
            },
            edges: Vec::new(),
            tree_links: Vec::new(),
            tree_link_offset: Vec2::ZERO,
            items: Vec::new(),
            draw_order: Vec::new(),
            node_offset: Vec2::ZERO,
            nodes_above_tree_links: false,
            tooltip: Tooltip::default(),
            index: HashMap::new(),
            incident_edges: Vec::new(),
        }
    }

    pub fn slot(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn item(&self, id: &str) -> Option<&ItemHandle> {
        self.slot(id).map(|i| &self.items[i])
    }

    /// Edge handles touching the item in `slot`.
    pub fn incident_edges(&self, slot: usize) -> &[usize] {
        self.incident_edges.get(slot).map_or(&[][..], Vec::as_slice)
    }

    /// Move an item to the front of the draw order.
    pub fn raise(&mut self, slot: usize) {
        if let Some(pos) = self.draw_order.iter().position(|&s| s == slot) {
            self.draw_order.remove(pos);
            self.draw_order.push(slot);
        }
    }

    /// Set an item's position and drag its edge endpoints along.
    pub fn place_item(&mut self, slot: usize, p: Point) {
        let Some(item) = self.items.get_mut(slot) else {
            return;
        };
        item.position = p;
        for &e in self.incident_edges.get(slot).map_or(&[][..], Vec::as_slice) {
            let edge = &mut self.edges[e];
            if edge.ends.0 == slot {
                edge.from = p;
            }
            if edge.ends.1 == slot {
                edge.to = p;
            }
        }
    }

    pub fn clear_highlights(&mut self) {
        for item in &mut self.items {
            item.highlight = Highlight::Normal;
        }
    }
}

impl Animatable for Scene {
    fn read(&self, key: PropKey) -> Option<AnimValue> {
        use AnimValue::{Offset, Point as At, Scalar};
        match (key.target, key.channel) {
            (Target::Item(i), Channel::Opacity) => self.items.get(i).map(|h| Scalar(h.opacity)),
            (Target::Item(i), Channel::Position) => self.items.get(i).map(|h| At(h.position)),
            (Target::Item(i), Channel::ImageSize) => {
                self.items.get(i).map(|h| Scalar(h.image_size))
            }
            (Target::Edge(i), Channel::Opacity) => self.edges.get(i).map(|h| Scalar(h.opacity)),
            (Target::TreeLink(i), Channel::Opacity) => {
                self.tree_links.get(i).map(|h| Scalar(h.opacity))
            }
            (Target::Title(i), Channel::Opacity) => self.titles.get(i).map(|h| Scalar(h.opacity)),
            (Target::Legend, Channel::Opacity) => Some(Scalar(self.legend.opacity)),
            (Target::Tooltip, Channel::Opacity) => Some(Scalar(self.tooltip.opacity)),
            (Target::NodeGroup, Channel::Offset) => Some(Offset(self.node_offset)),
            _ => None,
        }
    }

    fn write(&mut self, key: PropKey, value: AnimValue) {
        match (key.target, key.channel, value) {
            (Target::Item(i), Channel::Position, AnimValue::Point(p)) => self.place_item(i, p),
            (Target::NodeGroup, Channel::Offset, AnimValue::Offset(v)) => self.node_offset = v,
            (target, channel, AnimValue::Scalar(v)) => {
                let slot = match (target, channel) {
                    (Target::Item(i), Channel::Opacity) => {
                        self.items.get_mut(i).map(|h| &mut h.opacity)
                    }
                    (Target::Item(i), Channel::ImageSize) => {
                        self.items.get_mut(i).map(|h| &mut h.image_size)
                    }
                    (Target::Edge(i), Channel::Opacity) => {
                        self.edges.get_mut(i).map(|h| &mut h.opacity)
                    }
                    (Target::TreeLink(i), Channel::Opacity) => {
                        self.tree_links.get_mut(i).map(|h| &mut h.opacity)
                    }
                    (Target::Title(i), Channel::Opacity) => {
                        self.titles.get_mut(i).map(|h| &mut h.opacity)
                    }
                    (Target::Legend, Channel::Opacity) => Some(&mut self.legend.opacity),
                    (Target::Tooltip, Channel::Opacity) => Some(&mut self.tooltip.opacity),
                    _ => None,
                };
                if let Some(slot) = slot {
                    *slot = v;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
