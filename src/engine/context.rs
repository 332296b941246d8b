use crate::{
    animation::animator::{AnimValue, Animator, Channel, PropKey, Target},
    engine::config::EngineConfig,
    foundation::{
        color::CategoryPalette,
        core::{Point, Vec2},
        error::VisResult,
    },
    interaction::controller::{HoverMode, InteractionController, Surface},
    layout::{
        LayoutKind,
        force::ForceSimulation,
        ordinal::OrdinalLayout,
        tree::{TreeGeometry, tidy_tree},
    },
    scene::model::{Highlight, Label, Scene},
    store::entity::EntityStore,
};

/// The fixed section sequence, in scroll order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Title,
    Graph,
    Tree,
    HorizontalList,
    VerticalList,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        Self::Title,
        Self::Graph,
        Self::Tree,
        Self::HorizontalList,
        Self::VerticalList,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Graph => "graph",
            Self::Tree => "tree",
            Self::HorizontalList => "horizontal_list",
            Self::VerticalList => "vertical_list",
        }
    }
}

/// All mutable engine state. Section effects are methods on this type.
#[derive(Debug)]
pub struct VisContext {
    pub(crate) config: EngineConfig,
    pub(crate) store: EntityStore,
    pub(crate) palette: CategoryPalette,
    pub(crate) scene: Scene,
    pub(crate) animator: Animator,
    pub(crate) force: ForceSimulation,
    pub(crate) tree: TreeGeometry,
    pub(crate) horizontal: OrdinalLayout,
    pub(crate) vertical: OrdinalLayout,
    pub(crate) controller: InteractionController,
    pub(crate) layout: LayoutKind,
}

impl VisContext {
    #[tracing::instrument(skip_all, fields(items = store.len()))]
    pub fn new(config: EngineConfig, store: EntityStore) -> VisResult<Self> {
        config.validate()?;
        let vp = config.viewport;

        let force = ForceSimulation::new(config.force.clone(), &vp, &store)?;
        let tree = tidy_tree(store.hierarchy(), config.tree_size());
        let order = store.hierarchy().preorder();
        let horizontal = OrdinalLayout::horizontal(order, &vp);
        let vertical = OrdinalLayout::vertical(order, &vp, config.list_column_x);

        let mut palette = CategoryPalette::with_domain(store.categories().iter().cloned());
        let mut scene = Scene::build(&store, &tree, &mut palette, &config.scene_style());
        for (slot, p) in force.positions().enumerate() {
            scene.place_item(slot, p);
        }

        Ok(Self {
            animator: Animator::new(config.ease),
            controller: InteractionController::new(config.hover_style()),
            config,
            store,
            palette,
            scene,
            force,
            tree,
            horizontal,
            vertical,
            layout: LayoutKind::None,
        })
    }

    fn animate(&mut self, target: Target, channel: Channel, to: AnimValue, duration_ms: u64) {
        self.animator.animate(
            &mut self.scene,
            PropKey::new(target, channel),
            to,
            duration_ms,
        );
    }

    fn fade(&mut self, target: Target, to: f64, duration_ms: u64) {
        self.animate(target, Channel::Opacity, AnimValue::Scalar(to), duration_ms);
    }

    fn fade_edges(&mut self, to: f64, duration_ms: u64) {
        for e in 0..self.scene.edges.len() {
            self.fade(Target::Edge(e), to, duration_ms);
        }
    }

    fn fade_tree_links(&mut self, to: f64, duration_ms: u64) {
        for l in 0..self.scene.tree_links.len() {
            self.fade(Target::TreeLink(l), to, duration_ms);
        }
    }

    fn fade_titles(&mut self, to: f64, duration_ms: u64) {
        for t in 0..self.scene.titles.len() {
            self.fade(Target::Title(t), to, duration_ms);
        }
    }

    fn set_node_offset(&mut self, offset: Vec2) {
        self.animate(Target::NodeGroup, Channel::Offset, AnimValue::Offset(offset), 0);
    }

    pub(crate) fn hide_tooltip(&mut self) {
        self.fade(Target::Tooltip, 0.0, 0);
    }

    pub(crate) fn surface(&mut self) -> (&mut InteractionController, Surface<'_>) {
        (
            &mut self.controller,
            Surface {
                store: &self.store,
                scene: &mut self.scene,
                animator: &mut self.animator,
            },
        )
    }

    fn bind_hover(&mut self, mode: HoverMode) {
        let (controller, mut surface) = self.surface();
        controller.bind(mode, &mut surface);
    }

    fn set_edges_interactive(&mut self, on: bool) {
        for e in &mut self.scene.edges {
            e.interactive = on;
        }
    }

    /// Slots of hierarchy members, in pre-order.
    fn hierarchy_slots(&self) -> Vec<usize> {
        self.store
            .hierarchy()
            .preorder()
            .iter()
            .filter_map(|id| self.scene.slot(id.as_str()))
            .collect()
    }

    /// Move every hierarchy item to `place(id)` at full opacity.
    fn move_hierarchy(&mut self, place: impl Fn(&Self, &str) -> Option<Point>, duration_ms: u64) {
        for slot in self.hierarchy_slots() {
            let id = self.scene.items[slot].id.clone();
            let Some(p) = place(self, id.as_str()) else {
                continue;
            };
            self.animate(
                Target::Item(slot),
                Channel::Position,
                AnimValue::Point(p),
                duration_ms,
            );
            self.fade(Target::Item(slot), 1.0, duration_ms);
        }
    }

    fn resize_hierarchy(&mut self, size: f64, duration_ms: u64) {
        for slot in self.hierarchy_slots() {
            self.animate(
                Target::Item(slot),
                Channel::ImageSize,
                AnimValue::Scalar(size),
                duration_ms,
            );
        }
    }

    pub(crate) fn show_title(&mut self) -> VisResult<()> {
        let d = self.config.durations;
        self.hide_tooltip();
        self.force.stop();
        self.layout = LayoutKind::None;

        self.set_edges_interactive(false);
        self.fade_edges(0.0, 0);

        self.bind_hover(HoverMode::None);
        for slot in 0..self.scene.items.len() {
            self.scene.items[slot].visible = false;
            self.fade(Target::Item(slot), 0.0, d.fade_ms);
        }

        self.fade(Target::Legend, 0.0, 0);
        self.scene.legend.interactive = false;

        self.fade_titles(1.0, d.fade_ms);
        Ok(())
    }

    pub(crate) fn show_graph(&mut self) -> VisResult<()> {
        let d = self.config.durations;
        self.hide_tooltip();
        self.fade_titles(0.0, d.fade_ms);
        self.fade_tree_links(0.0, 0);
        self.set_node_offset(Vec2::ZERO);

        self.fade_edges(1.0, d.fade_ms);
        self.set_edges_interactive(true);

        for item in &mut self.scene.items {
            item.visible = true;
        }
        self.bind_hover(HoverMode::Graph);
        for slot in 0..self.scene.items.len() {
            self.fade(Target::Item(slot), 1.0, d.fade_ms);
        }

        // The simulation owns coordinates from here on.
        self.animator
            .cancel_where(Channel::Position, |t| matches!(t, Target::Item(_)));
        self.layout = LayoutKind::Force;
        self.force.start();

        self.fade(Target::Legend, 1.0, d.fade_ms);
        self.scene.legend.interactive = true;
        Ok(())
    }

    pub(crate) fn show_tree(&mut self) -> VisResult<()> {
        let d = self.config.durations;
        self.hide_tooltip();
        self.force.stop();
        self.layout = LayoutKind::Tree;

        self.set_edges_interactive(false);
        self.fade_edges(0.0, 0);

        self.fade(Target::Legend, 1.0, d.fade_ms);
        self.fade_tree_links(1.0, d.fade_ms);

        self.set_node_offset(Vec2::new(0.0, self.config.tree_offset));
        self.scene.nodes_above_tree_links = true;

        self.bind_hover(HoverMode::Tree);
        for slot in 0..self.scene.items.len() {
            if !self.store.hierarchy().contains(self.scene.items[slot].id.as_str()) {
                self.fade(Target::Item(slot), 0.0, 0);
            }
        }
        for slot in self.hierarchy_slots() {
            self.scene.items[slot].visible = true;
        }
        self.resize_hierarchy(self.config.sizes.graph, d.resize_ms);
        self.move_hierarchy(|ctx, id| ctx.tree.position_of(id), d.tree_move_ms);

        self.scene.legend.interactive = false;
        Ok(())
    }

    pub(crate) fn show_list(&mut self) -> VisResult<()> {
        let d = self.config.durations;
        self.hide_tooltip();
        self.force.stop();
        self.layout = LayoutKind::HorizontalList;

        self.fade(Target::Legend, 0.0, 0);
        self.scene.legend.interactive = false;
        self.fade_tree_links(0.0, 0);
        self.set_node_offset(Vec2::ZERO);

        for slot in self.hierarchy_slots() {
            let item = &mut self.scene.items[slot];
            item.label = None;
            item.highlight = Highlight::Normal;
        }
        self.bind_hover(HoverMode::HorizontalList);

        self.resize_hierarchy(self.config.sizes.list, d.resize_ms);
        self.move_hierarchy(|ctx, id| ctx.horizontal.position_of(id), d.list_move_ms);
        Ok(())
    }

    pub(crate) fn show_names(&mut self) -> VisResult<()> {
        let d = self.config.durations;
        self.hide_tooltip();
        self.force.stop();
        self.layout = LayoutKind::VerticalList;

        self.bind_hover(HoverMode::VerticalList);
        self.move_hierarchy(|ctx, id| ctx.vertical.position_of(id), d.names_move_ms);

        let offset = self.config.label_offset;
        for slot in self.hierarchy_slots() {
            let item = &mut self.scene.items[slot];
            item.label = Some(Label {
                text: item.name.clone(),
                offset,
                emphasized: false,
            });
        }
        Ok(())
    }

    pub(crate) fn run_section(&mut self, kind: SectionKind) -> VisResult<()> {
        match kind {
            SectionKind::Title => self.show_title(),
            SectionKind::Graph => self.show_graph(),
            SectionKind::Tree => self.show_tree(),
            SectionKind::HorizontalList => self.show_list(),
            SectionKind::VerticalList => self.show_names(),
        }
    }

    /// Copy simulation positions onto item handles while the graph owns coordinates.
    pub(crate) fn sync_force_positions(&mut self) {
        if self.layout != LayoutKind::Force {
            return;
        }
        for slot in 0..self.force.len() {
            if let Some(p) = self.force.position(slot) {
                self.scene.place_item(slot, p);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/context.rs"]
mod tests;
