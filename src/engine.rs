pub(crate) mod config;
pub(crate) mod context;

use crate::{
    animation::animator::{Animator, Millis},
    dataset::model::{GraphDataset, HierarchyDataset},
    engine::{
        config::EngineConfig,
        context::{SectionKind, VisContext},
    },
    foundation::{color::CategoryPalette, core::Point, error::VisResult},
    interaction::{controller::HoverMode, query},
    layout::{LayoutKind, force::TickOutcome},
    scene::{export, model::Scene},
    sections::machine::{Section, SectionMachine},
    store::entity::EntityStore,
};

/// Scroll-driven visualization engine.
///
/// One instance owns one entity set, one force simulation, one scene and one section machine.
/// The host serializes every call: scroll events go to [`ScrollVis::activate`] and
/// [`ScrollVis::update`], the render loop calls [`ScrollVis::tick`] and [`ScrollVis::advance`], and
/// pointer events go to the hover entry points.
#[derive(Debug)]
pub struct ScrollVis {
    ctx: VisContext,
    machine: SectionMachine<VisContext>,
}

impl ScrollVis {
    #[tracing::instrument(skip_all)]
    pub fn new(
        graph: &GraphDataset,
        tree: &HierarchyDataset,
        config: EngineConfig,
    ) -> VisResult<Self> {
        let store = EntityStore::load(graph, tree, config.integrity)?;
        let policy = config.out_of_range;
        let ctx = VisContext::new(config, store)?;

        let sections = SectionKind::ALL
            .into_iter()
            .map(|kind| {
                Section::<VisContext>::new(
                    kind.name(),
                    Box::new(move |ctx: &mut VisContext| ctx.run_section(kind)),
                )
            })
            .collect();

        tracing::info!(sections = SectionKind::ALL.len(), "engine ready");
        Ok(Self {
            ctx,
            machine: SectionMachine::new(sections, policy),
        })
    }

    /// Parse both datasets from JSON text and build the engine.
    pub fn from_json(graph_json: &str, tree_json: &str, config: EngineConfig) -> VisResult<Self> {
        let graph = GraphDataset::from_json_str(graph_json)?;
        let tree = HierarchyDataset::from_json_str(tree_json)?;
        Self::new(&graph, &tree, config)
    }

    /// Make section `index` active, running every passed-over section's effect in scroll order.
    /// Returns the indices that ran.
    pub fn activate(&mut self, index: usize) -> VisResult<Vec<usize>> {
        self.machine.activate(&mut self.ctx, index)
    }

    /// Scroll progress inside section `index`. The tooltip is hidden first since the reader is
    /// scrolling.
    pub fn update(&mut self, index: usize, progress: f64) -> VisResult<()> {
        self.ctx.hide_tooltip();
        self.machine.update(&mut self.ctx, index, progress)
    }

    /// One force step. A no-op unless the graph section started the simulation.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.ctx.force.tick();
        if outcome.moved() {
            self.ctx.sync_force_positions();
        }
        outcome
    }

    /// Tick until the simulation stops or `max_ticks` ran. Returns ticks taken.
    pub fn settle(&mut self, max_ticks: usize) -> usize {
        let n = self.ctx.force.settle(max_ticks);
        if n > 0 {
            self.ctx.sync_force_positions();
        }
        n
    }

    /// Sample transitions at host time `now`. Returns how many properties were written.
    pub fn advance(&mut self, now: Millis) -> usize {
        self.ctx.animator.advance(&mut self.ctx.scene, now)
    }

    /// Jump every in-flight transition to its end.
    pub fn finish_transitions(&mut self) {
        self.ctx.animator.finish_all(&mut self.ctx.scene);
    }

    pub fn hover_item(&mut self, id: &str, pointer: Point) -> bool {
        let (controller, mut surface) = self.ctx.surface();
        controller.hover_item(&mut surface, id, pointer)
    }

    pub fn unhover_item(&mut self) -> bool {
        let (controller, mut surface) = self.ctx.surface();
        controller.unhover_item(&mut surface)
    }

    pub fn hover_legend(&mut self, category: &str) -> bool {
        let (controller, mut surface) = self.ctx.surface();
        controller.hover_legend(&mut surface, category)
    }

    pub fn unhover_legend(&mut self) -> bool {
        let (controller, mut surface) = self.ctx.surface();
        controller.unhover_legend(&mut surface)
    }

    pub fn hover_edge(&mut self, index: usize) -> bool {
        let (controller, mut surface) = self.ctx.surface();
        controller.hover_edge(&mut surface, index)
    }

    pub fn unhover_edge(&mut self) -> bool {
        let (controller, mut surface) = self.ctx.surface();
        controller.unhover_edge(&mut surface)
    }

    pub fn adjacent(&self, a: &str, b: &str) -> bool {
        query::adjacent(&self.ctx.store, a, b)
    }

    pub fn related(&self, a: &str, b: &str) -> bool {
        query::related(&self.ctx.store, a, b)
    }

    pub fn is_ancestor(&self, a: &str, b: &str) -> bool {
        query::is_ancestor(&self.ctx.store, a, b)
    }

    pub fn scene(&self) -> &Scene {
        &self.ctx.scene
    }

    pub fn store(&self) -> &EntityStore {
        &self.ctx.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.ctx.config
    }

    pub fn palette(&self) -> &CategoryPalette {
        &self.ctx.palette
    }

    pub fn animator(&self) -> &Animator {
        &self.ctx.animator
    }

    pub fn layout(&self) -> LayoutKind {
        self.ctx.layout
    }

    pub fn hover_mode(&self) -> HoverMode {
        self.ctx.controller.mode()
    }

    pub fn is_force_running(&self) -> bool {
        self.ctx.force.is_running()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.machine.last_index()
    }

    pub fn active_index(&self) -> usize {
        self.machine.active_index()
    }

    pub fn active_section(&self) -> Option<SectionKind> {
        self.machine
            .last_index()
            .and_then(SectionKind::from_index)
    }

    pub fn section_count(&self) -> usize {
        self.machine.len()
    }

    /// Scene as pretty-printed JSON.
    pub fn snapshot_json(&self) -> VisResult<String> {
        Ok(serde_json::to_string_pretty(&self.ctx.scene)?)
    }

    pub fn render_svg(&self) -> String {
        export::render_svg(&self.ctx.scene)
    }
}
