use crate::{
    animation::animator::{AnimValue, Animator, Channel, PropKey, Target},
    foundation::core::Point,
    interaction::query,
    scene::model::{Highlight, Scene},
    store::entity::EntityStore,
};

/// Which hover behavior is bound to item handles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverMode {
    #[default]
    None,
    Graph,
    Tree,
    HorizontalList,
    VerticalList,
}

impl HoverMode {
    fn is_list(self) -> bool {
        matches!(self, Self::HorizontalList | Self::VerticalList)
    }
}

/// Sizes and timings hover feedback uses.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HoverStyle {
    pub duration_ms: u64,
    pub base_size: f64,
    pub adjacent_size: f64,
    pub focused_size: f64,
    pub list_size: f64,
    pub tooltip_opacity: f64,
}

impl Default for HoverStyle {
    fn default() -> Self {
        Self {
            duration_ms: 200,
            base_size: 50.0,
            adjacent_size: 66.0,
            focused_size: 80.0,
            list_size: 24.0,
            tooltip_opacity: 0.7,
        }
    }
}

/// Mutable state hover handlers touch.
pub struct Surface<'a> {
    pub store: &'a EntityStore,
    pub scene: &'a mut Scene,
    pub animator: &'a mut Animator,
}

impl Surface<'_> {
    fn animate(&mut self, target: Target, channel: Channel, to: AnimValue, duration_ms: u64) {
        self.animator
            .animate(&mut *self.scene, PropKey::new(target, channel), to, duration_ms);
    }

    fn in_scope(&self, mode: HoverMode, slot: usize) -> bool {
        match mode {
            HoverMode::None => false,
            HoverMode::Graph => true,
            _ => self
                .store
                .hierarchy()
                .contains(self.scene.items[slot].id.as_str()),
        }
    }
}

/// Per-layout hover behavior.
///
/// Which items listen is recorded on the scene handles themselves (`interactive`), so a snapshot
/// shows exactly what the controller would react to.
#[derive(Clone, Debug, Default)]
pub struct InteractionController {
    mode: HoverMode,
    style: HoverStyle,
    hovered: Option<usize>,
    legend_hovered: bool,
}

impl InteractionController {
    pub fn new(style: HoverStyle) -> Self {
        Self {
            mode: HoverMode::None,
            style,
            hovered: None,
            legend_hovered: false,
        }
    }

    pub fn mode(&self) -> HoverMode {
        self.mode
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Size an in-scope item returns to when nothing is hovered.
    pub fn default_size(&self) -> f64 {
        if self.mode.is_list() {
            self.style.list_size
        } else {
            self.style.base_size
        }
    }

    /// Rebind item hover. Items outside the mode's scope stop listening.
    pub fn bind(&mut self, mode: HoverMode, surface: &mut Surface<'_>) {
        tracing::debug!(?mode, "hover bound");
        self.release(surface);
        self.mode = mode;
        for slot in 0..surface.scene.items.len() {
            let listens = surface.in_scope(mode, slot);
            surface.scene.items[slot].interactive = listens;
        }
    }

    /// Drop the styling an interrupted hover left behind. Opacities stay with the section
    /// effects; sizes snap back to the outgoing mode's default.
    fn release(&mut self, surface: &mut Surface<'_>) {
        let styled = self.hovered.take().is_some() | std::mem::take(&mut self.legend_hovered);
        surface.scene.clear_highlights();
        surface.scene.legend.clear_emphasis();
        for item in &mut surface.scene.items {
            if let Some(label) = item.label.as_mut() {
                label.emphasized = false;
            }
        }
        if !styled {
            return;
        }
        let size = self.default_size();
        for slot in 0..surface.scene.items.len() {
            if surface.in_scope(self.mode, slot) {
                surface.animate(Target::Item(slot), Channel::ImageSize, AnimValue::Scalar(size), 0);
            }
        }
    }

    /// Returns `false` when the event was ignored.
    pub fn hover_item(&mut self, surface: &mut Surface<'_>, id: &str, pointer: Point) -> bool {
        let Some(slot) = surface.scene.slot(id) else {
            return false;
        };
        if self.mode == HoverMode::None || !surface.scene.items[slot].interactive {
            return false;
        }
        self.hovered = Some(slot);
        let s = self.style;

        if self.mode != HoverMode::VerticalList {
            let name = surface.scene.items[slot].name.clone();
            surface.scene.tooltip.text = name;
            surface.scene.tooltip.anchor = pointer;
            surface.animate(
                Target::Tooltip,
                Channel::Opacity,
                AnimValue::Scalar(s.tooltip_opacity),
                s.duration_ms,
            );
        }

        match self.mode {
            HoverMode::None => {}
            HoverMode::Graph => self.enter_graph(surface, slot),
            HoverMode::Tree => self.enter_tree(surface, slot),
            HoverMode::HorizontalList | HoverMode::VerticalList => self.enter_list(surface, slot),
        }
        true
    }

    fn enter_graph(&self, surface: &mut Surface<'_>, slot: usize) {
        let s = self.style;
        let hovered = surface.scene.items[slot].id.clone();

        for e in 0..surface.scene.edges.len() {
            let (a, b) = surface.scene.edges[e].ends();
            let to = if a == slot || b == slot { 1.0 } else { 0.0 };
            surface.animate(Target::Edge(e), Channel::Opacity, AnimValue::Scalar(to), s.duration_ms);
        }

        for other in 0..surface.scene.items.len() {
            let id = surface.scene.items[other].id.clone();
            let (highlight, size) = if other == slot {
                (Highlight::Focused, s.focused_size)
            } else if query::adjacent(surface.store, hovered.as_str(), id.as_str()) {
                (Highlight::Adjacent, s.adjacent_size)
            } else {
                (Highlight::Dimmed, s.base_size)
            };
            self.apply(surface, other, highlight, size);
        }

        surface.scene.legend.clear_emphasis();
        if let Ok(categories) = surface.store.incident_categories(hovered.as_str()) {
            for c in categories {
                surface.scene.legend.emphasize(c);
            }
        }
    }

    fn enter_tree(&self, surface: &mut Surface<'_>, slot: usize) {
        let s = self.style;
        let hovered = surface.scene.items[slot].id.clone();
        for other in 0..surface.scene.items.len() {
            if !surface.in_scope(HoverMode::Tree, other) {
                continue;
            }
            let id = surface.scene.items[other].id.clone();
            let (highlight, size) = if other == slot {
                (Highlight::Focused, s.focused_size)
            } else if query::is_ancestor(surface.store, hovered.as_str(), id.as_str()) {
                (Highlight::Adjacent, s.adjacent_size)
            } else {
                (Highlight::Dimmed, s.base_size)
            };
            self.apply(surface, other, highlight, size);
        }
    }

    fn enter_list(&self, surface: &mut Surface<'_>, slot: usize) {
        for other in 0..surface.scene.items.len() {
            if other != slot && surface.in_scope(self.mode, other) {
                surface.scene.items[other].highlight = Highlight::Dimmed;
            }
        }
        self.apply(surface, slot, Highlight::Focused, self.style.focused_size);
        surface.scene.raise(slot);
        if self.mode == HoverMode::VerticalList
            && let Some(label) = surface.scene.items[slot].label.as_mut()
        {
            label.emphasized = true;
        }
    }

    fn apply(&self, surface: &mut Surface<'_>, slot: usize, highlight: Highlight, size: f64) {
        let d = self.style.duration_ms;
        surface.scene.items[slot].highlight = highlight;
        surface.animate(Target::Item(slot), Channel::ImageSize, AnimValue::Scalar(size), d);
        if highlight != Highlight::Dimmed {
            surface.animate(Target::Item(slot), Channel::Opacity, AnimValue::Scalar(1.0), d);
        }
    }

    /// Undo whatever the current mode's hover-enter did.
    pub fn unhover_item(&mut self, surface: &mut Surface<'_>) -> bool {
        if self.mode == HoverMode::None {
            return false;
        }
        self.hovered = None;
        let d = self.style.duration_ms;
        let size = self.default_size();

        for slot in 0..surface.scene.items.len() {
            if !surface.in_scope(self.mode, slot) {
                continue;
            }
            let item = &mut surface.scene.items[slot];
            item.highlight = Highlight::Normal;
            if let Some(label) = item.label.as_mut() {
                label.emphasized = false;
            }
            surface.animate(Target::Item(slot), Channel::ImageSize, AnimValue::Scalar(size), d);
        }

        surface.animate(Target::Tooltip, Channel::Opacity, AnimValue::Scalar(0.0), d);
        surface.scene.legend.clear_emphasis();

        if self.mode == HoverMode::Graph {
            for e in 0..surface.scene.edges.len() {
                surface.animate(Target::Edge(e), Channel::Opacity, AnimValue::Scalar(1.0), d);
            }
        }
        true
    }

    /// Graph mode only: isolate one relationship category.
    pub fn hover_legend(&mut self, surface: &mut Surface<'_>, category: &str) -> bool {
        if self.mode != HoverMode::Graph || !surface.scene.legend.interactive {
            return false;
        }
        let d = self.style.duration_ms;
        for e in 0..surface.scene.edges.len() {
            let to = if surface.scene.edges[e].kind == category {
                1.0
            } else {
                0.0
            };
            surface.animate(Target::Edge(e), Channel::Opacity, AnimValue::Scalar(to), d);
        }
        self.legend_hovered = true;
        let members = surface.store.category_members(category);
        for slot in 0..surface.scene.items.len() {
            if members.contains(&surface.scene.items[slot].id) {
                surface.animate(
                    Target::Item(slot),
                    Channel::ImageSize,
                    AnimValue::Scalar(self.style.adjacent_size),
                    0,
                );
            }
        }
        true
    }

    pub fn unhover_legend(&mut self, surface: &mut Surface<'_>) -> bool {
        if self.mode != HoverMode::Graph || !surface.scene.legend.interactive {
            return false;
        }
        self.legend_hovered = false;
        let d = self.style.duration_ms;
        for e in 0..surface.scene.edges.len() {
            surface.animate(Target::Edge(e), Channel::Opacity, AnimValue::Scalar(1.0), d);
        }
        for slot in 0..surface.scene.items.len() {
            surface.animate(
                Target::Item(slot),
                Channel::ImageSize,
                AnimValue::Scalar(self.style.base_size),
                0,
            );
        }
        true
    }

    /// Graph mode only: emphasize the legend entry of the edge's category.
    pub fn hover_edge(&mut self, surface: &mut Surface<'_>, index: usize) -> bool {
        let Some(edge) = surface.scene.edges.get(index) else {
            return false;
        };
        if self.mode != HoverMode::Graph || !edge.interactive {
            return false;
        }
        let kind = edge.kind.clone();
        surface.scene.legend.emphasize(&kind);
        true
    }

    pub fn unhover_edge(&mut self, surface: &mut Surface<'_>) -> bool {
        if self.mode != HoverMode::Graph {
            return false;
        }
        surface.scene.legend.clear_emphasis();
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/controller.rs"]
mod tests;
