use crate::{
    animation::ease::Ease,
    foundation::{
        core::{Size, Vec2, Viewport},
        error::{VisError, VisResult},
    },
    interaction::controller::HoverStyle,
    layout::force::ForceConfig,
    scene::model::SceneStyle,
    sections::machine::OutOfRangePolicy,
    store::entity::IntegrityPolicy,
};

/// Transition lengths, in milliseconds. Zero means "apply immediately".
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Durations {
    pub hover_ms: u64,
    pub fade_ms: u64,
    pub resize_ms: u64,
    pub tree_move_ms: u64,
    pub list_move_ms: u64,
    pub names_move_ms: u64,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            hover_ms: 200,
            fade_ms: 600,
            resize_ms: 500,
            tree_move_ms: 500,
            list_move_ms: 1000,
            names_move_ms: 500,
        }
    }
}

/// Square image edge lengths, in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ImageSizes {
    pub graph: f64,
    pub adjacent: f64,
    pub focused: f64,
    pub list: f64,
}

impl Default for ImageSizes {
    fn default() -> Self {
        Self {
            graph: 50.0,
            adjacent: 66.0,
            focused: 80.0,
            list: 24.0,
        }
    }
}

/// Everything an engine instance is built from. Immutable once the engine exists.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub viewport: Viewport,
    pub durations: Durations,
    pub sizes: ImageSizes,
    pub tooltip_opacity: f64,
    /// Subtracted from both viewport dimensions to get the tree's size budget.
    pub tree_inset: f64,
    /// Downward shift of the node group and tree links in the tree section.
    pub tree_offset: f64,
    pub list_column_x: f64,
    pub label_offset: Vec2,
    pub legend_inset: Vec2,
    pub ease: Ease,
    pub force: ForceConfig,
    pub integrity: IntegrityPolicy,
    pub out_of_range: OutOfRangePolicy,
    pub title: String,
    pub subtitle: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            durations: Durations::default(),
            sizes: ImageSizes::default(),
            tooltip_opacity: 0.7,
            tree_inset: 100.0,
            tree_offset: 50.0,
            list_column_x: 60.0,
            label_offset: Vec2::new(50.0, 5.0),
            legend_inset: Vec2::new(100.0, 20.0),
            ease: Ease::default(),
            force: ForceConfig::default(),
            integrity: IntegrityPolicy::default(),
            out_of_range: OutOfRangePolicy::default(),
            title: "Building playlists".to_string(),
            subtitle: "A MST (Minimum spanning tree) approach".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> VisResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> VisResult<()> {
        self.viewport.validate()?;
        self.force.validate()?;

        let s = self.sizes;
        if [s.graph, s.adjacent, s.focused, s.list]
            .iter()
            .any(|v| !v.is_finite() || *v <= 0.0)
        {
            return Err(VisError::validation("image sizes must be finite and > 0"));
        }
        if !(0.0..=1.0).contains(&self.tooltip_opacity) {
            return Err(VisError::validation("tooltip_opacity must be in [0, 1]"));
        }
        if !self.tree_inset.is_finite()
            || self.tree_inset < 0.0
            || self.tree_inset >= self.viewport.width
            || self.tree_inset >= self.viewport.height
        {
            return Err(VisError::validation(
                "tree_inset must be >= 0 and smaller than both viewport dimensions",
            ));
        }
        let finite = [
            self.tree_offset,
            self.list_column_x,
            self.label_offset.x,
            self.label_offset.y,
            self.legend_inset.x,
            self.legend_inset.y,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(VisError::validation("offsets must be finite"));
        }
        Ok(())
    }

    pub fn tree_size(&self) -> Size {
        Size::new(
            self.viewport.width - self.tree_inset,
            self.viewport.height - self.tree_inset,
        )
    }

    pub fn hover_style(&self) -> HoverStyle {
        HoverStyle {
            duration_ms: self.durations.hover_ms,
            base_size: self.sizes.graph,
            adjacent_size: self.sizes.adjacent,
            focused_size: self.sizes.focused,
            list_size: self.sizes.list,
            tooltip_opacity: self.tooltip_opacity,
        }
    }

    pub fn scene_style(&self) -> SceneStyle {
        SceneStyle {
            viewport: self.viewport,
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            image_size: self.sizes.graph,
            tree_link_offset: Vec2::new(0.0, self.tree_offset),
            legend_inset: self.legend_inset,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/config.rs"]
mod tests;
