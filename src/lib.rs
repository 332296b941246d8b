//! scrollvis is a scroll-driven visualization engine.
//!
//! One entity set (catalog items joined by typed relationships, plus a spanning hierarchy over
//! the same items) is shown through a fixed sequence of layouts as the reader scrolls: a title
//! card, a force-directed relationship graph, a tidy tree, a horizontal list and a vertical list.
//!
//! # Architecture
//!
//! 1. **Load**: graph + hierarchy JSON -> [`EntityStore`] (identity-stable items, relationships,
//!    derived [`Hierarchy`])
//! 2. **Lay out**: [`ForceSimulation`] (iterative), [`tidy_tree`] and [`OrdinalLayout`]
//!    (deterministic) compute coordinates
//! 3. **Sequence**: [`SectionMachine`] runs every passed-over section effect in scroll order
//! 4. **Animate**: [`Animator`] moves [`Scene`] handle properties with last-write-wins tweens
//! 5. **Interact**: [`InteractionController`] applies per-layout hover highlighting
//! 6. **Export** (optional): [`render_svg`] and [`rasterize_svg`] for headless inspection
//!
//! [`ScrollVis`] binds all of the above into one engine value. Nothing is global, nothing blocks,
//! and time only moves when the host calls [`ScrollVis::advance`].
#![forbid(unsafe_code)]

mod animation;
mod dataset;
mod engine;
mod foundation;
mod interaction;
mod layout;
mod scene;
mod sections;
mod store;

pub use animation::animator::{AnimValue, Animatable, Animator, Channel, Millis, PropKey, Target};
pub use animation::ease::Ease;
pub use dataset::model::{GraphDataset, HierarchyDataset, ItemRecord, LinkRecord, TreeLiteral};
pub use engine::ScrollVis;
pub use engine::config::{Durations, EngineConfig, ImageSizes};
pub use engine::context::SectionKind;
pub use foundation::color::{CATEGORY20, CategoryPalette, Rgb8};
pub use foundation::core::{ItemId, Margin, Point, Rect, Size, Vec2, Viewport, centered_square};
pub use foundation::error::{VisError, VisResult};
pub use interaction::controller::{HoverMode, HoverStyle, InteractionController, Surface};
pub use interaction::query::{adjacent, is_ancestor, related};
pub use layout::LayoutKind;
pub use layout::force::{BiasRule, CategoryBias, ForceConfig, ForceSimulation, TickOutcome};
pub use layout::ordinal::{ListAxis, OrdinalLayout, PointScale};
pub use layout::tree::{TreeGeometry, TreeLink, tidy_tree};
pub use scene::export::render_svg;
pub use scene::model::{
    EdgeHandle, Highlight, ItemHandle, Label, Legend, LegendEntry, Scene, SceneStyle, TitleHandle,
    TitleRole, Tooltip, TreeLinkHandle,
};
pub use scene::raster::{RasterImage, rasterize_svg, svg_options};
pub use sections::machine::{ActivateFn, OutOfRangePolicy, Section, SectionMachine, UpdateFn, plan};
pub use store::entity::{EntityStore, IntegrityPolicy, IntegrityReport, Item, Relationship};
pub use store::hierarchy::{Hierarchy, HierarchyNode};
