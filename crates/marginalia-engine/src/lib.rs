//! Anchoring comments to text in rendered content.
//!
//! Selections become stable character ranges ([`selection`]), ranges are
//! painted back as highlights ([`highlight`]), and comment cards are kept next
//! to their anchors without overlapping ([`layout`], [`anchors`]).

pub mod anchors;
pub mod content;
pub mod geometry;
pub mod highlight;
pub mod layout;
pub mod models;
pub mod offsets;
pub mod selection;

// Re-export key types for easier usage
pub use anchors::{AnchorTracker, ContainerRegistry, MeasuredContainer, RangeMeasure, recompute_anchors};
pub use content::{Container, RenderNode, parse_markdown, render_html, split_containers};
pub use geometry::{Rect, TextGrid, Viewport};
pub use highlight::{Attribution, HighlightRun, apply_highlights, apply_merged_highlights, highlight_runs};
pub use layout::{ActiveAnnotation, GAP, Layout, LayoutConfig, LayoutSession, layout};
pub use models::*;
pub use offsets::{LeafPoint, LeafRef, LiveDocument, LiveDomSource, StaticTreeSource, TextOffsetIndex};
pub use selection::{
    PositionedSelection, RawSelection, measure_range_top, resolve_positioned_selection, resolve_selection,
};
