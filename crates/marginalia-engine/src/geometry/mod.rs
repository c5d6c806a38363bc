//! On-screen measurement.
//!
//! The engine never lays text out itself; it asks a [`Viewport`] for the box
//! around a span of leaves. [`TextGrid`] is the fixed-width implementation
//! used by terminal hosts.

pub mod grid;

pub use grid::{ContainerGeometry, TextGrid, wrap_lines};

use crate::offsets::LeafPoint;

/// Axis-aligned box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// The measuring half of a rendered surface.
pub trait Viewport {
    type Leaf;

    /// Bounding box of the span from `start` to `end`, as currently laid out.
    fn bounding_rect(
        &self,
        start: &LeafPoint<Self::Leaf>,
        end: &LeafPoint<Self::Leaf>,
    ) -> Option<Rect>;

    /// Current vertical scroll offset of the document.
    fn scroll_top(&self) -> f64;
}
