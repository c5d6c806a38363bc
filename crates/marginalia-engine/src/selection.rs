//! Converting native selections to stable text ranges, and back to screen
//! positions.

use crate::geometry::Viewport;
use crate::models::{ContainerId, TextRange};
use crate::offsets::{LeafPoint, TextOffsetIndex};

/// A selection as a host reports it: where the drag started and where it
/// currently ends. Either end may come first in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSelection<L> {
    pub anchor: LeafPoint<L>,
    pub focus: LeafPoint<L>,
}

impl<L: PartialEq> RawSelection<L> {
    pub fn new(anchor: LeafPoint<L>, focus: LeafPoint<L>) -> Self {
        Self { anchor, focus }
    }

    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// A resolved range plus the document-relative top of its first line, for
/// placing an "add comment" affordance next to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedSelection {
    pub range: TextRange,
    pub position_top: f64,
}

/// Turn a native selection into a `TextRange` inside `container_id`.
///
/// Returns `None` for an absent or collapsed selection, or one with either end
/// outside the container.
pub fn resolve_selection<I: TextOffsetIndex>(
    container_id: &ContainerId,
    index: &I,
    raw: Option<&RawSelection<I::Leaf>>,
) -> Option<TextRange> {
    let raw = raw?;
    if raw.anchor == raw.focus {
        return None;
    }
    if !index.contains(&raw.anchor.leaf) || !index.contains(&raw.focus.leaf) {
        log::debug!("selection in {container_id} leaves the container");
        return None;
    }

    let anchor = contract_offset(index, &raw.anchor)?;
    let focus = contract_offset(index, &raw.focus)?;
    let (start, end) = if anchor <= focus {
        (anchor, focus)
    } else {
        (focus, anchor)
    };
    if start == end {
        return None;
    }
    TextRange::new(container_id.clone(), start, end).ok()
}

/// `offset_of` for a leaf already known to be in the index; failure here is a
/// caller bug.
fn contract_offset<I: TextOffsetIndex>(index: &I, point: &LeafPoint<I::Leaf>) -> Option<usize> {
    let offset = index.offset_of(&point.leaf, point.offset);
    debug_assert!(
        offset.is_some(),
        "offset_of failed for {:?} at {}",
        point.leaf,
        point.offset
    );
    offset
}

/// Document-relative top of `range` as currently laid out.
///
/// Both bounds are located afresh from the offsets every call. `None` when a
/// bound is past the end of the container's text or the viewport can't
/// measure the span.
pub fn measure_range_top<I, V>(index: &I, viewport: &V, range: &TextRange) -> Option<f64>
where
    I: TextOffsetIndex,
    V: Viewport<Leaf = I::Leaf> + ?Sized,
{
    if !range.fits_within(index.total_len()) {
        log::debug!(
            "stale range {}..{} in {} (len {})",
            range.start_offset,
            range.end_offset,
            range.container_id,
            index.total_len()
        );
        return None;
    }
    let start = index.locate(range.start_offset)?;
    let end = index.locate(range.end_offset)?;
    let rect = viewport.bounding_rect(&start, &end)?;
    Some(rect.top + viewport.scroll_top())
}

/// [`resolve_selection`] followed by [`measure_range_top`].
pub fn resolve_positioned_selection<I, V>(
    container_id: &ContainerId,
    index: &I,
    viewport: &V,
    raw: Option<&RawSelection<I::Leaf>>,
) -> Option<PositionedSelection>
where
    I: TextOffsetIndex,
    V: Viewport<Leaf = I::Leaf> + ?Sized,
{
    let range = resolve_selection(container_id, index, raw)?;
    let position_top = measure_range_top(index, viewport, &range)?;
    Some(PositionedSelection {
        range,
        position_top,
    })
}
