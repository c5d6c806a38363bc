//! Re-deriving anchor positions after content or viewport changes.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::geometry::Viewport;
use crate::layout::{Debouncer, LayoutSession};
use crate::models::{Annotation, AnnotationId, ContainerId, DesiredPosition, TextRange};
use crate::offsets::TextOffsetIndex;
use crate::selection::measure_range_top;

/// Something that can report where a range in it currently renders.
pub trait RangeMeasure {
    /// Document-relative top of `range`, or `None` when it can't be measured.
    fn range_top(&self, range: &TextRange) -> Option<f64>;
}

/// Pairs any offset index with a viewport over the same leaves.
pub struct MeasuredContainer<I, V> {
    pub index: I,
    pub viewport: V,
}

impl<I, V> MeasuredContainer<I, V> {
    pub fn new(index: I, viewport: V) -> Self {
        Self { index, viewport }
    }
}

impl<I, V> RangeMeasure for MeasuredContainer<I, V>
where
    I: TextOffsetIndex,
    V: Viewport<Leaf = I::Leaf>,
{
    fn range_top(&self, range: &TextRange) -> Option<f64> {
        measure_range_top(&self.index, &self.viewport, range)
    }
}

/// Containers currently on screen, by id.
#[derive(Default)]
pub struct ContainerRegistry<'a> {
    containers: HashMap<ContainerId, Box<dyn RangeMeasure + 'a>>,
}

impl<'a> ContainerRegistry<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ContainerId, container: Box<dyn RangeMeasure + 'a>) {
        self.containers.insert(id, container);
    }

    pub fn remove(&mut self, id: &ContainerId) -> bool {
        self.containers.remove(id).is_some()
    }

    pub fn get(&self, id: &ContainerId) -> Option<&(dyn RangeMeasure + 'a)> {
        self.containers.get(id).map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

/// Measure every annotation's anchor from its stored offsets.
///
/// Output follows the order of `annotations`. Annotations in unregistered
/// containers, or whose range no longer fits, are left out.
pub fn recompute_anchors<'a>(
    registry: &ContainerRegistry<'_>,
    annotations: impl IntoIterator<Item = &'a Annotation>,
) -> Vec<DesiredPosition> {
    annotations
        .into_iter()
        .filter_map(|annotation| anchor_position(registry, &annotation.id, &annotation.range))
        .collect()
}

fn anchor_position(
    registry: &ContainerRegistry<'_>,
    id: &AnnotationId,
    range: &TextRange,
) -> Option<DesiredPosition> {
    let Some(container) = registry.get(&range.container_id) else {
        log::debug!(
            "annotation {id} anchored in unknown container {}",
            range.container_id
        );
        return None;
    };
    let Some(top) = container.range_top(range) else {
        log::debug!("annotation {id} has no measurable anchor");
        return None;
    };
    Some(DesiredPosition::new(id.clone(), top))
}

/// Coalesces "viewport or content changed" notifications and feeds fresh
/// anchor positions into a [`LayoutSession`] once things settle.
#[derive(Debug, Clone)]
pub struct AnchorTracker {
    reflow: Debouncer<(), ()>,
}

impl AnchorTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            reflow: Debouncer::new(window),
        }
    }

    pub fn notify_changed(&mut self, now: Instant) {
        self.reflow.schedule((), (), now);
    }

    pub fn is_pending(&self) -> bool {
        !self.reflow.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.reflow.next_deadline()
    }

    /// Recompute right away, regardless of pending notifications.
    ///
    /// The session's open composer, if any, is re-measured along with the
    /// annotations.
    pub fn recompute<'a>(
        &mut self,
        registry: &ContainerRegistry<'_>,
        annotations: impl IntoIterator<Item = &'a Annotation>,
        session: &mut LayoutSession,
    ) {
        self.reflow.clear();
        let mut desired = recompute_anchors(registry, annotations);
        if let Some(range) = session.draft_range() {
            desired.extend(anchor_position(registry, &AnnotationId::draft(), range));
        }
        session.set_desired_positions(desired);
    }

    /// Recompute if the reflow window has elapsed. Returns whether it did.
    pub fn poll<'a>(
        &mut self,
        now: Instant,
        registry: &ContainerRegistry<'_>,
        annotations: impl IntoIterator<Item = &'a Annotation>,
        session: &mut LayoutSession,
    ) -> bool {
        if self.reflow.drain_due(now).is_empty() {
            return false;
        }
        self.recompute(registry, annotations, session);
        true
    }
}
