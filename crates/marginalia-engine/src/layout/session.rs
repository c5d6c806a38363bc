use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use super::active::ActiveAnnotation;
use super::debounce::Debouncer;
use super::engine::{GAP, Layout, layout};
use crate::models::{AnnotationId, DesiredPosition, TextRange};

/// Tunables for a [`LayoutSession`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Minimum spacing between stacked cards.
    pub gap: f64,
    /// Coalescing window for card size measurements.
    pub size_debounce: Duration,
    /// Coalescing window for viewport/content change notifications.
    pub reflow_debounce: Duration,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gap: GAP,
            size_debounce: Duration::from_millis(50),
            reflow_debounce: Duration::from_millis(250),
        }
    }
}

/// All layout state for one annotated view.
///
/// Hosts drive it from their card lifecycle (mount, unmount, resize) and
/// from focus changes. Every mutation that can affect placement recomputes
/// the whole [`Layout`] before returning, so [`LayoutSession::layout`] never
/// shows a half-applied update.
///
/// The not-yet-submitted comment composer takes part as an ordinary card
/// under [`AnnotationId::draft`].
#[derive(Debug, Clone)]
pub struct LayoutSession {
    config: LayoutConfig,
    visible: HashSet<AnnotationId>,
    sizes: HashMap<AnnotationId, f64>,
    desired: Vec<DesiredPosition>,
    draft: Option<Draft>,
    active: ActiveAnnotation,
    pending_sizes: Debouncer<AnnotationId, f64>,
    layout: Layout,
}

/// The composer's anchor. The range is kept so reflows can re-measure it.
#[derive(Debug, Clone, PartialEq)]
struct Draft {
    range: TextRange,
    top: f64,
}

impl Default for LayoutSession {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl LayoutSession {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            visible: HashSet::new(),
            sizes: HashMap::new(),
            desired: Vec::new(),
            draft: None,
            active: ActiveAnnotation::default(),
            pending_sizes: Debouncer::new(config.size_debounce),
            layout: Layout::default(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// The latest complete layout
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn active(&self) -> Option<&AnnotationId> {
        self.active.id()
    }

    pub fn is_visible(&self, id: &AnnotationId) -> bool {
        self.visible.contains(id)
    }

    pub fn height_of(&self, id: &AnnotationId) -> Option<f64> {
        self.sizes.get(id).copied()
    }

    /// A card was mounted.
    pub fn register_comment(&mut self, id: AnnotationId) {
        if self.visible.insert(id) {
            self.recompute();
        }
    }

    /// A card was unmounted. Drops its size, any pending size update and its
    /// active state.
    pub fn unregister_comment(&mut self, id: &AnnotationId) {
        self.forget(id);
        self.recompute();
    }

    /// Record a card's measured height right away.
    ///
    /// Returns whether anything changed. Heights for untracked cards are
    /// ignored.
    pub fn update_comment_size(&mut self, id: &AnnotationId, height: f64) -> bool {
        if !self.apply_size(id, height) {
            return false;
        }
        self.recompute();
        true
    }

    /// Record a card's measured height after the size debounce window.
    pub fn queue_size_update(&mut self, id: AnnotationId, height: f64, now: Instant) {
        if !self.visible.contains(&id) {
            log::debug!("size update for untracked card {id} ignored");
            return;
        }
        self.pending_sizes.schedule(id, height, now);
    }

    /// Apply every queued size whose window has elapsed, with a single
    /// recompute. Returns whether the layout changed.
    pub fn flush_due(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for (id, height) in self.pending_sizes.drain_due(now) {
            changed |= self.apply_size(&id, height);
        }
        if changed {
            self.recompute();
        }
        changed
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending_sizes.next_deadline()
    }

    /// Replace the anchor positions from a fresh measurement.
    ///
    /// An entry for [`AnnotationId::draft`] moves the open composer; without
    /// one the composer keeps its last measured top.
    pub fn set_desired_positions(&mut self, desired: Vec<DesiredPosition>) {
        let (drafts, persisted): (Vec<_>, Vec<_>) = desired
            .into_iter()
            .partition(|d| d.annotation_id.is_draft());
        if let Some(draft) = &mut self.draft
            && let Some(measured) = drafts.last()
        {
            draft.top = measured.top;
        }
        self.desired = persisted;
        self.recompute();
    }

    pub fn desired_top(&self, id: &AnnotationId) -> Option<f64> {
        if id.is_draft() {
            return self.draft.as_ref().map(|d| d.top);
        }
        self.desired
            .iter()
            .find(|d| &d.annotation_id == id)
            .map(|d| d.top)
    }

    /// Pin a visible card. Focus on a card that is not mounted is ignored.
    pub fn focus(&mut self, id: AnnotationId) {
        if !self.visible.contains(&id) {
            log::debug!("focus on unmounted card {id} ignored");
            return;
        }
        self.active.focus(id);
        self.recompute();
    }

    pub fn blur(&mut self, id: &AnnotationId) {
        self.active.blur(id);
        self.recompute();
    }

    /// The annotation is gone from the store.
    pub fn annotation_deleted(&mut self, id: &AnnotationId) {
        self.forget(id);
        self.desired.retain(|d| &d.annotation_id != id);
        self.recompute();
    }

    /// Open the comment composer for `range`, currently measured at `top`.
    /// It becomes the active card.
    pub fn begin_draft(&mut self, range: TextRange, top: f64) {
        let draft = AnnotationId::draft();
        self.draft = Some(Draft { range, top });
        self.visible.insert(draft.clone());
        self.active.focus(draft);
        self.recompute();
    }

    pub fn has_draft(&self) -> bool {
        self.draft.is_some()
    }

    /// The range the open composer is anchored to
    pub fn draft_range(&self) -> Option<&TextRange> {
        self.draft.as_ref().map(|d| &d.range)
    }

    /// Close the composer without saving. Visibility, size and active state
    /// are all dropped before the single recompute.
    pub fn discard_draft(&mut self) {
        self.draft = None;
        self.forget(&AnnotationId::draft());
        self.recompute();
    }

    /// Turn the composer into the persisted annotation `id`, keeping its
    /// position and measured height. Returns false when there is no draft.
    pub fn commit_draft(&mut self, id: AnnotationId) -> bool {
        let Some(Draft { top, .. }) = self.draft.take() else {
            return false;
        };
        let draft = AnnotationId::draft();
        let height = self.sizes.get(&draft).copied();
        self.forget(&draft);

        if let Some(height) = height {
            self.sizes.insert(id.clone(), height);
        }
        self.desired.retain(|d| d.annotation_id != id);
        self.desired.push(DesiredPosition::new(id.clone(), top));
        self.visible.insert(id);
        self.recompute();
        true
    }

    /// Where to draw a card: its adjusted top, else its desired top, else 0.
    pub fn adjusted_top(&self, id: &AnnotationId) -> f64 {
        self.layout
            .top_of(id)
            .or_else(|| self.desired_top(id))
            .unwrap_or(0.0)
    }

    fn apply_size(&mut self, id: &AnnotationId, height: f64) -> bool {
        if !self.visible.contains(id) {
            log::debug!("size update for untracked card {id} ignored");
            return false;
        }
        if self.sizes.get(id) == Some(&height) {
            return false;
        }
        self.sizes.insert(id.clone(), height);
        true
    }

    fn forget(&mut self, id: &AnnotationId) {
        self.visible.remove(id);
        self.sizes.remove(id);
        self.pending_sizes.cancel(id);
        self.active.removed(id);
    }

    fn recompute(&mut self) {
        let draft = self
            .draft
            .as_ref()
            .map(|d| DesiredPosition::new(AnnotationId::draft(), d.top));
        let desired: Vec<DesiredPosition> = self.desired.iter().cloned().chain(draft).collect();
        self.layout = layout(
            &desired,
            &self.sizes,
            &self.visible,
            self.active.id(),
            self.config.gap,
        );
        log::trace!("layout recomputed: {} cards", self.layout.len());
    }
}
