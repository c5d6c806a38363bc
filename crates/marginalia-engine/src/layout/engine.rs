use std::collections::{HashMap, HashSet};

use crate::models::{AdjustedPosition, AnnotationId, DesiredPosition};

/// Default vertical spacing between stacked cards.
pub const GAP: f64 = 10.0;

/// One complete layout result, in reading order (ascending desired top).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: Vec<AdjustedPosition>,
}

impl Layout {
    pub fn positions(&self) -> &[AdjustedPosition] {
        &self.positions
    }

    pub fn top_of(&self, id: &AnnotationId) -> Option<f64> {
        self.positions
            .iter()
            .find(|p| &p.annotation_id == id)
            .map(|p| p.top)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Place every visible card so that no two overlap.
///
/// Cards are ordered by desired top; the sort is stable so equal tops keep
/// their input order. Without an active card each card sits at
/// `max(desired, previous bottom + gap)`. An active card stays at its desired
/// top, and the cards above and below are pushed away from it independently.
/// A missing height counts as zero. Only the first entry for an id is used.
pub fn layout(
    desired: &[DesiredPosition],
    sizes: &HashMap<AnnotationId, f64>,
    visible: &HashSet<AnnotationId>,
    active: Option<&AnnotationId>,
    gap: f64,
) -> Layout {
    let mut seen = HashSet::new();
    let mut cards: Vec<&DesiredPosition> = desired
        .iter()
        .filter(|d| visible.contains(&d.annotation_id))
        .filter(|d| seen.insert(&d.annotation_id))
        .collect();
    cards.sort_by(|a, b| a.top.total_cmp(&b.top));

    let heights: Vec<f64> = cards
        .iter()
        .map(|c| sizes.get(&c.annotation_id).copied().unwrap_or(0.0))
        .collect();
    let mut tops: Vec<f64> = cards.iter().map(|c| c.top).collect();

    let pinned = active.and_then(|id| cards.iter().position(|c| &c.annotation_id == id));
    match pinned {
        None => {
            for i in 1..cards.len() {
                let floor = tops[i - 1] + heights[i - 1] + gap;
                if tops[i] < floor {
                    tops[i] = floor;
                }
            }
        }
        Some(pin) => {
            log::trace!("layout pinned on {}", cards[pin].annotation_id);
            for i in (0..pin).rev() {
                tops[i] = cards[i].top.min(tops[i + 1] - heights[i] - gap);
            }
            for i in pin + 1..cards.len() {
                tops[i] = cards[i].top.max(tops[i - 1] + heights[i - 1] + gap);
            }
        }
    }

    let positions = cards
        .iter()
        .zip(tops)
        .map(|(card, top)| AdjustedPosition {
            annotation_id: card.annotation_id.clone(),
            top,
        })
        .collect();
    Layout { positions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn desired(entries: &[(&str, f64)]) -> Vec<DesiredPosition> {
        entries
            .iter()
            .map(|&(id, top)| DesiredPosition::new(AnnotationId::new(id), top))
            .collect()
    }

    fn heights(entries: &[(&str, f64)]) -> HashMap<AnnotationId, f64> {
        entries
            .iter()
            .map(|&(id, h)| (AnnotationId::new(id), h))
            .collect()
    }

    fn visible(ids: &[&str]) -> HashSet<AnnotationId> {
        ids.iter().map(|id| AnnotationId::new(*id)).collect()
    }

    fn tops(layout: &Layout) -> Vec<(&str, f64)> {
        layout
            .positions()
            .iter()
            .map(|p| (p.annotation_id.as_str(), p.top))
            .collect()
    }

    fn three() -> (Vec<DesiredPosition>, HashMap<AnnotationId, f64>, HashSet<AnnotationId>) {
        (
            desired(&[("1", 100.0), ("2", 110.0), ("3", 120.0)]),
            heights(&[("1", 50.0), ("2", 50.0), ("3", 50.0)]),
            visible(&["1", "2", "3"]),
        )
    }

    #[test]
    fn test_forward_pass_without_active() {
        let (d, s, v) = three();
        let out = layout(&d, &s, &v, None, GAP);
        assert_eq!(tops(&out), vec![("1", 100.0), ("2", 160.0), ("3", 220.0)]);
    }

    #[test]
    fn test_active_card_is_pinned() {
        let (d, s, v) = three();
        let active = AnnotationId::new("2");
        let out = layout(&d, &s, &v, Some(&active), GAP);
        assert_eq!(tops(&out), vec![("1", 50.0), ("2", 110.0), ("3", 170.0)]);
    }

    #[test]
    fn test_active_first_card_pushes_everything_down() {
        let (d, s, v) = three();
        let active = AnnotationId::new("1");
        let out = layout(&d, &s, &v, Some(&active), GAP);
        assert_eq!(tops(&out), vec![("1", 100.0), ("2", 160.0), ("3", 220.0)]);
    }

    #[test]
    fn test_active_last_card_pulls_everything_up() {
        let (d, s, v) = three();
        let active = AnnotationId::new("3");
        let out = layout(&d, &s, &v, Some(&active), GAP);
        assert_eq!(tops(&out), vec![("1", 0.0), ("2", 60.0), ("3", 120.0)]);
    }

    #[test]
    fn test_invisible_cards_are_omitted() {
        let (d, s, _) = three();
        let out = layout(&d, &s, &visible(&["1", "3"]), None, GAP);
        assert_eq!(tops(&out), vec![("1", 100.0), ("3", 160.0)]);
    }

    #[test]
    fn test_active_not_visible_is_ignored() {
        let (d, s, _) = three();
        let hidden = AnnotationId::new("2");
        let out = layout(&d, &s, &visible(&["1", "3"]), Some(&hidden), GAP);
        assert_eq!(tops(&out), vec![("1", 100.0), ("3", 160.0)]);
    }

    #[test]
    fn test_missing_height_counts_as_zero() {
        let d = desired(&[("a", 0.0), ("b", 0.0), ("c", 5.0)]);
        let out = layout(&d, &heights(&[("a", 20.0)]), &visible(&["a", "b", "c"]), None, GAP);
        assert_eq!(tops(&out), vec![("a", 0.0), ("b", 30.0), ("c", 40.0)]);
    }

    #[test]
    fn test_sorts_by_desired_top_keeping_ties_stable() {
        let d = desired(&[("late", 300.0), ("x", 10.0), ("y", 10.0)]);
        let out = layout(&d, &HashMap::new(), &visible(&["late", "x", "y"]), None, 0.0);
        assert_eq!(tops(&out), vec![("x", 10.0), ("y", 10.0), ("late", 300.0)]);
    }

    #[test]
    fn test_is_idempotent() {
        let (d, s, v) = three();
        let active = AnnotationId::new("2");
        assert_eq!(
            layout(&d, &s, &v, Some(&active), GAP),
            layout(&d, &s, &v, Some(&active), GAP)
        );
    }

    #[test]
    fn test_empty_input() {
        let out = layout(&[], &HashMap::new(), &HashSet::new(), None, GAP);
        assert!(out.is_empty());
        assert_eq!(out.top_of(&AnnotationId::new("x")), None);
    }

    #[rstest]
    #[case(&[("a", 0.0, 30.0), ("b", 5.0, 10.0), ("c", 7.0, 80.0), ("d", 200.0, 5.0)], None)]
    #[case(&[("a", 0.0, 30.0), ("b", 5.0, 10.0), ("c", 7.0, 80.0), ("d", 200.0, 5.0)], Some("c"))]
    #[case(&[("a", 50.0, 40.0), ("b", 50.0, 40.0), ("c", 50.0, 40.0)], Some("b"))]
    #[case(&[("a", 100.0, 0.0), ("b", 90.0, 15.0), ("c", 400.0, 100.0)], Some("a"))]
    fn test_no_two_cards_overlap(#[case] cards: &[(&str, f64, f64)], #[case] active: Option<&str>) {
        let d: Vec<_> = cards
            .iter()
            .map(|&(id, top, _)| DesiredPosition::new(AnnotationId::new(id), top))
            .collect();
        let s: HashMap<_, _> = cards
            .iter()
            .map(|&(id, _, h)| (AnnotationId::new(id), h))
            .collect();
        let v: HashSet<_> = cards.iter().map(|&(id, _, _)| AnnotationId::new(id)).collect();
        let active = active.map(AnnotationId::new);

        let out = layout(&d, &s, &v, active.as_ref(), GAP);

        for pair in out.positions().windows(2) {
            let height = s[&pair[0].annotation_id];
            assert!(
                pair[1].top >= pair[0].top + height + GAP,
                "{:?} overlaps {:?}",
                pair[0],
                pair[1]
            );
        }
        if let Some(id) = &active {
            let wanted = d.iter().find(|p| &p.annotation_id == id).map(|p| p.top);
            assert_eq!(out.top_of(id), wanted);
        }
    }
}
