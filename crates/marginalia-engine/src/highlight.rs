//! Painting annotation ranges onto a render tree.
//!
//! Highlighting is a pure transform: the input tree is never touched, and the
//! output has exactly the same text content, only split into more leaves.

use crate::content::tree::{Mark, RenderNode, byte_index, char_len};
use crate::models::{Annotation, AnnotationId};

/// How overlapping ranges are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribution {
    /// One run per distinct covering set, so each run names exactly the
    /// annotations over it.
    PerAnnotation,
    /// Overlapping or touching ranges collapse into one run carrying the union
    /// of their ids.
    Merged,
}

/// A maximal highlighted stretch `[start, end)` of a container's text.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightRun {
    pub start: usize,
    pub end: usize,
    pub annotation_ids: Vec<AnnotationId>,
}

/// Highlight `annotations` over `tree`, one mark per distinct covering set.
pub fn apply_highlights<'a>(
    tree: &RenderNode,
    annotations: impl IntoIterator<Item = &'a Annotation>,
) -> RenderNode {
    let runs = highlight_runs(annotations, Attribution::PerAnnotation);
    Highlighter::new(&runs).apply(tree)
}

/// Highlight `annotations` over `tree`, merging overlapping ranges.
pub fn apply_merged_highlights<'a>(
    tree: &RenderNode,
    annotations: impl IntoIterator<Item = &'a Annotation>,
) -> RenderNode {
    let runs = highlight_runs(annotations, Attribution::Merged);
    Highlighter::new(&runs).apply(tree)
}

/// Sorted, non-overlapping runs for a set of annotations in one container.
///
/// Empty and inverted ranges are ignored.
pub fn highlight_runs<'a>(
    annotations: impl IntoIterator<Item = &'a Annotation>,
    attribution: Attribution,
) -> Vec<HighlightRun> {
    let ranges: Vec<(usize, usize, &AnnotationId)> = annotations
        .into_iter()
        .filter(|a| a.range.start_offset < a.range.end_offset)
        .map(|a| (a.range.start_offset, a.range.end_offset, &a.id))
        .collect();
    match attribution {
        Attribution::PerAnnotation => covered_runs(&ranges),
        Attribution::Merged => merged_runs(ranges),
    }
}

fn covered_runs(ranges: &[(usize, usize, &AnnotationId)]) -> Vec<HighlightRun> {
    let mut bounds: Vec<usize> = ranges.iter().flat_map(|&(s, e, _)| [s, e]).collect();
    bounds.sort_unstable();
    bounds.dedup();

    let mut runs: Vec<HighlightRun> = Vec::new();
    for pair in bounds.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let ids: Vec<AnnotationId> = ranges
            .iter()
            .filter(|&&(s, e, _)| s.max(start) < e.min(end))
            .map(|&(_, _, id)| id.clone())
            .collect();
        if ids.is_empty() {
            continue;
        }
        match runs.last_mut() {
            Some(last) if last.end == start && last.annotation_ids == ids => last.end = end,
            _ => runs.push(HighlightRun {
                start,
                end,
                annotation_ids: ids,
            }),
        }
    }
    runs
}

fn merged_runs(mut ranges: Vec<(usize, usize, &AnnotationId)>) -> Vec<HighlightRun> {
    ranges.sort_by_key(|&(s, e, _)| (s, e));

    let mut runs: Vec<HighlightRun> = Vec::new();
    for (start, end, id) in ranges {
        match runs.last_mut() {
            Some(last) if start <= last.end => {
                last.end = last.end.max(end);
                if !last.annotation_ids.contains(id) {
                    last.annotation_ids.push(id.clone());
                }
            }
            _ => runs.push(HighlightRun {
                start,
                end,
                annotation_ids: vec![id.clone()],
            }),
        }
    }
    runs
}

struct Highlighter<'r> {
    runs: &'r [HighlightRun],
}

impl<'r> Highlighter<'r> {
    fn new(runs: &'r [HighlightRun]) -> Self {
        Self { runs }
    }

    fn apply(&self, tree: &RenderNode) -> RenderNode {
        let mut offset = 0;
        let mut out = self.visit(tree, &mut offset);
        if out.len() == 1 {
            out.remove(0)
        } else {
            RenderNode::Fragment(out)
        }
    }

    fn visit(&self, node: &RenderNode, offset: &mut usize) -> Vec<RenderNode> {
        match node {
            RenderNode::Text(text) => {
                let start = *offset;
                *offset += char_len(text);
                self.split_text(text, start)
            }
            RenderNode::Mark(mark) => {
                *offset += char_len(&mark.text);
                vec![node.clone()]
            }
            RenderNode::Element(el) => {
                let children = self.visit_children(&el.children, offset);
                vec![RenderNode::Element(el.with_replaced_children(children))]
            }
            RenderNode::Fragment(children) => {
                vec![RenderNode::Fragment(self.visit_children(children, offset))]
            }
            RenderNode::Atom(_) => vec![node.clone()],
        }
    }

    fn visit_children(&self, children: &[RenderNode], offset: &mut usize) -> Vec<RenderNode> {
        children
            .iter()
            .flat_map(|child| self.visit(child, offset))
            .collect()
    }

    /// Cut one text leaf at every run boundary inside it
    fn split_text(&self, text: &str, leaf_start: usize) -> Vec<RenderNode> {
        let leaf_end = leaf_start + char_len(text);
        let first = self.runs.partition_point(|run| run.end <= leaf_start);

        let mut out = Vec::new();
        let mut cursor = leaf_start;
        for run in self.runs[first..].iter().take_while(|run| run.start < leaf_end) {
            let start = run.start.max(leaf_start);
            let end = run.end.min(leaf_end);
            if cursor < start {
                out.push(RenderNode::Text(slice(text, cursor - leaf_start, start - leaf_start)));
            }
            if start < end {
                out.push(RenderNode::Mark(Mark {
                    annotation_ids: run.annotation_ids.clone(),
                    text: slice(text, start - leaf_start, end - leaf_start),
                }));
            }
            cursor = end;
        }
        if cursor < leaf_end || out.is_empty() {
            out.push(RenderNode::Text(slice(text, cursor - leaf_start, leaf_end - leaf_start)));
        }
        out
    }
}

fn slice(text: &str, from: usize, to: usize) -> String {
    text[byte_index(text, from)..byte_index(text, to)].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TextRange;
    use pretty_assertions::assert_eq;

    fn annotation(id: &str, start: usize, end: usize) -> Annotation {
        Annotation {
            id: AnnotationId::new(id),
            range: TextRange {
                container_id: "m1".into(),
                start_offset: start,
                end_offset: end,
            },
            text: String::new(),
        }
    }

    fn mark(ids: &[&str], text: &str) -> RenderNode {
        RenderNode::Mark(Mark {
            annotation_ids: ids.iter().map(|id| AnnotationId::new(*id)).collect(),
            text: text.to_string(),
        })
    }

    #[test]
    fn test_overlapping_ranges_split_at_boundaries() {
        let tree = RenderNode::text("helloworld");
        let annotations = [annotation("a", 0, 5), annotation("b", 3, 8)];

        let out = apply_highlights(&tree, &annotations);

        assert_eq!(
            out,
            RenderNode::Fragment(vec![
                mark(&["a"], "hel"),
                mark(&["a", "b"], "lo"),
                mark(&["b"], "wor"),
                RenderNode::text("ld"),
            ])
        );
    }

    #[test]
    fn test_merged_variant_unions_ranges() {
        let tree = RenderNode::text("helloworld");
        let annotations = [annotation("a", 0, 5), annotation("b", 3, 8)];

        let out = apply_merged_highlights(&tree, &annotations);

        assert_eq!(
            out,
            RenderNode::Fragment(vec![mark(&["a", "b"], "hellowor"), RenderNode::text("ld")])
        );
    }

    #[test]
    fn test_merged_variant_joins_touching_ranges() {
        let runs = highlight_runs(
            &[annotation("a", 0, 3), annotation("b", 3, 5), annotation("c", 7, 9)],
            Attribution::Merged,
        );
        let spans: Vec<_> = runs.iter().map(|r| (r.start, r.end)).collect();
        assert_eq!(spans, vec![(0, 5), (7, 9)]);
    }

    #[test]
    fn test_adjacent_runs_with_same_owner_coalesce() {
        let runs = highlight_runs(
            &[annotation("a", 0, 10), annotation("b", 2, 4), annotation("b2", 6, 8)],
            Attribution::PerAnnotation,
        );
        let spans: Vec<_> = runs.iter().map(|r| (r.start, r.end, r.annotation_ids.len())).collect();
        assert_eq!(spans, vec![(0, 2, 1), (2, 4, 2), (4, 6, 1), (6, 8, 2), (8, 10, 1)]);
    }

    #[test]
    fn test_empty_leaf_inside_run_stays_plain() {
        let tree = RenderNode::element(
            "p",
            vec![
                RenderNode::text("ab"),
                RenderNode::element("em", vec![RenderNode::text("")]),
                RenderNode::text("cd"),
            ],
        );

        let out = apply_highlights(&tree, &[annotation("a", 0, 4)]);

        assert_eq!(
            out,
            RenderNode::element(
                "p",
                vec![
                    mark(&["a"], "ab"),
                    RenderNode::element("em", vec![RenderNode::text("")]),
                    mark(&["a"], "cd"),
                ],
            )
        );
    }

    #[test]
    fn test_nested_elements_are_cloned_with_attributes() {
        let tree = RenderNode::Element(
            crate::content::Element::new("p")
                .with_attr("class", "msg")
                .with_children(vec![
                    RenderNode::text("Hello "),
                    RenderNode::element("strong", vec![RenderNode::text("big")]),
                    RenderNode::text(" world"),
                ]),
        );
        let out = apply_highlights(&tree, &[annotation("a", 4, 8)]);

        let expected = RenderNode::Element(
            crate::content::Element::new("p")
                .with_attr("class", "msg")
                .with_children(vec![
                    RenderNode::text("Hell"),
                    mark(&["a"], "o "),
                    RenderNode::element("strong", vec![mark(&["a"], "bi"), RenderNode::text("g")]),
                    RenderNode::text(" world"),
                ]),
        );
        assert_eq!(out, expected);
        assert_eq!(out.text_content(), tree.text_content());
    }

    #[test]
    fn test_empty_and_stale_ranges_paint_nothing() {
        let tree = RenderNode::element("p", vec![RenderNode::text("short")]);
        let annotations = [annotation("empty", 2, 2), annotation("stale", 40, 50)];
        assert_eq!(apply_highlights(&tree, &annotations), tree);
    }

    #[test]
    fn test_atoms_and_existing_marks_pass_through() {
        let tree = RenderNode::element(
            "p",
            vec![
                mark(&["old"], "ab"),
                RenderNode::Atom(crate::content::Atom::LineBreak),
                RenderNode::text("cd"),
            ],
        );
        let out = apply_highlights(&tree, &[annotation("new", 1, 3)]);
        assert_eq!(
            out,
            RenderNode::element(
                "p",
                vec![
                    mark(&["old"], "ab"),
                    RenderNode::Atom(crate::content::Atom::LineBreak),
                    mark(&["new"], "c"),
                    RenderNode::text("d"),
                ],
            )
        );
    }

    #[test]
    fn test_multibyte_text_splits_on_chars() {
        let tree = RenderNode::text("naïve café");
        let out = apply_highlights(&tree, &[annotation("a", 2, 5)]);
        assert_eq!(
            out,
            RenderNode::Fragment(vec![
                RenderNode::text("na"),
                mark(&["a"], "ïve"),
                RenderNode::text(" café"),
            ])
        );
    }

    #[test]
    fn test_input_tree_is_untouched() {
        let tree = RenderNode::text("helloworld");
        let before = tree.clone();
        let _ = apply_highlights(&tree, &[annotation("a", 0, 5)]);
        assert_eq!(tree, before);
    }
}
