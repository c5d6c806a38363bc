use super::AnnotationId;

/// Where an annotation's anchor text currently renders, in document-relative
/// pixels. Recomputed from layout on every reflow, never stored long-term.
#[derive(Debug, Clone, PartialEq)]
pub struct DesiredPosition {
    pub annotation_id: AnnotationId,
    pub top: f64,
}

impl DesiredPosition {
    pub fn new(annotation_id: AnnotationId, top: f64) -> Self {
        Self { annotation_id, top }
    }
}

/// Final, collision-free vertical placement of a card. Output only; never
/// fed back into layout.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedPosition {
    pub annotation_id: AnnotationId,
    pub top: f64,
}
