use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Reserved id for the in-progress comment composer.
const DRAFT_ID: &str = "__draft__";

/// Identifies a commentable container (one rendered message or block).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContainerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ContainerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Caller-supplied, globally unique annotation identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(String);

impl AnnotationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a fresh random id (v4 UUID).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The id used by the not-yet-submitted comment while it is being composed.
    pub fn draft() -> Self {
        Self(DRAFT_ID.to_string())
    }

    pub fn is_draft(&self) -> bool {
        self.0 == DRAFT_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnnotationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("range start {start} is after range end {end}")]
    Inverted { start: usize, end: usize },
}

/// A half-open character range `[start_offset, end_offset)` into the
/// concatenated text of one container.
///
/// Offsets count `char`s across every text-bearing leaf in document order, so
/// the same range survives any change in how the text is split into nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub container_id: ContainerId,
    /// Inclusive start offset.
    pub start_offset: usize,
    /// Exclusive end offset.
    pub end_offset: usize,
}

impl TextRange {
    pub fn new(
        container_id: impl Into<ContainerId>,
        start_offset: usize,
        end_offset: usize,
    ) -> Result<Self, RangeError> {
        if start_offset > end_offset {
            return Err(RangeError::Inverted {
                start: start_offset,
                end: end_offset,
            });
        }
        Ok(Self {
            container_id: container_id.into(),
            start_offset,
            end_offset,
        })
    }

    /// Length in chars. Uses saturating subtraction so a hand-built inverted
    /// range reads as empty.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end_offset.saturating_sub(self.start_offset)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Half-open overlap test against `[start, end)`.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start_offset.max(start) < self.end_offset.min(end)
    }

    /// True when the range still addresses text in a container of `total_len` chars.
    pub fn fits_within(&self, total_len: usize) -> bool {
        self.start_offset <= self.end_offset && self.end_offset <= total_len
    }
}

/// A user comment bound to a text range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub range: TextRange,
    pub text: String,
}

impl Annotation {
    pub fn new(id: AnnotationId, range: TextRange, text: impl Into<String>) -> Self {
        Self {
            id,
            range,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_rejects_inverted_offsets() {
        let err = TextRange::new("m1", 5, 2).unwrap_err();
        assert_eq!(err, RangeError::Inverted { start: 5, end: 2 });
    }

    #[test]
    fn test_range_len_and_empty() {
        let range = TextRange::new("m1", 3, 8).unwrap();
        assert_eq!(range.len(), 5);
        assert!(!range.is_empty());
        assert!(TextRange::new("m1", 4, 4).unwrap().is_empty());
    }

    #[test]
    fn test_range_overlap_is_half_open() {
        let range = TextRange::new("m1", 3, 8).unwrap();
        assert!(range.overlaps(0, 4));
        assert!(range.overlaps(7, 12));
        assert!(!range.overlaps(0, 3));
        assert!(!range.overlaps(8, 10));
    }

    #[test]
    fn test_range_fits_within() {
        let range = TextRange::new("m1", 3, 8).unwrap();
        assert!(range.fits_within(8));
        assert!(!range.fits_within(7));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(AnnotationId::generate(), AnnotationId::generate());
    }

    #[test]
    fn test_draft_id_is_recognised() {
        assert!(AnnotationId::draft().is_draft());
        assert!(!AnnotationId::new("a1").is_draft());
    }
}
