use crate::models::AnnotationId;

/// Which card, if any, is pinned during layout.
///
/// Focusing another id moves straight to it; only a blur of the same id, or
/// removal of that annotation, returns to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActiveAnnotation {
    #[default]
    None,
    Active(AnnotationId),
}

impl ActiveAnnotation {
    pub fn id(&self) -> Option<&AnnotationId> {
        match self {
            Self::None => Option::None,
            Self::Active(id) => Some(id),
        }
    }

    pub fn is_active(&self, id: &AnnotationId) -> bool {
        self.id() == Some(id)
    }

    pub fn focus(&mut self, id: AnnotationId) {
        *self = Self::Active(id);
    }

    /// Blur of a different id is a no-op.
    pub fn blur(&mut self, id: &AnnotationId) {
        if self.is_active(id) {
            *self = Self::None;
        }
    }

    /// The annotation went away (deleted, unregistered or discarded).
    pub fn removed(&mut self, id: &AnnotationId) {
        self.blur(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> AnnotationId {
        AnnotationId::new(s)
    }

    #[test]
    fn test_starts_inactive() {
        assert_eq!(ActiveAnnotation::default().id(), None);
    }

    #[test]
    fn test_focus_switches_directly() {
        let mut active = ActiveAnnotation::default();
        active.focus(id("a"));
        active.focus(id("b"));
        assert_eq!(active, ActiveAnnotation::Active(id("b")));
    }

    #[test]
    fn test_blur_of_other_id_is_ignored() {
        let mut active = ActiveAnnotation::Active(id("a"));
        active.blur(&id("b"));
        assert!(active.is_active(&id("a")));
        active.blur(&id("a"));
        assert_eq!(active, ActiveAnnotation::None);
    }

    #[test]
    fn test_removal_clears() {
        let mut active = ActiveAnnotation::Active(id("a"));
        active.removed(&id("a"));
        assert_eq!(active.id(), None);
    }
}
