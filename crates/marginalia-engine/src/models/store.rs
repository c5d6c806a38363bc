use super::{Annotation, AnnotationId, ContainerId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Annotation already exists: {0}")]
    Duplicate(AnnotationId),
    #[error("Annotation not found: {0}")]
    NotFound(AnnotationId),
    #[error("Annotation id is reserved for the comment composer: {0}")]
    ReservedId(AnnotationId),
}

/// In-memory comment list, kept in insertion order.
///
/// The layout core only ever reads this; hosts own the mutations.
#[derive(Debug, Default, Clone)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an existing list, rejecting duplicate ids
    pub fn from_annotations(
        annotations: impl IntoIterator<Item = Annotation>,
    ) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for annotation in annotations {
            store.add(annotation)?;
        }
        Ok(store)
    }

    /// Append a new annotation
    pub fn add(&mut self, annotation: Annotation) -> Result<(), StoreError> {
        if annotation.id.is_draft() {
            return Err(StoreError::ReservedId(annotation.id));
        }
        if self.get(&annotation.id).is_some() {
            return Err(StoreError::Duplicate(annotation.id));
        }
        self.annotations.push(annotation);
        Ok(())
    }

    /// Remove an annotation, returning it
    pub fn delete(&mut self, id: &AnnotationId) -> Result<Annotation, StoreError> {
        let index = self
            .annotations
            .iter()
            .position(|a| &a.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        Ok(self.annotations.remove(index))
    }

    /// Replace the comment body; the range is never edited
    pub fn edit_text(&mut self, id: &AnnotationId, text: impl Into<String>) -> Result<(), StoreError> {
        let annotation = self
            .annotations
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        annotation.text = text.into();
        Ok(())
    }

    pub fn get(&self, id: &AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| &a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Annotations anchored in one container, in store order
    pub fn in_container<'a>(
        &'a self,
        container_id: &'a ContainerId,
    ) -> impl Iterator<Item = &'a Annotation> + 'a {
        self.annotations
            .iter()
            .filter(move |a| &a.range.container_id == container_id)
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TextRange;

    fn annotation(id: &str, container: &str, start: usize, end: usize) -> Annotation {
        Annotation::new(
            AnnotationId::new(id),
            TextRange::new(container, start, end).unwrap(),
            format!("comment {id}"),
        )
    }

    #[test]
    fn test_composer_id_is_rejected() {
        let mut store = AnnotationStore::new();
        let draft = Annotation::new(
            AnnotationId::new("__draft__"),
            TextRange::new("m1", 0, 3).unwrap(),
            "",
        );

        assert_eq!(
            store.add(draft.clone()),
            Err(StoreError::ReservedId(AnnotationId::draft()))
        );
        assert!(AnnotationStore::from_annotations([draft]).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = AnnotationStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut store = AnnotationStore::new();
        store.add(annotation("b", "m1", 5, 8)).unwrap();
        store.add(annotation("a", "m1", 0, 3)).unwrap();

        let ids: Vec<_> = store.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let mut store = AnnotationStore::new();
        store.add(annotation("a", "m1", 0, 3)).unwrap();

        let err = store.add(annotation("a", "m2", 1, 2)).unwrap_err();
        assert_eq!(err, StoreError::Duplicate(AnnotationId::new("a")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_from_annotations_rejects_duplicates() {
        let result = AnnotationStore::from_annotations([
            annotation("a", "m1", 0, 3),
            annotation("a", "m1", 4, 6),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_delete() {
        let mut store =
            AnnotationStore::from_annotations([annotation("a", "m1", 0, 3), annotation("b", "m1", 4, 6)])
                .unwrap();

        let removed = store.delete(&AnnotationId::new("a")).unwrap();
        assert_eq!(removed.id.as_str(), "a");
        assert_eq!(store.len(), 1);

        let err = store.delete(&AnnotationId::new("a")).unwrap_err();
        assert_eq!(err, StoreError::NotFound(AnnotationId::new("a")));
    }

    #[test]
    fn test_edit_text_only_touches_body() {
        let mut store = AnnotationStore::from_annotations([annotation("a", "m1", 0, 3)]).unwrap();

        store.edit_text(&AnnotationId::new("a"), "rewritten").unwrap();

        let edited = store.get(&AnnotationId::new("a")).unwrap();
        assert_eq!(edited.text, "rewritten");
        assert_eq!(edited.range, TextRange::new("m1", 0, 3).unwrap());
        assert!(store.edit_text(&AnnotationId::new("zz"), "x").is_err());
    }

    #[test]
    fn test_in_container_filters() {
        let store = AnnotationStore::from_annotations([
            annotation("a", "m1", 0, 3),
            annotation("b", "m2", 0, 3),
            annotation("c", "m1", 5, 9),
        ])
        .unwrap();

        let m1 = ContainerId::new("m1");
        let ids: Vec<_> = store.in_container(&m1).map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
