pub mod annotation;
pub mod position;
pub mod store;

pub use annotation::{Annotation, AnnotationId, ContainerId, RangeError, TextRange};
pub use position::{AdjustedPosition, DesiredPosition};
pub use store::{AnnotationStore, StoreError};
