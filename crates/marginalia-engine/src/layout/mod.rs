//! Collision-free placement of comment cards.

pub mod active;
pub mod debounce;
pub mod engine;
pub mod session;

pub use active::ActiveAnnotation;
pub use debounce::Debouncer;
pub use engine::{GAP, Layout, layout};
pub use session::{LayoutConfig, LayoutSession};
