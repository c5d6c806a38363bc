pub mod html;
pub mod markdown;
pub mod tree;

pub use html::render_html;
pub use markdown::{Container, parse_markdown, split_containers};
pub use tree::{Atom, Element, Mark, NodePath, RenderNode};
