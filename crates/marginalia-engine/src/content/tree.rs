//! Immutable render tree for one commentable container.
//!
//! Only `Text` and `Mark` carry text. Everything that counts as an offset is
//! derived from walking these leaves in document order, so the tree can be
//! re-segmented freely (by highlighting, by markup) without moving offsets.

use std::collections::BTreeMap;

use crate::models::AnnotationId;

/// A node in a rendered content tree.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    /// A tagged element with attributes and children.
    Element(Element),
    /// A plain text run.
    Text(String),
    /// A highlighted text run carrying the ids of the annotations covering it.
    Mark(Mark),
    /// Transparent grouping; renders its children in place.
    Fragment(Vec<RenderNode>),
    /// Non-text, non-element content. Contributes no characters.
    Atom(Atom),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<RenderNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<RenderNode>) -> Self {
        self.children = children;
        self
    }

    /// Same tag and attributes, different children
    pub(crate) fn with_replaced_children(&self, children: Vec<RenderNode>) -> Self {
        Self {
            tag: self.tag.clone(),
            attrs: self.attrs.clone(),
            children,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub annotation_ids: Vec<AnnotationId>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    LineBreak,
    Rule,
    Image { src: String, alt: String },
    Html(String),
}

/// Child-index path from a container root to one of its nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(pub Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, index: usize) -> Self {
        let mut steps = self.0.clone();
        steps.push(index);
        Self(steps)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl RenderNode {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn element(tag: impl Into<String>, children: Vec<RenderNode>) -> Self {
        Self::Element(Element::new(tag).with_children(children))
    }

    pub fn children(&self) -> &[RenderNode] {
        match self {
            RenderNode::Element(el) => &el.children,
            RenderNode::Fragment(children) => children,
            _ => &[],
        }
    }

    /// Text carried directly by this node, if it is a text-bearing leaf
    pub fn leaf_text(&self) -> Option<&str> {
        match self {
            RenderNode::Text(text) => Some(text),
            RenderNode::Mark(mark) => Some(&mark.text),
            _ => None,
        }
    }

    pub fn get(&self, path: &NodePath) -> Option<&RenderNode> {
        path.0
            .iter()
            .try_fold(self, |node, &index| node.children().get(index))
    }

    /// Every text-bearing leaf with its path, in document order
    pub fn leaves(&self) -> Vec<(NodePath, &str)> {
        let mut out = Vec::new();
        collect_leaves(self, NodePath::root(), &mut out);
        out
    }

    /// Concatenated text of all leaves
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        push_text(self, &mut out);
        out
    }

    /// Total length in chars
    #[must_use]
    pub fn text_len(&self) -> usize {
        match self {
            RenderNode::Text(text) => char_len(text),
            RenderNode::Mark(mark) => char_len(&mark.text),
            RenderNode::Atom(_) => 0,
            _ => self.children().iter().map(RenderNode::text_len).sum(),
        }
    }
}

fn collect_leaves<'a>(node: &'a RenderNode, path: NodePath, out: &mut Vec<(NodePath, &'a str)>) {
    if let Some(text) = node.leaf_text() {
        out.push((path, text));
        return;
    }
    for (i, child) in node.children().iter().enumerate() {
        collect_leaves(child, path.child(i), out);
    }
}

fn push_text(node: &RenderNode, out: &mut String) {
    match node.leaf_text() {
        Some(text) => out.push_str(text),
        None => node.children().iter().for_each(|c| push_text(c, out)),
    }
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the `char_index`-th char, clamped to the end of `text`
pub(crate) fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(byte, _)| byte)
}
