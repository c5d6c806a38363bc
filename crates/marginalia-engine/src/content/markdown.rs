//! Markdown → render tree, via pulldown-cmark.
//!
//! The produced text content matches what an HTML serialiser would expose:
//! consecutive block-level siblings are separated by a single `"\n"` leaf and
//! soft breaks become `"\n"`. Images and raw HTML are atoms and carry no text.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use super::tree::{Atom, Element, RenderNode};
use crate::models::ContainerId;

const BLOCK_TAGS: &[&str] = &[
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "blockquote",
    "pre",
    "ul",
    "ol",
    "li",
    "table",
    "thead",
    "tr",
    "div",
];

/// One top-level block of a markdown document, addressable on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub id: ContainerId,
    pub root: RenderNode,
}

fn options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Parse a whole document into a `Fragment` of block nodes.
pub fn parse_markdown(source: &str) -> RenderNode {
    let mut builder = TreeBuilder::new();
    for (event, range) in Parser::new_ext(source, options()).into_offset_iter() {
        builder.event(event, range);
    }
    builder.finish()
}

/// Parse a document and give each top-level block its own container,
/// named `block-0`, `block-1`, ...
pub fn split_containers(source: &str) -> Vec<Container> {
    let RenderNode::Fragment(blocks) = parse_markdown(source) else {
        return Vec::new();
    };
    blocks
        .into_iter()
        .filter(|node| !is_separator(node))
        .enumerate()
        .map(|(i, root)| Container {
            id: ContainerId::new(format!("block-{i}")),
            root,
        })
        .collect()
}

fn is_separator(node: &RenderNode) -> bool {
    matches!(node, RenderNode::Text(text) if text.trim().is_empty())
}

fn is_block(node: &RenderNode) -> bool {
    match node {
        RenderNode::Element(el) => BLOCK_TAGS.contains(&el.tag.as_str()),
        RenderNode::Atom(Atom::Rule) => true,
        _ => false,
    }
}

enum FrameKind {
    Root,
    Element(Element),
    CodeBlock { pre: Element, code: Element },
    Image { src: String },
}

struct Frame {
    kind: FrameKind,
    children: Vec<RenderNode>,
}

struct TreeBuilder {
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame {
                kind: FrameKind::Root,
                children: Vec::new(),
            }],
        }
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.open(tag, range),
            Event::End(_) => self.close(),
            Event::Text(text) => self.push(RenderNode::text(text.into_string())),
            Event::Code(code) => self.push(RenderNode::Element(
                source_attrs(Element::new("code"), &range)
                    .with_children(vec![RenderNode::text(code.into_string())]),
            )),
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                self.push(RenderNode::text(math.into_string()))
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                self.push(RenderNode::Atom(Atom::Html(html.into_string())))
            }
            Event::SoftBreak => self.push(RenderNode::text("\n")),
            Event::HardBreak => self.push(RenderNode::Atom(Atom::LineBreak)),
            Event::Rule => self.push(RenderNode::Atom(Atom::Rule)),
            Event::TaskListMarker(checked) => {
                let mut input = Element::new("input")
                    .with_attr("type", "checkbox")
                    .with_attr("disabled", "");
                if checked {
                    input = input.with_attr("checked", "");
                }
                self.push(RenderNode::Element(input));
            }
            Event::FootnoteReference(name) => self.push(RenderNode::element(
                "sup",
                vec![RenderNode::text(name.into_string())],
            )),
        }
    }

    fn open(&mut self, tag: Tag<'_>, range: Range<usize>) {
        let kind = match tag {
            Tag::CodeBlock(kind) => {
                let mut code = Element::new("code");
                match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => {
                        code = code.with_attr("class", format!("language-{lang}"));
                    }
                    _ => {}
                }
                FrameKind::CodeBlock {
                    pre: source_attrs(Element::new("pre"), &range),
                    code,
                }
            }
            Tag::Image { dest_url, .. } => FrameKind::Image {
                src: dest_url.to_string(),
            },
            Tag::Heading { level, .. } => FrameKind::Element(Element::new(level.to_string())),
            Tag::List(Some(start)) => {
                let mut ol = Element::new("ol");
                if start != 1 {
                    ol = ol.with_attr("start", start.to_string());
                }
                FrameKind::Element(ol)
            }
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut a = Element::new("a").with_attr("href", dest_url.to_string());
                if !title.is_empty() {
                    a = a.with_attr("title", title.to_string());
                }
                FrameKind::Element(a)
            }
            other => FrameKind::Element(Element::new(simple_tag(&other))),
        };
        let kind = match kind {
            FrameKind::Element(el) => FrameKind::Element(source_attrs(el, &range)),
            other => other,
        };
        self.stack.push(Frame {
            kind,
            children: Vec::new(),
        });
    }

    fn close(&mut self) {
        if self.stack.len() < 2 {
            log::debug!("unbalanced end event ignored");
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let node = match frame.kind {
            FrameKind::Root => return,
            FrameKind::Element(el) => RenderNode::Element(el.with_children(frame.children)),
            FrameKind::CodeBlock { pre, code } => RenderNode::Element(
                pre.with_children(vec![RenderNode::Element(code.with_children(frame.children))]),
            ),
            FrameKind::Image { src } => RenderNode::Atom(Atom::Image {
                src,
                alt: RenderNode::Fragment(frame.children).text_content(),
            }),
        };
        self.push(node);
    }

    fn push(&mut self, node: RenderNode) {
        let Some(frame) = self.stack.last_mut() else {
            return;
        };
        let children = &mut frame.children;
        let needs_separator = children
            .last()
            .is_some_and(|prev| is_block(prev) || is_block(&node));
        if needs_separator {
            children.push(RenderNode::text("\n"));
        }
        if let (Some(RenderNode::Text(prev)), RenderNode::Text(next)) = (children.last_mut(), &node) {
            prev.push_str(next);
            return;
        }
        children.push(node);
    }

    fn finish(mut self) -> RenderNode {
        while self.stack.len() > 1 {
            self.close();
        }
        let children = self.stack.pop().map(|f| f.children).unwrap_or_default();
        RenderNode::Fragment(children)
    }
}

fn simple_tag(tag: &Tag<'_>) -> &'static str {
    match tag {
        Tag::Paragraph => "p",
        Tag::BlockQuote(_) => "blockquote",
        Tag::List(_) => "ul",
        Tag::Item => "li",
        Tag::Table(_) => "table",
        Tag::TableHead => "thead",
        Tag::TableRow => "tr",
        Tag::TableCell => "td",
        Tag::Emphasis => "em",
        Tag::Strong => "strong",
        Tag::Strikethrough => "del",
        Tag::HtmlBlock => "div",
        _ => "span",
    }
}

fn source_attrs(el: Element, range: &Range<usize>) -> Element {
    el.with_attr("data-source-start", range.start.to_string())
        .with_attr("data-source-end", range.end.to_string())
}
