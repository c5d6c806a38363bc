use html_escape::{encode_double_quoted_attribute, encode_text};

use super::tree::{Atom, Element, Mark, RenderNode};
use crate::models::AnnotationId;

const VOID_TAGS: &[&str] = &["input", "br", "hr", "img"];

/// Serialise a render tree to HTML.
///
/// Highlight runs become `<mark class="highlight">` carrying their ids in
/// `data-annotation-ids`; runs covered by `active` also get `highlight--active`.
pub fn render_html(node: &RenderNode, active: Option<&AnnotationId>) -> String {
    let mut out = String::new();
    write_node(node, active, &mut out);
    out
}

fn write_node(node: &RenderNode, active: Option<&AnnotationId>, out: &mut String) {
    match node {
        RenderNode::Element(el) => write_element(el, active, out),
        RenderNode::Text(text) => out.push_str(&encode_text(text)),
        RenderNode::Mark(mark) => write_mark(mark, active, out),
        RenderNode::Fragment(children) => {
            children.iter().for_each(|c| write_node(c, active, out));
        }
        RenderNode::Atom(atom) => write_atom(atom, out),
    }
}

fn write_element(el: &Element, active: Option<&AnnotationId>, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    for (key, value) in &el.attrs {
        write_attr(key, value, out);
    }
    out.push('>');
    if VOID_TAGS.contains(&el.tag.as_str()) {
        return;
    }
    el.children.iter().for_each(|c| write_node(c, active, out));
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

fn write_mark(mark: &Mark, active: Option<&AnnotationId>, out: &mut String) {
    let is_active = active.is_some_and(|id| mark.annotation_ids.contains(id));
    let class = if is_active {
        "highlight highlight--active"
    } else {
        "highlight"
    };
    let ids = mark
        .annotation_ids
        .iter()
        .map(AnnotationId::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    out.push_str("<mark");
    write_attr("class", class, out);
    write_attr("data-annotation-ids", &ids, out);
    out.push('>');
    out.push_str(&encode_text(&mark.text));
    out.push_str("</mark>");
}

fn write_atom(atom: &Atom, out: &mut String) {
    match atom {
        Atom::LineBreak => out.push_str("<br>"),
        Atom::Rule => out.push_str("<hr>"),
        Atom::Image { src, alt } => {
            out.push_str("<img");
            write_attr("src", src, out);
            write_attr("alt", alt, out);
            out.push('>');
        }
        Atom::Html(raw) => out.push_str(raw),
    }
}

fn write_attr(key: &str, value: &str, out: &mut String) {
    out.push(' ');
    out.push_str(key);
    out.push_str("=\"");
    out.push_str(&encode_double_quoted_attribute(value));
    out.push('"');
}
