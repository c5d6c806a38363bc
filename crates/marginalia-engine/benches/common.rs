// Shared bench fixtures. Each bench binary compiles this module separately and
// only uses part of it, hence the dead_code allowances.
use marginalia_engine::{AnnotationId, DesiredPosition, RenderNode};

#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\nParagraph with **bold** and *italic* content, plus `code`.\n\n- Bullet point\n  - Nested item\n- Another item\n\n> A quote that wraps over a fair number of columns in a narrow terminal.\n\n";
    base.repeat(size)
}

/// A paragraph split into many small formatted runs
#[allow(dead_code)]
pub fn generate_fragmented_tree(runs: usize) -> RenderNode {
    let children = (0..runs)
        .map(|i| {
            if i % 3 == 0 {
                RenderNode::element("em", vec![RenderNode::text(format!("run {i} "))])
            } else {
                RenderNode::text(format!("plain {i} "))
            }
        })
        .collect();
    RenderNode::element("p", children)
}

/// Cards whose anchors cluster closely enough to collide
#[allow(dead_code)]
pub fn generate_desired_positions(count: usize) -> Vec<DesiredPosition> {
    (0..count)
        .map(|i| DesiredPosition::new(AnnotationId::new(format!("a{i}")), (i * 7 % 500) as f64))
        .collect()
}
