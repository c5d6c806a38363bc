use std::ops::Range;

use super::{Rect, Viewport};
use crate::anchors::{ContainerRegistry, RangeMeasure};
use crate::content::RenderNode;
use crate::models::{ContainerId, TextRange};
use crate::offsets::{LeafPoint, LeafRef, StaticTreeSource, TextOffsetIndex};
use crate::selection::measure_range_top;

/// Split `text` into display lines of at most `width` chars.
///
/// Returns char ranges into `text`. `'\n'` ends a line and is not part of
/// either neighbour; a trailing newline yields a final empty line. A width of
/// zero means "never wrap".
pub fn wrap_lines(text: &str, width: usize) -> Vec<Range<usize>> {
    let width = if width == 0 { usize::MAX } else { width };
    let mut lines = Vec::new();
    let mut start = 0;
    let mut pos = 0;
    for ch in text.chars() {
        if ch == '\n' {
            lines.push(start..pos);
            pos += 1;
            start = pos;
            continue;
        }
        if pos - start == width {
            lines.push(start..pos);
            start = pos;
        }
        pos += 1;
    }
    lines.push(start..pos);
    lines
}

#[derive(Debug, Clone)]
struct GridBlock {
    first_row: usize,
    lines: Vec<Range<usize>>,
    index: StaticTreeSource,
}

impl GridBlock {
    /// (row, column) of a char offset within this block
    fn position(&self, offset: usize) -> (usize, usize) {
        let row = self
            .lines
            .partition_point(|line| line.start <= offset)
            .saturating_sub(1);
        let start = self.lines.get(row).map_or(0, |line| line.start);
        (row, offset - start)
    }
}

/// Containers stacked top to bottom in a fixed-width character grid, one
/// blank row between consecutive containers.
///
/// Vertical coordinates are rows scaled by `line_height`.
#[derive(Debug, Clone)]
pub struct TextGrid {
    width: usize,
    line_height: f64,
    scroll_top: f64,
    blocks: Vec<GridBlock>,
}

impl TextGrid {
    pub fn new(width: usize, line_height: f64) -> Self {
        Self {
            width,
            line_height,
            scroll_top: 0.0,
            blocks: Vec::new(),
        }
    }

    /// Lay out a container below everything pushed so far
    pub fn push_container(&mut self, id: ContainerId, root: &RenderNode) {
        let first_row = self
            .blocks
            .last()
            .map_or(0, |b| b.first_row + b.lines.len() + 1);
        let lines = wrap_lines(&root.text_content(), self.width);
        self.blocks.push(GridBlock {
            first_row,
            lines,
            index: StaticTreeSource::new(id, root),
        });
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    pub fn set_scroll_top(&mut self, scroll_top: f64) {
        self.scroll_top = scroll_top.max(0.0);
    }

    pub fn total_rows(&self) -> usize {
        self.blocks
            .last()
            .map_or(0, |b| b.first_row + b.lines.len())
    }

    pub fn containers(&self) -> impl Iterator<Item = ContainerGeometry<'_>> {
        self.blocks.iter().map(|block| ContainerGeometry { grid: self, block })
    }

    pub fn container(&self, id: &ContainerId) -> Option<ContainerGeometry<'_>> {
        self.containers().find(|c| c.id() == id)
    }

    /// Container and char offset under a document row/column.
    ///
    /// Columns past the end of a line clamp to the line end. Rows between
    /// containers hit nothing.
    pub fn hit_test(&self, row: usize, col: usize) -> Option<(ContainerId, usize)> {
        let block = self
            .blocks
            .iter()
            .find(|b| row >= b.first_row && row < b.first_row + b.lines.len())?;
        let line = &block.lines[row - block.first_row];
        let offset = line.start + col.min(line.len());
        Some((block.index.container_id().clone(), offset))
    }

    /// Like [`TextGrid::hit_test`] but resolved to a leaf point, as a native
    /// selection would report it.
    pub fn hit_point(&self, row: usize, col: usize) -> Option<LeafPoint<LeafRef>> {
        let (id, offset) = self.hit_test(row, col)?;
        self.container(&id)?.index().locate(offset)
    }

    /// Measurable handles for every container
    pub fn registry(&self) -> ContainerRegistry<'_> {
        let mut registry = ContainerRegistry::new();
        for container in self.containers() {
            registry.insert(container.id().clone(), Box::new(container));
        }
        registry
    }
}

/// One container's slice of a [`TextGrid`].
#[derive(Debug, Clone, Copy)]
pub struct ContainerGeometry<'g> {
    grid: &'g TextGrid,
    block: &'g GridBlock,
}

impl<'g> ContainerGeometry<'g> {
    pub fn id(&self) -> &'g ContainerId {
        self.block.index.container_id()
    }

    pub fn index(&self) -> &'g StaticTreeSource {
        &self.block.index
    }

    pub fn first_row(&self) -> usize {
        self.block.first_row
    }

    pub fn lines(&self) -> &'g [Range<usize>] {
        &self.block.lines
    }

    fn rect_for_offsets(&self, start: usize, end: usize) -> Rect {
        let (start_row, start_col) = self.block.position(start);
        let (end_row, end_col) = if end > start {
            let (row, col) = self.block.position(end - 1);
            (row, col + 1)
        } else {
            (start_row, start_col)
        };
        let lh = self.grid.line_height;
        let top = (self.block.first_row + start_row) as f64 * lh - self.grid.scroll_top;
        let (left, width) = if start_row == end_row {
            (start_col as f64, (end_col - start_col) as f64)
        } else {
            (0.0, self.grid.width as f64)
        };
        Rect {
            top,
            left,
            width,
            height: (end_row - start_row + 1) as f64 * lh,
        }
    }
}

impl Viewport for ContainerGeometry<'_> {
    type Leaf = LeafRef;

    fn bounding_rect(&self, start: &LeafPoint<LeafRef>, end: &LeafPoint<LeafRef>) -> Option<Rect> {
        let index = &self.block.index;
        let start = index.offset_of(&start.leaf, start.offset)?;
        let end = index.offset_of(&end.leaf, end.offset)?;
        Some(self.rect_for_offsets(start.min(end), start.max(end)))
    }

    fn scroll_top(&self) -> f64 {
        self.grid.scroll_top
    }
}

impl RangeMeasure for ContainerGeometry<'_> {
    fn range_top(&self, range: &TextRange) -> Option<f64> {
        measure_range_top(self.index(), self, range)
    }
}
