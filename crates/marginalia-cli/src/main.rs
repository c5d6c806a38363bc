mod annotations_file;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use marginalia_config::Config;
use marginalia_engine::geometry::wrap_lines;
use marginalia_engine::{
    AnchorTracker, Annotation, AnnotationId, AnnotationStore, Attribution, Container,
    LayoutConfig, LayoutSession, LeafPoint, LeafRef, PositionedSelection, RawSelection, TextGrid,
    TextRange, apply_highlights, highlight_runs, render_html, resolve_positioned_selection,
    split_containers,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env,
    io::stdout,
    ops::Range,
    path::PathBuf,
    process,
    time::{Duration, Instant},
};

const IDLE_POLL: Duration = Duration::from_secs(1);

const HIGHLIGHT: Style = Style::new().fg(Color::Black).bg(Color::Yellow);
const HIGHLIGHT_ACTIVE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::LightMagenta)
    .add_modifier(Modifier::BOLD);
const SELECTED: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Where the composer's text goes when submitted.
enum Target {
    New(TextRange),
    Edit(AnnotationId),
}

/// The comment being typed, and where it will be saved.
struct Composer {
    target: Target,
    text: String,
}

impl Composer {
    fn edits(&self, id: &AnnotationId) -> bool {
        matches!(&self.target, Target::Edit(edited) if edited == id)
    }
}

struct App {
    title: String,
    containers: Vec<Container>,
    store: AnnotationStore,
    annotations_path: Option<PathBuf>,
    session: LayoutSession,
    tracker: AnchorTracker,
    grid: TextGrid,
    wrap_width: usize,
    line_height: f64,
    /// Content pane interior from the last draw, for mouse hit testing
    content_area: Rect,
    margin_width: u16,
    scroll_row: usize,
    drag_anchor: Option<LeafPoint<LeafRef>>,
    selection: Option<PositionedSelection>,
    composer: Option<Composer>,
    status: String,
}

impl App {
    fn new(
        title: String,
        containers: Vec<Container>,
        store: AnnotationStore,
        annotations_path: Option<PathBuf>,
        config: &Config,
    ) -> Self {
        let layout_config = LayoutConfig {
            gap: config.layout.gap,
            size_debounce: config.layout.size_debounce(),
            reflow_debounce: config.layout.reflow_debounce(),
        };
        let mut session = LayoutSession::new(layout_config);
        for annotation in store.iter() {
            session.register_comment(annotation.id.clone());
        }

        Self {
            title,
            containers,
            store,
            annotations_path,
            session,
            tracker: AnchorTracker::new(layout_config.reflow_debounce),
            grid: TextGrid::new(0, config.display.line_height),
            wrap_width: config.display.wrap_width,
            line_height: config.display.line_height,
            content_area: Rect::default(),
            margin_width: 0,
            scroll_row: 0,
            drag_anchor: None,
            selection: None,
            composer: None,
            status: String::new(),
        }
    }

    fn build_grid(&self, width: usize) -> TextGrid {
        let mut grid = TextGrid::new(width, self.line_height);
        for container in &self.containers {
            grid.push_container(container.id.clone(), &container.root);
        }
        grid.set_scroll_top(self.scroll_row as f64 * self.line_height);
        grid
    }

    /// Re-lay the content for the current pane size and measure every card.
    fn sync_viewport(&mut self, content: Rect, margin_width: u16, now: Instant) {
        let first_draw = self.content_area == Rect::default();
        self.content_area = content;
        self.margin_width = margin_width;

        let width = if self.wrap_width == 0 {
            usize::from(content.width)
        } else {
            self.wrap_width
        };
        if first_draw || width != self.grid.width() {
            self.grid = self.build_grid(width);
            if first_draw {
                self.tracker
                    .recompute(&self.grid.registry(), self.store.iter(), &mut self.session);
            } else {
                self.tracker.notify_changed(now);
            }
        }

        self.measure_cards(margin_width, now);
    }

    /// Text a card currently shows: the composer's while it is being edited
    fn card_text(&self, id: &AnnotationId) -> Option<String> {
        match &self.composer {
            Some(composer) if id.is_draft() || composer.edits(id) => Some(composer_text(composer)),
            _ => self.store.get(id).map(|a| a.text.clone()),
        }
    }

    fn measure_cards(&mut self, margin_width: u16, now: Instant) {
        let mut ids: Vec<AnnotationId> = self
            .store
            .iter()
            .filter(|a| self.session.is_visible(&a.id))
            .map(|a| a.id.clone())
            .collect();
        if self.session.has_draft() {
            ids.push(AnnotationId::draft());
        }
        let cards: Vec<(AnnotationId, f64)> = ids
            .into_iter()
            .filter_map(|id| {
                let text = self.card_text(&id)?;
                Some((id, card_height(&text, margin_width, self.line_height)))
            })
            .collect();

        for (id, height) in cards {
            match self.session.height_of(&id) {
                None => {
                    self.session.update_comment_size(&id, height);
                }
                Some(current) if current != height => {
                    self.session.queue_size_update(id, height, now);
                }
                Some(_) => {}
            }
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        [self.session.next_deadline(), self.tracker.next_deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    fn tick(&mut self, now: Instant) {
        self.session.flush_due(now);
        self.tracker.poll(
            now,
            &self.grid.registry(),
            self.store.iter(),
            &mut self.session,
        );
    }

    fn scroll_by(&mut self, rows: isize) {
        let max = self.grid.total_rows().saturating_sub(1);
        self.scroll_row = self.scroll_row.saturating_add_signed(rows).min(max);
        self.grid
            .set_scroll_top(self.scroll_row as f64 * self.line_height);
    }

    fn page(&self) -> isize {
        self.content_area.height.max(1) as isize
    }

    /// Map a terminal cell to a document row and column inside the content pane
    fn document_cell(&self, column: u16, row: u16) -> Option<(usize, usize)> {
        let area = self.content_area;
        if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
            return None;
        }
        Some((
            usize::from(row - area.y) + self.scroll_row,
            usize::from(column - area.x),
        ))
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.composer.is_some() {
                    return;
                }
                self.selection = None;
                self.drag_anchor = self
                    .document_cell(mouse.column, mouse.row)
                    .and_then(|(row, col)| self.grid.hit_point(row, col));
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(anchor) = self.drag_anchor.clone() else {
                    return;
                };
                let Some(focus) = self
                    .document_cell(mouse.column, mouse.row)
                    .and_then(|(row, col)| self.grid.hit_point(row, col))
                else {
                    return;
                };
                let Some(geometry) = self.grid.container(&anchor.leaf.container_id) else {
                    return;
                };
                self.selection = resolve_positioned_selection(
                    geometry.id(),
                    geometry.index(),
                    &geometry,
                    Some(&RawSelection::new(anchor, focus)),
                );
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag_anchor = None,
            MouseEventKind::ScrollDown => self.scroll_by(3),
            MouseEventKind::ScrollUp => self.scroll_by(-3),
            _ => {}
        }
    }

    /// Returns false when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if let Some(composer) = &mut self.composer {
            match key.code {
                KeyCode::Char(c) => composer.text.push(c),
                KeyCode::Backspace => {
                    composer.text.pop();
                }
                KeyCode::Enter => self.submit_comment(),
                KeyCode::Esc => self.close_composer(),
                _ => {}
            }
            return true;
        }

        match key.code {
            KeyCode::Char('q') => return false,
            KeyCode::Char('c') => self.begin_comment(),
            KeyCode::Char('e') => self.begin_edit(),
            KeyCode::Tab => self.cycle_focus(true),
            KeyCode::BackTab => self.cycle_focus(false),
            KeyCode::Char('x') => self.delete_active(),
            KeyCode::Esc => {
                self.selection = None;
                if let Some(active) = self.session.active().cloned() {
                    self.session.blur(&active);
                }
            }
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::PageDown => self.scroll_by(self.page()),
            KeyCode::PageUp => self.scroll_by(-self.page()),
            _ => {}
        }
        true
    }

    fn begin_comment(&mut self) {
        let Some(selection) = self.selection.take() else {
            self.status = "Select some text first".to_string();
            return;
        };
        self.session
            .begin_draft(selection.range.clone(), selection.position_top);
        self.composer = Some(Composer {
            target: Target::New(selection.range),
            text: String::new(),
        });
    }

    /// Open the composer on the focused card's existing text
    fn begin_edit(&mut self) {
        let Some(annotation) = self.session.active().and_then(|id| self.store.get(id)) else {
            self.status = "Focus a comment first".to_string();
            return;
        };
        self.composer = Some(Composer {
            target: Target::Edit(annotation.id.clone()),
            text: annotation.text.clone(),
        });
    }

    fn close_composer(&mut self) {
        match self.composer.take().map(|c| c.target) {
            Some(Target::New(_)) => self.session.discard_draft(),
            Some(Target::Edit(id)) => self.remeasure(&id),
            None => {}
        }
    }

    fn submit_comment(&mut self) {
        let Some(composer) = self.composer.take_if(|c| !c.text.trim().is_empty()) else {
            return;
        };
        let text = composer.text.trim();
        match composer.target {
            Target::New(range) => {
                let id = AnnotationId::generate();
                if let Err(e) = self.store.add(Annotation::new(id.clone(), range, text)) {
                    self.status = format!("Error: {e}");
                    self.session.discard_draft();
                    return;
                }
                self.session.commit_draft(id.clone());
                self.session.focus(id);
            }
            Target::Edit(id) => {
                if let Err(e) = self.store.edit_text(&id, text) {
                    self.status = format!("Error: {e}");
                    return;
                }
                self.remeasure(&id);
            }
        }
        self.persist();
    }

    /// Apply a card's height for its current text right away
    fn remeasure(&mut self, id: &AnnotationId) {
        if let Some(text) = self.card_text(id) {
            let height = card_height(&text, self.margin_width, self.line_height);
            self.session.update_comment_size(id, height);
        }
    }

    fn delete_active(&mut self) {
        let Some(id) = self.session.active().cloned() else {
            return;
        };
        match self.store.delete(&id) {
            Ok(_) => {
                self.session.annotation_deleted(&id);
                self.persist();
            }
            Err(e) => self.status = format!("Error: {e}"),
        }
    }

    /// Move focus to the next (or previous) card in margin order
    fn cycle_focus(&mut self, forward: bool) {
        let ids: Vec<&AnnotationId> = self
            .session
            .layout()
            .positions()
            .iter()
            .map(|p| &p.annotation_id)
            .collect();
        if ids.is_empty() {
            return;
        }
        let current = self
            .session
            .active()
            .and_then(|active| ids.iter().position(|id| *id == active));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => ids.len() - 1,
            (Some(i), true) => (i + 1) % ids.len(),
            (Some(i), false) => (i + ids.len() - 1) % ids.len(),
        };
        let id = ids[next].clone();
        self.session.focus(id);
    }

    fn persist(&mut self) {
        let Some(path) = &self.annotations_path else {
            return;
        };
        if let Err(e) = annotations_file::save(path, &self.store) {
            log::warn!("{e:#}");
            self.status = format!("Error: {e:#}");
        }
    }

    fn content_lines(&self) -> Vec<Line<'static>> {
        let first = self.scroll_row;
        let last = first + usize::from(self.content_area.height);
        let active = self.session.active();
        let marked = match self.composer.as_ref().map(|c| &c.target) {
            Some(Target::New(range)) => Some(range),
            Some(Target::Edit(id)) => self.store.get(id).map(|a| &a.range),
            None => self.selection.as_ref().map(|s| &s.range),
        };

        let mut rows: Vec<Line<'static>> = vec![Line::default(); last - first];
        for (geometry, container) in self.grid.containers().zip(&self.containers) {
            let first_row = geometry.first_row();
            if first_row >= last || first_row + geometry.lines().len() <= first {
                continue;
            }

            let chars: Vec<char> = container.root.text_content().chars().collect();
            let mut styles = vec![Style::default(); chars.len()];
            let runs = highlight_runs(
                self.store.in_container(&container.id),
                Attribution::PerAnnotation,
            );
            for run in runs {
                let style = if active.is_some_and(|id| run.annotation_ids.contains(id)) {
                    HIGHLIGHT_ACTIVE
                } else {
                    HIGHLIGHT
                };
                let end = run.end.min(chars.len());
                styles[run.start.min(end)..end].fill(style);
            }
            if let Some(range) = marked.filter(|r| r.container_id == container.id) {
                let end = range.end_offset.min(chars.len());
                for style in &mut styles[range.start_offset.min(end)..end] {
                    *style = style.patch(SELECTED);
                }
            }

            for (i, line) in geometry.lines().iter().enumerate() {
                let row = first_row + i;
                if (first..last).contains(&row) {
                    rows[row - first] = Line::from(styled_spans(&chars, &styles, line.clone()));
                }
            }
        }
        rows
    }

    fn help_line(&self) -> Line<'static> {
        let keys = if self.composer.is_some() {
            "Enter: Submit | Esc: Discard"
        } else {
            "q: Quit | Drag: Select | c: Comment | e: Edit | Tab/Shift-Tab: Focus | x: Delete | PgUp/PgDn: Scroll"
        };
        let mut spans = vec![Span::raw(keys)];
        if !self.status.is_empty() {
            spans.push(Span::styled(
                format!("  {}", self.status),
                Style::default().fg(Color::Red),
            ));
        }
        Line::from(spans)
    }
}

fn composer_text(composer: &Composer) -> String {
    format!("{}_", composer.text)
}

/// Lines of a card's body when wrapped inside a bordered box `width` wide
fn card_lines(text: &str, width: u16) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    wrap_lines(text, usize::from(width.saturating_sub(2)).max(1))
        .into_iter()
        .map(|range| chars[range].iter().collect())
        .collect()
}

/// Card height in layout units, borders included
fn card_height(text: &str, width: u16, line_height: f64) -> f64 {
    (card_lines(text, width).len() + 2) as f64 * line_height
}

fn styled_spans(chars: &[char], styles: &[Style], range: Range<usize>) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut text = String::new();
    let mut current = Style::default();
    for i in range {
        let style = styles[i];
        if style != current && !text.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut text), current));
        }
        current = style;
        text.push(chars[i]);
    }
    if !text.is_empty() {
        spans.push(Span::styled(text, current));
    }
    spans
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} [--html] <markdown-file> [annotations.toml]");
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("marginalia-cli", String::as_str);
    let html = args.iter().skip(1).any(|a| a == "--html");
    let positional: Vec<&String> = args.iter().skip(1).filter(|a| *a != "--html").collect();
    if positional.is_empty() || positional.len() > 2 {
        print_usage(program);
        process::exit(1);
    }

    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {}", Config::config_path().display());
            process::exit(1);
        }
    };

    let markdown_path = PathBuf::from(positional[0]);
    let source = std::fs::read_to_string(&markdown_path)
        .with_context(|| format!("Failed to read {}", markdown_path.display()))?;
    let containers = split_containers(&source);

    let annotations_path = positional
        .get(1)
        .map(PathBuf::from)
        .or_else(|| config.display.annotations_path.clone());
    let store = match &annotations_path {
        Some(path) => annotations_file::load(path)?,
        None => AnnotationStore::new(),
    };
    log::info!(
        "{} containers, {} annotations",
        containers.len(),
        store.len()
    );

    if html {
        for container in &containers {
            let highlighted = apply_highlights(&container.root, store.in_container(&container.id));
            println!("{}", render_html(&highlighted, None));
        }
        return Ok(());
    }

    let title = markdown_path
        .file_name()
        .map_or_else(|| markdown_path.display().to_string(), |n| n.to_string_lossy().into_owned());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(title, containers, store, annotations_path, &config);

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = app
            .next_deadline()
            .map_or(IDLE_POLL, |deadline| {
                deadline.saturating_duration_since(Instant::now())
            });
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if !app.handle_key(key) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                // Resizes are picked up by the next draw
                _ => {}
            }
        }
        app.tick(Instant::now());
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
        .split(outer[0]);

    let content_block = Block::default()
        .borders(Borders::ALL)
        .title(app.title.clone());
    let margin_block = Block::default().borders(Borders::ALL).title("Comments");
    let content_inner = content_block.inner(panes[0]);
    let margin_inner = margin_block.inner(panes[1]);

    app.sync_viewport(content_inner, margin_inner.width, Instant::now());

    let content = Paragraph::new(app.content_lines()).block(content_block);
    f.render_widget(content, panes[0]);
    f.render_widget(margin_block, panes[1]);
    render_cards(f, app, margin_inner);

    f.render_widget(Paragraph::new(app.help_line()), outer[1]);
}

fn render_cards(f: &mut Frame, app: &App, area: Rect) {
    let active = app.session.active();
    for position in app.session.layout().positions() {
        let id = &position.annotation_id;
        let Some(text) = app.card_text(id) else {
            continue;
        };
        let title = match &app.composer {
            _ if id.is_draft() => "New comment",
            Some(composer) if composer.edits(id) => "Editing",
            _ => "",
        };

        // Layout guarantees the gap in layout units; rounding every top up
        // keeps whole-row cards apart too.
        let row = (position.top / app.line_height).ceil() as i64 - app.scroll_row as i64;
        if row < 0 || row >= i64::from(area.height) {
            continue;
        }
        let row = row as u16;
        let lines = card_lines(&text, area.width);
        let height = (lines.len() as u16 + 2).min(area.height - row);

        let border = if active == Some(id) {
            Style::default().fg(Color::LightMagenta)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let card = Paragraph::new(lines.into_iter().map(Line::from).collect::<Vec<_>>()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title),
        );
        f.render_widget(
            card,
            Rect::new(area.x, area.y + row, area.width, height),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_card_lines_wrap_inside_borders() {
        assert_eq!(card_lines("abcdefgh", 5), vec!["abc", "def", "gh"]);
        assert_eq!(card_lines("", 5), vec![""]);
    }

    #[test]
    fn test_card_height_counts_borders() {
        assert_eq!(card_height("abcdefgh", 5, 20.0), 100.0);
        assert_eq!(card_height("short", 40, 1.0), 3.0);
    }

    #[test]
    fn test_styled_spans_group_equal_styles() {
        let chars: Vec<char> = "hello world".chars().collect();
        let mut styles = vec![Style::default(); chars.len()];
        styles[2..7].fill(HIGHLIGHT);

        let spans = styled_spans(&chars, &styles, 0..9);

        let parts: Vec<(&str, Style)> = spans.iter().map(|s| (&*s.content, s.style)).collect();
        assert_eq!(
            parts,
            vec![
                ("he", Style::default()),
                ("llo w", HIGHLIGHT),
                ("or", Style::default()),
            ]
        );
    }

    #[test]
    fn test_styled_spans_empty_line() {
        assert!(styled_spans(&[], &[], 0..0).is_empty());
    }

    fn two_card_app() -> App {
        let store = AnnotationStore::from_annotations([
            Annotation::new(
                AnnotationId::new("a"),
                TextRange::new("block-0", 0, 5).unwrap(),
                "short",
            ),
            Annotation::new(
                AnnotationId::new("b"),
                TextRange::new("block-1", 0, 6).unwrap(),
                "below",
            ),
        ])
        .unwrap();
        let mut app = App::new(
            "doc".to_string(),
            split_containers("first para\n\nsecond para"),
            store,
            None,
            &Config::default(),
        );
        app.sync_viewport(Rect::new(0, 0, 40, 20), 20, Instant::now());
        app
    }

    fn type_keys(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyEvent::from(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_longer_edit_pushes_next_card_down() {
        let mut app = two_card_app();
        let a = AnnotationId::new("a");
        let b = AnnotationId::new("b");
        app.session.focus(a.clone());
        let before = app.session.adjusted_top(&b);

        app.handle_key(KeyEvent::from(KeyCode::Char('e')));
        assert_eq!(app.composer.as_ref().map(|c| c.text.as_str()), Some("short"));
        type_keys(&mut app, " but now with many more words to wrap");
        app.handle_key(KeyEvent::from(KeyCode::Enter));

        assert!(app.composer.is_none());
        assert_eq!(
            app.store.get(&a).map(|a| a.text.as_str()),
            Some("short but now with many more words to wrap")
        );
        assert_eq!(app.session.adjusted_top(&a), 0.0);
        assert!(app.session.adjusted_top(&b) > before);
    }

    #[test]
    fn test_cancelled_edit_keeps_text() {
        let mut app = two_card_app();
        let a = AnnotationId::new("a");
        let b = AnnotationId::new("b");
        app.session.focus(a.clone());
        let before = app.session.adjusted_top(&b);

        app.handle_key(KeyEvent::from(KeyCode::Char('e')));
        type_keys(&mut app, " and a lot more text that is never saved");
        app.handle_key(KeyEvent::from(KeyCode::Esc));

        assert_eq!(app.store.get(&a).map(|a| a.text.as_str()), Some("short"));
        assert_eq!(app.session.adjusted_top(&b), before);
        assert!(!app.session.has_draft());
    }

    #[test]
    fn test_edit_needs_focused_card() {
        let mut app = two_card_app();
        app.handle_key(KeyEvent::from(KeyCode::Char('e')));
        assert!(app.composer.is_none());
        assert_eq!(app.status, "Focus a comment first");
    }
}
