use pdf_flow::elements::{
    FilledBox, HorizontalRule, PageNumbers, Paragraph, TextBlock, VerticalSpacer,
};
use pdf_flow::flow::{
    Backend, Canvas, Dividable, Divided, Drawable, KeepTogether, PageHooks, PdfBackend,
    PdfCanvas, RenderContext, WidthRespecting,
};
use pdf_flow::layout::{width_of_text, wrap_lines, TextMetrics};
use pdf_flow::{
    colours, Colour, Coords, Font, Margins, PDFError, Page, PageContents, PageGeometry, Pt,
    Rect, SpanFont, SpanLayout,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A 600 x 800 pt page with a 500 x 700 pt content box
fn geometry() -> PageGeometry {
    PageGeometry::new((Pt(600.0), Pt(800.0)), Margins::all(Pt(50.0)))
}

fn filled_rects(page: &Page) -> Vec<Rect> {
    page.contents
        .iter()
        .filter_map(|content| match content {
            PageContents::FillRect { rect, .. } => Some(*rect),
            _ => None,
        })
        .collect()
}

/// 5pt wide glyphs on 10pt lines at size 10
struct Monospace;

impl TextMetrics for Monospace {
    fn advance(&self, _ch: char, size: Pt) -> Pt {
        size * 0.5
    }

    fn ascent(&self, size: Pt) -> Pt {
        size * 0.8
    }

    fn descent(&self, size: Pt) -> Pt {
        size * -0.2
    }

    fn leading(&self, _size: Pt) -> Pt {
        Pt(0.0)
    }
}

fn span_font() -> SpanFont {
    SpanFont {
        id: id_arena::Arena::<Font>::new().next_id(),
        size: Pt(10.0),
    }
}

/// Remembers every page it opens and closes
#[derive(Default)]
struct RecordingBackend {
    inner: PdfBackend,
    opened: Vec<usize>,
    closed: Vec<usize>,
}

impl Backend for RecordingBackend {
    type Canvas = PdfCanvas;

    fn open(&mut self, page_index: usize, geometry: &PageGeometry) -> Result<PdfCanvas, PDFError> {
        self.opened.push(page_index);
        self.inner.open(page_index, geometry)
    }

    fn close(&mut self, page_index: usize, canvas: PdfCanvas) -> Result<(), PDFError> {
        self.closed.push(page_index);
        self.inner.close(page_index, canvas)
    }
}

#[derive(Default)]
struct RecordingHooks {
    events: Vec<String>,
    fail_before: Option<usize>,
    fail_after: Option<usize>,
}

impl PageHooks for RecordingHooks {
    fn before_page(
        &mut self,
        page_index: usize,
        _geometry: &PageGeometry,
        _canvas: &mut dyn Canvas,
    ) -> Result<(), PDFError> {
        self.events.push(format!("before {page_index}"));
        if self.fail_before == Some(page_index) {
            return Err(PDFError::Hook(format!("no header for page {page_index}")));
        }
        Ok(())
    }

    fn after_page(
        &mut self,
        page_index: usize,
        _geometry: &PageGeometry,
        _canvas: &mut dyn Canvas,
    ) -> Result<(), PDFError> {
        self.events.push(format!("after {page_index}"));
        if self.fail_after == Some(page_index) {
            return Err(PDFError::Hook(format!("no footer for page {page_index}")));
        }
        Ok(())
    }
}

#[test]
fn tall_block_spans_three_pages() {
    init_logging();
    let mut backend = PdfBackend::new();
    {
        let mut context = RenderContext::new(geometry(), &mut backend).unwrap();
        context
            .draw(&mut FilledBox::new(Pt(100.0), Pt(1500.0), colours::BLACK))
            .unwrap();
        assert_eq!(context.page_index(), 2);
        assert_eq!(context.remaining_height(), Pt(600.0));
        context.close().unwrap();
    }

    let pages = backend.into_pages();
    assert_eq!(pages.len(), 3);
    // the last part shows the final 100pt of the box at the top of the page
    let last = filled_rects(&pages[2]);
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].y1, Pt(650.0));
    for page in &pages {
        assert!(page
            .contents
            .contains(&PageContents::Clip(geometry().content_box())));
    }
}

#[test]
fn blocks_kept_together_move_to_the_next_page() {
    init_logging();
    let mut backend = PdfBackend::new();
    {
        let mut context = RenderContext::new(geometry(), &mut backend).unwrap();
        for _ in 0..2 {
            let block = FilledBox::new(Pt(100.0), Pt(400.0), colours::GREY);
            context.draw(&mut KeepTogether::new(block)).unwrap();
        }
        assert_eq!(context.page_index(), 1);
    }

    let pages = backend.into_pages();
    assert_eq!(pages.len(), 2);
    assert_eq!(
        filled_rects(&pages[0]),
        vec![Rect::from_xywh(Pt(50.0), Pt(350.0), Pt(100.0), Pt(400.0))]
    );
    assert_eq!(
        filled_rects(&pages[1]),
        vec![Rect::from_xywh(Pt(50.0), Pt(350.0), Pt(100.0), Pt(400.0))]
    );
}

#[test]
fn absolute_blocks_are_never_paginated() {
    init_logging();
    let mut backend = PdfBackend::new();
    {
        let mut context = RenderContext::new(geometry(), &mut backend).unwrap();
        let before = context.current_position();
        let mut block =
            FilledBox::new(Pt(20.0), Pt(10000.0), colours::RED).at(Coords::new(Pt(50.0), Pt(50.0)));
        context.draw(&mut block).unwrap();

        assert_eq!(context.page_index(), 0);
        assert_eq!(context.current_position(), before);
    }

    let pages = backend.into_pages();
    assert_eq!(pages.len(), 1);
    assert_eq!(
        pages[0].contents,
        vec![PageContents::FillRect {
            rect: Rect::from_xywh(Pt(50.0), Pt(-9950.0), Pt(20.0), Pt(10000.0)),
            colour: colours::RED,
        }]
    );
}

#[test]
fn cursor_stays_inside_the_content_box() {
    let geometry = geometry();
    let top = geometry.upper_left().y;
    let bottom = geometry.margins.bottom;

    let mut backend = PdfBackend::new();
    let mut context = RenderContext::new(geometry, &mut backend).unwrap();
    for height in [300.0, 450.0, 1200.0, 50.0, 700.0, 0.0, 699.0, 2.0] {
        context
            .draw(&mut FilledBox::new(Pt(10.0), Pt(height), colours::BLACK))
            .unwrap();
        let y = context.current_position().y;
        assert!(y >= bottom && y <= top, "cursor at {y} after a {height} pt block");
    }
}

#[test]
fn page_indices_increase_by_one() {
    let mut backend = RecordingBackend::default();
    {
        let mut context = RenderContext::new(geometry(), &mut backend).unwrap();
        context
            .draw(&mut FilledBox::new(Pt(10.0), Pt(2000.0), colours::BLACK))
            .unwrap();
        context.close().unwrap();
        // drawing after close starts a fresh page rather than reusing an index
        context
            .draw(&mut FilledBox::new(Pt(10.0), Pt(10.0), colours::BLACK))
            .unwrap();
        assert_eq!(context.page_index(), 3);
    }

    assert_eq!(backend.opened, vec![0, 1, 2, 3]);
    assert_eq!(backend.closed, vec![0, 1, 2, 3]);
    assert_eq!(backend.inner.pages().len(), 4);
}

#[test]
fn closing_twice_is_harmless() {
    let mut backend = RecordingBackend::default();
    {
        let mut context = RenderContext::new(geometry(), &mut backend).unwrap();
        assert!(context.is_page_open());
        assert!(context.close_page().unwrap());
        assert!(!context.close_page().unwrap());
        context.close().unwrap();
        assert!(matches!(context.canvas_mut(), Err(PDFError::NoOpenPage)));
    }
    assert_eq!(backend.closed, vec![0]);
}

#[test]
fn hooks_bracket_every_page() {
    let mut hooks = RecordingHooks::default();
    let mut backend = PdfBackend::new();
    {
        let mut context = RenderContext::with_hooks(geometry(), &mut backend, &mut hooks).unwrap();
        context
            .draw(&mut FilledBox::new(Pt(10.0), Pt(1000.0), colours::BLACK))
            .unwrap();
    }
    assert_eq!(
        hooks.events,
        vec!["before 0", "after 0", "before 1", "after 1"]
    );
}

#[test]
fn impossible_geometry_fails_before_opening_a_page() {
    let mut backend = RecordingBackend::default();
    let geometry = PageGeometry::new((Pt(100.0), Pt(100.0)), Margins::all(Pt(60.0)));
    let result = RenderContext::new(geometry, &mut backend);
    assert!(matches!(result, Err(PDFError::Configuration(_))));
    drop(result);
    assert!(backend.opened.is_empty());
}

/// Claims to be dividable but never gives up any content
struct Stubborn {
    first_height: Pt,
}

impl Drawable for Stubborn {
    fn width(&self) -> Pt {
        Pt(10.0)
    }

    fn height(&self) -> Pt {
        Pt(1000.0)
    }

    fn render_at(&self, _canvas: &mut dyn Canvas, _origin: Coords) -> Result<(), PDFError> {
        Ok(())
    }

    fn as_dividable(&self) -> Option<Box<dyn Dividable<'_> + '_>> {
        Some(Box::new(Stubborn {
            first_height: self.first_height,
        }))
    }
}

impl<'s> Dividable<'s> for Stubborn {
    fn divide(&self, _remaining: Pt, _next_page_height: Pt) -> Result<Divided<'s>, PDFError> {
        Ok(Divided::new(
            Box::new(VerticalSpacer::new(self.first_height)),
            Some(Box::new(Stubborn {
                first_height: self.first_height,
            })),
        ))
    }
}

#[test]
fn dividers_that_make_no_progress_are_rejected() {
    let mut backend = RecordingBackend::default();
    {
        let mut context = RenderContext::new(geometry(), &mut backend).unwrap();
        let result = context.draw(&mut Stubborn {
            first_height: Pt(0.0),
        });
        assert!(matches!(
            result,
            Err(PDFError::DivideContractViolation { .. })
        ));
        assert!(!context.is_page_open());
    }
    assert_eq!(backend.opened, vec![0]);
    assert_eq!(backend.closed, vec![0]);
}

#[test]
fn dividers_returning_nan_heights_are_rejected() {
    let mut backend = RecordingBackend::default();
    {
        let mut context = RenderContext::new(geometry(), &mut backend).unwrap();
        let result = context.draw(&mut Stubborn {
            first_height: Pt(f32::NAN),
        });
        assert!(matches!(
            result,
            Err(PDFError::DivideContractViolation { .. })
        ));
    }
    assert_eq!(backend.opened, vec![0]);
    assert_eq!(backend.closed, vec![0]);
}

#[test]
fn failing_entry_hook_aborts_the_draw() {
    let mut hooks = RecordingHooks {
        fail_before: Some(1),
        ..RecordingHooks::default()
    };
    let mut backend = RecordingBackend::default();
    {
        let mut context = RenderContext::with_hooks(geometry(), &mut backend, &mut hooks).unwrap();
        let result = context.draw(&mut FilledBox::new(Pt(10.0), Pt(1000.0), colours::BLACK));
        assert!(matches!(result, Err(PDFError::Hook(_))));
        assert!(!context.is_page_open());
        assert_eq!(context.page_index(), 1);
    }
    assert_eq!(backend.opened, vec![0, 1]);
    assert_eq!(backend.closed, vec![0, 1]);
    // the page whose entry hook failed never gets an exit hook
    assert_eq!(hooks.events, vec!["before 0", "after 0", "before 1"]);
}

#[test]
fn failing_exit_hook_still_hands_the_page_back() {
    let mut hooks = RecordingHooks {
        fail_after: Some(0),
        ..RecordingHooks::default()
    };
    let mut backend = RecordingBackend::default();
    {
        let mut context = RenderContext::with_hooks(geometry(), &mut backend, &mut hooks).unwrap();
        let result = context.draw(&mut FilledBox::new(Pt(10.0), Pt(1000.0), colours::BLACK));
        assert!(matches!(result, Err(PDFError::Hook(_))));
        assert!(!context.is_page_open());
    }
    assert_eq!(backend.opened, vec![0]);
    assert_eq!(backend.closed, vec![0]);
    assert_eq!(hooks.events, vec!["before 0", "after 0"]);
}

#[test]
fn closing_with_a_failing_exit_hook_closes_the_page() {
    let mut hooks = RecordingHooks {
        fail_after: Some(0),
        ..RecordingHooks::default()
    };
    let mut backend = RecordingBackend::default();
    {
        let mut context = RenderContext::with_hooks(geometry(), &mut backend, &mut hooks).unwrap();
        assert!(matches!(context.close(), Err(PDFError::Hook(_))));
        assert!(!context.is_page_open());
        context.close().unwrap();
    }
    assert_eq!(backend.closed, vec![0]);
    assert_eq!(backend.inner.pages().len(), 1);
    assert_eq!(hooks.events, vec!["before 0", "after 0"]);
}

#[test]
fn failing_first_entry_hook_closes_without_an_exit_hook() {
    let mut hooks = RecordingHooks {
        fail_before: Some(0),
        ..RecordingHooks::default()
    };
    let mut backend = RecordingBackend::default();
    let result = RenderContext::with_hooks(geometry(), &mut backend, &mut hooks);
    assert!(matches!(result, Err(PDFError::Hook(_))));
    drop(result);

    assert_eq!(backend.opened, vec![0]);
    assert_eq!(backend.closed, vec![0]);
    assert_eq!(hooks.events, vec!["before 0"]);
}

#[test]
fn absolute_draws_after_close_need_an_open_page() {
    let mut backend = RecordingBackend::default();
    {
        let mut context = RenderContext::new(geometry(), &mut backend).unwrap();
        context
            .draw(&mut FilledBox::new(Pt(10.0), Pt(100.0), colours::BLACK))
            .unwrap();
        context.close().unwrap();
        let position = context.current_position();

        let mut block =
            FilledBox::new(Pt(20.0), Pt(20.0), colours::RED).at(Coords::new(Pt(50.0), Pt(50.0)));
        assert!(matches!(context.draw(&mut block), Err(PDFError::NoOpenPage)));
        assert_eq!(context.page_index(), 0);
        assert_eq!(context.current_position(), position);
        assert!(!context.is_page_open());
    }
    assert_eq!(backend.opened, vec![0]);
    assert_eq!(backend.closed, vec![0]);
}

/// Discards everything drawn on it
struct NullCanvas;

impl Canvas for NullCanvas {
    fn save_state(&mut self) -> Result<(), PDFError> {
        Ok(())
    }

    fn restore_state(&mut self) -> Result<(), PDFError> {
        Ok(())
    }

    fn clip_rect(&mut self, _rect: Rect) -> Result<(), PDFError> {
        Ok(())
    }

    fn add_span(&mut self, _span: SpanLayout) -> Result<(), PDFError> {
        Ok(())
    }

    fn fill_rect(&mut self, _rect: Rect, _colour: Colour) -> Result<(), PDFError> {
        Ok(())
    }

    fn stroke_line(
        &mut self,
        _from: Coords,
        _to: Coords,
        _width: Pt,
        _colour: Colour,
    ) -> Result<(), PDFError> {
        Ok(())
    }

    fn add_raw_content(&mut self, _content: Vec<u8>) -> Result<(), PDFError> {
        Ok(())
    }
}

/// Counts pages without keeping them
#[derive(Default)]
struct CountingBackend {
    opened: usize,
    closed: usize,
}

impl Backend for CountingBackend {
    type Canvas = NullCanvas;

    fn open(&mut self, _page_index: usize, _geometry: &PageGeometry) -> Result<NullCanvas, PDFError> {
        self.opened += 1;
        Ok(NullCanvas)
    }

    fn close(&mut self, _page_index: usize, _canvas: NullCanvas) -> Result<(), PDFError> {
        self.closed += 1;
        Ok(())
    }
}

/// A 100 x 120 pt page with a 100 x 100 pt content box
fn small_geometry() -> PageGeometry {
    PageGeometry::new((Pt(100.0), Pt(120.0)), Margins::symmetric(Pt(10.0), Pt(0.0)))
}

#[test]
fn cut_blocks_span_twenty_thousand_pages() {
    let mut backend = CountingBackend::default();
    {
        let mut context = RenderContext::new(small_geometry(), &mut backend).unwrap();
        context
            .draw(&mut FilledBox::new(Pt(10.0), Pt(100.0 * 20_000.0), colours::BLACK))
            .unwrap();
        assert_eq!(context.page_index(), 19_999);
        context.close().unwrap();
    }
    assert_eq!(backend.opened, 20_000);
    assert_eq!(backend.closed, 20_000);
}

#[test]
fn text_spans_twelve_thousand_pages() {
    let lines: Vec<String> = (0..120_000).map(|i| format!("line {i}")).collect();
    let mut block = TextBlock::new(lines, &Monospace, span_font(), colours::BLACK);

    let mut backend = CountingBackend::default();
    {
        let mut context = RenderContext::new(small_geometry(), &mut backend).unwrap();
        context.draw(&mut block).unwrap();
        context.close().unwrap();
    }
    // ten 10pt lines fill each 100pt content box
    assert_eq!(backend.opened, 12_000);
    assert_eq!(backend.closed, 12_000);
}

struct Broken;

impl Drawable for Broken {
    fn width(&self) -> Pt {
        Pt(10.0)
    }

    fn height(&self) -> Pt {
        Pt(10.0)
    }

    fn render_at(&self, _canvas: &mut dyn Canvas, _origin: Coords) -> Result<(), PDFError> {
        Err(std::io::Error::other("render failed").into())
    }
}

#[test]
fn draw_errors_close_the_open_page() {
    let mut backend = RecordingBackend::default();
    {
        let mut context = RenderContext::new(geometry(), &mut backend).unwrap();
        assert!(matches!(context.draw(&mut Broken), Err(PDFError::Io(_))));
        assert!(!context.is_page_open());
    }
    assert_eq!(backend.closed, vec![0]);
    // the failed block's graphics state was balanced on close
    let contents = &backend.inner.pages()[0].contents;
    assert_eq!(contents.first(), Some(&PageContents::SaveState));
    assert_eq!(contents.last(), Some(&PageContents::RestoreState));
}

#[test]
fn max_width_is_restored_after_drawing() {
    let mut backend = PdfBackend::new();
    let mut context = RenderContext::new(geometry(), &mut backend).unwrap();

    let mut rule = HorizontalRule::new(Pt(1.0), colours::BLACK);
    context.draw(&mut rule).unwrap();
    assert_eq!(rule.max_width(), None);

    let mut paragraph = Paragraph::new(lipsum::lipsum(40), &Monospace, span_font());
    paragraph.set_max_width(Some(Pt(123.0)));
    let lines_before = paragraph.lines().to_vec();
    context.draw(&mut paragraph).unwrap();
    assert_eq!(paragraph.max_width(), Some(Pt(123.0)));
    assert_eq!(paragraph.lines(), lines_before.as_slice());
}

#[test]
fn paragraphs_split_between_pages_keep_every_line() {
    init_logging();
    let text = lipsum::lipsum(600);
    let geometry = PageGeometry::new((Pt(300.0), Pt(200.0)), Margins::all(Pt(20.0)));
    let lines = wrap_lines(&text, &Monospace, Pt(10.0), Some(geometry.content_width()));
    let expected: Vec<String> = lines.iter().filter(|line| !line.is_empty()).cloned().collect();

    let mut numbers = PageNumbers::new(&Monospace, span_font());
    let mut backend = PdfBackend::new();
    {
        let mut paragraph = Paragraph::new(text.as_str(), &Monospace, span_font());
        let mut context = RenderContext::with_hooks(geometry, &mut backend, &mut numbers).unwrap();
        context.draw(&mut paragraph).unwrap();
        context.close().unwrap();
    }

    let pages = backend.into_pages();
    // 16 lines of 10pt fit the 160pt content box
    assert_eq!(pages.len(), lines.len().div_ceil(16));

    let mut placed: Vec<String> = Vec::new();
    for (index, page) in pages.iter().enumerate() {
        let mut spans: Vec<String> = page.spans().map(|span| span.text.clone()).collect();
        assert_eq!(spans.pop(), Some(format!("Page {}", index + 1)));
        for span in &spans {
            assert!(width_of_text(span, &Monospace, Pt(10.0)) <= geometry.content_width());
        }
        placed.extend(spans);
    }
    assert_eq!(placed, expected);
}

#[test]
fn documents_serialise_rendered_pages() {
    let mut backend = PdfBackend::new();
    {
        let mut context = RenderContext::new(geometry(), &mut backend).unwrap();
        context
            .draw(&mut FilledBox::new(Pt(100.0), Pt(900.0), colours::BLUE))
            .unwrap();
        context.move_position_by(Pt(0.0), Pt(-20.0));
        context
            .draw(&mut HorizontalRule::new(Pt(2.0), colours::BLACK))
            .unwrap();
    }

    let mut document = pdf_flow::Document::default();
    let ids = backend.append_to(&mut document);
    assert_eq!(ids.len(), 2);
    assert_eq!(document.index_of_page(ids[1]), Some(1));

    let mut out: Vec<u8> = Vec::new();
    document.write(&mut out).unwrap();
    assert!(out.starts_with(b"%PDF-"));
}
