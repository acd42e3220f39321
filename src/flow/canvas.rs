use super::Coords;
use crate::colour::Colour;
use crate::geometry::PageGeometry;
use crate::page::SpanLayout;
use crate::rect::Rect;
use crate::units::Pt;
use crate::PDFError;

/// Drawing surface for a single open page.
///
/// The graphics state operations mirror PDF's `q`/`Q` and `re W n`: a clip set
/// after [Canvas::save_state] lasts until the matching [Canvas::restore_state].
pub trait Canvas {
    fn save_state(&mut self) -> Result<(), PDFError>;

    fn restore_state(&mut self) -> Result<(), PDFError>;

    /// Intersect the current clipping region with `rect`
    fn clip_rect(&mut self, rect: Rect) -> Result<(), PDFError>;

    /// Place a run of text; `span.coords` is the baseline start
    fn add_span(&mut self, span: SpanLayout) -> Result<(), PDFError>;

    fn fill_rect(&mut self, rect: Rect, colour: Colour) -> Result<(), PDFError>;

    fn stroke_line(
        &mut self,
        from: Coords,
        to: Coords,
        width: Pt,
        colour: Colour,
    ) -> Result<(), PDFError>;

    /// Append raw content stream operators, wrapped in their own graphics state
    fn add_raw_content(&mut self, content: Vec<u8>) -> Result<(), PDFError>;
}

/// Creates a canvas per page and takes it back once the page is finished.
///
/// Closing consumes the canvas, so a page can't be drawn on after it was handed back.
pub trait Backend {
    type Canvas: Canvas;

    fn open(&mut self, page_index: usize, geometry: &PageGeometry)
        -> Result<Self::Canvas, PDFError>;

    fn close(&mut self, page_index: usize, canvas: Self::Canvas) -> Result<(), PDFError>;
}

/// Callbacks run as pages are opened and closed, typically used for headers,
/// footers and page numbers. An error aborts the render.
pub trait PageHooks {
    /// Runs right after a page was opened, before any flowing content is drawn on it
    fn before_page(
        &mut self,
        _page_index: usize,
        _geometry: &PageGeometry,
        _canvas: &mut dyn Canvas,
    ) -> Result<(), PDFError> {
        Ok(())
    }

    /// Runs right before a page is closed
    fn after_page(
        &mut self,
        _page_index: usize,
        _geometry: &PageGeometry,
        _canvas: &mut dyn Canvas,
    ) -> Result<(), PDFError> {
        Ok(())
    }
}

/// No hooks at all
impl PageHooks for () {}

impl<H: PageHooks + ?Sized> PageHooks for &mut H {
    fn before_page(
        &mut self,
        page_index: usize,
        geometry: &PageGeometry,
        canvas: &mut dyn Canvas,
    ) -> Result<(), PDFError> {
        (**self).before_page(page_index, geometry, canvas)
    }

    fn after_page(
        &mut self,
        page_index: usize,
        geometry: &PageGeometry,
        canvas: &mut dyn Canvas,
    ) -> Result<(), PDFError> {
        (**self).after_page(page_index, geometry, canvas)
    }
}
