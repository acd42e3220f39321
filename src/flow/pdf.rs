use super::{Backend, Canvas, Coords};
use crate::colour::Colour;
use crate::document::Document;
use crate::geometry::PageGeometry;
use crate::page::{Page, PageContents, SpanLayout};
use crate::rect::Rect;
use crate::units::Pt;
use crate::PDFError;
use id_arena::Id;
use log::warn;

/// Collects every page a [RenderContext](super::RenderContext) produces as a
/// [Page], ready to be added to a [Document].
#[derive(Default)]
pub struct PdfBackend {
    pages: Vec<Page>,
}

impl PdfBackend {
    pub fn new() -> PdfBackend {
        PdfBackend::default()
    }

    /// Pages closed so far, in order
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }

    /// Move all closed pages to the end of `document`, returning their ids in order
    pub fn append_to(self, document: &mut Document) -> Vec<Id<Page>> {
        self.pages
            .into_iter()
            .map(|page| document.add_page(page))
            .collect()
    }
}

impl Backend for PdfBackend {
    type Canvas = PdfCanvas;

    fn open(&mut self, _page_index: usize, geometry: &PageGeometry) -> Result<PdfCanvas, PDFError> {
        Ok(PdfCanvas {
            page: Page::new(geometry.size, Some(geometry.margins)),
            saved_states: 0,
        })
    }

    fn close(&mut self, page_index: usize, mut canvas: PdfCanvas) -> Result<(), PDFError> {
        if canvas.saved_states > 0 {
            warn!(
                "page {page_index} closed with {} unrestored graphics states",
                canvas.saved_states
            );
            for _ in 0..canvas.saved_states {
                canvas.page.contents.push(PageContents::RestoreState);
            }
        }
        self.pages.push(canvas.page);
        Ok(())
    }
}

/// A [Canvas] recording drawing operations into a [Page]
pub struct PdfCanvas {
    page: Page,
    saved_states: usize,
}

impl PdfCanvas {
    pub fn page(&self) -> &Page {
        &self.page
    }
}

impl Canvas for PdfCanvas {
    fn save_state(&mut self) -> Result<(), PDFError> {
        self.saved_states += 1;
        self.page.contents.push(PageContents::SaveState);
        Ok(())
    }

    fn restore_state(&mut self) -> Result<(), PDFError> {
        if self.saved_states == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "graphics state restored without a matching save",
            )
            .into());
        }
        self.saved_states -= 1;
        self.page.contents.push(PageContents::RestoreState);
        Ok(())
    }

    fn clip_rect(&mut self, rect: Rect) -> Result<(), PDFError> {
        self.page.contents.push(PageContents::Clip(rect));
        Ok(())
    }

    fn add_span(&mut self, span: SpanLayout) -> Result<(), PDFError> {
        self.page.add_span(span);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, colour: Colour) -> Result<(), PDFError> {
        self.page.contents.push(PageContents::FillRect { rect, colour });
        Ok(())
    }

    fn stroke_line(
        &mut self,
        from: Coords,
        to: Coords,
        width: Pt,
        colour: Colour,
    ) -> Result<(), PDFError> {
        self.page.contents.push(PageContents::Line {
            from: (from.x, from.y),
            to: (to.x, to.y),
            width,
            colour,
        });
        Ok(())
    }

    fn add_raw_content(&mut self, content: Vec<u8>) -> Result<(), PDFError> {
        self.page.add_raw_content(content);
        Ok(())
    }
}
