use crate::colour::{colours, Colour};
use crate::flow::{Canvas, PageHooks};
use crate::geometry::PageGeometry;
use crate::layout::{width_of_text, TextMetrics};
use crate::page::{SpanFont, SpanLayout};
use crate::PDFError;

/// Page hook that stamps "Page N" into the bottom margin of every page.
///
/// Numbers sit on the outer edge of a spread: flush right on even page indices,
/// flush left on odd ones, halfway down the bottom margin.
pub struct PageNumbers<'f> {
    metrics: &'f dyn TextMetrics,
    font: SpanFont,
    colour: Colour,
    first_number: usize,
}

impl<'f> PageNumbers<'f> {
    pub fn new(metrics: &'f dyn TextMetrics, font: SpanFont) -> Self {
        PageNumbers {
            metrics,
            font,
            colour: colours::GREY,
            first_number: 1,
        }
    }

    pub fn with_colour(mut self, colour: Colour) -> Self {
        self.colour = colour;
        self
    }

    /// Number the first page `first_number` instead of 1
    pub fn starting_at(mut self, first_number: usize) -> Self {
        self.first_number = first_number;
        self
    }

    pub fn label(&self, page_index: usize) -> String {
        format!("Page {}", page_index + self.first_number)
    }
}

impl PageHooks for PageNumbers<'_> {
    fn after_page(
        &mut self,
        page_index: usize,
        geometry: &PageGeometry,
        canvas: &mut dyn Canvas,
    ) -> Result<(), PDFError> {
        let text = self.label(page_index);
        let content_box = geometry.content_box();
        let x = if page_index % 2 == 0 {
            content_box.x2 - width_of_text(&text, self.metrics, self.font.size)
        } else {
            content_box.x1
        };
        let y = geometry.margins.bottom / 2.0;

        canvas.add_span(SpanLayout {
            text,
            font: self.font,
            colour: self.colour,
            coords: (x, y),
        })
    }
}
