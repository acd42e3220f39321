use crate::colour::{colours, Colour};
use crate::flow::{Canvas, Coords, Dividable, Divided, Drawable, WidthRespecting};
use crate::layout::{baseline_offset, width_of_text, wrap_lines, TextMetrics};
use crate::page::{SpanFont, SpanLayout};
use crate::units::Pt;
use crate::PDFError;
use std::ops::Range;
use std::rc::Rc;

/// Lines of text that have already been wrapped.
///
/// Text blocks split between lines: the first part holds as many whole lines as
/// fit the remaining space, the rest continues on the next page. Parts share the
/// wrapped lines and only narrow the range they show.
#[derive(Clone)]
pub struct TextBlock<'f> {
    lines: Rc<[String]>,
    range: Range<usize>,
    metrics: &'f dyn TextMetrics,
    font: SpanFont,
    colour: Colour,
}

impl<'f> TextBlock<'f> {
    pub fn new(
        lines: Vec<String>,
        metrics: &'f dyn TextMetrics,
        font: SpanFont,
        colour: Colour,
    ) -> TextBlock<'f> {
        let range = 0..lines.len();
        TextBlock {
            lines: Rc::from(lines),
            range,
            metrics,
            font,
            colour,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines[self.range.clone()]
    }

    pub fn line_height(&self) -> Pt {
        self.metrics.line_height(self.font.size)
    }

    fn with_range(&self, range: Range<usize>) -> TextBlock<'f> {
        TextBlock {
            range,
            ..self.clone()
        }
    }

    fn set_lines(&mut self, lines: Vec<String>) {
        self.range = 0..lines.len();
        self.lines = Rc::from(lines);
    }
}

impl Drawable for TextBlock<'_> {
    /// Width of the longest line
    fn width(&self) -> Pt {
        self.lines()
            .iter()
            .map(|line| width_of_text(line, self.metrics, self.font.size))
            .fold(Pt::ZERO, Pt::max)
    }

    fn height(&self) -> Pt {
        self.line_height() * self.range.len() as f32
    }

    fn render_at(&self, canvas: &mut dyn Canvas, origin: Coords) -> Result<(), PDFError> {
        let line_height = self.line_height();
        let baseline = origin.y + baseline_offset(self.metrics, self.font.size);
        for (i, line) in self.lines().iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            canvas.add_span(SpanLayout {
                text: line.clone(),
                font: self.font,
                colour: self.colour,
                coords: (origin.x, baseline - line_height * i as f32),
            })?;
        }
        Ok(())
    }

    fn as_dividable(&self) -> Option<Box<dyn Dividable<'_> + '_>> {
        Some(Box::new(self.clone()))
    }
}

impl<'s, 'f: 's> Dividable<'s> for TextBlock<'f> {
    fn divide(
        &self,
        remaining_height: Pt,
        next_page_height: Pt,
    ) -> Result<Divided<'s>, PDFError> {
        let line_height = self.line_height();
        // tolerate rounding when the space left is an exact multiple of the line height
        let mut fit = (remaining_height / line_height + 1e-4).floor().max(0.0) as usize;
        if fit >= self.range.len() {
            return Ok(Divided::whole(self.clone()));
        }
        if fit == 0 {
            if line_height <= next_page_height {
                return Ok(Divided::defer(remaining_height, Box::new(self.clone())));
            }
            // not even a fresh page holds a line, so let one overflow
            fit = 1;
        }

        let split = self.range.start + fit;
        let rest: Option<Box<dyn Dividable<'s> + 's>> = if split < self.range.end {
            Some(Box::new(self.with_range(split..self.range.end)))
        } else {
            None
        };
        Ok(Divided::new(
            Box::new(self.with_range(self.range.start..split)),
            rest,
        ))
    }
}

/// A paragraph of text in a single font, wrapped to the width it is drawn at.
///
/// # Example
///
/// ```no_run
/// use pdf_flow::{Document, Font, Margins, PageGeometry, Pt, SpanFont, pagesize};
/// use pdf_flow::elements::Paragraph;
/// use pdf_flow::flow::{PdfBackend, RenderContext};
///
/// let mut document = Document::default();
/// let font = Font::load(std::fs::read("font.ttf")?)?;
/// let font_id = document.add_font(font);
/// let font = &document.fonts[font_id];
///
/// let mut paragraph = Paragraph::new(
///     "Lorem ipsum dolor sit amet",
///     font,
///     SpanFont { id: font_id, size: Pt(12.0) },
/// );
/// let mut backend = PdfBackend::new();
/// let mut context = RenderContext::new(
///     PageGeometry::new(pagesize::LETTER, Margins::all(Pt(72.0))),
///     &mut backend,
/// )?;
/// context.draw(&mut paragraph)?;
/// context.close()?;
/// # drop(context);
/// # drop(paragraph);
/// backend.append_to(&mut document);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Paragraph<'f> {
    text: String,
    max_width: Option<Pt>,
    position: Option<Coords>,
    block: TextBlock<'f>,
}

impl<'f> Paragraph<'f> {
    pub fn new<S: Into<String>>(text: S, metrics: &'f dyn TextMetrics, font: SpanFont) -> Self {
        let text = text.into();
        let lines = wrap_lines(&text, metrics, font.size, None);
        Paragraph {
            text,
            max_width: None,
            position: None,
            block: TextBlock::new(lines, metrics, font, colours::BLACK),
        }
    }

    pub fn with_colour(mut self, colour: Colour) -> Self {
        self.block.colour = colour;
        self
    }

    /// Take the paragraph out of the flow and draw it with its upper-left corner at `position`
    pub fn at(mut self, position: Coords) -> Self {
        self.position = Some(position);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The lines at the current max width
    pub fn lines(&self) -> &[String] {
        self.block.lines()
    }
}

impl Drawable for Paragraph<'_> {
    fn width(&self) -> Pt {
        self.block.width()
    }

    fn height(&self) -> Pt {
        self.block.height()
    }

    fn absolute_position(&self) -> Option<Coords> {
        self.position
    }

    fn render_at(&self, canvas: &mut dyn Canvas, origin: Coords) -> Result<(), PDFError> {
        self.block.render_at(canvas, origin)
    }

    fn as_width_respecting(&mut self) -> Option<&mut dyn WidthRespecting> {
        Some(self)
    }

    fn as_dividable(&self) -> Option<Box<dyn Dividable<'_> + '_>> {
        Some(Box::new(self.block.clone()))
    }
}

impl WidthRespecting for Paragraph<'_> {
    fn max_width(&self) -> Option<Pt> {
        self.max_width
    }

    fn set_max_width(&mut self, max_width: Option<Pt>) {
        if max_width == self.max_width {
            return;
        }
        self.max_width = max_width;
        let lines = wrap_lines(
            &self.text,
            self.block.metrics,
            self.block.font.size,
            max_width,
        );
        self.block.set_lines(lines);
    }
}
