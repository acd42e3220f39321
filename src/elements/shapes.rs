use crate::colour::Colour;
use crate::flow::{Canvas, Coords, Dividable, Divided, Drawable, WidthRespecting};
use crate::rect::Rect;
use crate::units::Pt;
use crate::PDFError;

/// Empty vertical space between blocks.
///
/// A spacer that reaches past the bottom of a page ends there: the part that
/// doesn't fit is dropped rather than pushing the next page's content down.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VerticalSpacer {
    height: Pt,
}

impl VerticalSpacer {
    pub fn new(height: Pt) -> VerticalSpacer {
        VerticalSpacer { height }
    }
}

impl Drawable for VerticalSpacer {
    fn width(&self) -> Pt {
        Pt::ZERO
    }

    fn height(&self) -> Pt {
        self.height
    }

    fn render_at(&self, _canvas: &mut dyn Canvas, _origin: Coords) -> Result<(), PDFError> {
        Ok(())
    }

    fn as_dividable(&self) -> Option<Box<dyn Dividable<'_> + '_>> {
        Some(Box::new(*self))
    }
}

impl<'s> Dividable<'s> for VerticalSpacer {
    fn divide(
        &self,
        remaining_height: Pt,
        _next_page_height: Pt,
    ) -> Result<Divided<'s>, PDFError> {
        Ok(Divided::whole(VerticalSpacer::new(
            remaining_height.min(self.height),
        )))
    }
}

/// A horizontal line spanning the available width
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HorizontalRule {
    thickness: Pt,
    colour: Colour,
    max_width: Option<Pt>,
}

impl HorizontalRule {
    pub fn new(thickness: Pt, colour: Colour) -> HorizontalRule {
        HorizontalRule {
            thickness,
            colour,
            max_width: None,
        }
    }
}

impl Drawable for HorizontalRule {
    /// The rule is as wide as it is allowed to be, and has no width of its own
    fn width(&self) -> Pt {
        self.max_width.unwrap_or_default()
    }

    fn height(&self) -> Pt {
        self.thickness
    }

    fn render_at(&self, canvas: &mut dyn Canvas, origin: Coords) -> Result<(), PDFError> {
        let y = -self.thickness / 2.0;
        canvas.stroke_line(
            origin.translate(Pt::ZERO, y),
            origin.translate(self.width(), y),
            self.thickness,
            self.colour,
        )
    }

    fn as_width_respecting(&mut self) -> Option<&mut dyn WidthRespecting> {
        Some(self)
    }
}

impl WidthRespecting for HorizontalRule {
    fn max_width(&self) -> Option<Pt> {
        self.max_width
    }

    fn set_max_width(&mut self, max_width: Option<Pt>) {
        self.max_width = max_width;
    }
}

/// A solid rectangle, e.g. a placeholder for a figure.
///
/// It has no natural place to split, so the flow engine cuts it geometrically
/// when it doesn't fit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FilledBox {
    width: Pt,
    height: Pt,
    colour: Colour,
    position: Option<Coords>,
}

impl FilledBox {
    pub fn new(width: Pt, height: Pt, colour: Colour) -> FilledBox {
        FilledBox {
            width,
            height,
            colour,
            position: None,
        }
    }

    /// Take the box out of the flow and draw it with its upper-left corner at `position`
    pub fn at(mut self, position: Coords) -> FilledBox {
        self.position = Some(position);
        self
    }
}

impl Drawable for FilledBox {
    fn width(&self) -> Pt {
        self.width
    }

    fn height(&self) -> Pt {
        self.height
    }

    fn absolute_position(&self) -> Option<Coords> {
        self.position
    }

    fn render_at(&self, canvas: &mut dyn Canvas, origin: Coords) -> Result<(), PDFError> {
        canvas.fill_rect(
            Rect::from_xywh(origin.x, origin.y - self.height, self.width, self.height),
            self.colour,
        )
    }
}
