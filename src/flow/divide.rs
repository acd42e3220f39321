use super::{Canvas, Coords, Drawable, WidthRespecting};
use crate::elements::VerticalSpacer;
use crate::units::Pt;
use crate::PDFError;

/// The result of splitting a block at a page boundary: a part that fits the
/// remaining space and whatever is left for the following pages.
pub struct Divided<'a> {
    pub first: Box<dyn Drawable + 'a>,
    /// `None` when `first` holds all of the content. The rest can be divided again.
    pub rest: Option<Box<dyn Dividable<'a> + 'a>>,
}

impl<'a> Divided<'a> {
    pub fn new(first: Box<dyn Drawable + 'a>, rest: Option<Box<dyn Dividable<'a> + 'a>>) -> Self {
        Divided { first, rest }
    }

    /// Nothing to split: the whole block is the first part
    pub fn whole<D: Drawable + 'a>(drawable: D) -> Self {
        Divided {
            first: Box::new(drawable),
            rest: None,
        }
    }

    /// Skip the rest of the current page and carry the whole block over to the next one
    pub fn defer(remaining_height: Pt, rest: Box<dyn Dividable<'a> + 'a>) -> Self {
        Divided {
            first: Box::new(VerticalSpacer::new(remaining_height)),
            rest: Some(rest),
        }
    }
}

/// Content that knows where it can be split, e.g. between lines of text.
///
/// `'a` is the lifetime of whatever the parts borrow. Parts never borrow the divider
/// itself, so a rest can be divided again after the part it came from is gone.
pub trait Dividable<'a>: Drawable {
    /// Split off a first part of at most `remaining_height`.
    ///
    /// `next_page_height` is the height a fresh page offers, so content can decide
    /// to [defer](Divided::defer) itself instead of being cut. When not even the first
    /// unit of content fits on a fresh page, the first part must still be non-empty and
    /// is allowed to overflow; an empty first part is a contract violation.
    fn divide(&self, remaining_height: Pt, next_page_height: Pt)
        -> Result<Divided<'a>, PDFError>;
}

/// Splits any [Drawable] geometrically, for content without a [Dividable] implementation.
///
/// The cutter knows nothing about what it cuts: each part draws the entire wrapped
/// block, shifted up by the height already shown on previous pages, and relies on the
/// flow engine clipping to the content box to hide the rest. A line of text or an image
/// may be sliced through the middle; this is the expected, lossy fallback.
#[derive(Clone, Copy)]
pub struct Cutter<'a> {
    inner: &'a dyn Drawable,
    /// Height of the wrapped block already placed on earlier pages
    offset: Pt,
    /// Height of the window onto the wrapped block that this part shows
    height: Pt,
}

impl<'a> Cutter<'a> {
    pub fn new(inner: &'a dyn Drawable) -> Self {
        Cutter {
            inner,
            offset: Pt::ZERO,
            height: inner.height(),
        }
    }

    pub fn offset(&self) -> Pt {
        self.offset
    }

    /// Cut exactly at `remaining_height`
    pub fn split<'s>(self, remaining_height: Pt) -> Divided<'s>
    where
        'a: 's,
    {
        if remaining_height >= self.height {
            return Divided::whole(self);
        }

        let first = Cutter {
            height: remaining_height,
            ..self
        };
        let rest = Cutter {
            offset: self.offset + remaining_height,
            height: self.height - remaining_height,
            ..self
        };
        Divided::new(Box::new(first), Some(Box::new(rest)))
    }
}

impl Drawable for Cutter<'_> {
    fn width(&self) -> Pt {
        self.inner.width()
    }

    fn height(&self) -> Pt {
        self.height
    }

    fn render_at(&self, canvas: &mut dyn Canvas, origin: Coords) -> Result<(), PDFError> {
        self.inner
            .render_at(canvas, origin.translate(Pt::ZERO, self.offset))
    }

    fn as_dividable(&self) -> Option<Box<dyn Dividable<'_> + '_>> {
        Some(Box::new(*self))
    }
}

impl<'s, 'a: 's> Dividable<'s> for Cutter<'a> {
    fn divide(
        &self,
        remaining_height: Pt,
        _next_page_height: Pt,
    ) -> Result<Divided<'s>, PDFError> {
        Ok(self.split(remaining_height))
    }
}

/// Keeps a block in one piece whenever a fresh page can hold it: instead of being
/// split, the block moves to the next page. Blocks taller than a page are still split,
/// natively if they can be, by a [Cutter] otherwise.
pub struct KeepTogether<D> {
    inner: D,
}

impl<D: Drawable> KeepTogether<D> {
    pub fn new(inner: D) -> Self {
        KeepTogether { inner }
    }

    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D: Drawable> Drawable for KeepTogether<D> {
    fn width(&self) -> Pt {
        self.inner.width()
    }

    fn height(&self) -> Pt {
        self.inner.height()
    }

    fn absolute_position(&self) -> Option<Coords> {
        self.inner.absolute_position()
    }

    fn render_at(&self, canvas: &mut dyn Canvas, origin: Coords) -> Result<(), PDFError> {
        self.inner.render_at(canvas, origin)
    }

    fn as_width_respecting(&mut self) -> Option<&mut dyn WidthRespecting> {
        self.inner.as_width_respecting()
    }

    fn as_dividable(&self) -> Option<Box<dyn Dividable<'_> + '_>> {
        Some(Box::new(self))
    }
}

impl<'s, D: Drawable> Dividable<'s> for &'s KeepTogether<D> {
    fn divide(
        &self,
        remaining_height: Pt,
        next_page_height: Pt,
    ) -> Result<Divided<'s>, PDFError> {
        let inner: &'s D = &self.inner;
        let height = inner.height();
        if height <= remaining_height {
            return Ok(Divided::whole(inner));
        }
        if height <= next_page_height {
            // a cutter with nothing cut off draws the block unchanged
            return Ok(Divided::defer(remaining_height, Box::new(Cutter::new(inner))));
        }
        match inner.as_dividable() {
            Some(dividable) => dividable.divide(remaining_height, next_page_height),
            None => Ok(Cutter::new(inner).split(remaining_height)),
        }
    }
}
