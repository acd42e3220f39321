use super::{Canvas, Coords, Dividable};
use crate::units::Pt;
use crate::PDFError;

/// A measurable block of content that can render itself onto a [Canvas].
///
/// Optional capabilities are exposed through [Drawable::as_width_respecting] and
/// [Drawable::as_dividable] instead of type inspection; the flow engine queries
/// them once per [RenderContext::draw](super::RenderContext::draw).
pub trait Drawable {
    /// Horizontal footprint of the block
    fn width(&self) -> Pt;

    /// Vertical footprint of the block, at the current max width for reflowable content
    fn height(&self) -> Pt;

    /// If set, the block is drawn at exactly this point (its upper-left corner)
    /// and does not take part in the flow
    fn absolute_position(&self) -> Option<Coords> {
        None
    }

    /// Draw the block with its upper-left corner at `origin`.
    ///
    /// Everything must be drawn relative to `origin` so the same block can be
    /// drawn repeatedly at different places.
    fn render_at(&self, canvas: &mut dyn Canvas, origin: Coords) -> Result<(), PDFError>;

    /// Blocks whose height depends on the available width return themselves here
    fn as_width_respecting(&mut self) -> Option<&mut dyn WidthRespecting> {
        None
    }

    /// Blocks that know how to split themselves at a content boundary return a divider
    /// for their content here. Everything else is split geometrically by a
    /// [Cutter](super::Cutter).
    ///
    /// The divider and every part it produces may borrow from `self`, but never from
    /// each other, so the flow engine can drop a part once it has been divided.
    fn as_dividable(&self) -> Option<Box<dyn Dividable<'_> + '_>> {
        None
    }
}

/// Content that wraps to a maximum width, e.g. text.
///
/// After [WidthRespecting::set_max_width], [Drawable::height] reflects the layout
/// at that width until it is changed again. `None` means unconstrained.
pub trait WidthRespecting {
    fn max_width(&self) -> Option<Pt>;

    fn set_max_width(&mut self, max_width: Option<Pt>);
}

impl<T: Drawable + ?Sized> Drawable for Box<T> {
    fn width(&self) -> Pt {
        (**self).width()
    }

    fn height(&self) -> Pt {
        (**self).height()
    }

    fn absolute_position(&self) -> Option<Coords> {
        (**self).absolute_position()
    }

    fn render_at(&self, canvas: &mut dyn Canvas, origin: Coords) -> Result<(), PDFError> {
        (**self).render_at(canvas, origin)
    }

    fn as_width_respecting(&mut self) -> Option<&mut dyn WidthRespecting> {
        (**self).as_width_respecting()
    }

    fn as_dividable(&self) -> Option<Box<dyn Dividable<'_> + '_>> {
        (**self).as_dividable()
    }
}

/// A shared reference draws like the block it points to, but can't be reflowed through it
impl<T: Drawable + ?Sized> Drawable for &T {
    fn width(&self) -> Pt {
        (**self).width()
    }

    fn height(&self) -> Pt {
        (**self).height()
    }

    fn absolute_position(&self) -> Option<Coords> {
        (**self).absolute_position()
    }

    fn render_at(&self, canvas: &mut dyn Canvas, origin: Coords) -> Result<(), PDFError> {
        (**self).render_at(canvas, origin)
    }

    fn as_dividable(&self) -> Option<Box<dyn Dividable<'_> + '_>> {
        (**self).as_dividable()
    }
}
