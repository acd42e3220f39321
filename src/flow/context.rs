use super::{Backend, Canvas, Cutter, Dividable, Divided, Drawable, PageHooks};
use crate::geometry::PageGeometry;
use crate::units::Pt;
use crate::{Coords, PDFError};
use log::{debug, trace, warn};
use std::cmp::Ordering;

/// Lays drawables out top to bottom inside the content box of consecutive pages.
///
/// The context owns the single open page canvas and a cursor marking where the next
/// in-flow block goes. Blocks that don't fit the space left on the page are divided:
/// the part that fits is drawn, a new page is opened, and the rest continues there.
///
/// A context is created with its first page already open. The open page is closed by
/// [RenderContext::close], or when the context is dropped, whichever comes first.
///
/// # Example
///
/// ```
/// use pdf_flow::{colours, Margins, PageGeometry, Pt};
/// use pdf_flow::elements::FilledBox;
/// use pdf_flow::flow::{PdfBackend, RenderContext};
///
/// let geometry = PageGeometry::new((Pt(200.0), Pt(300.0)), Margins::all(Pt(50.0)));
/// let mut backend = PdfBackend::new();
/// {
///     let mut context = RenderContext::new(geometry, &mut backend)?;
///     context.draw(&mut FilledBox::new(Pt(100.0), Pt(350.0), colours::GREY))?;
///     context.close()?;
/// }
/// assert_eq!(backend.pages().len(), 2);
/// # Ok::<(), pdf_flow::PDFError>(())
/// ```
pub struct RenderContext<'b, B: Backend, H: PageHooks = ()> {
    geometry: PageGeometry,
    backend: &'b mut B,
    hooks: H,
    canvas: Option<B::Canvas>,
    /// Index of the most recently opened page
    page_index: Option<usize>,
    position: Coords,
}

impl<'b, B: Backend> RenderContext<'b, B> {
    /// Start a render without page hooks
    pub fn new(geometry: PageGeometry, backend: &'b mut B) -> Result<Self, PDFError> {
        RenderContext::with_hooks(geometry, backend, ())
    }
}

impl<'b, B: Backend, H: PageHooks> RenderContext<'b, B, H> {
    /// Start a render, running `hooks` as every page is opened and closed.
    ///
    /// Fails before any page is opened if the geometry leaves no room for content.
    pub fn with_hooks(
        geometry: PageGeometry,
        backend: &'b mut B,
        hooks: H,
    ) -> Result<Self, PDFError> {
        geometry.validate()?;

        let mut context = RenderContext {
            geometry,
            backend,
            hooks,
            canvas: None,
            page_index: None,
            position: geometry.upper_left(),
        };
        context.new_page()?;
        Ok(context)
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Index of the current page (or the last one, once closed), starting at 0
    pub fn page_index(&self) -> usize {
        self.page_index.unwrap_or_default()
    }

    pub fn is_page_open(&self) -> bool {
        self.canvas.is_some()
    }

    /// Where the next in-flow block will be drawn (its upper-left corner)
    pub fn current_position(&self) -> Coords {
        self.position
    }

    /// Move the cursor, e.g. to leave vertical space between blocks
    pub fn move_position_by(&mut self, dx: Pt, dy: Pt) {
        self.position = self.position.translate(dx, dy);
    }

    pub fn upper_left(&self) -> Coords {
        self.geometry.upper_left()
    }

    /// Width of the content box
    pub fn width(&self) -> Pt {
        self.geometry.content_width()
    }

    /// Height of the content box
    pub fn height(&self) -> Pt {
        self.geometry.content_height()
    }

    /// Vertical space left between the cursor and the bottom margin
    pub fn remaining_height(&self) -> Pt {
        self.position.y - self.geometry.margins.bottom
    }

    /// The open page's canvas, for drawing outside of the flow
    pub fn canvas_mut(&mut self) -> Result<&mut B::Canvas, PDFError> {
        self.canvas.as_mut().ok_or(PDFError::NoOpenPage)
    }

    /// Draw a block, either at its absolute position or flowing at the cursor.
    ///
    /// Flowing blocks are given the content width first if they reflow, and are
    /// divided over as many pages as they need. Their previous max width is restored
    /// afterwards. A flowing block drawn after [RenderContext::close] starts a new page;
    /// an absolutely positioned one fails with [PDFError::NoOpenPage] instead, since it
    /// must not move the flow. If anything fails the open page is closed before the
    /// error is returned.
    pub fn draw(&mut self, drawable: &mut dyn Drawable) -> Result<(), PDFError> {
        let result = match drawable.absolute_position() {
            Some(position) => self.draw_absolute(&*drawable, position),
            None => {
                if self.canvas.is_none() {
                    self.new_page()?;
                }
                self.draw_relative(drawable)
            }
        };

        if let Err(err) = &result {
            debug!("draw failed on page {}: {err}", self.page_index());
            if let Err(close_err) = self.close_page() {
                warn!(
                    "failed to close page {} after a draw error: {close_err}",
                    self.page_index()
                );
            }
        }
        result
    }

    fn draw_absolute(&mut self, drawable: &dyn Drawable, position: Coords) -> Result<(), PDFError> {
        trace!("drawing {} pt block at absolute {position:?}", drawable.height());
        drawable.render_at(self.canvas_mut()?, position)
    }

    fn draw_relative(&mut self, drawable: &mut dyn Drawable) -> Result<(), PDFError> {
        let content_width = self.width();
        let previous_width = drawable.as_width_respecting().map(|flowing| {
            let previous = flowing.max_width();
            flowing.set_max_width(Some(content_width));
            previous
        });

        let result = self.flow(&*drawable);

        if let Some(previous) = previous_width {
            if let Some(flowing) = drawable.as_width_respecting() {
                flowing.set_max_width(previous);
            }
        }
        result
    }

    /// Place `drawable` at the cursor, dividing it over new pages while it doesn't fit.
    fn flow(&mut self, drawable: &dyn Drawable) -> Result<(), PDFError> {
        if self.remaining_height() >= drawable.height() {
            return self.draw_relative_and_move(drawable);
        }

        let mut part: Box<dyn Dividable<'_> + '_> = match drawable.as_dividable() {
            Some(dividable) => dividable,
            None => Box::new(Cutter::new(drawable)),
        };

        loop {
            let part_height = part.height();
            let remaining_height = self.remaining_height();
            if remaining_height >= part_height {
                return self.draw_relative_and_move(&*part);
            }
            if remaining_height <= Pt::ZERO {
                // the page is full, there's nothing to divide against
                self.new_page()?;
                continue;
            }

            let Divided { first, rest } = part.divide(remaining_height, self.height())?;
            // NaN heights count as no progress
            let progressed = first.height().partial_cmp(&Pt::ZERO) == Some(Ordering::Greater);
            if rest.is_some() && !progressed {
                return Err(PDFError::DivideContractViolation {
                    remaining_height,
                    part_height,
                });
            }
            debug!(
                "divided {part_height} pt block on page {}: {} pt placed, {} pt carried over",
                self.page_index(),
                first.height(),
                rest.as_ref().map(|rest| rest.height()).unwrap_or_default()
            );

            self.draw_relative_and_move(&*first)?;
            self.new_page()?;

            match rest {
                Some(rest) => part = rest,
                None => return Ok(()),
            }
        }
    }

    /// Draw at the cursor, clipped to the content box, then move the cursor below the block
    fn draw_relative_and_move<D: Drawable + ?Sized>(&mut self, drawable: &D) -> Result<(), PDFError> {
        let content_box = self.geometry.content_box();
        let position = self.position;
        trace!("drawing {} pt block at {position:?}", drawable.height());

        let canvas = self.canvas_mut()?;
        canvas.save_state()?;
        canvas.clip_rect(content_box)?;
        drawable.render_at(canvas, position)?;
        canvas.restore_state()?;

        self.move_position_by(Pt::ZERO, -drawable.height());
        Ok(())
    }

    /// Close the open page, if any, and open the next one with the cursor at its top
    pub fn new_page(&mut self) -> Result<(), PDFError> {
        self.close_page()?;

        let page_index = self.page_index.map_or(0, |index| index + 1);
        let mut canvas = self.backend.open(page_index, &self.geometry)?;
        self.page_index = Some(page_index);
        self.position = self.geometry.upper_left();
        debug!("opened page {page_index}");

        if let Err(err) = self.hooks.before_page(page_index, &self.geometry, &mut canvas) {
            // the page never started, so it goes back without its exit hook
            if let Err(close_err) = self.backend.close(page_index, canvas) {
                warn!("failed to close page {page_index} after a hook error: {close_err}");
            }
            return Err(err);
        }
        self.canvas = Some(canvas);
        Ok(())
    }

    /// Run the page-exit hook and hand the open canvas back to the backend.
    ///
    /// Returns `false` without doing anything if no page is open.
    pub fn close_page(&mut self) -> Result<bool, PDFError> {
        let Some(mut canvas) = self.canvas.take() else {
            return Ok(false);
        };
        let page_index = self.page_index();

        let hooked = self
            .hooks
            .after_page(page_index, &self.geometry, &mut canvas);
        let closed = self.backend.close(page_index, canvas);
        debug!("closed page {page_index}");

        if let Err(err) = hooked {
            if let Err(close_err) = closed {
                warn!("failed to close page {page_index} after a hook error: {close_err}");
            }
            return Err(err);
        }
        closed.map(|_| true)
    }

    /// Finish the render by closing the last page. Calling it again does nothing.
    pub fn close(&mut self) -> Result<(), PDFError> {
        self.close_page().map(|_| ())
    }
}

impl<B: Backend, H: PageHooks> Drop for RenderContext<'_, B, H> {
    fn drop(&mut self) {
        if let Err(err) = self.close_page() {
            warn!("failed to close page {} on drop: {err}", self.page_index());
        }
    }
}
